//! Costing warnings

use std::fmt;

use crate::catalog::RecipeKind;

/// A gap in the input or catalog that was priced around rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostingWarning {
    /// The catalog has no recipe of a kind the tier needs; that component costs nothing.
    MissingRecipe {
        /// Tier index
        tier: usize,
        /// Component left out
        kind: RecipeKind,
    },

    /// The tier's free text matched nothing, so the first recipe of the kind was used.
    FallbackRecipe {
        /// Tier index
        tier: usize,
        /// Component
        kind: RecipeKind,
        /// Text on the tier
        text: String,
        /// Recipe used instead
        recipe: String,
    },

    /// The recipe has no yield volume, so one batch was assumed.
    MissingYieldVolume {
        /// Tier index
        tier: usize,
        /// Component
        kind: RecipeKind,
        /// Recipe name
        recipe: String,
    },

    /// The tier's size could not be read, so an 8" round was assumed.
    UnparsedTierSize {
        /// Tier index
        tier: usize,
        /// Size as written
        size: String,
    },

    /// A labor role is neither in the catalog nor the fallback table; the Baker rate was used.
    FallbackLaborRate {
        /// Role name
        role: String,
    },

    /// Delivery was requested without a zone, so no delivery fee was charged.
    MissingDeliveryZone,
}

impl fmt::Display for CostingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostingWarning::MissingRecipe { tier, kind } => {
                write!(f, "tier {}: no {kind} recipe in the catalog", tier + 1)
            }
            CostingWarning::FallbackRecipe {
                tier,
                kind,
                text,
                recipe,
            } => write!(
                f,
                "tier {}: no {kind} recipe matches \"{text}\", using {recipe}",
                tier + 1
            ),
            CostingWarning::MissingYieldVolume { tier, kind, recipe } => write!(
                f,
                "tier {}: {kind} recipe {recipe} has no yield volume, assuming one batch",
                tier + 1
            ),
            CostingWarning::UnparsedTierSize { tier, size } => write!(
                f,
                "tier {}: could not read size \"{size}\", assuming 8\" round",
                tier + 1
            ),
            CostingWarning::FallbackLaborRate { role } => {
                write!(f, "no hourly rate for {role}, using the Baker rate")
            }
            CostingWarning::MissingDeliveryZone => {
                f.write_str("delivery requested without a zone, no delivery fee charged")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_number_tiers_from_one() {
        let warning = CostingWarning::MissingRecipe {
            tier: 0,
            kind: RecipeKind::Filling,
        };

        assert_eq!(warning.to_string(), "tier 1: no filling recipe in the catalog");
    }
}
