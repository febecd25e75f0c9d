//! Costing errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::{DeliveryZoneKey, IngredientKey, RecipeKey, RecipeKind, TechniqueKey};

/// Errors that stop a calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostingError {
    /// The tier has no stored volume, dimensions or written size (tier index).
    #[error("Tier {tier} has no volume, dimensions or size")]
    MissingTierSize {
        /// Tier index
        tier: usize,
    },

    /// The tier's stored or computed volume is zero, negative or too large to represent.
    #[error("Tier {tier} has a non-positive volume of {volume} ml")]
    InvalidTierVolume {
        /// Tier index
        tier: usize,

        /// Offending volume
        volume: Decimal,
    },

    /// A measured dimension is zero, negative or not finite.
    #[error("Tier {tier} has an invalid dimension")]
    InvalidTierDimension {
        /// Tier index
        tier: usize,
    },

    /// An explicitly referenced recipe is not in the catalog.
    #[error("Recipe {0:?} is not in the catalog")]
    UnknownRecipe(RecipeKey),

    /// An explicitly referenced recipe is of the wrong kind.
    #[error("Tier {tier} references {recipe}, which is not a {expected} recipe")]
    RecipeKindMismatch {
        /// Tier index
        tier: usize,

        /// Kind the tier needed
        expected: RecipeKind,

        /// Recipe referenced
        recipe: String,
    },

    /// A recipe line references an ingredient that is not in the catalog.
    #[error("Ingredient {0:?} is not in the catalog")]
    UnknownIngredient(IngredientKey),

    /// A decoration references a technique that is not in the catalog.
    #[error("Decoration technique {0:?} is not in the catalog")]
    UnknownTechnique(TechniqueKey),

    /// Delivery references a zone that is not in the catalog.
    #[error("Delivery zone {0:?} is not in the catalog")]
    UnknownDeliveryZone(DeliveryZoneKey),

    /// Markup below zero.
    #[error("Markup must not be negative")]
    NegativeMarkup,

    /// An amount that must be zero or more is negative (field name).
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Field name
        field: &'static str,
    },

    /// An amount is too large to be held in minor units.
    #[error("{0} is too large to be represented as money")]
    MoneyOverflow(Decimal),
}
