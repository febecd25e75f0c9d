//! Tier measurements

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    costing::{CostingError, CostingWarning},
    geometry::{
        BatterEstimate, ButtercreamEstimate, Complexity, DEFAULT_ASSEMBLY_MINUTES, TierSize,
        assembly_minutes, batter_for_tier, buttercream_for_tier, cm_to_inches, tier_volume_ml,
    },
    resolver::ResolvedRecipe,
    settings::GeometrySettings,
    snapshot::Tier,
};

/// Audit record of how one tier was costed.
#[derive(Debug, Clone, PartialEq)]
pub struct TierCosting {
    /// Tier index
    pub index: usize,

    /// Size used for geometry, if the tier had one
    pub size: Option<TierSize>,

    /// Volume the recipes were scaled to
    pub volume_ml: Decimal,

    /// Servings
    pub servings: u32,

    /// Recipes resolved for the tier
    pub recipes: SmallVec<[ResolvedRecipe; 3]>,

    /// Assembly minutes charged
    pub assembly_minutes: Decimal,

    /// Batter estimate from the tier's size
    pub batter: Option<BatterEstimate>,

    /// Buttercream estimate from the tier's size
    pub buttercream: Option<ButtercreamEstimate>,
}

/// Measurements of a tier after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TierMeasurements {
    pub(crate) size: Option<TierSize>,
    pub(crate) volume_ml: Decimal,
    pub(crate) height_in: f64,
    pub(crate) assembly_minutes: Decimal,
    pub(crate) warning: Option<CostingWarning>,
}

impl TierMeasurements {
    /// Measures a tier: stored values first, then its dimensions, then its written size.
    pub(crate) fn measure(tier: &Tier, settings: &GeometrySettings) -> Result<Self, CostingError> {
        for dimension in [tier.diameter_cm, tier.length_cm, tier.height_cm]
            .into_iter()
            .flatten()
        {
            if !dimension.is_finite() || dimension <= 0.0 {
                return Err(CostingError::InvalidTierDimension { tier: tier.index });
            }
        }

        let mut warning = None;

        let size = tier.measured_size().or_else(|| {
            tier.size_name().map(|name| {
                TierSize::parse(name).unwrap_or_else(|| {
                    warning = Some(CostingWarning::UnparsedTierSize {
                        tier: tier.index,
                        size: name.to_string(),
                    });

                    TierSize::fallback()
                })
            })
        });

        let volume_ml = match (tier.volume_ml, size) {
            (Some(volume), _) if volume <= Decimal::ZERO => {
                return Err(CostingError::InvalidTierVolume {
                    tier: tier.index,
                    volume,
                });
            }
            (Some(volume), _) => volume,
            (None, Some(size)) => match tier_volume_ml(&size, settings) {
                volume if volume > Decimal::ZERO => volume,
                volume => return Err(CostingError::InvalidTierVolume { tier: tier.index, volume }),
            },
            (None, None) => return Err(CostingError::MissingTierSize { tier: tier.index }),
        };

        let assembly_minutes = match tier.assembly_minutes {
            Some(minutes) if minutes < Decimal::ZERO => {
                return Err(CostingError::NegativeAmount {
                    field: "assembly minutes",
                });
            }
            Some(minutes) => minutes,
            None => Decimal::from(
                size.map_or(DEFAULT_ASSEMBLY_MINUTES, |size| {
                    assembly_minutes(size.diameter_in)
                }),
            ),
        };

        Ok(Self {
            size,
            volume_ml,
            height_in: tier
                .height_cm
                .map_or_else(|| settings.tier_height_in(), cm_to_inches),
            assembly_minutes,
            warning,
        })
    }

    /// Batter and buttercream estimates, when the tier has a size.
    pub(crate) fn production(
        &self,
        complexity: Complexity,
        settings: &GeometrySettings,
    ) -> (Option<BatterEstimate>, Option<ButtercreamEstimate>) {
        let Some(size) = self.size else {
            return (None, None);
        };

        (
            Some(batter_for_tier(&size, settings)),
            Some(buttercream_for_tier(&size, complexity, self.height_in, settings)),
        )
    }
}
