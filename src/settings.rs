//! Settings
//!
//! Tunable constants of the costing engine. Every field has a default, so
//! [`CostingSettings::default`] is a complete configuration; the fixture loader can override any
//! of them from YAML.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::catalog::RecipeKind;

/// Physical constants used by the geometry calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySettings {
    /// Baked layers stacked in one tier
    pub layers_per_tier: u32,

    /// Height of one baked layer in inches
    pub layer_height_in: f64,

    /// Baked volume as a fraction of batter volume
    pub shrinkage_factor: f64,

    /// Batter density in grams per cubic inch
    pub batter_grams_per_cubic_inch: f64,

    /// Internal buttercream for a 6" tier, in grams
    pub buttercream_internal_grams: f64,

    /// Crumb coat coverage in grams per square inch
    pub crumb_coat_grams_per_sq_in: f64,
}

impl GeometrySettings {
    /// Height of a finished tier in inches.
    pub fn tier_height_in(&self) -> f64 {
        self.layer_height_in * f64::from(self.layers_per_tier)
    }
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            layers_per_tier: 3,
            layer_height_in: 2.5,
            shrinkage_factor: 0.9,
            batter_grams_per_cubic_inch: 8.0,
            buttercream_internal_grams: 340.0,
            crumb_coat_grams_per_sq_in: 1.2,
        }
    }
}

/// Fraction of a tier's volume each recipe kind has to fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeFactors {
    /// Batter fills the whole tier
    pub batter: Decimal,

    /// Thin interior filling layers
    pub filling: Decimal,

    /// Frosting for full surface coverage
    pub frosting: Decimal,
}

impl VolumeFactors {
    /// Factor for the given recipe kind.
    pub fn for_kind(&self, kind: RecipeKind) -> Decimal {
        match kind {
            RecipeKind::Batter => self.batter,
            RecipeKind::Filling => self.filling,
            RecipeKind::Frosting => self.frosting,
        }
    }
}

impl Default for VolumeFactors {
    fn default() -> Self {
        Self {
            batter: Decimal::ONE,
            filling: Decimal::new(12, 2),
            frosting: Decimal::new(36, 2),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CostingSettings {
    /// Geometry constants
    pub geometry: GeometrySettings,

    /// Volume factors per recipe kind
    pub volume_factors: VolumeFactors,

    /// Markup applied when the order carries none
    pub default_markup: Percentage,

    /// Flat cost of any standard (non-custom) topper
    pub standard_topper_fee: Decimal,
}

impl Default for CostingSettings {
    fn default() -> Self {
        Self {
            geometry: GeometrySettings::default(),
            volume_factors: VolumeFactors::default(),
            default_markup: Percentage::from(Decimal::new(70, 2)),
            standard_topper_fee: Decimal::new(5, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_volume_factors() {
        let factors = VolumeFactors::default();

        assert_eq!(factors.for_kind(RecipeKind::Batter), Decimal::ONE);
        assert_eq!(factors.for_kind(RecipeKind::Filling), Decimal::new(12, 2));
        assert_eq!(factors.for_kind(RecipeKind::Frosting), Decimal::new(36, 2));
    }

    #[test]
    fn default_tier_height_is_layers_times_layer_height() {
        let geometry = GeometrySettings::default();

        assert!((geometry.tier_height_in() - 7.5).abs() < f64::EPSILON);
    }
}
