//! Settings Fixtures

use std::fs;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::{Fixture, FixtureError, parse_decimal, parse_percentage},
    settings::{CostingSettings, GeometrySettings, VolumeFactors},
};

/// Settings file from YAML; every field is optional and overrides the default
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFixture {
    /// Geometry constants
    #[serde(default)]
    pub geometry: GeometryFixture,

    /// Volume factors per recipe kind (e.g., "0.12")
    #[serde(default)]
    pub volume_factors: VolumeFactorsFixture,

    /// Markup used when an order has none (e.g., "70%")
    pub default_markup: Option<String>,

    /// Flat fee of a standard topper (e.g., "5.00")
    pub standard_topper_fee: Option<String>,
}

/// Geometry overrides from YAML
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometryFixture {
    /// Layers per tier
    pub layers_per_tier: Option<u32>,

    /// Layer height in inches
    pub layer_height_in: Option<f64>,

    /// Baked volume as a fraction of batter volume
    pub shrinkage_factor: Option<f64>,

    /// Batter grams per cubic inch
    pub batter_grams_per_cubic_inch: Option<f64>,

    /// Internal buttercream grams for a 6" tier
    pub buttercream_internal_grams: Option<f64>,

    /// Crumb coat grams per square inch
    pub crumb_coat_grams_per_sq_in: Option<f64>,
}

/// Volume factor overrides from YAML
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumeFactorsFixture {
    /// Batter factor
    pub batter: Option<String>,

    /// Filling factor
    pub filling: Option<String>,

    /// Frosting factor
    pub frosting: Option<String>,
}

impl SettingsFixture {
    /// Apply the overrides to the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an amount or percentage is malformed.
    pub fn into_settings(self) -> Result<CostingSettings, FixtureError> {
        let defaults = CostingSettings::default();
        let geometry = self.geometry.apply(defaults.geometry);
        let volume_factors = self.volume_factors.apply(defaults.volume_factors)?;

        let default_markup = match self.default_markup.as_deref() {
            Some(markup) => parse_percentage(markup)?,
            None => defaults.default_markup,
        };

        let standard_topper_fee = match self.standard_topper_fee.as_deref() {
            Some(fee) => parse_decimal(fee)?,
            None => defaults.standard_topper_fee,
        };

        Ok(CostingSettings {
            geometry,
            volume_factors,
            default_markup,
            standard_topper_fee,
        })
    }
}

impl GeometryFixture {
    fn apply(self, defaults: GeometrySettings) -> GeometrySettings {
        GeometrySettings {
            layers_per_tier: self.layers_per_tier.unwrap_or(defaults.layers_per_tier),
            layer_height_in: self.layer_height_in.unwrap_or(defaults.layer_height_in),
            shrinkage_factor: self.shrinkage_factor.unwrap_or(defaults.shrinkage_factor),
            batter_grams_per_cubic_inch: self
                .batter_grams_per_cubic_inch
                .unwrap_or(defaults.batter_grams_per_cubic_inch),
            buttercream_internal_grams: self
                .buttercream_internal_grams
                .unwrap_or(defaults.buttercream_internal_grams),
            crumb_coat_grams_per_sq_in: self
                .crumb_coat_grams_per_sq_in
                .unwrap_or(defaults.crumb_coat_grams_per_sq_in),
        }
    }
}

impl VolumeFactorsFixture {
    fn apply(self, defaults: VolumeFactors) -> Result<VolumeFactors, FixtureError> {
        let factor = |value: Option<String>, default: Decimal| {
            value.as_deref().map_or(Ok(default), parse_decimal)
        };

        Ok(VolumeFactors {
            batter: factor(self.batter, defaults.batter)?,
            filling: factor(self.filling, defaults.filling)?,
            frosting: factor(self.frosting, defaults.frosting)?,
        })
    }
}

impl Fixture {
    /// Load settings from a YAML fixture file, replacing any loaded settings
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an amount is malformed.
    pub fn load_settings(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(self.file_path("settings", name))?;
        let fixture: SettingsFixture = serde_norway::from_str(&contents)?;

        self.settings = fixture.into_settings()?;

        Ok(self)
    }
}
