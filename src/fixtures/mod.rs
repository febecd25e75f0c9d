//! Fixtures
//!
//! Loads a catalog, settings, orders and quotes from YAML files under a fixtures directory:
//!
//! - `catalog/<set>.yml`
//! - `settings/<set>.yml` (optional; defaults apply when absent)
//! - `orders/<set>.yml`
//! - `quotes/<set>.yml` (optional)
//!
//! Amounts are written as strings (`"0.02"`, `"70%"`) and parsed into exact decimals.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    catalog::{CostingCatalog, DeliveryZoneKey, IngredientKey, RecipeKey, TechniqueKey},
    costing::{CostingError, CostingResult},
    settings::CostingSettings,
    snapshot::{CostingSnapshot, Order, Quote},
};

pub mod catalog;
pub mod settings;
pub mod snapshot;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error, including unknown fields and enum values
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid decimal amount
    #[error("Invalid decimal amount: {0}")]
    InvalidDecimal(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Complexity level outside 1 to 3
    #[error("Invalid complexity level: {0}")]
    InvalidComplexity(u8),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Recipe not found
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    /// Ingredient not found
    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    /// Decoration technique not found
    #[error("Decoration technique not found: {0}")]
    TechniqueNotFound(String),

    /// Delivery zone not found
    #[error("Delivery zone not found: {0}")]
    DeliveryZoneNotFound(String),

    /// Order not found
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Quote not found
    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    /// Costing a loaded order or quote failed
    #[error("Failed to cost fixture: {0}")]
    Costing(#[from] CostingError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: CostingCatalog,
    settings: CostingSettings,

    /// String key -> catalog key mappings for lookups
    recipe_keys: FxHashMap<String, RecipeKey>,
    ingredient_keys: FxHashMap<String, IngredientKey>,
    technique_keys: FxHashMap<String, TechniqueKey>,
    zone_keys: FxHashMap<String, DeliveryZoneKey>,

    orders: FxHashMap<String, Order>,
    quotes: FxHashMap<String, Quote>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: CostingCatalog::default(),
            settings: CostingSettings::default(),
            recipe_keys: FxHashMap::default(),
            ingredient_keys: FxHashMap::default(),
            technique_keys: FxHashMap::default(),
            zone_keys: FxHashMap::default(),
            orders: FxHashMap::default(),
            quotes: FxHashMap::default(),
        }
    }

    /// Load a complete fixture set (catalog, settings, orders and quotes with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// Settings and quotes are optional; the catalog and orders are not.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_catalog(name)?;

        if fixture.file_path("settings", name).exists() {
            fixture.load_settings(name)?;
        }

        fixture.load_orders(name)?;

        if fixture.file_path("quotes", name).exists() {
            fixture.load_quotes(name)?;
        }

        Ok(fixture)
    }

    /// Path of a fixture file
    fn file_path(&self, kind: &str, name: &str) -> PathBuf {
        self.base_path.join(kind).join(format!("{name}.yml"))
    }

    /// Base path for fixture files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Loaded catalog
    pub fn catalog(&self) -> &CostingCatalog {
        &self.catalog
    }

    /// Loaded settings
    pub fn settings(&self) -> &CostingSettings {
        &self.settings
    }

    /// Get a recipe key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe is not found.
    pub fn recipe_key(&self, key: &str) -> Result<RecipeKey, FixtureError> {
        self.recipe_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::RecipeNotFound(key.to_string()))
    }

    /// Get an ingredient key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the ingredient is not found.
    pub fn ingredient_key(&self, key: &str) -> Result<IngredientKey, FixtureError> {
        self.ingredient_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::IngredientNotFound(key.to_string()))
    }

    /// Get a decoration technique key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the technique is not found.
    pub fn technique_key(&self, key: &str) -> Result<TechniqueKey, FixtureError> {
        self.technique_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::TechniqueNotFound(key.to_string()))
    }

    /// Get a delivery zone key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the zone is not found.
    pub fn zone_key(&self, key: &str) -> Result<DeliveryZoneKey, FixtureError> {
        self.zone_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::DeliveryZoneNotFound(key.to_string()))
    }

    /// Get an order by its reference
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found.
    pub fn order(&self, reference: &str) -> Result<&Order, FixtureError> {
        self.orders
            .get(reference)
            .ok_or_else(|| FixtureError::OrderNotFound(reference.to_string()))
    }

    /// Get a quote by its reference
    ///
    /// # Errors
    ///
    /// Returns an error if the quote is not found.
    pub fn quote(&self, reference: &str) -> Result<&Quote, FixtureError> {
        self.quotes
            .get(reference)
            .ok_or_else(|| FixtureError::QuoteNotFound(reference.to_string()))
    }

    /// Order references, sorted
    pub fn order_references(&self) -> Vec<&str> {
        let mut references: Vec<&str> = self.orders.keys().map(String::as_str).collect();

        references.sort_unstable();

        references
    }

    /// Quote references, sorted
    pub fn quote_references(&self) -> Vec<&str> {
        let mut references: Vec<&str> = self.quotes.keys().map(String::as_str).collect();

        references.sort_unstable();

        references
    }

    /// Cost an order against the loaded catalog and settings
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or cannot be costed.
    pub fn cost_order(&self, reference: &str) -> Result<CostingResult, FixtureError> {
        Ok(self.order(reference)?.cost(&self.catalog, &self.settings)?)
    }

    /// Cost a quote against the loaded catalog and settings
    ///
    /// # Errors
    ///
    /// Returns an error if the quote is not found or cannot be costed.
    pub fn cost_quote(&self, reference: &str) -> Result<CostingResult, FixtureError> {
        Ok(self.quote(reference)?.cost(&self.catalog, &self.settings)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a decimal amount string (e.g., "0.02")
///
/// # Errors
///
/// Returns an error if the string is not a decimal number.
pub fn parse_decimal(s: &str) -> Result<Decimal, FixtureError> {
    Decimal::from_str(s.trim()).map_err(|_err| FixtureError::InvalidDecimal(s.to_string()))
}

/// Parse an optional decimal amount string
///
/// # Errors
///
/// Returns an error if the string is present and not a decimal number.
pub fn parse_optional_decimal(s: Option<&str>) -> Result<Option<Decimal>, FixtureError> {
    s.map(parse_decimal).transpose()
}

/// Parse a percentage string in percent points (e.g., "70%" or "70")
///
/// # Errors
///
/// Returns an error if the string is not a number of percent points.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let points = s.trim().trim_end_matches('%').trim_end();

    Decimal::from_str(points)
        .map(|points| Percentage::from(points / Decimal::ONE_HUNDRED))
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))
}
