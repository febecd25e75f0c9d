//! Catalog Fixtures

use std::fs;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    catalog::{
        CostingCatalog, DecorationTechnique, DecorationUnit, DeliveryZone, Ingredient, Recipe,
        RecipeKind,
    },
    fixtures::{Fixture, FixtureError, parse_decimal, parse_optional_decimal},
};

/// Catalog file from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFixture {
    /// ISO currency code (e.g., "USD")
    pub currency: String,

    /// Ingredient key -> ingredient
    #[serde(default)]
    pub ingredients: FxHashMap<String, IngredientFixture>,

    /// Role name -> hourly rate (e.g., "21.00")
    #[serde(default)]
    pub labor_roles: FxHashMap<String, String>,

    /// Recipes in catalog order; the first of each kind is the fallback
    #[serde(default)]
    pub recipes: Vec<RecipeFixture>,

    /// Technique key -> decoration technique
    #[serde(default)]
    pub techniques: FxHashMap<String, TechniqueFixture>,

    /// Zone key -> delivery zone
    #[serde(default)]
    pub delivery_zones: FxHashMap<String, DeliveryZoneFixture>,
}

/// Ingredient from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngredientFixture {
    /// Display name
    pub name: String,

    /// Unit of measure (e.g., "g")
    pub unit: String,

    /// Cost of one unit (e.g., "0.02")
    pub cost_per_unit: String,
}

/// Recipe from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeFixture {
    /// Key referenced by orders
    pub key: String,

    /// Display name, matched against free text
    pub name: String,

    /// Component produced
    pub kind: RecipeKind,

    /// Volume one batch yields in ml
    pub yield_ml: Option<String>,

    /// Hands-on minutes per batch
    pub labor_minutes: Option<String>,

    /// Role doing the labor
    pub labor_role: Option<String>,

    /// Ingredient lines per batch
    #[serde(default)]
    pub ingredients: Vec<RecipeLineFixture>,
}

/// Recipe ingredient line from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeLineFixture {
    /// Ingredient key
    pub ingredient: String,

    /// Quantity per batch
    pub quantity: String,
}

/// Decoration technique from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechniqueFixture {
    /// Display name
    pub name: String,

    /// Category (e.g., "Sugar Flowers")
    pub category: String,

    /// Unit the technique is priced per
    pub unit: DecorationUnit,

    /// Material cost per unit
    pub cost_per_unit: String,

    /// Labor minutes per unit
    pub labor_minutes: Option<String>,

    /// Role doing the labor
    pub labor_role: Option<String>,
}

/// Delivery zone from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryZoneFixture {
    /// Display name
    pub name: String,

    /// Flat fee
    pub base_fee: String,

    /// Fee per mile
    pub per_mile_fee: Option<String>,

    /// Typical distance for the zone
    pub distance_miles: Option<String>,
}

impl Fixture {
    /// Load a catalog from a YAML fixture file, replacing any loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the currency is unknown, an amount is
    /// malformed, or a recipe references a missing ingredient.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(self.file_path("catalog", name))?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let currency = rusty_money::iso::find(fixture.currency.trim())
            .ok_or_else(|| FixtureError::UnknownCurrency(fixture.currency.clone()))?;

        self.catalog = CostingCatalog::new(currency);
        self.recipe_keys.clear();
        self.ingredient_keys.clear();
        self.technique_keys.clear();
        self.zone_keys.clear();

        for (key, ingredient) in fixture.ingredients {
            let ingredient_key = self.catalog.add_ingredient(Ingredient::new(
                ingredient.name,
                ingredient.unit,
                parse_decimal(&ingredient.cost_per_unit)?,
            ));

            self.ingredient_keys.insert(key, ingredient_key);
        }

        for (role, rate) in fixture.labor_roles {
            self.catalog.add_labor_role(role, parse_decimal(&rate)?);
        }

        for recipe_fixture in fixture.recipes {
            let recipe = self.recipe_from_fixture(&recipe_fixture)?;
            let recipe_key = self.catalog.add_recipe(recipe);

            self.recipe_keys.insert(recipe_fixture.key, recipe_key);
        }

        for (key, technique) in fixture.techniques {
            let mut entry = DecorationTechnique::new(
                technique.name,
                technique.category,
                technique.unit,
                parse_decimal(&technique.cost_per_unit)?,
            );

            if let Some(minutes) = parse_optional_decimal(technique.labor_minutes.as_deref())? {
                entry = entry.with_labor(minutes, technique.labor_role.as_deref());
            }

            let technique_key = self.catalog.add_technique(entry);

            self.technique_keys.insert(key, technique_key);
        }

        for (key, zone) in fixture.delivery_zones {
            let per_mile_fee = parse_optional_decimal(zone.per_mile_fee.as_deref())?;
            let distance = parse_optional_decimal(zone.distance_miles.as_deref())?;

            let zone_key = self.catalog.add_delivery_zone(
                DeliveryZone::new(zone.name, parse_decimal(&zone.base_fee)?)
                    .with_mileage(per_mile_fee.unwrap_or_default(), distance),
            );

            self.zone_keys.insert(key, zone_key);
        }

        Ok(self)
    }

    fn recipe_from_fixture(&self, fixture: &RecipeFixture) -> Result<Recipe, FixtureError> {
        let mut recipe = Recipe::new(fixture.name.clone(), fixture.kind);

        if let Some(yield_ml) = parse_optional_decimal(fixture.yield_ml.as_deref())? {
            recipe = recipe.with_yield_ml(yield_ml);
        }

        if let Some(minutes) = parse_optional_decimal(fixture.labor_minutes.as_deref())? {
            recipe = recipe.with_labor(minutes, fixture.labor_role.as_deref());
        }

        for line in &fixture.ingredients {
            recipe = recipe.with_line(
                self.ingredient_key(&line.ingredient)?,
                parse_decimal(&line.quantity)?,
            );
        }

        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn write_catalog(dir: &Path, contents: &str) -> TestResult {
        fs::create_dir_all(dir.join("catalog"))?;
        fs::write(dir.join("catalog").join("test.yml"), contents)?;

        Ok(())
    }

    #[test]
    fn loads_recipes_in_declared_order() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_catalog(
            dir.path(),
            r#"
currency: USD
ingredients:
  flour: { name: Flour, unit: g, cost_per_unit: "0.002" }
recipes:
  - key: chocolate
    name: Chocolate Batter
    kind: batter
    yield_ml: "5000"
    ingredients:
      - { ingredient: flour, quantity: "600" }
  - key: vanilla
    name: Vanilla Batter
    kind: batter
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("test")?;

        let names: Vec<&str> = fixture
            .catalog()
            .recipes_of_kind(RecipeKind::Batter)
            .map(|(_, recipe)| recipe.name.as_str())
            .collect();

        assert_eq!(names, vec!["Chocolate Batter", "Vanilla Batter"]);

        let chocolate = fixture.catalog().recipe(fixture.recipe_key("chocolate")?);

        assert_eq!(
            chocolate.and_then(|recipe| recipe.yield_volume_ml),
            Some(Decimal::new(5000, 0))
        );

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_catalog(dir.path(), "currency: XXQ\n")?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_catalog("test");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(_))));

        Ok(())
    }

    #[test]
    fn recipe_with_unknown_ingredient_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_catalog(
            dir.path(),
            r#"
currency: USD
recipes:
  - key: vanilla
    name: Vanilla Batter
    kind: batter
    ingredients:
      - { ingredient: sugar, quantity: "100" }
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_catalog("test");

        assert!(matches!(result, Err(FixtureError::IngredientNotFound(_))));

        Ok(())
    }

    #[test]
    fn invalid_recipe_kind_is_a_yaml_error() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_catalog(
            dir.path(),
            r#"
currency: USD
recipes:
  - key: jam
    name: Jam
    kind: spread
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_catalog("test");

        assert!(matches!(result, Err(FixtureError::Yaml(_))));

        Ok(())
    }
}
