//! Catalog
//!
//! The read-only snapshot of recipes, ingredients, labor roles, decoration techniques and
//! delivery zones a calculation runs against. Callers fetch it once and pass it in; the engine
//! never loads catalog data itself.

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

mod decorations;

pub use decorations::{DecorationTechnique, DecorationUnit, DeliveryZone};

new_key_type! {
    /// Recipe Key
    pub struct RecipeKey;

    /// Ingredient Key
    pub struct IngredientKey;

    /// Decoration Technique Key
    pub struct TechniqueKey;

    /// Delivery Zone Key
    pub struct DeliveryZoneKey;
}

/// The component of a tier a recipe produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeKind {
    /// Cake batter
    Batter,

    /// Filling between layers
    Filling,

    /// Outer frosting
    Frosting,
}

impl RecipeKind {
    /// All kinds, in resolution order.
    pub const ALL: [RecipeKind; 3] = [
        RecipeKind::Batter,
        RecipeKind::Filling,
        RecipeKind::Frosting,
    ];

    /// Lowercase kind name.
    pub fn as_str(self) -> &'static str {
        match self {
            RecipeKind::Batter => "batter",
            RecipeKind::Filling => "filling",
            RecipeKind::Frosting => "frosting",
        }
    }
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ingredient line of a recipe, per single yield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeLine {
    /// Ingredient used
    pub ingredient: IngredientKey,

    /// Quantity in the ingredient's unit
    pub quantity: Decimal,
}

/// Recipe
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Recipe name
    pub name: String,

    /// Component this recipe produces
    pub kind: RecipeKind,

    /// Volume one batch yields; recipes without one cannot be volume-scaled
    pub yield_volume_ml: Option<Decimal>,

    /// Hands-on minutes per batch
    pub labor_minutes: Option<Decimal>,

    /// Role doing the labor, Baker when unset
    pub labor_role: Option<String>,

    /// Ingredient lines per batch
    pub lines: SmallVec<[RecipeLine; 8]>,
}

impl Recipe {
    /// Creates a recipe with no yield, labor or ingredients.
    pub fn new(name: impl Into<String>, kind: RecipeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            yield_volume_ml: None,
            labor_minutes: None,
            labor_role: None,
            lines: SmallVec::new(),
        }
    }

    /// Sets the batch yield volume.
    #[must_use]
    pub fn with_yield_ml(mut self, yield_volume_ml: Decimal) -> Self {
        self.yield_volume_ml = Some(yield_volume_ml);
        self
    }

    /// Sets the batch labor.
    #[must_use]
    pub fn with_labor(mut self, minutes: Decimal, role: Option<&str>) -> Self {
        self.labor_minutes = Some(minutes);
        self.labor_role = role.map(str::to_string);
        self
    }

    /// Adds an ingredient line.
    #[must_use]
    pub fn with_line(mut self, ingredient: IngredientKey, quantity: Decimal) -> Self {
        self.lines.push(RecipeLine {
            ingredient,
            quantity,
        });
        self
    }
}

/// Ingredient
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    /// Ingredient name
    pub name: String,

    /// Unit quantities are measured in (e.g. "g")
    pub unit: String,

    /// Cost of one unit
    pub cost_per_unit: Decimal,
}

impl Ingredient {
    /// Creates an ingredient.
    pub fn new(name: impl Into<String>, unit: impl Into<String>, cost_per_unit: Decimal) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            cost_per_unit,
        }
    }
}

/// Labor role and its hourly rate.
#[derive(Debug, Clone, PartialEq)]
pub struct LaborRole {
    /// Role name, e.g. "Decorator"
    pub name: String,

    /// Cost per hour
    pub hourly_rate: Decimal,
}

/// Read-only catalog snapshot.
#[derive(Debug, Clone)]
pub struct CostingCatalog {
    currency: &'static Currency,
    recipes: SlotMap<RecipeKey, Recipe>,
    recipe_order: Vec<RecipeKey>,
    ingredients: SlotMap<IngredientKey, Ingredient>,
    labor_roles: FxHashMap<String, LaborRole>,
    techniques: SlotMap<TechniqueKey, DecorationTechnique>,
    delivery_zones: SlotMap<DeliveryZoneKey, DeliveryZone>,
}

impl CostingCatalog {
    /// Creates an empty catalog priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            recipes: SlotMap::with_key(),
            recipe_order: Vec::new(),
            ingredients: SlotMap::with_key(),
            labor_roles: FxHashMap::default(),
            techniques: SlotMap::with_key(),
            delivery_zones: SlotMap::with_key(),
        }
    }

    /// Currency all catalog prices are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Adds a recipe. Recipes keep the order they were added in.
    pub fn add_recipe(&mut self, recipe: Recipe) -> RecipeKey {
        let key = self.recipes.insert(recipe);

        self.recipe_order.push(key);

        key
    }

    /// Adds an ingredient.
    pub fn add_ingredient(&mut self, ingredient: Ingredient) -> IngredientKey {
        self.ingredients.insert(ingredient)
    }

    /// Adds or replaces a labor role. Role names are matched case-insensitively.
    pub fn add_labor_role(&mut self, name: impl Into<String>, hourly_rate: Decimal) {
        let name = name.into();

        self.labor_roles
            .insert(name.to_lowercase(), LaborRole { name, hourly_rate });
    }

    /// Adds a decoration technique.
    pub fn add_technique(&mut self, technique: DecorationTechnique) -> TechniqueKey {
        self.techniques.insert(technique)
    }

    /// Adds a delivery zone.
    pub fn add_delivery_zone(&mut self, zone: DeliveryZone) -> DeliveryZoneKey {
        self.delivery_zones.insert(zone)
    }

    /// Looks up a recipe.
    pub fn recipe(&self, key: RecipeKey) -> Option<&Recipe> {
        self.recipes.get(key)
    }

    /// Recipes of one kind, in the order they were added.
    pub fn recipes_of_kind(
        &self,
        kind: RecipeKind,
    ) -> impl Iterator<Item = (RecipeKey, &Recipe)> + '_ {
        self.recipe_order
            .iter()
            .filter_map(|&key| self.recipes.get(key).map(|recipe| (key, recipe)))
            .filter(move |(_, recipe)| recipe.kind == kind)
    }

    /// Looks up an ingredient.
    pub fn ingredient(&self, key: IngredientKey) -> Option<&Ingredient> {
        self.ingredients.get(key)
    }

    /// Looks up a labor role by name.
    pub fn labor_role(&self, name: &str) -> Option<&LaborRole> {
        self.labor_roles.get(&name.to_lowercase())
    }

    /// Looks up a decoration technique.
    pub fn technique(&self, key: TechniqueKey) -> Option<&DecorationTechnique> {
        self.techniques.get(key)
    }

    /// Looks up a delivery zone.
    pub fn delivery_zone(&self, key: DeliveryZoneKey) -> Option<&DeliveryZone> {
        self.delivery_zones.get(key)
    }
}

impl Default for CostingCatalog {
    fn default() -> Self {
        Self::new(iso::USD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipes_of_kind_keep_declaration_order() {
        let mut catalog = CostingCatalog::default();

        let zesty = catalog.add_recipe(Recipe::new("Zesty Lemon Batter", RecipeKind::Batter));
        catalog.add_recipe(Recipe::new("Raspberry Filling", RecipeKind::Filling));
        let almond = catalog.add_recipe(Recipe::new("Almond Batter", RecipeKind::Batter));

        let batters: Vec<RecipeKey> = catalog
            .recipes_of_kind(RecipeKind::Batter)
            .map(|(key, _)| key)
            .collect();

        assert_eq!(batters, vec![zesty, almond]);
    }

    #[test]
    fn labor_roles_match_case_insensitively() {
        let mut catalog = CostingCatalog::default();

        catalog.add_labor_role("Decorator", Decimal::new(35, 0));

        let role = catalog.labor_role("decorator");

        assert_eq!(role.map(|role| role.hourly_rate), Some(Decimal::new(35, 0)));
        assert_eq!(role.map(|role| role.name.as_str()), Some("Decorator"));
        assert!(catalog.labor_role("Baker").is_none());
    }

    #[test]
    fn recipe_builder_collects_lines() {
        let mut catalog = CostingCatalog::default();
        let flour = catalog.add_ingredient(Ingredient::new("Flour", "g", Decimal::new(2, 3)));

        let recipe = Recipe::new("Vanilla Batter", RecipeKind::Batter)
            .with_yield_ml(Decimal::new(6000, 0))
            .with_labor(Decimal::new(30, 0), Some("Baker"))
            .with_line(flour, Decimal::new(1500, 0));

        assert_eq!(recipe.lines.len(), 1);
        assert_eq!(recipe.labor_role.as_deref(), Some("Baker"));
        assert_eq!(recipe.yield_volume_ml, Some(Decimal::new(6000, 0)));
    }
}
