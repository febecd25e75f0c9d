//! Ingredient aggregation
//!
//! Scales every resolved recipe's ingredient lines and merges them across recipes and tiers into
//! one line per ingredient. Costs stay unrounded here; rounding happens once, on the result.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::{
    catalog::{CostingCatalog, IngredientKey, Recipe},
    costing::CostingError,
    pricing::{money_add, money_mul, money_sum},
};

/// Total use of one ingredient across the order.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientCost {
    /// Ingredient
    pub ingredient: IngredientKey,

    /// Ingredient name
    pub name: String,

    /// Unit the quantity is measured in
    pub unit: String,

    /// Total quantity
    pub quantity: Decimal,

    /// Cost of one unit
    pub cost_per_unit: Decimal,

    /// Quantity times unit cost
    pub cost: Decimal,
}

/// Accumulates scaled ingredient quantities, keeping first-seen order.
#[derive(Debug, Default)]
pub struct IngredientAggregator {
    positions: FxHashMap<IngredientKey, usize>,
    totals: Vec<(IngredientKey, Decimal)>,
}

impl IngredientAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every line of `recipe`, scaled by `multiplier`.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if a scaled quantity does not fit in a `Decimal`.
    pub fn add_recipe(&mut self, recipe: &Recipe, multiplier: Decimal) -> Result<(), CostingError> {
        for line in &recipe.lines {
            self.add(line.ingredient, money_mul(line.quantity, multiplier)?)?;
        }

        Ok(())
    }

    /// Adds a quantity of one ingredient.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if the running total does not fit in a `Decimal`.
    pub fn add(
        &mut self,
        ingredient: IngredientKey,
        quantity: Decimal,
    ) -> Result<(), CostingError> {
        if let Some(total) = self
            .positions
            .get(&ingredient)
            .and_then(|&idx| self.totals.get_mut(idx))
        {
            total.1 = money_add(total.1, quantity)?;
            return Ok(());
        }

        self.positions.insert(ingredient, self.totals.len());
        self.totals.push((ingredient, quantity));

        Ok(())
    }

    /// Prices the accumulated quantities.
    ///
    /// # Errors
    ///
    /// - [`CostingError::UnknownIngredient`]: a recipe line references an ingredient missing from
    ///   the catalog.
    /// - [`CostingError::MoneyOverflow`]: a line cost does not fit in a `Decimal`.
    pub fn finish(self, catalog: &CostingCatalog) -> Result<Vec<IngredientCost>, CostingError> {
        self.totals
            .into_iter()
            .map(|(key, quantity)| {
                let ingredient = catalog
                    .ingredient(key)
                    .ok_or(CostingError::UnknownIngredient(key))?;

                Ok(IngredientCost {
                    ingredient: key,
                    name: ingredient.name.clone(),
                    unit: ingredient.unit.clone(),
                    quantity,
                    cost_per_unit: ingredient.cost_per_unit,
                    cost: money_mul(quantity, ingredient.cost_per_unit)?,
                })
            })
            .collect()
    }
}

/// Sum of all ingredient line costs.
///
/// # Errors
///
/// Returns [`CostingError::MoneyOverflow`] if the sum does not fit in a `Decimal`.
pub fn total_cost(lines: &[IngredientCost]) -> Result<Decimal, CostingError> {
    money_sum(lines.iter().map(|line| line.cost))
}
