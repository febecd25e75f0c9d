//! Costing result

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};

use crate::{
    costing::{CostingError, CostingWarning, TierCosting},
    decorations::DecorationCost,
    ingredients::IngredientCost,
    labor::LaborLine,
    pricing::{CostSubtotals, PriceBreakdown, round_money},
};

/// Converts an amount to money, rounding to cents.
///
/// # Errors
///
/// Returns [`CostingError::MoneyOverflow`] if the amount does not fit in minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, CostingError> {
    let minor = round_money(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .ok_or(CostingError::MoneyOverflow(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Unrounded pieces of a calculation, before they become a [`CostingResult`].
#[derive(Debug)]
pub(crate) struct CostingParts {
    pub(crate) currency: &'static Currency,
    pub(crate) tiers: Vec<TierCosting>,
    pub(crate) ingredients: Vec<IngredientCost>,
    pub(crate) decorations: Vec<DecorationCost>,
    pub(crate) labor: Vec<LaborLine>,
    pub(crate) subtotals: CostSubtotals,
    pub(crate) decoration_labor: Decimal,
    pub(crate) base_labor: Decimal,
    pub(crate) prices: PriceBreakdown,
    pub(crate) total_servings: u32,
    pub(crate) warnings: Vec<CostingWarning>,
}

/// Everything a calculation produced: itemised lines, subtotals, prices and warnings.
///
/// Money is rounded to cents here and nowhere earlier.
#[derive(Debug, Clone)]
pub struct CostingResult {
    currency: &'static Currency,
    tiers: Vec<TierCosting>,
    ingredients: Vec<IngredientCost>,
    decorations: Vec<DecorationCost>,
    labor: Vec<LaborLine>,
    ingredient_cost: Money<'static, Currency>,
    decoration_material_cost: Money<'static, Currency>,
    decoration_labor_cost: Money<'static, Currency>,
    topper_cost: Money<'static, Currency>,
    base_labor_cost: Money<'static, Currency>,
    total_labor_cost: Money<'static, Currency>,
    delivery_cost: Money<'static, Currency>,
    total_cost_before_delivery: Money<'static, Currency>,
    total_cost: Money<'static, Currency>,
    markup: Percentage,
    suggested_price: Money<'static, Currency>,
    discount_amount: Money<'static, Currency>,
    final_price: Money<'static, Currency>,
    cost_per_serving: Money<'static, Currency>,
    suggested_price_per_serving: Money<'static, Currency>,
    total_servings: u32,
    warnings: Vec<CostingWarning>,
}

impl CostingResult {
    /// Rounds every line and subtotal to cents.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if any amount does not fit in minor units.
    pub(crate) fn from_parts(parts: CostingParts) -> Result<Self, CostingError> {
        let CostingParts {
            currency,
            tiers,
            mut ingredients,
            mut decorations,
            mut labor,
            subtotals,
            decoration_labor,
            base_labor,
            prices,
            total_servings,
            warnings,
        } = parts;

        for line in &mut ingredients {
            line.cost = round_money(line.cost);
        }

        for line in &mut decorations {
            line.material_cost = round_money(line.material_cost);
            line.labor_cost = round_money(line.labor_cost);
        }

        for line in &mut labor {
            line.cost = round_money(line.cost);
        }

        let money = |amount: Decimal| to_money(amount, currency);

        Ok(Self {
            currency,
            tiers,
            ingredients,
            decorations,
            labor,
            ingredient_cost: money(subtotals.ingredients)?,
            decoration_material_cost: money(subtotals.decoration_materials)?,
            decoration_labor_cost: money(decoration_labor)?,
            topper_cost: money(subtotals.topper)?,
            base_labor_cost: money(base_labor)?,
            total_labor_cost: money(subtotals.total_labor)?,
            delivery_cost: money(prices.delivery)?,
            total_cost_before_delivery: money(prices.total_cost_before_delivery)?,
            total_cost: money(prices.total_cost)?,
            markup: prices.markup,
            suggested_price: money(prices.suggested_price)?,
            discount_amount: money(prices.discount_amount)?,
            final_price: money(prices.final_price)?,
            cost_per_serving: money(prices.cost_per_serving)?,
            suggested_price_per_serving: money(prices.suggested_price_per_serving)?,
            total_servings,
            warnings,
        })
    }

    /// Currency of every amount
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// How each tier was costed
    pub fn tiers(&self) -> &[TierCosting] {
        &self.tiers
    }

    /// Ingredient lines in first-use order
    pub fn ingredients(&self) -> &[IngredientCost] {
        &self.ingredients
    }

    /// Decoration lines in order
    pub fn decorations(&self) -> &[DecorationCost] {
        &self.decorations
    }

    /// Labor lines by role
    pub fn labor(&self) -> &[LaborLine] {
        &self.labor
    }

    /// Ingredients across all recipes
    pub fn ingredient_cost(&self) -> Money<'static, Currency> {
        self.ingredient_cost
    }

    /// Decoration materials
    pub fn decoration_material_cost(&self) -> Money<'static, Currency> {
        self.decoration_material_cost
    }

    /// Decoration labor
    pub fn decoration_labor_cost(&self) -> Money<'static, Currency> {
        self.decoration_labor_cost
    }

    /// Topper
    pub fn topper_cost(&self) -> Money<'static, Currency> {
        self.topper_cost
    }

    /// Recipe, assembly and manual labor
    pub fn base_labor_cost(&self) -> Money<'static, Currency> {
        self.base_labor_cost
    }

    /// Base plus decoration labor
    pub fn total_labor_cost(&self) -> Money<'static, Currency> {
        self.total_labor_cost
    }

    /// Delivery fee
    pub fn delivery_cost(&self) -> Money<'static, Currency> {
        self.delivery_cost
    }

    /// Cost excluding delivery
    pub fn total_cost_before_delivery(&self) -> Money<'static, Currency> {
        self.total_cost_before_delivery
    }

    /// Cost including delivery
    pub fn total_cost(&self) -> Money<'static, Currency> {
        self.total_cost
    }

    /// Markup applied
    pub fn markup(&self) -> Percentage {
        self.markup
    }

    /// Marked-up price before discount and delivery
    pub fn suggested_price(&self) -> Money<'static, Currency> {
        self.suggested_price
    }

    /// Discount taken off the suggested price
    pub fn discount_amount(&self) -> Money<'static, Currency> {
        self.discount_amount
    }

    /// Price charged: suggested price less discount plus delivery
    pub fn final_price(&self) -> Money<'static, Currency> {
        self.final_price
    }

    /// Total cost per serving
    pub fn cost_per_serving(&self) -> Money<'static, Currency> {
        self.cost_per_serving
    }

    /// Final price per serving
    pub fn suggested_price_per_serving(&self) -> Money<'static, Currency> {
        self.suggested_price_per_serving
    }

    /// Servings across all tiers
    pub fn total_servings(&self) -> u32 {
        self.total_servings
    }

    /// Gaps that were priced around
    pub fn warnings(&self) -> &[CostingWarning] {
        &self.warnings
    }
}
