//! Pricing
//!
//! Combines the order's cost subtotals into a suggested and final price. The order of operations
//! is fixed:
//!
//! 1. total cost before delivery = ingredients + decoration materials + topper + all labor
//! 2. suggested price = total cost before delivery marked up
//! 3. total cost = total cost before delivery + delivery (delivery is never marked up)
//! 4. discount = a share of the suggested price, or a fixed amount
//! 5. final price = suggested price - discount + delivery (delivery is never discounted)
//! 6. per-serving figures
//!
//! Suggested price, discount and delivery are rounded to cents before step 5, so the final price
//! identity holds exactly on the reported figures.
//!
//! Amounts come from unbounded input, so every product and sum goes through [`money_mul`],
//! [`money_add`] or [`money_sum`], which report [`CostingError::MoneyOverflow`] instead of
//! panicking.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    costing::CostingError,
    snapshot::{Discount, DiscountKind},
};

/// Rounds a money amount to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `amount * factor`.
///
/// # Errors
///
/// Returns [`CostingError::MoneyOverflow`] if the product does not fit in a `Decimal`.
pub fn money_mul(amount: Decimal, factor: Decimal) -> Result<Decimal, CostingError> {
    amount
        .checked_mul(factor)
        .ok_or(CostingError::MoneyOverflow(amount))
}

/// `amount + other`.
///
/// # Errors
///
/// Returns [`CostingError::MoneyOverflow`] if the sum does not fit in a `Decimal`.
pub fn money_add(amount: Decimal, other: Decimal) -> Result<Decimal, CostingError> {
    amount
        .checked_add(other)
        .ok_or(CostingError::MoneyOverflow(amount))
}

/// Sum of `amounts`.
///
/// # Errors
///
/// Returns [`CostingError::MoneyOverflow`] if the running total does not fit in a `Decimal`.
pub fn money_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, CostingError> {
    amounts.into_iter().try_fold(Decimal::ZERO, money_add)
}

/// Unrounded cost subtotals of an order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostSubtotals {
    /// Ingredients across all recipes
    pub ingredients: Decimal,

    /// Decoration materials
    pub decoration_materials: Decimal,

    /// Topper
    pub topper: Decimal,

    /// All labor, decoration labor included
    pub total_labor: Decimal,

    /// Delivery
    pub delivery: Decimal,
}

impl CostSubtotals {
    /// Everything except delivery.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if the sum does not fit in a `Decimal`.
    pub fn before_delivery(&self) -> Result<Decimal, CostingError> {
        money_sum([
            self.ingredients,
            self.decoration_materials,
            self.topper,
            self.total_labor,
        ])
    }
}

/// Prices derived from the subtotals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    /// Cost before delivery, unrounded
    pub total_cost_before_delivery: Decimal,

    /// Cost including delivery, unrounded
    pub total_cost: Decimal,

    /// Markup applied
    pub markup: Percentage,

    /// Marked-up price, rounded to cents
    pub suggested_price: Decimal,

    /// Discount taken off the suggested price, rounded to cents
    pub discount_amount: Decimal,

    /// Delivery charged on top, rounded to cents
    pub delivery: Decimal,

    /// Price charged, rounded to cents
    pub final_price: Decimal,

    /// Total cost per serving, rounded to cents
    pub cost_per_serving: Decimal,

    /// Final price per serving, rounded to cents
    pub suggested_price_per_serving: Decimal,
}

/// Turns subtotals into prices.
#[derive(Debug, Clone, Copy)]
pub struct PriceAssembler {
    markup: Percentage,
}

impl PriceAssembler {
    /// Creates an assembler applying `markup`, e.g. 70% for a price 1.7 times cost.
    pub fn new(markup: Percentage) -> Self {
        Self { markup }
    }

    /// Applies markup, discount and delivery to the subtotals.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if an intermediate amount does not fit in a
    /// `Decimal`.
    pub fn assemble(
        &self,
        subtotals: &CostSubtotals,
        discount: Option<&Discount>,
        servings: u32,
    ) -> Result<PriceBreakdown, CostingError> {
        let total_cost_before_delivery = subtotals.before_delivery()?;
        let markup = money_add(Decimal::ONE, self.markup * Decimal::ONE)?;

        let suggested_price = round_money(money_mul(total_cost_before_delivery, markup)?);
        let total_cost = money_add(total_cost_before_delivery, subtotals.delivery)?;
        let discount_amount = discount
            .map(|discount| discount_amount(suggested_price, discount))
            .transpose()?
            .unwrap_or(Decimal::ZERO);
        let delivery = round_money(subtotals.delivery);

        // Both operands are non-negative, so only the addition can overflow.
        let final_price = money_add(suggested_price - discount_amount, delivery)?;

        Ok(PriceBreakdown {
            total_cost_before_delivery,
            total_cost,
            markup: self.markup,
            suggested_price,
            discount_amount,
            delivery,
            final_price,
            cost_per_serving: per_serving(total_cost, servings),
            suggested_price_per_serving: per_serving(final_price, servings),
        })
    }
}

/// Discount on a suggested price, rounded to cents.
///
/// # Errors
///
/// Returns [`CostingError::MoneyOverflow`] if a percent discount does not fit in a `Decimal`.
pub fn discount_amount(
    suggested_price: Decimal,
    discount: &Discount,
) -> Result<Decimal, CostingError> {
    match discount.kind {
        DiscountKind::Percent => Ok(round_money(
            money_mul(suggested_price, discount.value)? / Decimal::ONE_HUNDRED,
        )),
        DiscountKind::Fixed => Ok(round_money(discount.value)),
    }
}

fn per_serving(amount: Decimal, servings: u32) -> Decimal {
    if servings == 0 {
        return Decimal::ZERO;
    }

    round_money(amount / Decimal::from(servings))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn markup(percent: i64) -> Percentage {
        Percentage::from(Decimal::new(percent, 2))
    }

    fn subtotals() -> CostSubtotals {
        CostSubtotals {
            ingredients: Decimal::new(3090, 2),
            decoration_materials: Decimal::new(1000, 2),
            topper: Decimal::new(500, 2),
            total_labor: Decimal::new(2000, 2),
            delivery: Decimal::ZERO,
        }
    }

    #[test]
    fn markup_applies_to_cost_before_delivery() -> TestResult {
        let breakdown = PriceAssembler::new(markup(50)).assemble(&subtotals(), None, 10)?;

        assert_eq!(breakdown.total_cost_before_delivery, Decimal::new(6590, 2));
        assert_eq!(breakdown.suggested_price, Decimal::new(9885, 2));
        assert_eq!(breakdown.final_price, breakdown.suggested_price);

        Ok(())
    }

    #[test]
    fn delivery_is_neither_marked_up_nor_discounted() -> TestResult {
        let subtotals = CostSubtotals {
            delivery: Decimal::new(15, 0),
            ..subtotals()
        };

        let discount = Discount::percent(Decimal::new(10, 0));
        let breakdown = PriceAssembler::new(markup(50)).assemble(&subtotals, Some(&discount), 10)?;

        // suggested 98.85, discount 9.885 -> 9.89
        assert_eq!(breakdown.suggested_price, Decimal::new(9885, 2));
        assert_eq!(breakdown.discount_amount, Decimal::new(989, 2));
        assert_eq!(breakdown.final_price, Decimal::new(10396, 2));
        assert_eq!(breakdown.total_cost, Decimal::new(8090, 2));
        assert_ne!(
            breakdown.final_price,
            breakdown.suggested_price - breakdown.discount_amount
        );

        Ok(())
    }

    #[test]
    fn fixed_discount_is_taken_verbatim() -> TestResult {
        let discount = Discount::fixed(Decimal::new(1250, 2));
        let breakdown = PriceAssembler::new(markup(0)).assemble(&subtotals(), Some(&discount), 10)?;

        assert_eq!(breakdown.suggested_price, Decimal::new(6590, 2));
        assert_eq!(breakdown.final_price, Decimal::new(5340, 2));

        Ok(())
    }

    #[test]
    fn per_serving_metrics() -> TestResult {
        let subtotals = CostSubtotals {
            delivery: Decimal::new(10, 0),
            ..subtotals()
        };

        let breakdown = PriceAssembler::new(markup(0)).assemble(&subtotals, None, 4)?;

        // total cost 75.90 / 4; final price 75.90 / 4
        assert_eq!(breakdown.cost_per_serving, Decimal::new(1898, 2));
        assert_eq!(breakdown.suggested_price_per_serving, Decimal::new(1898, 2));

        Ok(())
    }

    #[test]
    fn zero_servings_give_zero_per_serving_metrics() -> TestResult {
        let breakdown = PriceAssembler::new(markup(70)).assemble(&subtotals(), None, 0)?;

        assert_eq!(breakdown.cost_per_serving, Decimal::ZERO);
        assert_eq!(breakdown.suggested_price_per_serving, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn overflowing_subtotals_are_an_error() {
        let subtotals = CostSubtotals {
            total_labor: Decimal::MAX,
            ..subtotals()
        };

        let result = PriceAssembler::new(markup(70)).assemble(&subtotals, None, 1);

        assert!(
            matches!(result, Err(CostingError::MoneyOverflow(_))),
            "{result:?}"
        );
    }

    #[test]
    fn overflowing_markup_is_an_error() {
        let subtotals = CostSubtotals {
            ingredients: Decimal::MAX / Decimal::TWO,
            decoration_materials: Decimal::ZERO,
            topper: Decimal::ZERO,
            total_labor: Decimal::ZERO,
            delivery: Decimal::ZERO,
        };

        let result = PriceAssembler::new(markup(150)).assemble(&subtotals, None, 1);

        assert!(
            matches!(result, Err(CostingError::MoneyOverflow(_))),
            "{result:?}"
        );
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(828155, 4)), Decimal::new(8282, 2));
        assert_eq!(round_money(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
    }
}
