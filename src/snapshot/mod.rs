//! Snapshot
//!
//! The immutable input of one calculation: tiers, decorations, delivery, topper, labor
//! adjustments, markup and discount. Orders and quotes both reduce to a [`CostingInput`] through
//! [`CostingSnapshot`], so the two pricing paths cannot drift apart.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    catalog::{CostingCatalog, DecorationUnit, DeliveryZoneKey, TechniqueKey},
    costing::{CostingError, CostingResult, calculate_cost},
    geometry::Complexity,
    settings::CostingSettings,
};

mod tier;

pub use tier::{Tier, TierComponent};

/// A decoration line item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDecoration {
    /// Technique applied
    pub technique: TechniqueKey,

    /// Number of units
    pub quantity: u32,

    /// Unit override; the technique's own unit when `None`
    pub unit_override: Option<DecorationUnit>,
}

impl OrderDecoration {
    /// Creates a decoration line using the technique's own unit.
    pub fn new(technique: TechniqueKey, quantity: u32) -> Self {
        Self {
            technique,
            quantity,
            unit_override: None,
        }
    }
}

/// Delivery requested for an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryRequest {
    /// Zone delivered to; no fee can be computed without one
    pub zone: Option<DeliveryZoneKey>,

    /// Trip distance, overriding the zone default
    pub distance_miles: Option<Decimal>,
}

/// Discount kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is in percent points of the suggested price
    Percent,

    /// `value` is a fixed amount of money
    Fixed,
}

/// Discount taken off the suggested price.
#[derive(Debug, Clone, PartialEq)]
pub struct Discount {
    /// How `value` is interpreted
    pub kind: DiscountKind,

    /// Percent points or amount
    pub value: Decimal,

    /// Why the discount was given
    pub reason: Option<String>,
}

impl Discount {
    /// A percentage discount, e.g. `percent(Decimal::from(10))` for 10% off.
    pub fn percent(value: Decimal) -> Self {
        Self {
            kind: DiscountKind::Percent,
            value,
            reason: None,
        }
    }

    /// A fixed-amount discount.
    pub fn fixed(value: Decimal) -> Self {
        Self {
            kind: DiscountKind::Fixed,
            value,
            reason: None,
        }
    }
}

/// Cake topper.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Topper {
    /// No topper
    #[default]
    None,

    /// A stock topper charged at the flat topper fee
    Standard {
        /// Topper type, e.g. "acrylic"
        kind: String,

        /// Wording on the topper
        text: Option<String>,
    },

    /// A made-to-order topper charged at its own fee
    Custom {
        /// Wording on the topper
        text: Option<String>,

        /// Agreed fee
        fee: Option<Decimal>,
    },
}

impl Topper {
    /// Builds a topper from the loose type/text/fee fields orders and quotes store.
    ///
    /// An empty or "none" type means no topper and "custom" means a custom topper; any other type
    /// is a standard topper.
    pub fn from_parts(kind: Option<&str>, text: Option<&str>, custom_fee: Option<Decimal>) -> Self {
        let text = text
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        match kind.map(str::trim) {
            None | Some("") => Topper::None,
            Some(kind) if kind.eq_ignore_ascii_case("none") => Topper::None,
            Some(kind) if kind.eq_ignore_ascii_case("custom") => Topper::Custom {
                text,
                fee: custom_fee,
            },
            Some(kind) => Topper::Standard {
                kind: kind.to_string(),
                text,
            },
        }
    }

    /// Cost of this topper.
    pub fn cost(&self, standard_fee: Decimal) -> Decimal {
        match self {
            Topper::None => Decimal::ZERO,
            Topper::Standard { .. } => standard_fee,
            Topper::Custom { fee, .. } => fee.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Everything one calculation needs from an order or quote.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CostingInput {
    /// Tiers, bottom to top
    pub tiers: Vec<Tier>,

    /// Decoration line items
    pub decorations: Vec<OrderDecoration>,

    /// Decoration complexity used for buttercream estimates
    pub complexity: Complexity,

    /// Delivery, or `None` for pickup
    pub delivery: Option<DeliveryRequest>,

    /// Extra baker time added by hand
    pub baker_hours: Option<Decimal>,

    /// Extra assistant time added by hand
    pub assistant_hours: Option<Decimal>,

    /// Topper
    pub topper: Topper,

    /// Markup; the settings default when `None`
    pub markup: Option<Percentage>,

    /// Discount
    pub discount: Option<Discount>,
}

/// Something that can be priced by the costing engine.
pub trait CostingSnapshot {
    /// Reduces this snapshot to the engine's input.
    fn costing_input(&self) -> &CostingInput;

    /// Prices this snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CostingError`] if the input fails validation or references entries missing
    /// from the catalog.
    fn cost(
        &self,
        catalog: &CostingCatalog,
        settings: &CostingSettings,
    ) -> Result<CostingResult, CostingError> {
        calculate_cost(self.costing_input(), catalog, settings)
    }
}

impl CostingSnapshot for CostingInput {
    fn costing_input(&self) -> &CostingInput {
        self
    }
}

/// A confirmed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order reference
    pub reference: String,

    /// Customer name
    pub customer: String,

    /// Date of the event the cake is for
    pub event_date: Option<String>,

    /// Cake details
    pub input: CostingInput,
}

impl CostingSnapshot for Order {
    fn costing_input(&self) -> &CostingInput {
        &self.input
    }
}

/// A quote offered to a customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Quote reference
    pub reference: String,

    /// Customer name
    pub customer: String,

    /// Days the quote stays valid
    pub valid_days: Option<u32>,

    /// Cake details
    pub input: CostingInput,
}

impl CostingSnapshot for Quote {
    fn costing_input(&self) -> &CostingInput {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_none_types_mean_no_topper() {
        assert_eq!(Topper::from_parts(None, Some("Happy"), None), Topper::None);
        assert_eq!(Topper::from_parts(Some("  "), None, None), Topper::None);
        assert_eq!(Topper::from_parts(Some("None"), None, None), Topper::None);
    }

    #[test]
    fn custom_topper_charges_its_fee() {
        let topper =
            Topper::from_parts(Some("custom"), Some("Ava 30"), Some(Decimal::new(1250, 2)));

        assert_eq!(
            topper,
            Topper::Custom {
                text: Some("Ava 30".to_string()),
                fee: Some(Decimal::new(1250, 2)),
            }
        );
        assert_eq!(topper.cost(Decimal::new(5, 0)), Decimal::new(1250, 2));
    }

    #[test]
    fn custom_topper_without_fee_is_free() {
        let topper = Topper::from_parts(Some("Custom"), None, None);

        assert_eq!(topper.cost(Decimal::new(5, 0)), Decimal::ZERO);
    }

    #[test]
    fn standard_topper_charges_flat_fee() {
        let topper = Topper::from_parts(Some("acrylic"), Some(""), Some(Decimal::new(99, 0)));

        assert_eq!(
            topper,
            Topper::Standard {
                kind: "acrylic".to_string(),
                text: None,
            }
        );
        assert_eq!(topper.cost(Decimal::new(5, 0)), Decimal::new(5, 0));
    }
}
