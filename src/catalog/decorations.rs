//! Decoration techniques and delivery zones

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    costing::CostingError,
    pricing::{money_add, money_mul},
};

/// How a decoration's quantity relates to the cake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationUnit {
    /// One named item, whatever the cake size
    Single,

    /// Once per whole cake
    Cake,

    /// Once per tier
    Tier,

    /// Once per set of items
    Set,
}

impl DecorationUnit {
    /// Lowercase unit name.
    pub fn as_str(self) -> &'static str {
        match self {
            DecorationUnit::Single => "single",
            DecorationUnit::Cake => "cake",
            DecorationUnit::Tier => "tier",
            DecorationUnit::Set => "set",
        }
    }
}

/// Decoration Technique
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationTechnique {
    /// Technique name
    pub name: String,

    /// Grouping, e.g. "Piping" or "Sugar Flowers"
    pub category: String,

    /// Default unit quantities are counted in
    pub unit: DecorationUnit,

    /// Material cost per unit
    pub default_cost_per_unit: Decimal,

    /// Labor minutes per unit
    pub labor_minutes: Decimal,

    /// Role doing the labor, Decorator when unset
    pub labor_role: Option<String>,
}

impl DecorationTechnique {
    /// Creates a technique with no labor.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        unit: DecorationUnit,
        default_cost_per_unit: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            unit,
            default_cost_per_unit,
            labor_minutes: Decimal::ZERO,
            labor_role: None,
        }
    }

    /// Sets the labor per unit.
    #[must_use]
    pub fn with_labor(mut self, minutes: Decimal, role: Option<&str>) -> Self {
        self.labor_minutes = minutes;
        self.labor_role = role.map(str::to_string);
        self
    }
}

/// Delivery Zone
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryZone {
    /// Zone name
    pub name: String,

    /// Flat fee for any delivery into the zone
    pub base_fee: Decimal,

    /// Additional fee per mile
    pub per_mile_fee: Option<Decimal>,

    /// Distance assumed when the order carries none
    pub distance_miles: Option<Decimal>,
}

impl DeliveryZone {
    /// Creates a flat-fee zone.
    pub fn new(name: impl Into<String>, base_fee: Decimal) -> Self {
        Self {
            name: name.into(),
            base_fee,
            per_mile_fee: None,
            distance_miles: None,
        }
    }

    /// Sets the per-mile fee and default distance.
    #[must_use]
    pub fn with_mileage(mut self, per_mile_fee: Decimal, distance_miles: Option<Decimal>) -> Self {
        self.per_mile_fee = Some(per_mile_fee);
        self.distance_miles = distance_miles;
        self
    }

    /// Delivery fee for a trip of the given distance, or the zone default distance.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if the fee does not fit in a `Decimal`.
    pub fn fee(&self, distance_miles: Option<Decimal>) -> Result<Decimal, CostingError> {
        let miles = distance_miles
            .or(self.distance_miles)
            .unwrap_or(Decimal::ZERO);
        let mileage = money_mul(self.per_mile_fee.unwrap_or(Decimal::ZERO), miles)?;

        money_add(self.base_fee, mileage)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn flat_zone_charges_base_fee() -> TestResult {
        let zone = DeliveryZone::new("Downtown", Decimal::new(15, 0));

        assert_eq!(zone.fee(Some(Decimal::new(12, 0)))?, Decimal::new(15, 0));

        Ok(())
    }

    #[test]
    fn mileage_prefers_order_distance() -> TestResult {
        let zone = DeliveryZone::new("County", Decimal::new(20, 0))
            .with_mileage(Decimal::new(150, 2), Some(Decimal::new(10, 0)));

        assert_eq!(zone.fee(Some(Decimal::new(4, 0)))?, Decimal::new(26, 0));
        assert_eq!(zone.fee(None)?, Decimal::new(35, 0));

        Ok(())
    }

    #[test]
    fn huge_distance_is_an_error() {
        let zone = DeliveryZone::new("County", Decimal::new(20, 0))
            .with_mileage(Decimal::new(150, 2), None);

        let result = zone.fee(Some(Decimal::MAX));

        assert!(
            matches!(result, Err(CostingError::MoneyOverflow(_))),
            "{result:?}"
        );
    }
}
