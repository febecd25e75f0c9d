//! Labor
//!
//! Accumulates labor minutes per role from recipes, tier assembly, decorations and manual
//! adjustments, then prices them with the catalog's hourly rates.
//!
//! Production labor (everything except decorations) is kept apart from decoration labor so the
//! base labor cost can be reported on its own.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    catalog::CostingCatalog,
    costing::CostingError,
    pricing::{money_add, money_mul, money_sum},
};

/// Default role for recipe and assembly labor.
pub const BAKER: &str = "Baker";

/// Default role for decoration labor.
pub const DECORATOR: &str = "Decorator";

/// Role manual assistant hours are charged to.
pub const BAKERY_ASSISTANT: &str = "Bakery Assistant";

/// Hourly rates used when the catalog has no entry for a role.
///
/// These are fixed and differ from the rates bakeries usually seed their catalog with.
pub const FALLBACK_RATES: [(&str, Decimal); 3] = [
    (BAKER, Decimal::from_parts(21, 0, 0, false, 0)),
    (DECORATOR, Decimal::from_parts(30, 0, 0, false, 0)),
    (BAKERY_ASSISTANT, Decimal::from_parts(18, 0, 0, false, 0)),
];

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Where an hourly rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// The catalog's labor roles
    Catalog,

    /// The fallback table
    Fallback,

    /// Unknown role, charged at the Baker fallback rate
    Unknown,
}

/// Looks up hourly rates, falling back to [`FALLBACK_RATES`].
#[derive(Debug, Clone, Copy)]
pub struct LaborRates<'c> {
    catalog: &'c CostingCatalog,
}

impl<'c> LaborRates<'c> {
    /// Creates a rate lookup over a catalog.
    pub fn new(catalog: &'c CostingCatalog) -> Self {
        Self { catalog }
    }

    /// Hourly rate for a role.
    pub fn hourly_rate(&self, role: &str) -> (Decimal, RateSource) {
        if let Some(entry) = self.catalog.labor_role(role) {
            return (entry.hourly_rate, RateSource::Catalog);
        }

        if let Some((_, rate)) = fallback_rate(role) {
            return (rate, RateSource::Fallback);
        }

        let baker = fallback_rate(BAKER).map_or(Decimal::ZERO, |(_, rate)| rate);

        (baker, RateSource::Unknown)
    }
}

fn fallback_rate(role: &str) -> Option<(&'static str, Decimal)> {
    FALLBACK_RATES
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(role))
}

/// Cost of `minutes` at `hourly_rate`.
///
/// # Errors
///
/// Returns [`CostingError::MoneyOverflow`] if the cost does not fit in a `Decimal`.
pub fn labor_cost(minutes: Decimal, hourly_rate: Decimal) -> Result<Decimal, CostingError> {
    Ok(money_mul(minutes, hourly_rate)? / MINUTES_PER_HOUR)
}

/// What a labor contribution was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaborSource {
    /// Making a recipe batch
    Recipe,

    /// Stacking and crumb coating a tier
    Assembly,

    /// Applying decorations
    Decoration,

    /// Hours added by hand
    Manual,
}

#[derive(Debug, Default, Clone)]
struct RoleMinutes {
    /// First spelling of the role seen
    role: String,
    production: Decimal,
    decoration: Decimal,
}

/// Labor for one role.
#[derive(Debug, Clone, PartialEq)]
pub struct LaborLine {
    /// Role name
    pub role: String,

    /// Production plus decoration minutes
    pub minutes: Decimal,

    /// Decoration minutes included in `minutes`
    pub decoration_minutes: Decimal,

    /// Hourly rate applied
    pub hourly_rate: Decimal,

    /// Where the rate came from
    pub rate_source: RateSource,

    /// Cost of all minutes
    pub cost: Decimal,
}

/// Priced labor for the whole order.
#[derive(Debug, Clone, PartialEq)]
pub struct LaborSummary {
    /// Per-role lines, ordered by role name
    pub lines: Vec<LaborLine>,

    /// Recipe, assembly and manual labor
    pub base_cost: Decimal,

    /// Decoration labor
    pub decoration_cost: Decimal,

    /// Base plus decoration labor
    pub total_cost: Decimal,
}

/// Accumulates labor minutes by role.
///
/// Role names are matched case-insensitively, like rate lookups; a line keeps the first spelling
/// it was given.
#[derive(Debug, Default)]
pub struct LaborAggregator {
    roles: BTreeMap<String, RoleMinutes>,
}

impl LaborAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds minutes to a role.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if the role's minutes no longer fit in a `Decimal`.
    pub fn add(
        &mut self,
        role: &str,
        minutes: Decimal,
        source: LaborSource,
    ) -> Result<(), CostingError> {
        if minutes.is_zero() {
            return Ok(());
        }

        let entry = self
            .roles
            .entry(role.to_lowercase())
            .or_insert_with(|| RoleMinutes {
                role: role.to_string(),
                ..RoleMinutes::default()
            });

        match source {
            LaborSource::Decoration => entry.decoration = money_add(entry.decoration, minutes)?,
            LaborSource::Recipe | LaborSource::Assembly | LaborSource::Manual => {
                entry.production = money_add(entry.production, minutes)?;
            }
        }

        Ok(())
    }

    /// Adds manual hours to a role.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if the hours do not fit in a `Decimal` as minutes.
    pub fn add_hours(&mut self, role: &str, hours: Decimal) -> Result<(), CostingError> {
        self.add(role, money_mul(hours, MINUTES_PER_HOUR)?, LaborSource::Manual)
    }

    /// Prices the accumulated minutes.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if a cost does not fit in a `Decimal`.
    pub fn finish(self, rates: &LaborRates<'_>) -> Result<LaborSummary, CostingError> {
        let mut base_cost = Decimal::ZERO;
        let mut decoration_cost = Decimal::ZERO;
        let mut lines = Vec::with_capacity(self.roles.len());

        for minutes in self.roles.into_values() {
            let (hourly_rate, rate_source) = rates.hourly_rate(&minutes.role);
            let production = labor_cost(minutes.production, hourly_rate)?;
            let decoration = labor_cost(minutes.decoration, hourly_rate)?;

            base_cost = money_add(base_cost, production)?;
            decoration_cost = money_add(decoration_cost, decoration)?;

            lines.push(LaborLine {
                role: minutes.role,
                minutes: money_add(minutes.production, minutes.decoration)?,
                decoration_minutes: minutes.decoration,
                hourly_rate,
                rate_source,
                cost: money_sum([production, decoration])?,
            });
        }

        Ok(LaborSummary {
            lines,
            base_cost,
            decoration_cost,
            total_cost: money_add(base_cost, decoration_cost)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn fallback_rates_apply_when_catalog_misses() {
        let catalog = CostingCatalog::default();
        let rates = LaborRates::new(&catalog);

        assert_eq!(
            rates.hourly_rate("Baker"),
            (Decimal::new(21, 0), RateSource::Fallback)
        );
        assert_eq!(
            rates.hourly_rate("decorator"),
            (Decimal::new(30, 0), RateSource::Fallback)
        );
        assert_eq!(
            rates.hourly_rate("Bakery Assistant"),
            (Decimal::new(18, 0), RateSource::Fallback)
        );
    }

    #[test]
    fn catalog_rates_take_precedence() {
        let mut catalog = CostingCatalog::default();
        catalog.add_labor_role("Baker", Decimal::new(25, 0));

        let rates = LaborRates::new(&catalog);

        assert_eq!(
            rates.hourly_rate("Baker"),
            (Decimal::new(25, 0), RateSource::Catalog)
        );
    }

    #[test]
    fn unknown_roles_use_baker_rate() {
        let catalog = CostingCatalog::default();
        let rates = LaborRates::new(&catalog);

        assert_eq!(
            rates.hourly_rate("Delivery Driver"),
            (Decimal::new(21, 0), RateSource::Unknown)
        );
    }

    #[test]
    fn base_cost_excludes_decoration_labor() -> TestResult {
        let catalog = CostingCatalog::default();
        let rates = LaborRates::new(&catalog);

        let mut aggregator = LaborAggregator::new();
        aggregator.add(BAKER, Decimal::new(40, 0), LaborSource::Recipe)?;
        aggregator.add(BAKER, Decimal::new(20, 0), LaborSource::Assembly)?;
        aggregator.add(DECORATOR, Decimal::new(90, 0), LaborSource::Decoration)?;
        aggregator.add_hours(BAKERY_ASSISTANT, Decimal::new(5, 1))?;

        let summary = aggregator.finish(&rates)?;

        // Baker: 60 min at 21 = 21.00; Assistant: 30 min at 18 = 9.00
        // Decorator: 90 min at 30 = 45.00
        assert_eq!(summary.base_cost, Decimal::new(30, 0));
        assert_eq!(summary.decoration_cost, Decimal::new(45, 0));
        assert_eq!(summary.total_cost, Decimal::new(75, 0));

        let roles: Vec<&str> = summary.lines.iter().map(|l| l.role.as_str()).collect();

        assert_eq!(roles, vec!["Baker", "Bakery Assistant", "Decorator"]);

        Ok(())
    }

    #[test]
    fn one_role_can_carry_both_kinds_of_labor() -> TestResult {
        let catalog = CostingCatalog::default();
        let rates = LaborRates::new(&catalog);

        let mut aggregator = LaborAggregator::new();
        aggregator.add(DECORATOR, Decimal::new(30, 0), LaborSource::Assembly)?;
        aggregator.add(DECORATOR, Decimal::new(30, 0), LaborSource::Decoration)?;

        let summary = aggregator.finish(&rates)?;
        let line = summary.lines.first();

        assert_eq!(line.map(|l| l.minutes), Some(Decimal::new(60, 0)));
        assert_eq!(line.map(|l| l.decoration_minutes), Some(Decimal::new(30, 0)));
        assert_eq!(line.map(|l| l.cost), Some(Decimal::new(30, 0)));
        assert_eq!(summary.base_cost, Decimal::new(15, 0));

        Ok(())
    }

    #[test]
    fn zero_minutes_add_no_line() -> TestResult {
        let catalog = CostingCatalog::default();
        let rates = LaborRates::new(&catalog);

        let mut aggregator = LaborAggregator::new();
        aggregator.add(BAKER, Decimal::ZERO, LaborSource::Recipe)?;

        assert!(aggregator.finish(&rates)?.lines.is_empty());

        Ok(())
    }

    #[test]
    fn role_names_merge_regardless_of_case() -> TestResult {
        let catalog = CostingCatalog::default();
        let rates = LaborRates::new(&catalog);

        let mut aggregator = LaborAggregator::new();
        aggregator.add(BAKER, Decimal::new(20, 0), LaborSource::Assembly)?;
        aggregator.add("baker", Decimal::new(40, 0), LaborSource::Recipe)?;

        let summary = aggregator.finish(&rates)?;
        let lines: Vec<(&str, Decimal)> = summary
            .lines
            .iter()
            .map(|line| (line.role.as_str(), line.minutes))
            .collect();

        assert_eq!(lines, vec![("Baker", Decimal::new(60, 0))]);
        assert_eq!(summary.total_cost, Decimal::new(21, 0));

        Ok(())
    }

    #[test]
    fn manual_hours_too_large_for_minutes_are_an_error() {
        let mut aggregator = LaborAggregator::new();
        let hours = Decimal::from_i128_with_scale(2 * 10_i128.pow(27), 0);

        let result = aggregator.add_hours(BAKER, hours);

        assert!(
            matches!(result, Err(CostingError::MoneyOverflow(_))),
            "{result:?}"
        );
    }
}
