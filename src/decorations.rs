//! Decoration costing

use rust_decimal::Decimal;

use crate::{
    catalog::{CostingCatalog, DecorationUnit, TechniqueKey},
    costing::CostingError,
    labor::{DECORATOR, LaborRates, labor_cost},
    pricing::money_mul,
    snapshot::OrderDecoration,
};

/// Material and labor for one decoration line.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationCost {
    /// Technique applied
    pub technique: TechniqueKey,

    /// Technique name
    pub name: String,

    /// Technique category
    pub category: String,

    /// Unit the line was counted in
    pub unit: DecorationUnit,

    /// Quantity on the line
    pub quantity: u32,

    /// Quantity after unit scaling
    pub quantity_multiplier: Decimal,

    /// Material cost
    pub material_cost: Decimal,

    /// Labor minutes
    pub labor_minutes: Decimal,

    /// Role doing the labor
    pub labor_role: String,

    /// Labor cost at the role's rate
    pub labor_cost: Decimal,
}

/// Scales a line quantity by its unit: per-tier units repeat on every tier, every other unit is
/// counted once.
pub fn quantity_multiplier(unit: DecorationUnit, quantity: u32, tier_count: usize) -> Decimal {
    let quantity = Decimal::from(quantity);

    match unit {
        DecorationUnit::Tier => quantity * Decimal::from(tier_count),
        DecorationUnit::Single | DecorationUnit::Cake | DecorationUnit::Set => quantity,
    }
}

/// Costs every decoration line of an order.
///
/// # Errors
///
/// - [`CostingError::UnknownTechnique`]: a line references a technique missing from the catalog.
/// - [`CostingError::MoneyOverflow`]: a line's cost does not fit in a `Decimal`.
pub fn cost_decorations(
    lines: &[OrderDecoration],
    tier_count: usize,
    catalog: &CostingCatalog,
    rates: &LaborRates<'_>,
) -> Result<Vec<DecorationCost>, CostingError> {
    lines
        .iter()
        .map(|line| {
            let technique = catalog
                .technique(line.technique)
                .ok_or(CostingError::UnknownTechnique(line.technique))?;

            let unit = line.unit_override.unwrap_or(technique.unit);
            let multiplier = quantity_multiplier(unit, line.quantity, tier_count);
            let labor_minutes = money_mul(technique.labor_minutes, multiplier)?;
            let labor_role = technique
                .labor_role
                .clone()
                .unwrap_or_else(|| DECORATOR.to_string());
            let (hourly_rate, _) = rates.hourly_rate(&labor_role);

            Ok(DecorationCost {
                technique: line.technique,
                name: technique.name.clone(),
                category: technique.category.clone(),
                unit,
                quantity: line.quantity,
                quantity_multiplier: multiplier,
                material_cost: money_mul(technique.default_cost_per_unit, multiplier)?,
                labor_minutes,
                labor_role,
                labor_cost: labor_cost(labor_minutes, hourly_rate)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::DecorationTechnique;

    use super::*;

    #[test]
    fn only_tier_units_scale_with_tier_count() {
        assert_eq!(
            quantity_multiplier(DecorationUnit::Tier, 2, 3),
            Decimal::new(6, 0)
        );
        assert_eq!(
            quantity_multiplier(DecorationUnit::Cake, 2, 3),
            Decimal::new(2, 0)
        );
        assert_eq!(
            quantity_multiplier(DecorationUnit::Set, 1, 3),
            Decimal::ONE
        );
        assert_eq!(
            quantity_multiplier(DecorationUnit::Single, 12, 3),
            Decimal::new(12, 0)
        );
    }

    #[test]
    fn per_tier_ribbon_costs_material_and_labor() -> TestResult {
        let mut catalog = CostingCatalog::default();
        let ribbon = catalog.add_technique(
            DecorationTechnique::new(
                "Ribbon Border",
                "Finishing",
                DecorationUnit::Tier,
                Decimal::new(150, 2),
            )
            .with_labor(Decimal::new(5, 0), None),
        );

        let rates = LaborRates::new(&catalog);
        let lines = [OrderDecoration::new(ribbon, 1)];

        let costs = cost_decorations(&lines, 3, &catalog, &rates)?;
        let cost = costs.first();

        assert_eq!(cost.map(|c| c.material_cost), Some(Decimal::new(450, 2)));
        assert_eq!(cost.map(|c| c.labor_minutes), Some(Decimal::new(15, 0)));
        assert_eq!(cost.map(|c| c.labor_role.as_str()), Some(DECORATOR));

        // 15 minutes at the Decorator fallback of 30/hr
        assert_eq!(cost.map(|c| c.labor_cost), Some(Decimal::new(75, 1)));

        Ok(())
    }

    #[test]
    fn unit_override_replaces_technique_unit() -> TestResult {
        let mut catalog = CostingCatalog::default();
        catalog.add_labor_role("Sugar Artist", Decimal::new(40, 0));

        let roses = catalog.add_technique(
            DecorationTechnique::new(
                "Sugar Roses",
                "Sugar Flowers",
                DecorationUnit::Single,
                Decimal::new(4, 0),
            )
            .with_labor(Decimal::new(12, 0), Some("Sugar Artist")),
        );

        let rates = LaborRates::new(&catalog);
        let lines = [OrderDecoration {
            technique: roses,
            quantity: 3,
            unit_override: Some(DecorationUnit::Tier),
        }];

        let costs = cost_decorations(&lines, 2, &catalog, &rates)?;
        let cost = costs.first();

        assert_eq!(cost.map(|c| c.unit), Some(DecorationUnit::Tier));
        assert_eq!(cost.map(|c| c.quantity_multiplier), Some(Decimal::new(6, 0)));
        assert_eq!(cost.map(|c| c.material_cost), Some(Decimal::new(24, 0)));

        // 72 minutes at 40/hr
        assert_eq!(cost.map(|c| c.labor_cost), Some(Decimal::new(48, 0)));

        Ok(())
    }

    #[test]
    fn unknown_technique_is_an_error() {
        let mut other = CostingCatalog::default();
        let stray = other.add_technique(DecorationTechnique::new(
            "Stray",
            "None",
            DecorationUnit::Cake,
            Decimal::ONE,
        ));

        let catalog = CostingCatalog::default();
        let rates = LaborRates::new(&catalog);

        let result = cost_decorations(&[OrderDecoration::new(stray, 1)], 1, &catalog, &rates);

        assert!(matches!(result, Err(CostingError::UnknownTechnique(key)) if key == stray));
    }
}
