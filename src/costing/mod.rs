//! Costing
//!
//! Prices a [`CostingInput`] against a catalog:
//!
//! 1. measure every tier and resolve its batter, filling and frosting
//! 2. scale and merge recipe ingredients
//! 3. collect recipe, assembly, decoration and manual labor by role
//! 4. cost decorations, topper and delivery
//! 5. apply markup and discount
//!
//! Gaps in the catalog or input that can be priced around become [`CostingWarning`]s; everything
//! else is a [`CostingError`].

use rust_decimal::Decimal;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    catalog::{CostingCatalog, RecipeKind},
    decorations::cost_decorations,
    geometry::Complexity,
    ingredients::{IngredientAggregator, total_cost},
    labor::{BAKER, BAKERY_ASSISTANT, LaborAggregator, LaborRates, LaborSource, RateSource},
    pricing::{CostSubtotals, PriceAssembler, money_mul, money_sum},
    resolver::{MultiplierSource, RecipeMatch, RecipeResolver, Resolution, ResolvedRecipe},
    settings::CostingSettings,
    snapshot::{CostingInput, DeliveryRequest, Tier, Topper},
};

mod error;
mod result;
mod tiers;
mod warnings;

pub use error::CostingError;
pub use result::{CostingResult, to_money};
pub use tiers::TierCosting;
pub use warnings::CostingWarning;

use result::CostingParts;
use tiers::TierMeasurements;

/// Prices one cake.
///
/// # Errors
///
/// Returns a [`CostingError`] if the input holds negative amounts, a tier cannot be measured, or
/// the input references recipes, techniques or zones missing from the catalog.
#[tracing::instrument(
    name = "costing.calculate_cost",
    skip(input, catalog, settings),
    fields(
        tiers = input.tiers.len(),
        decorations = input.decorations.len(),
        warnings = tracing::field::Empty
    ),
    err
)]
pub fn calculate_cost(
    input: &CostingInput,
    catalog: &CostingCatalog,
    settings: &CostingSettings,
) -> Result<CostingResult, CostingError> {
    validate(input)?;

    let rates = LaborRates::new(catalog);
    let mut costing = Costing::new(catalog, settings);

    for tier in &input.tiers {
        costing.add_tier(tier, input.complexity)?;
    }

    let decorations = cost_decorations(&input.decorations, input.tiers.len(), catalog, &rates)?;

    for decoration in &decorations {
        costing.labor.add(
            &decoration.labor_role,
            decoration.labor_minutes,
            LaborSource::Decoration,
        )?;
    }

    if let Some(hours) = input.baker_hours {
        costing.labor.add_hours(BAKER, hours)?;
    }

    if let Some(hours) = input.assistant_hours {
        costing.labor.add_hours(BAKERY_ASSISTANT, hours)?;
    }

    let delivery = costing.delivery_fee(input.delivery)?;

    let Costing {
        ingredients,
        labor,
        tiers,
        mut warnings,
        ..
    } = costing;

    let ingredients = ingredients.finish(catalog)?;
    let labor = labor.finish(&rates)?;

    warnings.extend(
        labor
            .lines
            .iter()
            .filter(|line| line.rate_source == RateSource::Unknown)
            .map(|line| CostingWarning::FallbackLaborRate {
                role: line.role.clone(),
            }),
    );

    let subtotals = CostSubtotals {
        ingredients: total_cost(&ingredients)?,
        decoration_materials: money_sum(decorations.iter().map(|line| line.material_cost))?,
        topper: input.topper.cost(settings.standard_topper_fee),
        total_labor: labor.total_cost,
        delivery,
    };

    let total_servings = input
        .tiers
        .iter()
        .fold(0_u32, |total, tier| total.saturating_add(tier.servings));

    let markup = input.markup.unwrap_or(settings.default_markup);
    let prices =
        PriceAssembler::new(markup).assemble(&subtotals, input.discount.as_ref(), total_servings)?;

    for warning in &warnings {
        warn!(%warning, "costing warning");
    }

    tracing::Span::current().record("warnings", warnings.len());

    debug!(
        total_cost = %prices.total_cost,
        suggested_price = %prices.suggested_price,
        final_price = %prices.final_price,
        "priced cake"
    );

    CostingResult::from_parts(CostingParts {
        currency: catalog.currency(),
        tiers,
        ingredients,
        decorations,
        labor: labor.lines,
        subtotals,
        decoration_labor: labor.decoration_cost,
        base_labor: labor.base_cost,
        prices,
        total_servings,
        warnings,
    })
}

/// Rejects negative amounts before any work is done.
fn validate(input: &CostingInput) -> Result<(), CostingError> {
    if input
        .markup
        .is_some_and(|markup| markup * Decimal::ONE < Decimal::ZERO)
    {
        return Err(CostingError::NegativeMarkup);
    }

    let custom_topper_fee = match &input.topper {
        Topper::Custom { fee, .. } => *fee,
        Topper::None | Topper::Standard { .. } => None,
    };

    let amounts = [
        ("baker hours", input.baker_hours),
        ("assistant hours", input.assistant_hours),
        (
            "discount",
            input.discount.as_ref().map(|discount| discount.value),
        ),
        (
            "delivery distance",
            input.delivery.and_then(|delivery| delivery.distance_miles),
        ),
        ("topper fee", custom_topper_fee),
    ];

    for (field, amount) in amounts {
        if amount.is_some_and(|amount| amount < Decimal::ZERO) {
            return Err(CostingError::NegativeAmount { field });
        }
    }

    let negative_multiplier = input.tiers.iter().any(|tier| {
        RecipeKind::ALL.iter().any(|&kind| {
            tier.component(kind)
                .multiplier
                .is_some_and(|multiplier| multiplier < Decimal::ZERO)
        })
    });

    if negative_multiplier {
        return Err(CostingError::NegativeAmount {
            field: "recipe multiplier",
        });
    }

    Ok(())
}

/// Running state of one calculation.
struct Costing<'c> {
    catalog: &'c CostingCatalog,
    settings: &'c CostingSettings,
    resolver: RecipeResolver<'c>,
    ingredients: IngredientAggregator,
    labor: LaborAggregator,
    tiers: Vec<TierCosting>,
    warnings: Vec<CostingWarning>,
}

impl<'c> Costing<'c> {
    fn new(catalog: &'c CostingCatalog, settings: &'c CostingSettings) -> Self {
        Self {
            catalog,
            settings,
            resolver: RecipeResolver::new(catalog, &settings.volume_factors),
            ingredients: IngredientAggregator::new(),
            labor: LaborAggregator::new(),
            tiers: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Measures a tier, resolves its recipes and collects their ingredients and labor.
    fn add_tier(&mut self, tier: &Tier, complexity: Complexity) -> Result<(), CostingError> {
        let measured = TierMeasurements::measure(tier, &self.settings.geometry)?;

        if let Some(warning) = measured.warning.clone() {
            self.warnings.push(warning);
        }

        let mut recipes: SmallVec<[ResolvedRecipe; 3]> = SmallVec::new();

        for kind in RecipeKind::ALL {
            match self.resolver.resolve(tier, kind, measured.volume_ml)? {
                Resolution::Resolved(resolved) => {
                    self.add_recipe(tier, &resolved)?;
                    recipes.push(resolved);
                }
                Resolution::Missing => {
                    self.warnings.push(CostingWarning::MissingRecipe {
                        tier: tier.index,
                        kind,
                    });
                }
                Resolution::NotRequested => {}
            }
        }

        self.labor.add(
            tier.assembly_role.as_deref().unwrap_or(BAKER),
            measured.assembly_minutes,
            LaborSource::Assembly,
        )?;

        let (batter, buttercream) = measured.production(complexity, &self.settings.geometry);

        self.tiers.push(TierCosting {
            index: tier.index,
            size: measured.size,
            volume_ml: measured.volume_ml,
            servings: tier.servings,
            recipes,
            assembly_minutes: measured.assembly_minutes,
            batter,
            buttercream,
        });

        Ok(())
    }

    fn add_recipe(
        &mut self,
        tier: &Tier,
        resolved: &ResolvedRecipe,
    ) -> Result<(), CostingError> {
        let Some(recipe) = self.catalog.recipe(resolved.recipe) else {
            return Ok(());
        };

        let text = tier.component(resolved.kind).text();

        if let (RecipeMatch::FirstOfKind, Some(text)) = (resolved.matched_by, text) {
            self.warnings.push(CostingWarning::FallbackRecipe {
                tier: tier.index,
                kind: resolved.kind,
                text: text.to_string(),
                recipe: recipe.name.clone(),
            });
        }

        if resolved.multiplier_source == MultiplierSource::NoYieldVolume {
            self.warnings.push(CostingWarning::MissingYieldVolume {
                tier: tier.index,
                kind: resolved.kind,
                recipe: recipe.name.clone(),
            });
        }

        self.ingredients.add_recipe(recipe, resolved.multiplier)?;

        if let Some(minutes) = recipe.labor_minutes {
            self.labor.add(
                recipe.labor_role.as_deref().unwrap_or(BAKER),
                money_mul(minutes, resolved.multiplier)?,
                LaborSource::Recipe,
            )?;
        }

        Ok(())
    }

    /// Fee for the requested delivery; nothing for pickup or a request without a zone.
    fn delivery_fee(&mut self, delivery: Option<DeliveryRequest>) -> Result<Decimal, CostingError> {
        let Some(request) = delivery else {
            return Ok(Decimal::ZERO);
        };

        let Some(key) = request.zone else {
            self.warnings.push(CostingWarning::MissingDeliveryZone);

            return Ok(Decimal::ZERO);
        };

        let zone = self
            .catalog
            .delivery_zone(key)
            .ok_or(CostingError::UnknownDeliveryZone(key))?;

        zone.fee(request.distance_miles)
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use testresult::TestResult;

    use crate::{
        catalog::{Ingredient, Recipe},
        snapshot::Discount,
    };

    use super::*;

    fn input() -> CostingInput {
        CostingInput {
            tiers: vec![Tier::new(0, 24).with_size_name("8\" round")],
            ..CostingInput::default()
        }
    }

    #[test]
    fn negative_markup_is_rejected() {
        let input = CostingInput {
            markup: Some(Percentage::from(Decimal::new(-10, 2))),
            ..input()
        };

        assert_eq!(validate(&input), Err(CostingError::NegativeMarkup));
    }

    #[test]
    fn negative_discount_is_rejected() {
        let input = CostingInput {
            discount: Some(Discount::fixed(Decimal::new(-5, 0))),
            ..input()
        };

        assert_eq!(
            validate(&input),
            Err(CostingError::NegativeAmount { field: "discount" })
        );
    }

    #[test]
    fn negative_manual_hours_are_rejected() {
        let input = CostingInput {
            assistant_hours: Some(Decimal::new(-1, 0)),
            ..input()
        };

        assert_eq!(
            validate(&input),
            Err(CostingError::NegativeAmount {
                field: "assistant hours"
            })
        );
    }

    #[test]
    fn negative_recipe_multiplier_is_rejected() {
        let input = CostingInput {
            tiers: vec![
                Tier::new(0, 24)
                    .with_size_name("8\" round")
                    .with_multiplier(RecipeKind::Filling, Decimal::new(-1, 0)),
            ],
            ..CostingInput::default()
        };

        assert_eq!(
            validate(&input),
            Err(CostingError::NegativeAmount {
                field: "recipe multiplier"
            })
        );
    }

    #[test]
    fn empty_catalog_prices_only_assembly_and_warns() -> TestResult {
        let catalog = CostingCatalog::default();
        let result = calculate_cost(&input(), &catalog, &CostingSettings::default())?;

        // 20 minutes of Baker assembly at 21/hr
        assert_eq!(result.total_labor_cost().to_string(), "$7.00");
        assert_eq!(
            result.warnings(),
            &[CostingWarning::MissingRecipe {
                tier: 0,
                kind: RecipeKind::Batter,
            }]
        );

        Ok(())
    }

    #[test]
    fn delivery_without_zone_is_free_and_warns() -> TestResult {
        let catalog = CostingCatalog::default();
        let input = CostingInput {
            delivery: Some(DeliveryRequest {
                zone: None,
                distance_miles: Some(Decimal::new(12, 0)),
            }),
            ..input()
        };

        let result = calculate_cost(&input, &catalog, &CostingSettings::default())?;

        assert!(result.delivery_cost().is_zero());
        assert!(result.warnings().contains(&CostingWarning::MissingDeliveryZone));

        Ok(())
    }

    #[test]
    fn huge_manual_hours_are_an_overflow_error() {
        let input = CostingInput {
            baker_hours: Some(Decimal::from_i128_with_scale(2 * 10_i128.pow(27), 0)),
            ..input()
        };

        let catalog = CostingCatalog::default();
        let result = calculate_cost(&input, &catalog, &CostingSettings::default());

        assert!(
            matches!(result, Err(CostingError::MoneyOverflow(_))),
            "{result:?}"
        );
    }

    #[test]
    fn huge_recipe_multiplier_is_an_overflow_error() {
        let mut catalog = CostingCatalog::default();
        let flour = catalog.add_ingredient(Ingredient::new("Flour", "g", Decimal::new(2, 2)));
        catalog.add_recipe(
            Recipe::new("Vanilla Batter", RecipeKind::Batter)
                .with_line(flour, Decimal::new(1500, 0)),
        );

        let input = CostingInput {
            tiers: vec![
                Tier::new(0, 24)
                    .with_size_name("8\" round")
                    .with_multiplier(RecipeKind::Batter, Decimal::MAX),
            ],
            ..CostingInput::default()
        };

        let result = calculate_cost(&input, &catalog, &CostingSettings::default());

        assert!(
            matches!(result, Err(CostingError::MoneyOverflow(_))),
            "{result:?}"
        );
    }
}
