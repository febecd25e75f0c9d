//! Bakecost prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{
        CostingCatalog, DecorationTechnique, DecorationUnit, DeliveryZone, DeliveryZoneKey,
        Ingredient, IngredientKey, Recipe, RecipeKey, RecipeKind, TechniqueKey,
    },
    costing::{CostingError, CostingResult, CostingWarning, TierCosting, calculate_cost},
    fixtures::{Fixture, FixtureError},
    geometry::{Complexity, Shape, TierSize},
    report::{ReportError, write_report},
    resolver::{RecipeMatch, RecipeResolver, ResolvedRecipe},
    settings::{CostingSettings, GeometrySettings, VolumeFactors},
    snapshot::{
        CostingInput, CostingSnapshot, DeliveryRequest, Discount, DiscountKind, Order,
        OrderDecoration, Quote, Tier, Topper,
    },
};
