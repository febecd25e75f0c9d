//! Recipe resolution
//!
//! Chooses the batter, filling and frosting recipe for each tier and works out how many batches
//! of each the tier needs.
//!
//! An explicit recipe on the tier always wins. Otherwise the tier's free text is matched against
//! the catalog with an ordered list of [`MatchStrategy`]s, falling back to the first recipe of the
//! right kind in catalog order.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::{
    catalog::{CostingCatalog, Recipe, RecipeKey, RecipeKind},
    costing::CostingError,
    pricing::money_mul,
    settings::VolumeFactors,
    snapshot::Tier,
};

mod strategies;

pub use strategies::{Candidate, MatchStrategy, STRATEGIES, normalize_name};

/// How a recipe was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeMatch {
    /// The tier referenced the recipe directly
    Explicit,

    /// The free text and recipe name contain one another
    Substring,

    /// The free text and recipe name share their first word
    FirstWord,

    /// First recipe of the kind in catalog order
    FirstOfKind,
}

/// Where a multiplier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplierSource {
    /// Stored on the tier
    Explicit,

    /// Tier volume over recipe yield
    Volume,

    /// The recipe has no yield volume, so one batch is assumed
    NoYieldVolume,
}

/// A recipe chosen for one component of a tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecipe {
    /// Component produced
    pub kind: RecipeKind,

    /// Recipe chosen
    pub recipe: RecipeKey,

    /// Recipe name
    pub name: String,

    /// Batches needed
    pub multiplier: Decimal,

    /// How the recipe was chosen
    pub matched_by: RecipeMatch,

    /// How the multiplier was obtained
    pub multiplier_source: MultiplierSource,
}

/// Outcome of resolving one component of a tier.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A recipe was found
    Resolved(ResolvedRecipe),

    /// The tier does not ask for this component
    NotRequested,

    /// The catalog has no recipe of this kind
    Missing,
}

/// Resolves tier components against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct RecipeResolver<'c> {
    catalog: &'c CostingCatalog,
    factors: &'c VolumeFactors,
}

impl<'c> RecipeResolver<'c> {
    /// Creates a resolver.
    pub fn new(catalog: &'c CostingCatalog, factors: &'c VolumeFactors) -> Self {
        Self { catalog, factors }
    }

    /// Resolves the recipe and multiplier for one component of a tier.
    ///
    /// Batter is always resolved; filling and frosting only when the tier names them.
    ///
    /// # Errors
    ///
    /// - [`CostingError::UnknownRecipe`]: the tier references a recipe missing from the catalog.
    /// - [`CostingError::RecipeKindMismatch`]: the referenced recipe is of another kind.
    pub fn resolve(
        &self,
        tier: &Tier,
        kind: RecipeKind,
        volume_ml: Decimal,
    ) -> Result<Resolution, CostingError> {
        let component = tier.component(kind);

        if kind != RecipeKind::Batter && !component.is_requested() {
            return Ok(Resolution::NotRequested);
        }

        let selected = match component.recipe {
            Some(key) => Some(self.explicit(tier.index, kind, key)?),
            None => self.select(kind, component.text()),
        };

        let Some((matched_by, (key, recipe))) = selected else {
            return Ok(Resolution::Missing);
        };

        let (multiplier, multiplier_source) = match component.multiplier {
            Some(multiplier) => (multiplier, MultiplierSource::Explicit),
            None => self.multiplier(recipe, volume_ml)?,
        };

        debug!(
            tier = tier.index,
            %kind,
            recipe = %recipe.name,
            ?matched_by,
            %multiplier,
            "resolved recipe"
        );

        Ok(Resolution::Resolved(ResolvedRecipe {
            kind,
            recipe: key,
            name: recipe.name.clone(),
            multiplier,
            matched_by,
            multiplier_source,
        }))
    }

    /// Picks a recipe of the given kind for a free-text name.
    ///
    /// Without text only the first-of-kind fallback applies.
    pub fn select(
        &self,
        kind: RecipeKind,
        text: Option<&str>,
    ) -> Option<(RecipeMatch, Candidate<'c>)> {
        let candidates: Vec<Candidate<'c>> = self.catalog.recipes_of_kind(kind).collect();
        let text = text.map(normalize_name).unwrap_or_default();

        STRATEGIES
            .iter()
            .find_map(|(matched_by, strategy)| {
                strategy(&text, &candidates).map(|candidate| (*matched_by, candidate))
            })
    }

    /// Batches of `recipe` needed for a tier of `volume_ml`.
    ///
    /// The needed volume is the tier volume times the kind's volume factor; the multiplier is that
    /// over the recipe yield, rounded to two places.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::MoneyOverflow`] if the multiplier does not fit in a `Decimal`.
    pub fn multiplier(
        &self,
        recipe: &Recipe,
        volume_ml: Decimal,
    ) -> Result<(Decimal, MultiplierSource), CostingError> {
        let Some(yield_ml) = recipe
            .yield_volume_ml
            .filter(|yield_ml| *yield_ml > Decimal::ZERO)
        else {
            return Ok((Decimal::ONE, MultiplierSource::NoYieldVolume));
        };

        let needed = money_mul(volume_ml, self.factors.for_kind(recipe.kind))?;
        let multiplier = needed
            .checked_div(yield_ml)
            .ok_or(CostingError::MoneyOverflow(needed))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Ok((multiplier, MultiplierSource::Volume))
    }

    fn explicit(
        &self,
        tier: usize,
        kind: RecipeKind,
        key: RecipeKey,
    ) -> Result<(RecipeMatch, Candidate<'c>), CostingError> {
        let recipe = self
            .catalog
            .recipe(key)
            .ok_or(CostingError::UnknownRecipe(key))?;

        if recipe.kind != kind {
            return Err(CostingError::RecipeKindMismatch {
                tier,
                expected: kind,
                recipe: recipe.name.clone(),
            });
        }

        Ok((RecipeMatch::Explicit, (key, recipe)))
    }
}
