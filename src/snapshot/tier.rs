//! Tiers

use rust_decimal::Decimal;

use crate::{
    catalog::{RecipeKey, RecipeKind},
    geometry::{Shape, TierSize, cm_to_inches},
};

/// How one component (batter, filling or frosting) of a tier is chosen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TierComponent {
    /// Explicitly chosen recipe
    pub recipe: Option<RecipeKey>,

    /// Explicit batch multiplier, skipping volume scaling
    pub multiplier: Option<Decimal>,

    /// Free-text flavor, filling or finish name
    pub text: Option<String>,
}

impl TierComponent {
    /// Whether this component names anything at all.
    pub fn is_requested(&self) -> bool {
        self.recipe.is_some() || self.text().is_some()
    }

    /// The free text, if it is not blank.
    pub fn text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// One tier of a cake.
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    /// Position, bottom tier first
    pub index: usize,

    /// Size as written on the order, e.g. `8" round`
    pub size_name: Option<String>,

    /// Shape used with the measured dimensions
    pub shape: Shape,

    /// Measured diameter or width
    pub diameter_cm: Option<f64>,

    /// Measured length of rectangle and oval tiers
    pub length_cm: Option<f64>,

    /// Measured finished height
    pub height_cm: Option<f64>,

    /// Stored volume; derived from the size when absent
    pub volume_ml: Option<Decimal>,

    /// Servings this tier yields
    pub servings: u32,

    /// Batter component (free text is the flavor)
    pub batter: TierComponent,

    /// Filling component
    pub filling: TierComponent,

    /// Frosting component (free text is the finish)
    pub frosting: TierComponent,

    /// Assembly time; taken from the size when absent
    pub assembly_minutes: Option<Decimal>,

    /// Role doing the assembly, Baker when unset
    pub assembly_role: Option<String>,
}

impl Tier {
    /// Creates a tier with no size or recipes.
    pub fn new(index: usize, servings: u32) -> Self {
        Self {
            index,
            size_name: None,
            shape: Shape::Round,
            diameter_cm: None,
            length_cm: None,
            height_cm: None,
            volume_ml: None,
            servings,
            batter: TierComponent::default(),
            filling: TierComponent::default(),
            frosting: TierComponent::default(),
            assembly_minutes: None,
            assembly_role: None,
        }
    }

    /// Sets the written size.
    #[must_use]
    pub fn with_size_name(mut self, size_name: impl Into<String>) -> Self {
        self.size_name = Some(size_name.into());
        self
    }

    /// Sets measured dimensions.
    #[must_use]
    pub fn with_dimensions_cm(
        mut self,
        shape: Shape,
        diameter_cm: f64,
        length_cm: Option<f64>,
    ) -> Self {
        self.shape = shape;
        self.diameter_cm = Some(diameter_cm);
        self.length_cm = length_cm;
        self
    }

    /// Sets the stored volume.
    #[must_use]
    pub fn with_volume_ml(mut self, volume_ml: Decimal) -> Self {
        self.volume_ml = Some(volume_ml);
        self
    }

    /// Sets the free text of a component.
    #[must_use]
    pub fn with_text(mut self, kind: RecipeKind, text: impl Into<String>) -> Self {
        self.component_mut(kind).text = Some(text.into());
        self
    }

    /// Sets the explicit recipe of a component.
    #[must_use]
    pub fn with_recipe(mut self, kind: RecipeKind, recipe: RecipeKey) -> Self {
        self.component_mut(kind).recipe = Some(recipe);
        self
    }

    /// Sets the explicit multiplier of a component.
    #[must_use]
    pub fn with_multiplier(mut self, kind: RecipeKind, multiplier: Decimal) -> Self {
        self.component_mut(kind).multiplier = Some(multiplier);
        self
    }

    /// Sets the assembly labor.
    #[must_use]
    pub fn with_assembly(mut self, minutes: Decimal, role: Option<&str>) -> Self {
        self.assembly_minutes = Some(minutes);
        self.assembly_role = role.map(str::to_string);
        self
    }

    /// The component producing the given recipe kind.
    pub fn component(&self, kind: RecipeKind) -> &TierComponent {
        match kind {
            RecipeKind::Batter => &self.batter,
            RecipeKind::Filling => &self.filling,
            RecipeKind::Frosting => &self.frosting,
        }
    }

    fn component_mut(&mut self, kind: RecipeKind) -> &mut TierComponent {
        match kind {
            RecipeKind::Batter => &mut self.batter,
            RecipeKind::Filling => &mut self.filling,
            RecipeKind::Frosting => &mut self.frosting,
        }
    }

    /// Size from the measured dimensions, in inches.
    pub fn measured_size(&self) -> Option<TierSize> {
        let diameter_in = cm_to_inches(self.diameter_cm?);

        Some(TierSize {
            shape: self.shape,
            diameter_in,
            length_in: self.length_cm.map(cm_to_inches),
        })
    }

    /// The written size, if it is not blank.
    pub fn size_name(&self) -> Option<&str> {
        self.size_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
