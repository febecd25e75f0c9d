//! Tier geometry
//!
//! Pure conversions from a tier's physical dimensions into volume, surface area and the
//! production quantities (batter, buttercream, assembly time) derived from them.
//!
//! All dimensions are in inches. Heart and hexagon shapes use deliberate approximations and
//! several regression values depend on them, so they must stay as they are.

use std::{f64::consts::PI, fmt};

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::Deserialize;

use crate::settings::GeometrySettings;

mod size;

pub use size::TierSize;

/// Millilitres in one cubic inch.
pub const ML_PER_CUBIC_INCH: f64 = 16.387;

/// Grams in one avoirdupois ounce.
pub const GRAMS_PER_OUNCE: f64 = 28.3495;

/// Centimetres in one inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Assembly time used for sizes missing from the assembly table.
pub const DEFAULT_ASSEMBLY_MINUTES: u32 = 20;

/// Diameter the buttercream baseline is measured against.
const BUTTERCREAM_BASELINE_DIAMETER: f64 = 6.0;

/// Heart footprint as a fraction of its bounding square.
const HEART_AREA_FACTOR: f64 = 0.8;

/// Cake tier shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Circular tier
    #[default]
    Round,

    /// Square tier
    Square,

    /// Rectangular sheet tier
    Rectangle,

    /// Elliptical tier
    Oval,

    /// Heart-shaped tier
    Heart,

    /// Regular hexagonal tier, measured across the corners
    Hexagon,
}

impl Shape {
    /// All shapes, in declaration order.
    pub const ALL: [Shape; 6] = [
        Shape::Round,
        Shape::Square,
        Shape::Rectangle,
        Shape::Oval,
        Shape::Heart,
        Shape::Hexagon,
    ];

    /// Lowercase shape name.
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Round => "round",
            Shape::Square => "square",
            Shape::Rectangle => "rectangle",
            Shape::Oval => "oval",
            Shape::Heart => "heart",
            Shape::Hexagon => "hexagon",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoration complexity, which scales the crumb coat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Complexity {
    /// Level 1
    #[default]
    Simple,

    /// Level 2
    Moderate,

    /// Level 3
    Elaborate,
}

impl Complexity {
    /// Crumb coat multiplier for this level.
    pub fn multiplier(self) -> f64 {
        match self {
            Complexity::Simple => 1.0,
            Complexity::Moderate => 1.5,
            Complexity::Elaborate => 2.0,
        }
    }
}

impl TryFrom<u8> for Complexity {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Complexity::Simple),
            2 => Ok(Complexity::Moderate),
            3 => Ok(Complexity::Elaborate),
            other => Err(other),
        }
    }
}

/// Top, side and total surface area in square inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceArea {
    /// Footprint area
    pub top: f64,

    /// Perimeter times height
    pub side: f64,

    /// Top plus side
    pub total: f64,
}

/// Batter needed to bake one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterEstimate {
    /// Batter mass in grams
    pub grams: f64,

    /// Batter mass in ounces
    pub ounces: f64,

    /// Number of baked layers
    pub layers: u32,
}

/// Buttercream needed to fill and crumb coat one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtercreamEstimate {
    /// Buttercream between the layers
    pub internal_grams: f64,

    /// Buttercream for the outer crumb coat
    pub crumb_coat_grams: f64,

    /// Internal plus crumb coat
    pub total_grams: f64,
}

/// Volume of a single layer in cubic inches.
pub fn layer_volume(size: &TierSize, layer_height_in: f64) -> f64 {
    size.footprint_area() * layer_height_in
}

/// Volume of a whole tier in millilitres, rounded to the nearest millilitre.
pub fn tier_volume_ml(size: &TierSize, settings: &GeometrySettings) -> Decimal {
    let cubic_inches =
        layer_volume(size, settings.layer_height_in) * f64::from(settings.layers_per_tier);

    Decimal::from_f64(cubic_inches * ML_PER_CUBIC_INCH)
        .unwrap_or_default()
        .round()
}

/// Surface area of a tier of the given height.
pub fn surface_area(size: &TierSize, height_in: f64) -> SurfaceArea {
    let top = size.footprint_area();
    let side = size.perimeter() * height_in;

    SurfaceArea {
        top,
        side,
        total: top + side,
    }
}

/// Batter required for one tier, accounting for bake shrinkage.
pub fn batter_for_tier(size: &TierSize, settings: &GeometrySettings) -> BatterEstimate {
    let per_layer = layer_volume(size, settings.layer_height_in) / settings.shrinkage_factor;
    let grams =
        per_layer * f64::from(settings.layers_per_tier) * settings.batter_grams_per_cubic_inch;

    BatterEstimate {
        grams,
        ounces: grams / GRAMS_PER_OUNCE,
        layers: settings.layers_per_tier,
    }
}

/// Buttercream required for one tier.
///
/// The internal filling scales with area against a 6" baseline; the crumb coat scales with the
/// tier's full surface area and the decoration complexity.
pub fn buttercream_for_tier(
    size: &TierSize,
    complexity: Complexity,
    height_in: f64,
    settings: &GeometrySettings,
) -> ButtercreamEstimate {
    let ratio = size.diameter_in / BUTTERCREAM_BASELINE_DIAMETER;
    let internal_grams = settings.buttercream_internal_grams * ratio * ratio;

    let area = surface_area(size, height_in);
    let crumb_coat_grams =
        area.total * settings.crumb_coat_grams_per_sq_in * complexity.multiplier();

    ButtercreamEstimate {
        internal_grams,
        crumb_coat_grams,
        total_grams: internal_grams + crumb_coat_grams,
    }
}

/// Minutes needed to stack, fill and crumb coat a tier of the given diameter.
pub fn assembly_minutes(diameter_in: f64) -> u32 {
    let inches = Decimal::from_f64(diameter_in)
        .map(|value| value.round())
        .and_then(|value| value.to_u32());

    match inches {
        Some(6) => 15,
        Some(8) => 20,
        Some(10) => 25,
        Some(12) => 30,
        Some(14) => 35,
        _ => DEFAULT_ASSEMBLY_MINUTES,
    }
}

/// Converts centimetres to inches.
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

impl TierSize {
    /// Area of the tier's footprint in square inches.
    pub fn footprint_area(&self) -> f64 {
        let d = self.diameter_in;
        let l = self.length();

        match self.shape {
            Shape::Round => PI * (d / 2.0) * (d / 2.0),
            Shape::Square => d * d,
            Shape::Rectangle => d * l,
            Shape::Oval => PI * (d / 2.0) * (l / 2.0),
            Shape::Heart => HEART_AREA_FACTOR * d * d,
            Shape::Hexagon => {
                let side = hexagon_side(d);

                (3.0 * 3.0_f64.sqrt() / 2.0) * side * side
            }
        }
    }

    /// Length of the tier's outline in inches.
    pub fn perimeter(&self) -> f64 {
        let d = self.diameter_in;
        let l = self.length();

        match self.shape {
            Shape::Round | Shape::Heart => PI * d,
            Shape::Square => 4.0 * d,
            Shape::Rectangle => 2.0 * (d + l),
            Shape::Oval => {
                let (a, b) = (d / 2.0, l / 2.0);

                PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
            }
            Shape::Hexagon => 6.0 * hexagon_side(d),
        }
    }

    fn length(&self) -> f64 {
        self.length_in.unwrap_or(self.diameter_in)
    }
}

fn hexagon_side(diameter: f64) -> f64 {
    diameter / 3.0_f64.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GeometrySettings {
        GeometrySettings::default()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn round_layer_volume_is_pi_r_squared_h() {
        let size = TierSize::new(Shape::Round, 8.0);

        assert!(close(layer_volume(&size, 2.0), PI * 16.0 * 2.0));
    }

    #[test]
    fn rectangle_and_oval_use_length() {
        let rectangle = TierSize::with_length(Shape::Rectangle, 9.0, 13.0);
        let oval = TierSize::with_length(Shape::Oval, 6.0, 10.0);

        assert!(close(layer_volume(&rectangle, 2.0), 9.0 * 13.0 * 2.0));
        assert!(close(layer_volume(&oval, 1.0), PI * 3.0 * 5.0));
    }

    #[test]
    fn rectangle_without_length_is_square() {
        let rectangle = TierSize::new(Shape::Rectangle, 10.0);
        let square = TierSize::new(Shape::Square, 10.0);

        assert!(close(
            layer_volume(&rectangle, 2.0),
            layer_volume(&square, 2.0)
        ));
    }

    #[test]
    fn heart_and_hexagon_use_approximations() {
        let heart = TierSize::new(Shape::Heart, 10.0);
        let hexagon = TierSize::new(Shape::Hexagon, 6.0);

        assert!(close(layer_volume(&heart, 1.0), 80.0));

        // side = 6 / sqrt(3), area = (3 * sqrt(3) / 2) * side^2 = 18 * sqrt(3) / 2
        assert!(close(layer_volume(&hexagon, 1.0), 9.0 * 3.0_f64.sqrt()));
    }

    #[test]
    fn surface_area_sums_top_and_side() {
        let size = TierSize::new(Shape::Square, 10.0);
        let area = surface_area(&size, 4.0);

        assert!(close(area.top, 100.0));
        assert!(close(area.side, 160.0));
        assert!(close(area.total, 260.0));
    }

    #[test]
    fn batter_scales_with_layers_and_shrinkage() {
        let size = TierSize::new(Shape::Square, 10.0);
        let settings = settings();
        let batter = batter_for_tier(&size, &settings);

        let expected = 100.0 * settings.layer_height_in / settings.shrinkage_factor
            * f64::from(settings.layers_per_tier)
            * settings.batter_grams_per_cubic_inch;

        assert!(close(batter.grams, expected));
        assert!(close(batter.ounces, expected / GRAMS_PER_OUNCE));
        assert_eq!(batter.layers, settings.layers_per_tier);
    }

    #[test]
    fn internal_buttercream_is_baseline_at_six_inches() {
        let settings = settings();
        let six = TierSize::new(Shape::Round, 6.0);
        let twelve = TierSize::new(Shape::Round, 12.0);
        let height = settings.tier_height_in();

        let small = buttercream_for_tier(&six, Complexity::Simple, height, &settings);
        let large = buttercream_for_tier(&twelve, Complexity::Simple, height, &settings);

        assert!(close(small.internal_grams, settings.buttercream_internal_grams));
        assert!(close(
            large.internal_grams,
            settings.buttercream_internal_grams * 4.0
        ));
        assert!(close(
            small.total_grams,
            small.internal_grams + small.crumb_coat_grams
        ));
    }

    #[test]
    fn elaborate_crumb_coat_is_double_simple() {
        let settings = settings();
        let size = TierSize::new(Shape::Round, 8.0);
        let height = settings.tier_height_in();

        let simple = buttercream_for_tier(&size, Complexity::Simple, height, &settings);
        let elaborate = buttercream_for_tier(&size, Complexity::Elaborate, height, &settings);

        assert!(close(elaborate.crumb_coat_grams, simple.crumb_coat_grams * 2.0));
    }

    #[test]
    fn complexity_levels_map_from_integers() {
        assert_eq!(Complexity::try_from(1), Ok(Complexity::Simple));
        assert_eq!(Complexity::try_from(2), Ok(Complexity::Moderate));
        assert_eq!(Complexity::try_from(3), Ok(Complexity::Elaborate));
        assert_eq!(Complexity::try_from(4), Err(4));
    }

    #[test]
    fn assembly_rounds_to_nearest_inch() {
        assert_eq!(assembly_minutes(7.9), 20);
        assert_eq!(assembly_minutes(10.2), 25);
        assert_eq!(assembly_minutes(-3.0), DEFAULT_ASSEMBLY_MINUTES);
        assert_eq!(assembly_minutes(f64::NAN), DEFAULT_ASSEMBLY_MINUTES);
    }

    #[test]
    fn centimetres_convert_to_inches() {
        assert!(close(cm_to_inches(25.4), 10.0));
    }
}
