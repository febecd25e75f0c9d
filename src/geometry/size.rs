//! Tier sizes

use std::sync::LazyLock;

use regex::Regex;

use super::Shape;

/// Size used when a size string cannot be understood.
const FALLBACK_DIAMETER_IN: f64 = 8.0;

static DIMENSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").ok());

/// Shape and dimensions of a tier, in inches.
///
/// For round, square, heart and hexagon tiers `diameter_in` is the single characteristic
/// dimension. Rectangle and oval tiers treat it as the width and take an optional length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSize {
    /// Tier shape
    pub shape: Shape,

    /// Diameter or width in inches
    pub diameter_in: f64,

    /// Length in inches for rectangle and oval tiers
    pub length_in: Option<f64>,
}

impl TierSize {
    /// Creates a size with a single dimension.
    pub fn new(shape: Shape, diameter_in: f64) -> Self {
        Self {
            shape,
            diameter_in,
            length_in: None,
        }
    }

    /// Creates a size with a width and a length.
    pub fn with_length(shape: Shape, diameter_in: f64, length_in: f64) -> Self {
        Self {
            shape,
            diameter_in,
            length_in: Some(length_in),
        }
    }

    /// The 8" round used when a size string is unusable.
    pub fn fallback() -> Self {
        Self::new(Shape::Round, FALLBACK_DIAMETER_IN)
    }

    /// Parses a size name such as `8" round`, `10 inch square` or `9x13 rectangle`.
    ///
    /// Returns `None` when no positive, finite dimension can be found.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();

        let mut dimensions = DIMENSION
            .as_ref()?
            .find_iter(&lower)
            .filter_map(|found| found.as_str().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value > 0.0);

        let diameter_in = dimensions.next()?;
        let length_in = dimensions.next();

        let shape = Shape::ALL
            .into_iter()
            .find(|shape| lower.contains(shape.as_str()))
            .or_else(|| lower.contains("sheet").then_some(Shape::Rectangle))
            .unwrap_or(if length_in.is_some() {
                Shape::Rectangle
            } else {
                Shape::Round
            });

        Some(Self {
            shape,
            diameter_in,
            length_in,
        })
    }

    /// Parses a size name, falling back to an 8" round.
    pub fn parse_or_fallback(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(Self::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inch_marks_and_shapes() {
        assert_eq!(
            TierSize::parse("8\" round"),
            Some(TierSize::new(Shape::Round, 8.0))
        );
        assert_eq!(
            TierSize::parse("10 inch Square"),
            Some(TierSize::new(Shape::Square, 10.0))
        );
        assert_eq!(
            TierSize::parse("6in heart"),
            Some(TierSize::new(Shape::Heart, 6.0))
        );
    }

    #[test]
    fn two_dimensions_default_to_rectangle() {
        assert_eq!(
            TierSize::parse("9x13"),
            Some(TierSize::with_length(Shape::Rectangle, 9.0, 13.0))
        );
        assert_eq!(
            TierSize::parse("8 x 12 oval"),
            Some(TierSize::with_length(Shape::Oval, 8.0, 12.0))
        );
    }

    #[test]
    fn quarter_sheet_is_rectangle() {
        assert_eq!(
            TierSize::parse("9x13 quarter sheet"),
            Some(TierSize::with_length(Shape::Rectangle, 9.0, 13.0))
        );
    }

    #[test]
    fn bare_number_is_round() {
        assert_eq!(
            TierSize::parse("12"),
            Some(TierSize::new(Shape::Round, 12.0))
        );
    }

    #[test]
    fn unparseable_sizes_fall_back_to_eight_inch_round() {
        assert_eq!(TierSize::parse("large"), None);
        assert_eq!(TierSize::parse_or_fallback("large"), TierSize::fallback());
        assert_eq!(TierSize::parse_or_fallback(""), TierSize::fallback());
        assert_eq!(TierSize::parse_or_fallback("0\" round"), TierSize::fallback());
    }

    #[test]
    fn overflowing_numbers_are_ignored() {
        let huge = format!("{}\" round", "9".repeat(400));

        assert_eq!(TierSize::parse(&huge), None);
        assert_eq!(TierSize::parse_or_fallback(&huge), TierSize::fallback());
        assert_eq!(
            TierSize::parse(&format!("{} x 10 sheet", "9".repeat(400))),
            Some(TierSize::new(Shape::Rectangle, 10.0))
        );
    }
}
