//! Order and Quote Fixtures
//!
//! Orders and quotes share one cake description, so an order and a quote written the same way
//! produce the same [`CostingInput`].

use std::fs;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    catalog::{DecorationUnit, RecipeKind},
    fixtures::{Fixture, FixtureError, parse_decimal, parse_optional_decimal, parse_percentage},
    geometry::{Complexity, Shape},
    snapshot::{
        CostingInput, DeliveryRequest, Discount, DiscountKind, Order, OrderDecoration, Quote, Tier,
        TierComponent, Topper,
    },
};

/// Orders file from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrdersFixture {
    /// Order reference -> order
    pub orders: FxHashMap<String, OrderFixture>,
}

/// Quotes file from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuotesFixture {
    /// Quote reference -> quote
    pub quotes: FxHashMap<String, QuoteFixture>,
}

/// Order from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderFixture {
    /// Customer name
    pub customer: String,

    /// Event date (e.g., "2026-06-14")
    pub event_date: Option<String>,

    /// Cake details
    pub cake: CakeFixture,
}

/// Quote from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteFixture {
    /// Customer name
    pub customer: String,

    /// Days the quote stays valid
    pub valid_days: Option<u32>,

    /// Cake details
    pub cake: CakeFixture,
}

/// Cake description shared by orders and quotes
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CakeFixture {
    /// Tiers, bottom first
    pub tiers: Vec<TierFixture>,

    /// Decoration lines
    #[serde(default)]
    pub decorations: Vec<DecorationFixture>,

    /// Complexity level from 1 to 3
    pub complexity: Option<u8>,

    /// Delivery; pickup when absent
    pub delivery: Option<DeliveryFixture>,

    /// Extra baker hours
    pub baker_hours: Option<String>,

    /// Extra assistant hours
    pub assistant_hours: Option<String>,

    /// Topper
    pub topper: Option<TopperFixture>,

    /// Markup (e.g., "70%")
    pub markup: Option<String>,

    /// Discount
    pub discount: Option<DiscountFixture>,
}

/// Tier from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierFixture {
    /// Written size (e.g., `8" round`)
    pub size: Option<String>,

    /// Shape for measured dimensions
    pub shape: Option<Shape>,

    /// Measured diameter or width in cm
    pub diameter_cm: Option<f64>,

    /// Measured length in cm
    pub length_cm: Option<f64>,

    /// Measured height in cm
    pub height_cm: Option<f64>,

    /// Stored volume in ml
    pub volume_ml: Option<String>,

    /// Servings
    pub servings: u32,

    /// Batter
    pub batter: Option<ComponentFixture>,

    /// Filling
    pub filling: Option<ComponentFixture>,

    /// Frosting
    pub frosting: Option<ComponentFixture>,

    /// Assembly minutes
    pub assembly_minutes: Option<String>,

    /// Assembly role
    pub assembly_role: Option<String>,
}

/// Tier component from YAML: free text, or a detailed reference
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ComponentFixture {
    /// Free-text name (e.g., "Chocolate")
    Text(String),

    /// Detailed component
    Detailed {
        /// Recipe key
        recipe: Option<String>,

        /// Free-text name
        text: Option<String>,

        /// Explicit multiplier
        multiplier: Option<String>,
    },
}

/// Decoration line from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecorationFixture {
    /// Technique key
    pub technique: String,

    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Unit override
    pub unit: Option<DecorationUnit>,
}

fn default_quantity() -> u32 {
    1
}

/// Delivery from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryFixture {
    /// Zone key
    pub zone: Option<String>,

    /// Trip distance in miles
    pub distance_miles: Option<String>,
}

/// Topper from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopperFixture {
    /// Topper type: "custom", "none" or a stock type
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Wording
    pub text: Option<String>,

    /// Fee of a custom topper
    pub fee: Option<String>,
}

/// Discount from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscountFixture {
    /// "percent" or "fixed"
    #[serde(rename = "type")]
    pub kind: DiscountKind,

    /// Percent points or amount
    pub value: String,

    /// Reason
    pub reason: Option<String>,
}

impl Fixture {
    /// Load orders from a YAML fixture file
    ///
    /// The catalog must already be loaded so references can be resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an order references a missing
    /// catalog entry.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(self.file_path("orders", name))?;
        let fixture: OrdersFixture = serde_norway::from_str(&contents)?;

        for (reference, order) in fixture.orders {
            let input = self.costing_input(order.cake)?;

            self.orders.insert(
                reference.clone(),
                Order {
                    reference,
                    customer: order.customer,
                    event_date: order.event_date,
                    input,
                },
            );
        }

        Ok(self)
    }

    /// Load quotes from a YAML fixture file
    ///
    /// The catalog must already be loaded so references can be resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a quote references a missing
    /// catalog entry.
    pub fn load_quotes(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(self.file_path("quotes", name))?;
        let fixture: QuotesFixture = serde_norway::from_str(&contents)?;

        for (reference, quote) in fixture.quotes {
            let input = self.costing_input(quote.cake)?;

            self.quotes.insert(
                reference.clone(),
                Quote {
                    reference,
                    customer: quote.customer,
                    valid_days: quote.valid_days,
                    input,
                },
            );
        }

        Ok(self)
    }

    /// Convert a cake description into engine input, resolving catalog references
    ///
    /// # Errors
    ///
    /// Returns an error if a reference is missing or a value is malformed.
    pub fn costing_input(&self, cake: CakeFixture) -> Result<CostingInput, FixtureError> {
        let tiers = cake
            .tiers
            .into_iter()
            .enumerate()
            .map(|(index, tier)| self.tier(index, tier))
            .collect::<Result<Vec<_>, _>>()?;

        let decorations = cake
            .decorations
            .into_iter()
            .map(|line| {
                Ok(OrderDecoration {
                    technique: self.technique_key(&line.technique)?,
                    quantity: line.quantity,
                    unit_override: line.unit,
                })
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let complexity = match cake.complexity {
            Some(level) => Complexity::try_from(level).map_err(FixtureError::InvalidComplexity)?,
            None => Complexity::default(),
        };

        let delivery = cake
            .delivery
            .map(|delivery| {
                Ok::<_, FixtureError>(DeliveryRequest {
                    zone: delivery
                        .zone
                        .as_deref()
                        .map(|zone| self.zone_key(zone))
                        .transpose()?,
                    distance_miles: parse_optional_decimal(delivery.distance_miles.as_deref())?,
                })
            })
            .transpose()?;

        let topper = match cake.topper {
            Some(topper) => Topper::from_parts(
                topper.kind.as_deref(),
                topper.text.as_deref(),
                parse_optional_decimal(topper.fee.as_deref())?,
            ),
            None => Topper::None,
        };

        let discount = cake
            .discount
            .map(|discount| {
                Ok::<_, FixtureError>(Discount {
                    kind: discount.kind,
                    value: parse_decimal(&discount.value)?,
                    reason: discount.reason,
                })
            })
            .transpose()?;

        Ok(CostingInput {
            tiers,
            decorations,
            complexity,
            delivery,
            baker_hours: parse_optional_decimal(cake.baker_hours.as_deref())?,
            assistant_hours: parse_optional_decimal(cake.assistant_hours.as_deref())?,
            topper,
            markup: cake.markup.as_deref().map(parse_percentage).transpose()?,
            discount,
        })
    }

    fn tier(&self, index: usize, fixture: TierFixture) -> Result<Tier, FixtureError> {
        let mut tier = Tier::new(index, fixture.servings);

        tier.size_name = fixture.size;
        tier.shape = fixture.shape.unwrap_or_default();
        tier.diameter_cm = fixture.diameter_cm;
        tier.length_cm = fixture.length_cm;
        tier.height_cm = fixture.height_cm;
        tier.volume_ml = parse_optional_decimal(fixture.volume_ml.as_deref())?;
        tier.assembly_minutes = parse_optional_decimal(fixture.assembly_minutes.as_deref())?;
        tier.assembly_role = fixture.assembly_role;

        for (kind, component) in [
            (RecipeKind::Batter, fixture.batter),
            (RecipeKind::Filling, fixture.filling),
            (RecipeKind::Frosting, fixture.frosting),
        ] {
            let Some(component) = component else {
                continue;
            };

            let component = self.component(component)?;

            match kind {
                RecipeKind::Batter => tier.batter = component,
                RecipeKind::Filling => tier.filling = component,
                RecipeKind::Frosting => tier.frosting = component,
            }
        }

        Ok(tier)
    }

    fn component(&self, fixture: ComponentFixture) -> Result<TierComponent, FixtureError> {
        match fixture {
            ComponentFixture::Text(text) => Ok(TierComponent {
                text: Some(text),
                ..TierComponent::default()
            }),
            ComponentFixture::Detailed {
                recipe,
                text,
                multiplier,
            } => Ok(TierComponent {
                recipe: recipe.as_deref().map(|key| self.recipe_key(key)).transpose()?,
                multiplier: parse_optional_decimal(multiplier.as_deref())?,
                text,
            }),
        }
    }
}
