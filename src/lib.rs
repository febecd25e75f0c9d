//! Bakecost
//!
//! Bakecost is a cost and price calculator for custom tiered cakes. It works out tier volumes from
//! their sizes, scales the chosen recipes to fit, and prices ingredients, labor, decorations,
//! topper and delivery into a suggested and final price.

pub mod catalog;
pub mod costing;
pub mod decorations;
pub mod fixtures;
pub mod geometry;
pub mod ingredients;
pub mod labor;
pub mod prelude;
pub mod pricing;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod snapshot;
