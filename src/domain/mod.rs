//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, rates, rounding, errors)
//! - `catalog` - Ingredients, recipes, products, channels, sales, cost history
//! - `costing` - Cost roll-up through nested recipes and product costing
//! - `pricing` - Per-channel price / margin / CMV algebra
//! - `analysis` - Menu engineering and cost-change impact

pub mod analysis;
pub mod catalog;
pub mod costing;
pub mod foundation;
pub mod pricing;
