//! Costing Module - ingredient cost roll-up and product costing.
//!
//! # Components
//!
//! - `CostGraph` - resolves composed-ingredient costs through nested recipes
//!   and rejects cyclic compositions
//! - `BomCostAggregator` - product batch and unit cost from resolved costs
//!
//! Both are pure: persisting recomputed costs is the caller's job.

mod bom_aggregator;
mod cost_graph;
mod errors;

pub use bom_aggregator::{BomCost, BomCostAggregator, LineCost};
pub use cost_graph::{CostGraph, CostResolution, ResolvedCost};
pub use errors::{CostingError, DataQualityWarning};
