//! Analysis Module - Pure domain services for menu analysis.
//!
//! # Components
//!
//! - `MenuEngineeringClassifier` - Star / Workhorse / Puzzle / Dog matrix from
//!   median margin and median volume, plus margin and CMV health labels
//! - `CostImpactAnalyzer` - Re-pricing suggestions that restore each
//!   product's margin after ingredient cost increases
//!
//! # Design Philosophy
//!
//! All functions are pure (no side effects) and stateless. They take a
//! catalog snapshot or explicit inputs and return computed results; the
//! pricing targets always arrive as a parameter.

mod cost_impact;
mod menu_engineering;

pub use cost_impact::{
    AffectedLine, ChannelPriceSuggestion, CostImpactAnalyzer, ImpactPolicy, RepricingSuggestion,
    BAND_TOLERANCE,
};
pub use menu_engineering::{
    AnalysisResult, HealthLabel, MenuAnalysis, MenuEngineeringClassifier, MenuItem, MenuSummary,
    Quadrant, CMV_CRITICAL_OVERSHOOT, MARGIN_ATTENTION_FACTOR,
};
