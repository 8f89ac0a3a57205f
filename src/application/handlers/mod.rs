//! Application handlers.
//!
//! Command and query handlers that fetch a catalog snapshot, run the pure
//! domain over it and persist accepted results.

pub mod costing;
pub mod menu;
pub mod pricing;

pub use costing::{
    RecomputeIngredientCostsCommand, RecomputeIngredientCostsHandler,
    RecomputeIngredientCostsResult,
};
pub use menu::{AnalyzeMenuHandler, AnalyzeMenuQuery, AnalyzeMenuResult};
pub use pricing::{
    ApplyPriceChangeCommand, ApplyPriceChangeError, ApplyPriceChangeHandler,
    QuoteChannelPricesHandler, QuoteChannelPricesQuery, QuoteChannelPricesResult, QuoteMode,
    SuggestRepricingHandler, SuggestRepricingQuery,
};
