//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write through `CatalogWriter`; query handlers only read.

pub mod handlers;

pub use handlers::{
    // Costing
    RecomputeIngredientCostsCommand, RecomputeIngredientCostsHandler,
    RecomputeIngredientCostsResult,
    // Menu analysis
    AnalyzeMenuHandler, AnalyzeMenuQuery, AnalyzeMenuResult,
    // Pricing
    ApplyPriceChangeCommand, ApplyPriceChangeError, ApplyPriceChangeHandler,
    QuoteChannelPricesHandler, QuoteChannelPricesQuery, QuoteChannelPricesResult, QuoteMode,
    SuggestRepricingHandler, SuggestRepricingQuery,
};
