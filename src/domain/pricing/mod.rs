//! Pricing Module - channel pricing algebra and price-change records.
//!
//! # Components
//!
//! - `ChannelPricingSolver` - forward (target margin / target CMV -> price)
//!   and backward (price -> margin, CMV, profit) for one channel
//! - `ChannelSweep` - the same computation across every configured channel
//! - `PricingConfig` - a business's targets, passed explicitly to every call
//! - `PriceChangeRecord` - audit entry written when a price is applied

mod config;
mod errors;
mod price_change;
mod solver;
mod sweep;

pub use config::{
    PricingConfig, DEFAULT_AVERAGE_TAX_RATE, DEFAULT_TARGET_CMV_RATE, DEFAULT_TARGET_MARGIN_RATE,
};
pub use errors::PricingError;
pub use price_change::{PriceChangeRecord, PriceChangeSource};
pub use solver::{
    ChannelMetrics, ChannelPricingSolver, MAX_TARGET_CMV, MIN_COST_COVERAGE_HEADROOM,
    MIN_TARGET_CMV, MIN_VIABLE_COST_RATIO,
};
pub use sweep::{ChannelQuote, ChannelSweep, QuoteOutcome};
