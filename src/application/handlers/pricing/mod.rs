//! Pricing command and query handlers.

mod apply_price_change;
mod quote_channel_prices;
mod suggest_repricing;

pub use apply_price_change::{
    ApplyPriceChangeCommand, ApplyPriceChangeError, ApplyPriceChangeHandler,
};
pub use quote_channel_prices::{
    QuoteChannelPricesHandler, QuoteChannelPricesQuery, QuoteChannelPricesResult, QuoteMode,
};
pub use suggest_repricing::{SuggestRepricingHandler, SuggestRepricingQuery};
