//! Per-channel sweeps: the same question asked of every configured channel.
//!
//! Every quote in a sweep shares the unit cost and tax rate, and differs only
//! by commission, so results line up side by side:
//! "same margin => different prices" ([`ChannelSweep::by_margin`]) and
//! "same price => different margins" ([`ChannelSweep::at_price`]).

use serde::{Deserialize, Serialize};

use super::{ChannelMetrics, ChannelPricingSolver, PricingError};
use crate::domain::catalog::{Channel, Product};
use crate::domain::foundation::ChannelId;

/// Result for one channel of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteOutcome {
    Priced { metrics: ChannelMetrics },
    /// The solver rejected the inputs: an infeasible target or a bad cost.
    Unpriced { error: PricingError },
}

/// A channel's answer within a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelQuote {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub commission_rate: f64,
    pub is_counter: bool,
    pub outcome: QuoteOutcome,
}

impl ChannelQuote {
    fn new(channel: &Channel, result: Result<ChannelMetrics, PricingError>) -> Self {
        let outcome = match result {
            Ok(metrics) => QuoteOutcome::Priced { metrics },
            Err(error) => QuoteOutcome::Unpriced { error },
        };
        Self {
            channel_id: channel.id,
            channel_name: channel.name.clone(),
            commission_rate: channel.commission(),
            is_counter: channel.is_counter,
            outcome,
        }
    }

    /// Metrics if the channel could be priced.
    pub fn metrics(&self) -> Option<&ChannelMetrics> {
        match &self.outcome {
            QuoteOutcome::Priced { metrics } => Some(metrics),
            QuoteOutcome::Unpriced { .. } => None,
        }
    }

    /// Solver error if the channel could not be priced.
    pub fn error(&self) -> Option<&PricingError> {
        match &self.outcome {
            QuoteOutcome::Priced { .. } => None,
            QuoteOutcome::Unpriced { error } => Some(error),
        }
    }
}

/// Sweeps over a channel list. Output order follows the input order.
pub struct ChannelSweep;

impl ChannelSweep {
    /// Price per channel reaching the same target margin.
    pub fn by_margin(
        unit_cost: f64,
        target_margin: f64,
        tax_rate: f64,
        channels: &[Channel],
    ) -> Vec<ChannelQuote> {
        channels
            .iter()
            .map(|channel| {
                ChannelQuote::new(
                    channel,
                    ChannelPricingSolver::quote_for_margin(
                        unit_cost,
                        target_margin,
                        tax_rate,
                        channel.commission(),
                    ),
                )
            })
            .collect()
    }

    /// Price per channel reaching the same target CMV.
    pub fn by_cmv(
        unit_cost: f64,
        target_cmv: f64,
        tax_rate: f64,
        channels: &[Channel],
    ) -> Vec<ChannelQuote> {
        channels
            .iter()
            .map(|channel| {
                ChannelQuote::new(
                    channel,
                    ChannelPricingSolver::quote_for_cmv(
                        unit_cost,
                        target_cmv,
                        tax_rate,
                        channel.commission(),
                    ),
                )
            })
            .collect()
    }

    /// Margin per channel when every channel charges the same price.
    pub fn at_price(
        unit_cost: f64,
        price: f64,
        tax_rate: f64,
        channels: &[Channel],
    ) -> Vec<ChannelQuote> {
        channels
            .iter()
            .map(|channel| {
                ChannelQuote::new(
                    channel,
                    Ok(ChannelPricingSolver::metrics_at_price(
                        unit_cost,
                        price,
                        tax_rate,
                        channel.commission(),
                    )),
                )
            })
            .collect()
    }

    /// Metrics per channel at the product's own price on that channel.
    pub fn for_product(
        product: &Product,
        unit_cost: f64,
        tax_rate: f64,
        channels: &[Channel],
    ) -> Vec<ChannelQuote> {
        channels
            .iter()
            .map(|channel| {
                ChannelQuote::new(
                    channel,
                    Ok(ChannelPricingSolver::metrics_at_price(
                        unit_cost,
                        product.price_for(&channel.id),
                        tax_rate,
                        channel.commission(),
                    )),
                )
            })
            .collect()
    }
}
