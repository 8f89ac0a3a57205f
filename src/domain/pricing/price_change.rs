//! Audit record of an applied price change.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, PriceChangeId, ProductId, Timestamp};

/// What produced the new price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceChangeSource {
    Manual,
    TargetMargin,
    TargetCmv,
    CostImpact,
}

impl PriceChangeSource {
    /// Returns the wire label for this source.
    pub fn label(&self) -> &'static str {
        match self {
            PriceChangeSource::Manual => "manual",
            PriceChangeSource::TargetMargin => "target-margin",
            PriceChangeSource::TargetCmv => "target-cmv",
            PriceChangeSource::CostImpact => "cost-impact",
        }
    }
}

/// One applied price change. `channel_id` is `None` for the base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChangeRecord {
    pub id: PriceChangeId,
    pub product_id: ProductId,
    pub channel_id: Option<ChannelId>,
    pub previous_price: f64,
    pub new_price: f64,
    pub source: PriceChangeSource,
    pub timestamp: Timestamp,
}

impl PriceChangeRecord {
    pub fn new(
        product_id: ProductId,
        channel_id: Option<ChannelId>,
        previous_price: f64,
        new_price: f64,
        source: PriceChangeSource,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: PriceChangeId::new(),
            product_id,
            channel_id,
            previous_price,
            new_price,
            source,
            timestamp,
        }
    }

    /// Signed change, `new - previous`.
    pub fn delta(&self) -> f64 {
        self.new_price - self.previous_price
    }
}
