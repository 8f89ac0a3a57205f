//! QuoteChannelPricesHandler - Query handler for per-channel price views.
//!
//! Costs one product from a fresh snapshot and runs a channel sweep. Nothing
//! is written; callers may re-invoke on every input change.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::costing::{BomCostAggregator, CostGraph};
use crate::domain::foundation::{BusinessId, DomainError, ErrorCode, ProductId};
use crate::domain::pricing::{ChannelQuote, ChannelSweep};
use crate::ports::{CatalogReader, SnapshotWindows};

/// Which question to ask of every channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum QuoteMode {
    /// Same margin on every channel; `None` uses the business target.
    TargetMargin(Option<f64>),
    /// Same CMV on every channel; `None` uses the business target.
    TargetCmv(Option<f64>),
    /// Same price on every channel.
    AtPrice(f64),
    /// Each channel at the product's current price on it.
    CurrentPrices,
}

#[derive(Debug, Clone)]
pub struct QuoteChannelPricesQuery {
    pub business_id: BusinessId,
    pub product_id: ProductId,
    pub mode: QuoteMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteChannelPricesResult {
    pub product_id: ProductId,
    pub unit_cost: f64,
    pub tax_rate: f64,
    pub quotes: Vec<ChannelQuote>,
}

/// Handler for channel price quotes.
pub struct QuoteChannelPricesHandler {
    reader: Arc<dyn CatalogReader>,
}

impl QuoteChannelPricesHandler {
    pub fn new(reader: Arc<dyn CatalogReader>) -> Self {
        Self { reader }
    }

    /// # Errors
    ///
    /// - `ProductNotFound` if the product is not in the catalog
    /// - `CyclicComposition` if the recipes contain a cycle
    ///
    /// Infeasible or zero-cost channels are reported per quote, not as `Err`.
    pub async fn handle(
        &self,
        query: QuoteChannelPricesQuery,
    ) -> Result<QuoteChannelPricesResult, DomainError> {
        let snapshot = self
            .reader
            .load_snapshot(&query.business_id, SnapshotWindows::default())
            .await?;
        let product = snapshot.product(&query.product_id).ok_or_else(|| {
            DomainError::new(ErrorCode::ProductNotFound, "Product not found")
                .with_detail("product_id", query.product_id.to_string())
        })?;

        let resolution =
            CostGraph::build(&snapshot.ingredients, &snapshot.bom_lines).resolve_all()?;
        let cost = BomCostAggregator::product_cost(
            product,
            snapshot.lines_for_product(&product.id),
            &resolution,
        );

        let pricing = &snapshot.pricing;
        let tax_rate = pricing.tax_rate();
        let channels = &snapshot.channels;
        let quotes = match query.mode {
            QuoteMode::TargetMargin(margin) => ChannelSweep::by_margin(
                cost.unit_cost,
                margin.unwrap_or_else(|| pricing.target_margin()),
                tax_rate,
                channels,
            ),
            QuoteMode::TargetCmv(cmv) => ChannelSweep::by_cmv(
                cost.unit_cost,
                cmv.unwrap_or_else(|| pricing.target_cmv()),
                tax_rate,
                channels,
            ),
            QuoteMode::AtPrice(price) => {
                ChannelSweep::at_price(cost.unit_cost, price, tax_rate, channels)
            }
            QuoteMode::CurrentPrices => {
                ChannelSweep::for_product(product, cost.unit_cost, tax_rate, channels)
            }
        };

        debug!(
            product_id = %query.product_id,
            unit_cost = cost.unit_cost,
            channels = quotes.len(),
            "Quoted channel prices"
        );

        Ok(QuoteChannelPricesResult {
            product_id: query.product_id,
            unit_cost: cost.unit_cost,
            tax_rate,
            quotes,
        })
    }
}
