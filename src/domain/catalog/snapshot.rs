//! A consistent, point-in-time copy of one business's catalog.

use serde::{Deserialize, Serialize};

use super::{BomLine, Channel, CostHistoryEntry, Ingredient, Product, SalesSummary};
use crate::domain::foundation::{BusinessId, ChannelId, IngredientId, ProductId, Timestamp};
use crate::domain::pricing::PricingConfig;

/// Everything the pure core needs for one computation pass.
///
/// Population-relative computations (menu classification) must run over a
/// single snapshot so that no concurrent write is visible mid-pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub business_id: BusinessId,
    pub ingredients: Vec<Ingredient>,
    pub bom_lines: Vec<BomLine>,
    pub products: Vec<Product>,
    pub channels: Vec<Channel>,
    pub pricing: PricingConfig,
    pub sales: SalesSummary,
    pub cost_history: Vec<CostHistoryEntry>,
    pub taken_at: Timestamp,
}

impl CatalogSnapshot {
    /// Empty snapshot with default pricing targets.
    pub fn empty(business_id: BusinessId) -> Self {
        Self {
            business_id,
            ingredients: Vec::new(),
            bom_lines: Vec::new(),
            products: Vec::new(),
            channels: Vec::new(),
            pricing: PricingConfig::default(),
            sales: SalesSummary::default(),
            cost_history: Vec::new(),
            taken_at: Timestamp::now(),
        }
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    pub fn ingredient(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == *id)
    }

    pub fn channel(&self, id: &ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == *id)
    }

    /// The counter channel, if one is configured.
    pub fn counter_channel(&self) -> Option<&Channel> {
        self.channels.iter().find(|c| c.is_counter)
    }

    /// Recipe lines of a product, in stored order.
    pub fn lines_for_product<'a>(
        &'a self,
        product_id: &'a ProductId,
    ) -> impl Iterator<Item = &'a BomLine> + 'a {
        self.bom_lines
            .iter()
            .filter(move |line| line.is_owned_by_product(product_id))
    }

    /// Cost history entries inside the trailing window ending at `taken_at`.
    pub fn cost_history_within(&self, days: u32) -> Vec<&CostHistoryEntry> {
        self.cost_history
            .iter()
            .filter(|entry| entry.timestamp.is_within_trailing_days(&self.taken_at, days))
            .collect()
    }
}
