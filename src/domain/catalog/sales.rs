//! Trailing sales aggregates per product.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::ProductId;

/// Aggregated sales of one product over the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_id: ProductId,
    pub quantity_sold: u32,
    pub revenue: f64,
}

impl SalesRecord {
    pub fn new(product_id: ProductId, quantity_sold: u32, revenue: f64) -> Self {
        Self {
            product_id,
            quantity_sold,
            revenue,
        }
    }
}

/// Sales aggregates keyed by product. Products without sales read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    records: HashMap<ProductId, SalesRecord>,
}

impl SalesSummary {
    /// Builds a summary, summing duplicate records for the same product.
    pub fn from_records(records: impl IntoIterator<Item = SalesRecord>) -> Self {
        let mut merged: HashMap<ProductId, SalesRecord> = HashMap::new();
        for record in records {
            merged
                .entry(record.product_id)
                .and_modify(|existing| {
                    existing.quantity_sold =
                        existing.quantity_sold.saturating_add(record.quantity_sold);
                    existing.revenue += record.revenue;
                })
                .or_insert(record);
        }
        Self { records: merged }
    }

    /// Units sold in the window, 0 if the product has no sales.
    pub fn quantity_for(&self, product_id: &ProductId) -> u32 {
        self.records
            .get(product_id)
            .map(|r| r.quantity_sold)
            .unwrap_or(0)
    }

    /// Revenue in the window, 0 if the product has no sales.
    pub fn revenue_for(&self, product_id: &ProductId) -> f64 {
        self.records.get(product_id).map(|r| r.revenue).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
