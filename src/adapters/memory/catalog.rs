//! In-memory catalog store implementing both catalog ports.
//!
//! Each business's data sits behind one `RwLock`, so a snapshot is cloned
//! under a single read guard and never observes a write half-applied.
//! Suited to tests, demos, and embedding hosts that keep the catalog in
//! process.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::catalog::{
    BomLine, CatalogSnapshot, Channel, CostHistoryEntry, Ingredient, Product, SalesRecord,
    SalesSummary,
};
use crate::domain::costing::ResolvedCost;
use crate::domain::foundation::{
    BusinessId, DomainError, ErrorCode, IngredientId, ProductId, Timestamp,
};
use crate::domain::pricing::{PriceChangeRecord, PricingConfig};
use crate::ports::{CatalogReader, CatalogWriter, SnapshotWindows};

/// A sale aggregate for one period, dated for window filtering.
#[derive(Debug, Clone)]
struct DatedSales {
    recorded_at: Timestamp,
    record: SalesRecord,
}

#[derive(Debug, Clone)]
struct BusinessCatalog {
    ingredients: Vec<Ingredient>,
    bom_lines: Vec<BomLine>,
    products: Vec<Product>,
    channels: Vec<Channel>,
    pricing: PricingConfig,
    sales: Vec<DatedSales>,
    cost_history: Vec<CostHistoryEntry>,
    price_history: Vec<PriceChangeRecord>,
}

impl BusinessCatalog {
    fn new(pricing: PricingConfig) -> Self {
        Self {
            ingredients: Vec::new(),
            bom_lines: Vec::new(),
            products: Vec::new(),
            channels: Vec::new(),
            pricing,
            sales: Vec::new(),
            cost_history: Vec::new(),
            price_history: Vec::new(),
        }
    }

    fn product_mut(&mut self, id: &ProductId) -> Result<&mut Product, DomainError> {
        self.products
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ProductNotFound, "Product not found")
                    .with_detail("product_id", id.to_string())
            })
    }

    fn ingredient_mut(&mut self, id: &IngredientId) -> Result<&mut Ingredient, DomainError> {
        self.ingredients
            .iter_mut()
            .find(|i| i.id == *id)
            .ok_or_else(|| ingredient_not_found(id))
    }
}

fn ingredient_not_found(id: &IngredientId) -> DomainError {
    DomainError::new(ErrorCode::IngredientNotFound, "Ingredient not found")
        .with_detail("ingredient_id", id.to_string())
}

fn business_not_found(id: &BusinessId) -> DomainError {
    DomainError::new(ErrorCode::BusinessNotFound, "Business not found")
        .with_detail("business_id", id.to_string())
}

/// In-memory implementation of [`CatalogReader`] and [`CatalogWriter`].
///
/// # Example
///
/// ```ignore
/// let catalog = Arc::new(InMemoryCatalog::new());
/// catalog.add_business(business_id, PricingConfig::default())?;
/// catalog.add_product(&business_id, burger)?;
///
/// let snapshot = catalog.load_snapshot(&business_id, SnapshotWindows::default()).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    businesses: RwLock<HashMap<BusinessId, BusinessCatalog>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<BusinessId, BusinessCatalog>>, DomainError> {
        self.businesses.read().map_err(|_| {
            DomainError::new(ErrorCode::InternalError, "InMemoryCatalog: lock poisoned")
        })
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<BusinessId, BusinessCatalog>>, DomainError> {
        self.businesses.write().map_err(|_| {
            DomainError::new(ErrorCode::InternalError, "InMemoryCatalog: lock poisoned")
        })
    }

    fn with_business<T>(
        &self,
        business_id: &BusinessId,
        f: impl FnOnce(&mut BusinessCatalog) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut guard = self.write()?;
        let business = guard
            .get_mut(business_id)
            .ok_or_else(|| business_not_found(business_id))?;
        f(business)
    }

    // === Seeding ===

    /// Registers a business. Re-registering replaces its pricing targets only.
    pub fn add_business(
        &self,
        business_id: BusinessId,
        pricing: PricingConfig,
    ) -> Result<(), DomainError> {
        let mut guard = self.write()?;
        guard
            .entry(business_id)
            .and_modify(|b| b.pricing = pricing)
            .or_insert_with(|| BusinessCatalog::new(pricing));
        Ok(())
    }

    pub fn add_ingredient(
        &self,
        business_id: &BusinessId,
        ingredient: Ingredient,
    ) -> Result<(), DomainError> {
        self.with_business(business_id, |b| {
            b.ingredients.push(ingredient);
            Ok(())
        })
    }

    /// Adds a recipe line. Cycle checks belong to the caller
    /// (`CostGraph::check_new_line`) before saving.
    pub fn add_bom_line(&self, business_id: &BusinessId, line: BomLine) -> Result<(), DomainError> {
        self.with_business(business_id, |b| {
            b.bom_lines.push(line);
            Ok(())
        })
    }

    pub fn add_product(
        &self,
        business_id: &BusinessId,
        product: Product,
    ) -> Result<(), DomainError> {
        self.with_business(business_id, |b| {
            b.products.push(product);
            Ok(())
        })
    }

    pub fn add_channel(
        &self,
        business_id: &BusinessId,
        channel: Channel,
    ) -> Result<(), DomainError> {
        self.with_business(business_id, |b| {
            b.channels.push(channel);
            Ok(())
        })
    }

    /// Records sales aggregated over a period ending at `recorded_at`.
    pub fn record_sales(
        &self,
        business_id: &BusinessId,
        record: SalesRecord,
        recorded_at: Timestamp,
    ) -> Result<(), DomainError> {
        self.with_business(business_id, |b| {
            b.sales.push(DatedSales {
                recorded_at,
                record,
            });
            Ok(())
        })
    }

    /// Records a purchase-cost change and sets the ingredient's cost to it.
    pub fn record_cost_change(
        &self,
        business_id: &BusinessId,
        entry: CostHistoryEntry,
    ) -> Result<(), DomainError> {
        self.with_business(business_id, |b| {
            b.ingredient_mut(&entry.ingredient_id)?.unit_cost = entry.new_cost;
            b.cost_history.push(entry);
            Ok(())
        })
    }

    // === Inspection ===

    pub fn product(
        &self,
        business_id: &BusinessId,
        product_id: &ProductId,
    ) -> Result<Option<Product>, DomainError> {
        let guard = self.read()?;
        Ok(guard
            .get(business_id)
            .and_then(|b| b.products.iter().find(|p| p.id == *product_id).cloned()))
    }

    pub fn ingredient(
        &self,
        business_id: &BusinessId,
        ingredient_id: &IngredientId,
    ) -> Result<Option<Ingredient>, DomainError> {
        let guard = self.read()?;
        Ok(guard
            .get(business_id)
            .and_then(|b| b.ingredients.iter().find(|i| i.id == *ingredient_id).cloned()))
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn load_snapshot(
        &self,
        business_id: &BusinessId,
        windows: SnapshotWindows,
    ) -> Result<CatalogSnapshot, DomainError> {
        let guard = self.read()?;
        let business = guard
            .get(business_id)
            .ok_or_else(|| business_not_found(business_id))?;
        let taken_at = Timestamp::now();

        let sales = SalesSummary::from_records(
            business
                .sales
                .iter()
                .filter(|s| s.recorded_at.is_within_trailing_days(&taken_at, windows.sales_days))
                .map(|s| s.record.clone()),
        );
        let cost_history = business
            .cost_history
            .iter()
            .filter(|e| {
                e.timestamp
                    .is_within_trailing_days(&taken_at, windows.cost_history_days)
            })
            .cloned()
            .collect();

        debug!(
            business_id = %business_id,
            products = business.products.len(),
            ingredients = business.ingredients.len(),
            "Loaded catalog snapshot"
        );

        Ok(CatalogSnapshot {
            business_id: *business_id,
            ingredients: business.ingredients.clone(),
            bom_lines: business.bom_lines.clone(),
            products: business.products.clone(),
            channels: business.channels.clone(),
            pricing: business.pricing,
            sales,
            cost_history,
            taken_at,
        })
    }

    async fn price_history(
        &self,
        business_id: &BusinessId,
        product_id: &ProductId,
    ) -> Result<Vec<PriceChangeRecord>, DomainError> {
        let guard = self.read()?;
        let business = guard
            .get(business_id)
            .ok_or_else(|| business_not_found(business_id))?;
        Ok(business
            .price_history
            .iter()
            .filter(|r| r.product_id == *product_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CatalogWriter for InMemoryCatalog {
    async fn update_ingredient_costs(
        &self,
        business_id: &BusinessId,
        costs: &[ResolvedCost],
    ) -> Result<(), DomainError> {
        self.with_business(business_id, |b| {
            // Validate every id first so a failure writes nothing.
            for cost in costs {
                b.ingredient_mut(&cost.ingredient_id)?;
            }
            for cost in costs {
                b.ingredient_mut(&cost.ingredient_id)?.unit_cost = cost.resolved_cost;
            }
            Ok(())
        })
    }

    async fn apply_price_change(
        &self,
        business_id: &BusinessId,
        record: &PriceChangeRecord,
    ) -> Result<(), DomainError> {
        self.with_business(business_id, |b| {
            // The counter price is the base price, never an override.
            let override_channel = match &record.channel_id {
                Some(channel_id) => {
                    let channel = b
                        .channels
                        .iter()
                        .find(|c| c.id == *channel_id)
                        .ok_or_else(|| {
                            DomainError::new(ErrorCode::ChannelNotFound, "Channel not found")
                                .with_detail("channel_id", channel_id.to_string())
                        })?;
                    (!channel.is_counter).then_some(*channel_id)
                }
                None => None,
            };
            let product = b.product_mut(&record.product_id)?;
            match override_channel {
                Some(channel_id) => {
                    product.channel_prices.insert(channel_id, record.new_price);
                }
                None => {
                    product.base_price = record.new_price;
                    if let Some(counter_id) = &record.channel_id {
                        product.channel_prices.remove(counter_id);
                    }
                }
            }
            b.price_history.push(record.clone());
            Ok(())
        })
    }
}
