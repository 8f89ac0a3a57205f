//! ApplyPriceChangeHandler - Command handler for committing a new price.
//!
//! Every applied price is recorded with its previous value and the source
//! that produced it, on the base price or on a single channel override.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{
    round_to_cents, BusinessId, ChannelId, DomainError, ProductId, Timestamp,
};
use crate::domain::pricing::{PriceChangeRecord, PriceChangeSource};
use crate::ports::{CatalogReader, CatalogWriter, SnapshotWindows};

/// Command to set a product price.
#[derive(Debug, Clone)]
pub struct ApplyPriceChangeCommand {
    pub business_id: BusinessId,
    pub product_id: ProductId,
    /// `None` sets the base price; `Some` sets that channel's override.
    pub channel_id: Option<ChannelId>,
    pub new_price: f64,
    pub source: PriceChangeSource,
}

/// Error type for applying a price change.
#[derive(Debug, Clone)]
pub enum ApplyPriceChangeError {
    /// Price is not a positive finite amount.
    InvalidPrice(f64),
    ProductNotFound(ProductId),
    ChannelNotFound(ChannelId),
    Domain(DomainError),
}

impl std::fmt::Display for ApplyPriceChangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyPriceChangeError::InvalidPrice(price) => {
                write!(f, "Price must be positive, got {}", price)
            }
            ApplyPriceChangeError::ProductNotFound(id) => write!(f, "Product not found: {}", id),
            ApplyPriceChangeError::ChannelNotFound(id) => write!(f, "Channel not found: {}", id),
            ApplyPriceChangeError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApplyPriceChangeError {}

impl From<DomainError> for ApplyPriceChangeError {
    fn from(err: DomainError) -> Self {
        ApplyPriceChangeError::Domain(err)
    }
}

/// Handler for price changes.
pub struct ApplyPriceChangeHandler {
    reader: Arc<dyn CatalogReader>,
    writer: Arc<dyn CatalogWriter>,
}

impl ApplyPriceChangeHandler {
    pub fn new(reader: Arc<dyn CatalogReader>, writer: Arc<dyn CatalogWriter>) -> Self {
        Self { reader, writer }
    }

    pub async fn handle(
        &self,
        cmd: ApplyPriceChangeCommand,
    ) -> Result<PriceChangeRecord, ApplyPriceChangeError> {
        // 1. Validate the price
        if !cmd.new_price.is_finite() || cmd.new_price <= 0.0 {
            return Err(ApplyPriceChangeError::InvalidPrice(cmd.new_price));
        }
        let new_price = round_to_cents(cmd.new_price);

        // 2. Look up the price being replaced
        let snapshot = self
            .reader
            .load_snapshot(&cmd.business_id, SnapshotWindows::default())
            .await?;
        let product = snapshot
            .product(&cmd.product_id)
            .ok_or(ApplyPriceChangeError::ProductNotFound(cmd.product_id))?;
        let previous_price = match &cmd.channel_id {
            Some(channel_id) => {
                let channel = snapshot
                    .channel(channel_id)
                    .ok_or(ApplyPriceChangeError::ChannelNotFound(*channel_id))?;
                if channel.is_counter {
                    product.base_price
                } else {
                    product.price_for(channel_id)
                }
            }
            None => product.base_price,
        };

        // 3. Persist with audit record
        let record = PriceChangeRecord::new(
            cmd.product_id,
            cmd.channel_id,
            previous_price,
            new_price,
            cmd.source,
            Timestamp::now(),
        );
        self.writer
            .apply_price_change(&cmd.business_id, &record)
            .await?;

        info!(
            product_id = %cmd.product_id,
            previous_price,
            new_price,
            source = cmd.source.label(),
            "Applied price change"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalog;
    use crate::domain::catalog::{Channel, Product};
    use crate::domain::pricing::PricingConfig;

    fn seeded() -> (Arc<InMemoryCatalog>, BusinessId, ProductId, ChannelId) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let business_id = BusinessId::new();
        catalog
            .add_business(business_id, PricingConfig::default())
            .unwrap();
        let product = Product::new(ProductId::new(), "Toastie", "Mains", 15.0).unwrap();
        let delivery = Channel::new(ChannelId::new(), "Delivery", 0.2).unwrap();
        catalog.add_product(&business_id, product.clone()).unwrap();
        catalog.add_channel(&business_id, delivery.clone()).unwrap();
        (catalog, business_id, product.id, delivery.id)
    }

    fn handler(catalog: &Arc<InMemoryCatalog>) -> ApplyPriceChangeHandler {
        ApplyPriceChangeHandler::new(catalog.clone(), catalog.clone())
    }

    fn command(
        business_id: BusinessId,
        product_id: ProductId,
        channel_id: Option<ChannelId>,
        new_price: f64,
    ) -> ApplyPriceChangeCommand {
        ApplyPriceChangeCommand {
            business_id,
            product_id,
            channel_id,
            new_price,
            source: PriceChangeSource::Manual,
        }
    }

    #[tokio::test]
    async fn base_price_change_is_rounded_and_recorded() {
        let (catalog, business_id, product_id, _) = seeded();

        let record = handler(&catalog)
            .handle(command(business_id, product_id, None, 16.0714))
            .await
            .unwrap();

        assert_eq!(record.previous_price, 15.0);
        assert_eq!(record.new_price, 16.07);
        let stored = catalog.product(&business_id, &product_id).unwrap().unwrap();
        assert_eq!(stored.base_price, 16.07);
        let history = catalog.price_history(&business_id, &product_id).await.unwrap();
        assert_eq!(history, vec![record]);
    }

    #[tokio::test]
    async fn channel_change_reports_base_price_as_previous() {
        let (catalog, business_id, product_id, delivery) = seeded();

        let record = handler(&catalog)
            .handle(command(business_id, product_id, Some(delivery), 19.5))
            .await
            .unwrap();

        assert_eq!(record.previous_price, 15.0);
        assert_eq!(record.channel_id, Some(delivery));
        let stored = catalog.product(&business_id, &product_id).unwrap().unwrap();
        assert_eq!(stored.price_for(&delivery), 19.5);
        assert_eq!(stored.base_price, 15.0);
    }

    #[tokio::test]
    async fn counter_change_updates_base_price() {
        let (catalog, business_id, product_id, _) = seeded();
        let counter = Channel::counter(ChannelId::new(), "Counter").unwrap();
        catalog.add_channel(&business_id, counter.clone()).unwrap();

        let record = handler(&catalog)
            .handle(command(business_id, product_id, Some(counter.id), 16.08))
            .await
            .unwrap();

        assert_eq!(record.previous_price, 15.0);
        let stored = catalog.product(&business_id, &product_id).unwrap().unwrap();
        assert_eq!(stored.base_price, 16.08);
        assert!(!stored.has_override_for(&counter.id));
    }

    #[tokio::test]
    async fn rejects_non_positive_price() {
        let (catalog, business_id, product_id, _) = seeded();

        let result = handler(&catalog)
            .handle(command(business_id, product_id, None, 0.0))
            .await;

        assert!(matches!(result, Err(ApplyPriceChangeError::InvalidPrice(_))));
        assert!(catalog
            .price_history(&business_id, &product_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unknown_product_and_channel_are_reported() {
        let (catalog, business_id, product_id, _) = seeded();
        let handler = handler(&catalog);

        let missing_product = handler
            .handle(command(business_id, ProductId::new(), None, 10.0))
            .await;
        assert!(matches!(
            missing_product,
            Err(ApplyPriceChangeError::ProductNotFound(_))
        ));

        let missing_channel = handler
            .handle(command(business_id, product_id, Some(ChannelId::new()), 10.0))
            .await;
        assert!(matches!(
            missing_channel,
            Err(ApplyPriceChangeError::ChannelNotFound(_))
        ));
    }
}
