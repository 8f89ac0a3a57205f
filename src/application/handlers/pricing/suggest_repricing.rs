//! SuggestRepricingHandler - Query handler for cost-change driven re-pricing.

use std::sync::Arc;

use tracing::info;

use crate::domain::analysis::{CostImpactAnalyzer, ImpactPolicy, RepricingSuggestion};
use crate::domain::foundation::{BusinessId, DomainError};
use crate::ports::{CatalogReader, SnapshotWindows};

#[derive(Debug, Clone)]
pub struct SuggestRepricingQuery {
    pub business_id: BusinessId,
}

/// Handler for re-pricing suggestions.
pub struct SuggestRepricingHandler {
    reader: Arc<dyn CatalogReader>,
    policy: ImpactPolicy,
}

impl SuggestRepricingHandler {
    pub fn new(reader: Arc<dyn CatalogReader>, policy: ImpactPolicy) -> Self {
        Self { reader, policy }
    }

    pub async fn handle(
        &self,
        query: SuggestRepricingQuery,
    ) -> Result<Vec<RepricingSuggestion>, DomainError> {
        let windows = SnapshotWindows {
            cost_history_days: self.policy.window_days,
            ..SnapshotWindows::default()
        };
        let snapshot = self.reader.load_snapshot(&query.business_id, windows).await?;

        let suggestions = CostImpactAnalyzer::analyze(&snapshot, &self.policy)?;

        info!(
            business_id = %query.business_id,
            suggestions = suggestions.len(),
            "Computed re-pricing suggestions"
        );
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalog;
    use crate::domain::catalog::{
        BomLine, Channel, CostHistoryEntry, Ingredient, Product, UnitOfMeasure,
    };
    use crate::domain::foundation::{ChannelId, IngredientId, ProductId, Timestamp};
    use crate::domain::pricing::PricingConfig;

    fn seeded() -> (Arc<InMemoryCatalog>, BusinessId, IngredientId) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let business_id = BusinessId::new();
        catalog
            .add_business(business_id, PricingConfig::default())
            .unwrap();
        let cheese =
            Ingredient::purchased(IngredientId::new(), "Cheese", UnitOfMeasure::Unit, 2.0).unwrap();
        let bread =
            Ingredient::purchased(IngredientId::new(), "Bread", UnitOfMeasure::Unit, 2.4).unwrap();
        let toastie = Product::new(ProductId::new(), "Toastie", "Mains", 15.0).unwrap();
        catalog.add_ingredient(&business_id, cheese.clone()).unwrap();
        catalog.add_ingredient(&business_id, bread.clone()).unwrap();
        catalog.add_product(&business_id, toastie.clone()).unwrap();
        catalog
            .add_bom_line(&business_id, BomLine::for_product(toastie.id, cheese.id, 3.0).unwrap())
            .unwrap();
        catalog
            .add_bom_line(&business_id, BomLine::for_product(toastie.id, bread.id, 1.0).unwrap())
            .unwrap();
        catalog
            .add_channel(&business_id, Channel::counter(ChannelId::new(), "Counter").unwrap())
            .unwrap();
        (catalog, business_id, cheese.id)
    }

    #[tokio::test]
    async fn recent_increase_produces_suggestion() {
        let (catalog, business_id, cheese_id) = seeded();
        catalog
            .record_cost_change(
                &business_id,
                CostHistoryEntry::new(cheese_id, 2.0, 2.2, Timestamp::now().minus_days(2)),
            )
            .unwrap();
        let handler = SuggestRepricingHandler::new(catalog, ImpactPolicy::default());

        let suggestions = handler
            .handle(SuggestRepricingQuery { business_id })
            .await
            .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].suggested_price, 16.08);
    }

    #[tokio::test]
    async fn policy_window_limits_history() {
        let (catalog, business_id, cheese_id) = seeded();
        catalog
            .record_cost_change(
                &business_id,
                CostHistoryEntry::new(cheese_id, 2.0, 2.2, Timestamp::now().minus_days(20)),
            )
            .unwrap();
        let policy = ImpactPolicy {
            window_days: 10,
            ..ImpactPolicy::default()
        };
        let handler = SuggestRepricingHandler::new(catalog, policy);

        let suggestions = handler
            .handle(SuggestRepricingQuery { business_id })
            .await
            .unwrap();
        assert!(suggestions.is_empty());
    }
}
