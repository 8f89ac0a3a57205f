//! AnalyzeMenuHandler - Query handler for the menu engineering matrix.
//!
//! Loads one snapshot, costs every product from it and classifies the whole
//! set in a single pass, so every product is compared against the same
//! population.

use std::sync::Arc;

use tracing::info;

use crate::domain::analysis::{MenuAnalysis, MenuEngineeringClassifier, MenuItem};
use crate::domain::costing::{BomCost, BomCostAggregator, CostGraph, DataQualityWarning};
use crate::domain::foundation::{BusinessId, DomainError};
use crate::ports::{CatalogReader, SnapshotWindows};

#[derive(Debug, Clone)]
pub struct AnalyzeMenuQuery {
    pub business_id: BusinessId,
}

#[derive(Debug, Clone)]
pub struct AnalyzeMenuResult {
    pub analysis: MenuAnalysis,
    /// Cost breakdown per product, in the same order as the results.
    pub costs: Vec<BomCost>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Handler for menu analysis.
pub struct AnalyzeMenuHandler {
    reader: Arc<dyn CatalogReader>,
    windows: SnapshotWindows,
}

impl AnalyzeMenuHandler {
    pub fn new(reader: Arc<dyn CatalogReader>, windows: SnapshotWindows) -> Self {
        Self { reader, windows }
    }

    pub async fn handle(&self, query: AnalyzeMenuQuery) -> Result<AnalyzeMenuResult, DomainError> {
        let snapshot = self
            .reader
            .load_snapshot(&query.business_id, self.windows)
            .await?;

        let resolution =
            CostGraph::build(&snapshot.ingredients, &snapshot.bom_lines).resolve_all()?;
        let costs = BomCostAggregator::all_products(&snapshot, &resolution);

        let items: Vec<MenuItem> = snapshot
            .products
            .iter()
            .zip(&costs)
            .map(|(product, cost)| MenuItem::from_product(product, cost, &snapshot.sales))
            .collect();
        let analysis = MenuEngineeringClassifier::classify(&items, &snapshot.pricing);

        let mut warnings = resolution.warnings;
        warnings.extend(costs.iter().flat_map(|c| c.warnings.iter().cloned()));

        info!(
            business_id = %query.business_id,
            products = analysis.summary.total,
            stars = analysis.summary.stars,
            dogs = analysis.summary.dogs,
            critical = analysis.summary.critical.len(),
            "Analyzed menu"
        );

        Ok(AnalyzeMenuResult {
            analysis,
            costs,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalog;
    use crate::domain::analysis::{HealthLabel, Quadrant};
    use crate::domain::catalog::{BomLine, Ingredient, Product, SalesRecord, UnitOfMeasure};
    use crate::domain::foundation::{IngredientId, ProductId, Timestamp};
    use crate::domain::pricing::PricingConfig;

    fn seeded() -> (Arc<InMemoryCatalog>, BusinessId, ProductId, ProductId, ProductId) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let business_id = BusinessId::new();
        catalog
            .add_business(business_id, PricingConfig::try_new(0.30, 0.35, 0.0).unwrap())
            .unwrap();

        let base = Ingredient::purchased(IngredientId::new(), "Base", UnitOfMeasure::Unit, 1.0)
            .unwrap();
        catalog.add_ingredient(&business_id, base.clone()).unwrap();

        // A: 35% margin, 50 sold. B: 10% margin, 80 sold. Water: no recipe.
        let a = Product::new(ProductId::new(), "A", "Mains", 100.0).unwrap();
        let b = Product::new(ProductId::new(), "B", "Mains", 100.0).unwrap();
        let water = Product::new(ProductId::new(), "Water", "Drinks", 3.0).unwrap();
        for (product, qty, sold) in [(&a, 65.0, 50), (&b, 90.0, 80), (&water, 0.0, 500)] {
            catalog.add_product(&business_id, product.clone()).unwrap();
            if qty > 0.0 {
                let line = BomLine::for_product(product.id, base.id, qty).unwrap();
                catalog.add_bom_line(&business_id, line).unwrap();
            }
            catalog
                .record_sales(
                    &business_id,
                    SalesRecord::new(product.id, sold, 0.0),
                    Timestamp::now().minus_days(1),
                )
                .unwrap();
        }
        (catalog, business_id, a.id, b.id, water.id)
    }

    #[tokio::test]
    async fn classifies_whole_menu_from_one_snapshot() {
        let (catalog, business_id, a, b, water) = seeded();
        let handler = AnalyzeMenuHandler::new(catalog, SnapshotWindows::default());

        let result = handler.handle(AnalyzeMenuQuery { business_id }).await.unwrap();
        let by_id = |id: ProductId| {
            result
                .analysis
                .results
                .iter()
                .find(|r| r.product_id == id)
                .unwrap()
                .clone()
        };

        assert_eq!(by_id(a).quadrant, Some(Quadrant::Puzzle));
        assert_eq!(by_id(b).quadrant, Some(Quadrant::Workhorse));
        assert_eq!(by_id(water).quadrant, None);
        assert_eq!(by_id(b).cmv_health, HealthLabel::Critical);
        assert_eq!(result.analysis.summary.total, 3);
        assert_eq!(result.costs.len(), 3);
    }

    #[tokio::test]
    async fn sales_outside_window_count_as_zero() {
        let (catalog, business_id, a, _, _) = seeded();
        catalog
            .record_sales(
                &business_id,
                SalesRecord::new(a, 1000, 0.0),
                Timestamp::now().minus_days(40),
            )
            .unwrap();
        let handler = AnalyzeMenuHandler::new(catalog, SnapshotWindows::default());

        let result = handler.handle(AnalyzeMenuQuery { business_id }).await.unwrap();
        let a_result = result
            .analysis
            .results
            .iter()
            .find(|r| r.product_id == a)
            .unwrap();
        assert_eq!(a_result.quantity_sold, 50);
    }
}
