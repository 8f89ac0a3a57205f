//! RecomputeIngredientCostsHandler - Command handler that re-resolves
//! composed-ingredient costs and persists the ones that changed.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::costing::{CostGraph, DataQualityWarning, ResolvedCost};
use crate::domain::foundation::{BusinessId, DomainError};
use crate::ports::{CatalogReader, CatalogWriter, SnapshotWindows};

/// Command to recompute every composed ingredient of a business.
#[derive(Debug, Clone)]
pub struct RecomputeIngredientCostsCommand {
    pub business_id: BusinessId,
}

#[derive(Debug, Clone)]
pub struct RecomputeIngredientCostsResult {
    /// Composed ingredients whose stored cost was updated.
    pub updated: Vec<ResolvedCost>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Handler for recomputing ingredient costs.
pub struct RecomputeIngredientCostsHandler {
    reader: Arc<dyn CatalogReader>,
    writer: Arc<dyn CatalogWriter>,
}

impl RecomputeIngredientCostsHandler {
    pub fn new(reader: Arc<dyn CatalogReader>, writer: Arc<dyn CatalogWriter>) -> Self {
        Self { reader, writer }
    }

    /// # Errors
    ///
    /// - `CyclicComposition` if the recipes contain a cycle; nothing is written
    /// - Port errors from loading or persisting
    pub async fn handle(
        &self,
        cmd: RecomputeIngredientCostsCommand,
    ) -> Result<RecomputeIngredientCostsResult, DomainError> {
        // 1. Load the catalog
        let snapshot = self
            .reader
            .load_snapshot(&cmd.business_id, SnapshotWindows::default())
            .await?;

        // 2. Resolve the whole graph
        let graph = CostGraph::build(&snapshot.ingredients, &snapshot.bom_lines);
        let resolution = graph.resolve_all()?;
        let updated = resolution.changed_composed_costs();

        // 3. Persist only what changed
        if updated.is_empty() {
            debug!(business_id = %cmd.business_id, "Composed ingredient costs already current");
        } else {
            self.writer
                .update_ingredient_costs(&cmd.business_id, &updated)
                .await?;
        }

        info!(
            business_id = %cmd.business_id,
            updated = updated.len(),
            warnings = resolution.warnings.len(),
            "Recomputed ingredient costs"
        );

        Ok(RecomputeIngredientCostsResult {
            updated,
            warnings: resolution.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalog;
    use crate::domain::catalog::{BomLine, Ingredient, UnitOfMeasure};
    use crate::domain::foundation::{ErrorCode, IngredientId};
    use crate::domain::pricing::{PriceChangeRecord, PricingConfig};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ─────────────────────────────────────────────────────────────────────
    // Mock implementations
    // ─────────────────────────────────────────────────────────────────────

    struct RecordingWriter {
        calls: Mutex<Vec<Vec<ResolvedCost>>>,
    }

    impl RecordingWriter {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CatalogWriter for RecordingWriter {
        async fn update_ingredient_costs(
            &self,
            _business_id: &BusinessId,
            costs: &[ResolvedCost],
        ) -> Result<(), DomainError> {
            self.calls.lock().unwrap().push(costs.to_vec());
            Ok(())
        }

        async fn apply_price_change(
            &self,
            _business_id: &BusinessId,
            _record: &PriceChangeRecord,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Test helpers
    // ─────────────────────────────────────────────────────────────────────

    fn catalog_with_dough() -> (Arc<InMemoryCatalog>, BusinessId, Ingredient, Ingredient) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let business_id = BusinessId::new();
        catalog
            .add_business(business_id, PricingConfig::default())
            .unwrap();
        let flour = Ingredient::purchased(IngredientId::new(), "Flour", UnitOfMeasure::Gram, 0.004)
            .unwrap();
        let dough = Ingredient::composed(IngredientId::new(), "Dough", UnitOfMeasure::Gram, 500.0)
            .unwrap();
        catalog.add_ingredient(&business_id, flour.clone()).unwrap();
        catalog.add_ingredient(&business_id, dough.clone()).unwrap();
        catalog
            .add_bom_line(
                &business_id,
                BomLine::for_ingredient(dough.id, flour.id, 1000.0).unwrap(),
            )
            .unwrap();
        (catalog, business_id, flour, dough)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn persists_changed_composed_costs() {
        let (catalog, business_id, _, dough) = catalog_with_dough();
        let handler = RecomputeIngredientCostsHandler::new(catalog.clone(), catalog.clone());

        let result = handler
            .handle(RecomputeIngredientCostsCommand { business_id })
            .await
            .unwrap();

        assert_eq!(result.updated.len(), 1);
        let stored = catalog.ingredient(&business_id, &dough.id).unwrap().unwrap();
        assert!((stored.unit_cost - 4.0 / 500.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn second_run_writes_nothing() {
        let (catalog, business_id, _, _) = catalog_with_dough();
        let first = RecomputeIngredientCostsHandler::new(catalog.clone(), catalog.clone());
        first
            .handle(RecomputeIngredientCostsCommand { business_id })
            .await
            .unwrap();

        let writer = Arc::new(RecordingWriter::new());
        let second = RecomputeIngredientCostsHandler::new(catalog.clone(), writer.clone());
        let result = second
            .handle(RecomputeIngredientCostsCommand { business_id })
            .await
            .unwrap();

        assert!(result.updated.is_empty());
        assert!(writer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cycle_fails_without_writing() {
        let (catalog, business_id, _, dough) = catalog_with_dough();
        let filling =
            Ingredient::composed(IngredientId::new(), "Filling", UnitOfMeasure::Gram, 1.0)
                .unwrap();
        catalog.add_ingredient(&business_id, filling.clone()).unwrap();
        catalog
            .add_bom_line(&business_id, BomLine::for_ingredient(filling.id, dough.id, 1.0).unwrap())
            .unwrap();
        catalog
            .add_bom_line(&business_id, BomLine::for_ingredient(dough.id, filling.id, 1.0).unwrap())
            .unwrap();

        let writer = Arc::new(RecordingWriter::new());
        let handler = RecomputeIngredientCostsHandler::new(catalog.clone(), writer.clone());
        let err = handler
            .handle(RecomputeIngredientCostsCommand { business_id })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::CyclicComposition);
        assert!(writer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_business_is_reported() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let handler = RecomputeIngredientCostsHandler::new(catalog.clone(), catalog);
        let err = handler
            .handle(RecomputeIngredientCostsCommand {
                business_id: BusinessId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessNotFound);
    }
}
