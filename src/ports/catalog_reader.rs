//! Catalog reader port (read side).
//!
//! Supplies the pure core with a consistent snapshot of one business's
//! catalog. Population-relative computations (menu classification) run over
//! exactly one snapshot, so implementations must not let a concurrent write
//! be half-visible inside a single snapshot.
//!
//! # Example
//!
//! ```ignore
//! async fn classify(
//!     reader: &dyn CatalogReader,
//!     business_id: &BusinessId,
//! ) -> Result<MenuAnalysis, DomainError> {
//!     let snapshot = reader.load_snapshot(business_id, SnapshotWindows::default()).await?;
//!     let graph = CostGraph::build(&snapshot.ingredients, &snapshot.bom_lines);
//!     let resolution = graph.resolve_all()?;
//!     // ...
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogSnapshot;
use crate::domain::foundation::{BusinessId, DomainError, ProductId};
use crate::domain::pricing::PriceChangeRecord;

/// Trailing windows applied when loading a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotWindows {
    /// Days of sales aggregated into `SalesSummary`.
    pub sales_days: u32,
    /// Days of ingredient cost history included.
    pub cost_history_days: u32,
}

impl Default for SnapshotWindows {
    fn default() -> Self {
        Self {
            sales_days: 30,
            cost_history_days: 60,
        }
    }
}

/// Read port for catalog data.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Loads a point-in-time snapshot of a business's catalog.
    ///
    /// # Errors
    ///
    /// - `BusinessNotFound` if the business is unknown
    /// - `InternalError` on storage failure
    async fn load_snapshot(
        &self,
        business_id: &BusinessId,
        windows: SnapshotWindows,
    ) -> Result<CatalogSnapshot, DomainError>;

    /// Applied price changes of one product, oldest first.
    async fn price_history(
        &self,
        business_id: &BusinessId,
        product_id: &ProductId,
    ) -> Result<Vec<PriceChangeRecord>, DomainError>;
}
