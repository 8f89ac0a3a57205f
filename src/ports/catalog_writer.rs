//! Catalog writer port (write side).
//!
//! The pure core only returns values; this port persists the ones a caller
//! accepts: recomputed composed-ingredient costs and applied price changes.

use async_trait::async_trait;

use crate::domain::costing::ResolvedCost;
use crate::domain::foundation::{BusinessId, DomainError};
use crate::domain::pricing::PriceChangeRecord;

/// Write port for catalog data.
///
/// Concurrent writes to the same product and channel are last-writer-wins;
/// no optimistic locking is required.
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    /// Stores resolved unit costs of composed ingredients.
    ///
    /// # Errors
    ///
    /// - `BusinessNotFound` if the business is unknown
    /// - `IngredientNotFound` if an ingredient does not exist
    /// - `InternalError` on storage failure
    async fn update_ingredient_costs(
        &self,
        business_id: &BusinessId,
        costs: &[ResolvedCost],
    ) -> Result<(), DomainError>;

    /// Writes the new base or channel price and appends the audit record,
    /// as one logical write.
    ///
    /// # Errors
    ///
    /// - `BusinessNotFound` if the business is unknown
    /// - `ProductNotFound` / `ChannelNotFound` for unknown targets
    /// - `InternalError` on storage failure
    async fn apply_price_change(
        &self,
        business_id: &BusinessId,
        record: &PriceChangeRecord,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn catalog_writer_is_object_safe() {
        fn _accepts_dyn(_writer: &dyn CatalogWriter) {}
    }
}
