//! Ingredient purchase-cost changes.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{IngredientId, Timestamp};

/// A recorded change of an ingredient's purchase cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostHistoryEntry {
    pub ingredient_id: IngredientId,
    pub previous_cost: f64,
    pub new_cost: f64,
    pub timestamp: Timestamp,
}

impl CostHistoryEntry {
    pub fn new(
        ingredient_id: IngredientId,
        previous_cost: f64,
        new_cost: f64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            ingredient_id,
            previous_cost,
            new_cost,
            timestamp,
        }
    }

    /// Relative change `new / previous - 1`.
    ///
    /// `None` when the previous cost is not positive, since no ratio exists.
    pub fn variation_rate(&self) -> Option<f64> {
        if self.previous_cost <= 0.0
            || !self.previous_cost.is_finite()
            || !self.new_cost.is_finite()
        {
            return None;
        }
        Some(self.new_cost / self.previous_cost - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variation_rate_of_increase() {
        let entry = CostHistoryEntry::new(IngredientId::new(), 2.0, 2.2, Timestamp::now());
        assert!((entry.variation_rate().unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn variation_rate_of_decrease_is_negative() {
        let entry = CostHistoryEntry::new(IngredientId::new(), 4.0, 3.0, Timestamp::now());
        assert!((entry.variation_rate().unwrap() + 0.25).abs() < 1e-12);
    }

    #[test]
    fn variation_rate_undefined_from_zero() {
        let entry = CostHistoryEntry::new(IngredientId::new(), 0.0, 3.0, Timestamp::now());
        assert!(entry.variation_rate().is_none());
    }
}
