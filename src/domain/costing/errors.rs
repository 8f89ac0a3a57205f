//! Cost roll-up errors and data-quality warnings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::BomOwner;
use crate::domain::foundation::{DomainError, ErrorCode, IngredientId};

/// Structural failures that halt a resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostingError {
    /// A composed ingredient contains itself, directly or transitively.
    /// `members` lists the cycle in traversal order, starting at the
    /// ingredient that was reached twice.
    #[error("Composed ingredients form a cycle: {}", format_members(.members))]
    CyclicComposition { members: Vec<IngredientId> },

    #[error("Ingredient {0} is not part of the cost graph")]
    UnknownIngredient(IngredientId),
}

fn format_members(members: &[IngredientId]) -> String {
    members
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<CostingError> for DomainError {
    fn from(err: CostingError) -> Self {
        match &err {
            CostingError::CyclicComposition { members } => {
                DomainError::new(ErrorCode::CyclicComposition, err.to_string())
                    .with_detail("members", format_members(members))
            }
            CostingError::UnknownIngredient(id) => {
                DomainError::new(ErrorCode::IngredientNotFound, err.to_string())
                    .with_detail("ingredient_id", id.to_string())
            }
        }
    }
}

/// Non-fatal data problems found while costing. Returned with results and
/// logged, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    #[error("Composed ingredient {ingredient_id} has yield {yield_quantity}; using 1")]
    NonPositiveYield {
        ingredient_id: IngredientId,
        yield_quantity: f64,
    },

    #[error("Composed ingredient {ingredient_id} has no recipe lines; using its stored cost")]
    ComposedWithoutRecipe { ingredient_id: IngredientId },

    #[error("BOM line of {owner} references unknown ingredient {ingredient_id}; costed at 0")]
    UnknownIngredient {
        owner: BomOwner,
        ingredient_id: IngredientId,
    },

    #[error("BOM line of {owner} for {ingredient_id} has quantity {quantity}; line skipped")]
    NonPositiveQuantity {
        owner: BomOwner,
        ingredient_id: IngredientId,
        quantity: f64,
    },

    #[error("{line_count} BOM line(s) owned by purchased ingredient {ingredient_id} ignored")]
    LinesOnPurchasedIngredient {
        ingredient_id: IngredientId,
        line_count: usize,
    },
}
