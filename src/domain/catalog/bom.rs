//! Bill-of-materials lines linking an owner to the ingredients it consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{IngredientId, ProductId, ValidationError};

/// What a BOM line belongs to: a sellable product or a composed ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "owner_type", content = "owner_id", rename_all = "snake_case")]
pub enum BomOwner {
    Product(ProductId),
    Ingredient(IngredientId),
}

impl fmt::Display for BomOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BomOwner::Product(id) => write!(f, "product:{}", id),
            BomOwner::Ingredient(id) => write!(f, "ingredient:{}", id),
        }
    }
}

/// One ingredient-quantity line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub owner: BomOwner,
    pub ingredient_id: IngredientId,
    pub quantity_per_batch: f64,
}

impl BomLine {
    /// Creates a line, rejecting non-positive quantities.
    ///
    /// Cycle checks need the whole graph and live in `CostGraph::check_new_line`.
    pub fn new(
        owner: BomOwner,
        ingredient_id: IngredientId,
        quantity_per_batch: f64,
    ) -> Result<Self, ValidationError> {
        if !quantity_per_batch.is_finite() || quantity_per_batch <= 0.0 {
            return Err(ValidationError::out_of_range(
                "quantity_per_batch",
                0.0,
                f64::MAX,
                quantity_per_batch,
            ));
        }
        Ok(Self {
            owner,
            ingredient_id,
            quantity_per_batch,
        })
    }

    /// Shorthand for a product-owned line.
    pub fn for_product(
        product_id: ProductId,
        ingredient_id: IngredientId,
        quantity_per_batch: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(BomOwner::Product(product_id), ingredient_id, quantity_per_batch)
    }

    /// Shorthand for a line inside a composed ingredient's recipe.
    pub fn for_ingredient(
        owner_id: IngredientId,
        ingredient_id: IngredientId,
        quantity_per_batch: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(BomOwner::Ingredient(owner_id), ingredient_id, quantity_per_batch)
    }

    /// True if this line belongs to the given product.
    pub fn is_owned_by_product(&self, product_id: &ProductId) -> bool {
        matches!(self.owner, BomOwner::Product(id) if id == *product_id)
    }
}
