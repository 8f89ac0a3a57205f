//! Costing command handlers.

mod recompute_ingredient_costs;

pub use recompute_ingredient_costs::{
    RecomputeIngredientCostsCommand, RecomputeIngredientCostsHandler,
    RecomputeIngredientCostsResult,
};
