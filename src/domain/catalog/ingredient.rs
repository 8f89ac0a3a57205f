//! Ingredients - purchased leaves and composed (sub-recipe) intermediates.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{IngredientId, ValidationError};

/// Unit an ingredient is bought, stocked and dosed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Gram,
    Kilogram,
    Millilitre,
    Litre,
    Unit,
    Portion,
}

impl UnitOfMeasure {
    /// Returns the short display label for this unit.
    pub fn label(&self) -> &'static str {
        match self {
            UnitOfMeasure::Gram => "g",
            UnitOfMeasure::Kilogram => "kg",
            UnitOfMeasure::Millilitre => "ml",
            UnitOfMeasure::Litre => "l",
            UnitOfMeasure::Unit => "un",
            UnitOfMeasure::Portion => "portion",
        }
    }
}

/// An ingredient record as held by the catalog store.
///
/// For purchased ingredients `unit_cost` is the last purchase price per unit.
/// For composed ingredients it is the cached roll-up of the sub-recipe, kept
/// current by the cost graph resolver; `yield_quantity` is how many units one
/// batch of the sub-recipe produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub unit_of_measure: UnitOfMeasure,
    pub unit_cost: f64,
    pub is_composed: bool,
    #[serde(rename = "yield", default = "default_yield")]
    pub yield_quantity: f64,
}

fn default_yield() -> f64 {
    1.0
}

impl Ingredient {
    /// Creates a purchased (leaf) ingredient.
    pub fn purchased(
        id: IngredientId,
        name: impl Into<String>,
        unit_of_measure: UnitOfMeasure,
        unit_cost: f64,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name.into())?;
        validate_unit_cost(unit_cost)?;
        Ok(Self {
            id,
            name,
            unit_of_measure,
            unit_cost,
            is_composed: false,
            yield_quantity: default_yield(),
        })
    }

    /// Creates a composed ingredient whose cost derives from its own recipe.
    ///
    /// A non-positive yield is accepted here and reported as a data-quality
    /// warning when the cost graph is resolved.
    pub fn composed(
        id: IngredientId,
        name: impl Into<String>,
        unit_of_measure: UnitOfMeasure,
        yield_quantity: f64,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name.into())?;
        Ok(Self {
            id,
            name,
            unit_of_measure,
            unit_cost: 0.0,
            is_composed: true,
            yield_quantity,
        })
    }

    /// Returns a copy with a different unit cost.
    pub fn with_unit_cost(mut self, unit_cost: f64) -> Result<Self, ValidationError> {
        validate_unit_cost(unit_cost)?;
        self.unit_cost = unit_cost;
        Ok(self)
    }
}

fn validate_name(name: String) -> Result<String, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(name)
}

fn validate_unit_cost(unit_cost: f64) -> Result<(), ValidationError> {
    if !unit_cost.is_finite() || unit_cost < 0.0 {
        return Err(ValidationError::out_of_range(
            "unit_cost",
            0.0,
            f64::MAX,
            unit_cost,
        ));
    }
    Ok(())
}
