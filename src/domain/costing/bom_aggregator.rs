//! BOM Cost Aggregator - product batch and unit cost from resolved ingredients.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{CostResolution, DataQualityWarning};
use crate::domain::catalog::{BomLine, CatalogSnapshot, Product};
use crate::domain::foundation::{IngredientId, ProductId};

/// Cost contribution of one recipe line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCost {
    pub ingredient_id: IngredientId,
    pub quantity_per_batch: f64,
    pub ingredient_unit_cost: f64,
    pub line_cost: f64,
    /// Fraction of the batch cost, 0 when the batch costs nothing.
    pub share: f64,
}

/// Cost of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomCost {
    pub product_id: ProductId,
    pub batch_cost: f64,
    pub unit_cost: f64,
    /// Most expensive line first.
    pub lines: Vec<LineCost>,
    pub warnings: Vec<DataQualityWarning>,
}

impl BomCost {
    /// False for products whose cost is zero, which have no meaningful
    /// ratio (CMV, margin-from-cost) and are left out of such views.
    pub fn has_cost(&self) -> bool {
        self.unit_cost > 0.0
    }
}

pub struct BomCostAggregator;

impl BomCostAggregator {
    /// Costs one product from its recipe lines.
    ///
    /// `unit_cost = batch_cost / max(yield, 1)`. A product without lines
    /// costs 0. Lines naming unknown ingredients cost 0 and lines with a
    /// non-positive quantity are skipped; both are reported as warnings.
    pub fn product_cost<'a>(
        product: &Product,
        lines: impl IntoIterator<Item = &'a BomLine>,
        resolution: &CostResolution,
    ) -> BomCost {
        let mut warnings = Vec::new();
        let mut line_costs = Vec::new();

        for line in lines {
            if !line.quantity_per_batch.is_finite() || line.quantity_per_batch <= 0.0 {
                warnings.push(DataQualityWarning::NonPositiveQuantity {
                    owner: line.owner,
                    ingredient_id: line.ingredient_id,
                    quantity: line.quantity_per_batch,
                });
                continue;
            }
            let ingredient_unit_cost = match resolution.cost_of(&line.ingredient_id) {
                Some(cost) => cost,
                None => {
                    warnings.push(DataQualityWarning::UnknownIngredient {
                        owner: line.owner,
                        ingredient_id: line.ingredient_id,
                    });
                    0.0
                }
            };
            line_costs.push(LineCost {
                ingredient_id: line.ingredient_id,
                quantity_per_batch: line.quantity_per_batch,
                ingredient_unit_cost,
                line_cost: line.quantity_per_batch * ingredient_unit_cost,
                share: 0.0,
            });
        }

        let batch_cost: f64 = line_costs.iter().map(|l| l.line_cost).sum();
        if batch_cost > 0.0 {
            for line in &mut line_costs {
                line.share = line.line_cost / batch_cost;
            }
        }
        line_costs.sort_by(|a, b| {
            b.line_cost
                .partial_cmp(&a.line_cost)
                .unwrap_or(Ordering::Equal)
        });

        BomCost {
            product_id: product.id,
            batch_cost,
            unit_cost: batch_cost / product.effective_yield(),
            lines: line_costs,
            warnings,
        }
    }

    /// Costs every product of a snapshot, in snapshot order.
    pub fn all_products(snapshot: &CatalogSnapshot, resolution: &CostResolution) -> Vec<BomCost> {
        snapshot
            .products
            .iter()
            .map(|product| {
                Self::product_cost(product, snapshot.lines_for_product(&product.id), resolution)
            })
            .collect()
    }
}
