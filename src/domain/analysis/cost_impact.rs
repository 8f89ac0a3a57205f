//! Cost-Change Impact Analyzer - turns ingredient cost increases into
//! suggested re-pricing that keeps each product's prior margin.
//!
//! For a purchased ingredient whose cost rose by `v`, the share of its
//! current cost caused by the rise is `cost * v / (1 + v)`. That share is
//! rolled up through composed ingredients like any other cost, then summed
//! over a product's recipe lines and divided by the product's yield to give
//! the product's `cost_impact`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::catalog::{CatalogSnapshot, CostHistoryEntry, Product};
use crate::domain::costing::{BomCost, BomCostAggregator, CostGraph, CostingError};
use crate::domain::foundation::{
    ceil_to_cents, round_to_cents, ChannelId, IngredientId, ProductId, CENT,
};

/// Tolerance applied to band edges so decimal rates land on the intended side.
pub const BAND_TOLERANCE: f64 = 1e-9;

/// Thresholds of the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactPolicy {
    /// Trailing window of cost history considered, in days.
    pub window_days: u32,
    /// Increases at or below this rate are noise.
    pub min_variation_rate: f64,
    /// Increases above this rate are treated as data anomalies.
    pub max_variation_rate: f64,
    /// Per-unit cost impacts below this amount are ignored.
    pub min_cost_impact: f64,
}

impl Default for ImpactPolicy {
    fn default() -> Self {
        Self {
            window_days: 60,
            min_variation_rate: 0.05,
            max_variation_rate: 0.50,
            min_cost_impact: 0.05,
        }
    }
}

impl ImpactPolicy {
    /// True for rates in `(min, max]`.
    pub fn in_band(&self, variation_rate: f64) -> bool {
        variation_rate > self.min_variation_rate + BAND_TOLERANCE
            && variation_rate <= self.max_variation_rate + BAND_TOLERANCE
    }
}

/// A recipe line of the product that carries part of the increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedLine {
    pub ingredient_id: IngredientId,
    pub quantity_per_batch: f64,
    /// Batch-level impact of this line.
    pub impact: f64,
}

/// Proportionally scaled price of one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPriceSuggestion {
    pub channel_id: ChannelId,
    pub current_price: f64,
    pub suggested_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepricingSuggestion {
    pub product_id: ProductId,
    pub product_name: String,
    pub current_price: f64,
    pub current_unit_cost: f64,
    /// Per-unit cost attributable to the qualifying increases.
    pub cost_impact: f64,
    /// Margin before the increases; `None` when it fell outside `(0, 1)`.
    pub prior_margin: Option<f64>,
    /// Unrounded suggestion.
    pub raw_suggested_price: f64,
    /// Current price plus the increase rounded up to the cent.
    pub suggested_price: f64,
    pub price_increase: f64,
    pub affected_lines: Vec<AffectedLine>,
    /// Filled only when the business sells on more than one channel.
    pub channel_prices: Vec<ChannelPriceSuggestion>,
}

pub struct CostImpactAnalyzer;

impl CostImpactAnalyzer {
    /// Compounded qualifying increase per ingredient.
    ///
    /// Each entry is filtered by the band on its own; several qualifying
    /// entries for one ingredient compound as `prod(1 + v) - 1`.
    pub fn qualifying_variations<'a>(
        entries: impl IntoIterator<Item = &'a CostHistoryEntry>,
        policy: &ImpactPolicy,
    ) -> HashMap<IngredientId, f64> {
        let mut factors: HashMap<IngredientId, f64> = HashMap::new();
        for entry in entries {
            let Some(rate) = entry.variation_rate() else {
                continue;
            };
            if policy.in_band(rate) {
                *factors.entry(entry.ingredient_id).or_insert(1.0) *= 1.0 + rate;
            }
        }
        factors
            .into_iter()
            .map(|(id, factor)| (id, factor - 1.0))
            .collect()
    }

    /// Suggestions for every product of the snapshot under cost pressure.
    ///
    /// Uses the history inside `policy.window_days` before
    /// `snapshot.taken_at`.
    ///
    /// # Errors
    ///
    /// `CyclicComposition` if the ingredient graph contains a cycle.
    pub fn analyze(
        snapshot: &CatalogSnapshot,
        policy: &ImpactPolicy,
    ) -> Result<Vec<RepricingSuggestion>, CostingError> {
        let variations =
            Self::qualifying_variations(snapshot.cost_history_within(policy.window_days), policy);
        if variations.is_empty() {
            debug!(business_id = %snapshot.business_id, "No qualifying cost increases");
            return Ok(Vec::new());
        }

        let graph = CostGraph::build(&snapshot.ingredients, &snapshot.bom_lines);
        let resolution = graph.resolve_all()?;
        let ingredient_impacts = graph.roll_up(|id| match variations.get(id) {
            Some(v) => resolution.cost_of(id).unwrap_or(0.0) * v / (1.0 + v),
            None => 0.0,
        })?;

        let costs = BomCostAggregator::all_products(snapshot, &resolution);
        let suggestions: Vec<RepricingSuggestion> = snapshot
            .products
            .iter()
            .zip(&costs)
            .filter_map(|(product, cost)| {
                Self::suggest_for_product(snapshot, product, cost, &ingredient_impacts, policy)
            })
            .collect();

        debug!(
            business_id = %snapshot.business_id,
            ingredients_affected = variations.len(),
            suggestions = suggestions.len(),
            "Analyzed cost-change impact"
        );
        Ok(suggestions)
    }

    fn suggest_for_product(
        snapshot: &CatalogSnapshot,
        product: &Product,
        cost: &BomCost,
        ingredient_impacts: &HashMap<IngredientId, f64>,
        policy: &ImpactPolicy,
    ) -> Option<RepricingSuggestion> {
        let affected_lines: Vec<AffectedLine> = snapshot
            .lines_for_product(&product.id)
            .filter(|line| line.quantity_per_batch.is_finite() && line.quantity_per_batch > 0.0)
            .filter_map(|line| {
                let per_unit = ingredient_impacts.get(&line.ingredient_id).copied()?;
                (per_unit > 0.0).then(|| AffectedLine {
                    ingredient_id: line.ingredient_id,
                    quantity_per_batch: line.quantity_per_batch,
                    impact: line.quantity_per_batch * per_unit,
                })
            })
            .collect();
        if affected_lines.is_empty() {
            return None;
        }

        let current_price = product.base_price;
        let current_unit_cost = cost.unit_cost;
        if current_price <= 0.0 || current_unit_cost <= 0.0 {
            return None;
        }
        // Counter channel: gross and net CMV coincide.
        if current_unit_cost / current_price <= snapshot.pricing.target_cmv() {
            return None;
        }

        let cost_impact: f64 =
            affected_lines.iter().map(|l| l.impact).sum::<f64>() / product.effective_yield();
        if cost_impact < policy.min_cost_impact {
            return None;
        }

        let (prior_margin, raw_suggested_price) =
            Self::margin_preserving_price(current_price, current_unit_cost, cost_impact);
        let price_increase = ceil_to_cents(raw_suggested_price - current_price);
        if price_increase < CENT - BAND_TOLERANCE {
            return None;
        }
        let suggested_price = round_to_cents(current_price + price_increase);

        let channel_prices = if snapshot.channels.len() > 1 {
            Self::scale_channel_prices(snapshot, product, suggested_price / current_price)
        } else {
            Vec::new()
        };

        Some(RepricingSuggestion {
            product_id: product.id,
            product_name: product.name.clone(),
            current_price,
            current_unit_cost,
            cost_impact,
            prior_margin,
            raw_suggested_price,
            suggested_price,
            price_increase,
            affected_lines,
            channel_prices,
        })
    }

    /// Price restoring the margin the product had before the increase.
    ///
    /// Falls back to passing the impact straight through when the prior
    /// margin is not in `(0, 1)`.
    pub fn margin_preserving_price(
        current_price: f64,
        current_unit_cost: f64,
        cost_impact: f64,
    ) -> (Option<f64>, f64) {
        let prior_cost = current_unit_cost - cost_impact;
        let prior_margin = (current_price - prior_cost) / current_price;
        if prior_margin > 0.0 && prior_margin < 1.0 {
            (
                Some(prior_margin),
                current_unit_cost / (1.0 - prior_margin),
            )
        } else {
            (None, current_price + cost_impact)
        }
    }

    fn scale_channel_prices(
        snapshot: &CatalogSnapshot,
        product: &Product,
        factor: f64,
    ) -> Vec<ChannelPriceSuggestion> {
        snapshot
            .channels
            .iter()
            .map(|channel| {
                let current_price = product.price_for(&channel.id);
                ChannelPriceSuggestion {
                    channel_id: channel.id,
                    current_price,
                    suggested_price: round_to_cents(current_price * factor),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{BomLine, Channel, Ingredient, UnitOfMeasure};
    use crate::domain::foundation::{BusinessId, Timestamp};

    const EPS: f64 = 1e-9;

    fn entry(id: IngredientId, previous: f64, new: f64, days_ago: i64) -> CostHistoryEntry {
        CostHistoryEntry::new(id, previous, new, Timestamp::now().minus_days(days_ago))
    }

    /// Product at 15.00 with unit cost 9.00, of which the cheese line
    /// (3 x 2.20) just rose 10%.
    fn scenario() -> (CatalogSnapshot, IngredientId, ProductId) {
        let cheese =
            Ingredient::purchased(IngredientId::new(), "Cheese", UnitOfMeasure::Unit, 2.2).unwrap();
        let bread =
            Ingredient::purchased(IngredientId::new(), "Bread", UnitOfMeasure::Unit, 2.4).unwrap();
        let toastie = Product::new(ProductId::new(), "Toastie", "Mains", 15.0).unwrap();

        let mut snapshot = CatalogSnapshot::empty(BusinessId::new());
        snapshot.bom_lines = vec![
            BomLine::for_product(toastie.id, cheese.id, 3.0).unwrap(),
            BomLine::for_product(toastie.id, bread.id, 1.0).unwrap(),
        ];
        snapshot.cost_history = vec![CostHistoryEntry::new(
            cheese.id,
            2.0,
            2.2,
            snapshot.taken_at.minus_days(3),
        )];
        let ids = (cheese.id, toastie.id);
        snapshot.ingredients = vec![cheese, bread];
        snapshot.products = vec![toastie];
        (snapshot, ids.0, ids.1)
    }

    #[test]
    fn band_excludes_five_percent_and_above_fifty() {
        let policy = ImpactPolicy::default();
        assert!(!policy.in_band(1.05 - 1.0));
        assert!(policy.in_band(1.0501 - 1.0));
        assert!(policy.in_band(1.5 - 1.0));
        assert!(!policy.in_band(1.51 - 1.0));
        assert!(!policy.in_band(-0.2));
    }

    #[test]
    fn band_applies_to_entry_variation_rates() {
        let id = IngredientId::new();
        let policy = ImpactPolicy::default();
        let exact = [entry(id, 2.0, 2.1, 1)];
        assert!(CostImpactAnalyzer::qualifying_variations(&exact, &policy).is_empty());

        let just_over = [entry(id, 100.0, 105.01, 1)];
        assert!(CostImpactAnalyzer::qualifying_variations(&just_over, &policy).contains_key(&id));

        let anomaly = [entry(id, 2.0, 3.02, 1)];
        assert!(CostImpactAnalyzer::qualifying_variations(&anomaly, &policy).is_empty());
    }

    #[test]
    fn qualifying_increases_compound() {
        let id = IngredientId::new();
        let entries = [
            entry(id, 2.0, 2.2, 10),
            entry(id, 2.2, 2.42, 5),
            entry(id, 2.42, 2.43, 1),
        ];
        let variations =
            CostImpactAnalyzer::qualifying_variations(&entries, &ImpactPolicy::default());
        assert!((variations[&id] - 0.21).abs() < 1e-9);
    }

    #[test]
    fn ten_percent_rise_suggests_margin_preserving_price() {
        let (snapshot, cheese_id, product_id) = scenario();
        let suggestions =
            CostImpactAnalyzer::analyze(&snapshot, &ImpactPolicy::default()).unwrap();

        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!(s.product_id, product_id);
        assert!((s.current_unit_cost - 9.0).abs() < EPS);
        assert!((s.cost_impact - 0.60).abs() < EPS);
        assert!((s.prior_margin.unwrap() - 0.44).abs() < EPS);
        assert!((s.raw_suggested_price - 9.0 / 0.56).abs() < 1e-6);
        assert_eq!(round_to_cents(s.raw_suggested_price), 16.07);
        assert_eq!(s.suggested_price, 16.08);
        assert_eq!(s.affected_lines.len(), 1);
        assert_eq!(s.affected_lines[0].ingredient_id, cheese_id);
        assert!(s.channel_prices.is_empty());
    }

    #[test]
    fn product_within_target_cmv_is_skipped() {
        let (mut snapshot, _, _) = scenario();
        snapshot.products[0].base_price = 40.0;
        let suggestions =
            CostImpactAnalyzer::analyze(&snapshot, &ImpactPolicy::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn small_impact_is_skipped() {
        let (mut snapshot, _, _) = scenario();
        snapshot.bom_lines[0].quantity_per_batch = 0.2;
        // 0.44 * 0.1 / 1.1 = 0.04 per unit
        let suggestions =
            CostImpactAnalyzer::analyze(&snapshot, &ImpactPolicy::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn unaffected_products_are_skipped() {
        let (mut snapshot, _, _) = scenario();
        let soup = Product::new(ProductId::new(), "Soup", "Mains", 4.0).unwrap();
        snapshot
            .bom_lines
            .push(BomLine::for_product(soup.id, snapshot.ingredients[1].id, 1.0).unwrap());
        snapshot.products.push(soup);

        let suggestions =
            CostImpactAnalyzer::analyze(&snapshot, &ImpactPolicy::default()).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].product_name, "Toastie");
    }

    #[test]
    fn entries_outside_window_are_ignored() {
        let (mut snapshot, cheese_id, _) = scenario();
        snapshot.cost_history = vec![CostHistoryEntry::new(
            cheese_id,
            2.0,
            2.2,
            snapshot.taken_at.minus_days(61),
        )];
        let suggestions =
            CostImpactAnalyzer::analyze(&snapshot, &ImpactPolicy::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn unbounded_window_includes_every_entry() {
        let (mut snapshot, cheese_id, _) = scenario();
        snapshot.cost_history = vec![CostHistoryEntry::new(
            cheese_id,
            2.0,
            2.2,
            snapshot.taken_at.minus_days(4000),
        )];
        let policy = ImpactPolicy {
            window_days: u32::MAX,
            ..Default::default()
        };
        let suggestions = CostImpactAnalyzer::analyze(&snapshot, &policy).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].suggested_price, 16.08);
    }

    #[test]
    fn increase_propagates_through_composed_ingredient() {
        let (mut snapshot, cheese_id, product_id) = scenario();
        // Route cheese through a sauce that yields 2 units per batch of 6 cheese.
        let sauce =
            Ingredient::composed(IngredientId::new(), "Cheese sauce", UnitOfMeasure::Unit, 2.0)
                .unwrap();
        snapshot.bom_lines = vec![
            BomLine::for_ingredient(sauce.id, cheese_id, 6.0).unwrap(),
            BomLine::for_product(product_id, sauce.id, 1.0).unwrap(),
            BomLine::for_product(product_id, snapshot.ingredients[1].id, 1.0).unwrap(),
        ];
        snapshot.ingredients.push(sauce.clone());

        let suggestions =
            CostImpactAnalyzer::analyze(&snapshot, &ImpactPolicy::default()).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert!((suggestions[0].cost_impact - 0.60).abs() < EPS);
        assert_eq!(suggestions[0].affected_lines[0].ingredient_id, sauce.id);
        assert_eq!(suggestions[0].suggested_price, 16.08);
    }

    #[test]
    fn product_yield_scales_impact_per_unit() {
        let (mut snapshot, _, _) = scenario();
        snapshot.bom_lines[0].quantity_per_batch = 6.0;
        snapshot.bom_lines[1].quantity_per_batch = 2.0;
        snapshot.products[0].yield_quantity = 2.0;

        let suggestions =
            CostImpactAnalyzer::analyze(&snapshot, &ImpactPolicy::default()).unwrap();
        assert!((suggestions[0].cost_impact - 0.60).abs() < EPS);
        assert!((suggestions[0].current_unit_cost - 9.0).abs() < EPS);
    }

    #[test]
    fn channel_prices_scale_proportionally() {
        let (mut snapshot, _, _) = scenario();
        let counter = Channel::counter(ChannelId::new(), "Counter").unwrap();
        let delivery = Channel::new(ChannelId::new(), "Delivery", 0.2).unwrap();
        snapshot.products[0]
            .channel_prices
            .insert(delivery.id, 19.0);
        snapshot.channels = vec![counter.clone(), delivery.clone()];

        let suggestions =
            CostImpactAnalyzer::analyze(&snapshot, &ImpactPolicy::default()).unwrap();
        let prices = &suggestions[0].channel_prices;

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].channel_id, counter.id);
        assert_eq!(prices[0].suggested_price, 16.08);
        assert_eq!(prices[1].current_price, 19.0);
        assert_eq!(prices[1].suggested_price, round_to_cents(19.0 * 16.08 / 15.0));
    }

    #[test]
    fn prior_margin_outside_unit_interval_passes_impact_through() {
        let (prior, price) = CostImpactAnalyzer::margin_preserving_price(10.0, 12.0, 1.0);
        // prior cost 11 > price 10 => negative prior margin
        assert_eq!(prior, None);
        assert!((price - 11.0).abs() < EPS);
    }
}
