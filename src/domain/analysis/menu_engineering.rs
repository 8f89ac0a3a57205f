//! Menu Engineering Classifier - four-quadrant performance matrix.
//!
//! Products are split by the median margin rate and the median quantity
//! sold of the whole analysed set, so every result depends on every other
//! product. The classifier always runs over a complete batch; there is no
//! incremental update.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Product, SalesSummary};
use crate::domain::costing::BomCost;
use crate::domain::foundation::ProductId;
use crate::domain::pricing::{ChannelPricingSolver, PricingConfig};

/// Margin below this fraction of the target margin needs attention.
pub const MARGIN_ATTENTION_FACTOR: f64 = 0.7;

/// CMV points above target at which CMV health becomes critical.
pub const CMV_CRITICAL_OVERSHOOT: f64 = 0.15;

/// Position in the margin / volume matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// High margin, high volume.
    Star,
    /// Low margin, high volume.
    Workhorse,
    /// High margin, low volume.
    Puzzle,
    /// Low margin, low volume.
    Dog,
}

impl Quadrant {
    pub fn from_flags(high_margin: bool, high_volume: bool) -> Self {
        match (high_margin, high_volume) {
            (true, true) => Quadrant::Star,
            (false, true) => Quadrant::Workhorse,
            (true, false) => Quadrant::Puzzle,
            (false, false) => Quadrant::Dog,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::Star => "Star",
            Quadrant::Workhorse => "Workhorse",
            Quadrant::Puzzle => "Puzzle",
            Quadrant::Dog => "Dog",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLabel {
    Healthy,
    Attention,
    Critical,
}

impl HealthLabel {
    /// Critical below zero, attention below 70% of target.
    pub fn for_margin(margin_rate: f64, target_margin: f64) -> Self {
        if margin_rate < 0.0 {
            HealthLabel::Critical
        } else if margin_rate < MARGIN_ATTENTION_FACTOR * target_margin {
            HealthLabel::Attention
        } else {
            HealthLabel::Healthy
        }
    }

    /// Critical more than 15 points over target, attention over target.
    pub fn for_cmv(cmv: f64, target_cmv: f64) -> Self {
        if cmv > target_cmv + CMV_CRITICAL_OVERSHOOT {
            HealthLabel::Critical
        } else if cmv > target_cmv {
            HealthLabel::Attention
        } else {
            HealthLabel::Healthy
        }
    }
}

/// One product as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_cost: f64,
    /// Counter-channel price, i.e. the base price.
    pub price: f64,
    pub quantity_sold: u32,
}

impl MenuItem {
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_cost: f64,
        price: f64,
        quantity_sold: u32,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_cost,
            price,
            quantity_sold,
        }
    }

    /// Builds an item from a costed product and the trailing sales window.
    pub fn from_product(product: &Product, cost: &BomCost, sales: &SalesSummary) -> Self {
        Self::new(
            product.id,
            product.name.clone(),
            cost.unit_cost,
            product.base_price,
            sales.quantity_for(&product.id),
        )
    }
}

/// Classification and health of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub product_id: ProductId,
    pub name: String,
    pub unit_cost: f64,
    pub price: f64,
    pub quantity_sold: u32,
    /// Profit per unit in currency.
    pub margin_contribution: f64,
    pub margin_rate: f64,
    pub cmv: f64,
    /// `None` for products without a positive cost.
    pub quadrant: Option<Quadrant>,
    pub margin_health: HealthLabel,
    pub cmv_health: HealthLabel,
    /// Counter price reaching the target margin, when one exists.
    pub suggested_price: Option<f64>,
}

impl AnalysisResult {
    pub fn is_critical(&self) -> bool {
        self.margin_health == HealthLabel::Critical || self.cmv_health == HealthLabel::Critical
    }
}

/// Population figures of one classification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSummary {
    pub total: usize,
    pub stars: usize,
    pub workhorses: usize,
    pub puzzles: usize,
    pub dogs: usize,
    pub unclassified: usize,
    pub median_margin: f64,
    pub median_volume: f64,
    /// Products whose margin or CMV health is critical, in input order.
    pub critical: Vec<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuAnalysis {
    pub results: Vec<AnalysisResult>,
    pub summary: MenuSummary,
}

/// Stateless classifier.
pub struct MenuEngineeringClassifier;

impl MenuEngineeringClassifier {
    /// Classifies a complete product set.
    ///
    /// Margins are counter-channel margin rates at each item's price with
    /// the configured tax rate. Items with `unit_cost <= 0` get no quadrant
    /// and do not count toward the medians.
    pub fn classify(items: &[MenuItem], config: &PricingConfig) -> MenuAnalysis {
        let tax_rate = config.tax_rate();
        let metrics: Vec<_> = items
            .iter()
            .map(|item| {
                ChannelPricingSolver::metrics_at_price(item.unit_cost, item.price, tax_rate, 0.0)
            })
            .collect();

        let costed: Vec<usize> = (0..items.len())
            .filter(|&i| items[i].unit_cost > 0.0)
            .collect();
        let median_margin = Self::median_or(
            costed.iter().map(|&i| metrics[i].margin_rate).collect(),
            config.target_margin(),
        );
        let median_volume = Self::median_or(
            costed
                .iter()
                .map(|&i| f64::from(items[i].quantity_sold))
                .collect(),
            0.0,
        );

        let results: Vec<AnalysisResult> = items
            .iter()
            .zip(&metrics)
            .map(|(item, m)| {
                let quadrant = (item.unit_cost > 0.0).then(|| {
                    Quadrant::from_flags(
                        m.margin_rate >= median_margin,
                        f64::from(item.quantity_sold) >= median_volume,
                    )
                });
                let suggested_price = ChannelPricingSolver::price_for_margin(
                    item.unit_cost,
                    config.target_margin(),
                    tax_rate,
                    0.0,
                )
                .ok();

                AnalysisResult {
                    product_id: item.product_id,
                    name: item.name.clone(),
                    unit_cost: item.unit_cost,
                    price: item.price,
                    quantity_sold: item.quantity_sold,
                    margin_contribution: m.profit,
                    margin_rate: m.margin_rate,
                    cmv: m.cmv_net,
                    quadrant,
                    margin_health: HealthLabel::for_margin(m.margin_rate, config.target_margin()),
                    cmv_health: HealthLabel::for_cmv(m.cmv_net, config.target_cmv()),
                    suggested_price,
                }
            })
            .collect();

        let summary = Self::summarize(&results, median_margin, median_volume);
        MenuAnalysis { results, summary }
    }

    /// Median of a set; sets of zero or one element fall back to `fallback`.
    pub fn median_or(mut values: Vec<f64>, fallback: f64) -> f64 {
        if values.len() <= 1 {
            return fallback;
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        }
    }

    fn summarize(
        results: &[AnalysisResult],
        median_margin: f64,
        median_volume: f64,
    ) -> MenuSummary {
        let count = |q: Quadrant| results.iter().filter(|r| r.quadrant == Some(q)).count();
        MenuSummary {
            total: results.len(),
            stars: count(Quadrant::Star),
            workhorses: count(Quadrant::Workhorse),
            puzzles: count(Quadrant::Puzzle),
            dogs: count(Quadrant::Dog),
            unclassified: results.iter().filter(|r| r.quadrant.is_none()).count(),
            median_margin,
            median_volume,
            critical: results
                .iter()
                .filter(|r| r.is_critical())
                .map(|r| r.product_id)
                .collect(),
        }
    }
}
