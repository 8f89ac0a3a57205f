//! Analysis windows and re-pricing thresholds

use serde::Deserialize;

use super::error::ValidationError;
use super::pricing::check_rate;
use crate::domain::analysis::ImpactPolicy;
use crate::ports::SnapshotWindows;

/// Longest accepted analysis window, ten years.
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Windows and thresholds used by menu analysis and cost-impact suggestions.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Days of sales counted as volume
    #[serde(default = "default_sales_window_days")]
    pub sales_window_days: u32,

    /// Days of ingredient cost history inspected for increases
    #[serde(default = "default_cost_history_window_days")]
    pub cost_history_window_days: u32,

    #[serde(default = "default_min_variation_rate")]
    pub min_variation_rate: f64,

    #[serde(default = "default_max_variation_rate")]
    pub max_variation_rate: f64,

    /// Minimum per-unit cost impact, in currency
    #[serde(default = "default_min_cost_impact")]
    pub min_cost_impact: f64,
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_window("sales_window_days", self.sales_window_days)?;
        check_window("cost_history_window_days", self.cost_history_window_days)?;
        check_rate("min_variation_rate", self.min_variation_rate)?;
        if !self.max_variation_rate.is_finite()
            || self.max_variation_rate <= self.min_variation_rate
        {
            return Err(ValidationError::InvertedVariationBand {
                min: self.min_variation_rate,
                max: self.max_variation_rate,
            });
        }
        if !self.min_cost_impact.is_finite() || self.min_cost_impact < 0.0 {
            return Err(ValidationError::InvalidCostImpact(self.min_cost_impact));
        }
        Ok(())
    }

    /// Thresholds for the cost-change impact analysis.
    pub fn impact_policy(&self) -> ImpactPolicy {
        ImpactPolicy {
            window_days: self.cost_history_window_days,
            min_variation_rate: self.min_variation_rate,
            max_variation_rate: self.max_variation_rate,
            min_cost_impact: self.min_cost_impact,
        }
    }

    /// Windows applied when loading snapshots.
    pub fn snapshot_windows(&self) -> SnapshotWindows {
        SnapshotWindows {
            sales_days: self.sales_window_days,
            cost_history_days: self.cost_history_window_days,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            sales_window_days: default_sales_window_days(),
            cost_history_window_days: default_cost_history_window_days(),
            min_variation_rate: default_min_variation_rate(),
            max_variation_rate: default_max_variation_rate(),
            min_cost_impact: default_min_cost_impact(),
        }
    }
}

fn check_window(field: &'static str, days: u32) -> Result<(), ValidationError> {
    if days == 0 {
        return Err(ValidationError::EmptyWindow(field));
    }
    if days > MAX_WINDOW_DAYS {
        return Err(ValidationError::WindowTooLong {
            field,
            value: days,
            max: MAX_WINDOW_DAYS,
        });
    }
    Ok(())
}

fn default_sales_window_days() -> u32 {
    30
}

fn default_cost_history_window_days() -> u32 {
    60
}

fn default_min_variation_rate() -> f64 {
    0.05
}

fn default_max_variation_rate() -> f64 {
    0.50
}

fn default_min_cost_impact() -> f64 {
    0.05
}
