//! Business-wide pricing targets.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Rate, ValidationError};

/// Default target margin (fraction of price).
pub const DEFAULT_TARGET_MARGIN_RATE: f64 = 0.30;
/// Default target CMV (cost as a fraction of net revenue).
pub const DEFAULT_TARGET_CMV_RATE: f64 = 0.35;
/// Default average tax (fraction of price).
pub const DEFAULT_AVERAGE_TAX_RATE: f64 = 0.08;

/// Pricing targets of one business.
///
/// Always passed explicitly into solver and classifier calls; nothing in the
/// domain reads it from shared state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub target_margin_rate: Rate,
    pub target_cmv_rate: Rate,
    pub average_tax_rate: Rate,
}

impl PricingConfig {
    /// Creates a config, validating every rate into `[0, 1)`.
    pub fn try_new(
        target_margin_rate: f64,
        target_cmv_rate: f64,
        average_tax_rate: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            target_margin_rate: Rate::try_new("target_margin_rate", target_margin_rate)?,
            target_cmv_rate: Rate::try_new("target_cmv_rate", target_cmv_rate)?,
            average_tax_rate: Rate::try_new("average_tax_rate", average_tax_rate)?,
        })
    }

    pub fn target_margin(&self) -> f64 {
        self.target_margin_rate.value()
    }

    pub fn target_cmv(&self) -> f64 {
        self.target_cmv_rate.value()
    }

    pub fn tax_rate(&self) -> f64 {
        self.average_tax_rate.value()
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            target_margin_rate: Rate::new(DEFAULT_TARGET_MARGIN_RATE),
            target_cmv_rate: Rate::new(DEFAULT_TARGET_CMV_RATE),
            average_tax_rate: Rate::new(DEFAULT_AVERAGE_TAX_RATE),
        }
    }
}
