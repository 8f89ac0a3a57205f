//! Business pricing defaults

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::pricing::{
    PricingConfig, DEFAULT_AVERAGE_TAX_RATE, DEFAULT_TARGET_CMV_RATE, DEFAULT_TARGET_MARGIN_RATE,
};

/// Pricing targets applied when a business has not set its own.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_target_margin_rate")]
    pub target_margin_rate: f64,

    #[serde(default = "default_target_cmv_rate")]
    pub target_cmv_rate: f64,

    /// Fraction of price remitted as tax
    #[serde(default = "default_average_tax_rate")]
    pub average_tax_rate: f64,
}

impl PricingSettings {
    /// Validate that every rate is a fraction in `[0, 1)`
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_rate("target_margin_rate", self.target_margin_rate)?;
        check_rate("target_cmv_rate", self.target_cmv_rate)?;
        check_rate("average_tax_rate", self.average_tax_rate)?;
        Ok(())
    }

    /// Converts into the domain parameter object.
    pub fn to_pricing_config(&self) -> Result<PricingConfig, ValidationError> {
        self.validate()?;
        PricingConfig::try_new(
            self.target_margin_rate,
            self.target_cmv_rate,
            self.average_tax_rate,
        )
        .map_err(|err| ValidationError::InvalidPricing(err.to_string()))
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            target_margin_rate: default_target_margin_rate(),
            target_cmv_rate: default_target_cmv_rate(),
            average_tax_rate: default_average_tax_rate(),
        }
    }
}

pub(super) fn check_rate(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::RateOutOfRange { field, value })
    }
}

fn default_target_margin_rate() -> f64 {
    DEFAULT_TARGET_MARGIN_RATE
}

fn default_target_cmv_rate() -> f64 {
    DEFAULT_TARGET_CMV_RATE
}

fn default_average_tax_rate() -> f64 {
    DEFAULT_AVERAGE_TAX_RATE
}
