//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Rate '{field}' must be in [0, 1), got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },

    #[error("Invalid pricing defaults: {0}")]
    InvalidPricing(String),

    #[error("Window '{0}' must be at least one day")]
    EmptyWindow(&'static str),

    #[error("Window '{field}' must not exceed {max} days, got {value}")]
    WindowTooLong {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Variation band is inverted: min {min} is not below max {max}")]
    InvertedVariationBand { min: f64, max: f64 },

    #[error("Minimum cost impact must be a non-negative amount, got {0}")]
    InvalidCostImpact(f64),

    #[error("Log filter directive is empty")]
    EmptyLogLevel,
}
