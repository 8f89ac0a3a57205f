//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MENU_PRICING` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use menu_pricing::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let pricing = config.pricing.to_pricing_config().expect("Invalid pricing");
//! println!("Target margin: {}", pricing.target_margin());
//! ```

mod analysis;
mod error;
mod logging;
mod pricing;

pub use analysis::{AnalysisSettings, MAX_WINDOW_DAYS};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use pricing::PricingSettings;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Default pricing targets
    #[serde(default)]
    pub pricing: PricingSettings,

    /// Sales/cost windows and re-pricing thresholds
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MENU_PRICING` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MENU_PRICING__PRICING__TARGET_MARGIN_RATE=0.25` -> `pricing.target_margin_rate = 0.25`
    /// - `MENU_PRICING__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MENU_PRICING")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for rates outside `[0, 1)`, zero-length
    /// windows, an inverted variation band or an empty log filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pricing.validate()?;
        self.analysis.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
