//! Tracing subscriber bootstrap.
//!
//! The library only emits events; a host application installs the
//! subscriber once at startup.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter directive: {0}")]
    InvalidFilter(String),

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// - `InvalidFilter` if `config.level` is not a valid `EnvFilter` directive
/// - `AlreadyInitialized` if a global subscriber already exists
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|err| TelemetryError::InvalidFilter(err.to_string()))?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.map_err(|_| TelemetryError::AlreadyInitialized)
}
