//! Pricing solver errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Why the solver could not produce a price.
///
/// Infeasibility errors always carry the nearest achievable target so the
/// caller can offer it instead of a bare failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingError {
    #[error("Target margin {requested:.4} is infeasible; maximum is {max_feasible:.4}")]
    InfeasibleMargin { requested: f64, max_feasible: f64 },

    #[error("Target CMV {requested:.4} is infeasible; nearest is {nearest_feasible:.4}")]
    InfeasibleCmv {
        requested: f64,
        nearest_feasible: f64,
    },

    #[error("Unit cost must be positive for ratio pricing, got {cost}")]
    InvalidCost { cost: f64 },

    #[error("Rate '{field}' must be a finite fraction below 1, got {value}")]
    InvalidRate { field: String, value: f64 },
}

impl PricingError {
    pub(crate) fn invalid_rate(field: &str, value: f64) -> Self {
        PricingError::InvalidRate {
            field: field.to_string(),
            value,
        }
    }

    /// The achievable alternative carried by infeasibility errors.
    pub fn nearest_feasible(&self) -> Option<f64> {
        match self {
            PricingError::InfeasibleMargin { max_feasible, .. } => Some(*max_feasible),
            PricingError::InfeasibleCmv {
                nearest_feasible, ..
            } => Some(*nearest_feasible),
            _ => None,
        }
    }
}

impl From<PricingError> for DomainError {
    fn from(err: PricingError) -> Self {
        let code = match &err {
            PricingError::InfeasibleMargin { .. } => ErrorCode::InfeasibleMargin,
            PricingError::InfeasibleCmv { .. } => ErrorCode::InfeasibleCmv,
            PricingError::InvalidCost { .. } => ErrorCode::InvalidCost,
            PricingError::InvalidRate { .. } => ErrorCode::OutOfRange,
        };
        let mut domain = DomainError::new(code, err.to_string());
        if let Some(alternative) = err.nearest_feasible() {
            domain = domain.with_detail("nearest_feasible", format!("{:.4}", alternative));
        }
        domain
    }
}
