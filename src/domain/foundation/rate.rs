//! Rate value object: a fraction in `[0, 1)`.
//!
//! Commission, tax, target margin and target CMV are all stored as fractions
//! of price. A rate of 1.0 or more would leave nothing to cover cost, so it is
//! rejected at construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A fraction between 0 (inclusive) and 1 (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rate(f64);

impl Rate {
    /// Zero rate.
    pub const ZERO: Self = Self(0.0);

    /// Largest representable rate.
    pub const MAX: Self = Self(1.0 - f64::EPSILON);

    /// Creates a new Rate, clamping to the valid range. NaN becomes zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, Self::MAX.0))
    }

    /// Creates a Rate, returning error if outside `[0, 1)` or not finite.
    pub fn try_new(field: &str, value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..1.0).contains(&value) {
            return Err(ValidationError::out_of_range(field, 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the value as a fraction.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value on a 0-100 scale.
    pub fn as_percent(&self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for Rate {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rate::try_new("rate", value)
    }
}

impl From<Rate> for f64 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.as_percent())
    }
}
