//! Currency rounding at the presentation boundary.
//!
//! Internal computation stays in unrounded `f64`; these helpers are applied
//! only when a value leaves the core as a price to show or write.

/// Smallest currency unit, in currency units.
pub const CENT: f64 = 0.01;

/// Tolerance absorbing binary representation error of decimal inputs
/// (e.g. `23.805` is stored as `23.80499999...`).
const ROUNDING_TOLERANCE: f64 = 1e-7;

/// Rounds to two decimals, halves away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    (scaled + scaled.signum() * ROUNDING_TOLERANCE).round() / 100.0
}

/// Rounds up to the next cent. Values already on a cent boundary are kept.
pub fn ceil_to_cents(value: f64) -> f64 {
    ((value * 100.0) - ROUNDING_TOLERANCE).ceil() / 100.0
}
