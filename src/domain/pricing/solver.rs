//! Channel Pricing Solver - closed-form price/margin/CMV algebra per channel.
//!
//! Every function works on `(unit cost C, tax rate t, commission rate f)`:
//!
//! - Forward by margin: `P * (1 - m - t - f) = C`  =>  `P = C / (1 - m - t - f)`
//! - Forward by CMV:    `P = C / (cmv * (1 - f))`
//! - Backward:          `profit = P - C - P*t - P*f`, `margin = profit / P`
//!
//! Values are returned unrounded. Use [`ChannelMetrics::rounded`] or
//! `round_to_cents` only when presenting or persisting a price.

use serde::{Deserialize, Serialize};

use super::PricingError;
use crate::domain::foundation::round_to_cents;

/// A divisor at or below this leaves too little of the price to cover cost.
pub const MIN_COST_COVERAGE_HEADROOM: f64 = 0.01;

/// Cost share reserved when proposing the maximum feasible margin.
pub const MIN_VIABLE_COST_RATIO: f64 = 0.05;

/// Bounds proposed when a target CMV is outside `(0, 1)`.
pub const MIN_TARGET_CMV: f64 = 0.01;
pub const MAX_TARGET_CMV: f64 = 0.99;

/// Outcome of evaluating a price on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    pub price: f64,
    pub unit_cost: f64,
    pub tax_amount: f64,
    pub commission_amount: f64,
    pub profit: f64,
    /// Profit as a fraction of price.
    pub margin_rate: f64,
    /// Cost as a fraction of price.
    pub cmv_gross: f64,
    /// Cost as a fraction of revenue net of commission.
    pub cmv_net: f64,
    /// False when the price was not positive and the metrics are zeroed.
    pub priced: bool,
}

impl ChannelMetrics {
    /// Metrics for an unpriced item: everything zero.
    pub fn zeroed(unit_cost: f64) -> Self {
        Self {
            price: 0.0,
            unit_cost,
            tax_amount: 0.0,
            commission_amount: 0.0,
            profit: 0.0,
            margin_rate: 0.0,
            cmv_gross: 0.0,
            cmv_net: 0.0,
            priced: false,
        }
    }

    /// Copy with currency fields rounded to cents; ratios untouched.
    pub fn rounded(&self) -> Self {
        Self {
            price: round_to_cents(self.price),
            unit_cost: round_to_cents(self.unit_cost),
            tax_amount: round_to_cents(self.tax_amount),
            commission_amount: round_to_cents(self.commission_amount),
            profit: round_to_cents(self.profit),
            ..*self
        }
    }
}

/// Stateless pricing functions.
pub struct ChannelPricingSolver;

impl ChannelPricingSolver {
    /// Price reaching `target_margin` on a channel.
    ///
    /// # Errors
    /// - `InvalidCost` if `unit_cost <= 0`
    /// - `InvalidRate` if a rate is not finite or tax/commission is outside `[0, 1)`
    /// - `InfeasibleMargin` if `1 - m - t - f <= 0.01`, carrying
    ///   [`Self::max_feasible_margin`]
    pub fn price_for_margin(
        unit_cost: f64,
        target_margin: f64,
        tax_rate: f64,
        commission_rate: f64,
    ) -> Result<f64, PricingError> {
        Self::check_cost(unit_cost)?;
        Self::check_fraction("tax_rate", tax_rate)?;
        Self::check_fraction("commission_rate", commission_rate)?;
        if !target_margin.is_finite() {
            return Err(PricingError::invalid_rate("target_margin", target_margin));
        }

        let divisor = 1.0 - target_margin - tax_rate - commission_rate;
        if divisor <= MIN_COST_COVERAGE_HEADROOM {
            return Err(PricingError::InfeasibleMargin {
                requested: target_margin,
                max_feasible: Self::max_feasible_margin(tax_rate, commission_rate),
            });
        }

        Ok(unit_cost / divisor)
    }

    /// Highest margin worth offering on a channel: `max(0, 1 - t - f - 0.05)`.
    pub fn max_feasible_margin(tax_rate: f64, commission_rate: f64) -> f64 {
        (1.0 - tax_rate - commission_rate - MIN_VIABLE_COST_RATIO).max(0.0)
    }

    /// Price at which cost is `target_cmv` of revenue net of commission.
    ///
    /// # Errors
    /// - `InvalidCost` if `unit_cost <= 0`
    /// - `InvalidRate` if commission is outside `[0, 1)` or the target is NaN
    /// - `InfeasibleCmv` if `target_cmv` is outside `(0, 1)`, carrying the
    ///   closest bound
    pub fn price_for_cmv(
        unit_cost: f64,
        target_cmv: f64,
        commission_rate: f64,
    ) -> Result<f64, PricingError> {
        Self::check_cost(unit_cost)?;
        Self::check_fraction("commission_rate", commission_rate)?;
        if target_cmv.is_nan() {
            return Err(PricingError::invalid_rate("target_cmv", target_cmv));
        }
        if target_cmv <= 0.0 || target_cmv >= 1.0 {
            return Err(PricingError::InfeasibleCmv {
                requested: target_cmv,
                nearest_feasible: target_cmv.clamp(MIN_TARGET_CMV, MAX_TARGET_CMV),
            });
        }

        Ok(unit_cost / (target_cmv * (1.0 - commission_rate)))
    }

    /// Evaluates a price on a channel.
    ///
    /// A non-positive price is a normal "not priced yet" state and yields
    /// [`ChannelMetrics::zeroed`] instead of an error.
    pub fn metrics_at_price(
        unit_cost: f64,
        price: f64,
        tax_rate: f64,
        commission_rate: f64,
    ) -> ChannelMetrics {
        if price <= 0.0 || !price.is_finite() {
            return ChannelMetrics::zeroed(unit_cost);
        }

        let tax_amount = price * tax_rate;
        let commission_amount = price * commission_rate;
        let profit = price - unit_cost - tax_amount - commission_amount;
        let net_revenue = price * (1.0 - commission_rate);

        ChannelMetrics {
            price,
            unit_cost,
            tax_amount,
            commission_amount,
            profit,
            margin_rate: profit / price,
            cmv_gross: unit_cost / price,
            cmv_net: if net_revenue > 0.0 {
                unit_cost / net_revenue
            } else {
                0.0
            },
            priced: true,
        }
    }

    /// Forward by margin followed by backward evaluation of the result.
    pub fn quote_for_margin(
        unit_cost: f64,
        target_margin: f64,
        tax_rate: f64,
        commission_rate: f64,
    ) -> Result<ChannelMetrics, PricingError> {
        let price = Self::price_for_margin(unit_cost, target_margin, tax_rate, commission_rate)?;
        Ok(Self::metrics_at_price(unit_cost, price, tax_rate, commission_rate))
    }

    /// Forward by CMV followed by backward evaluation of the result.
    pub fn quote_for_cmv(
        unit_cost: f64,
        target_cmv: f64,
        tax_rate: f64,
        commission_rate: f64,
    ) -> Result<ChannelMetrics, PricingError> {
        let price = Self::price_for_cmv(unit_cost, target_cmv, commission_rate)?;
        Ok(Self::metrics_at_price(unit_cost, price, tax_rate, commission_rate))
    }

    fn check_cost(unit_cost: f64) -> Result<(), PricingError> {
        if !unit_cost.is_finite() || unit_cost <= 0.0 {
            return Err(PricingError::InvalidCost { cost: unit_cost });
        }
        Ok(())
    }

    fn check_fraction(field: &str, value: f64) -> Result<(), PricingError> {
        if !value.is_finite() || !(0.0..1.0).contains(&value) {
            return Err(PricingError::invalid_rate(field, value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn delivery_channel_price_for_thirty_percent_margin() {
        let price = ChannelPricingSolver::price_for_margin(10.0, 0.30, 0.08, 0.20).unwrap();
        assert!((price - 10.0 / 0.42).abs() < EPS);
        assert_eq!(round_to_cents(price), 23.81);
    }

    #[test]
    fn excessive_margin_reports_max_feasible() {
        let err = ChannelPricingSolver::price_for_margin(10.0, 0.75, 0.08, 0.20).unwrap_err();
        match err {
            PricingError::InfeasibleMargin {
                requested,
                max_feasible,
            } => {
                assert_eq!(requested, 0.75);
                assert!((max_feasible - 0.67).abs() < EPS);
            }
            other => panic!("Expected InfeasibleMargin, got {:?}", other),
        }
    }

    #[test]
    fn divisor_inside_headroom_is_infeasible() {
        // 1 - 0.615 - 0.08 - 0.30 = 0.005
        let result = ChannelPricingSolver::price_for_margin(10.0, 0.615, 0.08, 0.30);
        assert!(matches!(result, Err(PricingError::InfeasibleMargin { .. })));
    }

    #[test]
    fn divisor_of_exactly_zero_is_infeasible() {
        let result = ChannelPricingSolver::price_for_margin(10.0, 0.72, 0.08, 0.20);
        assert!(matches!(result, Err(PricingError::InfeasibleMargin { .. })));
    }

    #[test]
    fn max_feasible_margin_never_negative() {
        assert_eq!(ChannelPricingSolver::max_feasible_margin(0.5, 0.48), 0.0);
    }

    #[test]
    fn zero_cost_is_invalid_for_forward_solving() {
        assert_eq!(
            ChannelPricingSolver::price_for_margin(0.0, 0.3, 0.08, 0.0),
            Err(PricingError::InvalidCost { cost: 0.0 })
        );
        assert!(matches!(
            ChannelPricingSolver::price_for_cmv(-1.0, 0.3, 0.0),
            Err(PricingError::InvalidCost { .. })
        ));
    }

    #[test]
    fn out_of_range_commission_is_invalid_rate() {
        let result = ChannelPricingSolver::price_for_margin(10.0, 0.3, 0.08, 1.0);
        assert!(matches!(result, Err(PricingError::InvalidRate { .. })));
        let result = ChannelPricingSolver::price_for_cmv(10.0, 0.3, 1.0);
        assert!(matches!(result, Err(PricingError::InvalidRate { .. })));
    }

    #[test]
    fn price_for_cmv_divides_by_net_revenue_share() {
        let price = ChannelPricingSolver::price_for_cmv(10.0, 0.35, 0.20).unwrap();
        assert!((price - 10.0 / (0.35 * 0.8)).abs() < EPS);

        let metrics = ChannelPricingSolver::metrics_at_price(10.0, price, 0.08, 0.20);
        assert!((metrics.cmv_net - 0.35).abs() < EPS);
    }

    #[test]
    fn cmv_outside_unit_interval_suggests_nearest_bound() {
        let err = ChannelPricingSolver::price_for_cmv(10.0, 1.0, 0.1).unwrap_err();
        assert_eq!(err.nearest_feasible(), Some(MAX_TARGET_CMV));

        let err = ChannelPricingSolver::price_for_cmv(10.0, 0.0, 0.1).unwrap_err();
        assert_eq!(err.nearest_feasible(), Some(MIN_TARGET_CMV));
    }

    #[test]
    fn metrics_at_price_computes_profit_and_ratios() {
        let m = ChannelPricingSolver::metrics_at_price(9.0, 15.0, 0.08, 0.0);
        assert!((m.profit - (15.0 - 9.0 - 1.2)).abs() < EPS);
        assert!((m.margin_rate - 4.8 / 15.0).abs() < EPS);
        assert!((m.cmv_gross - 0.6).abs() < EPS);
        assert!((m.cmv_net - 0.6).abs() < EPS);
        assert!(m.priced);
    }

    #[test]
    fn commission_separates_gross_and_net_cmv() {
        let m = ChannelPricingSolver::metrics_at_price(8.0, 20.0, 0.0, 0.2);
        assert!((m.cmv_gross - 0.4).abs() < EPS);
        assert!((m.cmv_net - 0.5).abs() < EPS);
        assert!((m.commission_amount - 4.0).abs() < EPS);
    }

    #[test]
    fn non_positive_price_yields_zeroed_metrics() {
        let m = ChannelPricingSolver::metrics_at_price(5.0, 0.0, 0.08, 0.2);
        assert!(!m.priced);
        assert_eq!(m.margin_rate, 0.0);
        assert_eq!(m.profit, 0.0);
        assert_eq!(m.unit_cost, 5.0);

        let m = ChannelPricingSolver::metrics_at_price(5.0, -3.0, 0.08, 0.2);
        assert!(!m.priced);
    }

    #[test]
    fn quote_for_margin_recovers_target() {
        let m = ChannelPricingSolver::quote_for_margin(4.2, 0.25, 0.1, 0.12).unwrap();
        assert!((m.margin_rate - 0.25).abs() < 1e-9);
    }

    #[test]
    fn quote_for_cmv_recovers_target() {
        let m = ChannelPricingSolver::quote_for_cmv(4.2, 0.3, 0.1, 0.12).unwrap();
        assert!((m.cmv_net - 0.3).abs() < 1e-9);
    }

    #[test]
    fn rounded_metrics_round_currency_only() {
        let m = ChannelPricingSolver::quote_for_margin(10.0, 0.30, 0.08, 0.20)
            .unwrap()
            .rounded();
        assert_eq!(m.price, 23.81);
        assert!((m.margin_rate - 0.30).abs() < 1e-9);
    }
}
