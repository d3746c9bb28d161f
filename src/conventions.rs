//! Market conventions for listed equity options.
//!
//! Collects the unit conversions the rest of the crate relies on: calendar
//! days for theta and expiry, trading days for realized volatility, and the
//! 100-share contract multiplier.

/// Calendar days per year, used to annualize days-to-expiry and theta.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Trading days per year, used to annualize realized volatility and to
/// discretize Monte Carlo price paths.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Shares per listed option contract.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Convert calendar days to expiry into years: T = days / 365.
pub fn years_from_days(days: f64) -> f64 {
    days / DAYS_PER_YEAR
}
