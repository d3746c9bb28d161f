//! Descriptive volatility statistics.
//!
//! Standalone helpers that turn observed implied or realized volatility
//! series into the usual screening numbers. They are deliberately total
//! functions: degenerate input returns a neutral value (50.0 for the
//! rank-style metrics, 0.0 for the slope-style ones) instead of an error,
//! since these feed ranking pipelines where a missing history should not
//! abort the scan.

use crate::conventions::TRADING_DAYS_PER_YEAR;

/// Minimum IV range considered meaningful for ranking.
const FLAT_RANGE_EPSILON: f64 = 0.01;

/// IV rank: where `current` sits in the historical min-max range, in
/// `[0, 100]`.
///
/// Fewer than two history points, or a range narrower than 0.01, returns
/// the neutral 50.0.
pub fn iv_rank(current: f64, history: &[f64]) -> f64 {
    if history.len() < 2 {
        return 50.0;
    }
    let min_iv = history.iter().copied().fold(f64::INFINITY, f64::min);
    let max_iv = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_iv - min_iv < FLAT_RANGE_EPSILON {
        return 50.0;
    }
    ((current - min_iv) / (max_iv - min_iv) * 100.0).clamp(0.0, 100.0)
}

/// IV percentile: the percentage of history entries strictly below
/// `current`, in `[0, 100]`. Empty history returns 50.0.
pub fn iv_percentile(current: f64, history: &[f64]) -> f64 {
    if history.is_empty() {
        return 50.0;
    }
    let below = history.iter().filter(|&&iv| iv < current).count();
    below as f64 / history.len() as f64 * 100.0
}

/// Volatility skew score: put-side skew minus call-side skew, relative to
/// the at-the-money level.
///
/// Positive means downside puts carry the richer premium, negative means
/// upside calls do. `atm_iv <= 0` returns 0.0.
pub fn skew_score(atm_iv: f64, otm_put_iv: f64, otm_call_iv: f64) -> f64 {
    if atm_iv <= 0.0 {
        return 0.0;
    }
    let put_skew = (otm_put_iv - atm_iv) / atm_iv;
    let call_skew = (otm_call_iv - atm_iv) / atm_iv;
    put_skew - call_skew
}

/// Term-structure slope between the shortest- and longest-dated entries,
/// as a percentage of the long-dated IV.
///
/// Positive means backwardation (near-dated IV above far-dated), negative
/// the usual contango. Entries are `(days_to_expiry, iv)` pairs in any
/// order. Fewer than two entries, or a non-positive far-dated IV, returns
/// 0.0.
pub fn term_structure_slope(ivs_by_dte: &[(f64, f64)]) -> f64 {
    if ivs_by_dte.len() < 2 {
        return 0.0;
    }
    let mut shortest = ivs_by_dte[0];
    let mut longest = ivs_by_dte[0];
    for &entry in &ivs_by_dte[1..] {
        if entry.0 < shortest.0 {
            shortest = entry;
        }
        if entry.0 > longest.0 {
            longest = entry;
        }
    }
    let (_, short_iv) = shortest;
    let (_, long_iv) = longest;
    if long_iv <= 0.0 {
        return 0.0;
    }
    (short_iv - long_iv) / long_iv * 100.0
}

/// Annualized realized volatility from a close-price series.
///
/// Takes the population standard deviation of log returns over the last
/// `periods` prices and scales by the square root of 252 trading days.
/// Returns 0.0 when the series is shorter than `periods + 1`, when
/// `periods < 2`, or when any price in the window is non-positive.
pub fn realized_volatility(prices: &[f64], periods: usize) -> f64 {
    if periods < 2 || prices.len() < periods + 1 {
        return 0.0;
    }
    let window = &prices[prices.len() - periods..];
    if window.iter().any(|&p| p <= 0.0) {
        return 0.0;
    }

    let returns: Vec<f64> = window.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}
