//! Black-Scholes pricing kernel for European options.
//!
//! Provides the closed-form price, the Greeks, and implied-volatility
//! inversion. All rates are continuously compounded; all times are in years.
//!
//! # Units
//! - Prices and Greeks are per share.
//! - Theta is per calendar day (annual theta divided by 365).
//! - Vega and rho are per 1 percentage-point move (divided by 100).
//!
//! # References
//! - Hull, *Options, Futures, and Other Derivatives*, Ch. 15.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};
use crate::math::{bisect_root, norm_cdf, norm_pdf};
use crate::types::OptionType;
use crate::validate::{validate_finite, validate_positive};

/// Below this time to expiry (in years) the option is treated as expired:
/// prices collapse to intrinsic value and Greeks to their terminal limits.
const EXPIRY_EPSILON: f64 = 1e-10;

/// Volatility bracket for implied-vol inversion: 0.1% to 500% annualized.
const IV_BRACKET: (f64, f64) = (0.001, 5.0);
const IV_XTOL: f64 = 1e-6;
const IV_MAX_ITER: usize = 128;

/// Black-Scholes sensitivities for a European option.
///
/// Per-share values unless aggregated at the strategy level. Theta is per
/// calendar day; vega and rho are per 1 percentage-point move in IV and
/// rate respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// dV/dS — sensitivity to the underlying price.
    pub delta: f64,
    /// d²V/dS² — rate of change of delta.
    pub gamma: f64,
    /// dV/dt per calendar day.
    pub theta: f64,
    /// dV/dσ per 1 percentage-point IV move.
    pub vega: f64,
    /// dV/dr per 1 percentage-point rate move.
    pub rho: f64,
}

impl Greeks {
    /// Scale every sensitivity by `factor` (e.g., signed contract count).
    pub fn scale(self, factor: f64) -> Greeks {
        Greeks {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
            rho: self.rho * factor,
        }
    }
}

impl std::ops::Add for Greeks {
    type Output = Greeks;

    fn add(self, rhs: Greeks) -> Greeks {
        Greeks {
            delta: self.delta + rhs.delta,
            gamma: self.gamma + rhs.gamma,
            theta: self.theta + rhs.theta,
            vega: self.vega + rhs.vega,
            rho: self.rho + rhs.rho,
        }
    }
}

impl std::ops::AddAssign for Greeks {
    fn add_assign(&mut self, rhs: Greeks) {
        *self = *self + rhs;
    }
}

/// Black-Scholes auxiliary term d₁.
///
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// ```
///
/// At `t` below the expiry epsilon, returns ±∞ snapped by moneyness (the
/// CDF of ±∞ recovers the correct terminal exercise probability).
///
/// # Errors
/// Returns [`StrategyError::NumericalError`] if `s`, `k`, or `sigma` is
/// non-positive, or `t` is negative.
pub fn d1(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> Result<f64> {
    if s <= 0.0 || k <= 0.0 || sigma <= 0.0 || t < 0.0 {
        return Err(StrategyError::NumericalError {
            message: format!(
                "d1 requires s > 0, k > 0, sigma > 0, t >= 0; got s={s}, k={k}, t={t}, sigma={sigma}"
            ),
        });
    }
    if t < EXPIRY_EPSILON {
        return Ok(match s.partial_cmp(&k) {
            Some(std::cmp::Ordering::Greater) => f64::INFINITY,
            Some(std::cmp::Ordering::Less) => f64::NEG_INFINITY,
            _ => 0.0,
        });
    }
    Ok(((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt()))
}

/// Black-Scholes auxiliary term d₂ = d₁ − σ√T.
///
/// # Errors
/// Same domain requirements as [`d1`].
pub fn d2(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> Result<f64> {
    Ok(d1(s, k, t, r, sigma)? - sigma * t.sqrt())
}

/// Per-share intrinsic value at expiration.
pub(crate) fn intrinsic(option_type: OptionType, s: f64, k: f64) -> f64 {
    match option_type {
        OptionType::Call => (s - k).max(0.0),
        OptionType::Put => (k - s).max(0.0),
    }
}

/// Black-Scholes European option price.
///
/// Degrades gracefully at expiry: for `t <= 0` the intrinsic value is
/// returned instead of an error, so at-expiry evaluation stays on the
/// happy path.
///
/// # Errors
/// Returns [`StrategyError::InvalidInput`] for non-finite inputs or
/// non-positive `s`, `k`, or `sigma`.
///
/// # Examples
/// ```
/// use optstrat::pricing::black_scholes_price;
/// use optstrat::OptionType;
///
/// let call = black_scholes_price(100.0, 100.0, 1.0, 0.05, 0.20, OptionType::Call)?;
/// assert!(call > 10.0 && call < 11.0);
/// # Ok::<(), optstrat::StrategyError>(())
/// ```
pub fn black_scholes_price(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    option_type: OptionType,
) -> Result<f64> {
    validate_positive(s, "underlying price")?;
    validate_positive(k, "strike")?;
    validate_positive(sigma, "sigma")?;
    validate_finite(t, "t")?;
    validate_finite(r, "r")?;

    if t <= 0.0 {
        return Ok(intrinsic(option_type, s, k));
    }

    let d1 = d1(s, k, t, r, sigma)?;
    let d2 = d1 - sigma * t.sqrt();
    let df = (-r * t).exp();

    Ok(match option_type {
        OptionType::Call => s * norm_cdf(d1) - k * df * norm_cdf(d2),
        OptionType::Put => k * df * norm_cdf(-d2) - s * norm_cdf(-d1),
    })
}

/// Closed-form Black-Scholes Greeks.
///
/// At `t` at or below the expiry epsilon, returns a degenerate result with
/// delta snapped to the terminal hedge ratio (0 or ±1 by moneyness) and all
/// other sensitivities zero, rather than propagating a domain error from
/// the auxiliary terms.
///
/// # Errors
/// Returns [`StrategyError::InvalidInput`] for non-finite inputs or
/// non-positive `s`, `k`, or `sigma`.
pub fn greeks(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    option_type: OptionType,
) -> Result<Greeks> {
    validate_positive(s, "underlying price")?;
    validate_positive(k, "strike")?;
    validate_positive(sigma, "sigma")?;
    validate_finite(t, "t")?;
    validate_finite(r, "r")?;

    if t <= EXPIRY_EPSILON {
        let delta = match option_type {
            OptionType::Call => {
                if s > k {
                    1.0
                } else {
                    0.0
                }
            }
            OptionType::Put => {
                if s < k {
                    -1.0
                } else {
                    0.0
                }
            }
        };
        return Ok(Greeks {
            delta,
            ..Greeks::default()
        });
    }

    let d1 = d1(s, k, t, r, sigma)?;
    let d2 = d1 - sigma * t.sqrt();
    let sqrt_t = t.sqrt();
    let pdf_d1 = norm_pdf(d1);
    let df = (-r * t).exp();

    // Gamma and vega are identical for calls and puts.
    let gamma = pdf_d1 / (s * sigma * sqrt_t);
    let vega = s * pdf_d1 * sqrt_t / 100.0;

    let (delta, theta_annual, rho) = match option_type {
        OptionType::Call => (
            norm_cdf(d1),
            -s * pdf_d1 * sigma / (2.0 * sqrt_t) - r * k * df * norm_cdf(d2),
            k * t * df * norm_cdf(d2) / 100.0,
        ),
        OptionType::Put => (
            norm_cdf(d1) - 1.0,
            -s * pdf_d1 * sigma / (2.0 * sqrt_t) + r * k * df * norm_cdf(-d2),
            -k * t * df * norm_cdf(-d2) / 100.0,
        ),
    };

    Ok(Greeks {
        delta,
        gamma,
        theta: theta_annual / 365.0,
        vega,
        rho,
    })
}

/// Invert the Black-Scholes price for implied volatility.
///
/// Searches the bracket σ ∈ [0.001, 5.0] by bisection to a tolerance of
/// 1e-6 on σ.
///
/// Returns `Ok(None)` — "no solution", not an error — when:
/// - `t <= 0` or `market_price <= 0`,
/// - `market_price` is below intrinsic value (arbitrage violation),
/// - no root exists inside the bracket.
///
/// Callers must treat `None` as *unknown* volatility, never as zero.
///
/// # Errors
/// Returns [`StrategyError::InvalidInput`] for non-finite inputs or
/// non-positive `s`/`k`.
///
/// # Examples
/// ```
/// use optstrat::pricing::{black_scholes_price, implied_vol};
/// use optstrat::OptionType;
///
/// let price = black_scholes_price(100.0, 100.0, 0.25, 0.05, 0.30, OptionType::Call)?;
/// let iv = implied_vol(100.0, 100.0, 0.25, 0.05, price, OptionType::Call)?;
/// assert!((iv.unwrap() - 0.30).abs() < 1e-4);
/// # Ok::<(), optstrat::StrategyError>(())
/// ```
pub fn implied_vol(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    market_price: f64,
    option_type: OptionType,
) -> Result<Option<f64>> {
    validate_positive(s, "underlying price")?;
    validate_positive(k, "strike")?;
    validate_finite(t, "t")?;
    validate_finite(r, "r")?;
    validate_finite(market_price, "market_price")?;

    if t <= 0.0 || market_price <= 0.0 {
        return Ok(None);
    }
    if market_price < intrinsic(option_type, s, k) {
        // Price below intrinsic has no lognormal vol consistent with it.
        return Ok(None);
    }

    let objective = |sigma: f64| match black_scholes_price(s, k, t, r, sigma, option_type) {
        Ok(price) => price - market_price,
        Err(_) => f64::NAN,
    };

    Ok(bisect_root(
        objective, IV_BRACKET.0, IV_BRACKET.1, IV_XTOL, IV_MAX_ITER,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const S: f64 = 100.0;
    const K: f64 = 100.0;
    const R: f64 = 0.05;
    const SIGMA: f64 = 0.20;
    const T: f64 = 1.0;

    #[test]
    fn black_scholes_known_value() {
        // Hull Ch. 15 reference values for ATM 1y, r=5%, sigma=20%.
        let call = black_scholes_price(S, K, T, R, SIGMA, OptionType::Call).unwrap();
        assert_relative_eq!(call, 10.4506, epsilon = 2e-4);

        let put = black_scholes_price(S, K, T, R, SIGMA, OptionType::Put).unwrap();
        assert_relative_eq!(put, 5.5735, epsilon = 2e-4);
    }

    #[test]
    fn put_call_parity() {
        let s = 100.0;
        let k = 95.0;
        let r = 0.03;
        let sigma = 0.22;
        let t = 1.4;

        let c = black_scholes_price(s, k, t, r, sigma, OptionType::Call).unwrap();
        let p = black_scholes_price(s, k, t, r, sigma, OptionType::Put).unwrap();
        let rhs = s - k * (-r * t).exp();

        assert_relative_eq!(c - p, rhs, epsilon = 1e-9);
    }

    #[test]
    fn price_converges_to_intrinsic_near_expiry() {
        for (s, k) in [(110.0, 100.0), (90.0, 100.0), (100.0, 100.0)] {
            let mut t = 0.1;
            while t > 1e-9 {
                t *= 0.1;
                let call = black_scholes_price(s, k, t, R, SIGMA, OptionType::Call).unwrap();
                let put = black_scholes_price(s, k, t, R, SIGMA, OptionType::Put).unwrap();
                if t < 1e-6 {
                    assert_abs_diff_eq!(call, (s - k).max(0.0), epsilon = 1e-2);
                    assert_abs_diff_eq!(put, (k - s).max(0.0), epsilon = 1e-2);
                }
            }
        }
    }

    #[test]
    fn price_at_zero_t_is_intrinsic_exactly() {
        let call = black_scholes_price(110.0, 100.0, 0.0, R, SIGMA, OptionType::Call).unwrap();
        assert_eq!(call, 10.0);
        let put = black_scholes_price(110.0, 100.0, 0.0, R, SIGMA, OptionType::Put).unwrap();
        assert_eq!(put, 0.0);
    }

    #[test]
    fn price_rejects_bad_inputs() {
        assert!(black_scholes_price(0.0, K, T, R, SIGMA, OptionType::Call).is_err());
        assert!(black_scholes_price(S, -1.0, T, R, SIGMA, OptionType::Call).is_err());
        assert!(black_scholes_price(S, K, T, R, 0.0, OptionType::Call).is_err());
        assert!(black_scholes_price(S, K, f64::NAN, R, SIGMA, OptionType::Call).is_err());
    }

    #[test]
    fn d1_rejects_domain_violations() {
        assert!(matches!(
            d1(0.0, K, T, R, SIGMA),
            Err(StrategyError::NumericalError { .. })
        ));
        assert!(matches!(
            d1(S, K, -0.5, R, SIGMA),
            Err(StrategyError::NumericalError { .. })
        ));
        assert!(matches!(
            d1(S, K, T, R, -0.2),
            Err(StrategyError::NumericalError { .. })
        ));
    }

    #[test]
    fn d1_snaps_at_expiry() {
        assert_eq!(d1(110.0, 100.0, 0.0, R, SIGMA).unwrap(), f64::INFINITY);
        assert_eq!(d1(90.0, 100.0, 0.0, R, SIGMA).unwrap(), f64::NEG_INFINITY);
        assert_eq!(d1(100.0, 100.0, 0.0, R, SIGMA).unwrap(), 0.0);
    }

    #[test]
    fn d2_is_d1_minus_vol_sqrt_t() {
        let a = d1(S, K, T, R, SIGMA).unwrap();
        let b = d2(S, K, T, R, SIGMA).unwrap();
        assert_abs_diff_eq!(a - b, SIGMA * T.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn greeks_call_delta_in_unit_interval() {
        for k in [80.0, 90.0, 100.0, 110.0, 120.0] {
            let g = greeks(S, k, T, R, SIGMA, OptionType::Call).unwrap();
            assert!((0.0..=1.0).contains(&g.delta), "delta {}", g.delta);
            assert!(g.gamma >= 0.0);
            assert!(g.vega >= 0.0);
        }
    }

    #[test]
    fn greeks_put_delta_in_negative_unit_interval() {
        for k in [80.0, 90.0, 100.0, 110.0, 120.0] {
            let g = greeks(S, k, T, R, SIGMA, OptionType::Put).unwrap();
            assert!((-1.0..=0.0).contains(&g.delta), "delta {}", g.delta);
            assert!(g.gamma >= 0.0);
            assert!(g.vega >= 0.0);
        }
    }

    #[test]
    fn gamma_and_vega_same_for_call_and_put() {
        let c = greeks(S, 105.0, T, R, SIGMA, OptionType::Call).unwrap();
        let p = greeks(S, 105.0, T, R, SIGMA, OptionType::Put).unwrap();
        assert_abs_diff_eq!(c.gamma, p.gamma, epsilon = 1e-14);
        assert_abs_diff_eq!(c.vega, p.vega, epsilon = 1e-14);
    }

    #[test]
    fn greeks_consistent_with_finite_differences() {
        let ds = 1e-3;
        let g = greeks(S, K, T, R, SIGMA, OptionType::Call).unwrap();

        let p_up = black_scholes_price(S + ds, K, T, R, SIGMA, OptionType::Call).unwrap();
        let p_dn = black_scholes_price(S - ds, K, T, R, SIGMA, OptionType::Call).unwrap();
        let p_0 = black_scholes_price(S, K, T, R, SIGMA, OptionType::Call).unwrap();

        let delta_fd = (p_up - p_dn) / (2.0 * ds);
        let gamma_fd = (p_up - 2.0 * p_0 + p_dn) / (ds * ds);

        assert_relative_eq!(g.delta, delta_fd, epsilon = 1e-4);
        assert_relative_eq!(g.gamma, gamma_fd, epsilon = 1e-4);
    }

    #[test]
    fn theta_is_daily() {
        // Daily theta of a 1y ATM option is small and negative for a call.
        let g = greeks(S, K, T, R, SIGMA, OptionType::Call).unwrap();
        assert!(g.theta < 0.0);
        assert!(g.theta.abs() < 0.1, "theta {} should be per-day", g.theta);
    }

    #[test]
    fn greeks_at_expiry_snap_delta() {
        let itm_call = greeks(110.0, 100.0, 0.0, R, SIGMA, OptionType::Call).unwrap();
        assert_eq!(itm_call.delta, 1.0);
        assert_eq!(itm_call.gamma, 0.0);
        assert_eq!(itm_call.vega, 0.0);

        let otm_call = greeks(90.0, 100.0, 0.0, R, SIGMA, OptionType::Call).unwrap();
        assert_eq!(otm_call.delta, 0.0);

        let itm_put = greeks(90.0, 100.0, 0.0, R, SIGMA, OptionType::Put).unwrap();
        assert_eq!(itm_put.delta, -1.0);

        let otm_put = greeks(110.0, 100.0, 0.0, R, SIGMA, OptionType::Put).unwrap();
        assert_eq!(otm_put.delta, 0.0);
    }

    #[test]
    fn greeks_scale_and_add() {
        let g = greeks(S, K, T, R, SIGMA, OptionType::Call).unwrap();
        let doubled = g.scale(2.0);
        assert_abs_diff_eq!(doubled.delta, 2.0 * g.delta, epsilon = 1e-14);

        let sum = g + g.scale(-1.0);
        assert_abs_diff_eq!(sum.delta, 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(sum.vega, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn implied_vol_round_trip() {
        for sigma in [0.10, 0.25, 0.60, 1.50] {
            for (k, ty) in [
                (90.0, OptionType::Call),
                (100.0, OptionType::Call),
                (110.0, OptionType::Put),
            ] {
                let price = black_scholes_price(S, k, 0.25, R, sigma, ty).unwrap();
                let iv = implied_vol(S, k, 0.25, R, price, ty).unwrap().unwrap();
                assert_abs_diff_eq!(iv, sigma, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn implied_vol_none_for_arbitrage_violation() {
        // Deep ITM call priced below intrinsic value.
        let iv = implied_vol(120.0, 100.0, 0.5, R, 10.0, OptionType::Call).unwrap();
        assert!(iv.is_none());
    }

    #[test]
    fn implied_vol_none_for_expired_or_free_option() {
        assert!(implied_vol(S, K, 0.0, R, 5.0, OptionType::Call)
            .unwrap()
            .is_none());
        assert!(implied_vol(S, K, 0.5, R, 0.0, OptionType::Call)
            .unwrap()
            .is_none());
        assert!(implied_vol(S, K, 0.5, R, -1.0, OptionType::Call)
            .unwrap()
            .is_none());
    }

    #[test]
    fn implied_vol_none_outside_bracket() {
        // Price above the sigma = 5.0 upper-bracket price has no solution.
        let max_price = black_scholes_price(S, K, 0.25, R, 5.0, OptionType::Call).unwrap();
        let iv = implied_vol(S, K, 0.25, R, max_price * 1.05, OptionType::Call).unwrap();
        assert!(iv.is_none());
    }

    #[test]
    fn implied_vol_rejects_invalid_inputs() {
        assert!(implied_vol(-1.0, K, T, R, 5.0, OptionType::Call).is_err());
        assert!(implied_vol(S, K, T, R, f64::NAN, OptionType::Call).is_err());
    }

    #[test]
    fn greeks_serde_round_trip() {
        let g = greeks(S, K, T, R, SIGMA, OptionType::Call).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: Greeks = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }
}
