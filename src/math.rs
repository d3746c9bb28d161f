//! Internal numerical utilities: standard normal distribution functions and
//! a bracketed root finder for implied volatility inversion.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Standard normal cumulative distribution function Φ(x).
pub(crate) fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Standard normal probability density function φ(x).
pub(crate) fn norm_pdf(x: f64) -> f64 {
    Normal::standard().pdf(x)
}

/// Find a root of `f` in `[lo, hi]` by bisection.
///
/// Returns `None` if the bracket does not straddle a sign change or if the
/// iteration cap is reached before the interval shrinks below `xtol`.
/// Bisection is slower than Newton but cannot diverge, which matters when
/// inverting prices near the no-arbitrage boundary.
pub(crate) fn bisect_root<F>(f: F, lo: f64, hi: f64, xtol: f64, max_iter: usize) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let f_lo = f(lo);
    let f_hi = f(hi);
    if !f_lo.is_finite() || !f_hi.is_finite() {
        return None;
    }
    if f_lo == 0.0 {
        return Some(lo);
    }
    if f_hi == 0.0 {
        return Some(hi);
    }
    if f_lo * f_hi > 0.0 {
        return None;
    }

    let (mut a, mut b) = (lo, hi);
    let mut f_a = f_lo;
    for _ in 0..max_iter {
        let mid = 0.5 * (a + b);
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            return None;
        }
        if f_mid == 0.0 || (b - a) < xtol {
            return Some(mid);
        }
        if f_a * f_mid < 0.0 {
            b = mid;
        } else {
            a = mid;
            f_a = f_mid;
        }
    }
    None
}
