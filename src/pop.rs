//! Probability-of-profit estimation.
//!
//! Two estimators, selected by leg count:
//!
//! - **Analytic** (single leg): the breakeven is algebraic (`K ± premium`),
//!   so the profit probability is a lognormal tail probability under GBM
//!   with drift `(r − σ²/2)T`. Exact for one leg; real-world drift is
//!   approximated by the risk-free rate.
//! - **Monte Carlo** (multi-leg): combined payoffs generally have no closed
//!   form, so terminal prices are simulated and the strategy payoff is
//!   evaluated per path. Seeded for reproducibility.
//!
//! A path-based *touch* estimator is also provided for range strategies
//! where an early breach of either breakeven matters, not just the terminal
//! price.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::conventions::{CONTRACT_MULTIPLIER, DAYS_PER_YEAR, TRADING_DAYS_PER_YEAR};
use crate::leg::OptionLeg;
use crate::math::norm_cdf;
use crate::strategy::{AnalysisConfig, Strategy};
use crate::types::{OptionType, Side};

/// How a probability of profit was estimated.
///
/// The dispatch key is simply the leg count: exactly one leg admits the
/// analytic estimator, everything else is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopMethod {
    /// Closed-form lognormal tail probability (single leg).
    Analytic,
    /// Seeded GBM terminal-price simulation (multi-leg or empty).
    MonteCarlo,
}

impl PopMethod {
    /// Select the estimator for a strategy with `leg_count` legs.
    pub fn for_leg_count(leg_count: usize) -> PopMethod {
        if leg_count == 1 {
            PopMethod::Analytic
        } else {
            PopMethod::MonteCarlo
        }
    }
}

/// Analytic probability of profit for a single leg.
///
/// The breakeven is `K + premium` for calls and `K − premium` for puts;
/// profit direction flips with the side. The probability of the terminal
/// price ending beyond the breakeven is evaluated under lognormal GBM:
///
/// ```text
/// P(S_T > be) = Φ( [ln(S/be) + (r − σ²/2)T] / (σ√T) )
/// ```
///
/// Edge cases: at `T <= 0` returns 1.0 or 0.0 by realized P/L; a breakeven
/// at or below zero means certain profit for a short leg (premium can never
/// be fully given back) and certain loss for a long one.
pub fn single_leg_pop(leg: &OptionLeg, underlying_price: f64) -> f64 {
    let t = leg.years_to_expiry();
    if t <= 0.0 {
        return if leg.pnl_at_expiry(underlying_price) > 0.0 {
            1.0
        } else {
            0.0
        };
    }

    let breakeven = match leg.option_type() {
        OptionType::Call => leg.strike() + leg.premium(),
        OptionType::Put => leg.strike() - leg.premium(),
    };

    if breakeven <= 0.0 {
        return match leg.side() {
            Side::Short => 1.0,
            Side::Long => 0.0,
        };
    }

    let sigma = leg.iv();
    let drift = (leg.risk_free_rate() - 0.5 * sigma * sigma) * t;
    let z = ((underlying_price / breakeven).ln() + drift) / (sigma * t.sqrt());
    let prob_above = norm_cdf(z);

    match (leg.option_type(), leg.side()) {
        (OptionType::Call, Side::Long) => prob_above,
        (OptionType::Call, Side::Short) => 1.0 - prob_above,
        (OptionType::Put, Side::Long) => 1.0 - prob_above,
        (OptionType::Put, Side::Short) => prob_above,
    }
}

/// Monte Carlo probability of profit for a multi-leg strategy.
///
/// Simulates `config.num_simulations` terminal prices with one-step GBM
/// and counts the fraction of paths whose total strategy payoff is
/// positive. Deterministic for a fixed `config.seed`.
///
/// Legs at different expiries are approximated by terminating every leg at
/// the *shortest* expiry (floored at one day) with the quantity-weighted
/// average IV and the first leg's risk-free rate; accuracy is unverified
/// for calendar-spread-like structures.
///
/// A strategy with no legs returns 0.0.
pub fn monte_carlo_pop(strategy: &Strategy, underlying_price: f64, config: &AnalysisConfig) -> f64 {
    let legs = strategy.legs();
    if legs.is_empty() || config.num_simulations == 0 {
        return 0.0;
    }

    let min_t = legs
        .iter()
        .map(OptionLeg::years_to_expiry)
        .fold(f64::INFINITY, f64::min)
        .max(1.0 / DAYS_PER_YEAR);

    let total_qty: f64 = legs.iter().map(|l| f64::from(l.quantity())).sum();
    let avg_iv: f64 = legs
        .iter()
        .map(|l| l.iv() * f64::from(l.quantity()))
        .sum::<f64>()
        / total_qty;
    let r = legs[0].risk_free_rate();

    #[cfg(feature = "logging")]
    tracing::debug!(
        num_simulations = config.num_simulations,
        min_t,
        avg_iv,
        "monte carlo pop started"
    );

    let drift = (r - 0.5 * avg_iv * avg_iv) * min_t;
    let diffusion = avg_iv * min_t.sqrt();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut profitable = 0usize;
    for _ in 0..config.num_simulations {
        let z: f64 = StandardNormal.sample(&mut rng);
        let terminal = underlying_price * (drift + diffusion * z).exp();

        let mut pnl = 0.0;
        for leg in legs {
            let intrinsic = match leg.option_type() {
                OptionType::Call => (terminal - leg.strike()).max(0.0),
                OptionType::Put => (leg.strike() - terminal).max(0.0),
            };
            let per_share = match leg.side() {
                Side::Long => intrinsic - leg.premium(),
                Side::Short => leg.premium() - intrinsic,
            };
            pnl += per_share * f64::from(leg.quantity()) * CONTRACT_MULTIPLIER;
        }
        if pnl > 0.0 {
            profitable += 1;
        }
    }

    profitable as f64 / config.num_simulations as f64
}

/// Path-based "touch" probability of profit for a range strategy.
///
/// Simulates full GBM price paths (one step per trading day) between two
/// breakeven bounds and counts the paths that never touch either bound.
/// This is stricter than the terminal-price estimators: an early breach
/// counts as a loss even if the price later returns inside the range,
/// which is how range trades like iron condors are commonly managed.
///
/// Degenerate inputs (`t <= 0`, `sigma <= 0`, `spot <= 0`, or an inverted
/// range) return 0.5 — an explicit "no information" value, matching the
/// terminal estimators' treatment of unusable inputs. Bounds are clamped
/// to `[0.5·spot, 2.0·spot]` before simulation.
pub fn monte_carlo_touch_pop(
    spot: f64,
    lower_breakeven: f64,
    upper_breakeven: f64,
    t: f64,
    sigma: f64,
    r: f64,
    config: &AnalysisConfig,
) -> f64 {
    if t <= 0.0 || sigma <= 0.0 || spot <= 0.0 || lower_breakeven >= upper_breakeven {
        return 0.5;
    }
    if config.num_simulations == 0 {
        return 0.5;
    }

    let lower = lower_breakeven.max(spot * 0.5);
    let upper = upper_breakeven.min(spot * 2.0);

    let n_steps = ((t * TRADING_DAYS_PER_YEAR) as usize).max(1);
    let dt = t / n_steps as f64;
    let drift = (r - 0.5 * sigma * sigma) * dt;
    let diffusion = sigma * dt.sqrt();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut untouched = 0usize;
    for _ in 0..config.num_simulations {
        let mut price = spot;
        let mut in_bounds = true;
        for _ in 0..n_steps {
            let z: f64 = StandardNormal.sample(&mut rng);
            price *= (drift + diffusion * z).exp();
            if price <= lower || price >= upper {
                in_bounds = false;
                break;
            }
        }
        if in_bounds {
            untouched += 1;
        }
    }

    untouched as f64 / config.num_simulations as f64
}
