//! Trade-level expectancy and position sizing.
//!
//! These are portfolio-side helpers that consume the outputs of a strategy
//! analysis (probability of profit, max profit, max loss) rather than raw
//! option inputs. Amounts are in currency units; `max_loss` and
//! `loss_amount` are positive magnitudes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};

/// Half-Kelly output, capped.
const KELLY_FRACTION_CAP: f64 = 0.25;

/// Kelly criterion sizing for a single trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KellyResult {
    /// Full Kelly fraction. May be negative for negative-edge trades.
    pub raw_fraction: f64,
    /// Half-Kelly, clamped to `[0, 0.25]`. The figure to actually size with.
    pub adjusted_fraction: f64,
    /// Expected value per unit of risk.
    pub edge: f64,
    /// Expected value in currency units.
    pub expected_value: f64,
}

/// Expected value of a trade: `pop · max_profit − (1 − pop) · max_loss`.
///
/// `max_loss` is a positive magnitude. Non-finite inputs return 0.0 and
/// `pop` is clamped to `[0, 1]`, so an unbounded-loss strategy (whose max
/// loss is reported as infinite) yields a neutral 0.0 rather than `-inf`.
pub fn expected_value(pop: f64, max_profit: f64, max_loss: f64) -> f64 {
    if !(pop.is_finite() && max_profit.is_finite() && max_loss.is_finite()) {
        return 0.0;
    }
    let pop = pop.clamp(0.0, 1.0);
    pop * max_profit - (1.0 - pop) * max_loss
}

/// Kelly criterion with half-Kelly sizing.
///
/// `win_amount` and `loss_amount` must be positive and `pop` in `[0, 1]`;
/// anything else is an [`StrategyError::InvalidInput`]. The raw fraction is
/// `(p·b − q) / b` with `b = win/loss` odds; the adjusted fraction halves it
/// and clamps to `[0, 0.25]`.
///
/// ```
/// use optstrat::sizing::kelly_criterion;
///
/// let k = kelly_criterion(0.6, 100.0, 100.0).unwrap();
/// assert!(k.raw_fraction > 0.0);
/// assert!(k.adjusted_fraction <= 0.25);
/// ```
pub fn kelly_criterion(pop: f64, win_amount: f64, loss_amount: f64) -> Result<KellyResult> {
    if !pop.is_finite() || !(0.0..=1.0).contains(&pop) {
        return Err(StrategyError::InvalidInput {
            message: format!("pop must be in [0, 1], got {pop}"),
        });
    }
    if !win_amount.is_finite() || win_amount <= 0.0 {
        return Err(StrategyError::InvalidInput {
            message: format!("win_amount must be positive, got {win_amount}"),
        });
    }
    if !loss_amount.is_finite() || loss_amount <= 0.0 {
        return Err(StrategyError::InvalidInput {
            message: format!("loss_amount must be positive, got {loss_amount}"),
        });
    }

    let loss_prob = 1.0 - pop;
    let odds = win_amount / loss_amount;
    let raw_fraction = (pop * odds - loss_prob) / odds;

    let ev = pop * win_amount - loss_prob * loss_amount;
    let edge = ev / loss_amount;

    let adjusted_fraction = (raw_fraction * 0.5).clamp(0.0, KELLY_FRACTION_CAP);

    Ok(KellyResult {
        raw_fraction,
        adjusted_fraction,
        edge,
        expected_value: ev,
    })
}

/// Expected value per dollar of risk, optionally annualized.
///
/// Returns 0.0 when `max_loss <= 0` (nothing at risk means the ratio is
/// undefined, not infinite).
pub fn risk_adjusted_return(ev: f64, max_loss: f64, annualize_factor: f64) -> f64 {
    if max_loss <= 0.0 {
        return 0.0;
    }
    (ev / max_loss) * annualize_factor
}
