//! Multi-leg strategy aggregation and analysis.
//!
//! A [`Strategy`] is an ordered collection of [`OptionLeg`]s. Its expiration
//! payoff is the sum of the legs' payoffs; every other metric (breakevens,
//! max profit/loss, probability of profit) is derived from that function by
//! sampling or from the pricing kernel. [`analyze`](Strategy::analyze)
//! orchestrates everything and returns a single immutable
//! [`StrategyResult`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::leg::OptionLeg;
use crate::pop::{monte_carlo_pop, single_leg_pop, PopMethod};
use crate::pricing::Greeks;
use crate::validate::validate_positive;

/// Sample count for the exported P/L curve.
const CURVE_POINTS: usize = 500;

/// Sweep parameters for breakeven search: ±50% around spot, 5000 samples.
const BREAKEVEN_RANGE_PCT: f64 = 0.50;
const BREAKEVEN_POINTS: usize = 5000;

/// Sweep parameters for max profit/loss: ±100% around spot, 10000 samples.
const EXTREMA_RANGE_PCT: f64 = 1.0;
const EXTREMA_POINTS: usize = 10000;

/// Floor price for downside sampling; captures the total-wipeout payoff.
const PRICE_FLOOR: f64 = 0.01;

/// Tunable parameters for [`Strategy::analyze_with`].
///
/// Replaces ambient defaults with an explicit value passed at the call
/// site; [`Default`] gives the standard configuration.
///
/// # Examples
/// ```
/// use optstrat::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.num_simulations, 100_000);
/// assert_eq!(config.seed, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Monte Carlo path count for multi-leg probability of profit.
    pub num_simulations: usize,
    /// Fraction above/below spot covered by the exported P/L curve.
    pub price_range_pct: f64,
    /// RNG seed; a fixed seed makes Monte Carlo results reproducible.
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            num_simulations: 100_000,
            price_range_pct: 0.30,
            seed: 42,
        }
    }
}

/// Expiration P/L sampled over a price range: `prices[i]` pairs with
/// `pnl[i]` (total dollars).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlCurve {
    /// Sampled underlying prices, ascending.
    pub prices: Vec<f64>,
    /// Total dollar P/L at expiration for each sampled price.
    pub pnl: Vec<f64>,
}

/// Aggregated output of one strategy analysis.
///
/// Pure value object: constructed once by [`Strategy::analyze`], never
/// mutated. Dollar amounts include the quantity × 100 contract multiplier.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyResult {
    /// Strategy label.
    pub name: String,
    /// The analyzed legs.
    pub legs: Vec<OptionLeg>,
    /// Total premium in dollars: positive = net credit, negative = net debit.
    pub net_premium: f64,
    /// Largest sampled profit in dollars.
    pub max_profit: f64,
    /// Largest sampled loss in dollars (negative; `-inf` when the payoff is
    /// still declining at the edge of the sampled range).
    pub max_loss: f64,
    /// Underlying prices where expiration P/L crosses zero, ascending.
    pub breakeven_points: Vec<f64>,
    /// Probability of profit in [0, 1].
    pub pop: f64,
    /// How `pop` was estimated (analytic vs. Monte Carlo).
    pub pop_method: PopMethod,
    /// Net Greeks across legs, signed by direction and quantity.
    pub net_greeks: Greeks,
    /// Sampled expiration P/L curve around spot.
    pub pnl_curve: PnlCurve,
}

/// A multi-leg options strategy.
///
/// Build by adding [`OptionLeg`]s, then call [`analyze`](Self::analyze)
/// with the current underlying price. Analysis never mutates the strategy.
///
/// # Examples
/// ```
/// use optstrat::{OptionLeg, OptionType, Side, Strategy};
///
/// let strangle = Strategy::new("Short Strangle")
///     .with_leg(OptionLeg::new(95.0, OptionType::Put, Side::Short, 0.3, 30.0, 1.20, 1, 0.05)?)
///     .with_leg(OptionLeg::new(105.0, OptionType::Call, Side::Short, 0.3, 30.0, 1.10, 1, 0.05)?);
///
/// let result = strangle.analyze(100.0)?;
/// assert!(result.net_premium > 0.0); // credit received
/// assert!((0.0..=1.0).contains(&result.pop));
/// # Ok::<(), optstrat::StrategyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    name: String,
    legs: Vec<OptionLeg>,
}

impl Strategy {
    /// Create an empty strategy with the given label.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            legs: Vec::new(),
        }
    }

    /// Add a leg, consuming and returning the strategy for chaining.
    pub fn with_leg(mut self, leg: OptionLeg) -> Self {
        self.legs.push(leg);
        self
    }

    /// Add a leg in place.
    pub fn add_leg(&mut self, leg: OptionLeg) -> &mut Self {
        self.legs.push(leg);
        self
    }

    /// Strategy label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The legs in insertion order.
    pub fn legs(&self) -> &[OptionLeg] {
        &self.legs
    }

    /// Net premium per share: +premium for short legs, −premium for long.
    ///
    /// Positive means net credit received, negative means net debit paid.
    pub fn net_premium(&self) -> f64 {
        self.legs
            .iter()
            .map(|leg| -leg.side().sign() * leg.premium())
            .sum()
    }

    /// Net premium in total dollars, scaled by quantity × 100 per leg.
    pub fn net_premium_total(&self) -> f64 {
        self.legs
            .iter()
            .map(|leg| -leg.side().sign() * leg.premium() * f64::from(leg.quantity()) * 100.0)
            .sum()
    }

    /// Total dollar P/L at expiration for a given underlying price.
    ///
    /// This is the fundamental payoff function; curve, breakevens, and
    /// extrema are all derived from it. Zero legs means zero everywhere.
    pub fn pnl_at_expiry(&self, underlying_price: f64) -> f64 {
        self.legs
            .iter()
            .map(|leg| leg.total_pnl_at_expiry(underlying_price))
            .sum()
    }

    /// Sample the expiration P/L over `num_points` evenly spaced prices in
    /// `[spot·(1 − range_pct), spot·(1 + range_pct)]`.
    ///
    /// Intended for visualization and export; breakeven search uses its own
    /// finer sweep.
    pub fn pnl_curve(&self, spot: f64, range_pct: f64, num_points: usize) -> PnlCurve {
        let low = spot * (1.0 - range_pct);
        let high = spot * (1.0 + range_pct);
        let prices = linspace(low, high, num_points);
        let pnl = prices.iter().map(|&p| self.pnl_at_expiry(p)).collect();
        PnlCurve { prices, pnl }
    }

    /// Find breakeven prices, where expiration P/L crosses zero.
    ///
    /// Sweeps 5000 samples over ±50% around spot; see
    /// [`breakeven_points_with`](Self::breakeven_points_with) to widen the
    /// search for payoffs that cross zero far from spot.
    pub fn breakeven_points(&self, spot: f64) -> Vec<f64> {
        self.breakeven_points_with(spot, BREAKEVEN_RANGE_PCT, BREAKEVEN_POINTS)
    }

    /// Find breakeven prices over a caller-chosen sweep.
    ///
    /// Sweeps `num_points` samples over `spot · (1 ± range_pct)` (floored
    /// at 0.01) and linearly interpolates each sign change. Results are
    /// rounded to cents and returned in ascending order. Payoffs that never
    /// cross zero inside the range yield an empty list.
    pub fn breakeven_points_with(
        &self,
        spot: f64,
        range_pct: f64,
        num_points: usize,
    ) -> Vec<f64> {
        let low = (spot * (1.0 - range_pct)).max(PRICE_FLOOR);
        let high = spot * (1.0 + range_pct);
        let prices = linspace(low, high, num_points);
        let pnl: Vec<f64> = prices.iter().map(|&p| self.pnl_at_expiry(p)).collect();

        let mut breakevens = Vec::new();
        for i in 0..pnl.len().saturating_sub(1) {
            if pnl[i] * pnl[i + 1] < 0.0 {
                let p = prices[i]
                    - pnl[i] * (prices[i + 1] - prices[i]) / (pnl[i + 1] - pnl[i]);
                breakevens.push((p * 100.0).round() / 100.0);
            }
        }
        breakevens
    }

    /// Estimate max profit and max loss over a wide price range.
    ///
    /// Sweeps 10000 samples over ±100% around spot; see
    /// [`max_profit_loss_with`](Self::max_profit_loss_with) for a
    /// caller-chosen sweep.
    pub fn max_profit_loss(&self, spot: f64) -> (f64, f64) {
        self.max_profit_loss_with(spot, EXTREMA_RANGE_PCT, EXTREMA_POINTS)
    }

    /// Estimate max profit and max loss over a caller-chosen sweep.
    ///
    /// Samples `num_points` prices over `spot · (1 ± range_pct)` (floored
    /// at 0.01) plus an explicit sample at 0.01 for the total-wipeout
    /// payoff. Returns `(max_profit, max_loss)` in dollars, loss negative.
    ///
    /// If the payoff is still strictly decreasing and negative at the top
    /// of the range, max loss is reported as `-inf` — a heuristic flag for
    /// uncapped short-call exposure, not an analytic proof. Callers must
    /// not treat a finite max loss as a hard bound for strategies with
    /// naked short legs near the edge of the sweep.
    pub fn max_profit_loss_with(
        &self,
        spot: f64,
        range_pct: f64,
        num_points: usize,
    ) -> (f64, f64) {
        let low = (spot * (1.0 - range_pct)).max(PRICE_FLOOR);
        let high = spot * (1.0 + range_pct);
        let prices = linspace(low, high, num_points);
        let pnl: Vec<f64> = prices.iter().map(|&p| self.pnl_at_expiry(p)).collect();
        let pnl_at_floor = self.pnl_at_expiry(PRICE_FLOOR);

        let mut max_profit = pnl_at_floor;
        let mut max_loss = pnl_at_floor;
        for &v in &pnl {
            max_profit = max_profit.max(v);
            max_loss = max_loss.min(v);
        }

        if pnl.len() >= 2 {
            let last = pnl[pnl.len() - 1];
            if last < pnl[pnl.len() - 2] && last < 0.0 {
                max_loss = f64::NEG_INFINITY;
            }
        }

        (max_profit, max_loss)
    }

    /// Net Greeks at the given underlying price: each leg's per-share
    /// Greeks scaled by its signed quantity and summed componentwise.
    ///
    /// # Errors
    /// Propagates pricing-kernel validation errors (e.g., non-positive
    /// underlying price).
    pub fn net_greeks(&self, underlying_price: f64) -> Result<Greeks> {
        let mut net = Greeks::default();
        for leg in &self.legs {
            net += leg.greeks(underlying_price)?.scale(leg.signed_quantity());
        }
        Ok(net)
    }

    /// Run the full analysis with the default [`AnalysisConfig`].
    ///
    /// # Errors
    /// Returns [`StrategyError::InvalidInput`](crate::StrategyError::InvalidInput)
    /// if `underlying_price <= 0`.
    pub fn analyze(&self, underlying_price: f64) -> Result<StrategyResult> {
        self.analyze_with(underlying_price, &AnalysisConfig::default())
    }

    /// Run the full analysis: P/L curve, breakevens, max profit/loss, net
    /// Greeks, and probability of profit.
    ///
    /// POP dispatch is by leg count: exactly one leg uses the analytic
    /// lognormal estimator, anything else uses seeded Monte Carlo (a
    /// zero-leg strategy therefore reports POP 0.0 with
    /// [`PopMethod::MonteCarlo`]).
    ///
    /// # Errors
    /// Returns [`StrategyError::InvalidInput`](crate::StrategyError::InvalidInput)
    /// if `underlying_price <= 0`; propagates pricing-kernel errors.
    pub fn analyze_with(
        &self,
        underlying_price: f64,
        config: &AnalysisConfig,
    ) -> Result<StrategyResult> {
        validate_positive(underlying_price, "underlying_price")?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            strategy = %self.name,
            legs = self.legs.len(),
            underlying_price,
            "strategy analysis started"
        );

        let pnl_curve = self.pnl_curve(underlying_price, config.price_range_pct, CURVE_POINTS);
        let breakeven_points = self.breakeven_points(underlying_price);
        let (max_profit, max_loss) = self.max_profit_loss(underlying_price);
        let net_greeks = self.net_greeks(underlying_price)?;

        let pop_method = PopMethod::for_leg_count(self.legs.len());
        let pop = match pop_method {
            PopMethod::Analytic => single_leg_pop(&self.legs[0], underlying_price),
            PopMethod::MonteCarlo => monte_carlo_pop(self, underlying_price, config),
        };

        #[cfg(feature = "logging")]
        tracing::debug!(
            strategy = %self.name,
            pop,
            max_profit,
            max_loss,
            "strategy analysis complete"
        );

        Ok(StrategyResult {
            name: self.name.clone(),
            legs: self.legs.clone(),
            net_premium: self.net_premium_total(),
            max_profit,
            max_loss,
            breakeven_points,
            pop,
            pop_method,
            net_greeks,
            pnl_curve,
        })
    }
}

/// `num` evenly spaced samples over `[low, high]`, endpoints included.
fn linspace(low: f64, high: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (num - 1) as f64;
            (0..num).map(|i| low + step * i as f64).collect()
        }
    }
}
