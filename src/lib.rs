//! # optstrat
//!
//! Options strategy analytics: Black-Scholes pricing, multi-leg P/L
//! aggregation, and probability-of-profit estimation.
//!
//! Provides the full pipeline: validated option legs → strategy assembly →
//! expiry P/L curve, breakevens, and profit bounds → analytic or Monte Carlo
//! probability of profit → a single immutable [`StrategyResult`].
//!
//! ## Architecture
//!
//! - **`pricing`** — Black-Scholes kernel: price, Greeks, implied volatility
//! - **`leg`** / **`strategy`** — [`OptionLeg`] building block and the
//!   [`Strategy`] aggregator with its analysis entry points
//! - **`pop`** — probability-of-profit estimators (analytic, Monte Carlo,
//!   path-based touch)
//! - **`factory`** — validated constructors for common spreads
//! - **`sizing`** / **`volstats`** — trade expectancy, Kelly sizing, and
//!   descriptive volatility statistics
//!
//! ## Design
//!
//! - **No panics.** Every fallible operation returns [`Result`]. Library code
//!   never calls `unwrap()` or `expect()`.
//! - **Immutable results.** [`StrategyResult`] is computed once by
//!   [`Strategy::analyze`] and never mutated afterwards.
//! - **Deterministic simulation.** Monte Carlo estimators take an explicit
//!   [`AnalysisConfig`] with a seed (default 42); the same inputs always
//!   produce the same estimate.
//! - **Serializable.** Value types implement Serde `Serialize` /
//!   `Deserialize`, with [`OptionLeg`] re-validating its invariants on
//!   deserialization.
//!
//! ## Example
//!
//! ```
//! use optstrat::factory::{bull_call_spread, LegTerms, Quote};
//!
//! let spread = bull_call_spread(
//!     Quote::new(95.0, 7.0),
//!     Quote::new(105.0, 2.0),
//!     LegTerms::new(0.25, 30.0),
//! )?;
//! let result = spread.analyze(100.0)?;
//!
//! assert_eq!(result.breakeven_points, vec![100.0]);
//! assert!(result.pop > 0.0 && result.pop < 1.0);
//! # Ok::<(), optstrat::StrategyError>(())
//! ```

pub mod conventions;
pub mod error;
pub mod factory;
pub mod leg;
mod math;
pub mod pop;
pub mod pricing;
pub mod sizing;
pub mod strategy;
pub mod types;
mod validate;
pub mod volstats;

#[doc(inline)]
pub use error::{Result, StrategyError};
#[doc(inline)]
pub use leg::OptionLeg;
#[doc(inline)]
pub use pop::PopMethod;
#[doc(inline)]
pub use pricing::Greeks;
#[doc(inline)]
pub use strategy::{AnalysisConfig, PnlCurve, Strategy, StrategyResult};
#[doc(inline)]
pub use types::{OptionType, Side};
