//! Error types for the optstrat library.
//!
//! All fallible operations return `Result<T, StrategyError>` rather than
//! panicking, providing meaningful diagnostics for invalid inputs, malformed
//! strategy shapes, and numerical issues.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, StrategyError>;

/// Errors that can occur during strategy construction and analysis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrategyError {
    /// Input data is invalid (e.g., non-positive strike, negative premium,
    /// zero quantity, non-positive underlying price).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Strikes supplied to a strategy factory violate the required ordering
    /// for that shape.
    #[error("invalid strikes for {strategy}: {message}")]
    InvalidStrikes {
        message: String,
        /// Strategy shape that rejected the strikes (e.g., "iron condor").
        strategy: &'static str,
    },

    /// Numerical computation failed (e.g., Black-Scholes domain violation).
    #[error("numerical error: {message}")]
    NumericalError { message: String },
}
