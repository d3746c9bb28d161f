//! A single option contract position.
//!
//! [`OptionLeg`] is the atomic building block of a strategy: one strike, one
//! expiry, one direction. Legs are validated at construction and immutable
//! thereafter; every analysis metric of a [`Strategy`](crate::Strategy) is
//! derived from its legs' payoff functions.

use serde::{Deserialize, Serialize};

use crate::conventions::{years_from_days, CONTRACT_MULTIPLIER};
use crate::error::{Result, StrategyError};
use crate::pricing::{greeks, Greeks};
use crate::types::{OptionType, Side};
use crate::validate::{validate_finite, validate_non_negative, validate_positive, validate_quantity};

/// Default annualized risk-free rate when the caller has no better estimate.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

/// One option contract position within a strategy.
///
/// Premium is stored as a magnitude; [`Side`] determines the cash-flow
/// direction. One contract covers 100 shares.
///
/// # Invariants
/// Enforced at construction (and on deserialization):
/// - `strike > 0`
/// - `iv > 0`
/// - `days_to_expiry > 0`
/// - `premium >= 0`
/// - `quantity >= 1`
///
/// # Examples
/// ```
/// use optstrat::{OptionLeg, OptionType, Side};
///
/// let leg = OptionLeg::new(100.0, OptionType::Call, Side::Long, 0.25, 30.0, 2.50, 1, 0.05)?;
/// assert_eq!(leg.strike(), 100.0);
/// // Long call bought for $2.50: breakeven at expiry is $102.50.
/// assert_eq!(leg.pnl_at_expiry(102.50), 0.0);
/// # Ok::<(), optstrat::StrategyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionLegRaw", into = "OptionLegRaw")]
pub struct OptionLeg {
    strike: f64,
    option_type: OptionType,
    side: Side,
    iv: f64,
    days_to_expiry: f64,
    premium: f64,
    quantity: u32,
    risk_free_rate: f64,
}

#[derive(Serialize, Deserialize)]
struct OptionLegRaw {
    strike: f64,
    option_type: OptionType,
    side: Side,
    iv: f64,
    days_to_expiry: f64,
    premium: f64,
    quantity: u32,
    risk_free_rate: f64,
}

impl TryFrom<OptionLegRaw> for OptionLeg {
    type Error = StrategyError;
    fn try_from(raw: OptionLegRaw) -> Result<Self> {
        Self::new(
            raw.strike,
            raw.option_type,
            raw.side,
            raw.iv,
            raw.days_to_expiry,
            raw.premium,
            raw.quantity,
            raw.risk_free_rate,
        )
    }
}

impl From<OptionLeg> for OptionLegRaw {
    fn from(leg: OptionLeg) -> Self {
        Self {
            strike: leg.strike,
            option_type: leg.option_type,
            side: leg.side,
            iv: leg.iv,
            days_to_expiry: leg.days_to_expiry,
            premium: leg.premium,
            quantity: leg.quantity,
            risk_free_rate: leg.risk_free_rate,
        }
    }
}

impl OptionLeg {
    /// Create a validated option leg.
    ///
    /// # Arguments
    /// * `strike` — exercise price, must be > 0
    /// * `option_type` — call or put
    /// * `side` — long (bought) or short (written)
    /// * `iv` — annualized implied volatility as a decimal, must be > 0
    /// * `days_to_expiry` — calendar days until expiration, must be > 0
    /// * `premium` — per-share premium magnitude, must be >= 0
    /// * `quantity` — contract count, must be >= 1
    /// * `risk_free_rate` — annualized continuously-compounded rate
    ///
    /// # Errors
    /// Returns [`StrategyError::InvalidInput`] naming the offending field.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        strike: f64,
        option_type: OptionType,
        side: Side,
        iv: f64,
        days_to_expiry: f64,
        premium: f64,
        quantity: u32,
        risk_free_rate: f64,
    ) -> Result<Self> {
        validate_positive(strike, "strike")?;
        validate_positive(iv, "iv")?;
        validate_positive(days_to_expiry, "days_to_expiry")?;
        validate_non_negative(premium, "premium")?;
        validate_quantity(quantity, "quantity")?;
        validate_finite(risk_free_rate, "risk_free_rate")?;

        Ok(Self {
            strike,
            option_type,
            side,
            iv,
            days_to_expiry,
            premium,
            quantity,
            risk_free_rate,
        })
    }

    /// Exercise price.
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Long or short.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Annualized implied volatility (decimal).
    pub fn iv(&self) -> f64 {
        self.iv
    }

    /// Calendar days until expiration.
    pub fn days_to_expiry(&self) -> f64 {
        self.days_to_expiry
    }

    /// Per-share premium magnitude.
    pub fn premium(&self) -> f64 {
        self.premium
    }

    /// Contract count.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Annualized risk-free rate (decimal).
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Time to expiry in years: `days_to_expiry / 365`.
    pub fn years_to_expiry(&self) -> f64 {
        years_from_days(self.days_to_expiry)
    }

    /// Contract count signed by direction: `+quantity` long, `−quantity` short.
    pub fn signed_quantity(&self) -> f64 {
        self.side.sign() * f64::from(self.quantity)
    }

    /// Per-share intrinsic value at expiration for a given underlying price.
    pub fn intrinsic_at_expiry(&self, underlying_price: f64) -> f64 {
        match self.option_type {
            OptionType::Call => (underlying_price - self.strike).max(0.0),
            OptionType::Put => (self.strike - underlying_price).max(0.0),
        }
    }

    /// Per-share P/L at expiration, accounting for direction.
    ///
    /// Long: intrinsic − premium. Short: premium − intrinsic.
    pub fn pnl_at_expiry(&self, underlying_price: f64) -> f64 {
        let intrinsic = self.intrinsic_at_expiry(underlying_price);
        match self.side {
            Side::Long => intrinsic - self.premium,
            Side::Short => self.premium - intrinsic,
        }
    }

    /// Total dollar P/L at expiration: per-share P/L × quantity × 100.
    pub fn total_pnl_at_expiry(&self, underlying_price: f64) -> f64 {
        self.pnl_at_expiry(underlying_price) * f64::from(self.quantity) * CONTRACT_MULTIPLIER
    }

    /// Black-Scholes Greeks for this leg at the given underlying price.
    ///
    /// Per-share, unsigned by direction or quantity; strategy-level
    /// aggregation applies [`signed_quantity`](Self::signed_quantity).
    pub fn greeks(&self, underlying_price: f64) -> Result<Greeks> {
        greeks(
            underlying_price,
            self.strike,
            self.years_to_expiry(),
            self.risk_free_rate,
            self.iv,
            self.option_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn long_call() -> OptionLeg {
        OptionLeg::new(
            100.0,
            OptionType::Call,
            Side::Long,
            0.30,
            30.0,
            3.50,
            1,
            DEFAULT_RISK_FREE_RATE,
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_zero_strike() {
        let r = OptionLeg::new(0.0, OptionType::Call, Side::Long, 0.3, 30.0, 1.0, 1, 0.05);
        let err = r.unwrap_err();
        assert!(matches!(err, StrategyError::InvalidInput { .. }));
        assert!(format!("{err}").contains("strike"));
    }

    #[test]
    fn new_rejects_negative_iv() {
        let r = OptionLeg::new(100.0, OptionType::Call, Side::Long, -0.1, 30.0, 1.0, 1, 0.05);
        let err = r.unwrap_err();
        assert!(format!("{err}").contains("iv"));
    }

    #[test]
    fn new_rejects_zero_dte() {
        let r = OptionLeg::new(100.0, OptionType::Call, Side::Long, 0.3, 0.0, 1.0, 1, 0.05);
        let err = r.unwrap_err();
        assert!(format!("{err}").contains("days_to_expiry"));
    }

    #[test]
    fn new_rejects_negative_premium() {
        let r = OptionLeg::new(100.0, OptionType::Call, Side::Long, 0.3, 30.0, -1.0, 1, 0.05);
        let err = r.unwrap_err();
        assert!(format!("{err}").contains("premium"));
    }

    #[test]
    fn new_allows_zero_premium() {
        let r = OptionLeg::new(100.0, OptionType::Call, Side::Long, 0.3, 30.0, 0.0, 1, 0.05);
        assert!(r.is_ok());
    }

    #[test]
    fn new_rejects_zero_quantity() {
        let r = OptionLeg::new(100.0, OptionType::Call, Side::Long, 0.3, 30.0, 1.0, 0, 0.05);
        let err = r.unwrap_err();
        assert!(format!("{err}").contains("quantity"));
    }

    #[test]
    fn new_rejects_nan_rate() {
        let r = OptionLeg::new(
            100.0,
            OptionType::Call,
            Side::Long,
            0.3,
            30.0,
            1.0,
            1,
            f64::NAN,
        );
        assert!(r.is_err());
    }

    #[test]
    fn years_to_expiry_conversion() {
        let leg = long_call();
        assert_abs_diff_eq!(leg.years_to_expiry(), 30.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn call_intrinsic() {
        let leg = long_call();
        assert_eq!(leg.intrinsic_at_expiry(110.0), 10.0);
        assert_eq!(leg.intrinsic_at_expiry(90.0), 0.0);
        assert_eq!(leg.intrinsic_at_expiry(100.0), 0.0);
    }

    #[test]
    fn put_intrinsic() {
        let leg = OptionLeg::new(100.0, OptionType::Put, Side::Long, 0.3, 30.0, 2.0, 1, 0.05)
            .unwrap();
        assert_eq!(leg.intrinsic_at_expiry(90.0), 10.0);
        assert_eq!(leg.intrinsic_at_expiry(110.0), 0.0);
    }

    #[test]
    fn long_pnl_subtracts_premium() {
        let leg = long_call();
        assert_abs_diff_eq!(leg.pnl_at_expiry(110.0), 10.0 - 3.50, epsilon = 1e-12);
        assert_abs_diff_eq!(leg.pnl_at_expiry(90.0), -3.50, epsilon = 1e-12);
    }

    #[test]
    fn short_pnl_mirrors_long() {
        let long = long_call();
        let short = OptionLeg::new(
            100.0,
            OptionType::Call,
            Side::Short,
            0.30,
            30.0,
            3.50,
            1,
            DEFAULT_RISK_FREE_RATE,
        )
        .unwrap();
        for s in [80.0, 95.0, 100.0, 105.0, 120.0] {
            assert_abs_diff_eq!(
                long.pnl_at_expiry(s),
                -short.pnl_at_expiry(s),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn total_pnl_applies_contract_multiplier() {
        let leg = OptionLeg::new(100.0, OptionType::Call, Side::Long, 0.3, 30.0, 3.50, 3, 0.05)
            .unwrap();
        assert_abs_diff_eq!(
            leg.total_pnl_at_expiry(110.0),
            (10.0 - 3.50) * 3.0 * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn signed_quantity_by_side() {
        let leg = OptionLeg::new(100.0, OptionType::Put, Side::Short, 0.3, 30.0, 1.0, 2, 0.05)
            .unwrap();
        assert_eq!(leg.signed_quantity(), -2.0);
        assert_eq!(long_call().signed_quantity(), 1.0);
    }

    #[test]
    fn leg_greeks_match_kernel() {
        let leg = long_call();
        let g = leg.greeks(100.0).unwrap();
        let expected = crate::pricing::greeks(
            100.0,
            100.0,
            30.0 / 365.0,
            DEFAULT_RISK_FREE_RATE,
            0.30,
            OptionType::Call,
        )
        .unwrap();
        assert_eq!(g, expected);
    }

    #[test]
    fn serde_round_trip() {
        let leg = long_call();
        let json = serde_json::to_string(&leg).unwrap();
        let back: OptionLeg = serde_json::from_str(&json).unwrap();
        assert_eq!(leg, back);
    }

    #[test]
    fn serde_rejects_invalid_payload() {
        let json = r#"{"strike":-100.0,"option_type":"Call","side":"Long","iv":0.3,"days_to_expiry":30.0,"premium":1.0,"quantity":1,"risk_free_rate":0.05}"#;
        assert!(serde_json::from_str::<OptionLeg>(json).is_err());

        let json = r#"{"strike":100.0,"option_type":"Put","side":"Short","iv":0.3,"days_to_expiry":30.0,"premium":1.0,"quantity":0,"risk_free_rate":0.05}"#;
        assert!(serde_json::from_str::<OptionLeg>(json).is_err());
    }
}
