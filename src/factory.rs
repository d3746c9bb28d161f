//! Constructors for common multi-leg strategies.
//!
//! Each factory validates strike ordering up front and fails with
//! [`StrategyError::InvalidStrikes`] rather than silently reordering the
//! legs. All legs share the same expiry, volatility, and rate, supplied
//! through [`LegTerms`]; per-strike market prices come in as [`Quote`]s.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};
use crate::leg::{OptionLeg, DEFAULT_RISK_FREE_RATE};
use crate::strategy::Strategy;
use crate::types::{OptionType, Side};

/// A strike together with its market premium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub strike: f64,
    pub premium: f64,
}

impl Quote {
    pub fn new(strike: f64, premium: f64) -> Quote {
        Quote { strike, premium }
    }
}

/// Terms shared by every leg of a factory-built strategy.
///
/// ```
/// use optstrat::factory::LegTerms;
///
/// let terms = LegTerms::new(0.25, 30.0).with_quantity(2);
/// assert_eq!(terms.risk_free_rate, 0.05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegTerms {
    /// Implied volatility as a decimal.
    pub iv: f64,
    /// Calendar days to expiration.
    pub days_to_expiry: f64,
    /// Annualized risk-free rate as a decimal.
    pub risk_free_rate: f64,
    /// Contracts per leg (butterfly middle legs are doubled internally).
    pub quantity: u32,
}

impl LegTerms {
    /// Terms with the default risk-free rate and a quantity of one.
    pub fn new(iv: f64, days_to_expiry: f64) -> LegTerms {
        LegTerms {
            iv,
            days_to_expiry,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            quantity: 1,
        }
    }

    pub fn with_rate(mut self, risk_free_rate: f64) -> LegTerms {
        self.risk_free_rate = risk_free_rate;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> LegTerms {
        self.quantity = quantity;
        self
    }

    fn leg(&self, quote: Quote, ty: OptionType, side: Side, quantity: u32) -> Result<OptionLeg> {
        OptionLeg::new(
            quote.strike,
            ty,
            side,
            self.iv,
            self.days_to_expiry,
            quote.premium,
            quantity,
            self.risk_free_rate,
        )
    }
}

fn invalid_strikes(strategy: &'static str, message: impl Into<String>) -> StrategyError {
    StrategyError::InvalidStrikes {
        message: message.into(),
        strategy,
    }
}

/// Bull call spread: buy the lower-strike call, sell the higher-strike call.
///
/// Debit trade that profits from a moderate rise in the underlying.
pub fn bull_call_spread(long: Quote, short: Quote, terms: LegTerms) -> Result<Strategy> {
    const NAME: &str = "Bull Call Spread";
    if short.strike <= long.strike {
        return Err(invalid_strikes(
            NAME,
            format!(
                "short strike {} must be greater than long strike {}",
                short.strike, long.strike
            ),
        ));
    }
    Ok(Strategy::new(NAME)
        .with_leg(terms.leg(long, OptionType::Call, Side::Long, terms.quantity)?)
        .with_leg(terms.leg(short, OptionType::Call, Side::Short, terms.quantity)?))
}

/// Bear put spread: buy the higher-strike put, sell the lower-strike put.
pub fn bear_put_spread(long: Quote, short: Quote, terms: LegTerms) -> Result<Strategy> {
    const NAME: &str = "Bear Put Spread";
    if long.strike <= short.strike {
        return Err(invalid_strikes(
            NAME,
            format!(
                "long strike {} must be greater than short strike {}",
                long.strike, short.strike
            ),
        ));
    }
    Ok(Strategy::new(NAME)
        .with_leg(terms.leg(long, OptionType::Put, Side::Long, terms.quantity)?)
        .with_leg(terms.leg(short, OptionType::Put, Side::Short, terms.quantity)?))
}

/// Iron condor: long put, short put, short call, long call, with strikes in
/// strictly increasing order.
///
/// Credit trade that profits when the underlying stays between the short
/// strikes through expiry.
pub fn iron_condor(
    put_long: Quote,
    put_short: Quote,
    call_short: Quote,
    call_long: Quote,
    terms: LegTerms,
) -> Result<Strategy> {
    const NAME: &str = "Iron Condor";
    let strikes = [
        put_long.strike,
        put_short.strike,
        call_short.strike,
        call_long.strike,
    ];
    if !strikes.windows(2).all(|w| w[0] < w[1]) {
        return Err(invalid_strikes(
            NAME,
            format!(
                "strikes must be strictly ordered put_long < put_short < call_short < call_long, got {strikes:?}"
            ),
        ));
    }
    Ok(Strategy::new(NAME)
        .with_leg(terms.leg(put_long, OptionType::Put, Side::Long, terms.quantity)?)
        .with_leg(terms.leg(put_short, OptionType::Put, Side::Short, terms.quantity)?)
        .with_leg(terms.leg(call_short, OptionType::Call, Side::Short, terms.quantity)?)
        .with_leg(terms.leg(call_long, OptionType::Call, Side::Long, terms.quantity)?))
}

/// Long call butterfly: buy one call at each wing strike, sell two at the
/// middle strike.
pub fn long_call_butterfly(
    lower: Quote,
    middle: Quote,
    upper: Quote,
    terms: LegTerms,
) -> Result<Strategy> {
    butterfly("Long Call Butterfly", OptionType::Call, lower, middle, upper, terms)
}

/// Long put butterfly: buy one put at each wing strike, sell two at the
/// middle strike.
pub fn long_put_butterfly(
    lower: Quote,
    middle: Quote,
    upper: Quote,
    terms: LegTerms,
) -> Result<Strategy> {
    butterfly("Long Put Butterfly", OptionType::Put, lower, middle, upper, terms)
}

fn butterfly(
    name: &'static str,
    ty: OptionType,
    lower: Quote,
    middle: Quote,
    upper: Quote,
    terms: LegTerms,
) -> Result<Strategy> {
    if !(lower.strike < middle.strike && middle.strike < upper.strike) {
        return Err(invalid_strikes(
            name,
            format!(
                "strikes must be strictly ordered lower < middle < upper, got [{}, {}, {}]",
                lower.strike, middle.strike, upper.strike
            ),
        ));
    }
    Ok(Strategy::new(name)
        .with_leg(terms.leg(lower, ty, Side::Long, terms.quantity)?)
        .with_leg(terms.leg(middle, ty, Side::Short, terms.quantity * 2)?)
        .with_leg(terms.leg(upper, ty, Side::Long, terms.quantity)?))
}
