//! Core domain types for options strategy analytics.
//!
//! Plain `f64` is used for prices, volatilities, and times throughout the
//! crate: the API surface is small enough that parameter names disambiguate,
//! and every constructor validates its inputs. The enums here carry the only
//! non-numeric state a position has — payoff direction and trade side.

use serde::{Deserialize, Serialize};

/// Option type: call or put.
///
/// Determines the payoff branch in pricing and intrinsic-value formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy at the strike price.
    Call,
    /// Right to sell at the strike price.
    Put,
}

/// Trade direction of a leg: bought (long) or written (short).
///
/// Premium magnitudes are always stored positive; the side determines the
/// cash-flow direction and the sign applied when aggregating quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bought position: pays premium, receives intrinsic value at expiry.
    Long,
    /// Written position: receives premium, pays intrinsic value at expiry.
    Short,
}

impl Side {
    /// Sign convention for aggregation: +1 for long, −1 for short.
    pub fn sign(self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_sign_convention() {
        assert_eq!(Side::Long.sign(), 1.0);
        assert_eq!(Side::Short.sign(), -1.0);
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&OptionType::Call).unwrap();
        let back: OptionType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OptionType::Call);

        let json = serde_json::to_string(&Side::Short).unwrap();
        let back: Side = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Side::Short);
    }
}
