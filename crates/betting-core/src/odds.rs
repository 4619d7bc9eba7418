//! American odds conversions shared by the prop engine, the bet sizer and the
//! flip monitor.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::BettingError;

/// Sportsbook price assumed when a caller does not supply one.
pub const DEFAULT_MARKET_ODDS: i32 = -110;

/// Signed American odds: negative for a favorite, positive for an underdog.
///
/// Valid prices have a magnitude of at least 100 (`-110`, `+150`, `-200`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    pub fn new(odds: i32) -> Result<Self, BettingError> {
        if odds.unsigned_abs() < 100 {
            return Err(BettingError::InvalidParameter(format!(
                "American odds must have magnitude >= 100, got {}",
                odds
            )));
        }
        Ok(Self(odds))
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn is_favorite(&self) -> bool {
        self.0 < 0
    }

    /// Win probability consistent with this price, ignoring the vig.
    ///
    /// `+o` → `100 / (o + 100)`, `-o` → `o / (o + 100)`.
    pub fn implied_probability(&self) -> f64 {
        if self.0 > 0 {
            100.0 / (self.0 as f64 + 100.0)
        } else {
            let magnitude = self.0.unsigned_abs() as f64;
            magnitude / (magnitude + 100.0)
        }
    }

    /// Net profit per unit staked (the Kelly `b`).
    pub fn payout_multiplier(&self) -> f64 {
        if self.0 > 0 {
            self.0 as f64 / 100.0
        } else {
            100.0 / self.0.unsigned_abs() as f64
        }
    }

    /// European decimal price (stake included).
    pub fn decimal(&self) -> f64 {
        1.0 + self.payout_multiplier()
    }
}

impl Default for AmericanOdds {
    fn default() -> Self {
        Self(DEFAULT_MARKET_ODDS)
    }
}

impl TryFrom<i32> for AmericanOdds {
    type Error = BettingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AmericanOdds> for i32 {
    fn from(odds: AmericanOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Percentage-point gap between a model probability and the book's implied
/// probability: `(probability - implied) * 100`.
pub fn edge_percent(probability: f64, odds: AmericanOdds) -> f64 {
    (probability - odds.implied_probability()) * 100.0
}

/// Rejects probabilities outside `[0, 1]` or non-finite values.
pub fn validate_probability(name: &str, value: f64) -> Result<f64, BettingError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(BettingError::InvalidParameter(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_implied_probability_standard_vig() {
        let odds = AmericanOdds::new(-110).unwrap();
        assert_relative_eq!(odds.implied_probability(), 0.5238, epsilon = 1e-4);
    }

    #[test]
    fn test_implied_probability_underdog() {
        let odds = AmericanOdds::new(200).unwrap();
        assert_relative_eq!(odds.implied_probability(), 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_edge_against_default_price() {
        let edge = edge_percent(0.55, AmericanOdds::default());
        assert_relative_eq!(edge, 2.62, epsilon = 0.01);
    }

    #[test]
    fn test_payout_multiplier() {
        assert_relative_eq!(AmericanOdds::new(150).unwrap().payout_multiplier(), 1.5);
        assert_relative_eq!(AmericanOdds::new(-200).unwrap().payout_multiplier(), 0.5);
        assert_relative_eq!(AmericanOdds::new(-200).unwrap().decimal(), 1.5);
    }

    #[test]
    fn test_rejects_malformed_odds() {
        assert!(AmericanOdds::new(0).is_err());
        assert!(AmericanOdds::new(-99).is_err());
        assert!(AmericanOdds::new(50).is_err());
        assert!(AmericanOdds::new(100).is_ok());
    }

    #[test]
    fn test_serde_rejects_malformed_odds() {
        let parsed: AmericanOdds = serde_json::from_str("-150").unwrap();
        assert_eq!(parsed.value(), -150);
        assert!(serde_json::from_str::<AmericanOdds>("20").is_err());
    }

    #[test]
    fn test_display_signs() {
        assert_eq!(AmericanOdds::new(205).unwrap().to_string(), "+205");
        assert_eq!(AmericanOdds::new(-200).unwrap().to_string(), "-200");
    }

    #[test]
    fn test_validate_probability() {
        assert!(validate_probability("p", 0.5).is_ok());
        assert!(validate_probability("p", 1.2).is_err());
        assert!(validate_probability("p", f64::NAN).is_err());
    }
}
