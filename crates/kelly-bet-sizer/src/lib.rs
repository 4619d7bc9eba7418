use betting_core::{validate_probability, AmericanOdds};
use prop_edge_calculator::EdgeResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Largest Kelly multiplier the sizer accepts (half-Kelly)
pub const MAX_KELLY_MULTIPLIER: f64 = 0.5;
/// Hard ceiling on the bankroll fraction of a single bet
pub const MAX_BET_FRACTION: f64 = 0.10;

const HIGH_CONFIDENCE_FRACTION: f64 = 0.05;
const MODERATE_FRACTION: f64 = 0.02;

/// Kelly Criterion stake calculator
///
/// The Kelly Criterion gives the bankroll fraction that maximises long-run
/// growth. Formula: f* = (bp - q) / b
/// where:
///   f* = optimal fraction of bankroll to wager
///   b = net payout per unit staked, from the American odds
///   p = probability of winning (scaled by confidence)
///   q = probability of losing (1 - p)
///
/// The sizer can only be tuned toward safety: the multiplier never exceeds
/// half-Kelly and the cap never exceeds 10% of bankroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellyBetSizer {
    /// Fractional Kelly multiplier (0.5 = half-Kelly)
    pub kelly_multiplier: f64,

    /// Maximum fraction of bankroll on one bet (0.10 = 10%)
    pub max_fraction: f64,
}

/// How strongly a stake is recommended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetTier {
    Avoid,
    Moderate,
    HighConfidence,
}

impl BetTier {
    fn from_fraction(fraction: f64) -> Self {
        if fraction > HIGH_CONFIDENCE_FRACTION {
            BetTier::HighConfidence
        } else if fraction > MODERATE_FRACTION {
            BetTier::Moderate
        } else {
            BetTier::Avoid
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BetTier::Avoid => "AVOID",
            BetTier::Moderate => "MODERATE",
            BetTier::HighConfidence => "HIGH CONFIDENCE",
        }
    }
}

/// Stake recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetRecommendation {
    /// Fraction of bankroll to stake (0.0 to max_fraction)
    pub fraction: f64,

    /// Dollar amount to stake, rounded to cents
    pub amount: f64,

    pub tier: BetTier,

    /// Kelly fraction before the multiplier and clamps
    pub raw_kelly_fraction: f64,

    /// Reasoning for the stake
    pub reasoning: String,
}

impl Default for KellyBetSizer {
    fn default() -> Self {
        Self {
            kelly_multiplier: MAX_KELLY_MULTIPLIER, // Half-Kelly
            max_fraction: MAX_BET_FRACTION,         // Never more than 10%
        }
    }
}

impl KellyBetSizer {
    pub fn new(kelly_multiplier: f64, max_fraction: f64) -> Result<Self, SizingError> {
        if !(kelly_multiplier > 0.0 && kelly_multiplier <= MAX_KELLY_MULTIPLIER) {
            return Err(SizingError::InvalidParameter(format!(
                "kelly_multiplier must be within (0, {}], got {}",
                MAX_KELLY_MULTIPLIER, kelly_multiplier
            )));
        }
        if !(max_fraction > 0.0 && max_fraction <= MAX_BET_FRACTION) {
            return Err(SizingError::InvalidParameter(format!(
                "max_fraction must be within (0, {}], got {}",
                MAX_BET_FRACTION, max_fraction
            )));
        }

        Ok(Self {
            kelly_multiplier,
            max_fraction,
        })
    }

    /// Conservative constructor with safer defaults
    pub fn conservative() -> Self {
        Self {
            kelly_multiplier: 0.25, // Quarter-Kelly
            max_fraction: 0.05,     // 5% maximum
        }
    }

    /// Size a bet at `market_odds` for an outcome the model gives
    /// `win_probability`, discounted by `confidence`.
    pub fn recommend_stake(
        &self,
        bankroll: f64,
        market_odds: i32,
        win_probability: f64,
        confidence: f64,
    ) -> Result<BetRecommendation, SizingError> {
        let odds = AmericanOdds::new(market_odds)
            .map_err(|e| SizingError::InvalidParameter(e.to_string()))?;
        self.recommend_at(bankroll, odds, win_probability, confidence)
    }

    /// Size the over side of a priced prop at the book's price.
    pub fn recommend_for_edge(
        &self,
        bankroll: f64,
        edge: &EdgeResult,
        confidence: f64,
    ) -> Result<BetRecommendation, SizingError> {
        self.recommend_at(bankroll, edge.market_odds, edge.over_probability, confidence)
    }

    fn recommend_at(
        &self,
        bankroll: f64,
        odds: AmericanOdds,
        win_probability: f64,
        confidence: f64,
    ) -> Result<BetRecommendation, SizingError> {
        if !bankroll.is_finite() || bankroll <= 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "bankroll must be positive, got {}",
                bankroll
            )));
        }
        validate_probability("win_probability", win_probability)
            .map_err(|e| SizingError::InvalidParameter(e.to_string()))?;
        validate_probability("confidence", confidence)
            .map_err(|e| SizingError::InvalidParameter(e.to_string()))?;

        // f* = (b * p - q) / b
        let b = odds.payout_multiplier();
        let p = win_probability * confidence;
        let q = 1.0 - p;
        let raw_kelly = (b * p - q) / b;

        // Hand-built or deserialized sizers still never exceed half-Kelly or the 10% cap
        let multiplier = self.kelly_multiplier.clamp(0.0, MAX_KELLY_MULTIPLIER);
        let cap = self.max_fraction.clamp(0.0, MAX_BET_FRACTION);

        // No negative stakes
        let fraction = (raw_kelly * multiplier).clamp(0.0, cap);
        let amount = (bankroll * fraction * 100.0).round() / 100.0;
        let tier = BetTier::from_fraction(fraction);

        let reasoning = format!(
            "{}: stake {:.2}% (raw Kelly: {:.2}%, win prob: {:.1}%, odds: {}, confidence: {:.0}%)",
            tier.label(),
            fraction * 100.0,
            raw_kelly * 100.0,
            win_probability * 100.0,
            odds,
            confidence * 100.0
        );

        tracing::debug!(
            odds = odds.value(),
            probability = win_probability,
            raw_kelly,
            fraction,
            tier = tier.label(),
            "Sized bet"
        );

        Ok(BetRecommendation {
            fraction,
            amount,
            tier,
            raw_kelly_fraction: raw_kelly,
            reasoning,
        })
    }
}
