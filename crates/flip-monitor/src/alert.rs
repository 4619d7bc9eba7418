use betting_core::AmericanOdds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert priority derived from the model's win probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.75 {
            Urgency::Critical
        } else if probability > 0.68 {
            Urgency::High
        } else if probability > 0.62 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Low => "LOW",
            Urgency::Medium => "MEDIUM",
            Urgency::High => "HIGH",
            Urgency::Critical => "CRITICAL",
        }
    }
}

/// A confirmed favorite flip. At most one exists per game id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub game_id: String,
    pub team: String,
    pub opponent: String,
    pub sport: Option<String>,
    pub original_odds: AmericanOdds,
    pub current_odds: AmericanOdds,
    /// Model probability minus the implied probability of `current_odds`,
    /// in percentage points
    pub edge: f64,
    pub model_win_probability: f64,
    pub urgency: Urgency,
    pub hot_signal: bool,
    pub raised_at: DateTime<Utc>,
}

impl AlertRecord {
    /// How far the price moved past even, in odds points (`|current| - |original|`).
    pub fn flip_size(&self) -> i32 {
        self.current_odds.value().abs() - self.original_odds.value().abs()
    }
}

/// Early sign that a favorite is drifting toward underdog status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipWarning {
    pub game_id: String,
    pub team: String,
    pub current_odds: AmericanOdds,
    pub raised_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_bands() {
        assert_eq!(Urgency::from_probability(0.80), Urgency::Critical);
        assert_eq!(Urgency::from_probability(0.75), Urgency::High);
        assert_eq!(Urgency::from_probability(0.70), Urgency::High);
        assert_eq!(Urgency::from_probability(0.68), Urgency::Medium);
        assert_eq!(Urgency::from_probability(0.65), Urgency::Medium);
        assert_eq!(Urgency::from_probability(0.62), Urgency::Low);
        assert_eq!(Urgency::from_probability(0.60), Urgency::Low);
    }

    #[test]
    fn test_urgency_orders_by_priority() {
        assert!(Urgency::Critical > Urgency::High);
        assert!(Urgency::Medium > Urgency::Low);
        assert_eq!(
            serde_json::to_string(&Urgency::Critical).unwrap(),
            "\"CRITICAL\""
        );
    }
}
