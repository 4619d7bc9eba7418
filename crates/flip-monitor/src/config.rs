use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Flip and early-warning thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Current odds at or above which a favorite counts as flipped (+200)
    pub flip_odds: i32,

    /// Only favorites priced at or below this at registration can flip (-200)
    pub eligible_original_odds: i32,

    /// Lower bound of the early-warning band `[warning_floor, flip_odds)`
    pub warning_floor: i32,

    /// Model win probability required before a flip is alerted
    pub min_model_probability: f64,

    /// Model probability above which an alert is a hot signal
    pub hot_signal_probability: f64,

    /// A pregame game goes live this many minutes before its start
    pub live_lead_minutes: i64,

    /// and stays eligible to go live this many minutes after it
    pub live_grace_minutes: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            flip_odds: 200,
            eligible_original_odds: -200,
            warning_floor: 0,
            min_model_probability: 0.60,
            hot_signal_probability: 0.65,
            live_lead_minutes: 5,
            live_grace_minutes: 30,
        }
    }
}

impl MonitorConfig {
    pub fn live_lead(&self) -> Duration {
        Duration::minutes(self.live_lead_minutes)
    }

    pub fn live_grace(&self) -> Duration {
        Duration::minutes(self.live_grace_minutes)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.flip_odds < 100 {
            return Err(MonitorError::InvalidParameter(format!(
                "flip_odds must be an underdog price (>= 100), got {}",
                self.flip_odds
            )));
        }
        if self.eligible_original_odds > -100 {
            return Err(MonitorError::InvalidParameter(format!(
                "eligible_original_odds must be a favorite price (<= -100), got {}",
                self.eligible_original_odds
            )));
        }
        if self.warning_floor >= self.flip_odds {
            return Err(MonitorError::InvalidParameter(
                "warning_floor must be below flip_odds".to_string(),
            ));
        }
        for (name, p) in [
            ("min_model_probability", self.min_model_probability),
            ("hot_signal_probability", self.hot_signal_probability),
        ] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(MonitorError::InvalidParameter(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        if self.live_lead_minutes < 0 || self.live_grace_minutes < 0 {
            return Err(MonitorError::InvalidParameter(
                "live window minutes must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.live_lead(), Duration::minutes(5));
        assert_eq!(config.live_grace(), Duration::minutes(30));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = MonitorConfig {
            warning_floor: 250,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MonitorConfig {
            min_model_probability: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"min_model_probability": 0.7}"#).unwrap();
        assert_eq!(config.min_model_probability, 0.7);
        assert_eq!(config.flip_odds, 200);
    }
}
