use betting_core::AmericanOdds;
use serde::{Deserialize, Serialize};

use crate::PropError;

/// Tunables for the prop pricer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropModelConfig {
    /// Minutes assumed when the query context does not project any
    pub default_expected_minutes: f64,

    /// Monte-Carlo trials per compound or bootstrap estimate.
    /// Standard error shrinks with the square root; cost grows linearly.
    pub monte_carlo_trials: usize,

    /// Recent-form weights, most recent game first. Must sum to 1.
    pub recent_form_weights: Vec<f64>,

    /// Make rate used when the weighted window has no attempts
    pub default_make_rate: f64,

    /// Book price used when the query does not carry one
    pub default_market_odds: AmericanOdds,

    /// Trials (at-bats) projected for bounded-trial props
    pub default_expected_trials: u32,
}

impl Default for PropModelConfig {
    fn default() -> Self {
        Self {
            default_expected_minutes: 35.0,
            monte_carlo_trials: 10_000,
            recent_form_weights: vec![0.4, 0.3, 0.2, 0.1],
            default_make_rate: 0.35,
            default_market_odds: AmericanOdds::default(),
            default_expected_trials: 4,
        }
    }
}

impl PropModelConfig {
    pub fn validate(&self) -> Result<(), PropError> {
        if !self.default_expected_minutes.is_finite() || self.default_expected_minutes <= 0.0 {
            return Err(PropError::InvalidParameter(
                "default_expected_minutes must be positive".to_string(),
            ));
        }
        if self.monte_carlo_trials == 0 {
            return Err(PropError::InvalidParameter(
                "monte_carlo_trials must be at least 1".to_string(),
            ));
        }
        if self.recent_form_weights.is_empty()
            || self
                .recent_form_weights
                .iter()
                .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(PropError::InvalidParameter(
                "recent_form_weights must be non-empty and non-negative".to_string(),
            ));
        }
        let total: f64 = self.recent_form_weights.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(PropError::InvalidParameter(format!(
                "recent_form_weights must sum to 1, got {:.4}",
                total
            )));
        }
        if !(self.default_make_rate > 0.0 && self.default_make_rate <= 1.0) {
            return Err(PropError::InvalidParameter(
                "default_make_rate must be within (0, 1]".to_string(),
            ));
        }
        if self.default_expected_trials == 0 {
            return Err(PropError::InvalidParameter(
                "default_expected_trials must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PropModelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_weights_not_summing_to_one() {
        let config = PropModelConfig {
            recent_form_weights: vec![0.5, 0.3, 0.3],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: PropModelConfig =
            serde_json::from_str(r#"{"monte_carlo_trials": 50000}"#).unwrap();
        assert_eq!(config.monte_carlo_trials, 50_000);
        assert_eq!(config.default_market_odds.value(), -110);
        assert_eq!(config.recent_form_weights.len(), 4);
    }
}
