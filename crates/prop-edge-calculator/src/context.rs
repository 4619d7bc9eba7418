use serde::{Deserialize, Serialize};

use crate::PropError;

const NEUTRAL_PACE: f64 = 100.0;
/// Share of the mean gained per pace point above neutral
const PACE_SENSITIVITY: f64 = 0.02;
/// Extra passing yards per point of expected deficit
const GAME_SCRIPT_SENSITIVITY: f64 = 0.3;

/// Per-query game context.
///
/// `opponent_factor` and `venue_factor` scale rates and means;
/// `pace_adjustment` is added to the mean of normal-family props.
/// Bounded-trial and bootstrap props are priced from their own inputs only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropContext {
    #[serde(default)]
    pub expected_minutes: Option<f64>,
    #[serde(default)]
    pub pace_adjustment: Option<f64>,
    #[serde(default)]
    pub opponent_factor: Option<f64>,
    #[serde(default)]
    pub venue_factor: Option<f64>,
}

impl PropContext {
    pub fn with_expected_minutes(mut self, minutes: f64) -> Self {
        self.expected_minutes = Some(minutes);
        self
    }

    pub fn with_pace_adjustment(mut self, adjustment: f64) -> Self {
        self.pace_adjustment = Some(adjustment);
        self
    }

    pub fn with_opponent_factor(mut self, factor: f64) -> Self {
        self.opponent_factor = Some(factor);
        self
    }

    pub fn with_venue_factor(mut self, factor: f64) -> Self {
        self.venue_factor = Some(factor);
        self
    }

    /// Combined multiplicative adjustment (1.0 when neither factor is set).
    pub fn multiplier(&self) -> f64 {
        self.opponent_factor.unwrap_or(1.0) * self.venue_factor.unwrap_or(1.0)
    }

    pub fn additive_adjustment(&self) -> f64 {
        self.pace_adjustment.unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), PropError> {
        if let Some(minutes) = self.expected_minutes {
            if !minutes.is_finite() || minutes <= 0.0 {
                return Err(PropError::InvalidParameter(format!(
                    "expected_minutes must be positive, got {}",
                    minutes
                )));
            }
        }
        if let Some(pace) = self.pace_adjustment {
            if !pace.is_finite() {
                return Err(PropError::InvalidParameter(
                    "pace_adjustment must be finite".to_string(),
                ));
            }
        }
        for (name, factor) in [
            ("opponent_factor", self.opponent_factor),
            ("venue_factor", self.venue_factor),
        ] {
            if let Some(f) = factor {
                if !f.is_finite() || f < 0.0 {
                    return Err(PropError::InvalidParameter(format!(
                        "{} must be finite and >= 0, got {}",
                        name, f
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Additive mean adjustment for team pace: 2% of the mean per possession
/// above a neutral pace of 100.
pub fn pace_adjustment_for(mean: f64, team_pace: f64) -> f64 {
    mean * (team_pace - NEUTRAL_PACE) * PACE_SENSITIVITY
}

/// Additive yardage adjustment for a team expected to trail by
/// `expected_deficit` points.
pub fn game_script_adjustment(expected_deficit: f64) -> f64 {
    expected_deficit * GAME_SCRIPT_SENSITIVITY
}
