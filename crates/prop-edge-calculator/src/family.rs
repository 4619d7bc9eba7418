use betting_core::StatKind;
use serde::{Deserialize, Serialize};

/// Distribution family a prop is priced with. Each variant carries only the
/// inputs its model reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum StatFamily {
    /// Counting stat with an independent per-minute rate (assists).
    /// Poisson with `lambda = mean(count / minutes) * expected minutes`.
    PerMinuteRate { stat: StatKind },

    /// Roughly symmetric stat (rebounds, passing yards): normal with the
    /// sample mean and population standard deviation.
    Normal { stat: StatKind },

    /// Successes over discrete trials (hits per at-bat): binomial with the
    /// historical success rate.
    BoundedTrials {
        successes: StatKind,
        trials: StatKind,
        #[serde(default)]
        expected_trials: Option<u32>,
    },

    /// Sum of two per-minute rate stats (rebounds + assists), combined by
    /// Monte-Carlo over independent Poisson draws.
    CompoundRate { first: StatKind, second: StatKind },

    /// Made shots from recency-weighted attempts and make rate (3-pointers).
    WeightedRecentForm { attempts: StatKind, makes: StatKind },

    /// Heavy-tailed totals (rushing yards) resampled from per-attempt history.
    EmpiricalBootstrap {
        samples: Vec<f64>,
        #[serde(default)]
        draws: Option<usize>,
    },
}

impl StatFamily {
    pub fn name(&self) -> &'static str {
        match self {
            StatFamily::PerMinuteRate { .. } => "per_minute_rate",
            StatFamily::Normal { .. } => "normal",
            StatFamily::BoundedTrials { .. } => "bounded_trials",
            StatFamily::CompoundRate { .. } => "compound_rate",
            StatFamily::WeightedRecentForm { .. } => "weighted_recent_form",
            StatFamily::EmpiricalBootstrap { .. } => "empirical_bootstrap",
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(
            self,
            StatFamily::CompoundRate { .. } | StatFamily::EmpiricalBootstrap { .. }
        )
    }
}
