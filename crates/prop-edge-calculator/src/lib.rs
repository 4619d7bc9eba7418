//! Prop Edge Calculator
//!
//! Prices a player prop from the player's recent game logs: picks a
//! distribution per stat family, estimates the probability of clearing the
//! line and converts it into an edge against the sportsbook's implied
//! probability.

pub mod calculator;
pub mod config;
pub mod context;
pub mod family;
pub mod monte_carlo;
pub mod result;

pub use calculator::{PropEdgeCalculator, PropQuery};
pub use config::PropModelConfig;
pub use context::{game_script_adjustment, pace_adjustment_for, PropContext};
pub use family::StatFamily;
pub use result::{ComponentEstimate, DegenerateReason, DegenerateResult, EdgeResult, PropEdge};

use betting_core::BettingError;
use distributions::DistributionError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    Betting(#[from] BettingError),
}
