//! Live favorite-flip monitor.
//!
//! Tracks games whose pregame favorite may drift to underdog status during
//! live play. A [`FlipMonitor`] is stepped explicitly with [`FlipMonitor::tick`],
//! which advances game status, refreshes odds from an [`OddsFeed`] and raises
//! at most one [`AlertRecord`] per game.

pub mod alert;
pub mod config;
pub mod error;
pub mod feed;
pub mod game;
pub mod model;
pub mod monitor;
pub mod shared;

pub use alert::{AlertRecord, FlipWarning, Urgency};
pub use config::MonitorConfig;
pub use error::MonitorError;
pub use feed::{OddsBoard, OddsFeed, ScriptedOddsFeed, SimulatedOddsFeed};
pub use game::{GameRegistration, GameStatus, TrackedGame};
pub use model::{HeuristicWinModel, WinModelConfig, WinProbabilityModel};
pub use monitor::FlipMonitor;
pub use shared::{share, tick_shared, SharedMonitor};
