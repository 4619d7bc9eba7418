use betting_core::AmericanOdds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a tracked game; transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Pregame,
    Live,
    Final,
}

/// Everything needed to start tracking a favorite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRegistration {
    pub game_id: String,
    pub team: String,
    pub opponent: String,
    #[serde(default)]
    pub sport: Option<String>,
    /// Raw American odds at game start; must be a favorite price
    pub original_odds: i32,
    pub scheduled_start: DateTime<Utc>,
}

impl GameRegistration {
    pub fn new(
        game_id: impl Into<String>,
        team: impl Into<String>,
        opponent: impl Into<String>,
        original_odds: i32,
        scheduled_start: DateTime<Utc>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            team: team.into(),
            opponent: opponent.into(),
            sport: None,
            original_odds,
            scheduled_start,
        }
    }

    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }
}

/// A game watched by the monitor. Only monitor operations mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedGame {
    pub(crate) game_id: String,
    pub(crate) team: String,
    pub(crate) opponent: String,
    pub(crate) sport: Option<String>,
    pub(crate) scheduled_start: DateTime<Utc>,
    pub(crate) original_favorite_odds: AmericanOdds,
    pub(crate) current_odds: AmericanOdds,
    pub(crate) status: GameStatus,
    pub(crate) potential_flip: bool,
    pub(crate) early_warning_shown: bool,
    pub(crate) flip_alerted: bool,
}

impl TrackedGame {
    pub(crate) fn new(registration: GameRegistration, original: AmericanOdds) -> Self {
        Self {
            game_id: registration.game_id,
            team: registration.team,
            opponent: registration.opponent,
            sport: registration.sport,
            scheduled_start: registration.scheduled_start,
            original_favorite_odds: original,
            current_odds: original,
            status: GameStatus::Pregame,
            potential_flip: false,
            early_warning_shown: false,
            flip_alerted: false,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn opponent(&self) -> &str {
        &self.opponent
    }

    pub fn sport(&self) -> Option<&str> {
        self.sport.as_deref()
    }

    pub fn scheduled_start(&self) -> DateTime<Utc> {
        self.scheduled_start
    }

    pub fn original_favorite_odds(&self) -> AmericanOdds {
        self.original_favorite_odds
    }

    pub fn current_odds(&self) -> AmericanOdds {
        self.current_odds
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_live(&self) -> bool {
        self.status == GameStatus::Live
    }

    /// True for every registered game; registration rejects non-favorites.
    pub fn started_as_favorite(&self) -> bool {
        self.original_favorite_odds.is_favorite()
    }

    pub fn potential_flip(&self) -> bool {
        self.potential_flip
    }

    pub fn early_warning_shown(&self) -> bool {
        self.early_warning_shown
    }

    pub fn flip_alerted(&self) -> bool {
        self.flip_alerted
    }
}
