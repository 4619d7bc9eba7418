use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Box-score categories a prop can be written against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Points,
    Rebounds,
    Assists,
    ThreePointAttempts,
    ThreePointMakes,
    PassingYards,
    RushingYards,
    Hits,
    AtBats,
}

impl StatKind {
    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Points => "points",
            StatKind::Rebounds => "rebounds",
            StatKind::Assists => "assists",
            StatKind::ThreePointAttempts => "3PT attempts",
            StatKind::ThreePointMakes => "3PT makes",
            StatKind::PassingYards => "passing yards",
            StatKind::RushingYards => "rushing yards",
            StatKind::Hits => "hits",
            StatKind::AtBats => "at-bats",
        }
    }
}

/// One player-game observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub played_at: DateTime<Utc>,
    pub minutes: f64,
    #[serde(default)]
    pub stats: BTreeMap<StatKind, f64>,
}

impl GameLog {
    pub fn new(played_at: DateTime<Utc>, minutes: f64) -> Self {
        Self {
            played_at,
            minutes,
            stats: BTreeMap::new(),
        }
    }

    pub fn with_stat(mut self, stat: StatKind, value: f64) -> Self {
        self.stats.insert(stat, value);
        self
    }

    pub fn stat(&self, stat: StatKind) -> Option<f64> {
        self.stats.get(&stat).copied()
    }
}

/// Orders a log sequence most-recent-first. Stable, so equal timestamps keep
/// the caller's order.
pub fn sort_most_recent_first(logs: &mut [GameLog]) {
    logs.sort_by(|a, b| b.played_at.cmp(&a.played_at));
}
