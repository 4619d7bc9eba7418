//! Sources of live odds for the monitor.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use betting_core::AmericanOdds;
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{MonitorError, TrackedGame};

/// Supplies the latest price for a live game, or `None` to keep the
/// game's current odds.
pub trait OddsFeed: Send {
    fn next_odds(&mut self, game: &TrackedGame) -> Option<AmericanOdds>;
}

/// Maps American odds onto a continuous line where -100 and +100 meet at 0,
/// so a drift can carry a price across even money.
fn to_line(odds: AmericanOdds) -> f64 {
    let value = odds.value() as f64;
    if value < 0.0 {
        value + 100.0
    } else {
        value - 100.0
    }
}

fn from_line(position: f64) -> AmericanOdds {
    let rounded = position.round() as i32;
    let value = if rounded < 0 {
        rounded.saturating_sub(100)
    } else {
        rounded.saturating_add(100)
    };
    AmericanOdds::new(value).unwrap_or_default()
}

/// Random-walk odds: each refresh moves the price by a uniform step in
/// `[-max_step, max_step]`.
pub struct SimulatedOddsFeed {
    rng: StdRng,
    max_step: f64,
}

impl SimulatedOddsFeed {
    pub const DEFAULT_MAX_STEP: f64 = 10.0;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_step: Self::DEFAULT_MAX_STEP,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_step: Self::DEFAULT_MAX_STEP,
        }
    }

    pub fn with_step(seed: u64, max_step: f64) -> Result<Self, MonitorError> {
        if !max_step.is_finite() {
            return Err(MonitorError::InvalidParameter(format!(
                "max_step must be finite, got {}",
                max_step
            )));
        }
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            max_step: max_step.abs(),
        })
    }

    /// One random step away from `odds`.
    pub fn drift(&mut self, odds: AmericanOdds) -> AmericanOdds {
        let step = (self.rng.gen::<f64>() - 0.5) * 2.0 * self.max_step;
        from_line(to_line(odds) + step)
    }
}

impl OddsFeed for SimulatedOddsFeed {
    fn next_odds(&mut self, game: &TrackedGame) -> Option<AmericanOdds> {
        Some(self.drift(game.current_odds()))
    }
}

/// Replays a fixed sequence of quotes per game, one per tick.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOddsFeed {
    scripts: HashMap<String, VecDeque<AmericanOdds>>,
}

impl ScriptedOddsFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, game_id: impl Into<String>, odds: AmericanOdds) {
        self.scripts.entry(game_id.into()).or_default().push_back(odds);
    }

    pub fn with_script(
        mut self,
        game_id: impl Into<String>,
        quotes: impl IntoIterator<Item = AmericanOdds>,
    ) -> Self {
        self.scripts
            .entry(game_id.into())
            .or_default()
            .extend(quotes);
        self
    }

    pub fn remaining(&self, game_id: &str) -> usize {
        self.scripts.get(game_id).map_or(0, VecDeque::len)
    }
}

impl OddsFeed for ScriptedOddsFeed {
    fn next_odds(&mut self, game: &TrackedGame) -> Option<AmericanOdds> {
        self.scripts.get_mut(game.game_id())?.pop_front()
    }
}

/// Latest-quote cache shared between an odds refresh task (writer) and the
/// monitor tick (reader). Cloning shares the same board.
#[derive(Debug, Clone, Default)]
pub struct OddsBoard {
    quotes: Arc<DashMap<String, AmericanOdds>>,
}

impl OddsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, game_id: impl Into<String>, odds: AmericanOdds) {
        self.quotes.insert(game_id.into(), odds);
    }

    pub fn latest(&self, game_id: &str) -> Option<AmericanOdds> {
        self.quotes.get(game_id).map(|entry| *entry.value())
    }

    pub fn remove(&self, game_id: &str) {
        self.quotes.remove(game_id);
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Pull a fresh quote from `source` for every live game in `games` and
    /// publish it. Returns the number of quotes written.
    pub fn refresh_from<'a>(
        &self,
        source: &mut dyn OddsFeed,
        games: impl IntoIterator<Item = &'a TrackedGame>,
    ) -> usize {
        let mut published = 0;
        for game in games.into_iter().filter(|g| g.is_live()) {
            // Walk from the board's quote so the refresh cadence drives movement
            let mut view = game.clone();
            if let Some(latest) = self.latest(game.game_id()) {
                view.current_odds = latest;
            }
            if let Some(odds) = source.next_odds(&view) {
                self.publish(game.game_id(), odds);
                published += 1;
            }
        }
        published
    }
}

impl OddsFeed for OddsBoard {
    fn next_odds(&mut self, game: &TrackedGame) -> Option<AmericanOdds> {
        self.latest(game.game_id())
    }
}
