use std::collections::{BTreeMap, HashSet};

use betting_core::{edge_percent, AmericanOdds};
use chrono::{DateTime, Utc};

use crate::{
    AlertRecord, FlipWarning, GameRegistration, GameStatus, HeuristicWinModel, MonitorConfig,
    MonitorError, OddsFeed, TrackedGame, Urgency, WinModelConfig, WinProbabilityModel,
};

/// Watches registered favorites and raises one alert per game when a
/// favorite flips to a long underdog price while the model still likes it.
///
/// Owns all tracked state. Callers drive it with [`FlipMonitor::tick`];
/// wrap it in a [`crate::SharedMonitor`] to step it from several tasks.
pub struct FlipMonitor {
    config: MonitorConfig,
    model: Box<dyn WinProbabilityModel>,
    games: BTreeMap<String, TrackedGame>,
    alerts: Vec<AlertRecord>,
    alerted: HashSet<String>,
    warnings: Vec<FlipWarning>,
}

impl FlipMonitor {
    pub fn new(
        config: MonitorConfig,
        model: Box<dyn WinProbabilityModel>,
    ) -> Result<Self, MonitorError> {
        config.validate()?;
        Ok(Self {
            config,
            model,
            games: BTreeMap::new(),
            alerts: Vec::new(),
            alerted: HashSet::new(),
            warnings: Vec::new(),
        })
    }

    /// Monitor backed by the default heuristic model seeded with `seed`.
    pub fn with_heuristic_model(config: MonitorConfig, seed: u64) -> Result<Self, MonitorError> {
        Self::new(
            config,
            Box::new(HeuristicWinModel::new(WinModelConfig::default(), seed)),
        )
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Start tracking a favorite.
    ///
    /// Favorites priced above `eligible_original_odds` are tracked and can
    /// raise early warnings, but never a flip alert.
    pub fn register_favorite(&mut self, registration: GameRegistration) -> Result<(), MonitorError> {
        if registration.game_id.trim().is_empty() {
            return Err(MonitorError::InvalidParameter(
                "game_id must not be empty".to_string(),
            ));
        }
        let original = AmericanOdds::new(registration.original_odds)
            .map_err(|e| MonitorError::InvalidParameter(e.to_string()))?;
        if !original.is_favorite() {
            return Err(MonitorError::InvalidParameter(format!(
                "{} is not a favorite at {}",
                registration.team, original
            )));
        }
        if self.games.contains_key(&registration.game_id)
            || self.alerted.contains(&registration.game_id)
        {
            return Err(MonitorError::DuplicateGame(registration.game_id));
        }

        tracing::info!(
            game_id = %registration.game_id,
            team = %registration.team,
            opponent = %registration.opponent,
            odds = original.value(),
            start = %registration.scheduled_start,
            "Tracking favorite"
        );

        let game = TrackedGame::new(registration, original);
        self.games.insert(game.game_id.clone(), game);
        Ok(())
    }

    /// One monitoring step at `now`: advance pregame games, refresh live
    /// odds from `feed`, then check each live favorite for a flip.
    ///
    /// Returns the alerts raised by this step only.
    ///
    /// A flipped game whose model probability falls short of the gate is not
    /// settled: the model is asked again on every later tick while the odds
    /// stay at or past the flip line, advancing any random stream it keeps.
    pub fn tick(&mut self, now: DateTime<Utc>, feed: &mut dyn OddsFeed) -> Vec<AlertRecord> {
        let Self {
            config,
            model,
            games,
            alerts,
            alerted,
            warnings,
        } = self;
        let mut raised = Vec::new();

        for game in games.values_mut() {
            if game.status == GameStatus::Pregame {
                advance_pregame(config, game, now);
            }
            if game.status != GameStatus::Live {
                continue;
            }

            if let Some(odds) = feed.next_odds(game) {
                game.current_odds = odds;
            }

            if !game.started_as_favorite() || game.flip_alerted {
                continue;
            }

            let odds = game.current_odds.value();

            if odds >= config.warning_floor && odds < config.flip_odds {
                game.potential_flip = true;
                if !game.early_warning_shown {
                    game.early_warning_shown = true;
                    tracing::warn!(
                        game_id = %game.game_id,
                        team = %game.team,
                        odds,
                        "Favorite trending toward underdog"
                    );
                    warnings.push(FlipWarning {
                        game_id: game.game_id.clone(),
                        team: game.team.clone(),
                        current_odds: game.current_odds,
                        raised_at: now,
                    });
                }
            }

            if odds >= config.flip_odds
                && game.original_favorite_odds.value() <= config.eligible_original_odds
            {
                let probability = model.win_probability(game);
                if probability < config.min_model_probability {
                    tracing::debug!(
                        game_id = %game.game_id,
                        odds,
                        probability,
                        "Flip below model threshold"
                    );
                    continue;
                }

                game.flip_alerted = true;
                if !alerted.insert(game.game_id.clone()) {
                    tracing::error!(
                        game_id = %game.game_id,
                        "Flip alert already raised for game; skipping duplicate"
                    );
                    continue;
                }

                let record = build_alert(config, game, probability, now);
                tracing::info!(
                    game_id = %record.game_id,
                    team = %record.team,
                    original = record.original_odds.value(),
                    current = record.current_odds.value(),
                    probability,
                    urgency = record.urgency.label(),
                    "Favorite flipped to underdog"
                );
                alerts.push(record.clone());
                raised.push(record);
            }
        }

        tracing::debug!(
            tracked = games.len(),
            raised = raised.len(),
            "Monitor tick complete"
        );
        raised
    }

    /// Every alert raised so far, oldest first.
    pub fn get_alerts(&self) -> &[AlertRecord] {
        &self.alerts
    }

    /// Early warnings not yet collected.
    pub fn drain_warnings(&mut self) -> Vec<FlipWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn game(&self, game_id: &str) -> Option<&TrackedGame> {
        self.games.get(game_id)
    }

    pub fn games(&self) -> impl Iterator<Item = &TrackedGame> {
        self.games.values()
    }

    pub fn has_alert(&self, game_id: &str) -> bool {
        self.alerted.contains(game_id)
    }

    pub fn mark_final(&mut self, game_id: &str) -> Result<(), MonitorError> {
        let game = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| MonitorError::UnknownGame(game_id.to_string()))?;
        if game.status != GameStatus::Final {
            tracing::info!(game_id, "Game final");
            game.status = GameStatus::Final;
        }
        Ok(())
    }

    /// Stop tracking a game. Its alert, if any, stays in the history and the
    /// id cannot be registered again.
    pub fn unregister(&mut self, game_id: &str) -> Result<TrackedGame, MonitorError> {
        let game = self
            .games
            .remove(game_id)
            .ok_or_else(|| MonitorError::UnknownGame(game_id.to_string()))?;
        tracing::info!(game_id, "Stopped tracking game");
        Ok(game)
    }

    /// Set a live game's odds directly. Returns false (and changes nothing)
    /// when the game is not live.
    pub fn apply_odds(&mut self, game_id: &str, odds: AmericanOdds) -> Result<bool, MonitorError> {
        let game = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| MonitorError::UnknownGame(game_id.to_string()))?;
        if !game.is_live() {
            return Ok(false);
        }
        game.current_odds = odds;
        Ok(true)
    }
}

fn advance_pregame(config: &MonitorConfig, game: &mut TrackedGame, now: DateTime<Utc>) {
    let opens = game.scheduled_start - config.live_lead();
    let closes = game.scheduled_start + config.live_grace();

    if now > closes {
        tracing::info!(
            game_id = %game.game_id,
            start = %game.scheduled_start,
            "Missed live window; marking final"
        );
        game.status = GameStatus::Final;
    } else if now >= opens {
        tracing::info!(
            game_id = %game.game_id,
            team = %game.team,
            opponent = %game.opponent,
            "Game is now live"
        );
        game.status = GameStatus::Live;
    }
}

fn build_alert(
    config: &MonitorConfig,
    game: &TrackedGame,
    probability: f64,
    now: DateTime<Utc>,
) -> AlertRecord {
    AlertRecord {
        game_id: game.game_id.clone(),
        team: game.team.clone(),
        opponent: game.opponent.clone(),
        sport: game.sport.clone(),
        original_odds: game.original_favorite_odds,
        current_odds: game.current_odds,
        edge: edge_percent(probability, game.current_odds),
        model_win_probability: probability,
        urgency: Urgency::from_probability(probability),
        hot_signal: probability > config.hot_signal_probability,
        raised_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedOddsFeed;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    struct FixedModel(f64);

    impl WinProbabilityModel for FixedModel {
        fn win_probability(&mut self, _game: &TrackedGame) -> f64 {
            self.0
        }
    }

    fn tip_off() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 30, 23, 30, 0).unwrap()
    }

    fn monitor(probability: f64) -> FlipMonitor {
        FlipMonitor::new(MonitorConfig::default(), Box::new(FixedModel(probability))).unwrap()
    }

    fn lakers(odds: i32) -> GameRegistration {
        GameRegistration::new("LALvsBOS", "Lakers", "Celtics", odds, tip_off()).with_sport("NBA")
    }

    fn odds(value: i32) -> AmericanOdds {
        AmericanOdds::new(value).unwrap()
    }

    #[test]
    fn test_register_rejects_non_favorites_and_bad_odds() {
        let mut m = monitor(0.7);
        assert!(matches!(
            m.register_favorite(lakers(150)),
            Err(MonitorError::InvalidParameter(_))
        ));
        assert!(matches!(
            m.register_favorite(lakers(-50)),
            Err(MonitorError::InvalidParameter(_))
        ));
        assert!(m.game("LALvsBOS").is_none());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut m = monitor(0.7);
        m.register_favorite(lakers(-200)).unwrap();
        assert_eq!(
            m.register_favorite(lakers(-180)),
            Err(MonitorError::DuplicateGame("LALvsBOS".to_string()))
        );
    }

    #[test]
    fn test_pregame_transitions() {
        let mut m = monitor(0.7);
        m.register_favorite(lakers(-200)).unwrap();
        let mut feed = ScriptedOddsFeed::new();

        m.tick(tip_off() - Duration::minutes(10), &mut feed);
        assert_eq!(m.game("LALvsBOS").unwrap().status(), GameStatus::Pregame);

        m.tick(tip_off() - Duration::minutes(5), &mut feed);
        assert_eq!(m.game("LALvsBOS").unwrap().status(), GameStatus::Live);
    }

    #[test]
    fn test_missed_window_goes_final() {
        let mut m = monitor(0.7);
        m.register_favorite(lakers(-200)).unwrap();
        let mut feed = ScriptedOddsFeed::new().with_script("LALvsBOS", [odds(250)]);

        let raised = m.tick(tip_off() + Duration::minutes(31), &mut feed);

        let game = m.game("LALvsBOS").unwrap();
        assert_eq!(game.status(), GameStatus::Final);
        assert_eq!(game.current_odds().value(), -200);
        assert!(raised.is_empty());
    }

    #[test]
    fn test_flip_raises_single_alert() {
        let mut m = monitor(0.70);
        m.register_favorite(lakers(-200)).unwrap();
        let mut feed = ScriptedOddsFeed::new()
            .with_script("LALvsBOS", [odds(-180), odds(205), odds(230), odds(240)]);

        assert!(m.tick(tip_off(), &mut feed).is_empty());
        let raised = m.tick(tip_off() + Duration::minutes(1), &mut feed);
        assert_eq!(raised.len(), 1);

        let alert = &raised[0];
        assert_eq!(alert.urgency, Urgency::High);
        assert!(alert.hot_signal);
        assert_eq!(alert.original_odds.value(), -200);
        assert_eq!(alert.current_odds.value(), 205);
        assert_relative_eq!(alert.edge, (0.70 - 100.0 / 305.0) * 100.0, epsilon = 1e-9);
        assert_eq!(alert.sport.as_deref(), Some("NBA"));

        assert!(m.tick(tip_off() + Duration::minutes(2), &mut feed).is_empty());
        assert!(m.tick(tip_off() + Duration::minutes(3), &mut feed).is_empty());
        assert_eq!(m.get_alerts().len(), 1);
        assert!(m.game("LALvsBOS").unwrap().flip_alerted());
    }

    #[test]
    fn test_low_model_probability_suppresses_alert() {
        let mut m = monitor(0.55);
        m.register_favorite(lakers(-200)).unwrap();
        let mut feed = ScriptedOddsFeed::new().with_script("LALvsBOS", [odds(210)]);

        assert!(m.tick(tip_off(), &mut feed).is_empty());
        assert!(!m.game("LALvsBOS").unwrap().flip_alerted());
        assert!(m.get_alerts().is_empty());
    }

    struct SequenceModel {
        probabilities: Vec<f64>,
        calls: usize,
    }

    impl WinProbabilityModel for SequenceModel {
        fn win_probability(&mut self, _game: &TrackedGame) -> f64 {
            let p = self.probabilities.get(self.calls).copied().unwrap_or(0.0);
            self.calls += 1;
            p
        }
    }

    #[test]
    fn test_gate_is_reevaluated_each_tick() {
        let model = SequenceModel {
            probabilities: vec![0.55, 0.58, 0.70],
            calls: 0,
        };
        let mut m = FlipMonitor::new(MonitorConfig::default(), Box::new(model)).unwrap();
        m.register_favorite(lakers(-200)).unwrap();
        // One quote; later ticks keep +210
        let mut feed = ScriptedOddsFeed::new().with_script("LALvsBOS", [odds(210)]);

        assert!(m.tick(tip_off(), &mut feed).is_empty());
        assert!(m.tick(tip_off() + Duration::minutes(1), &mut feed).is_empty());
        let raised = m.tick(tip_off() + Duration::minutes(2), &mut feed);
        assert_eq!(raised.len(), 1);
        assert_relative_eq!(raised[0].model_win_probability, 0.70);

        // Settled once alerted
        assert!(m.tick(tip_off() + Duration::minutes(3), &mut feed).is_empty());
        assert_eq!(m.get_alerts().len(), 1);
    }

    #[test]
    fn test_short_favorite_never_flips() {
        let mut m = monitor(0.9);
        m.register_favorite(lakers(-150)).unwrap();
        let mut feed = ScriptedOddsFeed::new().with_script("LALvsBOS", [odds(250)]);

        assert!(m.tick(tip_off(), &mut feed).is_empty());
        assert!(m.get_alerts().is_empty());
    }

    #[test]
    fn test_early_warning_emitted_once() {
        let mut m = monitor(0.7);
        m.register_favorite(lakers(-200)).unwrap();
        let mut feed = ScriptedOddsFeed::new()
            .with_script("LALvsBOS", [odds(-120), odds(130), odds(160), odds(-110)]);

        for minute in 0..4 {
            m.tick(tip_off() + Duration::minutes(minute), &mut feed);
        }

        let warnings = m.drain_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].current_odds.value(), 130);
        assert_eq!(warnings[0].raised_at, tip_off() + Duration::minutes(1));
        assert!(m.game("LALvsBOS").unwrap().potential_flip());
        assert!(m.drain_warnings().is_empty());
    }

    #[test]
    fn test_final_game_is_frozen() {
        let mut m = monitor(0.7);
        m.register_favorite(lakers(-200)).unwrap();
        let mut feed = ScriptedOddsFeed::new().with_script("LALvsBOS", [odds(-190), odds(220)]);

        m.tick(tip_off(), &mut feed);
        m.mark_final("LALvsBOS").unwrap();

        assert!(m.tick(tip_off() + Duration::minutes(1), &mut feed).is_empty());
        assert_eq!(m.game("LALvsBOS").unwrap().current_odds().value(), -190);
        assert_eq!(m.apply_odds("LALvsBOS", odds(300)), Ok(false));
        assert_eq!(feed.remaining("LALvsBOS"), 1);
    }

    #[test]
    fn test_apply_odds_then_tick() {
        let mut m = monitor(0.8);
        m.register_favorite(lakers(-250)).unwrap();
        let mut feed = ScriptedOddsFeed::new();

        assert_eq!(m.apply_odds("LALvsBOS", odds(210)), Ok(false));
        m.tick(tip_off(), &mut feed);
        assert_eq!(m.apply_odds("LALvsBOS", odds(210)), Ok(true));

        let raised = m.tick(tip_off() + Duration::minutes(1), &mut feed);
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].urgency, Urgency::Critical);
        assert!(matches!(
            m.apply_odds("missing", odds(210)),
            Err(MonitorError::UnknownGame(_))
        ));
    }

    #[test]
    fn test_unregister_keeps_history_and_blocks_reregistration() {
        let mut m = monitor(0.7);
        m.register_favorite(lakers(-200)).unwrap();
        let mut feed = ScriptedOddsFeed::new().with_script("LALvsBOS", [odds(205)]);
        m.tick(tip_off(), &mut feed);

        let removed = m.unregister("LALvsBOS").unwrap();
        assert!(removed.flip_alerted());
        assert_eq!(m.get_alerts().len(), 1);
        assert!(m.has_alert("LALvsBOS"));
        assert_eq!(
            m.register_favorite(lakers(-200)),
            Err(MonitorError::DuplicateGame("LALvsBOS".to_string()))
        );
        assert!(matches!(
            m.unregister("LALvsBOS"),
            Err(MonitorError::UnknownGame(_))
        ));
    }

    #[test]
    fn test_unregister_without_alert_allows_reregistration() {
        let mut m = monitor(0.7);
        m.register_favorite(lakers(-200)).unwrap();
        m.unregister("LALvsBOS").unwrap();
        assert!(m.register_favorite(lakers(-210)).is_ok());
    }

    #[test]
    fn test_alerts_keep_insertion_order() {
        let mut m = monitor(0.66);
        m.register_favorite(lakers(-200)).unwrap();
        m.register_favorite(GameRegistration::new(
            "KCvsBUF", "Chiefs", "Bills", -220, tip_off(),
        ))
        .unwrap();
        let mut feed = ScriptedOddsFeed::new()
            .with_script("LALvsBOS", [odds(-150), odds(215)])
            .with_script("KCvsBUF", [odds(230)]);

        m.tick(tip_off(), &mut feed);
        m.tick(tip_off() + Duration::minutes(1), &mut feed);

        let ids: Vec<&str> = m.get_alerts().iter().map(|a| a.game_id.as_str()).collect();
        assert_eq!(ids, vec!["KCvsBUF", "LALvsBOS"]);
        assert!(m.get_alerts().iter().all(|a| a.urgency == Urgency::Medium));
        assert!(m.get_alerts().iter().all(|a| a.hot_signal));
    }
}
