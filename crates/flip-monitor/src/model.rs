use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::TrackedGame;

/// Estimates a tracked team's chance of winning from where it stands now.
pub trait WinProbabilityModel: Send {
    fn win_probability(&mut self, game: &TrackedGame) -> f64;
}

/// Factor weights for [`HeuristicWinModel`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WinModelConfig {
    /// Base team rating
    pub team_strength: f64,
    /// Scale of the recent-form term, drawn uniformly from `[-1, 1]`
    pub recent_form: f64,
    pub home_advantage: f64,
    pub referee_impact: f64,
    pub injury_news: f64,
    pub momentum_weight: f64,

    /// Momentum while priced shorter than `-momentum_odds_threshold`
    pub strong_momentum: f64,
    /// Momentum while priced longer than `+momentum_odds_threshold`
    pub weak_momentum: f64,
    pub momentum_odds_threshold: i32,
    /// Scale of the uniform `[-0.5, 0.5]` momentum noise in between
    pub neutral_momentum_scale: f64,

    pub min_probability: f64,
    pub max_probability: f64,
}

impl Default for WinModelConfig {
    fn default() -> Self {
        Self {
            team_strength: 0.65,
            recent_form: 0.08,
            home_advantage: 0.05,
            referee_impact: -0.02,
            injury_news: 0.04,
            momentum_weight: 0.12,
            strong_momentum: 0.15,
            weak_momentum: -0.10,
            momentum_odds_threshold: 150,
            neutral_momentum_scale: 0.05,
            min_probability: 0.05,
            max_probability: 0.95,
        }
    }
}

/// Additive factor model with two random terms (recent form and, near even
/// odds, momentum). Seed it for reproducible runs.
pub struct HeuristicWinModel {
    config: WinModelConfig,
    rng: StdRng,
}

impl HeuristicWinModel {
    pub fn new(config: WinModelConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy(config: WinModelConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn config(&self) -> &WinModelConfig {
        &self.config
    }

    fn momentum(&mut self, odds: i32) -> f64 {
        let threshold = self.config.momentum_odds_threshold;
        if odds < -threshold {
            self.config.strong_momentum
        } else if odds > threshold {
            self.config.weak_momentum
        } else {
            (self.rng.gen::<f64>() - 0.5) * self.config.neutral_momentum_scale
        }
    }

    /// Probability for a team currently priced at `odds`.
    pub fn probability_at(&mut self, odds: i32) -> f64 {
        let form = self.rng.gen_range(-1.0..=1.0);
        let c = &self.config;
        let fixed = c.team_strength + c.recent_form * form + c.home_advantage + c.referee_impact
            + c.injury_news;
        let weight = c.momentum_weight;
        let (min, max) = (c.min_probability, c.max_probability);

        let probability = fixed + weight * self.momentum(odds);
        probability.clamp(min, max)
    }
}

impl WinProbabilityModel for HeuristicWinModel {
    fn win_probability(&mut self, game: &TrackedGame) -> f64 {
        let probability = self.probability_at(game.current_odds().value());
        tracing::debug!(
            game_id = game.game_id(),
            odds = game.current_odds().value(),
            probability,
            "Model win probability"
        );
        probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struggling_team_band() {
        // 0.72 + 0.08 * form - 0.012
        let mut model = HeuristicWinModel::new(WinModelConfig::default(), 7);
        for _ in 0..500 {
            let p = model.probability_at(205);
            assert!((0.628 - 1e-9..=0.788 + 1e-9).contains(&p), "p = {}", p);
        }
    }

    #[test]
    fn test_strong_team_band() {
        // 0.72 + 0.08 * form + 0.018
        let mut model = HeuristicWinModel::new(WinModelConfig::default(), 7);
        for _ in 0..500 {
            let p = model.probability_at(-200);
            assert!((0.658 - 1e-9..=0.818 + 1e-9).contains(&p), "p = {}", p);
        }
    }

    #[test]
    fn test_neutral_momentum_is_small() {
        let mut model = HeuristicWinModel::new(WinModelConfig::default(), 3);
        for _ in 0..500 {
            let p = model.probability_at(110);
            // 0.72 +/- 0.08 +/- 0.12 * 0.025
            assert!((0.637 - 1e-9..=0.803 + 1e-9).contains(&p), "p = {}", p);
        }
    }

    #[test]
    fn test_probability_is_clamped() {
        let config = WinModelConfig {
            team_strength: 2.0,
            ..Default::default()
        };
        let mut model = HeuristicWinModel::new(config, 1);
        assert_eq!(model.probability_at(-300), 0.95);

        let config = WinModelConfig {
            team_strength: -2.0,
            ..Default::default()
        };
        let mut model = HeuristicWinModel::new(config, 1);
        assert_eq!(model.probability_at(300), 0.05);
    }

    #[test]
    fn test_seeded_models_agree() {
        let mut a = HeuristicWinModel::new(WinModelConfig::default(), 42);
        let mut b = HeuristicWinModel::new(WinModelConfig::default(), 42);
        for odds in [-250, -120, 130, 220] {
            assert_eq!(a.probability_at(odds), b.probability_at(odds));
        }
    }
}
