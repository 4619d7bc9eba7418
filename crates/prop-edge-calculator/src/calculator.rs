use betting_core::{edge_percent, sort_most_recent_first, AmericanOdds, GameLog, StatKind};
use distributions::{binomial_cdf, mean, normal_cdf, poisson_cdf, population_std_dev, weighted_mean};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::monte_carlo::{bootstrap_over, compound_poisson_over};
use crate::{
    ComponentEstimate, DegenerateReason, DegenerateResult, EdgeResult, PropContext, PropEdge,
    PropError, PropModelConfig, StatFamily,
};

/// One pricing request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropQuery {
    pub family: StatFamily,
    /// Recent games; re-ordered most-recent-first before pricing
    pub recent_games: Vec<GameLog>,
    pub line: f64,
    #[serde(default)]
    pub context: PropContext,
    #[serde(default)]
    pub market_odds: Option<AmericanOdds>,
}

impl PropQuery {
    pub fn new(family: StatFamily, recent_games: Vec<GameLog>, line: f64) -> Self {
        Self {
            family,
            recent_games,
            line,
            context: PropContext::default(),
            market_odds: None,
        }
    }

    pub fn with_context(mut self, context: PropContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_market_odds(mut self, odds: AmericanOdds) -> Self {
        self.market_odds = Some(odds);
        self
    }
}

/// Model output before it is priced against the book
enum Estimate {
    Priced {
        expected_value: f64,
        over_probability: f64,
        components: Vec<ComponentEstimate>,
        std_dev: Option<f64>,
        trials: Option<usize>,
    },
    Degenerate {
        reason: DegenerateReason,
        expected_value: Option<f64>,
        over_probability: Option<f64>,
    },
}

impl Estimate {
    fn insufficient(reason: DegenerateReason) -> Self {
        Estimate::Degenerate {
            reason,
            expected_value: None,
            over_probability: None,
        }
    }
}

/// Rate-model estimate of a single counting stat
struct RateEstimate {
    lambda: f64,
}

/// Prop pricer
#[derive(Debug, Clone, Default)]
pub struct PropEdgeCalculator {
    config: PropModelConfig,
}

impl PropEdgeCalculator {
    pub fn new(config: PropModelConfig) -> Result<Self, PropError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PropModelConfig {
        &self.config
    }

    /// Price `query` and compare it with the book.
    ///
    /// Thin or unusable history yields `PropEdge::Degenerate` rather than an
    /// error; malformed arguments (non-finite line, bad context) are errors.
    pub fn compute_prop_edge<R: Rng + ?Sized>(
        &self,
        query: &PropQuery,
        rng: &mut R,
    ) -> Result<PropEdge, PropError> {
        if !query.line.is_finite() {
            return Err(PropError::InvalidParameter(format!(
                "line must be finite, got {}",
                query.line
            )));
        }
        query.context.validate()?;

        let odds = query.market_odds.unwrap_or(self.config.default_market_odds);
        let mut games = query.recent_games.clone();
        sort_most_recent_first(&mut games);

        let estimate = match &query.family {
            StatFamily::PerMinuteRate { stat } => {
                self.per_minute_rate(&games, *stat, query.line, &query.context)?
            }
            StatFamily::Normal { stat } => {
                self.normal(&games, *stat, query.line, &query.context)
            }
            StatFamily::BoundedTrials {
                successes,
                trials,
                expected_trials,
            } => self.bounded_trials(
                &games,
                *successes,
                *trials,
                expected_trials.unwrap_or(self.config.default_expected_trials),
                query.line,
            )?,
            StatFamily::CompoundRate { first, second } => {
                self.compound_rate(&games, *first, *second, query.line, &query.context, rng)?
            }
            StatFamily::WeightedRecentForm { attempts, makes } => {
                self.weighted_recent_form(&games, *attempts, *makes, query.line, &query.context)?
            }
            StatFamily::EmpiricalBootstrap { samples, draws } => {
                self.empirical_bootstrap(samples, *draws, query.line, rng)?
            }
        };

        let result = match estimate {
            Estimate::Priced {
                expected_value,
                over_probability,
                components,
                std_dev,
                trials,
            } => {
                let over_probability = over_probability.clamp(0.0, 1.0);
                PropEdge::Priced(EdgeResult {
                    line: query.line,
                    expected_value,
                    over_probability,
                    under_probability: 1.0 - over_probability,
                    implied_probability: odds.implied_probability(),
                    edge: edge_percent(over_probability, odds),
                    market_odds: odds,
                    components,
                    std_dev,
                    trials,
                })
            }
            Estimate::Degenerate {
                reason,
                expected_value,
                over_probability,
            } => PropEdge::Degenerate(DegenerateResult {
                reason,
                line: query.line,
                expected_value,
                over_probability,
                edge: over_probability.map(|p| edge_percent(p, odds)),
                market_odds: odds,
            }),
        };

        match &result {
            PropEdge::Priced(r) => tracing::debug!(
                family = query.family.name(),
                line = query.line,
                expected = r.expected_value,
                probability = r.over_probability,
                edge = r.edge,
                "Priced prop"
            ),
            PropEdge::Degenerate(d) => tracing::debug!(
                family = query.family.name(),
                line = query.line,
                reason = ?d.reason,
                "Prop could not be priced"
            ),
        }

        Ok(result)
    }

    fn expected_minutes(&self, context: &PropContext) -> f64 {
        context
            .expected_minutes
            .unwrap_or(self.config.default_expected_minutes)
    }

    /// Averages per-minute rates over games with playing time and projects
    /// them onto the expected minutes.
    fn rate_lambda(
        &self,
        games: &[GameLog],
        stat: StatKind,
        context: &PropContext,
    ) -> Result<RateEstimate, DegenerateReason> {
        if games.is_empty() {
            return Err(DegenerateReason::EmptyHistory);
        }

        let mut rates = Vec::with_capacity(games.len());
        for game in games {
            let value = game.stat(stat).ok_or(DegenerateReason::MissingStat)?;
            if !value.is_finite() || value < 0.0 || !game.minutes.is_finite() {
                return Err(DegenerateReason::MalformedLog);
            }
            // DNP
            if game.minutes <= 0.0 {
                continue;
            }
            rates.push(value / game.minutes);
        }

        let rate = mean(&rates).ok_or(DegenerateReason::ZeroMinutes)?;
        Ok(RateEstimate {
            lambda: rate * self.expected_minutes(context) * context.multiplier(),
        })
    }

    fn per_minute_rate(
        &self,
        games: &[GameLog],
        stat: StatKind,
        line: f64,
        context: &PropContext,
    ) -> Result<Estimate, PropError> {
        let estimate = match self.rate_lambda(games, stat, context) {
            Ok(estimate) => estimate,
            Err(reason) => return Ok(Estimate::insufficient(reason)),
        };

        Ok(Estimate::Priced {
            expected_value: estimate.lambda,
            over_probability: poisson_over(line, estimate.lambda)?,
            components: vec![ComponentEstimate {
                stat,
                expected: estimate.lambda,
            }],
            std_dev: Some(estimate.lambda.sqrt()),
            trials: None,
        })
    }

    fn normal(&self, games: &[GameLog], stat: StatKind, line: f64, context: &PropContext) -> Estimate {
        if games.is_empty() {
            return Estimate::insufficient(DegenerateReason::EmptyHistory);
        }

        let mut values = Vec::with_capacity(games.len());
        for game in games {
            match game.stat(stat) {
                Some(v) if v.is_finite() => values.push(v),
                Some(_) => return Estimate::insufficient(DegenerateReason::MalformedLog),
                None => return Estimate::insufficient(DegenerateReason::MissingStat),
            }
        }

        let (Some(sample_mean), Some(std_dev)) = (mean(&values), population_std_dev(&values)) else {
            return Estimate::insufficient(DegenerateReason::EmptyHistory);
        };
        let adjusted_mean = sample_mean * context.multiplier() + context.additive_adjustment();

        if std_dev <= f64::EPSILON {
            return Estimate::Degenerate {
                reason: DegenerateReason::ZeroVariance,
                expected_value: Some(adjusted_mean),
                over_probability: Some(if adjusted_mean > line { 1.0 } else { 0.0 }),
            };
        }

        let z_score = (line - adjusted_mean) / std_dev;
        Estimate::Priced {
            expected_value: adjusted_mean,
            over_probability: 1.0 - normal_cdf(z_score),
            components: vec![ComponentEstimate {
                stat,
                expected: adjusted_mean,
            }],
            std_dev: Some(std_dev),
            trials: None,
        }
    }

    fn bounded_trials(
        &self,
        games: &[GameLog],
        successes: StatKind,
        trials: StatKind,
        expected_trials: u32,
        line: f64,
    ) -> Result<Estimate, PropError> {
        if expected_trials == 0 {
            return Err(PropError::InvalidParameter(
                "expected_trials must be at least 1".to_string(),
            ));
        }
        if games.is_empty() {
            return Ok(Estimate::insufficient(DegenerateReason::EmptyHistory));
        }

        let mut total_successes = 0.0;
        let mut total_trials = 0.0;
        for game in games {
            let (Some(s), Some(t)) = (game.stat(successes), game.stat(trials)) else {
                return Ok(Estimate::insufficient(DegenerateReason::MissingStat));
            };
            if !s.is_finite() || !t.is_finite() || s < 0.0 || t < 0.0 || s > t {
                return Ok(Estimate::insufficient(DegenerateReason::MalformedLog));
            }
            total_successes += s;
            total_trials += t;
        }
        if total_trials <= 0.0 {
            return Ok(Estimate::insufficient(DegenerateReason::NoTrials));
        }

        let success_rate = total_successes / total_trials;
        let n = u64::from(expected_trials);
        let over_probability = if line < 0.0 {
            1.0
        } else {
            1.0 - binomial_cdf(line.floor() as u64, n, success_rate)?
        };
        let expected_value = n as f64 * success_rate;

        Ok(Estimate::Priced {
            expected_value,
            over_probability,
            components: vec![ComponentEstimate {
                stat: successes,
                expected: expected_value,
            }],
            std_dev: Some((expected_value * (1.0 - success_rate)).sqrt()),
            trials: None,
        })
    }

    fn compound_rate<R: Rng + ?Sized>(
        &self,
        games: &[GameLog],
        first: StatKind,
        second: StatKind,
        line: f64,
        context: &PropContext,
        rng: &mut R,
    ) -> Result<Estimate, PropError> {
        let first_rate = match self.rate_lambda(games, first, context) {
            Ok(estimate) => estimate,
            Err(reason) => return Ok(Estimate::insufficient(reason)),
        };
        let second_rate = match self.rate_lambda(games, second, context) {
            Ok(estimate) => estimate,
            Err(reason) => return Ok(Estimate::insufficient(reason)),
        };

        let trials = self.config.monte_carlo_trials;
        let over_probability =
            compound_poisson_over(&[first_rate.lambda, second_rate.lambda], line, trials, rng)?;
        let combined = first_rate.lambda + second_rate.lambda;

        Ok(Estimate::Priced {
            expected_value: combined,
            over_probability,
            components: vec![
                ComponentEstimate {
                    stat: first,
                    expected: first_rate.lambda,
                },
                ComponentEstimate {
                    stat: second,
                    expected: second_rate.lambda,
                },
            ],
            std_dev: Some(combined.sqrt()),
            trials: Some(trials),
        })
    }

    fn weighted_recent_form(
        &self,
        games: &[GameLog],
        attempts: StatKind,
        makes: StatKind,
        line: f64,
        context: &PropContext,
    ) -> Result<Estimate, PropError> {
        if games.is_empty() {
            return Ok(Estimate::insufficient(DegenerateReason::EmptyHistory));
        }

        let weights = &self.config.recent_form_weights;
        let window = &games[..games.len().min(weights.len())];

        let mut attempt_values = Vec::with_capacity(window.len());
        let mut make_values = Vec::with_capacity(window.len());
        for game in window {
            let (Some(a), Some(m)) = (game.stat(attempts), game.stat(makes)) else {
                return Ok(Estimate::insufficient(DegenerateReason::MissingStat));
            };
            if !a.is_finite() || !m.is_finite() || a < 0.0 || m < 0.0 || m > a {
                return Ok(Estimate::insufficient(DegenerateReason::MalformedLog));
            }
            attempt_values.push(a);
            make_values.push(m);
        }

        let (Some(expected_attempts), Some(weighted_makes)) = (
            weighted_mean(&attempt_values, weights),
            weighted_mean(&make_values, weights),
        ) else {
            return Ok(Estimate::insufficient(DegenerateReason::EmptyHistory));
        };

        let make_rate = if expected_attempts > 0.0 {
            weighted_makes / expected_attempts
        } else {
            self.config.default_make_rate
        };
        let lambda = expected_attempts * make_rate * context.multiplier();

        Ok(Estimate::Priced {
            expected_value: lambda,
            over_probability: poisson_over(line, lambda)?,
            components: vec![
                ComponentEstimate {
                    stat: attempts,
                    expected: expected_attempts * context.multiplier(),
                },
                ComponentEstimate {
                    stat: makes,
                    expected: lambda,
                },
            ],
            std_dev: Some(lambda.sqrt()),
            trials: None,
        })
    }

    fn empirical_bootstrap<R: Rng + ?Sized>(
        &self,
        samples: &[f64],
        draws: Option<usize>,
        line: f64,
        rng: &mut R,
    ) -> Result<Estimate, PropError> {
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(PropError::InvalidParameter(
                "bootstrap samples must be finite".to_string(),
            ));
        }
        if samples.is_empty() {
            return Ok(Estimate::insufficient(DegenerateReason::EmptyHistory));
        }
        let draws = draws.unwrap_or(samples.len());
        if draws == 0 {
            return Ok(Estimate::insufficient(DegenerateReason::NoTrials));
        }

        let trials = self.config.monte_carlo_trials;
        let Some(summary) = bootstrap_over(samples, draws, line, trials, rng) else {
            return Ok(Estimate::insufficient(DegenerateReason::EmptyHistory));
        };

        Ok(Estimate::Priced {
            expected_value: summary.mean,
            over_probability: summary.over_probability,
            components: Vec::new(),
            std_dev: Some(summary.std_dev),
            trials: Some(trials),
        })
    }
}

/// `P(X >= ceil(line))` for `X ~ Poisson(lambda)`, i.e.
/// `1 - poissonCDF(ceil(line) - 1, lambda)`.
fn poisson_over(line: f64, lambda: f64) -> Result<f64, PropError> {
    let threshold = line.ceil();
    if threshold <= 0.0 {
        return Ok(1.0);
    }
    Ok(1.0 - poisson_cdf(threshold as u64 - 1, lambda)?)
}
