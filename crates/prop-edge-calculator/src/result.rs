use betting_core::{AmericanOdds, StatKind};
use serde::{Deserialize, Serialize};

/// Expected value of one stat feeding the estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentEstimate {
    pub stat: StatKind,
    pub expected: f64,
}

/// A priced prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeResult {
    pub line: f64,
    pub expected_value: f64,
    pub over_probability: f64,
    pub under_probability: f64,
    pub implied_probability: f64,
    /// Percentage points of `over_probability` above the book's implied
    /// probability
    pub edge: f64,
    pub market_odds: AmericanOdds,
    pub components: Vec<ComponentEstimate>,
    pub std_dev: Option<f64>,
    /// Monte-Carlo trials behind the probability, for simulated families
    pub trials: Option<usize>,
}

/// Why a prop could not be priced normally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateReason {
    /// No recent games (or no bootstrap samples)
    EmptyHistory,
    /// A recent game lacks the stat the family reads
    MissingStat,
    /// A recent game carries a negative or non-finite value
    MalformedLog,
    /// Every recent game logged zero minutes
    ZeroMinutes,
    /// All recent values identical; the normal model has no spread
    ZeroVariance,
    /// No trials to estimate a rate or simulate from
    NoTrials,
}

impl DegenerateReason {
    /// True when the data was too thin to say anything (as opposed to a
    /// zero-spread sample that still implies a certain outcome).
    pub fn is_insufficient_data(&self) -> bool {
        !matches!(self, DegenerateReason::ZeroVariance)
    }
}

/// Flagged outcome for inputs the models cannot price.
///
/// `over_probability` is only set when the degenerate case still determines
/// it (zero variance: 1.0 if the mean clears the line, else 0.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegenerateResult {
    pub reason: DegenerateReason,
    pub line: f64,
    pub expected_value: Option<f64>,
    pub over_probability: Option<f64>,
    pub edge: Option<f64>,
    pub market_odds: AmericanOdds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PropEdge {
    Priced(EdgeResult),
    Degenerate(DegenerateResult),
}

impl PropEdge {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, PropEdge::Degenerate(_))
    }

    pub fn over_probability(&self) -> Option<f64> {
        match self {
            PropEdge::Priced(r) => Some(r.over_probability),
            PropEdge::Degenerate(d) => d.over_probability,
        }
    }

    pub fn edge(&self) -> Option<f64> {
        match self {
            PropEdge::Priced(r) => Some(r.edge),
            PropEdge::Degenerate(d) => d.edge,
        }
    }

    pub fn expected_value(&self) -> Option<f64> {
        match self {
            PropEdge::Priced(r) => Some(r.expected_value),
            PropEdge::Degenerate(d) => d.expected_value,
        }
    }

    pub fn as_priced(&self) -> Option<&EdgeResult> {
        match self {
            PropEdge::Priced(r) => Some(r),
            PropEdge::Degenerate(_) => None,
        }
    }
}
