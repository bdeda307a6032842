//! Opportunity: the per-instrument result of one analysis run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Signal, Symbol};
use crate::engine::IndicatorSet;
use crate::explain::Observation;
use crate::risk::RiskRecommendation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub symbol: Symbol,
    /// Latest closing price (same as `indicators.close`).
    pub close: f64,
    pub indicators: IndicatorSet,
    pub signal: Signal,
    /// Conviction score in [0, 100], inside `signal.score_range()`.
    pub score: f64,
    /// Present when the run was configured with a risk policy.
    pub risk: Option<RiskRecommendation>,
    pub rationale: Vec<Observation>,
}

impl Opportunity {
    /// Date of the snapshot the opportunity is based on.
    pub fn as_of(&self) -> NaiveDate {
        self.indicators.date
    }

    /// True when score and signal agree.
    pub fn is_consistent(&self) -> bool {
        self.signal.contains_score(self.score)
    }
}
