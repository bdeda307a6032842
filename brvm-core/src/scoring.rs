//! Opportunity scorer: Signal + indicators → conviction score in [0, 100].
//!
//! The signal fixes the 20-point bucket; the position inside the bucket is a
//! linear blend of two terms, each normalized to [-1, 1]:
//!
//! ```text
//! osc_term    = (50 - oscillator) / 50                      oversold → +1
//! spread_term = clamp(((short - long) / long) / saturation, -1, 1)
//! blend       = (w_osc * osc_term + w_spread * spread_term) / (w_osc + w_spread)
//! score       = lower + (blend + 1) / 2 * 20
//! ```
//!
//! Dividing the spread by the long average keeps instruments priced at 500 and
//! 50 000 on the same scale. Half-open buckets are capped at
//! `upper - BUCKET_EPSILON`, so the score always maps back to its signal.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::Signal;
use crate::engine::IndicatorSet;
use crate::indicators::rsi::RSI_MIDPOINT;

/// Gap kept below the upper bound of half-open buckets.
pub const BUCKET_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub oscillator_weight: f64,
    pub spread_weight: f64,
    /// Relative MA spread at which the spread term saturates (0.10 = 10%).
    pub spread_saturation: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            oscillator_weight: 0.5,
            spread_weight: 0.5,
            spread_saturation: 0.10,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights_ok = [self.oscillator_weight, self.spread_weight]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        if !weights_ok || self.oscillator_weight + self.spread_weight <= 0.0 {
            return Err(ConfigError::InvalidScoring(format!(
                "weights must be non-negative with a positive sum (oscillator {}, spread {})",
                self.oscillator_weight, self.spread_weight
            )));
        }
        if !(self.spread_saturation.is_finite() && self.spread_saturation > 0.0) {
            return Err(ConfigError::InvalidScoring(format!(
                "spread_saturation must be positive, got {}",
                self.spread_saturation
            )));
        }
        Ok(())
    }
}

/// Scores classified snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpportunityScorer {
    config: ScoringConfig,
}

impl OpportunityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Position inside the bucket, in [0, 1]. Higher = more bullish.
    pub fn conviction(&self, set: &IndicatorSet) -> f64 {
        let osc_term = ((RSI_MIDPOINT - set.oscillator) / RSI_MIDPOINT).clamp(-1.0, 1.0);
        let spread_term = (set.ma_spread() / self.config.spread_saturation).clamp(-1.0, 1.0);

        let total = self.config.oscillator_weight + self.config.spread_weight;
        let blend = (self.config.oscillator_weight * osc_term
            + self.config.spread_weight * spread_term)
            / total;

        let t = (blend + 1.0) / 2.0;
        if t.is_finite() {
            t.clamp(0.0, 1.0)
        } else {
            0.5
        }
    }

    /// Score for `signal` given its snapshot. Always inside `signal.score_range()`.
    pub fn score(&self, signal: Signal, set: &IndicatorSet) -> f64 {
        let (lower, upper) = signal.score_range();
        let raw = lower + self.conviction(set) * (upper - lower);
        match signal {
            Signal::StrongBuy => raw.min(upper),
            Signal::Buy | Signal::Hold | Signal::Sell | Signal::StrongSell => {
                raw.min(upper - BUCKET_EPSILON)
            }
        }
    }
}
