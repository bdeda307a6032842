//! Signal classifier: threshold rules over the latest indicator snapshot.
//!
//! Rules are evaluated in a fixed priority order, first match wins:
//! 1. oscillator <= oversold   AND short MA > long MA  → StrongBuy
//! 2. short MA > long MA       AND close > short MA    → Buy
//! 3. oscillator >= overbought AND short MA < long MA  → StrongSell
//! 4. short MA < long MA       AND close < short MA    → Sell
//! 5. otherwise                                        → Hold
//!
//! Classification is stateless: the same snapshot always yields the same signal.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::Signal;
use crate::engine::IndicatorSet;
use crate::error::ExclusionReason;

/// Oscillator thresholds for the oversold/overbought rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl SignalThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(self.oversold) || !in_range(self.overbought) {
            return Err(ConfigError::InvalidThresholds(format!(
                "oversold {} and overbought {} must lie in [0, 100]",
                self.oversold, self.overbought
            )));
        }
        if self.oversold >= self.overbought {
            return Err(ConfigError::InvalidThresholds(format!(
                "oversold {} must be below overbought {}",
                self.oversold, self.overbought
            )));
        }
        Ok(())
    }
}

/// Maps an [`IndicatorSet`] to exactly one [`Signal`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalClassifier {
    thresholds: SignalThresholds,
}

impl SignalClassifier {
    pub fn new(thresholds: SignalThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &SignalThresholds {
        &self.thresholds
    }

    /// Classify a snapshot.
    ///
    /// Fails with [`ExclusionReason::MissingIndicator`] if any input is not finite.
    pub fn classify(&self, set: &IndicatorSet) -> Result<Signal, ExclusionReason> {
        require_finite(set)?;

        let osc = set.oscillator;
        let bullish = set.is_bullish_cross();
        let bearish = set.is_bearish_cross();

        let signal = if osc <= self.thresholds.oversold && bullish {
            Signal::StrongBuy
        } else if bullish && set.close > set.short_ma {
            Signal::Buy
        } else if osc >= self.thresholds.overbought && bearish {
            Signal::StrongSell
        } else if bearish && set.close < set.short_ma {
            Signal::Sell
        } else {
            Signal::Hold
        };
        Ok(signal)
    }

    /// Classify the most recent snapshot of a history.
    pub fn classify_latest(&self, sets: &[IndicatorSet]) -> Result<Signal, ExclusionReason> {
        let latest = sets
            .last()
            .ok_or_else(|| ExclusionReason::missing("indicator set"))?;
        self.classify(latest)
    }
}

fn require_finite(set: &IndicatorSet) -> Result<(), ExclusionReason> {
    let fields = [
        ("close", set.close),
        ("short moving average", set.short_ma),
        ("long moving average", set.long_ma),
        ("oscillator", set.oscillator),
    ];
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, _)) => Err(ExclusionReason::missing(name)),
        None => Ok(()),
    }
}
