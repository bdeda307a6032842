//! Indicator engine: turns a price series into per-date indicator snapshots.
//!
//! Every indicator series is computed once over the full history (see
//! [`crate::indicators`]), then sliced into immutable [`IndicatorSet`]s starting
//! at the first bar where every window is fully populated. No partial or
//! warmup values ever leave this module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::PriceSeries;
use crate::error::ExclusionReason;
use crate::indicators::{Indicator, Roc, Rsi, Sma};

/// Window lengths for the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub oscillator_period: usize,
    /// Bars over which `change_pct` is measured.
    pub change_lookback: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
            oscillator_period: 14,
            change_lookback: 14,
        }
    }
}

impl IndicatorConfig {
    /// Minimum series length for one complete [`IndicatorSet`].
    ///
    /// The oscillator and the rate of change each need one bar more than
    /// their period, since they work on close-to-close differences.
    pub fn required_bars(&self) -> usize {
        self.short_window
            .max(self.long_window)
            .max(self.oscillator_period + 1)
            .max(self.change_lookback + 1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("short_window", self.short_window),
            ("long_window", self.long_window),
            ("oscillator_period", self.oscillator_period),
            ("change_lookback", self.change_lookback),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(ConfigError::InvalidWindow {
                    name,
                    reason: "must be at least 1".into(),
                });
            }
        }
        if self.short_window > self.long_window {
            return Err(ConfigError::InvalidWindow {
                name: "short_window",
                reason: format!(
                    "{} exceeds long_window {}",
                    self.short_window, self.long_window
                ),
            });
        }
        Ok(())
    }
}

/// Indicator snapshot for one instrument on one date.
///
/// Built only from bars at or before `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub date: NaiveDate,
    pub close: f64,
    pub short_ma: f64,
    pub long_ma: f64,
    /// Momentum oscillator in [0, 100].
    pub oscillator: f64,
    /// Percentage change of the close over `change_lookback` bars.
    pub change_pct: f64,
}

impl IndicatorSet {
    /// Short/long moving-average spread relative to the long average.
    pub fn ma_spread(&self) -> f64 {
        (self.short_ma - self.long_ma) / self.long_ma
    }

    pub fn is_bullish_cross(&self) -> bool {
        self.short_ma > self.long_ma
    }

    pub fn is_bearish_cross(&self) -> bool {
        self.short_ma < self.long_ma
    }
}

/// Compute an [`IndicatorSet`] for every date from the first fully-warmed bar onward.
///
/// Fails with [`ExclusionReason::InvalidConfig`] for a config that does not
/// validate and with [`ExclusionReason::InsufficientHistory`] when the series
/// is shorter than [`IndicatorConfig::required_bars`].
pub fn compute_indicators(
    series: &PriceSeries,
    config: &IndicatorConfig,
) -> Result<Vec<IndicatorSet>, ExclusionReason> {
    config
        .validate()
        .map_err(|err| ExclusionReason::InvalidConfig {
            reason: err.to_string(),
        })?;

    let required = config.required_bars();
    let bars = series.bars();
    if bars.len() < required {
        return Err(ExclusionReason::InsufficientHistory {
            required,
            available: bars.len(),
        });
    }

    let short = Sma::new(config.short_window).compute(bars);
    let long = Sma::new(config.long_window).compute(bars);
    let oscillator = Rsi::new(config.oscillator_period).compute(bars);
    let change = Roc::new(config.change_lookback).compute(bars);

    let sets = (required - 1..bars.len())
        .map(|i| IndicatorSet {
            date: bars[i].date,
            close: bars[i].close,
            short_ma: short[i],
            long_ma: long[i],
            oscillator: oscillator[i],
            change_pct: change[i],
        })
        .collect();

    Ok(sets)
}

/// The most recent [`IndicatorSet`] of a series.
pub fn latest_indicators(
    series: &PriceSeries,
    config: &IndicatorConfig,
) -> Result<IndicatorSet, ExclusionReason> {
    compute_indicators(series, config)?
        .pop()
        .ok_or_else(|| ExclusionReason::missing("indicator set"))
}
