//! Indicator implementations and the `Indicator` trait.
//!
//! Indicators are pure functions: bar history in, numeric series out. Each
//! series has the same length as the input, with `f64::NAN` during warmup.
//! The engine computes every series once per instrument and then slices
//! them into per-date [`IndicatorSet`](crate::engine::IndicatorSet) snapshots.

pub mod roc;
pub mod rsi;
pub mod sma;

pub use roc::Roc;
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::PriceBar;

/// A technical indicator over a bar series.
///
/// # Look-ahead guard
/// No value at bar t may depend on bars t+1 or later. Computing on a
/// truncated series must reproduce the prefix of the full-series output.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Index of the first bar that can carry a valid value.
    fn lookback(&self) -> usize;

    /// Minimum number of bars needed to produce at least one value.
    fn required_bars(&self) -> usize {
        self.lookback() + 1
    }

    /// Compute the indicator over the entire series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`; the first
    /// `lookback()` values are `f64::NAN`.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Synthetic daily bars from close prices, for tests.
///
/// open = previous close (or close for the first bar), high/low one unit
/// around the open/close range.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.01),
                close,
                volume: 1000,
            }
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
