//! Relative Strength Index (RSI): the momentum oscillator.
//!
//! Wilder smoothing of average gains and average losses:
//! - seed: simple mean of the first `period` close-to-close gains/losses
//! - then `avg = avg * (period - 1) / period + x / period`
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), clamped to [0, 100].
//! Lookback: period (one extra bar is needed for the first change).
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both zero → 50.

use super::Indicator;
use crate::domain::PriceBar;

/// Neutral oscillator value, also returned for a perfectly flat window.
pub const RSI_MIDPOINT: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period + 1 {
            return result;
        }

        let split = |i: usize| -> (f64, f64) {
            let change = bars[i].close - bars[i - 1].close;
            (change.max(0.0), (-change).max(0.0))
        };

        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for i in 1..=self.period {
            let (gain, loss) = split(i);
            avg_gain += gain;
            avg_loss += loss;
        }
        avg_gain /= self.period as f64;
        avg_loss /= self.period as f64;
        result[self.period] = rsi_from_averages(avg_gain, avg_loss);

        let alpha = 1.0 / self.period as f64;
        for i in (self.period + 1)..n {
            let (gain, loss) = split(i);
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
            result[i] = rsi_from_averages(avg_gain, avg_loss);
        }

        result
    }
}

/// Oscillator value from smoothed average gain and loss.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        RSI_MIDPOINT
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
    }
}
