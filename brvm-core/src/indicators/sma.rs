//! Simple Moving Average (SMA).
//!
//! Rolling mean of closes over `period` bars.
//! Lookback: period - 1 (first valid value at index period-1).

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        let window_sum = |end: usize| -> f64 {
            bars[(end + 1 - self.period)..=end].iter().map(|b| b.close).sum()
        };

        let mut sum = window_sum(self.period - 1);
        result[self.period - 1] = sum / self.period as f64;

        for i in self.period..n {
            // Re-anchor once per window so rounding never accumulates.
            if (i + 1) % self.period == 0 {
                sum = window_sum(i);
            } else {
                sum += bars[i].close - bars[i - self.period].close;
            }
            result[i] = sum / self.period as f64;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = Sma::new(5).compute(&bars);

        assert_eq!(result.len(), 7);
        for v in &result[..4] {
            assert!(v.is_nan());
        }
        // mean(10..=14) = 12
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Sma::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_matches_naive_mean_on_long_series() {
        let closes: Vec<f64> = (0..500).map(|i| 1_000.0 + ((i * 37) % 101) as f64 * 3.7).collect();
        let bars = make_bars(&closes);
        let result = Sma::new(20).compute(&bars);
        for i in 19..closes.len() {
            let naive = closes[i - 19..=i].iter().sum::<f64>() / 20.0;
            assert_approx(result[i], naive, 1e-9);
        }
    }

    #[test]
    fn sma_lookback() {
        assert_eq!(Sma::new(20).lookback(), 19);
        assert_eq!(Sma::new(20).required_bars(), 20);
        assert_eq!(Sma::new(1).lookback(), 0);
    }

    #[test]
    fn sma_too_few_bars() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = Sma::new(5).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
