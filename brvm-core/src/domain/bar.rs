//! PriceBar: one trading day for one instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV record.
///
/// Bars carry no symbol: they are owned by a [`PriceSeries`](super::PriceSeries)
/// which holds the instrument identifier once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar where open, high, low and close all equal `close`.
    ///
    /// SikaFinance exports sometimes carry only the closing price.
    pub fn from_close(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self::new(date, close, close, close, close, volume)
    }

    /// True when every price field is finite and strictly positive.
    pub fn has_positive_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }

    /// OHLC consistency: high is the top of the range and low the bottom.
    pub fn is_sane(&self) -> bool {
        self.has_positive_prices()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            15_000.0,
            15_400.0,
            14_900.0,
            15_250.0,
            1_320,
        )
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 14_800.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_rejects_non_positive_close() {
        let mut bar = sample_bar();
        bar.close = 0.0;
        assert!(!bar.has_positive_prices());
        bar.close = f64::NAN;
        assert!(!bar.has_positive_prices());
    }

    #[test]
    fn from_close_fills_ohlc() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bar = PriceBar::from_close(date, 2_500.0, 0);
        assert_eq!(bar.open, 2_500.0);
        assert_eq!(bar.high, 2_500.0);
        assert_eq!(bar.low, 2_500.0);
        assert!(bar.is_sane());
    }
}
