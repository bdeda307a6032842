//! Signal: discrete directional classification of an instrument.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directional call for one instrument in one run.
///
/// Ordered from most bullish to most bearish; the derived `Ord` follows
/// declaration order, so `StrongBuy < Buy < ... < StrongSell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Signal {
    pub const ALL: [Signal; 5] = [
        Signal::StrongBuy,
        Signal::Buy,
        Signal::Hold,
        Signal::Sell,
        Signal::StrongSell,
    ];

    /// Score bucket `(lower, upper)` for this signal.
    ///
    /// All buckets are half-open `[lower, upper)` except `StrongBuy`,
    /// which includes 100.
    pub fn score_range(self) -> (f64, f64) {
        match self {
            Signal::StrongBuy => (80.0, 100.0),
            Signal::Buy => (60.0, 80.0),
            Signal::Hold => (40.0, 60.0),
            Signal::Sell => (20.0, 40.0),
            Signal::StrongSell => (0.0, 20.0),
        }
    }

    /// Whether `score` lies inside this signal's bucket.
    pub fn contains_score(self, score: f64) -> bool {
        let (lo, hi) = self.score_range();
        match self {
            Signal::StrongBuy => (lo..=hi).contains(&score),
            _ => (lo..hi).contains(&score),
        }
    }

    /// The signal whose bucket contains `score`, if any.
    pub fn for_score(score: f64) -> Option<Signal> {
        Signal::ALL.into_iter().find(|s| s.contains_score(score))
    }

    pub fn is_bullish(self) -> bool {
        matches!(self, Signal::StrongBuy | Signal::Buy)
    }

    pub fn is_bearish(self) -> bool {
        matches!(self, Signal::Sell | Signal::StrongSell)
    }

    /// Stable machine-readable name, identical to the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::StrongBuy => "STRONG_BUY",
            Signal::Buy => "BUY",
            Signal::Hold => "HOLD",
            Signal::Sell => "SELL",
            Signal::StrongSell => "STRONG_SELL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown signal '{0}' (expected one of STRONG_BUY, BUY, HOLD, SELL, STRONG_SELL)")]
pub struct ParseSignalError(pub String);

impl FromStr for Signal {
    type Err = ParseSignalError;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_uppercase)
            .collect();
        match normalized.as_str() {
            "STRONGBUY" => Ok(Signal::StrongBuy),
            "BUY" => Ok(Signal::Buy),
            "HOLD" => Ok(Signal::Hold),
            "SELL" => Ok(Signal::Sell),
            "STRONGSELL" => Ok(Signal::StrongSell),
            _ => Err(ParseSignalError(s.to_string())),
        }
    }
}
