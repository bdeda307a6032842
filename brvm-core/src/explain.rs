//! Rationale: plain-language observations behind a signal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::SignalThresholds;
use crate::engine::IndicatorSet;

/// Oscillator level below which an instrument counts as moderately oversold.
const MODERATE_OVERSOLD: f64 = 40.0;
/// Recent-change levels, in percent.
const STRONG_MOVE_PCT: f64 = 5.0;
const MODERATE_MOVE_PCT: f64 = 2.0;

/// One observation about an instrument's latest indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    DeeplyOversold { oscillator: f64 },
    Oversold { oscillator: f64 },
    Overbought { oscillator: f64 },
    BullishTrend,
    BearishTrend,
    StrongRally { change_pct: f64 },
    ModerateRally { change_pct: f64 },
    SharpDrop { change_pct: f64 },
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::DeeplyOversold { oscillator } => {
                write!(f, "oscillator {oscillator:.1}: deeply oversold")
            }
            Observation::Oversold { oscillator } => {
                write!(f, "oscillator {oscillator:.1}: moderately oversold")
            }
            Observation::Overbought { oscillator } => {
                write!(f, "oscillator {oscillator:.1}: overbought, correction risk")
            }
            Observation::BullishTrend => f.write_str("uptrend confirmed (short MA above long MA)"),
            Observation::BearishTrend => {
                f.write_str("downtrend or flat (short MA at or below long MA)")
            }
            Observation::StrongRally { change_pct } => {
                write!(f, "strong recent rise ({change_pct:+.1}%)")
            }
            Observation::ModerateRally { change_pct } => {
                write!(f, "moderate recent rise ({change_pct:+.1}%)")
            }
            Observation::SharpDrop { change_pct } => {
                write!(f, "sharp recent fall ({change_pct:+.1}%)")
            }
        }
    }
}

/// Observations for a snapshot, in a fixed order: oscillator, trend, recent change.
pub fn observe(set: &IndicatorSet, thresholds: &SignalThresholds) -> Vec<Observation> {
    let mut out = Vec::with_capacity(3);
    let oscillator = set.oscillator;

    if oscillator < thresholds.oversold {
        out.push(Observation::DeeplyOversold { oscillator });
    } else if oscillator < MODERATE_OVERSOLD.max(thresholds.oversold) {
        out.push(Observation::Oversold { oscillator });
    } else if oscillator > thresholds.overbought {
        out.push(Observation::Overbought { oscillator });
    }

    if set.is_bullish_cross() {
        out.push(Observation::BullishTrend);
    } else {
        out.push(Observation::BearishTrend);
    }

    let change_pct = set.change_pct;
    if change_pct > STRONG_MOVE_PCT {
        out.push(Observation::StrongRally { change_pct });
    } else if change_pct > MODERATE_MOVE_PCT {
        out.push(Observation::ModerateRally { change_pct });
    } else if change_pct < -STRONG_MOVE_PCT {
        out.push(Observation::SharpDrop { change_pct });
    }

    out
}

/// Observations joined into one line, e.g. for a table column.
pub fn summarize(observations: &[Observation]) -> String {
    observations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}
