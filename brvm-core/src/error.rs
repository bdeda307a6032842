//! Instrument-level failures.
//!
//! These isolate a single instrument: it is excluded from ranking and
//! reported back to the caller, while the rest of the run proceeds.
//! Run-level failures live in [`ConfigError`](crate::config::ConfigError).

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExclusionReason {
    /// The series is shorter than the largest indicator window.
    #[error("insufficient history: {available} bars available, {required} required")]
    InsufficientHistory { required: usize, available: usize },

    /// An indicator value needed for classification is absent or not finite.
    #[error("missing indicator: {indicator}")]
    MissingIndicator { indicator: String },

    /// Indicator windows that cannot be computed (zero or inverted).
    #[error("invalid indicator config: {reason}")]
    InvalidConfig { reason: String },
}

impl ExclusionReason {
    /// Stable reason code for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            ExclusionReason::InsufficientHistory { .. } => "INSUFFICIENT_HISTORY",
            ExclusionReason::MissingIndicator { .. } => "MISSING_INDICATOR",
            ExclusionReason::InvalidConfig { .. } => "INVALID_CONFIG",
        }
    }

    pub(crate) fn missing(indicator: &str) -> Self {
        ExclusionReason::MissingIndicator {
            indicator: indicator.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_serde_tag() {
        let reasons = [
            ExclusionReason::InsufficientHistory {
                required: 51,
                available: 5,
            },
            ExclusionReason::missing("oscillator"),
            ExclusionReason::InvalidConfig {
                reason: "short_window must be at least 1".into(),
            },
        ];
        for reason in reasons {
            let json = serde_json::to_value(&reason).unwrap();
            assert_eq!(json["code"], reason.code());
        }
    }

    #[test]
    fn message_names_counts() {
        let reason = ExclusionReason::InsufficientHistory {
            required: 51,
            available: 5,
        };
        assert_eq!(
            reason.to_string(),
            "insufficient history: 5 bars available, 51 required"
        );
    }
}
