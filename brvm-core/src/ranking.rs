//! Ranker: filters opportunities and orders them by score.
//!
//! Order: score descending, then symbol ascending (lexicographic), so identical
//! inputs always produce the same sequence regardless of how they were computed.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::Signal;
use crate::opportunity::Opportunity;

/// Caller filters applied before sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankFilter {
    /// Opportunities scoring below this are dropped.
    pub min_score: f64,
    pub allowed_signals: BTreeSet<Signal>,
    /// Keep only the first `limit` entries after sorting.
    pub limit: Option<usize>,
}

impl Default for RankFilter {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            allowed_signals: Signal::ALL.into_iter().collect(),
            limit: None,
        }
    }
}

impl RankFilter {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_score.is_finite() {
            return Err(ConfigError::InvalidFilter(format!(
                "min_score must be finite, got {}",
                self.min_score
            )));
        }
        Ok(())
    }

    pub fn accepts(&self, opportunity: &Opportunity) -> bool {
        opportunity.score >= self.min_score && self.allowed_signals.contains(&opportunity.signal)
    }
}

/// Ranking order: higher score first, ties broken by symbol ascending.
pub fn compare(a: &Opportunity, b: &Opportunity) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Sort in ranking order without filtering.
pub fn sort_opportunities(opportunities: &mut [Opportunity]) {
    opportunities.sort_by(compare);
}

/// Filter, sort and truncate.
pub fn rank(opportunities: Vec<Opportunity>, filter: &RankFilter) -> Vec<Opportunity> {
    let mut ranked: Vec<Opportunity> = opportunities
        .into_iter()
        .filter(|o| filter.accepts(o))
        .collect();
    sort_opportunities(&mut ranked);
    if let Some(limit) = filter.limit {
        ranked.truncate(limit);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::IndicatorSet;
    use chrono::NaiveDate;

    fn opp(symbol: &str, signal: Signal, score: f64) -> Opportunity {
        let indicators = IndicatorSet {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: 1_000.0,
            short_ma: 1_000.0,
            long_ma: 1_000.0,
            oscillator: 50.0,
            change_pct: 0.0,
        };
        Opportunity {
            symbol: symbol.into(),
            close: indicators.close,
            indicators,
            signal,
            score,
            risk: None,
            rationale: Vec::new(),
        }
    }

    fn symbols(ranked: &[Opportunity]) -> Vec<&str> {
        ranked.iter().map(|o| o.symbol.as_str()).collect()
    }

    #[test]
    fn sorts_by_score_descending() {
        let ranked = rank(
            vec![
                opp("ORGT", Signal::Hold, 45.0),
                opp("SNTS", Signal::StrongBuy, 91.0),
                opp("SGBC", Signal::Buy, 66.0),
            ],
            &RankFilter::default(),
        );
        assert_eq!(symbols(&ranked), vec!["SNTS", "SGBC", "ORGT"]);
    }

    #[test]
    fn ties_break_by_symbol() {
        let ranked = rank(
            vec![
                opp("SNTS", Signal::Hold, 50.0),
                opp("BOAB", Signal::Hold, 50.0),
                opp("ETIT", Signal::Hold, 50.0),
            ],
            &RankFilter::default(),
        );
        assert_eq!(symbols(&ranked), vec!["BOAB", "ETIT", "SNTS"]);
    }

    #[test]
    fn min_score_filter_is_inclusive() {
        let filter = RankFilter {
            min_score: 60.0,
            ..RankFilter::default()
        };
        let ranked = rank(
            vec![
                opp("A", Signal::Buy, 60.0),
                opp("B", Signal::Hold, 59.9),
            ],
            &filter,
        );
        assert_eq!(symbols(&ranked), vec!["A"]);
    }

    #[test]
    fn signal_subset_filter() {
        let filter = RankFilter {
            allowed_signals: [Signal::StrongBuy, Signal::Buy].into_iter().collect(),
            ..RankFilter::default()
        };
        let ranked = rank(
            vec![
                opp("A", Signal::Sell, 30.0),
                opp("B", Signal::Buy, 70.0),
                opp("C", Signal::StrongBuy, 85.0),
                opp("D", Signal::Hold, 50.0),
            ],
            &filter,
        );
        assert_eq!(symbols(&ranked), vec!["C", "B"]);
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let filter = RankFilter {
            limit: Some(2),
            ..RankFilter::default()
        };
        let ranked = rank(
            vec![
                opp("A", Signal::Sell, 30.0),
                opp("B", Signal::Buy, 70.0),
                opp("C", Signal::StrongBuy, 85.0),
            ],
            &filter,
        );
        assert_eq!(symbols(&ranked), vec!["C", "B"]);
    }

    #[test]
    fn empty_allowed_set_filters_everything() {
        let filter = RankFilter {
            allowed_signals: BTreeSet::new(),
            ..RankFilter::default()
        };
        assert!(rank(vec![opp("A", Signal::Buy, 70.0)], &filter).is_empty());
    }

    #[test]
    fn default_allows_every_signal() {
        let filter = RankFilter::default();
        for signal in Signal::ALL {
            assert!(filter.allowed_signals.contains(&signal));
        }
        assert!(filter.validate().is_ok());
    }
}
