//! Market summary: aggregate statistics over every analyzed instrument.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Signal, Symbol};
use crate::opportunity::Opportunity;
use crate::ranking::compare;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub analyzed: usize,
    pub excluded: usize,
    /// One entry per signal, zero included.
    pub signal_counts: BTreeMap<Signal, usize>,
    pub mean_close: Option<f64>,
    pub mean_oscillator: Option<f64>,
    pub mean_score: Option<f64>,
    /// Top of the unfiltered ranking.
    pub best: Option<Symbol>,
    pub max_score: Option<f64>,
}

impl MarketSummary {
    /// Summarize the full (unfiltered) opportunity set.
    pub fn from_opportunities(opportunities: &[Opportunity], excluded: usize) -> Self {
        let mut signal_counts: BTreeMap<Signal, usize> =
            Signal::ALL.into_iter().map(|s| (s, 0)).collect();
        for o in opportunities {
            *signal_counts.entry(o.signal).or_default() += 1;
        }

        let mean = |f: fn(&Opportunity) -> f64| -> Option<f64> {
            if opportunities.is_empty() {
                None
            } else {
                Some(opportunities.iter().map(f).sum::<f64>() / opportunities.len() as f64)
            }
        };

        let top = opportunities.iter().min_by(|a, b| compare(a, b));

        Self {
            analyzed: opportunities.len(),
            excluded,
            signal_counts,
            mean_close: mean(|o| o.close),
            mean_oscillator: mean(|o| o.indicators.oscillator),
            mean_score: mean(|o| o.score),
            best: top.map(|o| o.symbol.clone()),
            max_score: top.map(|o| o.score),
        }
    }

    pub fn count(&self, signal: Signal) -> usize {
        self.signal_counts.get(&signal).copied().unwrap_or(0)
    }

    /// Instruments classified StrongBuy or Buy.
    pub fn bullish_count(&self) -> usize {
        self.count(Signal::StrongBuy) + self.count(Signal::Buy)
    }
}
