//! Analysis pipeline: indicators, signal, score and risk for every
//! instrument, then ranking of the survivors.
//!
//! Per-instrument work shares only the immutable configuration and fans out
//! over rayon's pool. Failures are isolated per instrument and reported as
//! [`Exclusion`]s. Configuration errors abort before any instrument is touched.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::classify::SignalClassifier;
use crate::config::{AnalysisConfig, ConfigError};
use crate::domain::{PriceSeries, Symbol};
use crate::engine::compute_indicators;
use crate::error::ExclusionReason;
use crate::explain::observe;
use crate::opportunity::Opportunity;
use crate::ranking::rank;
use crate::risk::RiskManager;
use crate::scoring::OpportunityScorer;
use crate::summary::MarketSummary;

/// An instrument left out of the ranking, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub symbol: Symbol,
    pub reason: ExclusionReason,
}

/// Everything a presentation layer needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// BLAKE3 over configuration and input series.
    pub run_id: String,
    /// Most recent snapshot date across analyzed instruments.
    pub as_of: Option<NaiveDate>,
    /// Filtered and ranked.
    pub opportunities: Vec<Opportunity>,
    /// Sorted by symbol.
    pub excluded: Vec<Exclusion>,
    /// Computed over all analyzed instruments, before filtering.
    pub summary: MarketSummary,
}

/// A validated, ready-to-run pipeline.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    classifier: SignalClassifier,
    scorer: OpportunityScorer,
    risk: Option<RiskManager>,
}

impl Analyzer {
    /// Validates the whole configuration up front.
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let risk = config.risk.map(RiskManager::new).transpose()?;
        Ok(Self {
            classifier: SignalClassifier::new(config.thresholds),
            scorer: OpportunityScorer::new(config.scoring),
            risk,
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Full pipeline for one instrument.
    pub fn analyze_instrument(&self, series: &PriceSeries) -> Result<Opportunity, ExclusionReason> {
        let sets = compute_indicators(series, &self.config.indicators)?;
        let signal = self.classifier.classify_latest(&sets)?;
        let latest = sets
            .last()
            .copied()
            .ok_or_else(|| ExclusionReason::missing("indicator set"))?;

        let score = self.scorer.score(signal, &latest);
        let risk = self.risk.as_ref().map(|m| m.recommend(latest.close));

        log::debug!(
            "{}: {signal} score={score:.2} osc={:.1} short={:.2} long={:.2}",
            series.symbol(),
            latest.oscillator,
            latest.short_ma,
            latest.long_ma
        );

        Ok(Opportunity {
            symbol: series.symbol().to_string(),
            close: latest.close,
            indicators: latest,
            signal,
            score,
            risk,
            rationale: observe(&latest, self.classifier.thresholds()),
        })
    }

    /// Analyze a universe and rank the results.
    pub fn analyze(&self, universe: &[PriceSeries]) -> AnalysisReport {
        log::info!(
            "analyzing {} instruments ({})",
            universe.len(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        let outcomes: Vec<(&PriceSeries, Result<Opportunity, ExclusionReason>)> =
            if self.config.parallel {
                universe
                    .par_iter()
                    .map(|s| (s, self.analyze_instrument(s)))
                    .collect()
            } else {
                universe
                    .iter()
                    .map(|s| (s, self.analyze_instrument(s)))
                    .collect()
            };

        let mut analyzed = Vec::with_capacity(outcomes.len());
        let mut excluded = Vec::new();
        for (series, outcome) in outcomes {
            match outcome {
                Ok(opportunity) => analyzed.push(opportunity),
                Err(reason) => {
                    log::warn!("{} excluded: {reason}", series.symbol());
                    excluded.push(Exclusion {
                        symbol: series.symbol().to_string(),
                        reason,
                    });
                }
            }
        }
        excluded.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let summary = MarketSummary::from_opportunities(&analyzed, excluded.len());
        let as_of = analyzed.iter().map(Opportunity::as_of).max();
        let opportunities = rank(analyzed, &self.config.filter);

        log::info!(
            "{} analyzed, {} excluded, {} ranked after filters",
            summary.analyzed,
            summary.excluded,
            opportunities.len()
        );

        AnalysisReport {
            run_id: run_id(&self.config, universe),
            as_of,
            opportunities,
            excluded,
            summary,
        }
    }
}

/// Validate `config`, then analyze and rank `universe`.
pub fn analyze_universe(
    universe: &[PriceSeries],
    config: &AnalysisConfig,
) -> Result<AnalysisReport, ConfigError> {
    Ok(Analyzer::new(config.clone())?.analyze(universe))
}

/// Content hash of the configuration and every input bar.
pub fn run_id(config: &AnalysisConfig, universe: &[PriceSeries]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(config.fingerprint().as_bytes());
    for series in universe {
        hasher.update(series.symbol().as_bytes());
        hasher.update(&(series.len() as u64).to_le_bytes());
        for bar in series.bars() {
            hasher.update(bar.date.to_string().as_bytes());
            for price in [bar.open, bar.high, bar.low, bar.close] {
                hasher.update(&price.to_le_bytes());
            }
            hasher.update(&bar.volume.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
