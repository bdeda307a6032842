//! BRVM Core: technical analysis and opportunity ranking for a universe of
//! daily price series.
//!
//! This crate contains the whole analysis pipeline:
//! - Domain types (bars, validated series, the five-level signal scale)
//! - Indicators (moving averages, Wilder oscillator, rate of change)
//! - Signal classification from the latest indicator snapshot
//! - Opportunity scoring inside the band of each signal
//! - Fixed-fractional position sizing with stop, target and trailing stop
//! - Ranking, filtering and market-wide summary statistics
//!
//! Loading files and rendering output are left to the caller.

pub mod analysis;
pub mod classify;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod explain;
pub mod indicators;
pub mod opportunity;
pub mod ranking;
pub mod risk;
pub mod scoring;
pub mod summary;

pub use analysis::{analyze_universe, AnalysisReport, Analyzer, Exclusion};
pub use classify::{SignalClassifier, SignalThresholds};
pub use config::{AnalysisConfig, ConfigError};
pub use domain::{PriceBar, PriceSeries, SeriesError, Signal, Symbol};
pub use engine::{compute_indicators, latest_indicators, IndicatorConfig, IndicatorSet};
pub use error::ExclusionReason;
pub use explain::Observation;
pub use opportunity::Opportunity;
pub use ranking::RankFilter;
pub use risk::{RiskManager, RiskPolicy, RiskRecommendation};
pub use scoring::{OpportunityScorer, ScoringConfig};
pub use summary::MarketSummary;
