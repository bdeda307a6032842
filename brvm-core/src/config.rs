//! Serializable analysis configuration.
//!
//! One immutable [`AnalysisConfig`] value is threaded through every component
//! of a run; there is no process-wide state. Every field has a default, so a
//! TOML file only needs to name what it overrides:
//!
//! ```toml
//! [indicators]
//! short_window = 10
//!
//! [risk]
//! capital = 2500000.0
//!
//! [filter]
//! min_score = 60.0
//! allowed_signals = ["STRONG_BUY", "BUY"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::SignalThresholds;
use crate::engine::IndicatorConfig;
use crate::ranking::RankFilter;
use crate::risk::RiskPolicy;
use crate::scoring::ScoringConfig;

/// Run-level configuration errors. Any of these aborts the run before
/// per-instrument work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid risk policy: {0}")]
    InvalidRiskPolicy(String),

    #[error("invalid window '{name}': {reason}")]
    InvalidWindow { name: &'static str, reason: String },

    #[error("invalid signal thresholds: {0}")]
    InvalidThresholds(String),

    #[error("invalid scoring weights: {0}")]
    InvalidScoring(String),

    #[error("invalid rank filter: {0}")]
    InvalidFilter(String),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fan instruments out over the rayon pool instead of a sequential loop.
    pub parallel: bool,
    pub indicators: IndicatorConfig,
    pub thresholds: SignalThresholds,
    pub scoring: ScoringConfig,
    /// `None` skips position sizing; opportunities carry no recommendation.
    pub risk: Option<RiskPolicy>,
    pub filter: RankFilter,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            indicators: IndicatorConfig::default(),
            thresholds: SignalThresholds::default(),
            scoring: ScoringConfig::default(),
            risk: Some(RiskPolicy::default()),
            filter: RankFilter::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section. Called by the pipeline before any instrument is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.thresholds.validate()?;
        self.scoring.validate()?;
        if let Some(risk) = &self.risk {
            risk.validate()?;
        }
        self.filter.validate()
    }

    pub fn with_capital(mut self, capital: f64) -> Self {
        let policy = self.risk.unwrap_or_default();
        self.risk = Some(RiskPolicy { capital, ..policy });
        self
    }

    pub fn without_risk(mut self) -> Self {
        self.risk = None;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Deterministic BLAKE3 hash of the analysis-relevant settings.
    ///
    /// `parallel` is excluded: it changes scheduling, never results.
    pub fn fingerprint(&self) -> String {
        let canonical = Self {
            parallel: false,
            ..self.clone()
        };
        let json = serde_json::to_vec(&canonical).expect("AnalysisConfig serialization failed");
        blake3::hash(&json).to_hex().to_string()
    }
}
