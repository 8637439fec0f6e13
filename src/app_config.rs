use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::memory::MatchOptions;
use crate::review::aggregator::AggregationWeights;

/// Review configuration module
/// This module handles the library configuration: loading it from JSON,
/// filling defaults and validating the values before a review runs.
/// Represents the review configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Translation memory lookup settings
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Review pipeline settings
    #[serde(default)]
    pub review: ReviewSettings,

    /// Base dimension weights
    #[serde(default)]
    pub weights: AggregationWeights,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation memory lookup settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchingConfig {
    /// Minimum similarity (0-100) for fuzzy matches
    #[serde(default = "default_match_threshold")]
    pub threshold: f64,

    /// Maximum number of matches returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_match_threshold(),
            top_k: default_top_k(),
        }
    }
}

impl MatchingConfig {
    /// Lookup options for the matcher
    pub fn options(&self) -> MatchOptions {
        MatchOptions::new(self.threshold, self.top_k)
    }
}

/// Review pipeline settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReviewSettings {
    /// Minimum partial-match similarity (0-100) for locating a term or its translation
    #[serde(default = "default_term_match_threshold")]
    pub term_match_threshold: f64,

    /// Terminology scores at or below this value skip grammar and style
    #[serde(default = "default_critical_terminology_score")]
    pub critical_terminology_score: f64,

    /// Upper bound on a single judgment call, in milliseconds
    #[serde(default = "default_judgment_timeout_ms")]
    pub judgment_timeout_ms: u64,

    /// Await the delegated evaluators together instead of one after another
    #[serde(default)]
    pub concurrent_delegation: bool,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            term_match_threshold: default_term_match_threshold(),
            critical_terminology_score: default_critical_terminology_score(),
            judgment_timeout_ms: default_judgment_timeout_ms(),
            concurrent_delegation: false,
        }
    }
}

impl ReviewSettings {
    /// Judgment timeout as a duration
    pub fn judgment_timeout(&self) -> Duration {
        Duration::from_millis(self.judgment_timeout_ms)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter a host can hand to its logger
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_match_threshold() -> f64 {
    80.0
}

fn default_top_k() -> usize {
    3
}

fn default_term_match_threshold() -> f64 {
    75.0
}

fn default_critical_terminology_score() -> f64 {
    -0.5
}

fn default_judgment_timeout_ms() -> u64 {
    30_000
}

impl Config {
    /// Parse a configuration from JSON text; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).context("Failed to parse configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.matching.threshold) {
            return Err(anyhow!(
                "Match threshold must be between 0 and 100, got {}",
                self.matching.threshold
            ));
        }
        if self.matching.top_k == 0 {
            return Err(anyhow!("top_k must be at least 1"));
        }
        if !(0.0..=100.0).contains(&self.review.term_match_threshold) {
            return Err(anyhow!(
                "Term match threshold must be between 0 and 100, got {}",
                self.review.term_match_threshold
            ));
        }
        if !(-1.0..=1.0).contains(&self.review.critical_terminology_score) {
            return Err(anyhow!(
                "Critical terminology score must be between -1 and 1, got {}",
                self.review.critical_terminology_score
            ));
        }
        if self.review.judgment_timeout_ms == 0 {
            return Err(anyhow!("Judgment timeout must be greater than zero"));
        }
        self.weights.validate()?;

        Ok(())
    }
}
