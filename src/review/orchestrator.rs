/*!
 * Review orchestrator.
 *
 * Drives a single review through its stages:
 * 1. Terminology: local, always first
 * 2. Grammar and Style: delegated, skipped when terminology is critical
 * 3. Memory fidelity: only when a usable translation memory was supplied
 * 4. Aggregation into an overall score, band and explanation
 *
 * The delegated stages can also be awaited together; their results are
 * merged in stage order so the report is the same either way.
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::errors::ReviewError;
use crate::memory::{LanguagePair, MemoryIndex};
use crate::providers::JudgmentCapability;

use super::aggregator::{QualityLabel, aggregate};
use super::dimension::{Dimension, DimensionScore};
use super::evaluators::{Evaluator, evaluate_terminology};
use super::machine::{ReviewStage, pending_delegated};
use super::state::{ReviewInputs, ReviewState, Terminology};

/// Final result of a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    /// Weighted score in [-1, 1]
    pub overall_score: f64,

    /// Band of the overall score
    pub quality_label: QualityLabel,

    /// Consolidated explanation; empty when nothing scored low
    pub explanation: String,

    /// One entry per participating dimension, in stage order
    pub breakdown: Vec<DimensionScore>,

    /// Effective weight applied to each dimension
    pub weights: BTreeMap<Dimension, f64>,

    /// Whether grammar and style were skipped
    pub terminated_early: bool,

    /// Language pair used for memory lookups, if any
    pub language_pair: Option<LanguagePair>,
}

impl ReviewReport {
    /// Score for one dimension, if it took part.
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionScore> {
        self.breakdown.iter().find(|s| s.name == dimension)
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("Overall: {:.2} ({})", self.overall_score, self.quality_label)];
        for score in &self.breakdown {
            if score.skipped {
                parts.push(format!("{}: skipped", score.name));
            } else {
                parts.push(format!("{}: {:.2}", score.name, score.score));
            }
        }
        parts.join(" | ")
    }
}

/// Runs reviews with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct ReviewPipeline {
    config: Config,
}

impl ReviewPipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a pipeline after validating the configuration.
    pub fn try_new(config: Config) -> Result<Self, ReviewError> {
        config
            .validate()
            .map_err(|e| ReviewError::Config(format!("{:#}", e)))?;
        Ok(Self::new(config))
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Review one translation.
    ///
    /// Judgment failures never fail the review; only contract violations in
    /// the stage sequence do.
    pub async fn review(
        &self,
        inputs: ReviewInputs,
        judge: &dyn JudgmentCapability,
    ) -> Result<ReviewReport, ReviewError> {
        let critical = self.config.review.critical_terminology_score;
        let mut state = ReviewState::new(inputs);

        let terminology = evaluate_terminology(&state, &self.config);
        let terminology_score = terminology.score;
        state.merge(terminology)?;

        if ReviewStage::is_critical(terminology_score, critical) {
            info!(
                "Terminology score {:.2} at or below {:.2}; skipping grammar and style",
                terminology_score, critical
            );
            state.merge(DimensionScore::skipped(Dimension::Grammar))?;
            state.merge(DimensionScore::skipped(Dimension::Style))?;
            state.mark_terminated_early();
        }

        if self.config.review.concurrent_delegation {
            self.run_concurrent(&mut state, judge, critical).await?;
        } else {
            self.run_sequential(&mut state, judge, critical).await?;
        }

        self.finish(&state)
    }

    async fn run_sequential(
        &self,
        state: &mut ReviewState,
        judge: &dyn JudgmentCapability,
        critical: f64,
    ) -> Result<(), ReviewError> {
        let mut stage = ReviewStage::Terminology.next(state, critical);
        while let Some(dimension) = stage.dimension() {
            debug!("Entering {} stage", stage);
            let score = Evaluator::for_dimension(dimension)
                .evaluate(state, judge, &self.config)
                .await;
            state.merge(score)?;
            stage = stage.next(state, critical);
        }
        Ok(())
    }

    async fn run_concurrent(
        &self,
        state: &mut ReviewState,
        judge: &dyn JudgmentCapability,
        critical: f64,
    ) -> Result<(), ReviewError> {
        let pending = pending_delegated(state, critical);
        debug!("Running {} delegated evaluators concurrently", pending.len());

        let scores = {
            let snapshot: &ReviewState = state;
            let futures = pending
                .iter()
                .map(|dimension| async move {
                    Evaluator::for_dimension(*dimension)
                        .evaluate(snapshot, judge, &self.config)
                        .await
                });
            join_all(futures).await
        };

        for score in scores {
            state.merge(score)?;
        }
        Ok(())
    }

    fn finish(&self, state: &ReviewState) -> Result<ReviewReport, ReviewError> {
        let breakdown = state.breakdown()?;
        let aggregation = aggregate(&breakdown, &self.config.weights);

        let report = ReviewReport {
            overall_score: aggregation.overall_score,
            quality_label: aggregation.quality_label,
            explanation: aggregation.explanation,
            breakdown,
            weights: aggregation.weights,
            terminated_early: state.terminated_early(),
            language_pair: state.memory_lookup().map(|(_, pair)| pair.clone()),
        };

        info!("Review complete. {}", report.summary());
        Ok(report)
    }

    /// Blocking wrapper around [`ReviewPipeline::review`].
    ///
    /// Builds its own single-threaded runtime, so it must not be called from
    /// inside an async context.
    pub fn review_blocking(
        &self,
        inputs: ReviewInputs,
        judge: &dyn JudgmentCapability,
    ) -> Result<ReviewReport, ReviewError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.review(inputs, judge))
    }
}

/// Review one translation with the default configuration.
pub async fn run_review(
    source_text: &str,
    target_text: &str,
    terminology: &Terminology,
    style_directives: &str,
    memory: Option<Arc<MemoryIndex>>,
    language_pair: Option<LanguagePair>,
    judge: &dyn JudgmentCapability,
) -> Result<ReviewReport, ReviewError> {
    let mut inputs = ReviewInputs::new(source_text, target_text)
        .with_terminology(terminology.clone())
        .with_style_directives(style_directives);
    if let Some(memory) = memory {
        inputs = inputs.with_memory(memory, language_pair);
    }
    ReviewPipeline::default().review(inputs, judge).await
}
