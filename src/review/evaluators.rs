/*!
 * Dimension evaluators.
 *
 * Terminology is scored locally. Grammar and style are delegated to the
 * injected judgment capability. Memory fidelity consults the translation
 * memory first and only falls back to the judge for fuzzy matches.
 *
 * Evaluators read the review state and return a score; they never merge it
 * themselves. Judgment failures are absorbed here and turned into a neutral
 * score.
 */

use log::{debug, info, warn};

use crate::app_config::Config;
use crate::memory::similarity::{normalize_segment, partial_ratio};
use crate::memory::{MatchOptions, find_matches, memory_guidance};
use crate::providers::{JudgmentCapability, JudgmentContext, judge_with_timeout};

use super::dimension::{Dimension, DimensionScore};
use super::state::{ReviewState, Terminology};

/// Explanation used when an exact memory entry was ignored
pub const EXACT_MATCH_IGNORED: &str = "exact memory match available but not used.";

/// Score given when an exact memory entry was ignored
pub const EXACT_MATCH_IGNORED_SCORE: f64 = -0.5;

/// Closed set of evaluators, one per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluator {
    Terminology,
    Grammar,
    Style,
    MemoryFidelity,
}

impl Evaluator {
    /// Evaluator for a dimension.
    pub fn for_dimension(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Terminology => Self::Terminology,
            Dimension::Grammar => Self::Grammar,
            Dimension::Style => Self::Style,
            Dimension::MemoryFidelity => Self::MemoryFidelity,
        }
    }

    /// Dimension this evaluator scores.
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Terminology => Dimension::Terminology,
            Self::Grammar => Dimension::Grammar,
            Self::Style => Dimension::Style,
            Self::MemoryFidelity => Dimension::MemoryFidelity,
        }
    }

    /// Score one dimension from the review state.
    pub async fn evaluate(
        &self,
        state: &ReviewState,
        judge: &dyn JudgmentCapability,
        config: &Config,
    ) -> DimensionScore {
        match self {
            Self::Terminology => evaluate_terminology(state, config),
            Self::Grammar => {
                let inputs = state.inputs();
                let context = JudgmentContext::new(Dimension::Grammar, &inputs.target_text)
                    .with_source(&inputs.source_text);
                delegate(judge, self.dimension(), with_pair(context, state), config).await
            }
            Self::Style => {
                let inputs = state.inputs();
                let context = JudgmentContext::new(Dimension::Style, &inputs.target_text)
                    .with_style_directives(&inputs.style_directives);
                delegate(judge, self.dimension(), with_pair(context, state), config).await
            }
            Self::MemoryFidelity => evaluate_memory_fidelity(state, judge, config).await,
        }
    }
}

fn with_pair(context: JudgmentContext, state: &ReviewState) -> JudgmentContext {
    match state.memory_lookup() {
        Some((_, pair)) => context.with_languages(&pair.source, &pair.target),
        None => context,
    }
}

/// Ask the judge, falling back to a neutral score on any failure.
async fn delegate(
    judge: &dyn JudgmentCapability,
    dimension: Dimension,
    context: JudgmentContext,
    config: &Config,
) -> DimensionScore {
    match judge_with_timeout(judge, &context, config.review.judgment_timeout()).await {
        Ok(judgment) => {
            debug!("{} judgment: {:.2}", dimension, judgment.score);
            DimensionScore::new(dimension, judgment.score, Some(judgment.explanation))
        }
        Err(e) => {
            warn!("{} evaluation unavailable: {}", dimension, e);
            DimensionScore::unavailable(dimension)
        }
    }
}

/// Score term compliance without consulting the judge.
pub fn evaluate_terminology(state: &ReviewState, config: &Config) -> DimensionScore {
    let inputs = state.inputs();
    score_terminology(
        &inputs.source_text,
        &inputs.target_text,
        &inputs.terminology,
        config.review.term_match_threshold,
    )
}

/// Terminology score for a source/target pair.
///
/// A term counts when it appears in the source; it is correct when its
/// prescribed translation appears in the target. Both lookups are
/// case-insensitive and accept partial matches at or above `threshold`.
pub fn score_terminology(source: &str, target: &str, terminology: &Terminology, threshold: f64) -> DimensionScore {
    let source_lower = source.to_lowercase();
    let target_lower = target.to_lowercase();

    let found: Vec<(&String, &String)> = terminology
        .iter()
        .filter(|(term, _)| contains_fuzzy(&source_lower, term, threshold))
        .collect();

    if found.is_empty() {
        debug!("No terminology entries found in source text");
        return DimensionScore::plain(Dimension::Terminology, 1.0);
    }

    let missing: Vec<(&String, &String)> = found
        .iter()
        .copied()
        .filter(|(_, translation)| !contains_fuzzy(&target_lower, translation, threshold))
        .collect();

    let total = found.len();
    let correct = total - missing.len();
    let compliance = correct as f64 / total as f64;
    let score = round2(2.0 * compliance - 1.0);

    info!(
        "Terminology evaluation complete. Score: {:.2}, compliance: {:.1}%",
        score,
        compliance * 100.0
    );

    let explanation = (!missing.is_empty()).then(|| {
        let details: Vec<String> = missing
            .iter()
            .map(|(term, translation)| format!("'{}' (should be '{}')", term, translation))
            .collect();
        format!(
            "Missing or incorrectly translated terminology: {}. Compliance rate: {:.1}% ({}/{} terms correct).",
            details.join(", "),
            compliance * 100.0,
            correct,
            total
        )
    });

    DimensionScore::new(Dimension::Terminology, score, explanation)
}

fn contains_fuzzy(haystack_lower: &str, needle: &str, threshold: f64) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    haystack_lower.contains(&needle) || partial_ratio(&needle, haystack_lower) >= threshold
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score consistency with the translation memory.
///
/// Callers only run this when the state has a usable memory; without one the
/// dimension is vacuously satisfied.
pub async fn evaluate_memory_fidelity(
    state: &ReviewState,
    judge: &dyn JudgmentCapability,
    config: &Config,
) -> DimensionScore {
    let Some((index, pair)) = state.memory_lookup() else {
        return DimensionScore::plain(Dimension::MemoryFidelity, 1.0);
    };
    let inputs = state.inputs();
    let options: MatchOptions = config.matching.options();
    let candidates = find_matches(index, &inputs.source_text, pair, options);

    match candidates.first() {
        None => {
            debug!("No memory matches for source text; memory fidelity satisfied");
            DimensionScore::plain(Dimension::MemoryFidelity, 1.0)
        }
        Some(exact) if exact.is_exact() => {
            if normalize_segment(&inputs.target_text) == normalize_segment(&exact.unit.target_text) {
                DimensionScore::plain(Dimension::MemoryFidelity, 1.0)
            } else {
                warn!("Exact memory match at position {} was not used", exact.corpus_position);
                DimensionScore::new(
                    Dimension::MemoryFidelity,
                    EXACT_MATCH_IGNORED_SCORE,
                    Some(EXACT_MATCH_IGNORED.to_string()),
                )
            }
        }
        Some(_) => {
            let context = JudgmentContext::new(Dimension::MemoryFidelity, &inputs.target_text)
                .with_source(&inputs.source_text)
                .with_memory_guidance(memory_guidance(&candidates))
                .with_languages(&pair.source, &pair.target);
            delegate(judge, Dimension::MemoryFidelity, context, config).await
        }
    }
}
