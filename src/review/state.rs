/*!
 * Review inputs and the per-review accumulator.
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::errors::ReviewError;
use crate::memory::{LanguagePair, MemoryIndex, TranslationUnit, build_index};

use super::dimension::{Dimension, DimensionScore};

/// Term to prescribed translation.
pub type Terminology = BTreeMap<String, String>;

/// Everything a review reads. Evaluators never mutate it.
#[derive(Debug, Clone, Default)]
pub struct ReviewInputs {
    /// Text that was translated
    pub source_text: String,

    /// Translation under review
    pub target_text: String,

    /// Prescribed term translations, pre-filtered for this text
    pub terminology: Terminology,

    /// Opaque style directives for the style judge
    pub style_directives: String,

    /// Shared translation memory, if the caller loaded one
    pub memory: Option<Arc<MemoryIndex>>,

    /// Requested language pair for memory lookups
    pub language_pair: Option<LanguagePair>,
}

impl ReviewInputs {
    /// Inputs for reviewing `target_text` as a translation of `source_text`.
    pub fn new(source_text: &str, target_text: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
            ..Default::default()
        }
    }

    /// Attach terminology.
    pub fn with_terminology<I, K, V>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.terminology = terms.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Attach style directives.
    pub fn with_style_directives(mut self, directives: &str) -> Self {
        self.style_directives = directives.to_string();
        self
    }

    /// Attach a translation memory and, optionally, the pair to query.
    pub fn with_memory(mut self, memory: Arc<MemoryIndex>, language_pair: Option<LanguagePair>) -> Self {
        self.memory = Some(memory);
        self.language_pair = language_pair;
        self
    }

    /// Build a translation memory from raw units and attach it.
    pub fn with_corpus<I>(self, units: I, language_pair: Option<LanguagePair>) -> Result<Self, ReviewError>
    where
        I: IntoIterator<Item = TranslationUnit>,
    {
        let index = build_index(units)?;
        Ok(self.with_memory(Arc::new(index), language_pair))
    }
}

/// Mutable accumulator for one review.
///
/// Each dimension slot is written at most once.
#[derive(Debug, Clone)]
pub struct ReviewState {
    inputs: ReviewInputs,
    memory_pair: Option<LanguagePair>,
    slots: BTreeMap<Dimension, DimensionScore>,
    terminated_early: bool,
}

impl ReviewState {
    /// Start a review, resolving the memory language pair.
    ///
    /// Memory takes part only when an index was supplied and a pair with at
    /// least one unit was requested or could be detected.
    pub fn new(inputs: ReviewInputs) -> Self {
        let memory_pair = inputs
            .memory
            .as_ref()
            .and_then(|index| index.resolve_pair(inputs.language_pair.as_ref()));

        if inputs.memory.is_some() && memory_pair.is_none() {
            debug!("Translation memory supplied but no usable language pair; memory fidelity disabled");
        }

        Self {
            inputs,
            memory_pair,
            slots: BTreeMap::new(),
            terminated_early: false,
        }
    }

    /// Review inputs.
    pub fn inputs(&self) -> &ReviewInputs {
        &self.inputs
    }

    /// Memory index and resolved pair, when memory fidelity applies.
    pub fn memory_lookup(&self) -> Option<(&MemoryIndex, &LanguagePair)> {
        match (&self.inputs.memory, &self.memory_pair) {
            (Some(index), Some(pair)) => Some((index.as_ref(), pair)),
            _ => None,
        }
    }

    /// Whether the memory fidelity dimension takes part.
    pub fn memory_available(&self) -> bool {
        self.memory_lookup().is_some()
    }

    /// Dimensions taking part in this review, in evaluation order.
    pub fn participating(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|d| *d != Dimension::MemoryFidelity || self.memory_available())
            .collect()
    }

    /// Score already merged for a dimension.
    pub fn slot(&self, dimension: Dimension) -> Option<&DimensionScore> {
        self.slots.get(&dimension)
    }

    /// Merge one evaluator result into its slot.
    pub fn merge(&mut self, score: DimensionScore) -> Result<(), ReviewError> {
        let dimension = score.name;
        if dimension == Dimension::MemoryFidelity && !self.memory_available() {
            return Err(ReviewError::InvalidTransition(
                "memory fidelity scored without a usable translation memory".to_string(),
            ));
        }
        if self.slots.contains_key(&dimension) {
            return Err(ReviewError::InvalidTransition(format!(
                "{} was already scored in this review",
                dimension
            )));
        }

        debug!("Merged {} score {:.2} (skipped: {})", dimension, score.score, score.skipped);
        self.slots.insert(dimension, score);
        Ok(())
    }

    /// Record that early termination bypassed some dimensions.
    pub fn mark_terminated_early(&mut self) {
        self.terminated_early = true;
    }

    /// Whether early termination happened.
    pub fn terminated_early(&self) -> bool {
        self.terminated_early
    }

    /// Whether every participating dimension has a score.
    pub fn is_complete(&self) -> bool {
        self.participating().iter().all(|d| self.slots.contains_key(d))
    }

    /// Complete breakdown in evaluation order.
    ///
    /// Fails if a participating dimension was never scored.
    pub fn breakdown(&self) -> Result<Vec<DimensionScore>, ReviewError> {
        self.participating()
            .into_iter()
            .map(|dimension| {
                self.slots.get(&dimension).cloned().ok_or_else(|| {
                    ReviewError::InvalidTransition(format!("cannot aggregate: {} was never scored", dimension))
                })
            })
            .collect()
    }
}
