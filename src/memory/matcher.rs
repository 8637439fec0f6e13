/*!
 * Exact and fuzzy segment matching against a translation memory.
 *
 * An exact hit (whitespace-normalized, case-sensitive equality of the source
 * segment) short-circuits the lookup and is returned alone; among duplicate
 * sources the most used one wins, then the earliest. Otherwise every
 * unit of the pair is scored with the token-set ratio and the best candidates
 * above the threshold are returned in a deterministic order:
 * similarity desc, usage count desc, corpus position asc.
 */

use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use super::index::{LanguagePair, MemoryIndex, TranslationUnit};
use super::similarity::{normalize_segment, token_set_ratio};

/// Default minimum similarity for fuzzy candidates
pub const DEFAULT_MATCH_THRESHOLD: f64 = 80.0;

/// Default number of candidates returned
pub const DEFAULT_TOP_K: usize = 3;

/// How a candidate matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Normalized source text equals the normalized query
    Exact,
    /// Token overlap at or above the threshold
    Fuzzy,
}

/// A ranked memory hit for a query segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate<'a> {
    /// The matched unit, owned by the index
    pub unit: &'a TranslationUnit,
    /// Similarity on a 0-100 scale
    pub similarity: f64,
    /// Exact or fuzzy
    pub kind: MatchKind,
    /// Position of the unit in indexing order
    pub corpus_position: usize,
}

impl MatchCandidate<'_> {
    /// Whether this is an exact hit.
    pub fn is_exact(&self) -> bool {
        self.kind == MatchKind::Exact
    }
}

/// Lookup parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Minimum similarity (0-100) for fuzzy candidates
    pub threshold: f64,
    /// Maximum number of candidates returned
    pub top_k: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl MatchOptions {
    /// Options with a custom threshold and candidate count.
    pub fn new(threshold: f64, top_k: usize) -> Self {
        Self { threshold, top_k }
    }
}

/// Find memory matches for `query` under `pair`.
///
/// An unknown pair or an empty index yields no candidates; that is not an error.
pub fn find_matches<'a>(
    index: &'a MemoryIndex,
    query: &str,
    pair: &LanguagePair,
    options: MatchOptions,
) -> Vec<MatchCandidate<'a>> {
    let entries = index.entries_for(pair);
    if entries.is_empty() || options.top_k == 0 {
        return Vec::new();
    }

    let normalized_query = normalize_segment(query);

    let best_exact = entries
        .iter()
        .filter(|entry| normalize_segment(&entry.unit.source_text) == normalized_query)
        .map(|entry| MatchCandidate {
            unit: &entry.unit,
            similarity: 100.0,
            kind: MatchKind::Exact,
            corpus_position: entry.position,
        })
        .min_by(rank);

    if let Some(exact) = best_exact {
        debug!(
            "Exact memory match for '{}' at corpus position {}",
            normalized_query, exact.corpus_position
        );
        return vec![exact];
    }

    let mut candidates: Vec<MatchCandidate<'a>> = entries
        .into_iter()
        .filter_map(|entry| {
            let similarity = token_set_ratio(&normalized_query, &entry.unit.source_text);
            (similarity >= options.threshold).then_some(MatchCandidate {
                unit: &entry.unit,
                similarity,
                kind: MatchKind::Fuzzy,
                corpus_position: entry.position,
            })
        })
        .collect();

    candidates.sort_by(rank);
    candidates.truncate(options.top_k);

    debug!(
        "Found {} fuzzy memory matches for pair {} (threshold: {:.1})",
        candidates.len(),
        pair,
        options.threshold
    );
    candidates
}

fn rank(a: &MatchCandidate<'_>, b: &MatchCandidate<'_>) -> Ordering {
    b.similarity
        .partial_cmp(&a.similarity)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.unit.usage_count.cmp(&a.unit.usage_count))
        .then_with(|| a.corpus_position.cmp(&b.corpus_position))
}

impl MemoryIndex {
    /// Convenience wrapper around [`find_matches`].
    pub fn find_matches(&self, query: &str, pair: &LanguagePair, options: MatchOptions) -> Vec<MatchCandidate<'_>> {
        find_matches(self, query, pair, options)
    }
}

/// Render candidates as guidance text for a translator or judge.
pub fn memory_guidance(candidates: &[MatchCandidate<'_>]) -> String {
    if candidates.is_empty() {
        return "No translation memory entries available.".to_string();
    }

    let mut guidance =
        String::from("Use the following translation memory examples for style and terminology guidance:\n");
    for candidate in candidates {
        guidance.push_str(&format!(
            "- Source: \"{}\" -> Target: \"{}\" (similarity: {:.1}%)\n",
            candidate.unit.source_text, candidate.unit.target_text, candidate.similarity
        ));
    }
    guidance
}
