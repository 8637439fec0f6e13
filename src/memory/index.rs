/*!
 * Translation memory index.
 *
 * Units are grouped by ordered language pair. Each direction is indexed on
 * its own: an `en->fr` entry is not queryable as `fr->en` unless the corpus
 * is indexed bidirectionally. The index is immutable once built and can be
 * shared freely between concurrent evaluators.
 */

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::MemoryError;
use crate::language_utils::{canonical_language_code, language_codes_match};

/// One source/target segment pair from a translation memory corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Source segment
    pub source_text: String,

    /// Target segment
    pub target_text: String,

    /// Source language code
    pub source_lang: String,

    /// Target language code
    pub target_lang: String,

    /// How often this unit has been reused
    #[serde(default)]
    pub usage_count: u32,

    /// When the unit was created, if the corpus records it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TranslationUnit {
    /// Create a unit with no usage history.
    pub fn new(source_text: &str, target_text: &str, source_lang: &str, target_lang: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            usage_count: 0,
            created_at: None,
        }
    }

    /// Set the usage count.
    pub fn with_usage_count(mut self, usage_count: u32) -> Self {
        self.usage_count = usage_count;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The same unit with source and target swapped.
    pub fn reversed(&self) -> Self {
        Self {
            source_text: self.target_text.clone(),
            target_text: self.source_text.clone(),
            source_lang: self.target_lang.clone(),
            target_lang: self.source_lang.clone(),
            usage_count: self.usage_count,
            created_at: self.created_at,
        }
    }

    /// Language pair key of this unit.
    pub fn language_pair(&self) -> LanguagePair {
        LanguagePair::new(&self.source_lang, &self.target_lang)
    }

    fn check(&self, position: usize) -> Result<(), MemoryError> {
        let malformed = |reason: &str| MemoryError::MalformedCorpus {
            position,
            reason: reason.to_string(),
        };

        if self.source_text.trim().is_empty() {
            return Err(malformed("empty source text"));
        }
        if self.target_text.trim().is_empty() {
            return Err(malformed("empty target text"));
        }
        if self.source_lang.trim().is_empty() || self.target_lang.trim().is_empty() {
            return Err(malformed("missing language code"));
        }
        let source_lang = self.source_lang.trim().to_lowercase();
        if source_lang == self.target_lang.trim().to_lowercase() {
            return Err(MemoryError::MalformedCorpus {
                position,
                reason: format!("source and target language are both '{}'", source_lang),
            });
        }
        Ok(())
    }
}

/// Ordered (source, target) language key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Source language code (trimmed, lowercase)
    pub source: String,
    /// Target language code (trimmed, lowercase)
    pub target: String,
}

impl LanguagePair {
    /// Create a pair key. Codes are trimmed and lowercased.
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.trim().to_lowercase(),
            target: target.trim().to_lowercase(),
        }
    }

    /// Pair with region/script variants removed (`en-US->fr_FR` becomes `en->fr`).
    pub fn canonical(&self) -> Self {
        Self {
            source: canonical_language_code(&self.source),
            target: canonical_language_code(&self.target),
        }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// A unit together with its position in the indexing order.
#[derive(Debug, Clone)]
pub(crate) struct IndexedUnit {
    pub(crate) position: usize,
    pub(crate) unit: TranslationUnit,
}

/// Read-only translation memory grouped by language pair.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    buckets: Vec<(LanguagePair, Vec<IndexedUnit>)>,
    lookup: HashMap<LanguagePair, usize>,
    total_units: usize,
}

impl MemoryIndex {
    /// An index with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    fn push(&mut self, unit: TranslationUnit) {
        let pair = unit.language_pair();
        let position = self.total_units;
        let slot = match self.lookup.get(&pair) {
            Some(&slot) => slot,
            None => {
                self.buckets.push((pair.clone(), Vec::new()));
                self.lookup.insert(pair, self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };
        self.buckets[slot].1.push(IndexedUnit { position, unit });
        self.total_units += 1;
    }

    /// Total number of indexed units across all pairs.
    pub fn len(&self) -> usize {
        self.total_units
    }

    /// Whether the index holds no units at all.
    pub fn is_empty(&self) -> bool {
        self.total_units == 0
    }

    /// Language pairs in the order they were first seen.
    pub fn language_pairs(&self) -> impl Iterator<Item = &LanguagePair> {
        self.buckets.iter().map(|(pair, _)| pair)
    }

    /// Number of distinct language pairs.
    pub fn pair_count(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn entries_for(&self, pair: &LanguagePair) -> Vec<&IndexedUnit> {
        let canonical = pair.canonical();

        if let Some(&slot) = self.lookup.get(&canonical) {
            let bucket = &self.buckets[slot].1;
            if !bucket.is_empty() {
                return bucket.iter().collect();
            }
        }

        // Fall back to every key whose base languages match
        let mut merged: Vec<&IndexedUnit> = self
            .buckets
            .iter()
            .filter(|(key, _)| {
                language_codes_match(&key.source, &canonical.source) && language_codes_match(&key.target, &canonical.target)
            })
            .flat_map(|(_, units)| units.iter())
            .collect();
        merged.sort_by_key(|entry| entry.position);
        merged
    }

    /// Units stored for a pair, in corpus order.
    ///
    /// The request is reduced to its base pair first: asking for `en-US->fr`
    /// returns the `en->fr` units when that key is indexed, otherwise every
    /// region variant of it (`en-GB->fr-FR`, ...) merged in corpus order.
    pub fn units_for(&self, pair: &LanguagePair) -> Vec<&TranslationUnit> {
        self.entries_for(pair).into_iter().map(|entry| &entry.unit).collect()
    }

    /// Whether any unit is queryable under `pair`.
    pub fn has_pair(&self, pair: &LanguagePair) -> bool {
        !self.entries_for(pair).is_empty()
    }

    /// Pick the language pair to use for memory lookups.
    ///
    /// A requested pair is usable when it resolves to at least one unit. With no
    /// request, the pair is detected only when every key shares one base pair.
    pub fn resolve_pair(&self, requested: Option<&LanguagePair>) -> Option<LanguagePair> {
        match requested {
            Some(pair) if self.has_pair(pair) => Some(LanguagePair::new(&pair.source, &pair.target)),
            Some(pair) => {
                debug!("No memory entries for language pair {}", pair);
                None
            }
            None => {
                let mut base_pairs: Vec<LanguagePair> = self.buckets.iter().map(|(key, _)| key.canonical()).collect();
                base_pairs.sort();
                base_pairs.dedup();
                match base_pairs.len() {
                    1 => base_pairs.pop(),
                    _ => None,
                }
            }
        }
    }
}

/// Build an index from parsed units.
///
/// Fails on the first unit with an empty source or target text, a missing
/// language code, or identical source and target languages. An empty input
/// yields an empty index.
pub fn build_index<I>(units: I) -> Result<MemoryIndex, MemoryError>
where
    I: IntoIterator<Item = TranslationUnit>,
{
    let mut index = MemoryIndex::empty();
    for (position, unit) in units.into_iter().enumerate() {
        unit.check(position)?;
        index.push(unit);
    }

    info!(
        "Built translation memory index: {} units across {} language pairs",
        index.len(),
        index.pair_count()
    );
    Ok(index)
}

/// Build an index that answers queries in both directions.
///
/// Every unit is stored as given and again with source and target swapped.
pub fn build_bidirectional_index<I>(units: I) -> Result<MemoryIndex, MemoryError>
where
    I: IntoIterator<Item = TranslationUnit>,
{
    let mut index = MemoryIndex::empty();
    for (position, unit) in units.into_iter().enumerate() {
        unit.check(position)?;
        let reversed = unit.reversed();
        index.push(unit);
        index.push(reversed);
    }

    info!(
        "Built bidirectional translation memory index: {} units across {} language pairs",
        index.len(),
        index.pair_count()
    );
    Ok(index)
}
