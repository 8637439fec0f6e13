/*!
 * Translation memory: corpus indexing and segment matching.
 *
 * - **Index**: groups parsed units by language pair
 * - **Matcher**: exact and fuzzy lookup with deterministic ranking
 * - **Similarity**: normalization and string similarity ratios
 */

pub mod index;
pub mod matcher;
pub mod similarity;

pub use index::{LanguagePair, MemoryIndex, TranslationUnit, build_bidirectional_index, build_index};
pub use matcher::{MatchCandidate, MatchKind, MatchOptions, find_matches, memory_guidance};
