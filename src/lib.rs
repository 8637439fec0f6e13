/*!
 * # tmreview - Translation quality review
 *
 * A Rust library that scores a translated text against its source.
 *
 * ## Features
 *
 * - Translation memory indexing with exact and fuzzy segment matching
 * - Terminology compliance scoring, fully local
 * - Grammar, style and memory-consistency judgments through a pluggable
 *   judgment capability, bounded by a timeout
 * - Early termination when required terminology is badly violated
 * - Weighted aggregation into an overall score, quality band and explanation
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `memory`: Translation memory:
 *   - `memory::index`: Corpus indexing by language pair
 *   - `memory::matcher`: Exact and fuzzy segment lookup
 *   - `memory::similarity`: Similarity ratios
 * - `review`: The review pipeline:
 *   - `review::evaluators`: Per-dimension evaluators
 *   - `review::machine`: Stage transitions
 *   - `review::aggregator`: Weighted aggregation
 *   - `review::orchestrator`: End-to-end review
 * - `providers`: The judgment capability contract and a mock implementation
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod memory;
pub mod providers;
pub mod review;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{JudgmentError, MemoryError, ReviewError};
pub use language_utils::{canonical_language_code, language_codes_match};
pub use memory::{
    LanguagePair, MatchCandidate, MatchKind, MatchOptions, MemoryIndex, TranslationUnit, build_index, find_matches,
};
pub use providers::{Judgment, JudgmentCapability, JudgmentContext};
pub use review::{
    Dimension, DimensionScore, QualityLabel, ReviewInputs, ReviewPipeline, ReviewReport, run_review,
};
