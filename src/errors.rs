/*!
 * Error types for the tmreview library.
 *
 * Structural errors (malformed corpus, invalid pipeline transitions) surface to
 * the caller. Judgment errors never leave the delegated evaluators: they are
 * converted to neutral dimension scores.
 */

use std::time::Duration;

use thiserror::Error;

/// Errors raised while building a translation memory index
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    /// A unit in the corpus violates the index contract
    #[error("Malformed corpus at unit {position}: {reason}")]
    MalformedCorpus {
        /// Zero-based position of the offending unit in the input sequence
        position: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// Errors that can occur while running a review
#[derive(Error, Debug)]
pub enum ReviewError {
    /// The review pipeline was driven through an illegal transition
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Error from the translation memory
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    /// Invalid configuration handed to the pipeline
    #[error("Configuration error: {0}")]
    Config(String),

    /// The blocking runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Failures of the external judgment capability
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JudgmentError {
    /// The capability could not produce a judgment
    #[error("Judgment unavailable: {0}")]
    Unavailable(String),

    /// The capability did not answer within the allotted time
    #[error("Judgment timed out after {0:?}")]
    Timeout(Duration),

    /// The capability answered with something that is not a judgment
    #[error("Malformed judgment output: {0}")]
    MalformedOutput(String),

    /// The capability returned a score outside [-1.0, 1.0]
    #[error("Judgment score out of range: {0}")]
    OutOfRange(f64),
}

impl From<std::io::Error> for ReviewError {
    fn from(error: std::io::Error) -> Self {
        Self::Runtime(error.to_string())
    }
}
