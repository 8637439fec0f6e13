/*!
 * Review dimensions and their scores.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores at or above this value carry no explanation.
pub const EXPLANATION_THRESHOLD: f64 = 0.7;

/// Explanation attached to a dimension bypassed by early termination.
pub const SKIPPED_EXPLANATION: &str = "skipped";

/// Explanation attached when the judgment capability failed.
pub const UNAVAILABLE_EXPLANATION: &str = "evaluation unavailable";

/// One independently scored axis of translation quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Prescribed terms rendered with their prescribed translations
    Terminology,
    /// Grammatical correctness of the target text
    Grammar,
    /// Adherence to the style directives
    Style,
    /// Consistency with the translation memory
    MemoryFidelity,
}

impl Dimension {
    /// All dimensions in evaluation order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Terminology,
        Dimension::Grammar,
        Dimension::Style,
        Dimension::MemoryFidelity,
    ];

    /// Human-readable name used in explanations.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Terminology => "Terminology",
            Self::Grammar => "Grammar",
            Self::Style => "Style",
            Self::MemoryFidelity => "Memory Fidelity",
        }
    }

    /// Whether scoring this dimension calls the external judgment capability.
    pub fn is_delegated(&self) -> bool {
        !matches!(self, Self::Terminology)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result of evaluating one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Which dimension was scored
    pub name: Dimension,

    /// Score in [-1.0, 1.0]
    pub score: f64,

    /// Why the score is low; only present when the score is below 0.7
    pub explanation: Option<String>,

    /// True when early termination bypassed this dimension
    pub skipped: bool,
}

impl DimensionScore {
    /// Create a score. The value is clamped to [-1, 1] and the explanation is
    /// dropped when the score is high enough not to need one.
    pub fn new(name: Dimension, score: f64, explanation: Option<String>) -> Self {
        let score = if score.is_finite() { score.clamp(-1.0, 1.0) } else { 0.0 };
        let explanation = if score < EXPLANATION_THRESHOLD {
            explanation.filter(|text| !text.trim().is_empty())
        } else {
            None
        };

        Self {
            name,
            score,
            explanation,
            skipped: false,
        }
    }

    /// A score with no explanation.
    pub fn plain(name: Dimension, score: f64) -> Self {
        Self::new(name, score, None)
    }

    /// A dimension bypassed by early termination.
    pub fn skipped(name: Dimension) -> Self {
        Self {
            name,
            score: 0.0,
            explanation: Some(SKIPPED_EXPLANATION.to_string()),
            skipped: true,
        }
    }

    /// Neutral result used when the judgment capability failed.
    pub fn unavailable(name: Dimension) -> Self {
        Self::new(name, 0.0, Some(UNAVAILABLE_EXPLANATION.to_string()))
    }

    /// Whether this is the neutral fallback for a failed judgment.
    pub fn is_unavailable(&self) -> bool {
        !self.skipped && self.explanation.as_deref() == Some(UNAVAILABLE_EXPLANATION)
    }
}
