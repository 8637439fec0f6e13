/*!
 * Review stages and their transitions.
 *
 * The order is fixed: Terminology, Grammar, Style, MemoryFidelity (only when a
 * usable memory exists), Aggregate, Done. A critical terminology score jumps
 * past Grammar and Style.
 */

use std::fmt;

use super::dimension::Dimension;
use super::state::ReviewState;

/// A point in the review pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStage {
    Terminology,
    Grammar,
    Style,
    MemoryFidelity,
    Aggregate,
    Done,
}

impl ReviewStage {
    /// Dimension scored in this stage, if any.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Self::Terminology => Some(Dimension::Terminology),
            Self::Grammar => Some(Dimension::Grammar),
            Self::Style => Some(Dimension::Style),
            Self::MemoryFidelity => Some(Dimension::MemoryFidelity),
            Self::Aggregate | Self::Done => None,
        }
    }

    /// Whether the terminology result calls for skipping grammar and style.
    pub fn is_critical(terminology_score: f64, critical_threshold: f64) -> bool {
        terminology_score <= critical_threshold
    }

    /// Stage that follows `self` given what the state holds so far.
    ///
    /// Pure: reads the state, never changes it.
    pub fn next(&self, state: &ReviewState, critical_threshold: f64) -> ReviewStage {
        let after_style = if state.memory_available() {
            ReviewStage::MemoryFidelity
        } else {
            ReviewStage::Aggregate
        };

        match self {
            Self::Terminology => match state.slot(Dimension::Terminology) {
                Some(score) if Self::is_critical(score.score, critical_threshold) => after_style,
                _ => ReviewStage::Grammar,
            },
            Self::Grammar => ReviewStage::Style,
            Self::Style => after_style,
            Self::MemoryFidelity => ReviewStage::Aggregate,
            Self::Aggregate | Self::Done => ReviewStage::Done,
        }
    }
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Terminology => "terminology",
            Self::Grammar => "grammar",
            Self::Style => "style",
            Self::MemoryFidelity => "memory_fidelity",
            Self::Aggregate => "aggregate",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Delegated dimensions still to run after terminology, in stage order.
///
/// Used when the delegated evaluators run together instead of stage by stage.
pub fn pending_delegated(state: &ReviewState, critical_threshold: f64) -> Vec<Dimension> {
    let mut stage = ReviewStage::Terminology.next(state, critical_threshold);
    let mut pending = Vec::new();
    while stage != ReviewStage::Aggregate && stage != ReviewStage::Done {
        if let Some(dimension) = stage.dimension() {
            pending.push(dimension);
        }
        stage = stage.next(state, critical_threshold);
    }
    pending
}
