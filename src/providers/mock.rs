/*!
 * Deterministic judgment stubs.
 *
 * `MockJudge` stands in for a model-backed judge in tests and benchmarks:
 * - `MockJudge::fixed()` - Always returns the same judgment
 * - `MockJudge::per_dimension()` - Returns a configured judgment per dimension
 * - `MockJudge::failing()` - Always reports the capability as unavailable
 * - `MockJudge::malformed()` - Returns unparsable model output
 * - `MockJudge::slow()` - Sleeps before answering (for timeout testing)
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::JudgmentError;
use crate::providers::{Judgment, JudgmentCapability, JudgmentContext, parse_judgment_response};
use crate::review::dimension::Dimension;

/// Behavior mode for the mock judge
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always returns this judgment
    Fixed(Judgment),
    /// Returns the judgment configured for the context's dimension, or the fallback
    PerDimension {
        judgments: HashMap<Dimension, Judgment>,
        fallback: Judgment,
    },
    /// Always fails
    Failing,
    /// Returns a reply that cannot be parsed
    Malformed,
    /// Waits before answering with a perfect score
    Slow { delay_ms: u64 },
}

/// Stub judgment capability with call accounting.
#[derive(Debug, Clone)]
pub struct MockJudge {
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<JudgmentContext>>>,
}

impl MockJudge {
    /// Create a mock judge with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answer with `score` and `explanation`
    pub fn fixed(score: f64, explanation: &str) -> Self {
        Self::new(MockBehavior::Fixed(Judgment::new(score, explanation)))
    }

    /// Answer per dimension, with a perfect score for anything not configured
    pub fn per_dimension(judgments: Vec<(Dimension, Judgment)>) -> Self {
        Self::new(MockBehavior::PerDimension {
            judgments: judgments.into_iter().collect(),
            fallback: Judgment::new(1.0, ""),
        })
    }

    /// Always fail
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Always return unparsable output
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// Sleep `delay_ms` before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of judgments requested so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Dimensions judged so far, in call order
    pub fn judged_dimensions(&self) -> Vec<Dimension> {
        self.contexts().iter().filter_map(|c| c.dimension).collect()
    }

    /// Contexts received so far, in call order
    pub fn contexts(&self) -> Vec<JudgmentContext> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl JudgmentCapability for MockJudge {
    async fn judge(&self, context: &JudgmentContext) -> Result<Judgment, JudgmentError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(context.clone());
        }

        match &self.behavior {
            MockBehavior::Fixed(judgment) => Ok(judgment.clone()),

            MockBehavior::PerDimension { judgments, fallback } => Ok(context
                .dimension
                .and_then(|d| judgments.get(&d))
                .unwrap_or(fallback)
                .clone()),

            MockBehavior::Failing => Err(JudgmentError::Unavailable(
                "Simulated judgment failure".to_string(),
            )),

            MockBehavior::Malformed => parse_judgment_response("Looks good to me!"),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(Judgment::new(1.0, ""))
            }
        }
    }
}
