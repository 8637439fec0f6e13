/*!
 * Judgment capability: the boundary to an external generative model.
 *
 * Grammar, style and memory-style judgments are delegated to an implementation
 * of [`JudgmentCapability`] injected by the host. This crate never builds
 * prompts or talks to a model itself; it only defines the contract:
 * - a judgment is a score in [-1.0, 1.0] plus an optional explanation
 * - failures are reported as [`JudgmentError`] and absorbed by the evaluators
 * - every call is bounded by a caller-supplied timeout
 */

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::JudgmentError;
use crate::review::dimension::Dimension;

pub mod mock;

/// Matches a JSON object wrapped in a Markdown code fence
static FENCED_JSON_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("valid fenced JSON regex"));

/// Minimal context handed to the judgment capability.
///
/// Each evaluator fills in only what it needs: grammar gets source and target,
/// style gets target and directives, memory fidelity gets target and memory guidance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JudgmentContext {
    /// Dimension being judged
    pub dimension: Option<Dimension>,

    /// Source text, when relevant
    pub source_text: Option<String>,

    /// Text under review
    pub target_text: String,

    /// Style directives, when relevant
    pub style_directives: Option<String>,

    /// Rendered translation memory examples, when relevant
    pub memory_guidance: Option<String>,

    /// Source language code, if known
    pub source_language: Option<String>,

    /// Target language code, if known
    pub target_language: Option<String>,
}

impl JudgmentContext {
    /// Start a context for `dimension` about `target_text`.
    pub fn new(dimension: Dimension, target_text: &str) -> Self {
        Self {
            dimension: Some(dimension),
            target_text: target_text.to_string(),
            ..Default::default()
        }
    }

    /// Attach the source text.
    pub fn with_source(mut self, source_text: &str) -> Self {
        self.source_text = Some(source_text.to_string());
        self
    }

    /// Attach the style directives.
    pub fn with_style_directives(mut self, directives: &str) -> Self {
        self.style_directives = Some(directives.to_string());
        self
    }

    /// Attach memory guidance text.
    pub fn with_memory_guidance(mut self, guidance: String) -> Self {
        self.memory_guidance = Some(guidance);
        self
    }

    /// Attach the language pair.
    pub fn with_languages(mut self, source_language: &str, target_language: &str) -> Self {
        self.source_language = Some(source_language.to_string());
        self.target_language = Some(target_language.to_string());
        self
    }
}

/// A score with an optional explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    /// Score in [-1.0, 1.0]
    pub score: f64,

    /// Explanation, usually only given for low scores
    #[serde(default)]
    pub explanation: String,
}

impl Judgment {
    /// Create a judgment.
    pub fn new(score: f64, explanation: &str) -> Self {
        Self {
            score,
            explanation: explanation.to_string(),
        }
    }

    /// Reject scores the contract does not allow.
    pub fn validate(self) -> Result<Self, JudgmentError> {
        if !self.score.is_finite() || !(-1.0..=1.0).contains(&self.score) {
            return Err(JudgmentError::OutOfRange(self.score));
        }
        Ok(self)
    }
}

/// External judgment provider.
///
/// Implementations wrap a model client (or a deterministic stub in tests).
#[async_trait]
pub trait JudgmentCapability: Send + Sync + Debug {
    /// Judge the supplied context.
    async fn judge(&self, context: &JudgmentContext) -> Result<Judgment, JudgmentError>;
}

#[async_trait]
impl<T: JudgmentCapability + ?Sized> JudgmentCapability for std::sync::Arc<T> {
    async fn judge(&self, context: &JudgmentContext) -> Result<Judgment, JudgmentError> {
        (**self).judge(context).await
    }
}

/// Run a judgment bounded by `timeout` and check the returned score.
///
/// An elapsed timeout cancels the pending call.
pub async fn judge_with_timeout(
    capability: &dyn JudgmentCapability,
    context: &JudgmentContext,
    timeout: Duration,
) -> Result<Judgment, JudgmentError> {
    match tokio::time::timeout(timeout, capability.judge(context)).await {
        Ok(result) => result?.validate(),
        Err(_) => Err(JudgmentError::Timeout(timeout)),
    }
}

/// Parse a raw model reply into a judgment.
///
/// Accepts a bare JSON object `{"score": .., "explanation": ..}` or one wrapped
/// in a Markdown code fence. The score is clamped to [-1, 1].
pub fn parse_judgment_response(raw: &str) -> Result<Judgment, JudgmentError> {
    let trimmed = raw.trim();
    let body = FENCED_JSON_REGEX
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| JudgmentError::MalformedOutput(e.to_string()))?;

    let score = match value.get("score") {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| s.is_finite())
    .ok_or_else(|| JudgmentError::MalformedOutput("missing numeric 'score' field".to_string()))?;

    let explanation = value
        .get("explanation")
        .and_then(|e| e.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(Judgment {
        score: score.clamp(-1.0, 1.0),
        explanation,
    })
}
