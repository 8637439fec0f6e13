/*!
 * Weighted aggregation of dimension scores.
 *
 * Base weights cover all four dimensions. Only dimensions taking part in the
 * review are considered, and skipped dimensions get weight zero; the weights of
 * the remaining active dimensions are rescaled proportionally so they always
 * sum to 1.0. Without translation memory the default 0.30/0.30/0.20 becomes
 * 0.375/0.375/0.25.
 */

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};

use super::dimension::{Dimension, DimensionScore, EXPLANATION_THRESHOLD};

/// Base weight per dimension, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationWeights {
    #[serde(default = "default_terminology_weight")]
    pub terminology: f64,
    #[serde(default = "default_grammar_weight")]
    pub grammar: f64,
    #[serde(default = "default_style_weight")]
    pub style: f64,
    #[serde(default = "default_memory_fidelity_weight")]
    pub memory_fidelity: f64,
}

fn default_terminology_weight() -> f64 {
    0.30
}

fn default_grammar_weight() -> f64 {
    0.30
}

fn default_style_weight() -> f64 {
    0.20
}

fn default_memory_fidelity_weight() -> f64 {
    0.20
}

impl Default for AggregationWeights {
    fn default() -> Self {
        Self {
            terminology: default_terminology_weight(),
            grammar: default_grammar_weight(),
            style: default_style_weight(),
            memory_fidelity: default_memory_fidelity_weight(),
        }
    }
}

impl AggregationWeights {
    /// Base weight of a dimension.
    pub fn base(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Terminology => self.terminology,
            Dimension::Grammar => self.grammar,
            Dimension::Style => self.style,
            Dimension::MemoryFidelity => self.memory_fidelity,
        }
    }

    /// Each weight must lie in [0, 1] and at least one must be positive.
    pub fn validate(&self) -> Result<()> {
        for dimension in Dimension::ALL {
            let weight = self.base(dimension);
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(anyhow!("Weight for {} must be between 0 and 1, got {}", dimension, weight));
            }
        }
        if Dimension::ALL.iter().all(|d| self.base(*d) == 0.0) {
            return Err(anyhow!("At least one dimension weight must be positive"));
        }
        Ok(())
    }

    /// Effective weights for one review.
    ///
    /// Every participating dimension gets an entry; skipped ones get zero and
    /// the active ones share 1.0 in proportion to their base weights. If the
    /// active base weights are all zero they share it equally.
    pub fn effective(&self, participating: &[Dimension], skipped: &[Dimension]) -> BTreeMap<Dimension, f64> {
        let active: Vec<Dimension> = participating
            .iter()
            .copied()
            .filter(|d| !skipped.contains(d))
            .collect();
        let active_total: f64 = active.iter().map(|d| self.base(*d)).sum();

        participating
            .iter()
            .map(|&dimension| {
                let weight = if !active.contains(&dimension) {
                    0.0
                } else if active_total > 0.0 {
                    self.base(dimension) / active_total
                } else {
                    1.0 / active.len() as f64
                };
                (dimension, weight)
            })
            .collect()
    }
}

/// Quality band of an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLabel {
    /// score >= 0.7
    GoodToExcellent,
    /// 0.3 <= score < 0.7
    Acceptable,
    /// 0.0 <= score < 0.3
    Poor,
    /// score < 0.0
    VeryPoor,
}

impl QualityLabel {
    /// Band for a score.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.7 => Self::GoodToExcellent,
            s if s >= 0.3 => Self::Acceptable,
            s if s >= 0.0 => Self::Poor,
            _ => Self::VeryPoor,
        }
    }

    /// Human-readable band name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodToExcellent => "Good to Excellent",
            Self::Acceptable => "Acceptable",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of combining the dimension scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Weighted score in [-1, 1]
    pub overall_score: f64,
    /// Band of the overall score
    pub quality_label: QualityLabel,
    /// Consolidated explanation; empty when nothing needs explaining
    pub explanation: String,
    /// Effective weight used for each dimension
    pub weights: BTreeMap<Dimension, f64>,
}

/// Combine a complete breakdown into an overall score and explanation.
///
/// Each dimension counts once: when the breakdown repeats a dimension, the
/// first entry is used and later ones are ignored.
pub fn aggregate(breakdown: &[DimensionScore], weights: &AggregationWeights) -> Aggregation {
    let mut ordered: Vec<&DimensionScore> = breakdown.iter().collect();
    ordered.sort_by_key(|s| s.name);
    let before = ordered.len();
    ordered.dedup_by_key(|s| s.name);
    if ordered.len() < before {
        debug!("Ignored {} repeated dimension scores", before - ordered.len());
    }

    let participating: Vec<Dimension> = ordered.iter().map(|s| s.name).collect();
    let skipped: Vec<Dimension> = ordered.iter().filter(|s| s.skipped).map(|s| s.name).collect();
    let effective = weights.effective(&participating, &skipped);

    let weighted_sum: f64 = ordered
        .iter()
        .filter(|s| !s.skipped)
        .map(|s| s.score * effective.get(&s.name).copied().unwrap_or(0.0))
        .sum();
    let overall_score = weighted_sum.clamp(-1.0, 1.0);

    let mut parts = Vec::new();
    for score in &ordered {
        if score.skipped {
            parts.push(format!("{}: skipped", score.name));
        } else if score.score < EXPLANATION_THRESHOLD {
            if let Some(explanation) = &score.explanation {
                parts.push(format!("{}: {}", score.name, explanation));
            }
        }
    }
    let mut explanation = parts.join(" | ");

    let explained_any = ordered
        .iter()
        .any(|s| !s.skipped && s.score < EXPLANATION_THRESHOLD && s.explanation.is_some());
    if overall_score < EXPLANATION_THRESHOLD && !explained_any {
        let details: Vec<String> = ordered
            .iter()
            .filter(|s| !s.skipped)
            .map(|s| format!("{}: {:.2}", s.name, s.score))
            .collect();
        let summary = format!("Translation quality below threshold. Scores: {}", details.join(", "));
        explanation = if explanation.is_empty() {
            summary
        } else {
            format!("{} | {}", summary, explanation)
        };
    }

    debug!("Aggregated {} dimensions: overall {:.4}", ordered.len(), overall_score);

    Aggregation {
        overall_score,
        quality_label: QualityLabel::from_score(overall_score),
        explanation,
        weights: effective,
    }
}
