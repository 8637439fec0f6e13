/*!
 * End-to-end tests for the review pipeline.
 *
 * All judgments come from deterministic mock judges.
 */

use std::sync::Arc;

use tmreview::app_config::Config;
use tmreview::memory::{LanguagePair, TranslationUnit, build_index};
use tmreview::providers::Judgment;
use tmreview::providers::mock::MockJudge;
use tmreview::review::{
    Dimension, QualityLabel, ReviewInputs, ReviewPipeline, ReviewReport, Terminology, run_review,
};

use crate::common;

fn api_terms() -> Terminology {
    [("API".to_string(), "Interface".to_string())].into_iter().collect()
}

fn concurrent_config() -> Config {
    let mut config = Config::default();
    config.review.concurrent_delegation = true;
    config
}

fn hello_memory() -> Arc<tmreview::memory::MemoryIndex> {
    Arc::new(
        build_index(vec![
            TranslationUnit::new("Hello world", "Bonjour le monde", "en", "fr").with_usage_count(5),
        ])
        .unwrap(),
    )
}

/// Worked example without memory
#[tokio::test]
async fn test_runReview_withoutMemory_shouldRenormalizeWeights() {
    common::init_logging();
    let judge = MockJudge::per_dimension(vec![
        (Dimension::Grammar, Judgment::new(0.5, "Verb agreement error")),
        (Dimension::Style, Judgment::new(0.5, "Too informal")),
    ]);

    let report = run_review("Hello", "Bonjour", &Terminology::new(), "Formal", None, None, &judge)
        .await
        .unwrap();

    assert!((report.overall_score - 0.6875).abs() < 1e-6);
    assert_eq!(report.quality_label, QualityLabel::Acceptable);
    assert_eq!(report.breakdown.len(), 3);
    assert!((report.weights[&Dimension::Terminology] - 0.375).abs() < 1e-6);
    assert!((report.weights[&Dimension::Style] - 0.25).abs() < 1e-6);
    assert_eq!(report.explanation, "Grammar: Verb agreement error | Style: Too informal");
    assert!(!report.terminated_early);
    assert!(report.language_pair.is_none());
}

/// Exact memory entry honoured
#[tokio::test]
async fn test_runReview_exactMemoryHonoured_shouldScoreMemoryPerfect() {
    common::init_logging();
    let judge = MockJudge::fixed(1.0, "");

    let report = run_review(
        "Hello world",
        "Bonjour le monde",
        &Terminology::new(),
        "",
        Some(hello_memory()),
        None,
        &judge,
    )
    .await
    .unwrap();

    let memory = report.dimension(Dimension::MemoryFidelity).unwrap();
    assert_eq!(memory.score, 1.0);
    assert_eq!(report.overall_score, 1.0);
    assert_eq!(report.language_pair, Some(LanguagePair::new("en", "fr")));
    assert_eq!(judge.judged_dimensions(), vec![Dimension::Grammar, Dimension::Style]);
}

/// Exact memory entry ignored
#[tokio::test]
async fn test_runReview_exactMemoryIgnored_shouldPenalizeMemory() {
    common::init_logging();
    let judge = MockJudge::fixed(1.0, "");

    let report = run_review(
        "Hello world",
        "Salut tout le monde",
        &Terminology::new(),
        "",
        Some(hello_memory()),
        Some(LanguagePair::new("en", "fr")),
        &judge,
    )
    .await
    .unwrap();

    let memory = report.dimension(Dimension::MemoryFidelity).unwrap();
    assert_eq!(memory.score, -0.5);
    // 0.3 + 0.3 + 0.2 + 0.2 * -0.5
    assert!((report.overall_score - 0.7).abs() < 1e-6);
    assert_eq!(
        report.explanation,
        "Memory Fidelity: exact memory match available but not used."
    );
}

/// Terminology rendered correctly
#[tokio::test]
async fn test_runReview_termTranslated_shouldScoreTerminologyPerfect() {
    let judge = MockJudge::fixed(1.0, "");
    let report = run_review("Call the API", "Appelez l'Interface", &api_terms(), "", None, None, &judge)
        .await
        .unwrap();

    assert_eq!(report.dimension(Dimension::Terminology).unwrap().score, 1.0);
    assert_eq!(report.quality_label, QualityLabel::GoodToExcellent);
}

/// Term left untranslated: terminology fails and the review stops early
#[tokio::test]
async fn test_runReview_termUntranslated_shouldTerminateEarly() {
    common::init_logging();
    let judge = MockJudge::fixed(1.0, "");
    let report = run_review("Call the API", "Utilisez l'API", &api_terms(), "", None, None, &judge)
        .await
        .unwrap();

    let terminology = report.dimension(Dimension::Terminology).unwrap();
    assert_eq!(terminology.score, -1.0);
    assert!(report.terminated_early);
    assert_eq!(judge.call_count(), 0);

    for dimension in [Dimension::Grammar, Dimension::Style] {
        let score = report.dimension(dimension).unwrap();
        assert!(score.skipped);
        assert_eq!(score.explanation.as_deref(), Some("skipped"));
        assert_eq!(report.weights[&dimension], 0.0);
    }
    assert!((report.weights.values().sum::<f64>() - 1.0).abs() < 1e-6);
    assert_eq!(report.quality_label, QualityLabel::VeryPoor);
    assert!(report.explanation.contains("Grammar: skipped | Style: skipped"));
}

/// Early termination still runs memory fidelity
#[tokio::test]
async fn test_runReview_earlyTerminationWithMemory_shouldStillJudgeMemory() {
    common::init_logging();
    let judge = MockJudge::per_dimension(vec![(
        Dimension::MemoryFidelity,
        Judgment::new(0.5, "Phrasing differs from memory"),
    )]);
    let inputs = ReviewInputs::new("Please save the file via the API", "Veuillez enregistrer via l'API")
        .with_terminology(api_terms())
        .with_memory(common::sample_index(), Some(LanguagePair::new("en", "fr")));

    let report = ReviewPipeline::default().review(inputs, &judge).await.unwrap();

    assert!(report.terminated_early);
    assert_eq!(judge.judged_dimensions(), vec![Dimension::MemoryFidelity]);
    // Terminology and memory share 0.6 / 0.4
    assert!((report.overall_score - (-0.6 + 0.2)).abs() < 1e-6);
    assert_eq!(report.quality_label, QualityLabel::VeryPoor);
}

/// Judge too slow: neutral fallback, review still completes
#[tokio::test]
async fn test_review_judgeTimeout_shouldFallBackToNeutral() {
    common::init_logging();
    let mut config = Config::default();
    config.review.judgment_timeout_ms = 20;
    let judge = MockJudge::slow(2_000);

    let report = ReviewPipeline::new(config)
        .review(ReviewInputs::new("Hello", "Bonjour"), &judge)
        .await
        .unwrap();

    for dimension in [Dimension::Grammar, Dimension::Style] {
        let score = report.dimension(dimension).unwrap();
        assert_eq!(score.score, 0.0);
        assert!(score.is_unavailable());
        assert!(!score.skipped);
    }
    assert!((report.overall_score - 0.375).abs() < 1e-6);
    assert_eq!(report.quality_label, QualityLabel::Acceptable);
    assert!(report.explanation.contains("Grammar: evaluation unavailable"));
}

/// Failing and malformed judges never fail the review
#[tokio::test]
async fn test_review_brokenJudges_shouldNeverFail() {
    for judge in [MockJudge::failing(), MockJudge::malformed(), MockJudge::fixed(3.0, "overconfident")] {
        let report = ReviewPipeline::default()
            .review(ReviewInputs::new("Hello", "Bonjour"), &judge)
            .await
            .unwrap();
        assert_eq!(report.breakdown.len(), 3);
        assert!(report.dimension(Dimension::Grammar).unwrap().is_unavailable());
        assert!(report.dimension(Dimension::Style).unwrap().is_unavailable());
    }
}

async fn review_both_ways(inputs: ReviewInputs, judge: &MockJudge) -> (ReviewReport, ReviewReport) {
    let sequential = ReviewPipeline::default().review(inputs.clone(), judge).await.unwrap();
    let concurrent = ReviewPipeline::new(concurrent_config()).review(inputs, judge).await.unwrap();
    (sequential, concurrent)
}

/// Concurrent delegation yields the same report
#[tokio::test]
async fn test_review_concurrentDelegation_shouldMatchSequential() {
    common::init_logging();
    let judge = MockJudge::per_dimension(vec![
        (Dimension::Grammar, Judgment::new(0.2, "Several agreement errors")),
        (Dimension::Style, Judgment::new(0.9, "")),
        (Dimension::MemoryFidelity, Judgment::new(-0.3, "Ignores established wording")),
    ]);

    let inputs = ReviewInputs::new("Open the settings menu please", "Ouvre les réglages")
        .with_style_directives("Use formal imperative")
        .with_memory(common::sample_index(), Some(LanguagePair::new("en", "fr")));
    let (sequential, concurrent) = review_both_ways(inputs, &judge).await;
    assert_eq!(sequential, concurrent);
    assert_eq!(sequential.breakdown.len(), 4);

    let critical = ReviewInputs::new("Call the API", "Utilisez l'API").with_terminology(api_terms());
    let (sequential, concurrent) = review_both_ways(critical, &judge).await;
    assert_eq!(sequential, concurrent);
}

/// Ambiguous memory pairs disable memory fidelity
#[tokio::test]
async fn test_review_ambiguousMemoryPair_shouldSkipMemoryDimension() {
    let judge = MockJudge::fixed(1.0, "");
    let inputs = ReviewInputs::new("Hello world", "Bonjour le monde").with_memory(common::sample_index(), None);

    let report = ReviewPipeline::default().review(inputs, &judge).await.unwrap();
    assert!(report.dimension(Dimension::MemoryFidelity).is_none());
    assert!(report.language_pair.is_none());
    assert_eq!(report.breakdown.len(), 3);
}

/// Reports serialize for hosts
#[tokio::test]
async fn test_reviewReport_shouldSerializeToJson() {
    let judge = MockJudge::fixed(0.4, "Awkward phrasing");
    let report = ReviewPipeline::default()
        .review(ReviewInputs::new("Hello", "Bonjour"), &judge)
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["breakdown"][1]["name"], "grammar");
    assert_eq!(json["breakdown"][1]["explanation"], "Awkward phrasing");
    let parsed: ReviewReport = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.quality_label, report.quality_label);
    assert_eq!(parsed.breakdown.len(), report.breakdown.len());
    assert!((parsed.overall_score - report.overall_score).abs() < 1e-9);
}
