/*!
 * Tests for translation memory indexing and segment matching
 */

use tmreview::errors::MemoryError;
use tmreview::memory::{
    LanguagePair, MatchKind, MatchOptions, TranslationUnit, build_bidirectional_index, build_index, find_matches,
};

use crate::common;

fn en_fr() -> LanguagePair {
    LanguagePair::new("en", "fr")
}

/// Test that a malformed unit reports its corpus position
#[test]
fn test_buildIndex_withMalformedUnit_shouldReportPosition() {
    let mut units = common::sample_units();
    units.push(TranslationUnit::new("Bonjour", "Bonjour", "fr", " FR"));

    match build_index(units) {
        Err(MemoryError::MalformedCorpus { position, .. }) => assert_eq!(position, 5),
        other => panic!("expected malformed corpus error, got {:?}", other),
    }
}

/// Test that exact matches ignore surrounding and repeated whitespace
#[test]
fn test_findMatches_withExtraWhitespace_shouldStillBeExact() {
    let index = common::sample_index();
    let matches = find_matches(&index, "  Hello   world ", &en_fr(), MatchOptions::default());

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].kind, MatchKind::Exact);
    assert_eq!(matches[0].similarity, 100.0);
    assert_eq!(matches[0].unit.target_text, "Bonjour le monde");
}

/// Test that an exact match returns no fuzzy neighbours
#[test]
fn test_findMatches_exactHit_shouldNotIncludeFuzzyCandidates() {
    let index = common::sample_index();
    let matches = find_matches(&index, "Save the file", &en_fr(), MatchOptions::new(0.0, 10));

    assert_eq!(matches.len(), 1);
    assert!(matches[0].is_exact());
}

/// Test ranking by similarity, then usage count
#[test]
fn test_findMatches_fuzzy_shouldRankDeterministically() {
    let index = common::sample_index();
    let matches = find_matches(&index, "Please save the file", &en_fr(), MatchOptions::new(50.0, 3));

    assert!(!matches.is_empty());
    assert!(matches.iter().all(|m| m.kind == MatchKind::Fuzzy));
    for pair in matches.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }

    let again = find_matches(&index, "Please save the file", &en_fr(), MatchOptions::new(50.0, 3));
    let first: Vec<usize> = matches.iter().map(|m| m.corpus_position).collect();
    let second: Vec<usize> = again.iter().map(|m| m.corpus_position).collect();
    assert_eq!(first, second);
}

/// Test that every returned candidate meets the threshold and top_k holds
#[test]
fn test_findMatches_shouldHonourThresholdAndTopK() {
    let index = common::sample_index();
    for threshold in [0.0, 40.0, 80.0, 100.0] {
        for top_k in [1, 2, 5] {
            let matches = find_matches(&index, "save the settings file", &en_fr(), MatchOptions::new(threshold, top_k));
            assert!(matches.len() <= top_k);
            assert!(matches.iter().all(|m| m.similarity >= threshold));
        }
    }
}

/// Test that pairs are kept apart
#[test]
fn test_findMatches_otherPair_shouldOnlySeeItsOwnUnits() {
    let index = common::sample_index();
    let matches = find_matches(&index, "Hello world", &LanguagePair::new("en", "de"), MatchOptions::default());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].unit.target_text, "Hallo Welt");

    assert!(find_matches(&index, "Hello world", &LanguagePair::new("en", "es"), MatchOptions::default()).is_empty());
    assert!(find_matches(&index, "Bonjour le monde", &en_fr().reversed(), MatchOptions::default()).is_empty());
}

/// Test that a bidirectional index answers reverse lookups
#[test]
fn test_buildBidirectionalIndex_reverseLookup_shouldFindSource() {
    let index = build_bidirectional_index(common::sample_units()).unwrap();
    let matches = find_matches(&index, "Bonjour le monde", &LanguagePair::new("fr", "en"), MatchOptions::default());

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].unit.target_text, "Hello world");
}

/// Test that an empty index never matches
#[test]
fn test_findMatches_emptyIndex_shouldBeEmpty() {
    let index = build_index(Vec::new()).unwrap();
    assert!(index.is_empty());
    assert!(find_matches(&index, "Hello", &en_fr(), MatchOptions::default()).is_empty());
}
