/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use std::time::Duration;
use tmreview::app_config::{Config, LogLevel};
use tmreview::memory::MatchOptions;

use crate::common;

/// Test loading a full configuration file from disk
#[test]
fn test_fromFile_withFullConfig_shouldLoadAllSections() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "review.json",
        r#"{
            "matching": { "threshold": 70.0, "top_k": 5 },
            "review": {
                "term_match_threshold": 80.0,
                "critical_terminology_score": -0.25,
                "judgment_timeout_ms": 1500,
                "concurrent_delegation": true
            },
            "weights": { "terminology": 0.4, "grammar": 0.2, "style": 0.2, "memory_fidelity": 0.2 },
            "log_level": "warn"
        }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.matching.options(), MatchOptions::new(70.0, 5));
    assert_eq!(config.review.term_match_threshold, 80.0);
    assert_eq!(config.review.critical_terminology_score, -0.25);
    assert_eq!(config.review.judgment_timeout(), Duration::from_millis(1500));
    assert!(config.review.concurrent_delegation);
    assert_eq!(config.weights.terminology, 0.4);
    assert_eq!(config.log_level, LogLevel::Warn);
    Ok(())
}

/// Test that an empty object yields the defaults
#[test]
fn test_fromJsonStr_withEmptyObject_shouldEqualDefault() -> Result<()> {
    let config = Config::from_json_str("{}")?;
    assert_eq!(config, Config::default());
    Ok(())
}

/// Test that a missing file reports its path
#[test]
fn test_fromFile_withMissingFile_shouldFailWithPath() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("missing.json");

    let err = Config::from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.json"));
    Ok(())
}

/// Test that invalid values in a file are rejected on load
#[test]
fn test_fromFile_withInvalidValues_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;

    let bad_top_k = common::create_test_file(dir.path(), "top_k.json", r#"{"matching": {"top_k": 0}}"#)?;
    assert!(Config::from_file(&bad_top_k).is_err());

    let bad_weight = common::create_test_file(dir.path(), "weights.json", r#"{"weights": {"grammar": 1.5}}"#)?;
    assert!(Config::from_file(&bad_weight).is_err());

    let bad_level = common::create_test_file(dir.path(), "level.json", r#"{"log_level": "loud"}"#)?;
    assert!(Config::from_file(&bad_level).is_err());
    Ok(())
}

/// Test that the configuration survives a serialization round trip
#[test]
fn test_config_serialized_shouldParseBack() -> Result<()> {
    let mut config = Config::default();
    config.review.concurrent_delegation = true;
    config.matching.top_k = 7;

    let json = serde_json::to_string_pretty(&config)?;
    assert_eq!(Config::from_json_str(&json)?, config);
    Ok(())
}
