/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use std::path::PathBuf;
use newshaiku::app_config::{Config, LogLevel};
use newshaiku::file_utils::FileManager;
use crate::common;

/// Test that a config written to disk reads back with the same values
#[test]
fn test_config_withFileRoundTrip_shouldKeepValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.feed.url = "https://www.vg.no/rss/feed".to_string();
    config.detection.season_filter = true;
    config.detection.season_threshold = 0.65;
    config.storage.haikus_path = PathBuf::from("/var/lib/newshaiku/haikus.json");
    config.log_level = LogLevel::Trace;

    FileManager::write_to_file(&path, &serde_json::to_string_pretty(&config)?)?;
    let loaded: Config = serde_json::from_str(&FileManager::read_to_string(&path)?)?;

    assert_eq!(loaded.feed.url, "https://www.vg.no/rss/feed");
    assert!(loaded.detection.season_filter);
    assert!((loaded.detection.season_threshold - 0.65).abs() < f32::EPSILON);
    assert_eq!(loaded.storage.haikus_path, PathBuf::from("/var/lib/newshaiku/haikus.json"));
    assert_eq!(loaded.log_level, LogLevel::Trace);
    assert!(loaded.validate().is_ok());

    Ok(())
}

/// Test that an empty JSON object yields the default deployment
#[test]
fn test_config_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let config: Config = serde_json::from_str("{}")?;

    assert_eq!(config.nlp.endpoint, "http://localhost:8080");
    assert_eq!(config.nlp.language, "nb");
    assert_eq!(config.server.listen_addr, "127.0.0.1:5000");
    assert_eq!(config.schedule.interval().as_secs(), 3600);
    assert!(config.detection.vocabulary_path.is_none());
    assert!(config.validate().is_ok());

    Ok(())
}

/// Test that the boundaries of the season threshold are accepted
#[test]
fn test_validate_withThresholdBounds_shouldAccept() {
    let mut config = Config::default();
    config.detection.season_threshold = 0.0;
    assert!(config.validate().is_ok());

    config.detection.season_threshold = 1.0;
    assert!(config.validate().is_ok());
}

/// Test that an empty storage path is rejected
#[test]
fn test_validate_withEmptyHaikuPath_shouldFail() {
    let mut config = Config::default();
    config.storage.haikus_path = PathBuf::new();
    assert!(config.validate().is_err());
}

/// Test that a malformed NLP endpoint is rejected
#[test]
fn test_validate_withBadNlpEndpoint_shouldFail() {
    let mut config = Config::default();
    config.nlp.endpoint = "localhost without scheme".to_string();
    assert!(config.validate().is_err());
}

/// Test the mapping from configured level to log filter
#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
}
