//! Application configuration module
//!
//! This module handles the application configuration including loading,
//! validating and saving configuration settings.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::errors::AppError;

/// Upper bound for the retry counts of the HTTP clients
pub const MAX_RETRY_COUNT: u32 = 10;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// News feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// NLP backend settings
    #[serde(default)]
    pub nlp: NlpConfig,

    /// Haiku detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Persisted haiku list
    #[serde(default)]
    pub storage: StorageConfig,

    /// Extraction loop timing
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Presenter web server
    #[serde(default)]
    pub server: ServerConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// News feed configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeedConfig {
    /// RSS feed URL
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_feed_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff for retries in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_feed_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// NLP service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NlpConfig {
    /// Service endpoint URL
    #[serde(default = "default_nlp_endpoint")]
    pub endpoint: String,

    /// Pipeline/model name requested from the service
    #[serde(default = "default_nlp_model")]
    pub model: String,

    /// Language of the analyzed text (ISO 639)
    #[serde(default = "default_nlp_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_nlp_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff for retries in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            endpoint: default_nlp_endpoint(),
            model: default_nlp_model(),
            language: default_nlp_language(),
            timeout_secs: default_nlp_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Haiku detection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DetectionConfig {
    /// Keep only haikus related to the seasons
    #[serde(default)]
    pub season_filter: bool,

    /// Minimum seasonal score for a haiku to be kept (0.0 to 1.0)
    #[serde(default = "default_season_threshold")]
    pub season_threshold: f32,

    /// Optional JSON file replacing the built-in seasonal vocabulary
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            season_filter: false,
            season_threshold: default_season_threshold(),
            vocabulary_path: None,
        }
    }
}

/// Haiku list storage configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Path of the JSON file shared by extractor and presenter
    #[serde(default = "default_haikus_path")]
    pub haikus_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            haikus_path: default_haikus_path(),
        }
    }
}

/// Extraction loop configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// Pause between two feed passes in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Presenter configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Re-read the haiku file on every request instead of once at start
    #[serde(default = "default_true")]
    pub reload_per_request: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            reload_per_request: true,
        }
    }
}

impl ServerConfig {
    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| anyhow!("Invalid listen address '{}': {}", self.listen_addr, e))
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_feed_url() -> String {
    "https://www.nrk.no/toppsaker.rss".to_string()
}

fn default_feed_timeout_secs() -> u64 {
    30
}

fn default_nlp_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_nlp_model() -> String {
    "nb_core_news_md".to_string()
}

fn default_nlp_language() -> String {
    "nb".to_string()
}

fn default_nlp_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_season_threshold() -> f32 {
    0.5
}

fn default_haikus_path() -> PathBuf {
    PathBuf::from("haikus.json")
}

fn default_interval_secs() -> u64 {
    3600
}

fn default_listen_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn config_error(message: impl Into<String>) -> AppError {
    AppError::Config(message.into())
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let feed_url = Url::parse(&self.feed.url)
            .map_err(|e| config_error(format!("Invalid feed URL '{}': {}", self.feed.url, e)))?;
        if feed_url.scheme() != "http" && feed_url.scheme() != "https" {
            return Err(config_error(format!("Feed URL must use http or https: {}", self.feed.url)));
        }

        Url::parse(&self.nlp.endpoint)
            .map_err(|e| config_error(format!("Invalid NLP endpoint '{}': {}", self.nlp.endpoint, e)))?;

        crate::language_utils::get_language_name(&self.nlp.language)
            .map_err(|e| config_error(format!("nlp.language: {}", e)))?;

        if !(0.0..=1.0).contains(&self.detection.season_threshold) {
            return Err(config_error(format!(
                "Season threshold must be between 0.0 and 1.0, got {}",
                self.detection.season_threshold
            )));
        }

        for (name, retry_count) in [("feed", self.feed.retry_count), ("nlp", self.nlp.retry_count)] {
            if retry_count > MAX_RETRY_COUNT {
                return Err(config_error(format!(
                    "{}.retry_count must be at most {}, got {}",
                    name,
                    MAX_RETRY_COUNT,
                    retry_count
                )));
            }
        }

        if self.schedule.interval_secs == 0 {
            return Err(config_error("Schedule interval must be at least one second"));
        }

        if self.storage.haikus_path.as_os_str().is_empty() {
            return Err(config_error("Haiku storage path must not be empty"));
        }

        self.server
            .socket_addr()
            .map_err(|e| config_error(e.to_string()))?;

        Ok(())
    }
}
