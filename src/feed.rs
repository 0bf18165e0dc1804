/*!
 * News feed access.
 *
 * Feeds are RSS 2.0 documents. Each `<item>` becomes a [`FeedEntry`] with
 * its description text (markup stripped) and article link. Fetching goes
 * through the [`FeedSource`] trait so the controller can run against an
 * in-memory feed in tests.
 */

use async_trait::async_trait;
use log::{debug, error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use std::fmt::Debug;
use std::time::Duration;
use url::Url;

use crate::app_config::FeedConfig;
use crate::errors::FeedError;
use crate::retry::backoff_delay_ms;

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").expect("static regex compiles"));
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("static regex compiles"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<link\b[^>]*>(.*?)</link>").expect("static regex compiles"));
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<description\b[^>]*>(.*?)</description>").expect("static regex compiles")
});
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t\r\f\p{Zs}]+").expect("static regex compiles"));

/// One article of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    /// Plain-text summary of the article
    pub description: String,
    /// Absolute article URL
    pub link: String,
}

impl FeedEntry {
    pub fn new(title: impl Into<String>, description: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: link.into(),
        }
    }
}

/// Anything that can deliver the current feed entries
#[async_trait]
pub trait FeedSource: Send + Sync + Debug {
    /// Fetch the entries currently in the feed
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>, FeedError>;
}

/// Text content of an HTML fragment, entities decoded and tags dropped
fn html_text(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unwrap CDATA and decode the XML layer of an element's content
fn decode_rss_text(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_start_matches("<![CDATA[")
        .trim_end_matches("]]>")
        .trim();
    html_text(trimmed)
}

/// Turn decoded element content into plain text
///
/// Descriptions often carry entity-escaped HTML, so the decoded content is
/// parsed once more as HTML to drop the inner tags and entities.
fn strip_markup(decoded: &str) -> String {
    let text = html_text(decoded);
    let collapsed = WS_RE.replace_all(&text, " ");
    collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn capture_text(re: &Regex, item: &str) -> Option<String> {
    re.captures(item)
        .and_then(|cap| cap.get(1))
        .map(|m| decode_rss_text(m.as_str()))
}

/// Parse the items of an RSS document
///
/// Items without an absolute http(s) link are skipped.
pub fn parse_rss(xml: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let lowered_head: String = xml.chars().take(4096).collect::<String>().to_lowercase();
    if !lowered_head.contains("<rss") && !lowered_head.contains("<channel") {
        return Err(FeedError::ParseError("document is not an RSS feed".to_string()));
    }

    let mut entries = Vec::new();
    for item_cap in ITEM_RE.captures_iter(xml) {
        let Some(item_match) = item_cap.get(1) else {
            continue;
        };
        let item = item_match.as_str();

        let link = capture_text(&LINK_RE, item).unwrap_or_default();
        let link_ok = Url::parse(&link)
            .map(|url| url.scheme() == "http" || url.scheme() == "https")
            .unwrap_or(false);
        if !link_ok {
            warn!("Skipping feed item without a usable link: '{}'", link);
            continue;
        }

        let title = capture_text(&TITLE_RE, item)
            .map(|t| strip_markup(&t))
            .unwrap_or_default();
        let description = capture_text(&DESCRIPTION_RE, item)
            .map(|d| strip_markup(&d))
            .unwrap_or_default();

        entries.push(FeedEntry {
            title,
            description,
            link,
        });
    }

    Ok(entries)
}

/// RSS feed fetched over HTTP
#[derive(Debug)]
pub struct RssFeed {
    url: String,
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl RssFeed {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            url: config.url.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the raw feed document with retry logic
    async fn fetch_document(&self) -> Result<String, FeedError> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.get(&self.url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .text()
                            .await
                            .map_err(|e| FeedError::RequestFailed(e.to_string()));
                    }

                    let message = status.canonical_reason().unwrap_or("unknown").to_string();
                    if status.is_server_error() {
                        // Server error - can retry
                        error!(
                            "Feed server error ({}) - attempt {}/{}",
                            status,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(FeedError::HttpStatus {
                            status_code: status.as_u16(),
                            message,
                        });
                    } else {
                        // Client error - don't retry
                        return Err(FeedError::HttpStatus {
                            status_code: status.as_u16(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    error!(
                        "Feed network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(FeedError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = backoff_delay_ms(self.backoff_base_ms, attempt);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            FeedError::RequestFailed(format!(
                "feed request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }
}

#[async_trait]
impl FeedSource for RssFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let xml = self.fetch_document().await?;
        let entries = parse_rss(&xml)?;
        debug!("Fetched {} entries from {}", entries.len(), self.url);
        Ok(entries)
    }
}

/// Fixed list of entries, for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    entries: Vec<FeedEntry>,
    failing: bool,
}

impl StaticFeed {
    pub fn new(entries: Vec<FeedEntry>) -> Self {
        Self {
            entries,
            failing: false,
        }
    }

    /// A feed whose every fetch fails
    pub fn failing() -> Self {
        Self {
            entries: Vec::new(),
            failing: true,
        }
    }

    /// Entries parsed from an RSS document
    pub fn from_rss(xml: &str) -> Result<Self, FeedError> {
        Ok(Self::new(parse_rss(xml)?))
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>, FeedError> {
        if self.failing {
            return Err(FeedError::RequestFailed("static feed configured to fail".to_string()));
        }
        Ok(self.entries.clone())
    }
}
