use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::extractor::HaikuExtractor;
use crate::feed::{FeedSource, RssFeed};
use crate::haiku::{HaikuRecord, SeasonalScorer, SeasonalVocabulary};
use crate::nlp::{NlpBackend, SpacyClient};
use crate::store::HaikuStore;

// @module: Application controller for the extraction loop

/// Summary of one fetch, extract and persist pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Feed entries fetched
    pub entries: usize,
    /// Entries skipped because analysis failed
    pub skipped: usize,
    /// Windows matching the syllable pattern
    pub windows: usize,
    /// Haikus written to the store
    pub haikus: usize,
}

/// Main application controller driving the extraction loop
pub struct Controller {
    // @field: Feed to read entries from
    feed: Arc<dyn FeedSource>,
    // @field: NLP backend used to analyze descriptions
    nlp: Arc<dyn NlpBackend>,
    // @field: Heuristics applied to each analyzed entry
    extractor: HaikuExtractor,
    // @field: Output file
    store: HaikuStore,
    // @field: Pause between passes
    interval: Duration,
    // @field: Draw a progress bar while processing entries
    show_progress: bool,
}

impl Controller {
    /// Create a controller from explicit collaborators
    pub fn new(
        feed: Arc<dyn FeedSource>,
        nlp: Arc<dyn NlpBackend>,
        extractor: HaikuExtractor,
        store: HaikuStore,
        interval: Duration,
    ) -> Self {
        Self {
            feed,
            nlp,
            extractor,
            store,
            interval,
            show_progress: false,
        }
    }

    // @method: Create a controller with the HTTP feed and NLP clients from the configuration
    pub async fn with_config(config: &Config) -> Result<Self, AppError> {
        let rss_feed = RssFeed::new(&config.feed);
        let spacy = SpacyClient::new(&config.nlp).with_vectors(config.detection.season_filter);
        info!("Reading {} with NLP service at {}", rss_feed.url(), spacy.base_url());

        if let Err(e) = spacy.test_connection().await {
            warn!("NLP service at {} is not reachable yet: {}", spacy.base_url(), e);
        }

        let feed: Arc<dyn FeedSource> = Arc::new(rss_feed);
        let nlp: Arc<dyn NlpBackend> = Arc::new(spacy);

        let extractor = Self::build_extractor(config, nlp.as_ref()).await?;
        let store = HaikuStore::new(&config.storage.haikus_path);

        Ok(Self::new(feed, nlp, extractor, store, config.schedule.interval()).with_progress(true))
    }

    /// Build the extractor, preparing the seasonal scorer when the filter is on
    pub async fn build_extractor(
        config: &Config,
        nlp: &dyn NlpBackend,
    ) -> Result<HaikuExtractor, AppError> {
        if !config.detection.season_filter {
            return Ok(HaikuExtractor::new());
        }

        let vocabulary = match &config.detection.vocabulary_path {
            Some(path) => SeasonalVocabulary::load(path)
                .map_err(|e| AppError::Config(format!("{:#}", e)))?,
            None => SeasonalVocabulary::default(),
        };
        info!(
            "Season filter enabled: {} words, threshold {:.2}",
            vocabulary.len(),
            config.detection.season_threshold
        );

        let scorer = SeasonalScorer::prepare(&vocabulary, nlp).await?;

        Ok(HaikuExtractor::with_season_filter(
            scorer,
            config.detection.season_threshold,
        ))
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn store(&self) -> &HaikuStore {
        &self.store
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));
        progress_bar
    }

    /// Fetch the feed, extract haikus from every entry and replace the stored list
    ///
    /// A feed failure aborts the pass before anything is written, leaving the
    /// previous list in place. An entry whose analysis fails is skipped.
    pub async fn run_pass(&self) -> Result<PassReport> {
        let start_time = Instant::now();

        let entries = self
            .feed
            .fetch_entries()
            .await
            .context("Failed to fetch the news feed")?;
        info!(
            "Processing {} feed entries (season filter {})",
            entries.len(),
            if self.extractor.season_filter_enabled() { "on" } else { "off" }
        );

        let mut report = PassReport {
            entries: entries.len(),
            ..PassReport::default()
        };
        let mut haikus: Vec<HaikuRecord> = Vec::new();

        let progress_bar = self.progress_bar(entries.len() as u64);
        progress_bar.set_message("Looking for haikus");

        for entry in &entries {
            let doc = match self.nlp.analyze(&entry.description).await {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Skipping entry {}: {}", entry.link, e);
                    report.skipped += 1;
                    progress_bar.inc(1);
                    continue;
                }
            };

            let outcome = self.extractor.extract(&doc, &entry.link);
            debug!(
                "{}: {} windows, {} approved, {} kept",
                entry.link,
                outcome.windows,
                outcome.approved,
                outcome.haikus.len()
            );
            report.windows += outcome.windows;
            haikus.extend(outcome.haikus);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        self.store
            .save(&haikus)
            .with_context(|| format!("Failed to write haikus to {:?}", self.store.path()))?;
        report.haikus = haikus.len();

        info!(
            "Pass complete in {}: {} haikus from {} entries ({} skipped)",
            Self::format_duration(start_time.elapsed()),
            report.haikus,
            report.entries,
            report.skipped
        );

        Ok(report)
    }

    /// Repeat passes until `shutdown` turns true
    ///
    /// A failed pass is logged and retried on the next tick. The wait between
    /// passes ends early when shutdown is requested.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            "Extraction loop started, one pass every {}",
            Self::format_duration(self.interval)
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = self.run_pass().await {
                error!("Extraction pass failed: {:#}", e);
            }

            let sender_gone = tokio::select! {
                _ = tokio::time::sleep(self.interval) => false,
                changed = shutdown.changed() => changed.is_err(),
            };
            if sender_gone {
                break;
            }
        }

        info!("Extraction loop stopped");
        Ok(())
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
