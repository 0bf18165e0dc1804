/*!
 * Per-document haiku extraction.
 *
 * Runs the heuristics in order on one analyzed document:
 * token filtering, the sliding 5-7-5 window scan, ending validation and,
 * when enabled, the seasonal relevance filter.
 */

use log::debug;

use crate::haiku::detector::HAIKU_SYLLABLES;
use crate::haiku::{HaikuRecord, SeasonalScorer, check_approved_ending, filter_tokens, scan_document};
use crate::nlp::Document;

/// Result of extracting one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionOutcome {
    /// Windows matching the 5-7-5 syllable pattern
    pub windows: usize,
    /// Windows that also passed ending validation
    pub approved: usize,
    /// Haikus kept for output
    pub haikus: Vec<HaikuRecord>,
}

/// Seasonal filter settings
#[derive(Debug, Clone)]
struct SeasonFilter {
    scorer: SeasonalScorer,
    threshold: f32,
}

/// Extracts haiku records from analyzed documents
#[derive(Debug, Clone, Default)]
pub struct HaikuExtractor {
    season_filter: Option<SeasonFilter>,
}

impl HaikuExtractor {
    /// Extractor without seasonal filtering
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only haikus whose seasonal score reaches `threshold`
    pub fn with_season_filter(scorer: SeasonalScorer, threshold: f32) -> Self {
        Self {
            season_filter: Some(SeasonFilter { scorer, threshold }),
        }
    }

    pub fn season_filter_enabled(&self) -> bool {
        self.season_filter.is_some()
    }

    /// Extract the haikus of one document, attributing them to `link`
    pub fn extract(&self, doc: &Document, link: &str) -> ExtractionOutcome {
        let filtered = filter_tokens(doc);
        if filtered.total_syllables() < HAIKU_SYLLABLES {
            return ExtractionOutcome::default();
        }

        let windows = scan_document(&filtered, doc);
        let mut outcome = ExtractionOutcome {
            windows: windows.len(),
            ..ExtractionOutcome::default()
        };

        for window in windows {
            if !check_approved_ending(&window, doc) {
                continue;
            }
            outcome.approved += 1;

            let record = HaikuRecord::from_window(&window, doc, link);

            if let Some(filter) = &self.season_filter {
                let score = filter.scorer.score(&window, doc);
                debug!(
                    "Season score {:.3} ({} '{}' ~ '{}') for {:?}",
                    score.score,
                    score.season.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()),
                    score.season_word.as_deref().unwrap_or("-"),
                    score.matched_token.as_deref().unwrap_or("-"),
                    record.haiku
                );
                if score.score < filter.threshold {
                    continue;
                }
            }

            outcome.haikus.push(record);
        }

        outcome
    }
}
