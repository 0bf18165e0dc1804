use serde::{Deserialize, Serialize};

use crate::haiku::detector::CandidateWindow;
use crate::nlp::Document;

/// A found haiku and the article it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaikuRecord {
    /// Three verses separated by newlines
    pub haiku: String,
    /// Absolute URL of the source article
    pub link: String,
}

impl HaikuRecord {
    pub fn new(haiku: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            haiku: haiku.into(),
            link: link.into(),
        }
    }

    /// Build a record from a candidate window of a document
    pub fn from_window(window: &CandidateWindow, doc: &Document, link: &str) -> Self {
        Self::new(compose_haiku(window, doc), link)
    }

    /// Verses of the haiku
    pub fn lines(&self) -> Vec<&str> {
        self.haiku.lines().collect()
    }
}

/// Lowercased verse text, words joined by spaces and verses by newlines
pub fn compose_haiku(window: &CandidateWindow, doc: &Document) -> String {
    window
        .verses
        .iter()
        .map(|verse| {
            verse
                .iter()
                .filter_map(|&idx| doc.get(idx))
                .map(|token| token.text.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
