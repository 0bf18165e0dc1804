/*!
 * Seasonal relevance scoring.
 *
 * A haiku's seasonal score is the highest similarity between any of its
 * tokens and any word of the seasonal vocabulary. Vocabulary vectors are
 * embedded once when the scorer is prepared and reused for every candidate.
 */

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::NlpError;
use crate::file_utils::FileManager;
use crate::haiku::detector::CandidateWindow;
use crate::nlp::{Document, NlpBackend};

/// Season a vocabulary word belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
    /// Words about seasons and time in general
    Generic,
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Generic => "generic",
        };
        write!(f, "{}", name)
    }
}

/// Seasonal words grouped by season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalVocabulary {
    #[serde(default)]
    pub winter: Vec<String>,
    #[serde(default)]
    pub spring: Vec<String>,
    #[serde(default)]
    pub summer: Vec<String>,
    #[serde(default)]
    pub autumn: Vec<String>,
    #[serde(default)]
    pub generic: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for SeasonalVocabulary {
    fn default() -> Self {
        Self {
            winter: owned(&[
                "vinter", "snø", "ski", "julefeiring", "jul", "høytid", "november", "desember",
                "januar", "februar",
            ]),
            spring: owned(&[
                "vår", "blomster", "løvetann", "april", "mars", "mai", "nasjonaldag", "flagg",
                "barnetog", "påske",
            ]),
            summer: owned(&[
                "sommer", "sol", "bade", "ferie", "havet", "øy", "juni", "juli", "august",
                "strand", "syden", "agurk",
            ]),
            autumn: owned(&[
                "høst", "storm", "halloween", "mørkt", "hytte", "løv", "trær", "vind",
                "september", "oktober", "regn",
            ]),
            generic: owned(&["årstid", "måned", "tid", "vær"]),
        }
    }
}

impl SeasonalVocabulary {
    /// Load a vocabulary from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse seasonal vocabulary: {:?}", path.as_ref()))
    }

    /// All words with their season, in season order
    pub fn words(&self) -> impl Iterator<Item = (Season, &str)> + '_ {
        let groups = [
            (Season::Winter, &self.winter),
            (Season::Spring, &self.spring),
            (Season::Summer, &self.summer),
            (Season::Autumn, &self.autumn),
            (Season::Generic, &self.generic),
        ];
        groups
            .into_iter()
            .flat_map(|(season, words)| words.iter().map(move |w| (season, w.as_str())))
    }

    pub fn len(&self) -> usize {
        self.words().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Best seasonal match of a haiku
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeasonScore {
    /// Highest similarity found, in [0, 1]
    pub score: f32,
    pub season: Option<Season>,
    /// Vocabulary word of the best match
    pub season_word: Option<String>,
    /// Haiku token of the best match
    pub matched_token: Option<String>,
}

/// Vocabulary word with its precomputed vector
#[derive(Debug, Clone)]
struct SeasonWord {
    season: Season,
    word: String,
    vector: Vec<f32>,
}

/// Scores haikus against a prepared seasonal vocabulary
#[derive(Debug, Clone)]
pub struct SeasonalScorer {
    words: Vec<SeasonWord>,
}

impl SeasonalScorer {
    /// Embed every vocabulary word once
    pub async fn prepare(
        vocabulary: &SeasonalVocabulary,
        nlp: &dyn NlpBackend,
    ) -> Result<Self, NlpError> {
        let mut words = Vec::with_capacity(vocabulary.len());
        for (season, word) in vocabulary.words() {
            let vector = nlp.embed(word).await?;
            if vector.is_empty() {
                debug!("No vector for seasonal word '{}', it will never match", word);
            }
            words.push(SeasonWord {
                season,
                word: word.to_string(),
                vector,
            });
        }
        debug!("Prepared {} seasonal word vectors", words.len());
        Ok(Self { words })
    }

    /// Number of prepared vocabulary words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Highest similarity between any haiku token and any seasonal word
    pub fn score(&self, window: &CandidateWindow, doc: &Document) -> SeasonScore {
        let mut best = SeasonScore::default();

        for season_word in &self.words {
            for idx in window.indices() {
                let score = doc.similarity(idx, &season_word.vector);
                if score > best.score {
                    best = SeasonScore {
                        score,
                        season: Some(season_word.season),
                        season_word: Some(season_word.word.clone()),
                        matched_token: doc.get(idx).map(|t| t.text.clone()),
                    };
                }
            }
        }

        best
    }
}
