/*!
 * Mock NLP backend for testing and offline runs.
 *
 * Tokenizes with a small rule set instead of a statistical model:
 * - words are runs of letters/digits (inner `-` and `'` allowed)
 * - every other non-blank character is a punctuation token
 * - newlines become whitespace tokens
 * - a sentence starts at the first token and after `.`, `!` or `?`
 *
 * Part of speech, fine tag and vector come from a lexicon keyed by the
 * lowercased word, falling back to a configurable default part of speech.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::NlpError;
use crate::nlp::{Document, NlpBackend, PartOfSpeech, Token};

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<space>\n+)|(?P<word>[\p{L}\p{N}]+(?:[-'][\p{L}\p{N}]+)*)|(?P<punct>[^\s\p{L}\p{N}])")
        .expect("static regex compiles")
});

/// Lexicon entry for one word
#[derive(Debug, Clone)]
struct LexiconEntry {
    pos: PartOfSpeech,
    tag: String,
}

/// Deterministic NLP backend
#[derive(Debug, Clone)]
pub struct MockNlp {
    lexicon: HashMap<String, LexiconEntry>,
    vectors: HashMap<String, Vec<f32>>,
    default_pos: PartOfSpeech,
    failing: bool,
    analyze_calls: Arc<AtomicUsize>,
    embed_calls: Arc<AtomicUsize>,
}

impl Default for MockNlp {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNlp {
    /// Create a mock tagging unknown words as nouns
    pub fn new() -> Self {
        Self {
            lexicon: HashMap::new(),
            vectors: HashMap::new(),
            default_pos: PartOfSpeech::Noun,
            failing: false,
            analyze_calls: Arc::new(AtomicUsize::new(0)),
            embed_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock whose every call fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Part of speech for words missing from the lexicon
    pub fn with_default_pos(mut self, pos: PartOfSpeech) -> Self {
        self.default_pos = pos;
        self
    }

    /// Add a word with its part of speech and fine tag
    pub fn with_word(mut self, word: &str, pos: PartOfSpeech, tag: &str) -> Self {
        self.lexicon.insert(
            word.to_lowercase(),
            LexiconEntry {
                pos,
                tag: tag.to_string(),
            },
        );
        self
    }

    /// Add a word vector
    pub fn with_vector(mut self, word: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(word.to_lowercase(), vector);
        self
    }

    /// Number of `analyze` calls so far
    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    /// Number of `embed` calls so far
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    /// Tokenize and tag synchronously
    pub fn tokenize(&self, text: &str) -> Document {
        let mut tokens = Vec::new();
        let mut next_starts_sentence = true;

        for caps in TOKEN_PATTERN.captures_iter(text) {
            let index = tokens.len();

            if let Some(space) = caps.name("space") {
                tokens.push(Token {
                    index,
                    text: space.as_str().to_string(),
                    is_punct: false,
                    is_space: true,
                    is_sent_start: false,
                    pos: PartOfSpeech::Space,
                    tag: "_SP".to_string(),
                    vector: None,
                });
                continue;
            }

            if let Some(punct) = caps.name("punct") {
                let text = punct.as_str();
                tokens.push(Token {
                    index,
                    text: text.to_string(),
                    is_punct: true,
                    is_space: false,
                    is_sent_start: next_starts_sentence,
                    pos: PartOfSpeech::Punct,
                    tag: "PUNCT___".to_string(),
                    vector: None,
                });
                next_starts_sentence = matches!(text, "." | "!" | "?");
                continue;
            }

            if let Some(word) = caps.name("word") {
                let text = word.as_str();
                let key = text.to_lowercase();
                let (pos, tag) = match self.lexicon.get(&key) {
                    Some(entry) => (entry.pos, entry.tag.clone()),
                    None if text.chars().all(|c| c.is_numeric()) => {
                        (PartOfSpeech::Num, "NUM___".to_string())
                    }
                    None => (self.default_pos, format!("{}___", self.default_pos)),
                };
                tokens.push(Token {
                    index,
                    text: text.to_string(),
                    is_punct: false,
                    is_space: false,
                    is_sent_start: next_starts_sentence,
                    pos,
                    tag,
                    vector: self.vectors.get(&key).cloned(),
                });
                next_starts_sentence = false;
            }
        }

        Document::from_tokens(tokens)
    }
}

#[async_trait]
impl NlpBackend for MockNlp {
    async fn analyze(&self, text: &str) -> Result<Document, NlpError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(NlpError::RequestFailed("mock backend configured to fail".to_string()));
        }
        Ok(self.tokenize(text))
    }

    async fn embed(&self, word: &str) -> Result<Vec<f32>, NlpError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(NlpError::RequestFailed("mock backend configured to fail".to_string()));
        }
        Ok(self.vectors.get(&word.to_lowercase()).cloned().unwrap_or_default())
    }

    async fn test_connection(&self) -> Result<(), NlpError> {
        if self.failing {
            Err(NlpError::RequestFailed("mock backend configured to fail".to_string()))
        } else {
            Ok(())
        }
    }
}
