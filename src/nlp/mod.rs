/*!
 * NLP collaborator contract.
 *
 * The haiku heuristics never look at a concrete NLP library. They consume
 * the [`Token`] and [`Document`] types defined here, and any backend that
 * can produce them implements [`NlpBackend`]:
 * - `http`: JSON client for a spaCy-style analysis service
 * - `mock`: deterministic rule-based backend for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::ops::Index;

use crate::errors::NlpError;

pub mod http;
pub mod mock;

pub use http::SpacyClient;
pub use mock::MockNlp;

/// Coarse part-of-speech category (Universal Dependencies tag set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    Space,
    X,
}

impl PartOfSpeech {
    /// Parse a Universal Dependencies tag, unknown tags map to `X`
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "ADJ" => Self::Adj,
            "ADP" => Self::Adp,
            "ADV" => Self::Adv,
            "AUX" => Self::Aux,
            "CCONJ" | "CONJ" => Self::Cconj,
            "DET" => Self::Det,
            "INTJ" => Self::Intj,
            "NOUN" => Self::Noun,
            "NUM" => Self::Num,
            "PART" => Self::Part,
            "PRON" => Self::Pron,
            "PROPN" => Self::Propn,
            "PUNCT" => Self::Punct,
            "SCONJ" => Self::Sconj,
            "SYM" => Self::Sym,
            "VERB" => Self::Verb,
            "SPACE" => Self::Space,
            _ => Self::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adj => "ADJ",
            Self::Adp => "ADP",
            Self::Adv => "ADV",
            Self::Aux => "AUX",
            Self::Cconj => "CCONJ",
            Self::Det => "DET",
            Self::Intj => "INTJ",
            Self::Noun => "NOUN",
            Self::Num => "NUM",
            Self::Part => "PART",
            Self::Pron => "PRON",
            Self::Propn => "PROPN",
            Self::Punct => "PUNCT",
            Self::Sconj => "SCONJ",
            Self::Sym => "SYM",
            Self::Verb => "VERB",
            Self::Space => "SPACE",
            Self::X => "X",
        }
    }
}

impl std::fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One token of an analyzed text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Position in the parent document, contiguous from 0
    pub index: usize,
    /// Surface text
    pub text: String,
    pub is_punct: bool,
    pub is_space: bool,
    /// First token of a sentence
    pub is_sent_start: bool,
    /// Coarse part of speech
    pub pos: PartOfSpeech,
    /// Fine-grained tag with morphological features, e.g. `VERB__Mood=Ind|Tense=Pres|VerbForm=Fin`
    pub tag: String,
    /// Word vector, absent when the backend did not compute one
    pub vector: Option<Vec<f32>>,
}

impl Token {
    /// Create a plain word token without vector
    pub fn word(index: usize, text: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self {
            index,
            text: text.into(),
            is_punct: false,
            is_space: false,
            is_sent_start: false,
            pos,
            tag: String::new(),
            vector: None,
        }
    }

    pub fn sent_start(mut self, is_sent_start: bool) -> Self {
        self.is_sent_start = is_sent_start;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }
}

/// An analyzed text: its tokens in order
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    tokens: Vec<Token>,
}

impl Document {
    /// Build a document, checking that token indices are contiguous from 0
    pub fn new(tokens: Vec<Token>) -> Result<Self, NlpError> {
        for (position, token) in tokens.iter().enumerate() {
            if token.index != position {
                return Err(NlpError::InvalidTokens(format!(
                    "token '{}' has index {} at position {}",
                    token.text, token.index, position
                )));
            }
        }
        Ok(Self { tokens })
    }

    /// Build a document from tokens, renumbering them from 0
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .enumerate()
            .map(|(index, mut token)| {
                token.index = index;
                token
            })
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Similarity in [0, 1] between the token at `index` and a word vector
    pub fn similarity(&self, index: usize, other: &[f32]) -> f32 {
        self.get(index)
            .and_then(|token| token.vector.as_deref())
            .map(|vector| cosine_similarity(vector, other).max(0.0))
            .unwrap_or(0.0)
    }
}

impl Index<usize> for Document {
    type Output = Token;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

/// Cosine similarity of two vectors, 0 for mismatched or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a < f32::EPSILON || norm_b < f32::EPSILON {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Common trait for all NLP backends
///
/// This trait defines the capability contract the haiku detector relies on,
/// allowing backends to be used interchangeably by the extractor.
#[async_trait]
pub trait NlpBackend: Send + Sync + Debug {
    /// Tokenize and tag a text
    ///
    /// # Arguments
    /// * `text` - The text to analyze
    ///
    /// # Returns
    /// * `Result<Document, NlpError>` - The analyzed document or an error
    async fn analyze(&self, text: &str) -> Result<Document, NlpError>;

    /// Compute the word vector of a single word
    async fn embed(&self, word: &str) -> Result<Vec<f32>, NlpError>;

    /// Test the connection to the backend
    async fn test_connection(&self) -> Result<(), NlpError>;
}
