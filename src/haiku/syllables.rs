//! Syllable estimation and token filtering.

use crate::nlp::{Document, Token};

/// Vowels of the Norwegian alphabet; one vowel letter counts as one syllable
pub const NORWEGIAN_VOWELS: [char; 9] = ['a', 'e', 'i', 'o', 'u', 'y', 'æ', 'ø', 'å'];

/// Estimate the number of syllables in a word by counting its vowel letters
pub fn estimate_syllables(word: &str) -> usize {
    word.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| NORWEGIAN_VOWELS.contains(c))
        .count()
}

/// Whether a token takes part in syllable counting
pub fn is_interesting(token: &Token) -> bool {
    !token.is_punct && !token.is_space
}

/// Interesting tokens of a document with their syllable estimates
///
/// `word_indices[k]` is the document index of the k-th interesting token and
/// `syllable_counts[k]` its estimate. Both vectors have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredTokens {
    pub word_indices: Vec<usize>,
    pub syllable_counts: Vec<usize>,
}

impl FilteredTokens {
    pub fn len(&self) -> usize {
        self.word_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_indices.is_empty()
    }

    /// Total syllable estimate of the document
    pub fn total_syllables(&self) -> usize {
        self.syllable_counts.iter().sum()
    }
}

/// Drop punctuation and whitespace, keeping original document indices
pub fn filter_tokens(doc: &Document) -> FilteredTokens {
    let mut filtered = FilteredTokens::default();

    for (i, token) in doc.tokens().iter().enumerate() {
        if is_interesting(token) {
            filtered.word_indices.push(i);
            filtered.syllable_counts.push(estimate_syllables(&token.text));
        }
    }

    filtered
}
