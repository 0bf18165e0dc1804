/*!
 * Haiku window detection.
 *
 * A window starting at some interesting token is a haiku candidate when the
 * running syllable sum hits 5, 12 and 17 exactly. Tokens with several
 * syllables may jump over a boundary; such windows are rejected rather than
 * approximated.
 */

use crate::haiku::syllables::FilteredTokens;
use crate::nlp::Document;

/// Cumulative syllable counts closing the three verses
pub const VERSE_BOUNDARIES: [usize; 3] = [5, 12, 17];

/// Syllables of a complete haiku
pub const HAIKU_SYLLABLES: usize = VERSE_BOUNDARIES[2];

/// Three verses of document indices forming a tentative 5-7-5 haiku
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateWindow {
    pub verses: [Vec<usize>; 3],
}

impl CandidateWindow {
    /// Document index of the opening token
    pub fn first_index(&self) -> Option<usize> {
        self.verses[0].first().copied()
    }

    /// Document index of the closing token
    pub fn last_index(&self) -> Option<usize> {
        self.verses[2].last().copied()
    }

    /// All document indices in verse order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.verses.iter().flatten().copied()
    }
}

/// Running syllable sums, stopping at the first sum above a full haiku
fn cumulative_syllables(syllable_counts: &[usize]) -> Vec<usize> {
    let mut cumulative = Vec::with_capacity(syllable_counts.len().min(HAIKU_SYLLABLES + 1));
    let mut total = 0;

    for &syllables in syllable_counts {
        total += syllables;
        cumulative.push(total);
        if total > HAIKU_SYLLABLES {
            break;
        }
    }

    cumulative
}

/// Whether any token in `start..=end` contains a digit
fn span_contains_digit(doc: &Document, start: usize, end: usize) -> bool {
    doc.tokens()
        .iter()
        .skip(start)
        .take(end.saturating_sub(start) + 1)
        .any(|token| token.text.chars().any(|c| c.is_ascii_digit()))
}

/// Split the window at the first positions reaching each verse boundary
fn split_haiku_lines(word_indices: &[usize], line_ends: [usize; 3]) -> CandidateWindow {
    let [end1, end2, end3] = line_ends;
    CandidateWindow {
        verses: [
            word_indices[..=end1].to_vec(),
            word_indices[end1 + 1..=end2].to_vec(),
            word_indices[end2 + 1..=end3].to_vec(),
        ],
    }
}

/// Check whether a haiku begins at the first entry of the given suffix
///
/// `word_indices` and `syllable_counts` are suffixes of the filtered token
/// lists. Returns the three verses, or `None` when a boundary is skipped,
/// the text runs out, or the covered span contains a digit.
pub fn detect_haiku_beginning(
    word_indices: &[usize],
    syllable_counts: &[usize],
    doc: &Document,
) -> Option<CandidateWindow> {
    let usable = word_indices.len().min(syllable_counts.len());
    let cumulative = cumulative_syllables(&syllable_counts[..usable]);

    let mut line_ends = [0usize; 3];
    for (line_end, boundary) in line_ends.iter_mut().zip(VERSE_BOUNDARIES) {
        *line_end = cumulative.iter().position(|&sum| sum == boundary)?;
    }

    let start = word_indices[0];
    let end = word_indices[line_ends[2]];
    if span_contains_digit(doc, start, end) {
        return None;
    }

    Some(split_haiku_lines(word_indices, line_ends))
}

/// Try every starting offset of the filtered tokens
pub fn scan_document(filtered: &FilteredTokens, doc: &Document) -> Vec<CandidateWindow> {
    (0..filtered.len())
        .filter_map(|i| {
            detect_haiku_beginning(&filtered.word_indices[i..], &filtered.syllable_counts[i..], doc)
        })
        .collect()
}
