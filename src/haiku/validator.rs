/*!
 * Ending validation for haiku candidates.
 *
 * A candidate must open a sentence and close on a noun, a verb, or an
 * adjective carrying a finite verb form.
 */

use log::trace;

use crate::haiku::detector::CandidateWindow;
use crate::nlp::{Document, PartOfSpeech};

/// Morphological feature marking a finite verb form
pub const FINITE_VERB_MARKER: &str = "VerbForm=Fin";

/// Outcome of the ending check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndingVerdict {
    Approved,
    /// The opening token does not start a sentence
    OpensMidSentence,
    /// The closing token starts the following sentence
    EndsOnSentenceStart,
    /// Adjective ending without a finite verb form
    AdjectiveNotFinite,
    /// Ending part of speech is not allowed
    DisallowedEnding(PartOfSpeech),
    /// The window refers to tokens outside the document
    Malformed,
}

impl EndingVerdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Evaluate the opening and closing tokens of a candidate
pub fn evaluate_ending(window: &CandidateWindow, doc: &Document) -> EndingVerdict {
    let (Some(first), Some(last)) = (window.first_index(), window.last_index()) else {
        return EndingVerdict::Malformed;
    };
    let (Some(opening), Some(ending)) = (doc.get(first), doc.get(last)) else {
        return EndingVerdict::Malformed;
    };

    if !opening.is_sent_start {
        return EndingVerdict::OpensMidSentence;
    }
    if ending.is_sent_start {
        return EndingVerdict::EndsOnSentenceStart;
    }

    match ending.pos {
        PartOfSpeech::Noun | PartOfSpeech::Verb => EndingVerdict::Approved,
        PartOfSpeech::Adj if ending.tag.contains(FINITE_VERB_MARKER) => EndingVerdict::Approved,
        PartOfSpeech::Adj => EndingVerdict::AdjectiveNotFinite,
        other => EndingVerdict::DisallowedEnding(other),
    }
}

/// Accept or reject a candidate based on its opening and ending
pub fn check_approved_ending(window: &CandidateWindow, doc: &Document) -> bool {
    let verdict = evaluate_ending(window, doc);
    if !verdict.is_approved() {
        trace!("Rejected window at {:?}: {:?}", window.first_index(), verdict);
    }
    verdict.is_approved()
}
