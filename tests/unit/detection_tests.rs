/*!
 * Tests for syllable counting and 5-7-5 window detection on tokenized text
 */

use newshaiku::extractor::HaikuExtractor;
use newshaiku::haiku::detector::VERSE_BOUNDARIES;
use newshaiku::haiku::{
    check_approved_ending, estimate_syllables, evaluate_ending, filter_tokens, scan_document,
    EndingVerdict,
};
use newshaiku::nlp::MockNlp;
use newshaiku::Document;
use crate::common;

fn verse_syllables(doc: &Document, verse: &[usize]) -> usize {
    verse.iter().map(|&i| estimate_syllables(&doc[i].text)).sum()
}

/// Test that every detected window splits into 5, 7 and 5 syllables
#[test]
fn test_scanDocument_withMixedWords_shouldAlwaysSplitFiveSevenFive() {
    let nlp = MockNlp::new();
    let doc = nlp.tokenize(
        "Vinteren kommer tidlig i år. Snøen lå tung på taket da bonden gikk ut i morgen, \
         og kulda bet i kinnene hans mens hunden bjeffet mot skogen.",
    );

    let filtered = filter_tokens(&doc);
    let windows = scan_document(&filtered, &doc);

    assert!(!windows.is_empty());
    for window in &windows {
        let sums: Vec<usize> = window
            .verses
            .iter()
            .map(|verse| verse_syllables(&doc, verse))
            .collect();
        assert_eq!(sums, vec![5, 7, 5]);
        assert!(window.verses.iter().all(|verse| !verse.is_empty()));
        assert!(window.indices().all(|i| !doc[i].is_punct && !doc[i].is_space));
    }
    assert_eq!(VERSE_BOUNDARIES, [5, 12, 17]);
}

/// Test that consecutive verses cover consecutive interesting tokens
#[test]
fn test_scanDocument_withPunctuation_shouldKeepVersesContiguous() {
    let doc = MockNlp::new().tokenize(common::SEVENTEEN);
    let filtered = filter_tokens(&doc);
    let windows = scan_document(&filtered, &doc);

    assert_eq!(windows.len(), 1);
    let indices: Vec<usize> = windows[0].indices().collect();
    assert_eq!(indices, filtered.word_indices);
    assert_eq!(windows[0].indices().count(), 17);
}

/// Test that a window spanning a number is never reported
#[test]
fn test_scanDocument_withDigitInside_shouldFindNothing() {
    let doc = MockNlp::new().tokenize(&common::SEVENTEEN.replace("snø", "snø 2"));

    let filtered = filter_tokens(&doc);
    assert_eq!(filtered.total_syllables(), 17);
    assert!(scan_document(&filtered, &doc).is_empty());
}

/// Test that two haiku sentences in a row both get approved
#[test]
fn test_checkApprovedEnding_withTwoSentences_shouldApproveBothOpenings() {
    let text = format!("{} {}", common::SEVENTEEN, common::SEVENTEEN);
    let doc = common::norwegian_mock().tokenize(&text);

    let windows = scan_document(&filter_tokens(&doc), &doc);
    assert_eq!(windows.len(), 18);

    let outcome = HaikuExtractor::new().extract(&doc, "https://www.nrk.no/sak");
    assert_eq!(outcome.approved, 2);
    assert_eq!(outcome.haikus[0], outcome.haikus[1]);

    let candidates: Vec<_> = windows
        .iter()
        .filter(|window| check_approved_ending(window, &doc))
        .collect();
    assert_eq!(candidates.len(), 2);
    for window in candidates {
        let first = window.first_index().unwrap();
        assert!(doc[first].is_sent_start);
        assert_eq!(doc[first].text, "Sol");
    }
}

/// Test that the rejected windows carry the expected verdicts
#[test]
fn test_evaluateEnding_withShiftedWindows_shouldExplainRejection() {
    let text = format!("{} {}", common::SEVENTEEN, common::SEVENTEEN);
    let doc = common::norwegian_mock().tokenize(&text);
    let windows = scan_document(&filter_tokens(&doc), &doc);

    // Second window opens on "på"
    assert_eq!(evaluate_ending(&windows[1], &doc), EndingVerdict::OpensMidSentence);
    // Fourth window opens on the conjunction
    assert_eq!(evaluate_ending(&windows[3], &doc), EndingVerdict::OpensMidSentence);
    assert_eq!(evaluate_ending(&windows[0], &doc), EndingVerdict::Approved);
}

/// Test that text too short for a haiku yields nothing
#[test]
fn test_scanDocument_withShortText_shouldFindNothing() {
    let doc = MockNlp::new().tokenize("Kort melding om været.");
    assert!(scan_document(&filter_tokens(&doc), &doc).is_empty());

    let empty = MockNlp::new().tokenize("");
    assert!(filter_tokens(&empty).is_empty());
    assert!(scan_document(&filter_tokens(&empty), &empty).is_empty());
}
