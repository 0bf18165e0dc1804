/*!
 * Haiku detection heuristics.
 *
 * - `syllables`: vowel-count syllable estimate and token filtering
 * - `detector`: 5/12/17 cumulative syllable window scan
 * - `validator`: sentence-start and part-of-speech ending rules
 * - `season`: seasonal vocabulary and similarity scoring
 * - `record`: the persisted haiku record
 */

pub mod detector;
pub mod record;
pub mod season;
pub mod syllables;
pub mod validator;

pub use detector::{CandidateWindow, detect_haiku_beginning, scan_document};
pub use record::{HaikuRecord, compose_haiku};
pub use season::{Season, SeasonScore, SeasonalScorer, SeasonalVocabulary};
pub use syllables::{FilteredTokens, estimate_syllables, filter_tokens};
pub use validator::{EndingVerdict, check_approved_ending, evaluate_ending};
