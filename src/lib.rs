/*!
 * # newshaiku - haikus found in the news
 *
 * A Rust library that scans news feed summaries for accidental Norwegian
 * haikus: passages whose words fall into 5, 7 and 5 syllables, open a
 * sentence and end on a plausible word.
 *
 * ## Features
 *
 * - Fetch and parse RSS news feeds
 * - Tokenize and tag text through a pluggable NLP backend:
 *   - HTTP client for a spaCy-style analysis service
 *   - Deterministic mock backend for tests and offline runs
 * - Vowel-count syllable estimation for Norwegian
 * - Sliding 5-7-5 window detection with ending validation
 * - Optional seasonal relevance filter based on word vectors
 * - Atomic JSON persistence of the found haikus
 * - A minimal web page showing a random haiku
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `nlp`: NLP backend contract, tokens and documents
 * - `haiku`: The detection heuristics:
 *   - `haiku::syllables`: Syllable estimation and token filtering
 *   - `haiku::detector`: Candidate window scan
 *   - `haiku::validator`: Ending validation
 *   - `haiku::season`: Seasonal vocabulary and scoring
 * - `extractor`: Per-document extraction pipeline
 * - `feed`: RSS fetching and parsing
 * - `retry`: Backoff schedule of the HTTP clients
 * - `store`: Persisted haiku list
 * - `app_controller`: Extraction loop
 * - `server`: Presenter web page
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod extractor;
pub mod feed;
pub mod file_utils;
pub mod haiku;
pub mod language_utils;
pub mod nlp;
pub mod retry;
pub mod server;
pub mod store;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, PassReport};
pub use errors::{AppError, FeedError, NlpError, StoreError};
pub use extractor::{ExtractionOutcome, HaikuExtractor};
pub use feed::{FeedEntry, FeedSource};
pub use haiku::HaikuRecord;
pub use nlp::{Document, NlpBackend, PartOfSpeech, Token};
pub use store::HaikuStore;
