/*!
 * Error types for the newshaiku application.
 *
 * This module contains custom error types for the different parts of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while fetching or parsing the news feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// The HTTP request could not be completed
    #[error("Feed request failed: {0}")]
    RequestFailed(String),

    /// The feed server answered with a non-success status
    #[error("Feed server responded with error: {status_code} - {message}")]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The feed document could not be understood
    #[error("Failed to parse feed: {0}")]
    ParseError(String),
}

/// Errors that can occur when talking to the NLP backend
#[derive(Error, Debug)]
pub enum NlpError {
    /// Error when making an API request fails
    #[error("NLP request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the NLP service itself
    #[error("NLP service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// Error when parsing a service response fails
    #[error("Failed to parse NLP response: {0}")]
    ParseError(String),

    /// The token stream violates the token contract
    #[error("Invalid token stream: {0}")]
    InvalidTokens(String),
}

/// Errors that can occur while reading or writing the haiku list
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure
    #[error("Haiku store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted file is not a valid haiku list
    #[error("Haiku store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persisted list holds no haikus
    #[error("Haiku store is empty: {0}")]
    Empty(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the feed
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Error from the NLP backend
    #[error("NLP error: {0}")]
    Nlp(#[from] NlpError),

    /// Error from the haiku store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
