/*!
 * Tests for error types and conversions
 */

use newshaiku::errors::{AppError, FeedError, NlpError, StoreError};

/// Test that feed errors render their details
#[test]
fn test_feedError_display_shouldIncludeDetails() {
    let error = FeedError::HttpStatus {
        status_code: 503,
        message: "Service Unavailable".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Feed server responded with error: 503 - Service Unavailable"
    );

    let error = FeedError::ParseError("no channel".to_string());
    assert!(error.to_string().contains("no channel"));
}

/// Test that NLP errors convert into the application error
#[test]
fn test_appError_fromNlpError_shouldWrap() {
    let app_error: AppError = NlpError::InvalidTokens("index 3 out of order".to_string()).into();

    assert!(matches!(app_error, AppError::Nlp(NlpError::InvalidTokens(_))));
    assert!(app_error.to_string().starts_with("NLP error:"));
}

/// Test that I/O errors convert into store errors
#[test]
fn test_storeError_fromIoError_shouldWrap() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "haikus.json");
    let store_error: StoreError = io_error.into();

    assert!(matches!(store_error, StoreError::Io(_)));

    let app_error: AppError = store_error.into();
    assert!(app_error.to_string().contains("haikus.json"));
}

/// Test that JSON errors convert into store errors
#[test]
fn test_storeError_fromJsonError_shouldWrap() {
    let json_error = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
    let store_error: StoreError = json_error.into();
    assert!(matches!(store_error, StoreError::Serialization(_)));
}

/// Test that anyhow errors fall back to the unknown variant
#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(ref message) if message == "something odd"));
}
