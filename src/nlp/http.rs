use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::NlpConfig;
use crate::errors::NlpError;
use crate::nlp::{Document, NlpBackend, PartOfSpeech, Token};
use crate::retry::backoff_delay_ms;

/// Client for a spaCy-style analysis service
#[derive(Debug)]
pub struct SpacyClient {
    /// Base URL of the service
    base_url: String,
    /// Model/pipeline name requested on every call
    model: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Ask the service for token vectors
    with_vectors: bool,
}

/// Analysis request
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    model: &'a str,
    vectors: bool,
}

/// Analysis response
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    tokens: Vec<WireToken>,
}

/// Token as sent by the service
#[derive(Debug, Deserialize)]
struct WireToken {
    i: usize,
    text: String,
    #[serde(default)]
    is_punct: bool,
    #[serde(default)]
    is_space: bool,
    /// spaCy leaves this unset when the parser made no decision
    #[serde(default)]
    is_sent_start: Option<bool>,
    #[serde(default)]
    pos: String,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

impl From<WireToken> for Token {
    fn from(wire: WireToken) -> Self {
        let mut token = Token::word(wire.i, wire.text, PartOfSpeech::from_tag(&wire.pos))
            .sent_start(wire.is_sent_start.unwrap_or(false))
            .tag(wire.tag);
        token.is_punct = wire.is_punct;
        token.is_space = wire.is_space;

        match wire.vector {
            Some(vector) if !vector.is_empty() => token.vector(vector),
            _ => token,
        }
    }
}

/// Word vector request
#[derive(Debug, Serialize)]
struct VectorRequest<'a> {
    text: &'a str,
    model: &'a str,
}

/// Word vector response
#[derive(Debug, Deserialize)]
struct VectorResponse {
    vector: Vec<f32>,
}

impl SpacyClient {
    /// Create a new client from the NLP configuration
    pub fn new(config: &NlpConfig) -> Self {
        Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
            with_vectors: false,
        }
    }

    /// Request token vectors with every analysis
    pub fn with_vectors(mut self, with_vectors: bool) -> Self {
        self.with_vectors = with_vectors;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body with retry logic
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, NlpError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<R>()
                            .await
                            .map_err(|e| NlpError::ParseError(e.to_string()));
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    if status.is_server_error() {
                        // Server error - can retry
                        error!(
                            "NLP service error ({}): {} - attempt {}/{}",
                            status,
                            error_text,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(NlpError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        // Client error - don't retry
                        return Err(NlpError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    error!(
                        "NLP service network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(NlpError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = backoff_delay_ms(self.backoff_base_ms, attempt);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            NlpError::RequestFailed(format!(
                "request to {} failed after {} attempts",
                url,
                self.max_retries + 1
            ))
        }))
    }
}

#[async_trait]
impl NlpBackend for SpacyClient {
    async fn analyze(&self, text: &str) -> Result<Document, NlpError> {
        let request = AnalyzeRequest {
            text,
            model: &self.model,
            vectors: self.with_vectors,
        };
        let response: AnalyzeResponse = self.post_json("/analyze", &request).await?;
        debug!("NLP service returned {} tokens", response.tokens.len());

        Document::new(response.tokens.into_iter().map(Token::from).collect())
    }

    async fn embed(&self, word: &str) -> Result<Vec<f32>, NlpError> {
        let request = VectorRequest {
            text: word,
            model: &self.model,
        };
        let response: VectorResponse = self.post_json("/vector", &request).await?;
        Ok(response.vector)
    }

    async fn test_connection(&self) -> Result<(), NlpError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NlpError::RequestFailed(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NlpError::ApiError {
                status_code: response.status().as_u16(),
                message: format!("health check failed for {}", url),
            })
        }
    }
}
