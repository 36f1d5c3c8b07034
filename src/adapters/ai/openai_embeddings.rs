//! OpenAI Embeddings - EmbeddingModel implementation for OpenAI's API.
//!
//! Embeds batches in a single request. The API may return vectors out
//! of order, so results are reordered by their index field before the
//! batch is handed back.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{EmbeddingError, EmbeddingModel};

/// Configuration for the OpenAI embedding model.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "text-embedding-ada-002").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAiEmbeddingConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "text-embedding-ada-002".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI embeddings implementation.
pub struct OpenAiEmbeddingModel {
    config: OpenAiEmbeddingConfig,
    client: Client,
}

impl OpenAiEmbeddingModel {
    /// Creates a new embedding model with the given configuration.
    pub fn new(config: OpenAiEmbeddingConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the embeddings endpoint URL.
    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.config.base_url)
    }

    /// Sends a request and handles transport-level failures.
    async fn send_request(&self, texts: &[String]) -> Result<Response, EmbeddingError> {
        let request = EmbeddingApiRequest {
            model: &self.config.model,
            input: texts,
        };

        self.client
            .post(self.embeddings_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    EmbeddingError::Network(format!("Connection failed: {}", e))
                } else {
                    EmbeddingError::Network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, EmbeddingError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(EmbeddingError::AuthenticationFailed),
            429 => Err(EmbeddingError::RateLimited {
                retry_after_secs: 30,
            }),
            500..=599 => Err(EmbeddingError::Unavailable {
                message: format!("Server error {}: {}", status, error_body),
            }),
            _ => Err(EmbeddingError::Network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses a successful response into ordered vectors.
    async fn parse_response(
        &self,
        response: Response,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let response = self.handle_response_status(response).await?;

        let api_response: EmbeddingApiResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Parse(format!("Failed to parse response: {}", e)))?;

        vectors_from_response(api_response, expected)
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiEmbeddingModel {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut last_error = EmbeddingError::Network("No attempts made".to_string());
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.send_request(texts).await {
                Ok(response) => match self.parse_response(response, texts.len()).await {
                    Ok(vectors) => return Ok(vectors),
                    Err(err) => {
                        if !err.is_retryable() || retry_count >= self.config.max_retries {
                            return Err(err);
                        }
                        last_error = err;
                    }
                },
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Reorders response vectors by index and checks the count.
fn vectors_from_response(
    response: EmbeddingApiResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: data.len(),
        });
    }

    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct EmbeddingApiRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}
