//! Pinecone Index - SemanticIndex implementation over Pinecone's data plane.
//!
//! Stores one vector per crawled table, keyed by `schema.table` so a
//! re-crawl overwrites the previous document. The document text rides
//! along in vector metadata under the `text` key and is reassembled
//! into a ContextDocument at query time.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::catalog::{ContextDocument, DocumentMetadata};
use crate::ports::{EmbeddingModel, IndexError, SemanticIndex};

/// Configuration for the Pinecone index client.
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Index data-plane host, e.g. `https://tables-abc123.svc.us-east-1.pinecone.io`.
    pub index_host: String,
    /// Namespace isolating this deployment's vectors.
    pub namespace: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl PineconeConfig {
    /// Creates a new configuration for the given index host.
    pub fn new(api_key: impl Into<String>, index_host: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            index_host: index_host.into(),
            namespace: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Pinecone-backed semantic index.
///
/// Queries embed through the EmbeddingModel port first, then hit the
/// index for the nearest neighbors.
pub struct PineconeIndex {
    config: PineconeConfig,
    embedder: Arc<dyn EmbeddingModel>,
    client: Client,
}

impl PineconeIndex {
    /// Creates a new index client with the given configuration.
    pub fn new(config: PineconeConfig, embedder: Arc<dyn EmbeddingModel>) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            embedder,
            client,
        }
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.config.index_host)
    }

    fn upsert_url(&self) -> String {
        format!("{}/vectors/upsert", self.config.index_host)
    }

    /// Sends a data-plane request.
    async fn send<T: Serialize>(&self, url: String, body: &T) -> Result<Response, IndexError> {
        self.client
            .post(url)
            .header("Api-Key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    IndexError::Network(format!("Connection failed: {}", e))
                } else {
                    IndexError::Network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, IndexError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(IndexError::AuthenticationFailed),
            500..=599 => Err(IndexError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(IndexError::Network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl SemanticIndex for PineconeIndex {
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ContextDocument>, IndexError> {
        let vectors = self.embedder.embed(&[query.to_string()]).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| IndexError::Parse("embedding returned no vector for query".to_string()))?;

        let request = QueryApiRequest {
            vector,
            top_k: k,
            include_metadata: true,
            namespace: self.config.namespace.clone(),
        };

        let response = self.send(self.query_url(), &request).await?;
        let response = self.handle_response_status(response).await?;

        let api_response: QueryApiResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Parse(format!("Failed to parse query response: {}", e)))?;

        api_response
            .matches
            .into_iter()
            .map(document_from_match)
            .collect()
    }

    async fn add_documents(&self, documents: &[ContextDocument]) -> Result<(), IndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let values = self.embedder.embed(&texts).await?;

        let vectors = documents
            .iter()
            .zip(values)
            .map(|(doc, values)| UpsertVector {
                id: vector_id(&doc.metadata),
                values,
                metadata: StoredMetadata {
                    text: doc.text.clone(),
                    document: doc.metadata.clone(),
                },
            })
            .collect();

        let request = UpsertApiRequest {
            vectors,
            namespace: self.config.namespace.clone(),
        };

        let response = self.send(self.upsert_url(), &request).await?;
        self.handle_response_status(response).await?;
        Ok(())
    }
}

/// Vector id for a document, stable across re-crawls of the same table.
fn vector_id(metadata: &DocumentMetadata) -> String {
    format!("{}.{}", metadata.schema_name, metadata.table_name)
}

/// Reassembles a ContextDocument from a query match.
fn document_from_match(m: QueryMatch) -> Result<ContextDocument, IndexError> {
    let metadata = m
        .metadata
        .ok_or_else(|| IndexError::Parse(format!("match {} has no metadata", m.id)))?;

    Ok(ContextDocument {
        text: metadata.text,
        metadata: metadata.document,
    })
}

// ----- Pinecone API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryApiRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryApiResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    metadata: Option<StoredMetadata>,
}

#[derive(Debug, Serialize)]
struct UpsertApiRequest {
    vectors: Vec<UpsertVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: StoredMetadata,
}

/// Metadata stored with each vector: the document text plus the
/// identifying fields, flattened into one object.
#[derive(Debug, Serialize, Deserialize)]
struct StoredMetadata {
    text: String,
    #[serde(flatten)]
    document: DocumentMetadata,
}
