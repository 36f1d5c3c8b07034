//! Semantic index configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Pinecone index configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Pinecone API key
    pub pinecone_api_key: Option<String>,

    /// Index data-plane host, e.g. `https://tables-abc123.svc.us-east-1.pinecone.io`
    pub index_host: String,

    /// Optional namespace isolating this deployment's vectors
    pub namespace: Option<String>,

    /// Number of context documents retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl IndexConfig {
    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.pinecone_api_key
            .as_ref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Validate index configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("PINECONE_API_KEY"));
        }
        if self.index_host.is_empty() {
            return Err(ValidationError::MissingRequired("INDEX_HOST"));
        }
        if !self.index_host.starts_with("https://") {
            return Err(ValidationError::IndexHostMustBeHttps);
        }
        if self.top_k == 0 || self.top_k > 50 {
            return Err(ValidationError::InvalidTopK);
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            pinecone_api_key: None,
            index_host: String::new(),
            namespace: None,
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> IndexConfig {
        IndexConfig {
            pinecone_api_key: Some("pc-xxx".to_string()),
            index_host: "https://tables-abc123.svc.us-east-1.pinecone.io".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_retrieval_depth_is_five() {
        assert_eq!(IndexConfig::default().top_k, 5);
    }

    #[test]
    fn accepts_full_configuration() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn rejects_missing_key_or_host() {
        let config = IndexConfig::default();
        assert!(config.validate().is_err());

        let config = IndexConfig {
            index_host: String::new(),
            ..configured()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_plain_http_host() {
        let config = IndexConfig {
            index_host: "http://tables.pinecone.io".to_string(),
            ..configured()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_top_k() {
        let config = IndexConfig {
            top_k: 0,
            ..configured()
        };
        assert!(config.validate().is_err());
    }
}
