//! Remote embedding backend
//!
//! Works with any server that implements the OpenAI embeddings API:
//! - Ollama (http://localhost:11434)
//! - LocalAI, llama-server, text-embeddings-inference
//! - Hosted providers behind an API key
//!
//! # Configuration
//!
//! Environment variables:
//! - `EMBEDDINGS_HOST`: server URL (required)
//! - `EMBEDDINGS_MODEL`: model name (default: nomic-embed-text)
//! - `EMBEDDINGS_API_KEY`: bearer token if required (optional)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::{EmbeddingBackend, EMBEDDING_DIM};

/// OpenAI-compatible embedding backend
pub struct RemoteBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl Clone for RemoteBackend {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

impl RemoteBackend {
    /// Create a new remote backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
    }

    /// Create from environment variables
    ///
    /// Required: `EMBEDDINGS_HOST`
    /// Optional: `EMBEDDINGS_MODEL` (default: nomic-embed-text)
    /// Optional: `EMBEDDINGS_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("EMBEDDINGS_HOST").ok()?;
        let model =
            std::env::var("EMBEDDINGS_MODEL").unwrap_or_else(|_| "nomic-embed-text".to_string());
        let mut backend = Self::new(&host, &model);
        backend.api_key = std::env::var("EMBEDDINGS_API_KEY").ok();
        Some(backend)
    }

    /// The host URL (for logging and status display)
    pub fn host(&self) -> &str {
        &self.base_url
    }

    /// Issue one embeddings request for a slice of inputs
    async fn request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingsRequest {
            model: self.model.clone(),
            input: inputs.to_vec(),
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/embeddings", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Provider error {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await?;
        debug!(count = parsed.data.len(), model = %self.model, "Embeddings received");

        if parsed.data.len() != inputs.len() {
            return Err(Error::Embedding(format!(
                "Provider returned {} vectors for {} inputs",
                parsed.data.len(),
                inputs.len()
            )));
        }

        // Providers may return items out of order; restore by index.
        let mut vectors: Vec<Vec<f32>> = vec![Vec::new(); inputs.len()];
        for item in parsed.data {
            let slot = vectors.get_mut(item.index).ok_or_else(|| {
                Error::Embedding(format!("Provider returned out-of-range index {}", item.index))
            })?;
            *slot = item.embedding;
        }
        Ok(vectors)
    }
}

/// Request to the embeddings endpoint
#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

/// Response from the embeddings endpoint
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingBackend for RemoteBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.request(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("Provider returned no vector".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1/models", self.base_url);
        match self.http_client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
