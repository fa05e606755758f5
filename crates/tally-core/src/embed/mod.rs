//! Pluggable embedding backend abstraction
//!
//! The retrieval engine consumes embeddings through a backend-agnostic
//! interface. A remote OpenAI-compatible provider is used when one is
//! configured; otherwise a deterministic hashed bag-of-words generator
//! stands in so the engine works with zero external dependencies.
//!
//! # Architecture
//!
//! - `EmbeddingBackend` trait: defines the interface for all backends
//! - `EmbeddingClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `RemoteBackend`, `HashedBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `EMBEDDINGS_HOST`: remote provider URL; absent selects the hashed fallback
//! - `EMBEDDINGS_MODEL`: model name (default: nomic-embed-text)
//! - `EMBEDDINGS_API_KEY`: bearer token if the provider requires one (optional)

mod hashed;
mod remote;

pub use hashed::{tokenize, HashedBackend};
pub use remote::RemoteBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Vector dimension shared by every backend in a store
///
/// Fixed per store instance; the index build rejects vectors of any other
/// length.
pub const EMBEDDING_DIM: usize = 384;

/// Trait defining the interface for all embedding backends
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, output order matching input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Vector dimension this backend produces
    fn dimension(&self) -> usize;

    /// Model name (for logging and status display)
    fn model(&self) -> &str;

    /// Whether the backend is reachable
    async fn health_check(&self) -> bool;
}

/// Concrete embedding client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum EmbeddingClient {
    /// Remote OpenAI-compatible provider
    Remote(RemoteBackend),
    /// Deterministic hashed bag-of-words fallback
    Hashed(HashedBackend),
}

impl EmbeddingClient {
    /// Select a backend from the environment
    ///
    /// The presence of `EMBEDDINGS_HOST` is the whole switch: set, the
    /// remote provider is used; unset, the hashed fallback. There is no
    /// per-call branching downstream of this choice.
    pub fn from_env() -> Self {
        match RemoteBackend::from_env() {
            Some(remote) => EmbeddingClient::Remote(remote),
            None => EmbeddingClient::Hashed(HashedBackend::new()),
        }
    }

    /// Create a hashed fallback client
    pub fn hashed() -> Self {
        EmbeddingClient::Hashed(HashedBackend::new())
    }

    /// Create a remote client directly
    pub fn remote(host: &str, model: &str) -> Self {
        EmbeddingClient::Remote(RemoteBackend::new(host, model))
    }

    /// True when backed by a remote provider
    pub fn is_remote(&self) -> bool {
        matches!(self, EmbeddingClient::Remote(_))
    }
}

#[async_trait]
impl EmbeddingBackend for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self {
            EmbeddingClient::Remote(b) => b.embed(text).await,
            EmbeddingClient::Hashed(b) => b.embed(text).await,
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self {
            EmbeddingClient::Remote(b) => b.embed_batch(texts).await,
            EmbeddingClient::Hashed(b) => b.embed_batch(texts).await,
        }
    }

    fn dimension(&self) -> usize {
        match self {
            EmbeddingClient::Remote(b) => b.dimension(),
            EmbeddingClient::Hashed(b) => b.dimension(),
        }
    }

    fn model(&self) -> &str {
        match self {
            EmbeddingClient::Remote(b) => b.model(),
            EmbeddingClient::Hashed(b) => b.model(),
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            EmbeddingClient::Remote(b) => b.health_check().await,
            EmbeddingClient::Hashed(b) => b.health_check().await,
        }
    }
}
