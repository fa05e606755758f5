//! Deterministic hashed bag-of-words embeddings
//!
//! Used when no remote embedding provider is configured. Each token is
//! hashed into one of the vector's buckets and the result is
//! L2-normalized, so inner product over these vectors behaves like cosine
//! similarity. The output is bit-identical for identical input, which is
//! what makes the fallback testable in place of a real model.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::Result;

use super::{EmbeddingBackend, EMBEDDING_DIM};

/// Hashed bag-of-words embedding backend
#[derive(Debug, Clone)]
pub struct HashedBackend {
    dimension: usize,
}

impl HashedBackend {
    /// Create a backend with the store's standard dimension
    pub fn new() -> Self {
        Self {
            dimension: EMBEDDING_DIM,
        }
    }

    /// Create a backend with an explicit dimension
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Embed synchronously. Pure computation, no failure mode.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimension];
        for token in tokenize(text) {
            let bucket = (token_hash(&token) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        l2_normalize_in_place(&mut vector);
        vector
    }
}

impl Default for HashedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for HashedBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model(&self) -> &str {
        "hashed-bow"
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Split text into lowercase alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stable token hash: first 8 bytes of the SHA-256 digest
///
/// SHA-256 rather than a sip/fx hash so the same token lands in the same
/// bucket on every platform and release.
fn token_hash(token: &str) -> u64 {
    let digest = Sha256::digest(token.as_bytes());
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

/// In-place L2 normalization; the zero vector is left untouched
fn l2_normalize_in_place(v: &mut [f32]) {
    let norm = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm > 0.0 {
        let inv = 1.0 / norm as f32;
        for x in v.iter_mut() {
            *x *= inv;
        }
    }
}
