//! Document retrieval for assistant context
//!
//! Ranks a fixed in-memory corpus against a free-text query and returns
//! the top-K documents for prompt augmentation. Two ranking paths:
//!
//! - **Vector path**: batch-embeds the corpus into a lazily-built index
//!   and ranks by cosine similarity. The index goes absent → building →
//!   ready; any build or query failure drops it back to absent so the next
//!   call retries, and the failing call degrades to the keyword path.
//! - **Keyword path**: a pure substring/keyword-overlap scorer over the
//!   already-loaded documents. It cannot fail, which makes it the
//!   permanent safety net: `search` never returns an error and the chat
//!   layer never sees a retrieval failure, only lower-quality context.

use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::embed::{tokenize, EmbeddingBackend, EmbeddingClient};
use crate::error::{Error, Result};
use crate::models::{Document, SearchHit};

/// Similarity index over the corpus, built at most once per engine
/// generation
struct VectorIndex {
    dimension: usize,
    /// One vector per corpus document, in corpus order
    vectors: Vec<Vec<f32>>,
}

/// Retrieval engine over an immutable document corpus
pub struct RetrievalEngine {
    corpus: Arc<Vec<Document>>,
    embedder: EmbeddingClient,
    vector_search: bool,
    /// Lazily-built index. The async mutex is held across construction so
    /// concurrent first callers wait for one shared build instead of
    /// racing to duplicate it.
    index: Mutex<Option<Arc<VectorIndex>>>,
}

impl RetrievalEngine {
    /// Create an engine with the vector path enabled
    pub fn new(corpus: Vec<Document>, embedder: EmbeddingClient) -> Self {
        Self::with_vector_search(corpus, embedder, true)
    }

    /// Create an engine with an explicit vector-path switch
    pub fn with_vector_search(
        corpus: Vec<Document>,
        embedder: EmbeddingClient,
        vector_search: bool,
    ) -> Self {
        Self {
            corpus: Arc::new(corpus),
            embedder,
            vector_search,
            index: Mutex::new(None),
        }
    }

    /// Create an engine configured from the environment
    ///
    /// The embedding backend comes from [`EmbeddingClient::from_env`];
    /// `TALLY_VECTOR_SEARCH=off|0|false` disables the vector path
    /// entirely, leaving the pure keyword scorer.
    pub fn from_env(corpus: Vec<Document>) -> Self {
        let vector_search =
            vector_search_enabled(std::env::var("TALLY_VECTOR_SEARCH").ok().as_deref());
        Self::with_vector_search(corpus, EmbeddingClient::from_env(), vector_search)
    }

    /// The embedding backend this engine was built with
    pub fn embedder(&self) -> &EmbeddingClient {
        &self.embedder
    }

    /// Number of documents in the corpus
    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    /// Whether the vector index is currently built
    pub async fn index_ready(&self) -> bool {
        self.index.lock().await.is_some()
    }

    /// Rank the corpus against a query and return the top `top_k` hits
    ///
    /// Total: provider or index failures are logged, the cached index is
    /// invalidated (forcing a rebuild attempt on the next call), and the
    /// current call falls through to the keyword scorer.
    pub async fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        if self.vector_search {
            match self.vector_rank(query, top_k).await {
                Ok(hits) => return hits,
                Err(e) => {
                    warn!(error = %e, "Vector search failed, falling back to keyword scoring");
                    self.invalidate().await;
                }
            }
        }
        self.keyword_search(query, top_k)
    }

    /// Drop the cached index so the next call rebuilds it
    pub async fn invalidate(&self) {
        *self.index.lock().await = None;
    }

    /// Vector-path ranking: build-or-reuse the index, embed the query,
    /// rank by cosine similarity
    async fn vector_rank(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let index = {
            let mut guard = self.index.lock().await;
            match guard.as_ref() {
                Some(index) => Arc::clone(index),
                None => {
                    let built = Arc::new(self.build_index().await?);
                    *guard = Some(Arc::clone(&built));
                    built
                }
            }
        };

        let query_vector = self.embedder.embed(query).await?;
        if query_vector.len() != index.dimension {
            return Err(Error::Index(format!(
                "Query vector dimension {} does not match index dimension {}",
                query_vector.len(),
                index.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = index
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(&query_vector, v)))
            .collect();
        // Stable sort: equal similarities keep corpus insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(i, _)| hit(&self.corpus[i]))
            .collect())
    }

    /// Batch-embed the whole corpus into a fresh index
    async fn build_index(&self) -> Result<VectorIndex> {
        debug!(documents = self.corpus.len(), model = %self.embedder.model(), "Building vector index");
        let texts: Vec<String> = self
            .corpus
            .iter()
            .map(|d| format!("{}\n{}", d.title, d.content))
            .collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let dimension = self.embedder.dimension();
        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(Error::Index(format!(
                    "Document {} embedded to dimension {} (expected {})",
                    i,
                    vector.len(),
                    dimension
                )));
            }
        }

        Ok(VectorIndex { dimension, vectors })
    }

    /// Keyword-overlap ranking, the zero-dependency path
    ///
    /// Deterministic: identical (query, corpus) pairs always produce the
    /// same ranking. Documents scoring zero are dropped, so the result may
    /// be shorter than `top_k`.
    pub fn keyword_search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let query_lower = query.to_lowercase();
        let tokens = tokenize(&query_lower);

        let mut scored: Vec<(usize, u32)> = self
            .corpus
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| {
                let score = score_document(&query_lower, &tokens, doc);
                (score > 0).then_some((i, score))
            })
            .collect();
        // Stable sort: equal scores keep corpus insertion order.
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        scored
            .into_iter()
            .take(top_k)
            .map(|(i, _)| hit(&self.corpus[i]))
            .collect()
    }
}

/// Score one document against a lowercased query
///
/// Weights: title containment 10, content containment 5, each keyword the
/// query contains 3 (plus 1 per query token over 3 chars contained in that
/// keyword), category containment 2.
fn score_document(query_lower: &str, tokens: &[String], doc: &Document) -> u32 {
    let mut score = 0u32;

    if doc.title.to_lowercase().contains(query_lower) {
        score += 10;
    }
    if doc.content.to_lowercase().contains(query_lower) {
        score += 5;
    }

    for keyword in &doc.keywords {
        let keyword = keyword.to_lowercase();
        if query_lower.contains(keyword.as_str()) {
            score += 3;
        }
        score += tokens
            .iter()
            .filter(|t| t.len() > 3 && keyword.contains(t.as_str()))
            .count() as u32;
    }

    if let Some(ref category) = doc.category {
        if query_lower.contains(&category.to_lowercase()) {
            score += 2;
        }
    }

    score
}

/// Interpret the `TALLY_VECTOR_SEARCH` switch (unset means enabled)
fn vector_search_enabled(value: Option<&str>) -> bool {
    match value {
        Some(v) => !matches!(v.to_lowercase().as_str(), "off" | "0" | "false"),
        None => true,
    }
}

fn hit(doc: &Document) -> SearchHit {
    SearchHit {
        title: doc.title.clone(),
        content: doc.content.clone(),
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0f32;
    let mut norm_a = 0f32;
    let mut norm_b = 0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
