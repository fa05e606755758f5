//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance assistant:
//! - Deterministic keyword categorization of transactions
//! - Category suggestion for merchant names
//! - Document corpus assembly (knowledge articles + account and
//!   transaction snapshots)
//! - Retrieval engine with embedding-backed ranking and a keyword fallback
//! - Pluggable embedding backends (remote provider or hashed bag-of-words)
//! - Closed tool-call dispatch for the assistant layer

pub mod categorize;
pub mod corpus;
pub mod embed;
pub mod error;
pub mod models;
pub mod retrieval;
pub mod tools;

/// Test utilities including the mock embedding server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use categorize::{
    CategoryRule, CategoryTable, Categorizer, DEFAULT_CATEGORY, DEFAULT_SUGGESTIONS,
    INCOME_CATEGORY,
};
pub use corpus::{build_corpus, builtin_articles};
pub use embed::{
    EmbeddingBackend, EmbeddingClient, HashedBackend, RemoteBackend, EMBEDDING_DIM,
};
pub use error::{Error, Result};
pub use models::{
    AccountSnapshot, CategorizedTransaction, Document, DocumentKind, KnowledgeArticle, SearchHit,
    TransactionRecord, TransactionSnapshot,
};
pub use retrieval::RetrievalEngine;
pub use tools::ToolCall;
