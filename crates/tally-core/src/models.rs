//! Core data types shared across the categorizer and retrieval engine
//!
//! These are the shapes the surrounding application hands us: transaction
//! records at categorization time, and account/transaction snapshots plus
//! knowledge articles at corpus-build time. All of them are plain data;
//! persistence lives elsewhere.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A transaction as seen by the categorizer
///
/// `name` is the raw bank description; `merchant_name` and `description`
/// are optional enrichments. Missing text fields are treated as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub name: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Signed amount. Negative means inbound funds (see `Categorizer`).
    pub amount: f64,
}

impl TransactionRecord {
    /// Convenience constructor for a name-and-amount-only record
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            merchant_name: None,
            description: None,
            amount,
        }
    }
}

/// A transaction annotated with its assigned category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: TransactionRecord,
    pub category: String,
}

/// A financial knowledge article, the richest of the three corpus sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Point-in-time account summary supplied by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: String,
    pub name: String,
    /// e.g. "checking", "savings", "credit"
    pub account_type: String,
    pub balance: f64,
}

/// Point-in-time transaction summary supplied by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
}

/// Which source a corpus document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Knowledge,
    Account,
    Transaction,
}

/// A unit of retrievable text with its ranking metadata
///
/// The corpus is built once from the three source collections and stays
/// immutable for the engine's lifetime; a refresh means building a new
/// corpus and a new engine around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub kind: DocumentKind,
}

/// One retrieval result: what gets spliced into the assistant prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub content: String,
}
