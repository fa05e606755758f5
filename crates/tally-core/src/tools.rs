//! Assistant tool implementations
//!
//! The chat assistant invokes operations by name with JSON arguments.
//! Rather than a name-keyed map of dynamically-typed handlers, the
//! supported operations form a closed enum: parsing preserves the
//! external name → handler contract while `execute` stays exhaustive at
//! compile time. All tools are read-only queries over the categorizer and
//! retrieval engine, safe for LLM invocation.

use serde::{Deserialize, Serialize};

use crate::categorize::Categorizer;
use crate::error::{Error, Result};
use crate::models::TransactionRecord;
use crate::retrieval::RetrievalEngine;

/// Maximum hits a search tool call may request
const MAX_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchKnowledgeParams {
    /// Free-text query to rank the knowledge corpus against
    #[schemars(description = "Question or topic to retrieve supporting documents for")]
    pub query: String,

    /// Maximum number of documents to return (default 3, max 10)
    #[schemars(description = "Maximum number of documents to return (default 3, max 10)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct CategorizeTransactionParams {
    /// Raw transaction description
    #[schemars(description = "Transaction name or bank description")]
    pub name: String,

    #[schemars(description = "Merchant name, if known")]
    pub merchant_name: Option<String>,

    #[schemars(description = "Free-text transaction note, if any")]
    pub description: Option<String>,

    /// Signed amount; negative means inbound funds
    #[schemars(description = "Signed transaction amount (negative = money in)")]
    pub amount: f64,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SuggestCategoriesParams {
    #[schemars(description = "Merchant name to suggest candidate categories for")]
    pub merchant: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct SearchKnowledgeResult {
    pub documents: Vec<KnowledgeDocument>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct KnowledgeDocument {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CategorizeTransactionResult {
    pub category: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct SuggestCategoriesResult {
    pub categories: Vec<String>,
}

/// The closed set of operations the assistant may invoke
#[derive(Debug)]
pub enum ToolCall {
    SearchKnowledge(SearchKnowledgeParams),
    CategorizeTransaction(CategorizeTransactionParams),
    SuggestCategories(SuggestCategoriesParams),
}

impl ToolCall {
    /// Tool names, as advertised to the model
    pub const NAMES: [&'static str; 3] = [
        "search_knowledge",
        "categorize_transaction",
        "suggest_categories",
    ];

    /// Resolve a named invocation with JSON arguments into a typed call
    pub fn parse(name: &str, args: serde_json::Value) -> Result<Self> {
        match name {
            "search_knowledge" => Ok(Self::SearchKnowledge(serde_json::from_value(args)?)),
            "categorize_transaction" => {
                Ok(Self::CategorizeTransaction(serde_json::from_value(args)?))
            }
            "suggest_categories" => Ok(Self::SuggestCategories(serde_json::from_value(args)?)),
            _ => Err(Error::InvalidData(format!("Unknown tool: {}", name))),
        }
    }

    /// The wire name of this call
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchKnowledge(_) => "search_knowledge",
            Self::CategorizeTransaction(_) => "categorize_transaction",
            Self::SuggestCategories(_) => "suggest_categories",
        }
    }

    /// Run the call against the injected components
    pub async fn execute(
        &self,
        categorizer: &Categorizer,
        engine: &RetrievalEngine,
    ) -> Result<serde_json::Value> {
        match self {
            Self::SearchKnowledge(params) => {
                let limit = params.limit.unwrap_or(3).clamp(1, MAX_SEARCH_LIMIT);
                let documents = engine
                    .search(&params.query, limit)
                    .await
                    .into_iter()
                    .map(|hit| KnowledgeDocument {
                        title: hit.title,
                        content: hit.content,
                    })
                    .collect();
                Ok(serde_json::to_value(SearchKnowledgeResult { documents })?)
            }
            Self::CategorizeTransaction(params) => {
                let tx = TransactionRecord {
                    name: params.name.clone(),
                    merchant_name: params.merchant_name.clone(),
                    description: params.description.clone(),
                    amount: params.amount,
                };
                let category = categorizer.categorize(&tx).to_string();
                Ok(serde_json::to_value(CategorizeTransactionResult {
                    category,
                })?)
            }
            Self::SuggestCategories(params) => {
                let categories = categorizer.suggest_categories(&params.merchant);
                Ok(serde_json::to_value(SuggestCategoriesResult { categories })?)
            }
        }
    }
}
