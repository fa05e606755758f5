//! Integration tests for tally-core
//!
//! These tests exercise the full corpus → engine → search workflow and the
//! categorization flow the assistant layer drives, including provider
//! failure and recovery against the mock embedding server.

use chrono::NaiveDate;
use tally_core::{
    build_corpus, builtin_articles, categorize::CategoryTable, test_utils::MockEmbeddingServer,
    AccountSnapshot, Categorizer, EmbeddingBackend, EmbeddingClient, RetrievalEngine, ToolCall,
    TransactionRecord, TransactionSnapshot,
};

fn sample_accounts() -> Vec<AccountSnapshot> {
    vec![AccountSnapshot {
        id: "acc-1".to_string(),
        name: "Everyday Checking".to_string(),
        account_type: "checking".to_string(),
        balance: 2450.10,
    }]
}

fn sample_transactions() -> Vec<TransactionSnapshot> {
    vec![
        TransactionSnapshot {
            id: "tx-1".to_string(),
            description: "STARBUCKS #4521".to_string(),
            amount: 5.75,
            date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            category: Some("Dining".to_string()),
        },
        TransactionSnapshot {
            id: "tx-2".to_string(),
            description: "Payroll Deposit".to_string(),
            amount: -3500.00,
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            category: Some("Income".to_string()),
        },
    ]
}

// =============================================================================
// Retrieval workflow
// =============================================================================

#[tokio::test]
async fn test_full_retrieval_workflow_with_hashed_embeddings() {
    let corpus = build_corpus(&builtin_articles(), &sample_accounts(), &sample_transactions());
    let engine = RetrievalEngine::new(corpus, EmbeddingClient::hashed());

    let hits = engine.search("how should I build an emergency fund", 3).await;
    assert!(!hits.is_empty());
    assert!(hits.len() <= 3);
    assert_eq!(hits[0].title, "Emergency Fund 101");
    assert!(engine.index_ready().await);
}

#[tokio::test]
async fn test_remote_provider_end_to_end() {
    let mut server = MockEmbeddingServer::start().await;

    let corpus = build_corpus(&builtin_articles(), &[], &[]);
    let engine = RetrievalEngine::new(
        corpus,
        EmbeddingClient::remote(&server.url(), "nomic-embed-text"),
    );

    assert!(engine.embedder().health_check().await);

    let hits = engine.search("avalanche or snowball for paying off debt", 2).await;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "Avalanche vs. Snowball Debt Payoff");
    assert!(engine.index_ready().await);

    server.stop();
}

#[tokio::test]
async fn test_index_build_failure_falls_back_then_rebuilds() {
    // First embedding request fails: the engine must answer from the
    // keyword scorer without surfacing an error, and must not give up on
    // the vector path permanently.
    let mut server = MockEmbeddingServer::start_with_failures(1).await;

    let corpus = build_corpus(&builtin_articles(), &[], &[]);
    let engine = RetrievalEngine::new(
        corpus,
        EmbeddingClient::remote(&server.url(), "nomic-embed-text"),
    );

    let hits = engine.search("how much should I save for emergencies", 3).await;
    assert!(!hits.is_empty());
    assert_eq!(hits[0].title, "Emergency Fund 101");
    assert!(!engine.index_ready().await);

    // The server is healthy again; the next call rebuilds the index.
    let hits = engine.search("how much should I save for emergencies", 3).await;
    assert!(!hits.is_empty());
    assert!(engine.index_ready().await);

    server.stop();
}

#[tokio::test]
async fn test_query_failure_invalidates_ready_index() {
    let mut server = MockEmbeddingServer::start().await;

    let corpus = build_corpus(&builtin_articles(), &[], &[]);
    let engine = RetrievalEngine::new(
        corpus,
        EmbeddingClient::remote(&server.url(), "nomic-embed-text"),
    );

    // Build succeeds (corpus batch), then the query embed fails.
    // One request embeds the whole corpus, so arming a single failure
    // after the build only hits the query call.
    let hits = engine.search("emergency fund", 1).await;
    assert_eq!(hits.len(), 1);
    assert!(engine.index_ready().await);

    server.fail_next(1);
    let hits = engine.search("emergency fund", 1).await;
    assert_eq!(hits.len(), 1); // Keyword fallback still answers
    assert!(!engine.index_ready().await); // And the index was invalidated

    server.stop();
}

// =============================================================================
// Categorization workflow
// =============================================================================

#[test]
fn test_categorize_bulk_flow() {
    let categorizer = Categorizer::default();

    let transactions = vec![
        TransactionRecord::new("STARBUCKS #4521", 5.75),
        TransactionRecord::new("Payroll Deposit", -3500.00),
        TransactionRecord::new("WHOLE FOODS MARKET 123", 82.19),
        TransactionRecord::new("TOTALLY UNKNOWN LLC", 14.00),
    ];

    let categorized = categorizer.categorize_all(transactions);
    let categories: Vec<&str> = categorized.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(categories, vec!["Dining", "Income", "Groceries", "Shopping"]);
}

#[test]
fn test_category_table_override_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[category]]
name = "Coffee"
keywords = ["starbucks"]

[[category]]
name = "Dining"
keywords = ["restaurant"]
"#
    )
    .unwrap();

    let table = CategoryTable::load_from_path(file.path()).unwrap();
    assert_eq!(table.category_names(), vec!["Coffee", "Dining"]);

    let categorizer = Categorizer::new(table);
    let tx = TransactionRecord::new("STARBUCKS #4521", 5.75);
    assert_eq!(categorizer.categorize(&tx), "Coffee");
}

// =============================================================================
// Tool dispatch workflow
// =============================================================================

#[tokio::test]
async fn test_tool_calls_over_shared_components() {
    let categorizer = Categorizer::default();
    let corpus = build_corpus(&builtin_articles(), &[], &[]);
    let engine = RetrievalEngine::with_vector_search(corpus, EmbeddingClient::hashed(), false);

    for (name, args) in [
        (
            "search_knowledge",
            serde_json::json!({"query": "credit utilization"}),
        ),
        (
            "categorize_transaction",
            serde_json::json!({"name": "CHIPOTLE 1234", "amount": 11.50}),
        ),
        (
            "suggest_categories",
            serde_json::json!({"merchant": "netflix"}),
        ),
    ] {
        let call = ToolCall::parse(name, args).unwrap();
        let result = call.execute(&categorizer, &engine).await.unwrap();
        assert!(result.is_object());
    }
}
