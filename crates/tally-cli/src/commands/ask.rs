//! Knowledge retrieval command

use anyhow::Result;
use tracing::debug;

use tally_core::{build_corpus, builtin_articles, EmbeddingBackend, RetrievalEngine};

/// Search the builtin knowledge corpus and print the top hits
pub async fn cmd_ask(query: &str, limit: usize, json: bool) -> Result<()> {
    let corpus = build_corpus(&builtin_articles(), &[], &[]);
    let engine = RetrievalEngine::from_env(corpus);
    debug!(model = %engine.embedder().model(), documents = engine.corpus_len(), "Searching knowledge corpus");

    let hits = engine.search(query, limit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No relevant documents found.");
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!("{}. {}", i + 1, hit.title);
        println!("   {}", hit.content);
    }
    Ok(())
}
