//! Status command

use anyhow::Result;
use tally_core::{Categorizer, EmbeddingBackend, EmbeddingClient};

/// Show embedding backend mode/health and category table summary
pub async fn cmd_status(categorizer: &Categorizer, json: bool) -> Result<()> {
    let embedder = EmbeddingClient::from_env();
    let mode = if embedder.is_remote() { "remote" } else { "hashed" };
    let healthy = embedder.health_check().await;
    let categories = categorizer.table().category_names();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "embeddings": {
                    "mode": mode,
                    "model": embedder.model(),
                    "dimension": embedder.dimension(),
                    "healthy": healthy,
                },
                "categories": categories,
            })
        );
        return Ok(());
    }

    println!("Embeddings: {} ({})", mode, embedder.model());
    println!("  dimension: {}", embedder.dimension());
    println!("  healthy:   {}", healthy);
    println!("Categories: {}", categories.len());
    println!("  {}", categories.join(", "));
    Ok(())
}
