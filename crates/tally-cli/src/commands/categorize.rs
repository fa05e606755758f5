//! Categorization commands

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{Categorizer, TransactionRecord};

/// Categorize a single transaction described on the command line
pub fn cmd_categorize(
    categorizer: &Categorizer,
    text: &str,
    amount: f64,
    merchant: Option<&str>,
    note: Option<&str>,
    json: bool,
) -> Result<()> {
    let tx = TransactionRecord {
        name: text.to_string(),
        merchant_name: merchant.map(str::to_string),
        description: note.map(str::to_string),
        amount,
    };
    let category = categorizer.categorize(&tx);

    if json {
        println!(
            "{}",
            serde_json::json!({ "name": tx.name, "amount": tx.amount, "category": category })
        );
    } else {
        println!("{}", category);
    }
    Ok(())
}

/// Categorize every row of a CSV file
///
/// Expects a header row of `name,merchant_name,description,amount`.
/// Output preserves input order.
pub fn cmd_categorize_file(categorizer: &Categorizer, path: &Path, json: bool) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut transactions = Vec::new();
    for record in reader.deserialize() {
        let tx: TransactionRecord = record.context("Invalid CSV row")?;
        transactions.push(tx);
    }

    let categorized = categorizer.categorize_all(transactions);

    if json {
        println!("{}", serde_json::to_string_pretty(&categorized)?);
    } else {
        for item in &categorized {
            println!("{}\t{}", item.category, item.transaction.name);
        }
        eprintln!("{} transactions categorized", categorized.len());
    }
    Ok(())
}

/// Print candidate categories for a merchant name
pub fn cmd_suggest(categorizer: &Categorizer, merchant: &str, json: bool) -> Result<()> {
    let suggestions = categorizer.suggest_categories(merchant);

    if json {
        println!(
            "{}",
            serde_json::json!({ "merchant": merchant, "categories": suggestions })
        );
    } else {
        for category in &suggestions {
            println!("{}", category);
        }
    }
    Ok(())
}
