//! CLI command tests

use std::io::Write;

use clap::CommandFactory;
use tally_core::Categorizer;

use crate::cli::Cli;
use crate::commands;

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_cmd_categorize_single() {
    let categorizer = Categorizer::default();
    let result = commands::cmd_categorize(&categorizer, "STARBUCKS #4521", 5.75, None, None, false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_categorize_with_merchant_and_note() {
    let categorizer = Categorizer::default();
    let result = commands::cmd_categorize(
        &categorizer,
        "POS DEBIT 0392",
        12.85,
        Some("Chipotle Mexican Grill"),
        Some("lunch"),
        true,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_categorize_file() {
    let categorizer = Categorizer::default();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "name,merchant_name,description,amount").unwrap();
    writeln!(file, "STARBUCKS #4521,,,5.75").unwrap();
    writeln!(file, "Payroll Deposit,,,-3500.00").unwrap();
    file.flush().unwrap();

    let result = commands::cmd_categorize_file(&categorizer, file.path(), false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_categorize_file_missing() {
    let categorizer = Categorizer::default();
    let result =
        commands::cmd_categorize_file(&categorizer, std::path::Path::new("/no/such.csv"), false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_suggest() {
    let categorizer = Categorizer::default();
    let result = commands::cmd_suggest(&categorizer, "chipotle", false);
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_ask_runs_without_provider() {
    // No EMBEDDINGS_HOST in the test environment: the hashed backend
    // serves the query end to end.
    let result = commands::cmd_ask("how much should I save for emergencies", 3, true).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_status() {
    let categorizer = Categorizer::default();
    let result = commands::cmd_status(&categorizer, true).await;
    assert!(result.is_ok());
}
