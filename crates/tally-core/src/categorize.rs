//! Keyword-based transaction categorization
//!
//! Categorization walks an ordered keyword table: the first category whose
//! keyword list hits the transaction text wins, so table order is part of
//! the configuration contract. Negative amounts are classified as income
//! before any text matching happens, and anything that matches nothing
//! lands in "Shopping".
//!
//! ## Configuration resolution
//!
//! The table is loaded once at startup with a two-layer resolution:
//! 1. Check for an override in the data dir
//!    (~/.local/share/tally/config/categories.toml)
//! 2. Fall back to embedded defaults (compiled into the binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CategorizedTransaction, TransactionRecord};

/// Embedded default category table (compiled into binary)
const DEFAULT_TABLE: &str = include_str!("../../../config/categories.toml");

/// Category assigned to inbound funds, ahead of any keyword matching.
///
/// Sign convention, pinned here and nowhere else: a negative amount is
/// money coming in. The feeds this data comes from disagree about sign
/// direction, so if yours is inverted, flip it at ingestion, not here.
pub const INCOME_CATEGORY: &str = "Income";

/// Category assigned when no keyword matches
pub const DEFAULT_CATEGORY: &str = "Shopping";

/// Suggestions returned when a merchant matches no category at all
pub const DEFAULT_SUGGESTIONS: [&str; 3] = ["Shopping", "Dining", "Entertainment"];

/// One row of the category table: a category and the keywords that select it
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Raw TOML structure for table parsing
#[derive(Debug, Deserialize)]
struct RawTable {
    category: Vec<CategoryRule>,
}

/// Ordered, immutable category table
///
/// Keywords are lowercased at load time; matching is case-insensitive
/// substring containment against the lowercased transaction text.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    /// Load the table (override file if present, embedded default otherwise)
    pub fn load() -> Result<Self> {
        if let Some(path) = default_table_path() {
            if path.exists() {
                debug!(path = %path.display(), "Loading category table override");
                let content = fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Failed to read category table: {}", e)))?;
                return Self::parse(&content);
            }
        }
        Self::parse(DEFAULT_TABLE)
    }

    /// Load from an explicit file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read category table: {}", e)))?;
        Self::parse(content.as_str())
    }

    /// Parse a table from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawTable = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid category table TOML: {}", e)))?;
        if raw.category.is_empty() {
            return Err(Error::Config("Category table has no rules".to_string()));
        }
        Ok(Self::with_rules(raw.category))
    }

    /// Build a table from explicit rules (for tests and embedding callers)
    pub fn with_rules(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule {
                name: r.name,
                keywords: r.keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category names in declaration order
    pub fn category_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        // The embedded table is compiled in and validated by tests, so
        // parsing it cannot fail at runtime.
        Self::parse(DEFAULT_TABLE).unwrap_or_else(|_| Self { rules: Vec::new() })
    }
}

/// Default override path for the category table
pub fn default_table_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("categories.toml"))
}

/// Deterministic keyword categorizer
///
/// Total over its input: every transaction gets a label, malformed or
/// missing text fields included. No shared mutable state, so a single
/// instance can serve concurrent callers without coordination.
#[derive(Debug, Clone)]
pub struct Categorizer {
    table: CategoryTable,
}

impl Categorizer {
    /// Create a categorizer over an explicit table
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    /// Create a categorizer over the resolved default table
    pub fn from_config() -> Result<Self> {
        Ok(Self::new(CategoryTable::load()?))
    }

    /// The table this categorizer was built with
    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Assign a category to a single transaction
    ///
    /// The negative-amount income check runs before keyword matching and
    /// wins unconditionally. Keyword search is first-match-wins in table
    /// order; no match falls back to [`DEFAULT_CATEGORY`].
    pub fn categorize(&self, tx: &TransactionRecord) -> &str {
        if tx.amount < 0.0 {
            return INCOME_CATEGORY;
        }

        let text = search_text(tx);
        for rule in &self.table.rules {
            for keyword in &rule.keywords {
                if text.contains(keyword.as_str()) {
                    debug!(keyword = %keyword, category = %rule.name, "Keyword matched");
                    return &rule.name;
                }
            }
        }

        DEFAULT_CATEGORY
    }

    /// Categorize a batch, preserving input order
    pub fn categorize_all(&self, transactions: Vec<TransactionRecord>) -> Vec<CategorizedTransaction> {
        transactions
            .into_iter()
            .map(|tx| {
                let category = self.categorize(&tx).to_string();
                CategorizedTransaction {
                    transaction: tx,
                    category,
                }
            })
            .collect()
    }

    /// All candidate categories for a merchant name, in table order
    ///
    /// Unlike [`categorize`](Self::categorize) this collects every category
    /// with at least one keyword hit. Zero hits returns the fixed
    /// [`DEFAULT_SUGGESTIONS`] list.
    pub fn suggest_categories(&self, merchant_name: &str) -> Vec<String> {
        let text = merchant_name.to_lowercase();

        let matches: Vec<String> = self
            .table
            .rules
            .iter()
            .filter(|rule| rule.keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|rule| rule.name.clone())
            .collect();

        if matches.is_empty() {
            DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
        } else {
            matches
        }
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(CategoryTable::default())
    }
}

/// Concatenate and lowercase the searchable text fields of a transaction
fn search_text(tx: &TransactionRecord) -> String {
    let mut text = String::with_capacity(
        tx.name.len()
            + tx.merchant_name.as_deref().map_or(0, str::len)
            + tx.description.as_deref().map_or(0, str::len)
            + 2,
    );
    text.push_str(&tx.name);
    text.push(' ');
    text.push_str(tx.merchant_name.as_deref().unwrap_or(""));
    text.push(' ');
    text.push_str(tx.description.as_deref().unwrap_or(""));
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorizer() -> Categorizer {
        Categorizer::new(CategoryTable::parse(DEFAULT_TABLE).unwrap())
    }

    #[test]
    fn test_embedded_table_parses() {
        let table = CategoryTable::parse(DEFAULT_TABLE).unwrap();
        assert!(!table.rules().is_empty());
        // Pin the declaration order the tests below depend on: Groceries
        // before Dining before Transportation, Income last.
        let names = table.category_names();
        let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
        assert!(pos("Groceries") < pos("Dining"));
        assert!(pos("Dining") < pos("Transportation"));
        assert_eq!(*names.last().unwrap(), "Income");
    }

    #[test]
    fn test_negative_amount_is_income_regardless_of_text() {
        let c = categorizer();
        let tx = TransactionRecord::new("Payroll Deposit", -3500.00);
        assert_eq!(c.categorize(&tx), "Income");

        // Text that matches Dining still becomes income when negative
        let refund = TransactionRecord::new("STARBUCKS REFUND", -5.75);
        assert_eq!(c.categorize(&refund), "Income");
    }

    #[test]
    fn test_positive_amount_uses_keywords() {
        let c = categorizer();
        let tx = TransactionRecord::new("STARBUCKS #4521", 5.75);
        assert_eq!(c.categorize(&tx), "Dining");
    }

    #[test]
    fn test_first_declared_category_wins() {
        let c = categorizer();
        // "whole foods market" matches Groceries only
        let tx = TransactionRecord::new("WHOLE FOODS MARKET 123", 82.19);
        assert_eq!(c.categorize(&tx), "Groceries");

        // "UBER EATS" hits both Dining ("uber eats") and Transportation
        // ("uber"); Dining is declared earlier, so Dining wins.
        let tx = TransactionRecord::new("UBER EATS ORDER", 31.00);
        assert_eq!(c.categorize(&tx), "Dining");
    }

    #[test]
    fn test_no_match_falls_back_to_shopping() {
        let c = categorizer();
        let tx = TransactionRecord::new("XYZZY UNKNOWN VENDOR 42", 10.00);
        assert_eq!(c.categorize(&tx), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_zero_amount_is_not_income() {
        let c = categorizer();
        let tx = TransactionRecord::new("ZERO DOLLAR AUTH", 0.0);
        assert_eq!(c.categorize(&tx), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_merchant_and_description_fields_are_searched() {
        let c = categorizer();
        let tx = TransactionRecord {
            name: "POS DEBIT 0392".to_string(),
            merchant_name: Some("Chipotle Mexican Grill".to_string()),
            description: None,
            amount: 12.85,
        };
        assert_eq!(c.categorize(&tx), "Dining");

        let tx = TransactionRecord {
            name: "ACH WITHDRAWAL".to_string(),
            merchant_name: None,
            description: Some("monthly rent payment".to_string()),
            amount: 1900.00,
        };
        assert_eq!(c.categorize(&tx), "Housing");
    }

    #[test]
    fn test_categorize_all_preserves_order() {
        let c = categorizer();
        let txs = vec![
            TransactionRecord::new("STARBUCKS #4521", 5.75),
            TransactionRecord::new("Payroll Deposit", -3500.00),
            TransactionRecord::new("MYSTERY SHOP", 1.00),
        ];
        let result = c.categorize_all(txs);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].category, "Dining");
        assert_eq!(result[0].transaction.name, "STARBUCKS #4521");
        assert_eq!(result[1].category, "Income");
        assert_eq!(result[2].category, "Shopping");
    }

    #[test]
    fn test_suggest_categories_collects_all_hits_in_order() {
        let c = categorizer();
        let suggestions = c.suggest_categories("chipotle");
        assert!(suggestions.contains(&"Dining".to_string()));

        // "uber eats" hits Dining and Transportation, table order preserved
        let suggestions = c.suggest_categories("UBER EATS");
        assert_eq!(suggestions, vec!["Dining", "Transportation"]);
    }

    #[test]
    fn test_suggest_categories_is_idempotent() {
        let c = categorizer();
        let first = c.suggest_categories("netflix spotify");
        let second = c.suggest_categories("netflix spotify");
        assert_eq!(first, second);
    }

    #[test]
    fn test_suggest_categories_defaults_on_no_match() {
        let c = categorizer();
        let suggestions = c.suggest_categories("qqqqqq");
        assert_eq!(suggestions, vec!["Shopping", "Dining", "Entertainment"]);
    }

    #[test]
    fn test_custom_table_order_is_respected() {
        // Inverted declaration order flips the winner for ambiguous text.
        let table = CategoryTable::with_rules(vec![
            CategoryRule {
                name: "Transportation".to_string(),
                keywords: vec!["uber".to_string()],
            },
            CategoryRule {
                name: "Dining".to_string(),
                keywords: vec!["uber eats".to_string()],
            },
        ]);
        let c = Categorizer::new(table);
        let tx = TransactionRecord::new("UBER EATS ORDER", 31.00);
        assert_eq!(c.categorize(&tx), "Transportation");
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let table = CategoryTable::with_rules(vec![CategoryRule {
            name: "Dining".to_string(),
            keywords: vec!["STARBUCKS".to_string()],
        }]);
        let c = Categorizer::new(table);
        let tx = TransactionRecord::new("starbucks store 4521", 4.50);
        assert_eq!(c.categorize(&tx), "Dining");
    }

    #[test]
    fn test_parse_rejects_empty_table() {
        assert!(CategoryTable::parse("").is_err());
    }
}
