//! Corpus assembly for the retrieval engine
//!
//! Given a question, the assistant needs context drawn from three sources:
//! financial knowledge articles, account snapshots, and transaction
//! snapshots. This module flattens all three into the uniform `Document`
//! shape the engine ranks over. The corpus is built once; refreshing it
//! means building a new corpus and a new engine.

use sha2::{Digest, Sha256};

use crate::embed::tokenize;
use crate::models::{
    AccountSnapshot, Document, DocumentKind, KnowledgeArticle, TransactionSnapshot,
};

/// Convert the three source collections into one ordered corpus
///
/// Knowledge articles come first, then accounts, then transactions.
/// Downstream ranking breaks score ties by corpus position, so this
/// ordering is part of the contract, not an implementation detail.
pub fn build_corpus(
    articles: &[KnowledgeArticle],
    accounts: &[AccountSnapshot],
    transactions: &[TransactionSnapshot],
) -> Vec<Document> {
    let mut corpus =
        Vec::with_capacity(articles.len() + accounts.len() + transactions.len());

    for article in articles {
        corpus.push(Document {
            id: article.id.clone(),
            title: article.title.clone(),
            content: article.content.clone(),
            category: Some(article.category.clone()),
            keywords: article.keywords.iter().map(|k| k.to_lowercase()).collect(),
            kind: DocumentKind::Knowledge,
        });
    }

    for account in accounts {
        let content = format!(
            "{} account \"{}\" with a balance of ${:.2}",
            account.account_type, account.name, account.balance
        );
        let mut keywords = tokenize(&account.name);
        keywords.push(account.account_type.to_lowercase());
        keywords.push("account".to_string());
        keywords.push("balance".to_string());
        corpus.push(Document {
            id: snapshot_id("account", &account.id),
            title: format!("Account: {}", account.name),
            content,
            category: Some("accounts".to_string()),
            keywords,
            kind: DocumentKind::Account,
        });
    }

    for tx in transactions {
        let direction = if tx.amount < 0.0 { "received" } else { "spent" };
        let content = format!(
            "{} ${:.2} at {} on {}",
            direction,
            tx.amount.abs(),
            tx.description,
            tx.date
        );
        let mut keywords = tokenize(&tx.description);
        if let Some(ref category) = tx.category {
            keywords.push(category.to_lowercase());
        }
        corpus.push(Document {
            id: snapshot_id("transaction", &tx.id),
            title: format!("Transaction: {}", tx.description),
            content,
            category: tx.category.clone(),
            keywords,
            kind: DocumentKind::Transaction,
        });
    }

    corpus
}

/// Stable document id for a snapshot record
///
/// Hashing the source id keeps corpus rebuilds from the same records
/// producing the same document ids.
fn snapshot_id(kind: &str, source_id: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", kind, source_id).as_bytes());
    format!("{}-{}", kind, &hex::encode(digest)[..16])
}

/// Builtin financial knowledge articles
///
/// Stands in for the application's knowledge base when the caller does not
/// supply one, so the assistant always has something to retrieve against.
pub fn builtin_articles() -> Vec<KnowledgeArticle> {
    vec![
        KnowledgeArticle {
            id: "kb-emergency-fund".to_string(),
            title: "Emergency Fund 101".to_string(),
            content: "Save 3-6 months of essential expenses in a liquid account before \
                      investing elsewhere. Start with a $1,000 starter fund, then build \
                      toward the full cushion with automatic transfers each payday."
                .to_string(),
            category: "savings".to_string(),
            keywords: vec![
                "emergency".to_string(),
                "savings".to_string(),
                "fund".to_string(),
                "cushion".to_string(),
            ],
        },
        KnowledgeArticle {
            id: "kb-budget-rule".to_string(),
            title: "The 50/30/20 Budget".to_string(),
            content: "Allocate 50% of take-home pay to needs, 30% to wants, and 20% to \
                      savings and debt payments. Treat the percentages as a starting point \
                      and adjust for your fixed costs."
                .to_string(),
            category: "budgeting".to_string(),
            keywords: vec![
                "budget".to_string(),
                "spending".to_string(),
                "needs".to_string(),
                "wants".to_string(),
            ],
        },
        KnowledgeArticle {
            id: "kb-debt-payoff".to_string(),
            title: "Avalanche vs. Snowball Debt Payoff".to_string(),
            content: "The avalanche method pays the highest-interest debt first and \
                      minimizes total interest. The snowball method pays the smallest \
                      balance first for quicker wins. Either works if you keep at it."
                .to_string(),
            category: "debt".to_string(),
            keywords: vec![
                "debt".to_string(),
                "interest".to_string(),
                "payoff".to_string(),
                "loan".to_string(),
            ],
        },
        KnowledgeArticle {
            id: "kb-credit-score".to_string(),
            title: "What Moves a Credit Score".to_string(),
            content: "Payment history and credit utilization dominate your score. Keep \
                      utilization under 30% of your limits, never miss a payment, and \
                      avoid opening many accounts at once."
                .to_string(),
            category: "credit".to_string(),
            keywords: vec![
                "credit".to_string(),
                "score".to_string(),
                "utilization".to_string(),
                "payment".to_string(),
            ],
        },
        KnowledgeArticle {
            id: "kb-investing-basics".to_string(),
            title: "Index Fund Investing Basics".to_string(),
            content: "Low-cost, broadly diversified index funds outperform most actively \
                      managed funds over long horizons. Max out tax-advantaged accounts \
                      before taxable ones, and keep fees under 0.2%."
                .to_string(),
            category: "investing".to_string(),
            keywords: vec![
                "invest".to_string(),
                "index".to_string(),
                "retirement".to_string(),
                "fees".to_string(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_account() -> AccountSnapshot {
        AccountSnapshot {
            id: "acc-1".to_string(),
            name: "Everyday Checking".to_string(),
            account_type: "checking".to_string(),
            balance: 2450.10,
        }
    }

    fn sample_transaction() -> TransactionSnapshot {
        TransactionSnapshot {
            id: "tx-1".to_string(),
            description: "STARBUCKS #4521".to_string(),
            amount: 5.75,
            date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            category: Some("Dining".to_string()),
        }
    }

    #[test]
    fn test_corpus_orders_sources() {
        let corpus = build_corpus(
            &builtin_articles(),
            &[sample_account()],
            &[sample_transaction()],
        );
        assert_eq!(corpus.len(), builtin_articles().len() + 2);
        assert_eq!(corpus[0].kind, DocumentKind::Knowledge);
        assert_eq!(
            corpus[builtin_articles().len()].kind,
            DocumentKind::Account
        );
        assert_eq!(corpus.last().unwrap().kind, DocumentKind::Transaction);
    }

    #[test]
    fn test_account_document_shape() {
        let corpus = build_corpus(&[], &[sample_account()], &[]);
        let doc = &corpus[0];
        assert_eq!(doc.title, "Account: Everyday Checking");
        assert!(doc.content.contains("$2450.10"));
        assert!(doc.keywords.contains(&"checking".to_string()));
        assert!(doc.keywords.contains(&"balance".to_string()));
    }

    #[test]
    fn test_transaction_document_shape() {
        let corpus = build_corpus(&[], &[], &[sample_transaction()]);
        let doc = &corpus[0];
        assert!(doc.content.contains("spent $5.75"));
        assert!(doc.content.contains("2024-03-14"));
        assert_eq!(doc.category.as_deref(), Some("Dining"));
        assert!(doc.keywords.contains(&"starbucks".to_string()));
    }

    #[test]
    fn test_snapshot_ids_are_stable() {
        let a = build_corpus(&[], &[sample_account()], &[]);
        let b = build_corpus(&[], &[sample_account()], &[]);
        assert_eq!(a[0].id, b[0].id);
        assert!(a[0].id.starts_with("account-"));
    }

    #[test]
    fn test_article_keywords_lowercased() {
        let article = KnowledgeArticle {
            id: "kb-x".to_string(),
            title: "T".to_string(),
            content: "C".to_string(),
            category: "misc".to_string(),
            keywords: vec!["Emergency".to_string()],
        };
        let corpus = build_corpus(&[article], &[], &[]);
        assert_eq!(corpus[0].keywords, vec!["emergency"]);
    }
}
