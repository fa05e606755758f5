//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `categorize` - Single and bulk categorization plus suggestions
//! - `ask` - Knowledge retrieval for a free-text question
//! - `status` - Embedding backend and category table status

pub mod ask;
pub mod categorize;
pub mod status;

// Re-export command functions for main.rs
pub use ask::*;
pub use categorize::*;
pub use status::*;
