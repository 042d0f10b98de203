//! unibot-rank
//!
//! Keyword retrieval over an in-memory corpus: intent classification, query
//! term extraction, and the boosted token-count scorer. See `scorer` for the
//! scoring rules.
pub mod intent;
pub mod scorer;
pub mod similarity;
pub mod terms;

pub use intent::{classify, IntentClassifier};
pub use scorer::KeywordRanker;
pub use terms::QueryTerms;
