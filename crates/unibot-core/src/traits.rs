use async_trait::async_trait;

use crate::corpus::Corpus;
use crate::error::GenerateError;
use crate::types::{Intent, ScoredDocument};

pub trait Classifier: Send + Sync {
    fn classify(&self, query: &str) -> Intent;
}

pub trait Retriever: Send + Sync {
    /// At most `k` documents, best first. An empty query yields no documents.
    fn retrieve<'c>(&self, query: &str, intent: Intent, corpus: &'c Corpus, k: usize) -> Vec<ScoredDocument<'c>>;
}

/// The downstream answer generator (an LLM behind HTTP in production).
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[async_trait]
impl<T: Generator + ?Sized> Generator for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> { (**self).generate(prompt).await }
}
