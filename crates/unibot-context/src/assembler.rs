use serde::Serialize;
use tracing::debug;

use unibot_core::config::ContextSettings;
use unibot_core::types::{ScoredDocument, Source};

use crate::format::DocumentFormatter;
use crate::reference::ReferenceSection;

pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found in the knowledge base.";

/// Prompt-ready context plus the documents it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextBlock {
    pub text: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone)]
pub struct ContextAssembler {
    formatter: DocumentFormatter,
    max_documents: usize,
    truncation_marker: String,
}

impl ContextAssembler {
    pub fn new(settings: &ContextSettings) -> Self {
        Self {
            formatter: DocumentFormatter::new(settings),
            max_documents: settings.max_documents,
            truncation_marker: settings.truncation_marker.clone(),
        }
    }

    pub fn formatter(&self) -> &DocumentFormatter { &self.formatter }

    pub fn truncation_marker(&self) -> &str { &self.truncation_marker }

    /// Always-on sections in the given order, then up to `max_documents`
    /// ranked documents in rank order, separated by blank lines.
    pub fn assemble(&self, query: &str, ranked: &[ScoredDocument<'_>], always_on: &[ReferenceSection]) -> ContextBlock {
        let mut sections: Vec<String> = always_on.iter().map(|s| s.render(&self.truncation_marker)).collect();
        let shown = &ranked[..ranked.len().min(self.max_documents)];
        if shown.is_empty() {
            sections.push(NO_RELEVANT_INFORMATION.to_string());
        }
        sections.extend(shown.iter().map(|scored| self.formatter.format(scored.document)));

        let block = ContextBlock { text: sections.join("\n\n"), sources: shown.iter().map(ScoredDocument::source).collect() };
        debug!(
            query,
            references = always_on.len(),
            documents = shown.len(),
            chars = block.text.chars().count(),
            "context assembled"
        );
        block
    }
}

impl Default for ContextAssembler {
    fn default() -> Self { Self::new(&ContextSettings::default()) }
}
