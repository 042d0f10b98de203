//! unibot-answer
//!
//! The query-to-answer pipeline: sanitise, short-circuit greetings, classify,
//! rank, assemble, prompt, generate. Generator failures never surface to the
//! caller; they degrade to an answer built from the retrieved context.
pub mod gemini;
pub mod knowledge;
pub mod prompt;
pub mod sanitize;

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use unibot_context::{ContextAssembler, ContextBlock, ReferenceSection};
use unibot_core::config::Settings;
use unibot_core::snapshot::Snapshot;
use unibot_core::traits::{Classifier, Generator, Retriever};
use unibot_core::types::{Intent, ScoredDocument, Source};
use unibot_core::{Error, Result};

pub use gemini::GeminiClient;
pub use knowledge::Knowledge;
pub use prompt::{build_prompt, NOT_FOUND_REPLY};
pub use sanitize::{greeting, sanitize, GREETING_REPLY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Greeting,
    Generated,
    /// The generator failed; the text was built from retrieved documents.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub intent: Intent,
    pub sources: Vec<Source>,
    pub outcome: Outcome,
}

pub struct Assistant<C, R, G> {
    knowledge: Snapshot<Knowledge>,
    classifier: C,
    retriever: R,
    generator: G,
    assembler: ContextAssembler,
    top_k: usize,
    rules_per_category: usize,
    rules_budget: usize,
}

impl<C: Classifier, R: Retriever, G: Generator> Assistant<C, R, G> {
    pub fn new(knowledge: Knowledge, classifier: C, retriever: R, generator: G, settings: &Settings) -> Self {
        Self {
            knowledge: Snapshot::new(knowledge),
            classifier,
            retriever,
            generator,
            assembler: ContextAssembler::new(&settings.context),
            top_k: settings.rank.top_k,
            rules_per_category: settings.context.rules_per_category,
            rules_budget: settings.context.rules_budget,
        }
    }

    pub fn knowledge(&self) -> Arc<Knowledge> { self.knowledge.load() }

    /// Publish a freshly built knowledge snapshot. Answers already in flight
    /// finish on the snapshot they started with.
    pub fn reload(&self, knowledge: Knowledge) {
        let documents = knowledge.corpus().len();
        let previous = self.knowledge.swap(knowledge);
        info!(documents, previous = previous.corpus().len(), "knowledge reloaded");
    }

    /// The context the generator would see for `query`.
    pub fn context_for(&self, query: &str) -> Result<(Intent, ContextBlock)> {
        let query = sanitize(query);
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }
        let knowledge = self.knowledge.load();
        let intent = self.classifier.classify(&query);
        let ranked = self.retriever.retrieve(&query, intent, knowledge.corpus(), self.top_k);
        Ok((intent, self.assemble(&knowledge, &query, &ranked)))
    }

    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let query = sanitize(query);
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }
        if let Some(matched) = greeting(&query) {
            info!(greeting = matched, "greeting short-circuit");
            return Ok(Answer { text: GREETING_REPLY.to_string(), intent: Intent::General, sources: vec![], outcome: Outcome::Greeting });
        }

        let knowledge = self.knowledge.load();
        let intent = self.classifier.classify(&query);
        let ranked = self.retriever.retrieve(&query, intent, knowledge.corpus(), self.top_k);
        let block = self.assemble(&knowledge, &query, &ranked);
        let prompt = build_prompt(&query, &block);

        match self.generator.generate(&prompt).await {
            Ok(generated) => {
                let text = sanitize(&generated);
                let text = if prompt::is_not_found(&text) {
                    prompt::not_found_with_contact(&knowledge.helplines().contact_for(&query))
                } else {
                    text
                };
                info!(intent = %intent, sources = block.sources.len(), "answer generated");
                Ok(Answer { text, intent, sources: block.sources, outcome: Outcome::Generated })
            }
            Err(e) => {
                warn!(error = %e, intent = %intent, ranked = ranked.len(), "generator failed, answering from retrieved context");
                Ok(self.fallback(&knowledge, &query, intent, &ranked))
            }
        }
    }

    fn assemble(&self, knowledge: &Knowledge, query: &str, ranked: &[ScoredDocument<'_>]) -> ContextBlock {
        let mut always_on: Vec<ReferenceSection> = knowledge.references().to_vec();
        if let Some(rules) = knowledge.rules().section_for(query, self.rules_per_category, self.rules_budget) {
            always_on.push(rules);
        }
        self.assembler.assemble(query, ranked, &always_on)
    }

    fn fallback(&self, knowledge: &Knowledge, query: &str, intent: Intent, ranked: &[ScoredDocument<'_>]) -> Answer {
        let contact = knowledge.helplines().contact_for(query);
        let (text, sources) = match ranked.first() {
            None => (format!("{NOT_FOUND_REPLY}\n\n{contact}"), vec![]),
            Some(top) => (format!("{}\n\n{contact}", self.assembler.formatter().format(top.document)), vec![top.source()]),
        };
        Answer { text, intent, sources, outcome: Outcome::Fallback }
    }
}
