use std::path::Path;
use tracing::info;

use unibot_context::{build_references, HelplineDirectory, ReferenceSection, RulesDigest};
use unibot_core::config::{expand_path, ContextSettings, Settings};
use unibot_core::corpus::{Corpus, CorpusLoader};
use unibot_core::Result;

/// Everything derived from one corpus load. Built completely before it is
/// published, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Knowledge {
    corpus: Corpus,
    references: Vec<ReferenceSection>,
    rules: RulesDigest,
    helplines: HelplineDirectory,
}

impl Knowledge {
    pub fn build(corpus: Corpus, settings: &ContextSettings) -> Self {
        let references = build_references(&corpus, &settings.references);
        let rules = RulesDigest::from_corpus(&corpus, &settings.rules_folder);
        let helplines = HelplineDirectory::from_corpus(&corpus, settings.helplines_path.as_deref());
        info!(
            documents = corpus.len(),
            references = references.len(),
            rule_categories = rules.categories().len(),
            helpline_categories = helplines.categories.len(),
            "knowledge built"
        );
        Self { corpus, references, rules, helplines }
    }

    /// Load the configured corpus root.
    pub fn load(settings: &Settings) -> Result<Self> { Self::load_from(&expand_path(&settings.corpus.root), settings) }

    pub fn load_from(root: &Path, settings: &Settings) -> Result<Self> {
        let corpus = CorpusLoader::new(settings.corpus.clone()).load(root)?;
        Ok(Self::build(corpus, &settings.context))
    }

    pub fn corpus(&self) -> &Corpus { &self.corpus }

    pub fn references(&self) -> &[ReferenceSection] { &self.references }

    pub fn rules(&self) -> &RulesDigest { &self.rules }

    pub fn helplines(&self) -> &HelplineDirectory { &self.helplines }
}
