//! Boosted keyword scoring.
//!
//! `score = base * multiplier` where `base` counts every search term's
//! occurrences in the document text and `multiplier` starts at 1.0 and
//! accumulates:
//!
//! - `× intent_factor` when the path carries a marker of the query's intent
//! - for entity queries, exactly one of: `+ exact_entity_multiplier` (and
//!   `+ exact_entity_bonus` on the base) when a term equals the entity file
//!   stem, `+ entity_folder_multiplier` inside the entity folder or when a
//!   term only appears within the stem, or `+ entity_related_multiplier` for
//!   looser entity matches
//! - `+ path_token_multiplier` when a term occurs in the path
//! - `+ similarity` when the query/path similarity exceeds the threshold
//!
//! Documents whose final score is not positive are dropped.

use tracing::debug;

use unibot_core::config::RankSettings;
use unibot_core::corpus::Corpus;
use unibot_core::kind::DocumentKind;
use unibot_core::text::fold_case;
use unibot_core::traits::Retriever;
use unibot_core::types::{Document, Intent, ScoredDocument};

use crate::similarity;
use crate::terms::QueryTerms;

const SNIPPET_BEFORE: usize = 100;
const SNIPPET_AFTER: usize = 200;

#[derive(Debug, Clone)]
pub struct KeywordRanker {
    settings: RankSettings,
    entity_folder: String,
    entity_marker: String,
    entity_keywords: Vec<String>,
}

impl KeywordRanker {
    pub fn new(settings: RankSettings) -> Self {
        Self {
            entity_folder: fold_case(&settings.entity_folder),
            entity_marker: fold_case(&settings.entity_marker),
            entity_keywords: settings.entity_keywords.iter().map(|k| fold_case(k)).collect(),
            settings,
        }
    }

    pub fn settings(&self) -> &RankSettings { &self.settings }

    pub fn rank<'c>(&self, query: &str, intent: Intent, corpus: &'c Corpus, k: usize) -> Vec<ScoredDocument<'c>> {
        let terms = match QueryTerms::extract(query, &self.settings.synonyms) {
            Ok(terms) => terms,
            Err(e) => {
                debug!(error = %e, "nothing to rank");
                return Vec::new();
            }
        };
        let entity_query = intent == Intent::Scholarship || self.entity_keywords.iter().any(|kw| terms.query().contains(kw.as_str()));
        let markers = self.markers_for(intent);

        let mut scored: Vec<ScoredDocument<'c>> =
            corpus.documents().iter().filter_map(|doc| self.score(doc, &terms, &markers, entity_query)).collect();
        // stable: equal scores keep corpus order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        debug!(
            query = terms.query(),
            intent = %intent,
            terms = ?terms.terms(),
            top = ?scored.iter().take(3).map(|s| (s.document.path.as_str(), s.score)).collect::<Vec<_>>(),
            "ranked"
        );
        scored
    }

    fn markers_for(&self, intent: Intent) -> Vec<String> {
        self.settings
            .intent_markers
            .get(intent.as_str())
            .map(|markers| markers.iter().map(|m| fold_case(m)).collect())
            .unwrap_or_default()
    }

    fn score<'c>(&self, doc: &'c Document, terms: &QueryTerms, markers: &[String], entity_query: bool) -> Option<ScoredDocument<'c>> {
        let weights = &self.settings.boosts;
        let text = doc.folded_text();
        let path = doc.folded_path();

        let mut base = terms.iter().map(|t| text.matches(t).count()).sum::<usize>() as f64;
        let mut multiplier = 1.0;

        if markers.iter().any(|m| path.contains(m.as_str())) {
            multiplier *= weights.intent_factor;
        }

        if entity_query {
            let in_folder = !self.entity_folder.is_empty() && path.contains(self.entity_folder.as_str());
            let is_entity = in_folder || doc.kind() == DocumentKind::NamedEntity;
            let stem = doc.folded_stem();
            let spaced_stem = stem.replace(['_', '-'], " ");
            let names_entity = is_entity && terms.iter().any(|t| t == stem || t == spaced_stem);
            let partly_named = is_entity
                && terms.iter().any(|t| t.chars().count() >= weights.min_entity_term_chars && stem.contains(t));
            if names_entity {
                base += weights.exact_entity_bonus;
                multiplier += weights.exact_entity_multiplier;
            } else if in_folder || partly_named {
                multiplier += weights.entity_folder_multiplier;
            } else if (!self.entity_marker.is_empty() && path.contains(self.entity_marker.as_str()))
                || self.entity_keywords.iter().any(|kw| text.contains(kw.as_str()))
            {
                multiplier += weights.entity_related_multiplier;
            }
        }

        if terms.iter().any(|t| path.contains(t)) {
            multiplier += weights.path_token_multiplier;
        }

        let similarity = similarity::ratio(terms.query(), path);
        if similarity > weights.path_similarity_threshold {
            multiplier += similarity;
        }

        let score = base * multiplier;
        if base <= 0.0 || score <= 0.0 {
            return None;
        }
        Some(ScoredDocument { document: doc, score, snippet: snippet(doc, terms) })
    }
}

impl Default for KeywordRanker {
    fn default() -> Self { Self::new(RankSettings::default()) }
}

impl Retriever for KeywordRanker {
    fn retrieve<'c>(&self, query: &str, intent: Intent, corpus: &'c Corpus, k: usize) -> Vec<ScoredDocument<'c>> {
        self.rank(query, intent, corpus, k)
    }
}

/// Window around the first term found in the text, newlines flattened.
/// Falls back to the start of the text when the score came from boosts only.
fn snippet(doc: &Document, terms: &QueryTerms) -> String {
    let text = doc.text();
    let pos = terms.iter().find_map(|t| doc.folded_text().find(t)).unwrap_or(0);
    let start = text[..pos].char_indices().rev().nth(SNIPPET_BEFORE - 1).map_or(0, |(i, _)| i);
    let end = text[pos..].char_indices().nth(SNIPPET_AFTER).map_or(text.len(), |(i, _)| pos + i);
    text[start..end].replace('\n', " ")
}
