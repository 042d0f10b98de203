use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use unibot_core::corpus::Corpus;
use unibot_core::text::{fold_case, humanize_key};
use unibot_core::types::Content;

use crate::reference::ReferenceSection;

pub const RULES_TITLE: &str = "University Rules";

/// Substrings that mark a query as being about rules or conduct.
const RULE_KEYWORDS: &[&str] = &[
    "rule", "policy", "regulation", "allowed", "prohibited", "banned", "can i", "discipline", "attendance",
    "exam", "library", "dress code", "mobile", "phone", "laptop", "id card", "uniform", "smoking", "alcohol",
    "fine", "penalty", "suspension", "canteen", "admission", "eligibility", "scholarship", "fee", "hostel",
    "laboratory", "safety", "conduct", "ragging", "health", "counselling", "vision", "mission", "legal",
    "jurisdiction",
];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub section: String,
    pub title: String,
    pub text: String,
}

impl Rule {
    fn haystack(&self) -> String { fold_case(&format!("{} {} {}", self.title, self.text, self.section)) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleCategory {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// Rule documents grouped by category, one category per file under the
/// rules folder.
#[derive(Debug, Clone, Default)]
pub struct RulesDigest {
    categories: Vec<RuleCategory>,
}

impl RulesDigest {
    pub fn new(categories: Vec<RuleCategory>) -> Self { Self { categories } }

    /// Collect every rule document under `folder`. Files holding a list of
    /// rules (or a map with a `rules` list) are accepted; anything else is
    /// left to the ranker.
    pub fn from_corpus(corpus: &Corpus, folder: &str) -> Self {
        let prefix = format!("{}/", fold_case(folder.trim_matches('/')));
        let mut categories = Vec::new();
        for doc in corpus.documents().iter().filter(|d| d.folded_path().starts_with(&prefix)) {
            let items = match &doc.content {
                Content::List(items) => items.as_slice(),
                Content::Map(map) => match map.get("rules") {
                    Some(Value::Array(items)) => items.as_slice(),
                    _ => continue,
                },
                Content::Text(_) => continue,
            };
            let rules: Vec<Rule> = items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| match Rule::deserialize(item) {
                    Ok(rule) => Some(rule),
                    Err(e) => {
                        warn!(path = %doc.path, error = %e, "skipping malformed rule");
                        None
                    }
                })
                .collect();
            if rules.is_empty() {
                continue;
            }
            categories.push(RuleCategory { name: category_name(&doc.path), rules });
        }
        debug!(categories = categories.len(), "rules digest built");
        Self { categories }
    }

    pub fn categories(&self) -> &[RuleCategory] { &self.categories }

    pub fn is_empty(&self) -> bool { self.categories.is_empty() }

    pub fn is_rule_query(query: &str) -> bool {
        let query = fold_case(query);
        RULE_KEYWORDS.iter().any(|kw| query.contains(kw))
    }

    /// Rules mentioning a query word longer than three characters, at most
    /// `per_category` per category, as one reference section. `None` when the
    /// query is not about rules or nothing matches.
    pub fn section_for(&self, query: &str, per_category: usize, budget: usize) -> Option<ReferenceSection> {
        if self.is_empty() || !Self::is_rule_query(query) {
            return None;
        }
        let folded = fold_case(query);
        let words: Vec<&str> = folded
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.chars().count() > 3)
            .collect();
        if words.is_empty() {
            return None;
        }

        let mut lines = Vec::new();
        for category in &self.categories {
            let relevant: Vec<&Rule> = category
                .rules
                .iter()
                .filter(|rule| {
                    let haystack = rule.haystack();
                    words.iter().any(|w| haystack.contains(w))
                })
                .collect();
            if relevant.is_empty() {
                continue;
            }
            lines.push(format!("{} ({} relevant rules):", category.name, relevant.len()));
            for rule in relevant.into_iter().take(per_category) {
                let section = if rule.section.is_empty() { "General" } else { rule.section.as_str() };
                lines.push(format!("  - [{section}] {}: {}", rule.title, rule.text));
            }
        }
        (!lines.is_empty()).then(|| ReferenceSection::new(RULES_TITLE, lines.join("\n"), budget))
    }
}

/// `university_rule/library_and_reading_room.json` -> `Library & Reading Room`
fn category_name(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    humanize_key(stem).replace(" And ", " & ")
}
