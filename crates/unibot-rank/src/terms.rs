use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use unibot_core::text::fold_case;
use unibot_core::{Error, Result};

static COURSE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,}-?[A-Z]{0,3}\d{3}[A-Z]?\b").expect("valid course code regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w{3,}").expect("valid word regex"));

/// Search terms derived from one query, in priority order: the whole query,
/// course codes, words of three or more characters, then synonym aliases.
/// Snippets anchor on the first term found, so the order matters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTerms {
    query: String,
    terms: Vec<String>,
}

impl QueryTerms {
    pub fn extract(query: &str, synonyms: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyQuery);
        }
        let folded = fold_case(trimmed);
        let mut terms = vec![folded.clone()];
        for code in COURSE_CODE.find_iter(&trimmed.to_uppercase()) {
            push_unique(&mut terms, fold_case(code.as_str()));
        }
        for word in WORD.find_iter(&folded) {
            push_unique(&mut terms, word.as_str().to_string());
        }
        for term in terms.clone() {
            for (key, aliases) in synonyms {
                if term.contains(key.as_str()) {
                    for alias in aliases {
                        push_unique(&mut terms, fold_case(alias));
                    }
                }
            }
        }
        Ok(Self { query: folded, terms })
    }

    /// The case-folded, trimmed query.
    pub fn query(&self) -> &str { &self.query }

    pub fn terms(&self) -> &[String] { &self.terms }

    pub fn iter(&self) -> impl Iterator<Item = &str> { self.terms.iter().map(String::as_str) }
}

fn push_unique(terms: &mut Vec<String>, term: String) {
    if !term.is_empty() && !terms.contains(&term) {
        terms.push(term);
    }
}
