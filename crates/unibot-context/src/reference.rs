use serde_json::{Map, Value};
use tracing::{debug, warn};

use unibot_core::config::ReferenceSource;
use unibot_core::corpus::Corpus;
use unibot_core::text::truncate_chars;
use unibot_core::types::Content;

use crate::format::scalar;

const EVENT_NAME_KEYS: &[&str] = &["event", "holiday_name", "occasion", "name", "title"];

/// A high-priority block that precedes the retrieved documents in every
/// context, whatever the ranker returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSection {
    pub title: String,
    pub body: String,
    /// Maximum number of body characters kept.
    pub budget: usize,
}

impl ReferenceSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>, budget: usize) -> Self {
        Self { title: title.into(), body: body.into(), budget }
    }

    /// The body cut to `budget` characters, with `marker` appended when cut.
    pub fn render_body(&self, marker: &str) -> String {
        let kept = truncate_chars(&self.body, self.budget);
        if kept.len() < self.body.len() {
            format!("{kept}{marker}")
        } else {
            self.body.clone()
        }
    }

    pub fn render(&self, marker: &str) -> String { format!("{}:\n{}", self.title, self.render_body(marker)) }
}

/// Build the configured reference sections from a loaded corpus. Sections
/// whose document is missing or empty are skipped.
pub fn build_references(corpus: &Corpus, sources: &[ReferenceSource]) -> Vec<ReferenceSection> {
    let mut sections = Vec::with_capacity(sources.len());
    for source in sources {
        let body = match (&source.text, &source.path) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => match corpus.get(path) {
                Some(doc) => flatten_reference(&doc.content),
                None => {
                    warn!(title = %source.title, path = %path, "reference document not in corpus");
                    continue;
                }
            },
            (None, None) => {
                warn!(title = %source.title, "reference has neither path nor text");
                continue;
            }
        };
        if body.trim().is_empty() {
            debug!(title = %source.title, "reference is empty");
            continue;
        }
        sections.push(ReferenceSection::new(source.title.clone(), body, source.budget));
    }
    sections
}

/// Flatten a document into short lines: dated entries become
/// `date (day): event`, maps become `key: value`, text passes through.
pub fn flatten_reference(content: &Content) -> String {
    match content {
        Content::Text(text) => text.trim().to_string(),
        Content::List(items) => items.iter().map(item_line).collect::<Vec<_>>().join("\n"),
        Content::Map(map) => {
            let mut lines = Vec::new();
            for (key, value) in map {
                match value {
                    Value::Array(items) => lines.extend(items.iter().map(item_line)),
                    Value::Object(inner) if inner.values().all(Value::is_object) => {
                        lines.extend(inner.values().map(item_line));
                    }
                    Value::Object(inner) => lines.push(format!("{key}: {}", summarize(inner))),
                    other => lines.push(format!("{key}: {}", scalar(other).unwrap_or_default())),
                }
            }
            lines.join("\n")
        }
    }
}

fn item_line(item: &Value) -> String {
    match item {
        Value::Object(map) => match map.get("date").and_then(scalar) {
            Some(date) => {
                let event = EVENT_NAME_KEYS.iter().find_map(|k| map.get(*k).and_then(scalar)).unwrap_or_default();
                match map.get("day").and_then(scalar) {
                    Some(day) => format!("{date} ({day}): {event}"),
                    None => format!("{date}: {event}"),
                }
            }
            None => summarize(map),
        },
        Value::Array(items) => items.iter().filter_map(scalar).collect::<Vec<_>>().join(", "),
        other => scalar(other).unwrap_or_default(),
    }
}

fn summarize(map: &Map<String, Value>) -> String {
    map.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Array(items) => Some(items.iter().filter_map(scalar).collect::<Vec<_>>().join(", ")),
                other => scalar(other),
            }?;
            (!value.is_empty()).then(|| format!("{key}: {value}"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
