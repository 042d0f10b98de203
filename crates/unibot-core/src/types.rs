//! Domain types shared by the loader, the ranker and the assembler.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::kind::DocumentKind;
use crate::text::fold_case;

/// Parsed payload of one corpus file. The shape is kept as found on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Map(Map<String, Value>),
    List(Vec<Value>),
    Text(String),
}

impl Content {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Content::Map(map),
            Value::Array(items) => Content::List(items),
            Value::String(s) => Content::Text(s),
            other => Content::Text(other.to_string()),
        }
    }

    /// Flat text used for keyword matching: structured values are serialized,
    /// plain strings pass through.
    pub fn to_search_text(&self) -> serde_json::Result<String> {
        match self {
            Content::Text(s) => Ok(s.clone()),
            Content::Map(map) => serde_json::to_string(map),
            Content::List(items) => serde_json::to_string(items),
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Content::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// One corpus entry.
///
/// - `path`: relative, `/`-separated path; unique within a corpus
/// - `content`: parsed payload
/// - `kind`: structural classification, decided once at construction
///
/// The flat search text and its case fold are cached so ranking never
/// re-serializes.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    pub content: Content,
    kind: DocumentKind,
    text: String,
    folded_text: String,
    folded_path: String,
}

impl Document {
    pub fn new(path: impl Into<String>, content: Content) -> Result<Self> {
        let path = path.into();
        let text = content
            .to_search_text()
            .map_err(|e| Error::CorpusParse { path: path.clone(), reason: e.to_string() })?;
        let kind = DocumentKind::of(&content);
        Ok(Self { folded_text: fold_case(&text), folded_path: fold_case(&path), text, kind, content, path })
    }

    pub fn kind(&self) -> DocumentKind { self.kind }

    pub fn text(&self) -> &str { &self.text }

    pub fn folded_text(&self) -> &str { &self.folded_text }

    pub fn folded_path(&self) -> &str { &self.folded_path }

    /// File name without its extension, case-folded.
    pub fn folded_stem(&self) -> &str {
        let name = self.folded_path.rsplit('/').next().unwrap_or(&self.folded_path);
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }
}

/// Coarse query category used to bias ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Scholarship,
    Faculty,
    Subject,
    Holiday,
    Exam,
    Library,
    Rules,
    About,
    General,
}

impl Intent {
    pub const ALL: [Intent; 9] = [
        Intent::Scholarship,
        Intent::Faculty,
        Intent::Subject,
        Intent::Holiday,
        Intent::Exam,
        Intent::Library,
        Intent::Rules,
        Intent::About,
        Intent::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Scholarship => "scholarship",
            Intent::Faculty => "faculty",
            Intent::Subject => "subject",
            Intent::Holiday => "holiday",
            Intent::Exam => "exam",
            Intent::Library => "library",
            Intent::Rules => "rules",
            Intent::About => "about",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == wanted)
            .ok_or_else(|| Error::NotFound(format!("intent '{s}'")))
    }
}

/// A document that matched a query. Borrowed from the corpus snapshot and
/// discarded once the context is assembled.
#[derive(Debug, Clone)]
pub struct ScoredDocument<'c> {
    pub document: &'c Document,
    pub score: f64,
    pub snippet: String,
}

impl ScoredDocument<'_> {
    pub fn source(&self) -> Source { Source { path: self.document.path.clone(), score: self.score } }
}

/// `(path, score)` pair reported next to a generated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub path: String,
    pub score: f64,
}
