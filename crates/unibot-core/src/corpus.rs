use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::CorpusSettings;
use crate::error::{Error, Result};
use crate::types::{Content, Document};

/// A file that could not be turned into a document. Kept for reporting;
/// never scored.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub path: String,
    pub error: String,
}

/// Immutable set of documents loaded from one directory tree.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    root: PathBuf,
    documents: Vec<Document>,
    by_path: HashMap<String, usize>,
    failures: Vec<LoadFailure>,
}

impl Corpus {
    /// Later entries with an already-seen path replace the earlier content.
    pub fn from_documents(root: impl Into<PathBuf>, documents: Vec<Document>, failures: Vec<LoadFailure>) -> Self {
        let mut unique: Vec<Document> = Vec::with_capacity(documents.len());
        let mut by_path = HashMap::new();
        for doc in documents {
            match by_path.get(&doc.path) {
                Some(&idx) => unique[idx] = doc,
                None => {
                    by_path.insert(doc.path.clone(), unique.len());
                    unique.push(doc);
                }
            }
        }
        Self { root: root.into(), documents: unique, by_path, failures }
    }

    pub fn root(&self) -> &Path { &self.root }

    /// Documents in load order; ranking ties resolve by this order.
    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn get(&self, path: &str) -> Option<&Document> { self.by_path.get(path).map(|&idx| &self.documents[idx]) }

    pub fn failures(&self) -> &[LoadFailure] { &self.failures }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    JsonLines,
    Text,
}

#[derive(Debug, Clone, Default)]
pub struct CorpusLoader {
    settings: CorpusSettings,
}

impl CorpusLoader {
    pub fn new(settings: CorpusSettings) -> Self { Self { settings } }

    pub fn load(&self, root: &Path) -> Result<Corpus> { self.load_with(root, |_| {}) }

    /// Load every supported file under `root`, calling `on_file` with the
    /// relative path of each file as it is read.
    pub fn load_with<F: FnMut(&str)>(&self, root: &Path, mut on_file: F) -> Result<Corpus> {
        if !root.is_dir() {
            let reason = if root.exists() { "not a directory" } else { "does not exist" };
            return Err(Error::CorpusRoot { path: root.display().to_string(), reason: reason.to_string() });
        }
        let mut documents = Vec::new();
        let mut failures = Vec::new();
        let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|e| e.depth() == 0 || !self.is_skipped(e));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => { warn!(error = %e, "skipping unreadable entry"); continue; }
            };
            if !entry.file_type().is_file() { continue; }
            let Some(format) = self.format_of(entry.path()) else { continue };
            let rel = relative_path(root, entry.path());
            on_file(&rel);
            match self.parse_file(entry.path(), format).and_then(|content| Document::new(rel.clone(), content)) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    warn!(path = %rel, error = %e, "document excluded from corpus");
                    failures.push(LoadFailure { path: rel, error: e.to_string() });
                }
            }
        }
        info!(root = %root.display(), documents = documents.len(), failures = failures.len(), "corpus loaded");
        Ok(Corpus::from_documents(root, documents, failures))
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir() && entry.file_name().to_str().is_some_and(|name| self.settings.skip_dirs.iter().any(|d| d == name))
    }

    fn format_of(&self, path: &Path) -> Option<FileFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        let listed = |exts: &[String]| exts.iter().any(|e| e.eq_ignore_ascii_case(&ext));
        if listed(&self.settings.json_extensions) {
            Some(FileFormat::Json)
        } else if listed(&self.settings.jsonl_extensions) {
            Some(FileFormat::JsonLines)
        } else if listed(&self.settings.text_extensions) {
            Some(FileFormat::Text)
        } else {
            debug!(path = %path.display(), "unsupported extension");
            None
        }
    }

    fn parse_file(&self, path: &Path, format: FileFormat) -> Result<Content> {
        let raw = read_file_content(path)?;
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
        match format {
            FileFormat::Json => serde_json::from_str::<Value>(raw)
                .map(Content::from_value)
                .map_err(|e| Error::CorpusParse { path: path.display().to_string(), reason: e.to_string() }),
            FileFormat::JsonLines => Ok(Content::List(
                raw.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(|line| serde_json::from_str(line).unwrap_or_else(|_| Value::String(line.to_string())))
                    .collect(),
            )),
            FileFormat::Text => Ok(Content::Text(raw.to_string())),
        }
    }
}

fn read_file_content(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => {
            let bytes = fs::read(path).map_err(|e| Error::CorpusParse { path: path.display().to_string(), reason: e.to_string() })?;
            Ok(String::from_utf8_lossy(&bytes).to_string())
        }
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}
