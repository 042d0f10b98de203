use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Corpus root {path} is unavailable: {reason}")]
    CorpusRoot { path: String, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    CorpusParse { path: String, reason: String },

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the downstream answer generator. All of them are recoverable:
/// callers substitute a fallback response instead of surfacing the error.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected provider response: {0}")]
    Malformed(String),

    #[error("generator is not configured: {0}")]
    NotConfigured(String),
}
