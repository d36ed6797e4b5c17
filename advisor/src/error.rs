use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentLoadError {
    #[error("policy document not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to extract text from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: pdf_extract::OutputError,
    },
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("cannot embed an empty batch")]
    EmptyInput,
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("embedding model unavailable (HTTP {status}): {body}")]
    Service { status: u16, body: String },
    #[error("embedding response held {actual} vectors for {expected} inputs")]
    Shape { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum IndexBuildError {
    #[error("cannot build an index from zero vectors")]
    Empty,
    #[error("vector at row {row} has dimensionality {found}, expected {expected}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        row: usize,
    },
}

#[derive(Debug, Error)]
pub enum IndexQueryError {
    #[error("index contains no vectors")]
    EmptyIndex,
    #[error("k must be at least 1")]
    InvalidK,
    #[error("query dimensionality {found} does not match index dimensionality {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Index(#[from] IndexQueryError),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },
    #[error("malformed stream payload: {0}")]
    Stream(String),
}

/// Per-turn failure surfaced by the chat orchestrator. The shared index and
/// the caller's history are unaffected; only the current turn is lost.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Startup initialization failure. All variants are fatal; the binary logs
/// the error and exits non-zero.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Load(#[from] DocumentLoadError),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Index(#[from] IndexBuildError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),
}
