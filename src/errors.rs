//! Error types for completion, type-index loading and document edits.

use std::path::PathBuf;

use thiserror::Error;

/// Failures inside the completion pipeline. None of them reaches the client
/// as a fault; handlers degrade to a narrower list or no list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// No control type for the tag; callers fall back to the generic control.
    #[error("no control type registered for <{0}>")]
    NotFound(String),
    /// Metadata the resolver will not interpret, such as a type-valued
    /// `ParseChildrenAttribute`.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("inconsistent parser state: {0}")]
    InconsistentState(String),
}

#[derive(Debug, Error)]
pub enum TypeIndexError {
    #[error("failed to read type index {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid type index JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("stale version {received} (current {current})")]
    StaleVersion { current: i32, received: i32 },
    #[error("edit range {line}:{character} is outside the document")]
    OutOfBounds { line: u32, character: u32 },
}
