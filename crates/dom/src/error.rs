//! Error types for document loading.

use thiserror::Error;

/// Errors produced while loading a document from an external source.
///
/// Malformed markup is never an error: the parser recovers and records
/// what it saw in [`Document::errors`](crate::Document::errors).
#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}
