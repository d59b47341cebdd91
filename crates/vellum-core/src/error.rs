//! Error types for Vellum.

use thiserror::Error;

/// Top-level result type for Vellum operations.
pub type Result<T> = std::result::Result<T, VellumError>;

/// Top-level error type for Vellum.
///
/// Absent documents and malformed lines are NOT errors anywhere in the
/// core: parsing routines degrade to "nothing found". These variants
/// cover caller input errors and storage-boundary violations, which are
/// rejected before any core logic runs.
#[derive(Debug, Error)]
pub enum VellumError {
    #[error("path escapes vault root: {0}")]
    PathEscape(String),

    #[error("file too large: {path} ({size} bytes exceeds {max})")]
    FileTooLarge { path: String, size: u64, max: u64 },

    #[error("required document missing: {0}")]
    MissingDocument(String),

    #[error("search term must not be empty")]
    EmptySearchTerm,

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}
