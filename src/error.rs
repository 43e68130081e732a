//! Error types for neurosig.

use thiserror::Error;

/// neurosig error types.
#[derive(Error, Debug)]
pub enum NeuroError {
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Filesystem error while loading or saving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row width disagrees with what the operation requires
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Empty input where non-empty was required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Classification attempted before any pattern was stored
    #[error("Classifier not trained: the pattern store is empty")]
    NotTrained,

    /// Argument outside its valid domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for neurosig operations.
pub type Result<T> = std::result::Result<T, NeuroError>;
