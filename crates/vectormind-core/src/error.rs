//! Error types for VectorMind

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the VectorMind system
///
/// Nothing in the core recovers from these; every variant reaches the caller
/// so the outer layer can decide how to present it.
#[derive(Error, Debug)]
pub enum Error {
    /// The document could not be parsed into text.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Extraction succeeded but produced no text to chunk.
    #[error("Empty document: {0}")]
    EmptyDocument(String),

    /// An embedding, generation or index service is unreachable or answered with an error.
    #[error("Upstream unavailable ({service}): {message}")]
    UpstreamUnavailable { service: String, message: String },

    /// A vector does not match the dimensionality established for its collection.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an [`Error::UpstreamUnavailable`] for the named service.
    pub fn upstream(service: impl Into<String>, message: impl ToString) -> Self {
        Error::UpstreamUnavailable {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error came from an external service rather than from the input.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::UpstreamUnavailable { .. })
    }
}
