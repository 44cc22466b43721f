//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur during brain processing.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The brain is misconfigured (missing API key, bad client setup).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The model backend could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The message could not be processed.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}
