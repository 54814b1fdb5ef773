//! Error types shared by every stage of a training run.

use thiserror::Error;

/// Errors surfaced by network construction, training, evaluation and I/O.
#[derive(Debug, Error)]
pub enum MlpError {
    /// A serialized network or a data file could not be parsed.
    #[error("Format error: {message}")]
    Format { message: String },

    /// An input vector does not line up with the weights consuming it.
    #[error("Dimension mismatch: expected {expected} inputs, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Training was stopped before any checkpoint produced a best network.
    #[error("Training interrupted before the first checkpoint")]
    Interrupted,
}

impl MlpError {
    pub fn format(message: impl Into<String>) -> Self {
        MlpError::Format { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        MlpError::InvalidConfiguration { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, MlpError>;
