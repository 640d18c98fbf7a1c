//! Error types for the remedy_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for remedy_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request failed one or more validation rules; carries the joined messages
    #[error("{0}")]
    Validation(String),

    /// A referenced drug or dosage id did not resolve
    #[error("{0}")]
    NotFound(String),

    /// The candidate treatment collides with an already prescribed one
    #[error("{0}")]
    Overlap(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(String),
}
