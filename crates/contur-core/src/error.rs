//! Error types for the Contur likelihood

use thiserror::Error;

/// Contur error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rejected model inputs, parameter vectors or datasets
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A quantity is undefined for the given inputs (empty reduction, negative
    /// variance, negative Poisson mean, ...)
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
