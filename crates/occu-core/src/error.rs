//! Error types for occusim

use thiserror::Error;

/// occusim error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Bad count, shape, spread or covariate reference
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Non-finite value reached a logistic transform
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
