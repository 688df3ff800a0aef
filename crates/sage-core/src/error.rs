use core::result::Result as CoreResult;
use std::io::Error as IoError;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur while planning and executing a goal.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required API key was not found.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// A model provider encountered an error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Model provider returned an invalid response.
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    /// Model output that had to be JSON could not be parsed.
    #[error("Parse error: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
        /// The offending raw model output.
        raw: String,
    },

    /// Parsed output does not have the required shape.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A handler's prerequisite memory entry is missing.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A required external resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied unusable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Text could not be extracted from a document.
    #[error("Document error: {0}")]
    Document(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}
