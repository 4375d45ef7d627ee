//! Error types for DishaNav

use thiserror::Error;

/// Failure modes of the address / coordinate resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// No API key configured for the geocoding service.
    #[error("Geocoding API key is not configured")]
    NotConfigured,

    /// The service answered but found no match.
    #[error("Address not found ({0})")]
    NotFound(String),

    /// Network failure, quota, denied request or malformed response.
    #[error("Geocoding service unavailable: {0}")]
    Unavailable(String),
}

/// DishaNav error type
#[derive(Error, Debug)]
pub enum DishaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("Destination store error: {0}")]
    Store(String),

    #[error("Trace error: {0}")]
    Trace(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for DishaError {
    fn from(e: toml::de::Error) -> Self {
        DishaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DishaError>;
