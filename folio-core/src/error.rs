//! Error types for Folio Core

use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Hero error: {0}")]
    Hero(#[from] HeroError),
}

impl FolioError {
    /// Whether this error means the session is no longer valid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FolioError::Api(ApiError::Unauthorized))
    }
}

/// Errors reported by the REST collaborator
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors detected locally before any request is sent
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors from the hero rotation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HeroError {
    #[error("Index {index} out of range for {len} hero items")]
    OutOfRange { index: usize, len: usize },

    #[error("Hero period must be positive, got {0:?}")]
    ZeroPeriod(std::time::Duration),
}

/// Errors while reading configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
