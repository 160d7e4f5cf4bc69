//! Core error types for recenter-core.
//!
//! The hierarchy mirrors the failure taxonomy of the core: validation
//! failures are always recoverable and never leave partial state behind,
//! duplicate blocklist entries are rejected as a no-op, and transient
//! storage failures are either propagated (start/finish/add) or absorbed
//! by the heartbeat retry loop.

use thiserror::Error;

/// Top-level error type for recenter-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The normalized domain is already on the user's blocklist.
    #[error("'{domain}' is already blocked")]
    Duplicate { domain: String },

    /// Referenced blocked-site row does not exist (or is not the
    /// caller's).
    #[error("Blocked site {id} not found")]
    SiteNotFound { id: uuid::Uuid },

    /// Storage read/write failure (transient from the caller's view).
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration load/save failure.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors. Raised before any write happens.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The domain string does not look like a host name.
    #[error("'{input}' is not a valid domain: {reason}")]
    InvalidDomain { input: String, reason: String },

    /// A self-reported rating outside [1, 5].
    #[error("Rating for '{field}' must be between 1 and 5, got {value}")]
    RatingOutOfRange { field: &'static str, value: i64 },

    /// Invalid value for some field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A persisted row could not be decoded.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Database is locked.
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: std::path::PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: std::path::PathBuf, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
