//! Core error types for timekeep-core.
//!
//! Every failure carries a kind (see [`ErrorKind`]) and a human-readable
//! reason through its `Display` impl. Errors are returned to the immediate
//! caller; nothing here retries.

use std::path::PathBuf;
use thiserror::Error;

use crate::goal::GoalId;

/// Core error type for timekeep-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or out-of-range input
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The referenced goal does not exist
    #[error("Goal not found: {0}")]
    NotFound(GoalId),

    /// The persistence adapter could not complete a read or write
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A countdown session can only be started once
    #[error("Countdown session already started")]
    SessionActive,
}

/// Coarse classification of a [`CoreError`], for presentation layers that
/// map failures to messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    StorageFailure,
    Config,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) | CoreError::SessionActive => ErrorKind::InvalidInput,
            CoreError::NotFound(_) => ErrorKind::NotFound,
            CoreError::Storage(_) => ErrorKind::StorageFailure,
            CoreError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// No record exists with this identifier
    #[error("No record with id {0}")]
    RecordNotFound(i64),

    /// A stored row could not be decoded
    #[error("Corrupt record {id}: {message}")]
    CorruptRecord { id: i64, message: String },

    /// Filesystem errors (data directory creation)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty
    #[error("'{0}' must not be empty")]
    Empty(&'static str),

    /// Integer outside its permitted range
    #[error("'{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if matches!(
                    e.code,
                    rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy
                ) =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
