//! Core error types for studyquest-core.
//!
//! This module defines the error hierarchy using thiserror. Engine
//! operations never fail because of storage; storage problems are
//! surfaced through [`crate::Durability`] instead. The errors here cover
//! gateway access, invalid caller input and configuration.

use std::convert::Infallible;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence gateway errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected ledger input
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the blob for `key` failed
    #[error("Failed to access record '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Key cannot be mapped onto the backing store
    #[error("Invalid record key: {0:?}")]
    InvalidKey(String),
}

/// Input rejected by the gamification ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// XP amount is not a finite, non-negative number
    #[error("Invalid XP amount: {0}")]
    InvalidAmount(String),

    /// Badge identifier is empty
    #[error("Invalid badge identifier: {0:?}")]
    InvalidBadge(String),
}

/// Lets infallible conversions (`u64`, `u32`) feed the ledger directly.
impl From<Infallible> for LedgerError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
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

    /// Dot-path key does not name a configuration value
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
