//! Error types
//!
//! Defines domain-specific error types for each module of the directory service.

use std::fmt;
use std::io;
use std::time::Duration;

/// Credential store errors
///
/// These never reach the HTTP peer. The store client collapses every variant
/// into `Lookup::NotFound` and only logs the cause.
#[derive(Debug)]
pub enum StoreError {
    Connect(String),
    Command(String),
    Timeout(Duration),
    PoolExhausted,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Connect(e) => write!(f, "Store connection failed: {}", e),
            StoreError::Command(e) => write!(f, "Store command failed: {}", e),
            StoreError::Timeout(d) => write!(f, "Store call timed out after {:?}", d),
            StoreError::PoolExhausted => write!(f, "No store connection available"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<fred::error::Error> for StoreError {
    fn from(error: fred::error::Error) -> Self {
        match error.kind() {
            fred::error::ErrorKind::IO | fred::error::ErrorKind::Auth => {
                StoreError::Connect(error.to_string())
            }
            _ => StoreError::Command(error.to_string()),
        }
    }
}

/// Form body errors
#[derive(Debug, PartialEq)]
pub enum FormError {
    InvalidEscape(String),
    SemicolonSeparator,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::InvalidEscape(s) => write!(f, "Invalid percent escape: {}", s),
            FormError::SemicolonSeparator => write!(f, "Invalid semicolon separator in form"),
        }
    }
}

impl std::error::Error for FormError {}

/// Startup errors. Any of these stops the process.
#[derive(Debug)]
pub enum DirectoryError {
    Usage(String),
    Config(config::ConfigError),
    Store(StoreError),
    IoError(io::Error),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::Usage(s) => write!(f, "Usage: {}", s),
            DirectoryError::Config(e) => write!(f, "Configuration error: {}", e),
            DirectoryError::Store(e) => write!(f, "Store error: {}", e),
            DirectoryError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DirectoryError {}

impl From<config::ConfigError> for DirectoryError {
    fn from(error: config::ConfigError) -> Self {
        DirectoryError::Config(error)
    }
}

impl From<StoreError> for DirectoryError {
    fn from(error: StoreError) -> Self {
        DirectoryError::Store(error)
    }
}

impl From<io::Error> for DirectoryError {
    fn from(error: io::Error) -> Self {
        DirectoryError::IoError(error)
    }
}
