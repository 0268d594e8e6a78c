//! Error types used by the tuning table and the robot runtime.
//!
//! This module defines two error enums:
//!
//! - [`TableError`] errors raised by the in-process table when a write is rejected.
//! - [`RuntimeError`] errors raised by the tick loop itself.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs.

use thiserror::Error;

/// # Errors produced by table writes.
///
/// Reads never fail: a subscriber falls back to its default value instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Key (or table path segment) is empty or contains the path separator.
    #[error("invalid key {key:?}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    /// The entry already holds a value of a different type.
    #[error("type mismatch on {key:?}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Full path of the entry.
        key: String,
        /// Type the writer tried to store.
        expected: &'static str,
        /// Type currently stored in the entry.
        found: &'static str,
    },
}

impl TableError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tunevisor::TableError;
    ///
    /// let err = TableError::InvalidKey { key: String::new() };
    /// assert_eq!(err.as_label(), "table_invalid_key");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TableError::InvalidKey { .. } => "table_invalid_key",
            TableError::TypeMismatch { .. } => "table_type_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TableError::InvalidKey { key } => format!("invalid key: {key:?}"),
            TableError::TypeMismatch {
                key,
                expected,
                found,
            } => format!("{key}: cannot store {expected} over {found}"),
        }
    }
}

/// # Errors produced by the robot runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// OS signal listeners could not be registered.
    #[error("signal registration failed: {error}")]
    Signal {
        /// The underlying I/O error message.
        error: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Signal { .. } => "runtime_signal",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Signal { error } => format!("signal: {error}"),
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::Signal {
            error: e.to_string(),
        }
    }
}
