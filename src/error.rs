//! Error types for rangebind operations.
//!
//! This module provides the error hierarchy using `thiserror` for range
//! editing, property resolution, prototype cloning, trace recording and CLI
//! commands. Every variant is recoverable: callers report and carry on.

use thiserror::Error;

/// Result type alias for rangebind operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Range and resolution errors (local, non-mutating).
    #[error("range error: {0}")]
    Range(#[from] RangeError),

    /// Remote property errors.
    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    /// Prototype cloning errors.
    #[error("clone error: {0}")]
    Clone(#[from] CloneError),

    /// Trace recording errors.
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Invalid state errors.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state.
        message: String,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Errors raised while computing or applying a range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    /// Lower bound above upper bound (or a bound that is not a number).
    #[error("invalid data range [{low}, {high}]")]
    InvalidRange {
        /// Resolved lower bound.
        low: f64,
        /// Resolved upper bound.
        high: f64,
    },

    /// Resolution must be finite and strictly positive.
    #[error("invalid resolution {value}: must be > 0")]
    InvalidResolution {
        /// Rejected resolution.
        value: f64,
    },
}

/// Errors raised by property registries.
#[derive(Error, Debug)]
pub enum PropertyError {
    /// Property lookup failed.
    #[error("could not find property of name: {name}")]
    NotFound {
        /// Name that was looked up.
        name: String,
    },

    /// Element index beyond the vector length.
    #[error("property {name} has no element {index}")]
    ElementOutOfRange {
        /// Property name.
        name: String,
        /// Requested index.
        index: usize,
    },

    /// Property already exists in the registry.
    #[error("property already defined: {name}")]
    AlreadyDefined {
        /// Property name.
        name: String,
    },

    /// Registry not initialized.
    #[error("property store not initialized. Run: rangebind init")]
    NotInitialized,

    /// Backing store failure (database, serialization).
    #[error("store error: {0}")]
    Store(String),
}

/// Errors raised while cloning widget prototypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloneError {
    /// The clone is not of the requested kind.
    #[error("internal error: could not downcast clone to {expected} (got {found})")]
    Downcast {
        /// Kind that was requested.
        expected: &'static str,
        /// Kind that was produced.
        found: &'static str,
    },

    /// Widget id not present in the arena.
    #[error("unknown widget id {id}")]
    UnknownWidget {
        /// Missing id.
        id: usize,
    },
}

/// Errors raised by trace sinks.
#[derive(Error, Debug)]
pub enum TraceError {
    /// Failed to write a statement.
    #[error("failed to write trace: {path}: {reason}")]
    WriteFailed {
        /// Trace file path.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Property(PropertyError::Store(err.to_string()))
    }
}

impl From<rusqlite::Error> for PropertyError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for PropertyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidState {
            message: "test error".to_string(),
        };
        assert_eq!(err.to_string(), "invalid state: test error");
    }

    #[test]
    fn test_range_error_display() {
        let err = RangeError::InvalidRange {
            low: 2.0,
            high: 1.0,
        };
        assert_eq!(err.to_string(), "invalid data range [2, 1]");

        let err = RangeError::InvalidResolution { value: 0.0 };
        assert!(err.to_string().contains("must be > 0"));
    }

    #[test]
    fn test_property_error_display() {
        let err = PropertyError::NotFound {
            name: "ValueRange".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not find property of name: ValueRange"
        );

        let err = PropertyError::ElementOutOfRange {
            name: "ValueRange".to_string(),
            index: 3,
        };
        assert!(err.to_string().contains("element 3"));
    }

    #[test]
    fn test_clone_error_display() {
        let err = CloneError::Downcast {
            expected: "range control",
            found: "array selector",
        };
        assert!(err.to_string().starts_with("internal error"));
    }

    #[test]
    fn test_error_from_range() {
        let err: Error = RangeError::InvalidResolution { value: -1.0 }.into();
        assert!(matches!(err, Error::Range(_)));
    }

    #[test]
    fn test_error_from_property() {
        let err: Error = PropertyError::NotInitialized.into();
        assert!(matches!(err, Error::Property(_)));
    }

    #[test]
    fn test_from_rusqlite_error_to_error() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, Error::Property(PropertyError::Store(_))));
    }

    #[test]
    fn test_from_serde_json_error_to_property_error() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: PropertyError = json_err.into();
        assert!(matches!(err, PropertyError::Store(_)));
    }

    #[test]
    fn test_error_config() {
        let err = Error::Config {
            message: "No min_label attribute.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "configuration error: No min_label attribute."
        );
    }
}
