//! Error types for encoding.
//!
//! Every failure aborts the whole encode: there is no partial output and no
//! retry, since encoding is deterministic and would fail the same way again.
//!
//! ## Error Categories
//!
//! - **Unencodable values**: a scalar strategy could not render a value
//!   (non-finite float, out-of-range integer, unparsable special scalar)
//! - **Empty encodes**: the top-level value produced no content at all
//! - **Shape conflicts**: a builder was asked to become a single value, a
//!   sequence and/or a record at the same time
//! - **Configuration errors**: a configured delimiter cannot be used to build keys
//!
//! Errors that arise while walking a value carry the [`KeyPath`] of the
//! position that failed.
//!
//! ## Examples
//!
//! ```rust
//! use serde_linecoder::{to_string, Error};
//!
//! let err = to_string(&f64::NAN).unwrap_err();
//! assert!(matches!(err, Error::UnencodableValue { .. }));
//! ```

use crate::key_path::KeyPath;
use crate::ser::Shape;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A scalar could not be converted to its textual form.
    #[error("cannot encode {value} at {path}: {reason}")]
    UnencodableValue {
        value: String,
        path: KeyPath,
        reason: String,
    },

    /// The top-level value did not produce any content.
    #[error("top-level value did not encode any values")]
    EmptyEncode,

    /// A builder that already committed to one shape was asked to adopt another.
    #[error("shape conflict at {path}: builder already holds {existing}, cannot write {attempted}")]
    ShapeConflict {
        path: KeyPath,
        existing: Shape,
        attempted: Shape,
    },

    /// A configured delimiter or literal cannot be represented.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error during writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unencodable-value error at the root path.
    ///
    /// Strategies build errors this way; the encoder then relocates them to
    /// the key path it was visiting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_linecoder::Error;
    ///
    /// let err = Error::unencodable(u128::MAX, "integer out of range");
    /// assert!(err.to_string().contains("integer out of range"));
    /// ```
    pub fn unencodable<V: fmt::Display>(value: V, reason: &str) -> Self {
        Error::UnencodableValue {
            value: value.to_string(),
            path: KeyPath::root(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn shape_conflict(existing: Shape, attempted: Shape) -> Self {
        Error::ShapeConflict {
            path: KeyPath::root(),
            existing,
            attempted,
        }
    }

    /// Creates a configuration error.
    pub fn configuration<T: fmt::Display>(msg: T) -> Self {
        Error::Configuration(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the key path the error was raised at, if it is located.
    #[must_use]
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            Error::UnencodableValue { path, .. } | Error::ShapeConflict { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Places a located error at `at`. Other variants pass through unchanged.
    pub(crate) fn at(self, at: &KeyPath) -> Self {
        match self {
            Error::UnencodableValue { value, reason, .. } => Error::UnencodableValue {
                value,
                path: at.clone(),
                reason,
            },
            Error::ShapeConflict {
                existing,
                attempted,
                ..
            } => Error::ShapeConflict {
                path: at.clone(),
                existing,
                attempted,
            },
            other => other,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
