//! # serde_linecoder
//!
//! A Serde-compatible encoder for a compact, delimiter-based line format.
//!
//! ## How encoding works
//!
//! Encoding runs in two steps:
//!
//! 1. The [`Encoder`] walks any `T: Serialize` and builds an intermediate
//!    [`Value`] tree. Scalars are rendered by pluggable
//!    [`ScalarStrategies`]; records and maps become objects whose keys are
//!    the full key path from the root (`sub.numeral`); sequences become arrays.
//! 2. The [`Writer`] renders the tree with the knobs of [`EncoderOptions`].
//!    A sequence at the root becomes one record per line. Everything nested
//!    is bracketed and comma-joined.
//!
//! Decoding is not supported.
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_linecoder = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Records
//!
//! ```rust
//! use serde::Serialize;
//! use serde_linecoder::to_string;
//!
//! #[derive(Serialize)]
//! struct Sub {
//!     numeral: i32,
//!     string: String,
//! }
//!
//! #[derive(Serialize)]
//! struct Record {
//!     text: String,
//!     int: i32,
//!     sub: Sub,
//! }
//!
//! let record = Record {
//!     text: "hello".to_string(),
//!     int: 12,
//!     sub: Sub { numeral: 76, string: "world".to_string() },
//! };
//!
//! assert_eq!(
//!     to_string(&record).unwrap(),
//!     "[int:12,sub:[sub.numeral:76,sub.string:world],text:hello]"
//! );
//! ```
//!
//! ### One Record per Line
//!
//! ```rust
//! use serde::Serialize;
//! use serde_linecoder::to_string;
//!
//! #[derive(Serialize)]
//! struct Row { a: i32 }
//!
//! let rows = vec![Row { a: 1 }, Row { a: 2 }];
//! assert_eq!(to_string(&rows).unwrap(), "[0.a:1]\n[1.a:2]");
//! ```
//!
//! ### Custom Strategies
//!
//! ```rust
//! use serde_linecoder::{to_string_with_options, strategy, EncoderOptions, ScalarStrategies};
//! use serde_linecoder::special::Timestamp;
//!
//! let options = EncoderOptions::new().with_strategies(
//!     ScalarStrategies::default().with_timestamp(strategy::timestamp_unix_seconds),
//! );
//! let at = Timestamp::parse("2024-03-04T10:30:00Z").unwrap();
//! assert_eq!(to_string_with_options(&at, &options).unwrap(), "1709548200");
//! ```
//!
//! ## Concurrency
//!
//! Options are immutable during an encode and `Send + Sync`; a single
//! [`EncoderOptions`] can be shared by any number of concurrent encodes.
//! Each encode owns its builders exclusively.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` per encode, `trace` per
//! spawned child encoder). No subscriber is installed.

pub mod collate;
pub mod error;
pub mod key_path;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod special;
pub mod strategy;
pub mod value;
pub mod writer;

pub use collate::KeyOrder;
pub use error::{Error, Result};
pub use key_path::{KeyPath, KeyStyle, PathSegment};
pub use map::ValueMap;
pub use options::EncoderOptions;
pub use ser::{Accumulator, Encoder, Shape};
pub use special::{Blob, Decimal, Locator, Timestamp};
pub use strategy::{Float, Integer, ScalarStrategies};
pub use value::Value;
pub use writer::Writer;

use serde::Serialize;
use std::io;
use tracing::debug;

/// Builds the intermediate [`Value`] for any `T: Serialize` with default options.
///
/// # Examples
///
/// ```rust
/// use serde_linecoder::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if a scalar cannot be encoded or nothing was encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    to_value_with_options(value, &EncoderOptions::default())
}

/// Builds the intermediate [`Value`] with custom options.
///
/// # Errors
///
/// Returns an error if the options are invalid, a scalar cannot be encoded,
/// the value mixes container shapes, or nothing was encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value_with_options<T>(value: &T, options: &EncoderOptions) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    options.validate()?;
    let mut encoder = Encoder::new(options);
    value.serialize(&mut encoder)?;
    encoder.finish()
}

/// Encodes any `T: Serialize` to bytes with default options.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, &EncoderOptions::default())
}

/// Encodes any `T: Serialize` to bytes with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_linecoder::{to_vec_with_options, EncoderOptions};
///
/// let options = EncoderOptions::new().with_object_delimiter(";");
/// let bytes = to_vec_with_options(&["howdy", "howdy"], &options).unwrap();
/// assert_eq!(bytes, b"howdy;howdy");
/// ```
///
/// # Errors
///
/// Returns an error if the options are invalid or the value cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: &EncoderOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    debug!(type_name = std::any::type_name::<T>(), "encoding value");
    let tree = to_value_with_options(value, options)?;
    let output = Writer::new(options).write(&tree);
    debug!(bytes = output.len(), "encoded value");
    Ok(output)
}

/// Encodes any `T: Serialize` to a string with default options.
///
/// # Examples
///
/// ```rust
/// use serde_linecoder::to_string;
///
/// assert_eq!(to_string(&vec!["howdy"; 3]).unwrap(), "howdy\nhowdy\nhowdy");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &EncoderOptions::default())
}

/// Encodes any `T: Serialize` to a string with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded,
/// [`Error::Configuration`] if a configured literal or delimiter is not valid
/// UTF-8, or [`Error::Custom`] if a scalar strategy produced bytes that are
/// not valid UTF-8.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &EncoderOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    options.validate_text()?;
    let bytes = to_vec_with_options(value, options)?;
    String::from_utf8(bytes).map_err(|e| Error::custom(format!("output is not UTF-8: {}", e)))
}

/// Encodes any `T: Serialize` into a writer with default options.
///
/// # Examples
///
/// ```rust
/// use serde_linecoder::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &(1, "two")).unwrap();
/// assert_eq!(buffer, b"1\ntwo");
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &EncoderOptions::default())
}

/// Encodes any `T: Serialize` into a writer with custom options.
///
/// Nothing is written if encoding fails.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &EncoderOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let bytes = to_vec_with_options(value, options)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}
