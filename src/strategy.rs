//! Scalar strategies.
//!
//! Every recognised scalar kind is turned into a [`Value`] by one function
//! slot of [`ScalarStrategies`]. Slots are independent: replacing the
//! timestamp format or the blob encoding touches neither the builder nor the
//! writer.
//!
//! ## Default strategies
//!
//! | Kind | Rendering |
//! |---|---|
//! | boolean | `Bool` tag (the writer substitutes the true/false literals) |
//! | integer | base-10 digits |
//! | float | shortest round-trip digits, trailing `.0` removed; non-finite fails |
//! | string | UTF-8 bytes |
//! | blob | standard base64 |
//! | timestamp | RFC 3339, whole seconds, `Z` for UTC |
//! | locator | absolute text form |
//! | decimal | canonical decimal text |
//!
//! ## Examples
//!
//! ```rust
//! use serde_linecoder::{to_string_with_options, EncoderOptions, ScalarStrategies};
//! use serde_linecoder::strategy;
//! use serde_linecoder::special::Blob;
//!
//! let strategies = ScalarStrategies::default().with_blob(strategy::blob_hex);
//! let options = EncoderOptions::new().with_strategies(strategies);
//!
//! let out = to_string_with_options(&Blob::from(vec![10, 15, 20]), &options).unwrap();
//! assert_eq!(out, "0a0f14");
//! ```

use crate::{Error, Result, Value};
use base64::Engine;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt;
use std::sync::Arc;

/// An integer of any native width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Integer {
    Signed(i128),
    Unsigned(u128),
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::Signed(v) => write!(f, "{}", v),
            Integer::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

/// A floating point value, keeping its original width so it renders with
/// the digits of that width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Float {
    F32(f32),
    F64(f64),
}

impl Float {
    #[must_use]
    pub fn is_finite(self) -> bool {
        match self {
            Float::F32(v) => v.is_finite(),
            Float::F64(v) => v.is_finite(),
        }
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Float::F32(v) => write!(f, "{}", v),
            Float::F64(v) => write!(f, "{}", v),
        }
    }
}

pub type BoolStrategy = Arc<dyn Fn(bool) -> Result<Value> + Send + Sync>;
pub type IntegerStrategy = Arc<dyn Fn(Integer) -> Result<Value> + Send + Sync>;
pub type FloatStrategy = Arc<dyn Fn(Float) -> Result<Value> + Send + Sync>;
pub type StrStrategy = Arc<dyn Fn(&str) -> Result<Value> + Send + Sync>;
pub type BlobStrategy = Arc<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;
pub type TimestampStrategy = Arc<dyn Fn(&DateTime<FixedOffset>) -> Result<Value> + Send + Sync>;
pub type DecimalStrategy = Arc<dyn Fn(&BigDecimal) -> Result<Value> + Send + Sync>;

/// The table of scalar conversion functions handed to the encoder.
///
/// Cloning is cheap: every slot is reference counted.
#[derive(Clone)]
pub struct ScalarStrategies {
    pub boolean: BoolStrategy,
    pub integer: IntegerStrategy,
    pub float: FloatStrategy,
    pub string: StrStrategy,
    pub blob: BlobStrategy,
    pub timestamp: TimestampStrategy,
    pub locator: StrStrategy,
    pub decimal: DecimalStrategy,
}

impl Default for ScalarStrategies {
    fn default() -> Self {
        ScalarStrategies {
            boolean: Arc::new(boolean),
            integer: Arc::new(integer),
            float: Arc::new(float),
            string: Arc::new(string),
            blob: Arc::new(blob_base64),
            timestamp: Arc::new(timestamp_rfc3339),
            locator: Arc::new(locator),
            decimal: Arc::new(decimal),
        }
    }
}

impl fmt::Debug for ScalarStrategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarStrategies").finish_non_exhaustive()
    }
}

impl ScalarStrategies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_boolean<F>(mut self, f: F) -> Self
    where
        F: Fn(bool) -> Result<Value> + Send + Sync + 'static,
    {
        self.boolean = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_integer<F>(mut self, f: F) -> Self
    where
        F: Fn(Integer) -> Result<Value> + Send + Sync + 'static,
    {
        self.integer = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_float<F>(mut self, f: F) -> Self
    where
        F: Fn(Float) -> Result<Value> + Send + Sync + 'static,
    {
        self.float = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_string<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.string = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_blob<F>(mut self, f: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
    {
        self.blob = Arc::new(f);
        self
    }

    /// Replaces the timestamp rendering.
    ///
    /// ```rust
    /// use serde_linecoder::{strategy, ScalarStrategies};
    ///
    /// let unix = ScalarStrategies::default().with_timestamp(strategy::timestamp_unix_seconds);
    /// ```
    #[must_use]
    pub fn with_timestamp<F>(mut self, f: F) -> Self
    where
        F: Fn(&DateTime<FixedOffset>) -> Result<Value> + Send + Sync + 'static,
    {
        self.timestamp = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_locator<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.locator = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_decimal<F>(mut self, f: F) -> Self
    where
        F: Fn(&BigDecimal) -> Result<Value> + Send + Sync + 'static,
    {
        self.decimal = Arc::new(f);
        self
    }
}

pub fn boolean(value: bool) -> Result<Value> {
    Ok(Value::Bool(value))
}

pub fn integer(value: Integer) -> Result<Value> {
    Ok(Value::Number(value.to_string().into_bytes()))
}

/// Like [`integer`], but rejects values outside the `i64` range.
///
/// ```rust
/// use serde_linecoder::strategy::{integer_within_i64, Integer};
///
/// assert!(integer_within_i64(Integer::Unsigned(u64::MAX as u128)).is_err());
/// assert!(integer_within_i64(Integer::Signed(-5)).is_ok());
/// ```
pub fn integer_within_i64(value: Integer) -> Result<Value> {
    let fits = match value {
        Integer::Signed(v) => i64::try_from(v).is_ok(),
        Integer::Unsigned(v) => i64::try_from(v).is_ok(),
    };
    if fits {
        integer(value)
    } else {
        Err(Error::unencodable(value, "integer out of range"))
    }
}

/// Shortest round-trip digits with a trailing `.0` removed.
///
/// # Errors
///
/// Returns [`Error::UnencodableValue`] for NaN and infinities.
pub fn float(value: Float) -> Result<Value> {
    if !value.is_finite() {
        return Err(Error::unencodable(value, "floating point value is not finite"));
    }
    let mut buffer = ryu::Buffer::new();
    let digits = match value {
        Float::F32(v) => buffer.format_finite(v),
        Float::F64(v) => buffer.format_finite(v),
    };
    Ok(Value::Number(trim_float(digits).into_bytes()))
}

pub(crate) fn trim_float(digits: &str) -> String {
    digits.strip_suffix(".0").unwrap_or(digits).to_string()
}

pub fn string(value: &str) -> Result<Value> {
    Ok(Value::String(value.as_bytes().to_vec()))
}

pub fn blob_base64(value: &[u8]) -> Result<Value> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(value);
    Ok(Value::String(encoded.into_bytes()))
}

/// Lowercase hexadecimal, two digits per byte.
pub fn blob_hex(value: &[u8]) -> Result<Value> {
    let mut encoded = String::with_capacity(value.len() * 2);
    for byte in value {
        encoded.push_str(&format!("{:02x}", byte));
    }
    Ok(Value::String(encoded.into_bytes()))
}

pub fn timestamp_rfc3339(value: &DateTime<FixedOffset>) -> Result<Value> {
    let text = value.to_rfc3339_opts(SecondsFormat::Secs, true);
    Ok(Value::String(text.into_bytes()))
}

/// Whole seconds since the Unix epoch, as a number.
pub fn timestamp_unix_seconds(value: &DateTime<FixedOffset>) -> Result<Value> {
    Ok(Value::Number(value.timestamp().to_string().into_bytes()))
}

pub fn locator(value: &str) -> Result<Value> {
    Ok(Value::String(value.as_bytes().to_vec()))
}

/// Plain notation, never scientific.
pub fn decimal(value: &BigDecimal) -> Result<Value> {
    Ok(Value::Number(value.to_plain_string().into_bytes()))
}
