//! The intermediate value tree.
//!
//! Encoding happens in two steps: a value is first walked into a [`Value`]
//! tree, then the tree is rendered by the [`Writer`](crate::Writer). Scalars in
//! the tree are already rendered to bytes by the scalar strategies, so the
//! writer never needs to know which Rust type produced them.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_linecoder::Value;
//!
//! let null = Value::Null;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! assert!(number.is_scalar());
//! ```
//!
//! ### Converting from Rust Types
//!
//! ```rust
//! use serde_linecoder::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value: Value = to_value(&Point { x: 10, y: 20 }).unwrap();
//!
//! if let Value::Object(obj) = value {
//!     assert_eq!(obj.get("x").and_then(|v| v.as_number_str()), Some("10"));
//! }
//! ```
//!
//! A `Value` is itself `Serialize`. Fed back into the encoder it is installed
//! as-is: scalars skip the strategies and object keys are kept verbatim, byte
//! for byte. Other serializers see UTF-8 bytes as text and anything else as
//! bytes.

use crate::special::{BOOL_TOKEN, NUMBER_TOKEN, RAW_STRING_TOKEN, VERBATIM_OBJECT_TOKEN};
use crate::{EncoderOptions, ValueMap, Writer};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A node of the intermediate tree.
///
/// # Examples
///
/// ```rust
/// use serde_linecoder::Value;
///
/// let text = Value::string("hello");
/// let num = Value::number("12");
///
/// assert!(text.is_string());
/// assert!(num.is_number());
/// assert!(Value::Null.is_null());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// Pre-rendered text, written verbatim.
    String(Vec<u8>),
    /// Pre-rendered numeric literal, written verbatim.
    Number(Vec<u8>),
    Array(Vec<Value>),
    Object(ValueMap),
}

impl Value {
    /// Creates a `String` node from already rendered bytes.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Value::String(bytes.into())
    }

    /// Creates a `Number` node from an already rendered literal.
    pub fn number(literal: impl Into<Vec<u8>>) -> Self {
        Value::Number(literal.into())
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` for leaves: everything except arrays and objects.
    ///
    /// ```rust
    /// use serde_linecoder::Value;
    ///
    /// assert!(Value::Null.is_scalar());
    /// assert!(!Value::Array(vec![]).is_scalar());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the rendered bytes of a `String` or `Number` node.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(bytes) | Value::Number(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// If the value is a `String` holding UTF-8, returns it.
    ///
    /// ```rust
    /// use serde_linecoder::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// If the value is a `Number` holding UTF-8, returns its literal.
    #[inline]
    #[must_use]
    pub fn as_number_str(&self) -> Option<&str> {
        match self {
            Value::Number(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Parses a `Number` literal as `i64`.
    ///
    /// ```rust
    /// use serde_linecoder::Value;
    ///
    /// assert_eq!(Value::from(42).as_i64(), Some(42));
    /// assert_eq!(Value::from(1.5).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number_str().and_then(|s| s.parse().ok())
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number_str().and_then(|s| s.parse().ok())
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

/// Renders with the default [`EncoderOptions`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = EncoderOptions::default();
        let bytes = Writer::new(&options).write(self);
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

/// Text when the bytes are UTF-8, raw bytes otherwise.
struct RawBytes<'a>(&'a [u8]);

impl Serialize for RawBytes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(self.0) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.serialize_bytes(self.0),
        }
    }
}

struct VerbatimEntries<'a>(&'a ValueMap);

impl Serialize for VerbatimEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0.iter() {
            map.serialize_entry(&RawBytes(key), value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_newtype_struct(BOOL_TOKEN, b),
            Value::String(bytes) => {
                serializer.serialize_newtype_struct(RAW_STRING_TOKEN, &RawBytes(bytes))
            }
            Value::Number(bytes) => {
                serializer.serialize_newtype_struct(NUMBER_TOKEN, &RawBytes(bytes))
            }
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                serializer.serialize_newtype_struct(VERBATIM_OBJECT_TOKEN, &VerbatimEntries(obj))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(value.to_string().into_bytes())
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Non-finite floats become their `NaN`/`inf` spellings; the strict float
/// strategy used while encoding rejects them instead.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        let mut buffer = ryu::Buffer::new();
        Value::Number(crate::strategy::trim_float(buffer.format(value)).into_bytes())
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        let mut buffer = ryu::Buffer::new();
        Value::Number(crate::strategy::trim_float(buffer.format(value)).into_bytes())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into_bytes())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.as_bytes().to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::number("42"));
        assert_eq!(Value::from(-7i64), Value::number("-7"));
        assert_eq!(Value::from(u128::MAX), Value::number(u128::MAX.to_string()));
        assert_eq!(Value::from(3.5f64), Value::number("3.5"));
        assert_eq!(Value::from(12.0f64), Value::number("12"));
        assert_eq!(Value::from("test"), Value::string("test"));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_non_finite_from_keeps_spelling() {
        assert_eq!(Value::from(f64::NAN), Value::number("NaN"));
        assert_eq!(Value::from(f64::NEG_INFINITY), Value::number("-inf"));
    }

    #[test]
    fn test_accessors() {
        let value = Value::number("42");
        assert!(value.is_number());
        assert!(value.is_scalar());
        assert_eq!(value.as_i64(), Some(42));
        assert_eq!(value.as_f64(), Some(42.0));
        assert_eq!(value.as_bytes(), Some(&b"42"[..]));
        assert_eq!(value.as_str(), None);

        let invalid = Value::String(vec![0xff]);
        assert_eq!(invalid.as_str(), None);
        assert_eq!(invalid.as_bytes(), Some(&[0xffu8][..]));
    }

    #[test]
    fn test_display_uses_default_writer() {
        let mut map = ValueMap::new();
        map.insert("b", Value::from(2));
        map.insert("a", Value::from(1));
        assert_eq!(Value::Object(map).to_string(), "[a:1,b:2]");
    }

    #[test]
    fn test_json_view_of_value() {
        let mut map = ValueMap::new();
        map.insert("sub.numeral", Value::number("76"));
        map.insert("flag", Value::Bool(true));
        let json = serde_json::to_string(&Value::Object(map)).unwrap();
        assert_eq!(json, r#"{"sub.numeral":"76","flag":true}"#);
    }
}
