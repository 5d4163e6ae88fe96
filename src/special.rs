//! Well-known special scalars.
//!
//! Serde's data model has no notion of timestamps, locators or arbitrary
//! precision decimals, so these wrappers mark themselves with a newtype-struct
//! name the encoder recognises and routes to the matching strategy in
//! [`ScalarStrategies`](crate::ScalarStrategies). Through any other serializer
//! they behave like their plain text form (or bytes, for [`Blob`]).
//!
//! ```rust
//! use serde_linecoder::special::{Blob, Timestamp};
//! use serde_linecoder::to_string;
//! use chrono::{TimeZone, Utc};
//!
//! let at = Timestamp::from(Utc.with_ymd_and_hms(2024, 3, 4, 12, 30, 0).unwrap());
//! assert_eq!(to_string(&at).unwrap(), "2024-03-04T12:30:00Z");
//! assert_eq!(to_string(&Blob::from(vec![10, 15, 20])).unwrap(), "Cg8U");
//! ```
//!
//! Fields of plain chrono or byte types can opt in with `serialize_with`:
//!
//! ```rust
//! use serde::Serialize;
//! use chrono::{DateTime, Utc};
//!
//! #[derive(Serialize)]
//! struct Upload {
//!     #[serde(serialize_with = "serde_linecoder::special::serialize_timestamp")]
//!     at: DateTime<Utc>,
//!     #[serde(serialize_with = "serde_linecoder::special::serialize_blob")]
//!     body: Vec<u8>,
//! }
//! ```

use crate::{Error, Result};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, TimeZone};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub(crate) const TIMESTAMP_TOKEN: &str = "$serde_linecoder::private::Timestamp";
pub(crate) const LOCATOR_TOKEN: &str = "$serde_linecoder::private::Locator";
pub(crate) const DECIMAL_TOKEN: &str = "$serde_linecoder::private::Decimal";
pub(crate) const NUMBER_TOKEN: &str = "$serde_linecoder::private::Number";
pub(crate) const BOOL_TOKEN: &str = "$serde_linecoder::private::Bool";
pub(crate) const RAW_STRING_TOKEN: &str = "$serde_linecoder::private::RawString";
pub(crate) const VERBATIM_OBJECT_TOKEN: &str = "$serde_linecoder::private::VerbatimObject";

/// What a recognised newtype name asks the encoder to do with its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Special {
    Timestamp,
    Locator,
    Decimal,
    Number,
    Bool,
    RawString,
    VerbatimObject,
}

impl Special {
    pub(crate) fn from_token(name: &str) -> Option<Self> {
        match name {
            TIMESTAMP_TOKEN => Some(Special::Timestamp),
            LOCATOR_TOKEN => Some(Special::Locator),
            DECIMAL_TOKEN => Some(Special::Decimal),
            NUMBER_TOKEN => Some(Special::Number),
            BOOL_TOKEN => Some(Special::Bool),
            RAW_STRING_TOKEN => Some(Special::RawString),
            VERBATIM_OBJECT_TOKEN => Some(Special::VerbatimObject),
            _ => None,
        }
    }
}

/// A point in time with its UTC offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    /// Parses an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnencodableValue`] if `s` is not RFC 3339.
    pub fn parse(s: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(s)
            .map(Timestamp)
            .map_err(|e| Error::unencodable(s, &format!("invalid timestamp: {}", e)))
    }

    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        Timestamp(value.with_timezone(&offset))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Full precision so the timestamp strategy sees the exact instant.
        let text = self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        serializer.serialize_newtype_struct(TIMESTAMP_TOKEN, text.as_str())
    }
}

/// An opaque byte blob.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    fn from(value: Vec<u8>) -> Self {
        Blob(value)
    }
}

impl From<&[u8]> for Blob {
    fn from(value: &[u8]) -> Self {
        Blob(value.to_vec())
    }
}

impl Serialize for Blob {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

/// An absolute resource locator such as `https://example.com/a` or
/// `file:///home/user/`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    /// Accepts `s` if it starts with a URI scheme (`scheme:`).
    ///
    /// ```rust
    /// use serde_linecoder::special::Locator;
    ///
    /// assert!(Locator::parse("file:///tmp/a.txt").is_ok());
    /// assert!(Locator::parse("tmp/a.txt").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnencodableValue`] for relative locators.
    pub fn parse(s: &str) -> Result<Self> {
        if has_scheme(s) {
            Ok(Locator(s.to_string()))
        } else {
            Err(Error::unencodable(s, "locator is not absolute"))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Locator::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(LOCATOR_TOKEN, self.0.as_str())
    }
}

/// An arbitrary-precision decimal number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal(pub BigDecimal);

impl Decimal {
    #[must_use]
    pub fn as_bigdecimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl From<BigDecimal> for Decimal {
    fn from(value: BigDecimal) -> Self {
        Decimal(value)
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BigDecimal::from_str(s)
            .map(Decimal)
            .map_err(|e| Error::unencodable(s, &format!("invalid decimal: {}", e)))
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(DECIMAL_TOKEN, self.0.to_plain_string().as_str())
    }
}

/// `serialize_with` adapter encoding any chrono `DateTime` as a [`Timestamp`].
pub fn serialize_timestamp<Tz, S>(
    value: &DateTime<Tz>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    Tz: TimeZone,
    S: Serializer,
{
    Timestamp::from(value.clone()).serialize(serializer)
}

/// `serialize_with` adapter encoding a byte buffer as a [`Blob`].
pub fn serialize_blob<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: AsRef<[u8]> + ?Sized,
    S: Serializer,
{
    serializer.serialize_bytes(value.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_timestamp_keeps_offset() {
        let ts = Timestamp::parse("2024-03-04T12:30:00.250+02:00").unwrap();
        assert_eq!(ts.as_datetime().offset().local_minus_utc(), 7200);

        let utc = Utc.with_ymd_and_hms(2024, 3, 4, 10, 30, 0).unwrap();
        assert_eq!(Timestamp::from(utc).as_datetime().offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_locator_scheme_detection() {
        assert!(Locator::parse("https://example.com/path?q=1").is_ok());
        assert!(Locator::parse("mailto:someone@example.com").is_ok());
        assert!(Locator::parse("svn+ssh://host/repo").is_ok());
        assert!(Locator::parse("/home/user").is_err());
        assert!(Locator::parse("1http://nope").is_err());
        assert!(Locator::parse("").is_err());
    }

    #[test]
    fn test_decimal_parse() {
        let d: Decimal = "78.326".parse().unwrap();
        assert_eq!(d.as_bigdecimal().to_string(), "78.326");
        assert!("seventy".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_plain_serializers_see_text() {
        let locator = Locator::parse("https://example.com").unwrap();
        assert_eq!(
            serde_json::to_string(&locator).unwrap(),
            "\"https://example.com\""
        );
        let ts = Timestamp::parse("2024-03-04T12:30:00Z").unwrap();
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"2024-03-04T12:30:00Z\""
        );
    }

    #[test]
    fn test_tokens_round_trip() {
        for token in [
            TIMESTAMP_TOKEN,
            LOCATOR_TOKEN,
            DECIMAL_TOKEN,
            NUMBER_TOKEN,
            RAW_STRING_TOKEN,
            VERBATIM_OBJECT_TOKEN,
        ] {
            assert!(Special::from_token(token).is_some());
        }
        assert_eq!(Special::from_token("Timestamp"), None);
    }
}
