//! Configuration options for encoding.
//!
//! [`EncoderOptions`] carries every formatting knob of the writer, the key
//! path settings used by the builder and the [`ScalarStrategies`] table.
//! Options are read-only during an encode and cheap to clone, so one value
//! can be shared by many concurrent encodes.
//!
//! ## Examples
//!
//! ```rust
//! use serde_linecoder::{to_string_with_options, EncoderOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Sub { numeral: i32 }
//!
//! #[derive(Serialize)]
//! struct Data { int: i32, sub: Sub }
//!
//! let data = Data { int: 12, sub: Sub { numeral: 76 } };
//!
//! let options = EncoderOptions::new()
//!     .with_object_brackets("{", "}")
//!     .with_key_delimiter("/")
//!     .with_key_value_divider("=");
//! let out = to_string_with_options(&data, &options).unwrap();
//! assert_eq!(out, "{int=12,sub={sub/numeral=76}}");
//! ```

use crate::key_path::KeyStyle;
use crate::{Error, KeyOrder, Result, ScalarStrategies};

/// Configuration options for encoding.
///
/// | Field | Default |
/// |---|---|
/// | `object_prefix` / `object_suffix` | `[` / `]` |
/// | `object_delimiter` | `\n` |
/// | `item_delimiter` | `,` |
/// | `key_delimiter` | `.` |
/// | `key_value_divider` | `:` |
/// | `include_keys` | `true` |
/// | `show_keys_for_containers` | `true` |
/// | `sort_keys` | `true` |
/// | `key_order` | [`KeyOrder::natural`] |
/// | `index_keyed_arrays` | `true` |
/// | `key_style` | [`KeyStyle::Chained`] |
/// | `omit_null_entries` | `false` |
/// | `null_output` / `true_output` / `false_output` | `null` / `true` / `false` |
/// | `empty_output` | empty |
#[derive(Clone, Debug)]
pub struct EncoderOptions {
    /// Opens an object or a nested array.
    pub object_prefix: Vec<u8>,
    /// Closes an object or a nested array.
    pub object_suffix: Vec<u8>,
    /// Separates the records of a top-level sequence.
    pub object_delimiter: Vec<u8>,
    /// Separates the items inside brackets.
    pub item_delimiter: Vec<u8>,
    /// Joins key path segments.
    pub key_delimiter: Vec<u8>,
    pub key_value_divider: Vec<u8>,
    pub include_keys: bool,
    /// When `false`, only scalar-valued entries show their key.
    pub show_keys_for_containers: bool,
    pub sort_keys: bool,
    pub key_order: KeyOrder,
    /// Adds each sequence element's index to the key path of its contents.
    pub index_keyed_arrays: bool,
    pub key_style: KeyStyle,
    /// Drops object entries whose value is `Null` when writing.
    pub omit_null_entries: bool,
    pub null_output: Vec<u8>,
    pub true_output: Vec<u8>,
    pub false_output: Vec<u8>,
    /// Placed before and after a top-level sequence.
    pub empty_output: Vec<u8>,
    pub strategies: ScalarStrategies,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            object_prefix: b"[".to_vec(),
            object_suffix: b"]".to_vec(),
            object_delimiter: b"\n".to_vec(),
            item_delimiter: b",".to_vec(),
            key_delimiter: b".".to_vec(),
            key_value_divider: b":".to_vec(),
            include_keys: true,
            show_keys_for_containers: true,
            sort_keys: true,
            key_order: KeyOrder::natural(),
            index_keyed_arrays: true,
            key_style: KeyStyle::Chained,
            omit_null_entries: false,
            null_output: b"null".to_vec(),
            true_output: b"true".to_vec(),
            false_output: b"false".to_vec(),
            empty_output: Vec::new(),
            strategies: ScalarStrategies::default(),
        }
    }
}

impl EncoderOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_linecoder::EncoderOptions;
    ///
    /// let options = EncoderOptions::new();
    /// assert_eq!(options.key_delimiter, b".");
    /// assert!(options.sort_keys);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that the options can produce output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the key delimiter is not valid
    /// UTF-8, since keys are built as text.
    pub fn validate(&self) -> Result<()> {
        if std::str::from_utf8(&self.key_delimiter).is_err() {
            return Err(Error::configuration(format!(
                "key delimiter {:?} is not valid UTF-8",
                self.key_delimiter
            )));
        }
        Ok(())
    }

    /// Checks that every configured literal and delimiter is text, so the
    /// output can be returned as a `String`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the first knob whose bytes are
    /// not valid UTF-8.
    pub fn validate_text(&self) -> Result<()> {
        let knobs: [(&str, &[u8]); 10] = [
            ("object prefix", self.object_prefix.as_slice()),
            ("object suffix", self.object_suffix.as_slice()),
            ("object delimiter", self.object_delimiter.as_slice()),
            ("item delimiter", self.item_delimiter.as_slice()),
            ("key value divider", self.key_value_divider.as_slice()),
            ("null output", self.null_output.as_slice()),
            ("true output", self.true_output.as_slice()),
            ("false output", self.false_output.as_slice()),
            ("empty output", self.empty_output.as_slice()),
            ("key delimiter", self.key_delimiter.as_slice()),
        ];
        for (name, bytes) in knobs {
            if std::str::from_utf8(bytes).is_err() {
                return Err(Error::configuration(format!(
                    "{} {:?} is not valid UTF-8",
                    name, bytes
                )));
            }
        }
        Ok(())
    }

    /// Sets the bytes wrapping objects and nested arrays.
    #[must_use]
    pub fn with_object_brackets(
        mut self,
        prefix: impl Into<Vec<u8>>,
        suffix: impl Into<Vec<u8>>,
    ) -> Self {
        self.object_prefix = prefix.into();
        self.object_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_object_delimiter(mut self, delimiter: impl Into<Vec<u8>>) -> Self {
        self.object_delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_item_delimiter(mut self, delimiter: impl Into<Vec<u8>>) -> Self {
        self.item_delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_key_delimiter(mut self, delimiter: impl Into<Vec<u8>>) -> Self {
        self.key_delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_key_value_divider(mut self, divider: impl Into<Vec<u8>>) -> Self {
        self.key_value_divider = divider.into();
        self
    }

    #[must_use]
    pub fn with_include_keys(mut self, include: bool) -> Self {
        self.include_keys = include;
        self
    }

    /// # Examples
    ///
    /// ```rust
    /// use serde_linecoder::{to_string_with_options, EncoderOptions};
    /// use std::collections::BTreeMap;
    ///
    /// let mut inner = BTreeMap::new();
    /// inner.insert("x", 1);
    /// let mut outer = BTreeMap::new();
    /// outer.insert("p", inner);
    ///
    /// let options = EncoderOptions::new().with_show_keys_for_containers(false);
    /// assert_eq!(to_string_with_options(&outer, &options).unwrap(), "[[p.x:1]]");
    /// ```
    #[must_use]
    pub fn with_show_keys_for_containers(mut self, show: bool) -> Self {
        self.show_keys_for_containers = show;
        self
    }

    #[must_use]
    pub fn with_sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }

    #[must_use]
    pub fn with_key_order(mut self, order: KeyOrder) -> Self {
        self.key_order = order;
        self
    }

    #[must_use]
    pub fn with_index_keyed_arrays(mut self, enabled: bool) -> Self {
        self.index_keyed_arrays = enabled;
        self
    }

    #[must_use]
    pub fn with_key_style(mut self, style: KeyStyle) -> Self {
        self.key_style = style;
        self
    }

    #[must_use]
    pub fn with_omit_null_entries(mut self, omit: bool) -> Self {
        self.omit_null_entries = omit;
        self
    }

    /// Sets the literals written for `Null`, `true` and `false`.
    #[must_use]
    pub fn with_literals(
        mut self,
        null: impl Into<Vec<u8>>,
        true_output: impl Into<Vec<u8>>,
        false_output: impl Into<Vec<u8>>,
    ) -> Self {
        self.null_output = null.into();
        self.true_output = true_output.into();
        self.false_output = false_output.into();
        self
    }

    #[must_use]
    pub fn with_empty_output(mut self, empty: impl Into<Vec<u8>>) -> Self {
        self.empty_output = empty.into();
        self
    }

    #[must_use]
    pub fn with_strategies(mut self, strategies: ScalarStrategies) -> Self {
        self.strategies = strategies;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EncoderOptions::default();
        assert_eq!(options.object_prefix, b"[");
        assert_eq!(options.object_suffix, b"]");
        assert_eq!(options.object_delimiter, b"\n");
        assert_eq!(options.item_delimiter, b",");
        assert_eq!(options.key_value_divider, b":");
        assert!(options.include_keys);
        assert!(options.show_keys_for_containers);
        assert!(options.index_keyed_arrays);
        assert!(!options.omit_null_entries);
        assert_eq!(options.key_style, KeyStyle::Chained);
        assert!(options.empty_output.is_empty());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builders_chain() {
        let options = EncoderOptions::new()
            .with_literals("nil", "yes", "no")
            .with_sort_keys(false)
            .with_key_style(KeyStyle::Leaf)
            .with_item_delimiter("|");
        assert_eq!(options.null_output, b"nil");
        assert_eq!(options.true_output, b"yes");
        assert_eq!(options.false_output, b"no");
        assert!(!options.sort_keys);
        assert_eq!(options.key_style, KeyStyle::Leaf);
        assert_eq!(options.item_delimiter, b"|");
    }

    #[test]
    fn test_non_utf8_key_delimiter_rejected() {
        let options = EncoderOptions::new().with_key_delimiter(vec![0xc3, 0x28]);
        assert!(matches!(options.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_text_validation_names_the_knob() {
        assert!(EncoderOptions::default().validate_text().is_ok());

        let options = EncoderOptions::new().with_item_delimiter(vec![0xfe]);
        assert!(options.validate().is_ok());
        let err = options.validate_text().unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("item delimiter")));
    }

    #[test]
    fn test_options_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EncoderOptions>();
    }
}
