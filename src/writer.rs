//! Rendering of intermediate values.
//!
//! The [`Writer`] knows nothing about the walk that produced a [`Value`]; it
//! only applies the formatting knobs of [`EncoderOptions`]. One rule depends
//! on depth: a sequence at the root is written as one record per item, joined
//! with the object delimiter and without brackets, while every nested
//! sequence is bracketed and joined with the item delimiter.
//!
//! ```rust
//! use serde_linecoder::{line_value, EncoderOptions, Writer};
//!
//! let options = EncoderOptions::default();
//! let writer = Writer::new(&options);
//!
//! let records = line_value!([[67, 98], [9]]);
//! assert_eq!(writer.write(&records), b"[67,98]\n[9]");
//! ```

use crate::{EncoderOptions, Value, ValueMap};

/// Renders values with a fixed set of options.
#[derive(Clone, Copy, Debug)]
pub struct Writer<'a> {
    options: &'a EncoderOptions,
}

impl<'a> Writer<'a> {
    pub fn new(options: &'a EncoderOptions) -> Self {
        Writer { options }
    }

    /// Renders `value` into a new buffer.
    #[must_use]
    pub fn write(&self, value: &Value) -> Vec<u8> {
        let mut output = Vec::with_capacity(256);
        self.write_into(value, &mut output);
        output
    }

    /// Appends the rendering of `value` to `output`.
    pub fn write_into(&self, value: &Value, output: &mut Vec<u8>) {
        self.write_value(value, 0, output);
    }

    fn write_value(&self, value: &Value, depth: usize, output: &mut Vec<u8>) {
        let options = self.options;
        match value {
            Value::Null => output.extend_from_slice(&options.null_output),
            Value::Bool(true) => output.extend_from_slice(&options.true_output),
            Value::Bool(false) => output.extend_from_slice(&options.false_output),
            Value::String(bytes) | Value::Number(bytes) => output.extend_from_slice(bytes),
            Value::Array(elements) => self.write_array(elements, depth, output),
            Value::Object(entries) => self.write_object(entries, depth, output),
        }
    }

    fn write_array(&self, elements: &[Value], depth: usize, output: &mut Vec<u8>) {
        let options = self.options;
        let (prefix, suffix, delimiter) = if depth == 0 {
            (
                &options.empty_output,
                &options.empty_output,
                &options.object_delimiter,
            )
        } else {
            (
                &options.object_prefix,
                &options.object_suffix,
                &options.item_delimiter,
            )
        };

        output.extend_from_slice(prefix);
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                output.extend_from_slice(delimiter);
            }
            self.write_value(element, depth + 1, output);
        }
        output.extend_from_slice(suffix);
    }

    fn write_object(&self, entries: &ValueMap, depth: usize, output: &mut Vec<u8>) {
        let options = self.options;
        let mut ordered: Vec<(&Vec<u8>, &Value)> = if options.sort_keys {
            entries.sorted_entries(&options.key_order)
        } else {
            entries.iter().collect()
        };
        if options.omit_null_entries {
            ordered.retain(|(_, value)| !value.is_null());
        }

        output.extend_from_slice(&options.object_prefix);
        for (i, (key, value)) in ordered.into_iter().enumerate() {
            if i > 0 {
                output.extend_from_slice(&options.item_delimiter);
            }
            if options.include_keys && (options.show_keys_for_containers || value.is_scalar()) {
                output.extend_from_slice(key);
                output.extend_from_slice(&options.key_value_divider);
            }
            self.write_value(value, depth + 1, output);
        }
        output.extend_from_slice(&options.object_suffix);
    }
}
