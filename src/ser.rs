//! The tree builder.
//!
//! [`Encoder`] walks a value through serde's data model and accumulates one
//! intermediate [`Value`]. Serde's three families of calls map onto the three
//! container shapes:
//!
//! - scalar `serialize_*` calls install a single value,
//! - `serialize_seq` and the tuple forms open an indexed sink,
//! - `serialize_map` and `serialize_struct` open a keyed sink.
//!
//! Every field or element is built by a freshly spawned child encoder that
//! carries the parent's key path plus one segment and owns its own
//! accumulator. The finished child value is inserted into the parent under
//! the fully qualified key.
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use serde_linecoder::{Encoder, EncoderOptions, Value};
//! use serde::Serialize;
//!
//! let options = EncoderOptions::new();
//! let mut encoder = Encoder::new(&options);
//!
//! vec![1, 2, 3].serialize(&mut encoder).unwrap();
//!
//! let value = encoder.finish().unwrap();
//! assert_eq!(value.as_array().map(Vec::len), Some(3));
//! ```

use crate::key_path::{encode_key, KeyPath, PathSegment};
use crate::special::{Decimal, Special, Timestamp};
use crate::strategy::{Float, Integer};
use crate::{EncoderOptions, Error, Result, Value, ValueMap};
use serde::ser::{self, Impossible, Serialize};
use std::fmt;
use tracing::trace;

/// The container shape a builder has committed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Single,
    Indexed,
    Keyed,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Single => "a single value",
            Shape::Indexed => "an indexed sequence",
            Shape::Keyed => "a keyed record",
        })
    }
}

/// The per-builder store. Its shape is fixed by the first write.
///
/// ```rust
/// use serde_linecoder::{Accumulator, Error, Shape, Value};
///
/// let mut data = Accumulator::new();
/// data.append(Value::from(1)).unwrap();
///
/// let err = data.insert(b"key".to_vec(), Value::Null).unwrap_err();
/// assert!(matches!(
///     err,
///     Error::ShapeConflict { existing: Shape::Indexed, attempted: Shape::Keyed, .. }
/// ));
/// ```
#[derive(Debug, Default)]
pub enum Accumulator {
    #[default]
    Empty,
    Single(Value),
    Array(Vec<Value>),
    Object(ValueMap),
}

impl Accumulator {
    #[must_use]
    pub fn new() -> Self {
        Accumulator::Empty
    }

    /// The committed shape, or `None` while nothing was written.
    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Accumulator::Empty => None,
            Accumulator::Single(_) => Some(Shape::Single),
            Accumulator::Array(_) => Some(Shape::Indexed),
            Accumulator::Object(_) => Some(Shape::Keyed),
        }
    }

    fn conflict(&self, attempted: Shape) -> Error {
        match self.shape() {
            Some(existing) => Error::shape_conflict(existing, attempted),
            None => Error::shape_conflict(attempted, attempted),
        }
    }

    /// Installs the sole value. Only valid on an empty accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeConflict`] if anything was written before,
    /// including an earlier single value.
    pub fn update(&mut self, value: Value) -> Result<()> {
        match self {
            Accumulator::Empty => {
                *self = Accumulator::Single(value);
                Ok(())
            }
            _ => Err(self.conflict(Shape::Single)),
        }
    }

    /// Commits to the indexed shape without adding an element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeConflict`] if the accumulator holds another shape.
    pub fn begin_indexed(&mut self) -> Result<()> {
        match self {
            Accumulator::Empty => {
                *self = Accumulator::Array(Vec::new());
                Ok(())
            }
            Accumulator::Array(_) => Ok(()),
            _ => Err(self.conflict(Shape::Indexed)),
        }
    }

    /// Appends an element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeConflict`] if the accumulator holds another shape.
    pub fn append(&mut self, value: Value) -> Result<()> {
        self.begin_indexed()?;
        if let Accumulator::Array(elements) = self {
            elements.push(value);
        }
        Ok(())
    }

    /// Commits to the keyed shape without adding an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeConflict`] if the accumulator holds another shape.
    pub fn begin_keyed(&mut self) -> Result<()> {
        match self {
            Accumulator::Empty => {
                *self = Accumulator::Object(ValueMap::new());
                Ok(())
            }
            Accumulator::Object(_) => Ok(()),
            _ => Err(self.conflict(Shape::Keyed)),
        }
    }

    /// Inserts an entry under an already qualified key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeConflict`] if the accumulator holds another shape.
    pub fn insert(&mut self, key: Vec<u8>, value: Value) -> Result<()> {
        self.begin_keyed()?;
        if let Accumulator::Object(entries) = self {
            entries.insert(key, value);
        }
        Ok(())
    }

    /// The accumulated value, or `None` if nothing was written.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Accumulator::Empty => None,
            Accumulator::Single(value) => Some(value),
            Accumulator::Array(elements) => Some(Value::Array(elements)),
            Accumulator::Object(entries) => Some(Value::Object(entries)),
        }
    }
}

/// Builds one intermediate [`Value`] from a value visiting it.
///
/// Created via [`Encoder::new`] for the root; nested fields and elements are
/// built by child encoders the encoder spawns itself.
pub struct Encoder<'a> {
    options: &'a EncoderOptions,
    path: KeyPath,
    data: Accumulator,
    special: Option<Special>,
}

impl<'a> Encoder<'a> {
    /// Creates a root encoder with an empty key path.
    pub fn new(options: &'a EncoderOptions) -> Self {
        Encoder {
            options,
            path: KeyPath::root(),
            data: Accumulator::new(),
            special: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        self.data.shape()
    }

    /// Installs an already built value as this encoder's sole content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeConflict`] if the encoder already holds content.
    pub fn build_single(&mut self, value: Value) -> Result<()> {
        self.data.update(value).map_err(|e| e.at(&self.path))
    }

    /// Returns the accumulated value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyEncode`] if nothing was encoded.
    pub fn finish(self) -> Result<Value> {
        self.data.into_value().ok_or(Error::EmptyEncode)
    }

    fn spawn(&self, segment: Option<PathSegment>) -> Encoder<'a> {
        let path = match segment {
            Some(segment) => self.path.child(segment),
            None => self.path.clone(),
        };
        trace!(path = %path, "spawning child encoder");
        Encoder {
            options: self.options,
            path,
            data: Accumulator::new(),
            special: None,
        }
    }

    /// A child that wrote nothing cannot be placed in its parent.
    fn into_built(self) -> Result<Value> {
        match self.data.into_value() {
            Some(value) => Ok(value),
            None => Err(Error::unencodable("empty value", "nothing was encoded").at(&self.path)),
        }
    }

    fn key_for(&self, segment: &PathSegment) -> Result<Vec<u8>> {
        encode_key(
            &self.path,
            segment,
            &self.options.key_delimiter,
            self.options.key_style,
        )
    }

    fn install(&mut self, converted: Result<Value>) -> Result<()> {
        let value = converted.map_err(|e| e.at(&self.path))?;
        self.build_single(value)
    }

    fn insert(&mut self, key: Vec<u8>, value: Value) -> Result<()> {
        self.data.insert(key, value).map_err(|e| e.at(&self.path))
    }

    fn encode_field<T>(&mut self, segment: PathSegment, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.key_for(&segment)?;
        let mut child = self.spawn(Some(segment));
        value.serialize(&mut child)?;
        let built = child.into_built()?;
        self.insert(key, built)
    }

    fn encode_verbatim<T>(&mut self, key: Vec<u8>, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let segment = PathSegment::field(String::from_utf8_lossy(&key));
        let mut child = self.spawn(Some(segment));
        value.serialize(&mut child)?;
        let built = child.into_built()?;
        self.insert(key, built)
    }

    fn encode_element<T>(&mut self, index: usize, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let segment = self
            .options
            .index_keyed_arrays
            .then_some(PathSegment::Index(index));
        let mut child = self.spawn(segment);
        value.serialize(&mut child)?;
        let built = child.into_built()?;
        self.data.append(built).map_err(|e| e.at(&self.path))
    }

    fn begin_indexed(&mut self) -> Result<()> {
        self.special = None;
        self.data.begin_indexed().map_err(|e| e.at(&self.path))
    }

    fn begin_keyed(&mut self) -> Result<()> {
        self.data.begin_keyed().map_err(|e| e.at(&self.path))
    }

    fn encode_integer(&mut self, value: Integer) -> Result<()> {
        let converted = (self.options.strategies.integer)(value);
        self.install(converted)
    }

    fn encode_float(&mut self, value: Float) -> Result<()> {
        let converted = (self.options.strategies.float)(value);
        self.install(converted)
    }

    fn begin_variant(&mut self, variant: &'static str) -> Result<(Vec<u8>, Encoder<'a>)> {
        self.begin_keyed()?;
        let segment = PathSegment::field(variant);
        let key = self.key_for(&segment)?;
        Ok((key, self.spawn(Some(segment))))
    }
}

impl<'a, 'b> ser::Serializer for &'b mut Encoder<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = IndexedSink<'a, 'b>;
    type SerializeTuple = IndexedSink<'a, 'b>;
    type SerializeTupleStruct = IndexedSink<'a, 'b>;
    type SerializeTupleVariant = VariantSink<'a, 'b>;
    type SerializeMap = KeyedSink<'a, 'b>;
    type SerializeStruct = KeyedSink<'a, 'b>;
    type SerializeStructVariant = VariantSink<'a, 'b>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        let converted = match self.special.take() {
            Some(Special::Bool) => Ok(Value::Bool(v)),
            _ => (self.options.strategies.boolean)(v),
        };
        self.install(converted)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.encode_integer(Integer::Signed(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.encode_integer(Integer::Signed(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.encode_integer(Integer::Signed(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.encode_integer(Integer::Signed(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.encode_integer(Integer::Signed(v))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.encode_integer(Integer::Unsigned(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.encode_integer(Integer::Unsigned(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.encode_integer(Integer::Unsigned(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.encode_integer(Integer::Unsigned(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.encode_integer(Integer::Unsigned(v))
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.encode_float(Float::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.encode_float(Float::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        let strategies = &self.options.strategies;
        let converted = match self.special.take() {
            Some(Special::Timestamp) => {
                let timestamp = Timestamp::parse(v).map_err(|e| e.at(&self.path))?;
                (strategies.timestamp)(timestamp.as_datetime())
            }
            Some(Special::Locator) => (strategies.locator)(v),
            Some(Special::Decimal) => {
                let decimal = v.parse::<Decimal>().map_err(|e| e.at(&self.path))?;
                (strategies.decimal)(decimal.as_bigdecimal())
            }
            Some(Special::Number) => Ok(Value::Number(v.as_bytes().to_vec())),
            Some(Special::RawString) => Ok(Value::String(v.as_bytes().to_vec())),
            Some(Special::Bool | Special::VerbatimObject) | None => (strategies.string)(v),
        };
        self.install(converted)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        let converted = match self.special.take() {
            Some(Special::RawString) => Ok(Value::String(v.to_vec())),
            Some(Special::Number) => Ok(Value::Number(v.to_vec())),
            _ => (self.options.strategies.blob)(v),
        };
        self.install(converted)
    }

    fn serialize_none(self) -> Result<()> {
        self.build_single(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.build_single(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        let converted = (self.options.strategies.string)(variant);
        self.install(converted)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.special = Special::from_token(name);
        let result = value.serialize(&mut *self);
        self.special = None;
        result
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.begin_keyed()?;
        self.encode_field(PathSegment::field(variant), value)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.begin_indexed()?;
        Ok(IndexedSink {
            encoder: self,
            index: 0,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        let (key, mut child) = self.begin_variant(variant)?;
        child.begin_indexed()?;
        Ok(VariantSink {
            parent: self,
            key,
            child,
            index: 0,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        let verbatim = self.special.take() == Some(Special::VerbatimObject);
        self.begin_keyed()?;
        Ok(KeyedSink {
            encoder: self,
            pending: None,
            verbatim,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        let (key, mut child) = self.begin_variant(variant)?;
        child.begin_keyed()?;
        Ok(VariantSink {
            parent: self,
            key,
            child,
            index: 0,
        })
    }
}

/// Indexed sink for sequences and tuples.
pub struct IndexedSink<'a, 'b> {
    encoder: &'b mut Encoder<'a>,
    index: usize,
}

impl IndexedSink<'_, '_> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.encoder.encode_element(self.index, value)?;
        self.index += 1;
        Ok(())
    }
}

impl ser::SerializeSeq for IndexedSink<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for IndexedSink<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for IndexedSink<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Keyed sink for maps and structs.
///
/// Entries of a `Value::Object` fed back into the encoder keep their keys
/// verbatim instead of being qualified again.
pub struct KeyedSink<'a, 'b> {
    encoder: &'b mut Encoder<'a>,
    pending: Option<MapKey>,
    verbatim: bool,
}

impl ser::SerializeMap for KeyedSink<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = key
            .serialize(KeySerializer {
                verbatim: self.verbatim,
            })
            .map_err(|e| e.at(&self.encoder.path))?;
        self.pending = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("map value serialized before its key"))?;
        match key {
            MapKey::Raw(bytes) => self.encoder.encode_verbatim(bytes, value),
            MapKey::Segment(segment) if self.verbatim => self
                .encoder
                .encode_verbatim(segment.to_string().into_bytes(), value),
            MapKey::Segment(segment) => self.encoder.encode_field(segment, value),
        }
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for KeyedSink<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.encoder.encode_field(PathSegment::field(key), value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Sink for tuple and struct variants. The payload is built by a child
/// encoder and lands in the parent under the variant's key.
pub struct VariantSink<'a, 'b> {
    parent: &'b mut Encoder<'a>,
    key: Vec<u8>,
    child: Encoder<'a>,
    index: usize,
}

impl VariantSink<'_, '_> {
    fn finish(self) -> Result<()> {
        let value = self.child.into_built()?;
        self.parent.insert(self.key, value)
    }
}

impl ser::SerializeTupleVariant for VariantSink<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.child.encode_element(self.index, value)?;
        self.index += 1;
        Ok(())
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for VariantSink<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.child.encode_field(PathSegment::field(key), value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// A map key as the keyed sink receives it.
enum MapKey {
    Segment(PathSegment),
    /// Key bytes of a reinstalled object that are not UTF-8.
    Raw(Vec<u8>),
}

impl MapKey {
    fn field(name: impl Into<String>) -> Self {
        MapKey::Segment(PathSegment::field(name))
    }
}

/// Turns a map key into a path segment. Only scalar keys are accepted; raw
/// byte keys only when reinstalling an object.
struct KeySerializer {
    verbatim: bool,
}

fn key_must_be_scalar(kind: &str) -> Error {
    Error::unencodable(kind, "map keys must be scalars")
}

impl ser::Serializer for KeySerializer {
    type Ok = MapKey;
    type Error = Error;

    type SerializeSeq = Impossible<MapKey, Error>;
    type SerializeTuple = Impossible<MapKey, Error>;
    type SerializeTupleStruct = Impossible<MapKey, Error>;
    type SerializeTupleVariant = Impossible<MapKey, Error>;
    type SerializeMap = Impossible<MapKey, Error>;
    type SerializeStruct = Impossible<MapKey, Error>;
    type SerializeStructVariant = Impossible<MapKey, Error>;

    fn serialize_bool(self, v: bool) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<MapKey> {
        Ok(MapKey::field(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<MapKey> {
        Ok(MapKey::field(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<MapKey> {
        if self.verbatim {
            Ok(MapKey::Raw(v.to_vec()))
        } else {
            Err(key_must_be_scalar("bytes"))
        }
    }

    fn serialize_none(self) -> Result<MapKey> {
        Err(key_must_be_scalar("none"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<MapKey>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<MapKey> {
        Err(key_must_be_scalar("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<MapKey> {
        Err(key_must_be_scalar(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<MapKey> {
        Ok(MapKey::field(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<MapKey>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<MapKey>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_scalar(variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_scalar("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_scalar("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_scalar(name))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_scalar(variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_scalar("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_scalar(name))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_scalar(variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_path::KeyStyle;
    use serde::Serialize;
    use std::collections::BTreeMap;

    fn build<T: Serialize + ?Sized>(value: &T, options: &EncoderOptions) -> Result<Value> {
        let mut encoder = Encoder::new(options);
        value.serialize(&mut encoder)?;
        encoder.finish()
    }

    fn keys(value: &Value) -> Vec<String> {
        value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| String::from_utf8_lossy(k).into_owned())
            .collect()
    }

    #[derive(Serialize)]
    struct Inner {
        numeral: i32,
        string: &'static str,
    }

    #[derive(Serialize)]
    struct Outer {
        int: i32,
        sub: Inner,
    }

    #[test]
    fn test_accumulator_second_update_conflicts() {
        let mut data = Accumulator::new();
        data.update(Value::from(1)).unwrap();
        let err = data.update(Value::from(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeConflict {
                existing: Shape::Single,
                attempted: Shape::Single,
                ..
            }
        ));
    }

    #[test]
    fn test_accumulator_same_shape_reopens() {
        let mut data = Accumulator::new();
        data.begin_keyed().unwrap();
        data.insert(b"a".to_vec(), Value::Null).unwrap();
        data.begin_keyed().unwrap();
        assert_eq!(data.shape(), Some(Shape::Keyed));
        assert!(data.append(Value::Null).is_err());
    }

    #[test]
    fn test_empty_encoder_fails() {
        let options = EncoderOptions::default();
        let encoder = Encoder::new(&options);
        assert!(matches!(encoder.finish(), Err(Error::EmptyEncode)));
    }

    #[test]
    fn test_reusing_encoder_with_other_shape_conflicts() {
        let options = EncoderOptions::default();
        let mut encoder = Encoder::new(&options);
        5.serialize(&mut encoder).unwrap();
        let err = vec![1].serialize(&mut encoder).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeConflict {
                existing: Shape::Single,
                attempted: Shape::Indexed,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_keys_are_qualified() {
        let value = build(
            &Outer {
                int: 12,
                sub: Inner {
                    numeral: 76,
                    string: "world",
                },
            },
            &EncoderOptions::default(),
        )
        .unwrap();
        assert_eq!(keys(&value), vec!["int", "sub"]);
        let sub = value.as_object().unwrap().get("sub").unwrap();
        assert_eq!(keys(sub), vec!["sub.numeral", "sub.string"]);
    }

    #[test]
    fn test_leaf_style_keeps_own_segment() {
        let options = EncoderOptions::default().with_key_style(KeyStyle::Leaf);
        let value = build(
            &Outer {
                int: 1,
                sub: Inner {
                    numeral: 2,
                    string: "x",
                },
            },
            &options,
        )
        .unwrap();
        let sub = value.as_object().unwrap().get("sub").unwrap();
        assert_eq!(keys(sub), vec!["numeral", "string"]);
    }

    #[test]
    fn test_index_segments_follow_option() {
        let items = vec![Inner {
            numeral: 1,
            string: "a",
        }];
        let indexed = build(&items, &EncoderOptions::default()).unwrap();
        assert_eq!(keys(&indexed.as_array().unwrap()[0]), vec!["0.numeral", "0.string"]);

        let options = EncoderOptions::default().with_index_keyed_arrays(false);
        let plain = build(&items, &options).unwrap();
        assert_eq!(keys(&plain.as_array().unwrap()[0]), vec!["numeral", "string"]);
    }

    #[test]
    fn test_error_carries_field_path() {
        #[derive(Serialize)]
        struct Reading {
            value: f64,
        }
        #[derive(Serialize)]
        struct Station {
            readings: Vec<Reading>,
        }

        let station = Station {
            readings: vec![Reading { value: 1.0 }, Reading { value: f64::NAN }],
        };
        let err = build(&station, &EncoderOptions::default()).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "readings.1.value");
    }

    #[test]
    fn test_enum_payloads_are_tagged() {
        #[derive(Serialize)]
        enum Event {
            Ping,
            Moved(i32),
            Resized { w: u32 },
            Pair(u8, u8),
        }

        assert_eq!(
            build(&Event::Ping, &EncoderOptions::default()).unwrap(),
            Value::string("Ping")
        );

        let moved = build(&Event::Moved(3), &EncoderOptions::default()).unwrap();
        assert_eq!(keys(&moved), vec!["Moved"]);

        let resized = build(&Event::Resized { w: 4 }, &EncoderOptions::default()).unwrap();
        let payload = resized.as_object().unwrap().get("Resized").unwrap();
        assert_eq!(keys(payload), vec!["Resized.w"]);

        let pair = build(&Event::Pair(1, 2), &EncoderOptions::default()).unwrap();
        let payload = pair.as_object().unwrap().get("Pair").unwrap();
        assert_eq!(payload.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_map_keys_must_be_scalar() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8, 2], "x");
        let err = build(&map, &EncoderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnencodableValue { .. }));
    }

    #[test]
    fn test_malformed_timestamp_is_unencodable() {
        struct Bogus;
        impl Serialize for Bogus {
            fn serialize<S: ser::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_newtype_struct(crate::special::TIMESTAMP_TOKEN, "yesterday")
            }
        }

        let mut record = BTreeMap::new();
        record.insert("at", Bogus);
        let err = build(&record, &EncoderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnencodableValue { .. }));
        assert_eq!(err.path().unwrap().to_string(), "at");
    }

    #[test]
    fn test_value_installs_verbatim() {
        let mut entries = ValueMap::new();
        entries.insert("already.qualified", Value::number("1.50"));
        entries.insert("raw", Value::String(vec![0xff]));
        let original = Value::Object(entries);

        let rebuilt = build(&original, &EncoderOptions::default()).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_reinstalled_bool_skips_strategy() {
        let strategies = crate::ScalarStrategies::default()
            .with_boolean(|b| Ok(Value::number(if b { "1" } else { "0" })));
        let options = EncoderOptions::default().with_strategies(strategies);

        assert_eq!(build(&true, &options).unwrap(), Value::number("1"));
        assert_eq!(build(&Value::Bool(true), &options).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_reinstalled_bytes_are_not_replaced() {
        let number = Value::Number(vec![0xff, b'1']);
        assert_eq!(build(&number, &EncoderOptions::default()).unwrap(), number);

        let mut entries = ValueMap::new();
        entries.insert(vec![0xff, b'k'], Value::from(1));
        entries.insert("plain", Value::from(2));
        let object = Value::Object(entries);
        assert_eq!(build(&object, &EncoderOptions::default()).unwrap(), object);
    }

    #[test]
    fn test_byte_keys_only_accepted_when_reinstalling() {
        struct ByteKey;
        impl Serialize for ByteKey {
            fn serialize<S: ser::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_bytes(b"k")
            }
        }

        struct ByteKeyed;
        impl Serialize for ByteKeyed {
            fn serialize<S: ser::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                use serde::ser::SerializeMap;
                let mut map = s.serialize_map(Some(1))?;
                map.serialize_entry(&ByteKey, &1)?;
                map.end()
            }
        }

        let err = build(&ByteKeyed, &EncoderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnencodableValue { .. }));
    }

    #[test]
    fn test_child_without_content_is_unencodable() {
        let options = EncoderOptions::default();
        let encoder = Encoder::new(&options);
        let child = encoder.spawn(Some(PathSegment::field("missing")));
        let err = child.into_built().unwrap_err();
        assert!(matches!(err, Error::UnencodableValue { .. }));
        assert_eq!(err.path().unwrap().to_string(), "missing");
    }
}
