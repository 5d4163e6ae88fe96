//! Key paths and key encoding.
//!
//! A [`KeyPath`] is the chain of field names and sequence indices leading
//! from the encoding root to the current position. Every builder owns its
//! own path; a child builder gets a copy extended by one segment, so siblings
//! never observe each other's segments.
//!
//! [`encode_key`] turns a path plus the segment being written into the key
//! bytes stored in the intermediate tree.
//!
//! ```rust
//! use serde_linecoder::key_path::{encode_key, KeyPath, KeyStyle, PathSegment};
//!
//! let path = KeyPath::root().child(PathSegment::field("sub"));
//! let key = encode_key(&path, &PathSegment::field("numeral"), b".", KeyStyle::Chained).unwrap();
//! assert_eq!(key, b"sub.numeral");
//! ```

use crate::{Error, Result};
use std::fmt;

/// One step of a key path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field or a map key, in its textual form.
    Field(String),
    /// A zero-based position inside a sequence.
    Index(usize),
}

impl PathSegment {
    /// Creates a field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    fn push_to(&self, out: &mut String) {
        match self {
            PathSegment::Field(name) => out.push_str(name),
            PathSegment::Index(index) => out.push_str(&index.to_string()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// How keys are derived from a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// The whole path from the root, joined with the key delimiter.
    #[default]
    Chained,
    /// Only the segment being written.
    Leaf,
}

/// Ordered segments from the encoding root to a position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyPath(Vec<PathSegment>);

impl KeyPath {
    /// The empty path of the encoding root.
    #[must_use]
    pub fn root() -> Self {
        KeyPath(Vec::new())
    }

    /// Returns a new path with `segment` appended. `self` is left untouched.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment);
        KeyPath(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for KeyPath {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
        KeyPath(iter.into_iter().collect())
    }
}

/// Computes the key for `segment` written below `ancestors`.
///
/// With [`KeyStyle::Chained`] the result is every ancestor segment followed
/// by `segment`, joined with `delimiter`. With [`KeyStyle::Leaf`] it is the
/// segment alone.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if `delimiter` is not valid UTF-8.
pub fn encode_key(
    ancestors: &KeyPath,
    segment: &PathSegment,
    delimiter: &[u8],
    style: KeyStyle,
) -> Result<Vec<u8>> {
    let separator = std::str::from_utf8(delimiter).map_err(|_| {
        Error::configuration(format!(
            "key delimiter {:?} cannot join key path `{}`",
            delimiter, ancestors
        ))
    })?;

    let mut key = String::new();
    if style == KeyStyle::Chained {
        for ancestor in &ancestors.0 {
            ancestor.push_to(&mut key);
            key.push_str(separator);
        }
    }
    segment.push_to(&mut key);
    Ok(key.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> KeyPath {
        segments.iter().map(|s| PathSegment::field(*s)).collect()
    }

    #[test]
    fn test_root_key_is_bare_segment() {
        let key = encode_key(
            &KeyPath::root(),
            &PathSegment::field("int"),
            b".",
            KeyStyle::Chained,
        )
        .unwrap();
        assert_eq!(key, b"int");
    }

    #[test]
    fn test_chained_key_joins_every_ancestor() {
        let ancestors = path(&["a", "b"]).child(PathSegment::Index(3));
        let key = encode_key(
            &ancestors,
            &PathSegment::field("c"),
            b"::",
            KeyStyle::Chained,
        )
        .unwrap();
        assert_eq!(key, b"a::b::3::c");
    }

    #[test]
    fn test_leaf_key_ignores_ancestors() {
        let key = encode_key(
            &path(&["a", "b"]),
            &PathSegment::field("c"),
            b".",
            KeyStyle::Leaf,
        )
        .unwrap();
        assert_eq!(key, b"c");
    }

    #[test]
    fn test_invalid_delimiter_is_configuration_error() {
        let err = encode_key(
            &path(&["a"]),
            &PathSegment::field("b"),
            &[0xff, 0xfe],
            KeyStyle::Chained,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = path(&["a"]);
        let child = parent.child(PathSegment::Index(0));
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.to_string(), "a.0");
        assert_eq!(KeyPath::root().to_string(), "(root)");
    }
}
