//! Decoded value representation.
//!
//! This module provides the [`Value`] enum, the tree that the decoder builds
//! out of a flat record stream and that the encoder flattens back.
//!
//! ## Core Types
//!
//! - [`Value`]: a scalar, an annotated leaf, a mapping, a sequence or a generic hierarchical value
//! - [`Hierarchical`]: the lossless representation of a block whose tag no decoder recognized
//! - [`ValueKind`]: the discriminant used by the registry for automatic type detection
//!
//! ## Usage Patterns
//!
//! ```rust
//! use hkvn::{hkvn, Hierarchical, Value};
//!
//! let scalar = Value::from(b"raw bytes");
//! let tree = hkvn!({ "name": "Alice", "roles": ["admin", "dev"] });
//! let unknown = Value::Hierarchical(Hierarchical::new("Point", "", vec![
//!     ("x".to_string(), Value::from("1")),
//!     ("y".to_string(), Value::from("2")),
//! ]));
//!
//! assert!(scalar.is_scalar());
//! assert!(tree.is_map());
//! assert_eq!(unknown.kind(), hkvn::ValueKind::Hierarchical);
//! ```

use crate::HkvnMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(key, value)` pair inside a nested block.
pub type Entry = (String, Value);

/// Any value the codec can decode or encode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Opaque leaf, passed through untouched.
    Scalar(Vec<u8>),
    /// Leaf carrying an annotation without `>`; it opens no block.
    Annotated { annotation: String, value: Vec<u8> },
    /// Built-in mapping (`Map` / `M`).
    Map(HkvnMap),
    /// Built-in sequence (`List` / `L`).
    List(Vec<Value>),
    /// Block with a tag that no decoder recognized.
    Hierarchical(Hierarchical),
}

/// Generic hierarchical value: `(annotation, scalar, children)`.
///
/// Produced by the generic fallback and written back verbatim by the
/// encoder, so unrecognized blocks survive a round trip unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchical {
    pub annotation: String,
    pub value: Vec<u8>,
    pub children: Vec<Entry>,
}

impl Hierarchical {
    pub fn new(
        annotation: impl Into<String>,
        value: impl Into<Vec<u8>>,
        children: Vec<Entry>,
    ) -> Self {
        Hierarchical {
            annotation: annotation.into(),
            value: value.into(),
            children,
        }
    }
}

/// Discriminant of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Annotated,
    Map,
    List,
    Hierarchical,
}

impl Value {
    /// Creates an annotated leaf.
    pub fn annotated(annotation: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Value::Annotated {
            annotation: annotation.into(),
            value: value.into(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Annotated { .. } => ValueKind::Annotated,
            Value::Map(_) => ValueKind::Map,
            Value::List(_) => ValueKind::List,
            Value::Hierarchical(_) => ValueKind::Hierarchical,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_hierarchical(&self) -> bool {
        matches!(self, Value::Hierarchical(_))
    }

    /// Returns the bytes of a scalar or annotated leaf.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::Value;
    ///
    /// assert_eq!(Value::from("v1").as_bytes(), Some(&b"v1"[..]));
    /// assert_eq!(Value::List(vec![]).as_bytes(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Scalar(value) | Value::Annotated { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns the scalar as UTF-8 text, if it is valid UTF-8.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&HkvnMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_hierarchical(&self) -> Option<&Hierarchical> {
        match self {
            Value::Hierarchical(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(b) => write!(f, "{:?}", String::from_utf8_lossy(b)),
            Value::Annotated { annotation, value } => {
                write!(f, "{}:{:?}", annotation, String::from_utf8_lossy(value))
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{:?}:{}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::List(list) => write!(
                f,
                "[{}]",
                list.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            Value::Hierarchical(h) => write!(
                f,
                "{}({:?})[{}]",
                h.annotation,
                String::from_utf8_lossy(&h.value),
                h.children.len()
            ),
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Scalar(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Scalar(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(value: &[u8; N]) -> Self {
        Value::Scalar(value.to_vec())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value.into_bytes())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<HkvnMap> for Value {
    fn from(value: HkvnMap) -> Self {
        Value::Map(value)
    }
}

impl From<Hierarchical> for Value {
    fn from(value: Hierarchical) -> Self {
        Value::Hierarchical(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from("v"), Value::Scalar(b"v".to_vec()));
        assert_eq!(Value::from(b"v"), Value::Scalar(b"v".to_vec()));
        assert_eq!(Value::from("v".to_string()), Value::Scalar(b"v".to_vec()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Scalar(vec![1, 2]));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::from("v").kind(), ValueKind::Scalar);
        assert_eq!(Value::annotated("a", "v").kind(), ValueKind::Annotated);
        assert_eq!(Value::from(HkvnMap::new()).kind(), ValueKind::Map);
        assert_eq!(Value::from(Vec::<Value>::new()).kind(), ValueKind::List);
        let h = Hierarchical::new("foo", "", vec![]);
        assert_eq!(Value::from(h).kind(), ValueKind::Hierarchical);
    }

    #[test]
    fn test_display() {
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(list.to_string(), "[\"a\",\"b\"]");

        let h = Value::Hierarchical(Hierarchical::new(
            "foo",
            "x",
            vec![("k".to_string(), Value::from("v"))],
        ));
        assert_eq!(h.to_string(), "foo(\"x\")[1]");
    }

    #[test]
    fn test_as_str_rejects_invalid_utf8() {
        let value = Value::Scalar(vec![0xff, 0xfe]);
        assert_eq!(value.as_str(), None);
        assert_eq!(value.as_bytes(), Some(&[0xff, 0xfe][..]));
    }
}
