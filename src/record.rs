//! Flat records: the items that cross the codec boundary.
//!
//! Both sides of the codec speak in [`Line`]s. The decoder consumes
//! [`Record`]s (`Line<Payload>`) and produces [`Event`]s (`Line<Value>`);
//! the encoder does the reverse. Besides keyed entries a line can be one of
//! two reserved sentinels:
//!
//! - [`Line::Skip`]: a no-op placeholder (e.g. a heartbeat from the record
//!   source), passed through untouched at the top level
//! - [`Line::End`]: the terminal marker closing exactly one nested block

use crate::Value;
use serde::{Deserialize, Serialize};

/// One item of a record stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Line<T> {
    /// No record; ignored by the codec.
    Skip,
    /// Terminal marker closing the innermost open block.
    End,
    /// A keyed item.
    Entry(String, T),
}

/// A raw record as read from, or written to, the physical format.
pub type Record = Line<Payload>;

/// A decoded item, or an item waiting to be encoded.
pub type Event = Line<Value>;

impl<T> Line<T> {
    /// Creates a keyed entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::{Line, Payload, Record};
    ///
    /// let record: Record = Line::entry("k1", "v1");
    /// assert_eq!(record, Line::Entry("k1".to_string(), Payload::Scalar(b"v1".to_vec())));
    /// ```
    pub fn entry(key: impl Into<String>, value: impl Into<T>) -> Self {
        Line::Entry(key.into(), value.into())
    }

    #[inline]
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self, Line::End)
    }

    #[inline]
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Line::Skip)
    }

    /// Returns the `(key, value)` pair of an entry, or `None` for sentinels.
    #[must_use]
    pub fn into_entry(self) -> Option<(String, T)> {
        match self {
            Line::Entry(key, value) => Some((key, value)),
            _ => None,
        }
    }
}

impl<T> From<(String, T)> for Line<T> {
    fn from((key, value): (String, T)) -> Self {
        Line::Entry(key, value)
    }
}

/// The payload of a raw record.
///
/// `Annotated` appears on the header record of a nested block (annotation
/// `tag>suffix`) or on a leaf that merely carries a label (no `>`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Scalar(Vec<u8>),
    Annotated { annotation: String, value: Vec<u8> },
}

impl Payload {
    /// Creates an annotated payload.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::Payload;
    ///
    /// let header = Payload::annotated("M>", "");
    /// assert_eq!(header.annotation(), Some("M>"));
    /// assert!(header.value().is_empty());
    /// ```
    pub fn annotated(annotation: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Payload::Annotated {
            annotation: annotation.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        match self {
            Payload::Scalar(_) => None,
            Payload::Annotated { annotation, .. } => Some(annotation),
        }
    }

    #[must_use]
    pub fn value(&self) -> &[u8] {
        match self {
            Payload::Scalar(value) | Payload::Annotated { value, .. } => value,
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Scalar(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Payload::Scalar(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(value: &[u8; N]) -> Self {
        Payload::Scalar(value.to_vec())
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Scalar(value.as_bytes().to_vec())
    }
}
