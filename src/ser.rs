//! HKVN encoding.
//!
//! This module flattens nested [`Value`]s into a stream of [`Record`]s that
//! [`crate::de`] reads back into the same values.
//!
//! ## Overview
//!
//! For every value the writer resolves an annotation:
//!
//! - **Generic values** carry their own tag, scalar and children
//! - **Native values** (mappings, sequences, ...) get the tag registered for
//!   their [`ValueKind`](crate::ValueKind), an empty scalar, and themselves as children
//! - **Leaves** (scalars, annotated leaves) are written as-is
//!
//! A value with a tag becomes a header record `(key, ("tag>prefix", scalar))`,
//! followed by its children one level deeper and a terminal marker.
//!
//! ## Usage
//!
//! ```rust
//! use hkvn::ser::write;
//! use hkvn::{hkvn, Line, Payload, Registry};
//!
//! let registry = Registry::new();
//! let records: Vec<_> = write(vec![Line::entry("key", hkvn!(["v1", "v2"]))], &registry)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(records, vec![
//!     Line::entry("key", Payload::annotated("L>", "")),
//!     Line::entry("", "v1"),
//!     Line::entry("", "v2"),
//!     Line::End,
//!     Line::End,
//! ]);
//! ```

use crate::registry::Children;
use crate::{Error, Event, Line, Payload, Record, Registry, Result, Value};
use tracing::trace;

/// Writes one item and, for nested values, its whole block.
///
/// No terminal marker is appended for the item's own depth; the marker
/// closing a nested value's block is part of the output.
///
/// # Examples
///
/// ```rust
/// use hkvn::ser::write_single;
/// use hkvn::{Hierarchical, Line, Payload, Registry, Value};
///
/// let value = Hierarchical::new("annotation", "value", vec![("k1".to_string(), Value::from("v1"))]);
/// let registry = Registry::new();
/// let records: Vec<_> = write_single(Line::entry("key", value), &registry)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(records, vec![
///     Line::entry("key", Payload::annotated("annotation>", "value")),
///     Line::entry("k1", "v1"),
///     Line::End,
/// ]);
/// ```
pub fn write_single(event: Event, registry: &Registry) -> Writer<'_> {
    Writer {
        registry,
        prefix: String::new(),
        pending: Some(event),
        stack: Vec::new(),
        failed: false,
    }
}

/// Writes a whole block lazily and closes it with one terminal marker.
pub fn write<'a, I>(events: I, registry: &'a Registry) -> Writer<'a>
where
    I: IntoIterator<Item = Event>,
    I::IntoIter: 'a,
{
    Writer {
        registry,
        prefix: String::new(),
        pending: None,
        stack: vec![Frame {
            events: Box::new(events.into_iter()),
            key_prefix: String::new(),
        }],
        failed: false,
    }
}

struct Frame<'a> {
    events: Box<dyn Iterator<Item = Event> + 'a>,
    key_prefix: String,
}

/// How a value is laid out on the wire.
enum Shape {
    Leaf(Payload),
    Nested {
        tag: String,
        scalar: Vec<u8>,
        children: Children,
    },
    Orphan,
}

/// Lazy encoder created by [`write`] or [`write_single`].
///
/// Nested blocks are kept on an explicit stack of frames; each frame holds
/// the entries of one open block and the key prefix its records carry.
/// After the first error the writer yields nothing more.
pub struct Writer<'a> {
    registry: &'a Registry,
    prefix: String,
    pending: Option<Event>,
    stack: Vec<Frame<'a>>,
    failed: bool,
}

impl<'a> Writer<'a> {
    /// Sets the prefix increment appended to every annotation.
    ///
    /// Each nested block prepends one more copy of it to its keys, so the
    /// decoder can tell the records of a block from those of its parent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::ser::write;
    /// use hkvn::{hkvn, Line, Payload, Registry};
    ///
    /// let registry = Registry::new();
    /// let records: Vec<_> = write(vec![Line::entry("m", hkvn!({ "k": "v" }))], &registry)
    ///     .with_prefix(".")
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    ///
    /// assert_eq!(records[0], Line::entry("m", Payload::annotated("M>.", "")));
    /// assert_eq!(records[1], Line::entry(".k", "v"));
    /// ```
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn write_line(&mut self, event: Event, key_prefix: &str) -> Result<Record> {
        let (key, value) = match event {
            Line::Skip => return Ok(Line::Skip),
            Line::End => return Ok(Line::End),
            Line::Entry(key, value) => (key, value),
        };
        let key = format!("{}{}", key_prefix, key);

        let (tag, scalar, children) = match self.shape(value)? {
            Shape::Leaf(payload) => return Ok(Line::Entry(key, payload)),
            Shape::Orphan => return Err(Error::ChildrenWithoutAnnotation { key }),
            Shape::Nested {
                tag,
                scalar,
                children,
            } => (tag, scalar, children),
        };
        if tag.contains('>') {
            return Err(Error::InvalidTag(tag));
        }

        let header = Payload::Annotated {
            annotation: format!("{}>{}", tag, self.prefix),
            value: scalar.clone(),
        };
        let registry = self.registry;
        let entries = match (registry.encoder(&tag), registry.encode_fallback()) {
            (Some(encoder), _) | (None, Some(encoder)) => encoder(scalar, children)?,
            (None, None) => children.into_entries(&tag)?,
        };

        let child_prefix = format!("{}{}", key_prefix, self.prefix);
        trace!(tag = %tag, prefix = %child_prefix, entries = entries.len(), "opening block");
        self.stack.push(Frame {
            events: Box::new(entries.into_iter().map(|(key, value)| Line::Entry(key, value))),
            key_prefix: child_prefix,
        });

        Ok(Line::Entry(key, header))
    }

    fn shape(&self, value: Value) -> Result<Shape> {
        let value = match value {
            Value::Hierarchical(h) => {
                return Ok(Shape::Nested {
                    tag: h.annotation,
                    scalar: h.value,
                    children: Children::Entries(h.children),
                })
            }
            // A leaf annotation with '>' would read back as a block header.
            Value::Annotated { annotation, .. } if annotation.contains('>') => {
                return Err(Error::InvalidTag(annotation))
            }
            Value::Annotated { annotation, value } => {
                return Ok(Shape::Leaf(Payload::Annotated { annotation, value }))
            }
            other => other,
        };

        if let Some(tag) = self.registry.tag_for(value.kind()) {
            return Ok(Shape::Nested {
                tag: tag.to_string(),
                scalar: Vec::new(),
                children: Children::Value(value),
            });
        }

        Ok(match value {
            Value::Scalar(bytes) => Shape::Leaf(Payload::Scalar(bytes)),
            _ => Shape::Orphan,
        })
    }
}

impl Iterator for Writer<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let (event, key_prefix) = match self.pending.take() {
            Some(event) => (event, String::new()),
            None => {
                let frame = self.stack.last_mut()?;
                match frame.events.next() {
                    Some(event) => (event, frame.key_prefix.clone()),
                    None => {
                        self.stack.pop();
                        trace!(depth = self.stack.len(), "closed block");
                        return Some(Ok(Line::End));
                    }
                }
            }
        };

        match self.write_line(event, &key_prefix) {
            Ok(record) => Some(Ok(record)),
            Err(err) => {
                self.failed = true;
                self.stack.clear();
                Some(Err(err))
            }
        }
    }
}
