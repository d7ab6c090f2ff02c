//! HKVN decoding.
//!
//! This module turns a flat stream of [`Record`]s into nested [`Value`]s.
//!
//! ## Overview
//!
//! - **Single cursor**: every recursion frame advances the same record iterator;
//!   nothing is buffered beyond the frame being decoded
//! - **Lazy**: [`Reader`] yields one top-level item per call to `next`
//! - **Balanced**: each nested block is pulled up to its terminal marker before
//!   the parent resumes, even when a decoder stops reading early
//!
//! ## Usage
//!
//! ```rust
//! use hkvn::de::read;
//! use hkvn::{Line, Payload, Record, Registry, Value};
//!
//! let records: Vec<Record> = vec![
//!     Line::entry("key", Payload::annotated("L>", "")),
//!     Line::entry("", "v1"),
//!     Line::entry("", "v2"),
//!     Line::End,
//!     Line::End,
//! ];
//!
//! let registry = Registry::new();
//! let events: Vec<_> = read(records, &registry).collect::<Result<_, _>>().unwrap();
//! assert_eq!(
//!     events,
//!     vec![Line::entry("key", vec![Value::from("v1"), Value::from("v2")])]
//! );
//! ```

use crate::registry::Fallback;
use crate::{Entry, Error, Event, Hierarchical, Line, Payload, Record, Registry, Result, Value};
use tracing::{debug, trace};

/// Reads one item from `records` at the depth identified by `prefix`.
///
/// Returns the decoded entry, or a sentinel ([`Line::Skip`], [`Line::End`])
/// as-is. Annotations without `>` are leaves and come back unchanged.
///
/// # Examples
///
/// ```rust
/// use hkvn::de::read_single;
/// use hkvn::{Line, Payload, Registry, Value};
///
/// let mut records = vec![Line::entry("key", Payload::annotated("anno", "value"))].into_iter();
/// let event = read_single(&mut records, &Registry::new(), "").unwrap();
/// assert_eq!(event, Line::entry("key", Value::annotated("anno", "value")));
/// ```
///
/// # Errors
///
/// - [`Error::UnterminatedBlock`] if the stream ends before an item or inside a nested block
/// - [`Error::PrefixMismatch`] if a key lacks the prefix of its depth
/// - any error raised by a decoder or the fallback
pub fn read_single<I>(records: &mut I, registry: &Registry, prefix: &str) -> Result<Event>
where
    I: Iterator<Item = Record>,
{
    read_line(records, registry, prefix)
}

/// Reads a whole block lazily, up to and excluding its terminal marker.
///
/// The top level of a stream is a block too: it ends with one [`Line::End`].
pub fn read<'a, I>(records: I, registry: &'a Registry) -> Reader<'a>
where
    I: IntoIterator<Item = Record>,
    I::IntoIter: 'a,
{
    Reader {
        records: Box::new(records.into_iter()),
        registry,
        prefix: String::new(),
        done: false,
    }
}

fn read_line(
    records: &mut dyn Iterator<Item = Record>,
    registry: &Registry,
    prefix: &str,
) -> Result<Event> {
    let (key, payload) = match records.next() {
        None => return Err(Error::unterminated(prefix)),
        Some(Line::Skip) => return Ok(Line::Skip),
        Some(Line::End) => return Ok(Line::End),
        Some(Line::Entry(key, payload)) => (key, payload),
    };

    let key = match key.strip_prefix(prefix) {
        Some(stripped) => stripped.to_string(),
        None => return Err(Error::prefix_mismatch(&key, prefix)),
    };

    let (annotation, scalar) = match payload {
        Payload::Scalar(value) => return Ok(Line::Entry(key, Value::Scalar(value))),
        Payload::Annotated { annotation, value } => (annotation, value),
    };

    let Some(split) = annotation.find('>') else {
        return Ok(Line::Entry(key, Value::Annotated { annotation, value: scalar }));
    };
    let tag = &annotation[..split];
    let child_prefix = format!("{}{}", prefix, &annotation[split + 1..]);

    trace!(tag, prefix = %child_prefix, "opening block");
    let mut block = Block::new(records, registry, child_prefix);
    let value = block.decode(tag, scalar)?;
    block.drain()?;
    trace!(tag, "closed block");

    Ok(Line::Entry(key, value))
}

/// The children of one nested block, read lazily from the shared cursor.
///
/// Handed to decoders as `&mut Block`. Iterating yields the block's entries
/// with their prefix stripped and nested values already decoded; skip
/// sentinels inside the block are dropped. Iteration ends at the block's
/// terminal marker. Whatever a decoder leaves unread is drained afterwards.
pub struct Block<'a> {
    records: &'a mut dyn Iterator<Item = Record>,
    registry: &'a Registry,
    prefix: String,
    finished: bool,
    error: Option<Error>,
}

impl<'a> Block<'a> {
    pub(crate) fn new(
        records: &'a mut dyn Iterator<Item = Record>,
        registry: &'a Registry,
        prefix: String,
    ) -> Self {
        Block {
            records,
            registry,
            prefix,
            finished: false,
            error: None,
        }
    }

    /// The prefix every key of this block carries on the wire.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` once the terminal marker has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished && self.error.is_none()
    }

    /// Consumes the remaining entries up to the terminal marker.
    ///
    /// # Errors
    ///
    /// Returns the first error met while reading the block, including one a
    /// decoder already observed and discarded.
    pub fn drain(&mut self) -> Result<()> {
        for entry in self.by_ref() {
            entry?;
        }
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn decode(&mut self, tag: &str, scalar: Vec<u8>) -> Result<Value> {
        let registry = self.registry;
        if let Some(decoder) = registry.decoder(tag) {
            return decoder(scalar, self);
        }

        match registry.fallback() {
            Fallback::Generic => {
                debug!(tag, "no decoder registered, keeping generic value");
                Ok(Value::Hierarchical(self.materialize(tag, scalar)?))
            }
            Fallback::Factory(factory) => factory(self.materialize(tag, scalar)?),
            Fallback::Decoder(decoder) => decoder(tag, scalar, self),
            Fallback::Reject => Err(Error::UnrecognizedAnnotation(tag.to_string())),
        }
    }

    fn materialize(&mut self, tag: &str, scalar: Vec<u8>) -> Result<Hierarchical> {
        let children = self.by_ref().collect::<Result<Vec<_>>>()?;
        Ok(Hierarchical::new(tag, scalar, children))
    }
}

impl Iterator for Block<'_> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match read_line(&mut *self.records, self.registry, &self.prefix) {
                Ok(Line::Skip) => continue,
                Ok(Line::End) => {
                    self.finished = true;
                    return None;
                }
                Ok(Line::Entry(key, value)) => return Some(Ok((key, value))),
                Err(err) => {
                    self.finished = true;
                    self.error = Some(err.clone());
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Lazy decoder over one block, created by [`read`].
///
/// Yields decoded entries and top-level [`Line::Skip`] sentinels; stops after
/// the block's terminal marker, which is not yielded, or after the first error.
pub struct Reader<'a> {
    records: Box<dyn Iterator<Item = Record> + 'a>,
    registry: &'a Registry,
    prefix: String,
    done: bool,
}

impl<'a> Reader<'a> {
    /// Sets the prefix expected on every key of this block.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Drops skip sentinels and yields `(key, value)` pairs only.
    pub fn entries(self) -> impl Iterator<Item = Result<Entry>> + 'a {
        self.filter_map(|event| match event {
            Ok(Line::Entry(key, value)) => Some(Ok((key, value))),
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        })
    }
}

impl Iterator for Reader<'_> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match read_line(&mut *self.records, self.registry, &self.prefix) {
            Ok(Line::End) => {
                self.done = true;
                None
            }
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
