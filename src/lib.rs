//! # hkvn
//!
//! A codec for hierarchical key-value notation (HKVN).
//!
//! ## What is HKVN?
//!
//! HKVN carries nested trees over a flat stream of `(key, payload)` records.
//! The wire format has no brackets: a record whose payload carries an
//! annotation of the form `tag>suffix` opens a nested block, the block's
//! records follow with their keys prefixed by the accumulated suffixes, and
//! a terminal marker closes it.
//!
//! ```text
//! key   M>        <- header: tag "M" (mapping), suffix ""
//! k1    v1
//! k2    v2
//! <end>           <- closes the mapping
//! <end>           <- closes the top-level block
//! ```
//!
//! This crate is the decode/encode engine only. Splitting a physical line
//! format into records, and storing or transporting them, is left to the
//! caller: the codec consumes and produces [`Record`]s.
//!
//! ## Key Features
//!
//! - **Lazy**: [`de::Reader`] and [`ser::Writer`] are iterators that advance
//!   the underlying stream only as far as the caller pulls
//! - **Extensible**: a [`Registry`] maps alias-sets of tags to decoders and encoders
//! - **Lossless**: blocks with unrecognized tags decode to [`Hierarchical`]
//!   values that encode back to identical records
//! - **Built-ins**: mappings (`Map`/`M`) and sequences (`List`/`L`)
//!
//! ## Quick Start
//!
//! ```rust
//! use hkvn::{decode, encode, hkvn};
//!
//! let tree = hkvn!({ "k1": "v1", "list": ["a", "b"] });
//!
//! let records = encode(vec![("key".to_string(), tree.clone())]).unwrap();
//! let decoded = decode(records).unwrap();
//!
//! assert_eq!(decoded, vec![("key".to_string(), tree)]);
//! ```
//!
//! ### Custom annotations
//!
//! ```rust
//! use hkvn::{decode_with, Error, Line, Payload, Record, Registry, Value};
//!
//! let registry = Registry::new().with_decoder(["Count", "C"], |_, children| {
//!     let n = children.collect::<Result<Vec<_>, Error>>()?.len();
//!     Ok(Value::from(n.to_string()))
//! });
//!
//! let records: Vec<Record> = vec![
//!     Line::entry("n", Payload::annotated("C>", "")),
//!     Line::entry("a", "1"),
//!     Line::entry("b", "2"),
//!     Line::End,
//!     Line::End,
//! ];
//!
//! let decoded = decode_with(records, &registry).unwrap();
//! assert_eq!(decoded, vec![("n".to_string(), Value::from("2"))]);
//! ```
//!
//! ## Logging
//!
//! Block boundaries are reported as `trace` events and generic fallbacks as
//! `debug` events through [`tracing`]; install any subscriber to see them.

pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod record;
pub mod registry;
pub mod ser;
pub mod value;

pub use de::{Block, Reader};
pub use error::{Error, Result};
pub use map::HkvnMap;
pub use record::{Event, Line, Payload, Record};
pub use registry::{AliasSet, Children, Fallback, Registry};
pub use ser::Writer;
pub use value::{Entry, Hierarchical, Value, ValueKind};

/// Decode one top-level block with the built-in registry.
///
/// Skip sentinels are dropped; the stream must end the block with a
/// terminal marker.
///
/// # Examples
///
/// ```rust
/// use hkvn::{decode, hkvn, Line, Payload, Record};
///
/// let records: Vec<Record> = vec![
///     Line::entry("key", Payload::annotated("Map>", "")),
///     Line::entry("k1", "v1"),
///     Line::entry("k2", "v2"),
///     Line::End,
///     Line::End,
/// ];
///
/// let decoded = decode(records).unwrap();
/// assert_eq!(decoded, vec![("key".to_string(), hkvn!({ "k1": "v1", "k2": "v2" }))]);
/// ```
///
/// # Errors
///
/// Returns the first structural error met in the stream.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode<I>(records: I) -> Result<Vec<Entry>>
where
    I: IntoIterator<Item = Record>,
{
    decode_with(records, &Registry::default())
}

/// Decode one top-level block with a custom registry.
///
/// # Errors
///
/// Returns the first structural error met in the stream, or the first error
/// raised by a decoder.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_with<I>(records: I, registry: &Registry) -> Result<Vec<Entry>>
where
    I: IntoIterator<Item = Record>,
{
    de::read(records, registry).entries().collect()
}

/// Encode entries as one top-level block with the built-in registry.
///
/// The output ends with the terminal marker of the top-level block.
///
/// # Errors
///
/// Returns an error if a value cannot be expressed (e.g. a sequence when no
/// tag is registered for sequences).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode<I>(entries: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = Entry>,
{
    encode_with(entries, &Registry::default())
}

/// Encode entries as one top-level block with a custom registry.
///
/// # Errors
///
/// Returns the first error raised while writing, including errors from encoders.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with<I>(entries: I, registry: &Registry) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = Entry>,
{
    let events = entries
        .into_iter()
        .map(|(key, value)| Line::Entry(key, value));
    ser::write(events, registry).collect()
}
