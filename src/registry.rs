//! Type registry: the configuration that drives decoding and encoding.
//!
//! A [`Registry`] holds three ordered tables and two fallbacks:
//!
//! - **decoders**: alias-set → `(scalar, children) -> Value`
//! - **encoders**: alias-set → `(scalar, children) -> child entries`
//! - **types**: [`ValueKind`] → tag, used to annotate native values on encode
//! - **fallback**: what the decoder does with a tag no decoder recognizes
//! - **encode fallback**: what the encoder does with a tag no encoder recognizes
//!
//! Lookups scan a table in registration order and take the first alias-set
//! containing the tag. Overlapping alias-sets are allowed; the earlier entry wins.
//!
//! ## Examples
//!
//! ```rust
//! use hkvn::{Error, Fallback, Registry, Value};
//!
//! // Built-in Map and List
//! let registry = Registry::new();
//!
//! // No composites at all: every block decodes to a generic value
//! let registry = Registry::passthrough();
//!
//! // Reject unknown tags instead of wrapping them
//! let registry = Registry::new().with_fallback(Fallback::Reject);
//!
//! // Add an application type
//! let registry = Registry::new().with_decoder(["Pair", "P"], |_scalar, children| {
//!     let items = children.collect::<Result<Vec<_>, Error>>()?;
//!     if items.len() != 2 {
//!         return Err(Error::custom("pair needs two children"));
//!     }
//!     Ok(Value::List(items.into_iter().map(|(_, v)| v).collect()))
//! });
//! ```

use crate::de::Block;
use crate::{Entry, Error, Hierarchical, Result, Value, ValueKind};
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

/// Decodes the scalar and children of a recognized block into a value.
pub type DecodeFn = Arc<dyn Fn(Vec<u8>, &mut Block<'_>) -> Result<Value> + Send + Sync>;

/// Turns the scalar and children of a value into the entries of its block.
pub type EncodeFn = Arc<dyn Fn(Vec<u8>, Children) -> Result<Vec<Entry>> + Send + Sync>;

/// Decodes an unrecognized block given its tag.
pub type FallbackFn =
    Arc<dyn Fn(&str, Vec<u8>, &mut Block<'_>) -> Result<Value> + Send + Sync>;

/// Builds a value out of a fully materialized unrecognized block.
pub type FactoryFn = Arc<dyn Fn(Hierarchical) -> Result<Value> + Send + Sync>;

/// The set of surface spellings that share one handler.
///
/// # Examples
///
/// ```rust
/// use hkvn::AliasSet;
///
/// let aliases = AliasSet::from(["Map", "M"]);
/// assert!(aliases.contains("M"));
/// assert!(!aliases.contains("m"));
/// assert_eq!(aliases.primary(), Some("Map"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AliasSet(IndexSet<String>);

impl AliasSet {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AliasSet(aliases.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// The first spelling.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<const N: usize> From<[&str; N]> for AliasSet {
    fn from(aliases: [&str; N]) -> Self {
        AliasSet::new(aliases)
    }
}

impl From<&str> for AliasSet {
    fn from(alias: &str) -> Self {
        AliasSet::new([alias])
    }
}

impl From<Vec<String>> for AliasSet {
    fn from(aliases: Vec<String>) -> Self {
        AliasSet::new(aliases)
    }
}

/// What the decoder does with a tag that matches no decoder.
#[derive(Clone, Default)]
pub enum Fallback {
    /// Wrap the block as a [`Value::Hierarchical`].
    #[default]
    Generic,
    /// Materialize the block as a [`Hierarchical`] and hand it to a factory.
    Factory(FactoryFn),
    /// Hand the tag, scalar and lazy children to a decoder function.
    Decoder(FallbackFn),
    /// Fail with [`Error::UnrecognizedAnnotation`].
    Reject,
}

impl Fallback {
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(Hierarchical) -> Result<Value> + Send + Sync + 'static,
    {
        Fallback::Factory(Arc::new(f))
    }

    pub fn decoder<F>(f: F) -> Self
    where
        F: Fn(&str, Vec<u8>, &mut Block<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Fallback::Decoder(Arc::new(f))
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Generic => write!(f, "Generic"),
            Fallback::Factory(_) => write!(f, "Factory(..)"),
            Fallback::Decoder(_) => write!(f, "Decoder(..)"),
            Fallback::Reject => write!(f, "Reject"),
        }
    }
}

/// Children of a value being encoded, as handed to an encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Children {
    /// Entries of a generic hierarchical value, already keyed.
    Entries(Vec<Entry>),
    /// A native value detected through the types table.
    Value(Value),
}

impl Children {
    /// Converts the children into block entries without any encoder.
    ///
    /// Mappings yield their entries, sequences yield their elements under
    /// empty keys. Any other native value cannot be enumerated.
    pub fn into_entries(self, tag: &str) -> Result<Vec<Entry>> {
        match self {
            Children::Entries(entries) => Ok(entries),
            Children::Value(Value::Map(map)) => Ok(map.into_iter().collect()),
            Children::Value(Value::List(list)) => {
                Ok(list.into_iter().map(|v| (String::new(), v)).collect())
            }
            Children::Value(other) => Err(Error::malformed(
                tag,
                format!("{:?} value has no children to write", other.kind()),
            )),
        }
    }
}

/// Decoder and encoder tables plus fallbacks.
///
/// Registries are immutable while a decode or encode runs and can be shared
/// across threads.
#[derive(Clone)]
pub struct Registry {
    decoders: Vec<(AliasSet, DecodeFn)>,
    encoders: Vec<(AliasSet, EncodeFn)>,
    types: Vec<(ValueKind, String)>,
    fallback: Fallback,
    encode_fallback: Option<EncodeFn>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::passthrough()
            .with_decoder(["Map", "M"], decode_map)
            .with_decoder(["List", "L"], decode_list)
            .with_encoder(["Map", "M"], encode_map)
            .with_encoder(["List", "L"], encode_list)
            .with_type(ValueKind::Map, "M")
            .with_type(ValueKind::List, "L")
    }
}

impl Registry {
    /// Creates the default registry with the built-in `Map`/`M` and `List`/`L` types.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::{Registry, ValueKind};
    ///
    /// let registry = Registry::new();
    /// assert!(registry.has_decoder("Map"));
    /// assert_eq!(registry.tag_for(ValueKind::List), Some("L"));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with empty tables and the generic fallback.
    ///
    /// Every nested block decodes to a [`Value::Hierarchical`] and only
    /// hierarchical values can be encoded as blocks.
    #[must_use]
    pub fn passthrough() -> Self {
        Registry {
            decoders: Vec::new(),
            encoders: Vec::new(),
            types: Vec::new(),
            fallback: Fallback::Generic,
            encode_fallback: None,
        }
    }

    /// Appends a decoder for every tag in `aliases`.
    #[must_use]
    pub fn with_decoder<A, F>(mut self, aliases: A, decoder: F) -> Self
    where
        A: Into<AliasSet>,
        F: Fn(Vec<u8>, &mut Block<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.decoders.push((aliases.into(), Arc::new(decoder)));
        self
    }

    /// Appends an encoder for every tag in `aliases`.
    #[must_use]
    pub fn with_encoder<A, F>(mut self, aliases: A, encoder: F) -> Self
    where
        A: Into<AliasSet>,
        F: Fn(Vec<u8>, Children) -> Result<Vec<Entry>> + Send + Sync + 'static,
    {
        self.encoders.push((aliases.into(), Arc::new(encoder)));
        self
    }

    /// Annotates values of `kind` with `tag` when they are encoded.
    ///
    /// A later registration for the same kind replaces the earlier one.
    #[must_use]
    pub fn with_type(mut self, kind: ValueKind, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        match self.types.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = tag,
            None => self.types.push((kind, tag)),
        }
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets the encoder used for tags no encoder recognizes.
    ///
    /// Without one, the children of such values are written verbatim.
    #[must_use]
    pub fn with_encode_fallback<F>(mut self, encoder: F) -> Self
    where
        F: Fn(Vec<u8>, Children) -> Result<Vec<Entry>> + Send + Sync + 'static,
    {
        self.encode_fallback = Some(Arc::new(encoder));
        self
    }

    /// Drops all decoders, keeping encoders, types and fallbacks.
    #[must_use]
    pub fn without_decoders(mut self) -> Self {
        self.decoders.clear();
        self
    }

    /// Drops all encoders, keeping decoders, types and fallbacks.
    #[must_use]
    pub fn without_encoders(mut self) -> Self {
        self.encoders.clear();
        self
    }

    /// Drops the types table; native values are then never annotated.
    #[must_use]
    pub fn without_types(mut self) -> Self {
        self.types.clear();
        self
    }

    #[must_use]
    pub fn has_decoder(&self, tag: &str) -> bool {
        self.decoder(tag).is_some()
    }

    #[must_use]
    pub fn has_encoder(&self, tag: &str) -> bool {
        self.encoder(tag).is_some()
    }

    /// Returns the tag registered for values of `kind`.
    #[must_use]
    pub fn tag_for(&self, kind: ValueKind) -> Option<&str> {
        self.types
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, tag)| tag.as_str())
    }

    pub(crate) fn decoder(&self, tag: &str) -> Option<&DecodeFn> {
        self.decoders
            .iter()
            .find(|(aliases, _)| aliases.contains(tag))
            .map(|(_, f)| f)
    }

    pub(crate) fn encoder(&self, tag: &str) -> Option<&EncodeFn> {
        self.encoders
            .iter()
            .find(|(aliases, _)| aliases.contains(tag))
            .map(|(_, f)| f)
    }

    pub(crate) fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    pub(crate) fn encode_fallback(&self) -> Option<&EncodeFn> {
        self.encode_fallback.as_ref()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "decoders",
                &self.decoders.iter().map(|(a, _)| a).collect::<Vec<_>>(),
            )
            .field(
                "encoders",
                &self.encoders.iter().map(|(a, _)| a).collect::<Vec<_>>(),
            )
            .field("types", &self.types)
            .field("fallback", &self.fallback)
            .field("encode_fallback", &self.encode_fallback.is_some())
            .finish()
    }
}

fn ensure_empty(tag: &str, scalar: &[u8]) -> Result<()> {
    if scalar.is_empty() {
        Ok(())
    } else {
        Err(Error::malformed(
            tag,
            format!(
                "value {:?} is supposed to be empty",
                String::from_utf8_lossy(scalar)
            ),
        ))
    }
}

fn ensure_empty_key(tag: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        Ok(())
    } else {
        Err(Error::malformed(
            tag,
            format!("key {:?} is supposed to be empty", key),
        ))
    }
}

/// Built-in mapping decoder; duplicate keys keep the last value.
pub fn decode_map(scalar: Vec<u8>, children: &mut Block<'_>) -> Result<Value> {
    ensure_empty("Map", &scalar)?;
    let mut map = crate::HkvnMap::new();
    for entry in children {
        let (key, value) = entry?;
        map.insert(key, value);
    }
    Ok(Value::Map(map))
}

/// Built-in sequence decoder.
pub fn decode_list(scalar: Vec<u8>, children: &mut Block<'_>) -> Result<Value> {
    ensure_empty("List", &scalar)?;
    let mut list = Vec::new();
    for entry in children {
        let (key, value) = entry?;
        ensure_empty_key("List", &key)?;
        list.push(value);
    }
    Ok(Value::List(list))
}

pub fn encode_map(scalar: Vec<u8>, children: Children) -> Result<Vec<Entry>> {
    ensure_empty("Map", &scalar)?;
    match children {
        Children::Value(Value::Map(map)) => Ok(map.into_iter().collect()),
        Children::Entries(entries) => Ok(entries),
        Children::Value(other) => Err(Error::malformed(
            "Map",
            format!("cannot write {:?} value as a mapping", other.kind()),
        )),
    }
}

pub fn encode_list(scalar: Vec<u8>, children: Children) -> Result<Vec<Entry>> {
    ensure_empty("List", &scalar)?;
    match children {
        Children::Value(Value::List(list)) => {
            Ok(list.into_iter().map(|v| (String::new(), v)).collect())
        }
        Children::Entries(entries) => {
            for (key, _) in &entries {
                ensure_empty_key("List", key)?;
            }
            Ok(entries)
        }
        Children::Value(other) => Err(Error::malformed(
            "List",
            format!("cannot write {:?} value as a sequence", other.kind()),
        )),
    }
}
