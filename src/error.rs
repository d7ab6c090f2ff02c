//! Error types for HKVN decoding and encoding.
//!
//! Every error is a structural violation: a malformed record stream on the
//! decode side, or a value the encoder cannot express on the encode side.
//! None of them are retryable and none leave a partial result behind.
//!
//! ## Error Categories
//!
//! - **Prefix errors**: a key does not carry the prefix of its nesting depth
//! - **Annotation errors**: unrecognized tags (when the generic fallback is disabled),
//!   or tags that cannot be written because they contain `>`
//! - **Shape errors**: built-in composites with a non-empty scalar, sequence
//!   children with keys, children without an annotation
//! - **Stream errors**: the record stream ends inside an open block
//!
//! ## Examples
//!
//! ```rust
//! use hkvn::{decode, Error, Record};
//!
//! let records = vec![Record::entry("key", hkvn::Payload::annotated("Map>", ""))];
//! let err = decode(records).unwrap_err();
//! assert!(matches!(err, Error::UnterminatedBlock { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while decoding or encoding HKVN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A record key does not start with the prefix required at its depth.
    #[error("key {key:?} is supposed to start with {prefix:?}")]
    PrefixMismatch { key: String, prefix: String },

    /// A nesting annotation matched no decoder and the fallback rejects it.
    #[error("unrecognized annotation: {0}")]
    UnrecognizedAnnotation(String),

    /// A built-in composite was handed a payload of the wrong shape.
    #[error("malformed {tag} payload: {msg}")]
    MalformedCompositePayload { tag: String, msg: String },

    /// A mapping key cannot be represented as a string.
    #[error("mapping key {0} is supposed to be a string")]
    NonStringMapKey(String),

    /// A value carries children but no annotation could be resolved for it.
    #[error("cannot write children of {key:?} without an annotation")]
    ChildrenWithoutAnnotation { key: String },

    /// A tag or leaf annotation cannot be written because the decoder would split it.
    #[error("tag {0:?} must not contain '>'")]
    InvalidTag(String),

    /// The record stream was exhausted before a terminal marker closed the block.
    #[error("unexpected end of stream: block with prefix {prefix:?} was never terminated")]
    UnterminatedBlock { prefix: String },

    /// Error raised by an application handler.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a prefix mismatch error for `key` at a depth expecting `prefix`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::Error;
    ///
    /// let err = Error::prefix_mismatch("k1", "a");
    /// assert!(err.to_string().contains("\"a\""));
    /// ```
    pub fn prefix_mismatch(key: &str, prefix: &str) -> Self {
        Error::PrefixMismatch {
            key: key.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// Creates a shape error for the composite selected by `tag`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::Error;
    ///
    /// let err = Error::malformed("List", "key \"k\" is supposed to be empty");
    /// assert!(err.to_string().starts_with("malformed List payload"));
    /// ```
    pub fn malformed<T: fmt::Display>(tag: &str, msg: T) -> Self {
        Error::MalformedCompositePayload {
            tag: tag.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an unterminated block error for the block opened with `prefix`.
    pub fn unterminated(prefix: &str) -> Self {
        Error::UnterminatedBlock {
            prefix: prefix.to_string(),
        }
    }

    /// Creates an error with a free-form message, for use inside custom handlers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hkvn::Error;
    ///
    /// let err = Error::custom("point needs two coordinates");
    /// assert_eq!(err.to_string(), "point needs two coordinates");
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
