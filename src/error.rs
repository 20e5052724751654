//! Error taxonomy for the codec.
//!
//! Every failure fits one of five kinds: malformed wire data, a missing
//! primitive encoder, malformed schema XML, schema validation, or a type
//! error raised while building a value.

use std::fmt;

/// Top level error returned by every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte stream could not be parsed into a [`crate::node::Node`] tree,
    /// or a node could not be converted into a value.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// No byte encoder is registered for the named primitive type.
    #[error("no encoder for primitive type {0:?}")]
    EncoderMissing(String),

    /// An XML schema document was malformed.
    #[error("schema syntax error: {0}")]
    SchemaSyntax(String),

    /// A value failed schema validation while being built.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A monomorphic array received a member of a different type, or a
    /// composite's mapping input had fields left over after population.
    #[error("type error: {0}")]
    Type(String),
}

impl Error {
    pub(crate) fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(_: std::io::Error) -> Self {
        DecodeError::UnexpectedEof.into()
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(_: std::str::Utf8Error) -> Self {
        DecodeError::InvalidUtf8.into()
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(_: std::string::FromUtf8Error) -> Self {
        DecodeError::InvalidUtf8.into()
    }
}

/// Errors raised while parsing or decoding AMQP-encoded bytes.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream ended where a constructor or payload was expected.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// A format-code octet did not match any known primitive.
    #[error("unknown format code 0x{0:02x}")]
    UnknownFormatCode(u8),

    /// The octet following a `0x00` described-type prefix was not a valid
    /// descriptor format code (`sym8`, `sym32`, `smallulong`, or `ulong`).
    #[error("invalid descriptor format code 0x{0:02x}")]
    InvalidDescriptorFormatCode(u8),

    /// A compound or array's advertised size did not match the span its
    /// members actually occupied.
    #[error("advertised size {expected} does not match consumed span {actual}")]
    SizeMismatch {
        /// The size advertised by the constructor.
        expected: usize,
        /// The size actually consumed while parsing members.
        actual: usize,
    },

    /// No byte decoder exists for the given format code.
    #[error("no decoder for format code 0x{0:02x}")]
    DecoderMissing(u8),

    /// A byte sequence claimed to be UTF-8 was not.
    #[error("invalid UTF-8 in string payload")]
    InvalidUtf8,

    /// A fixed-width payload (e.g. a UUID) did not have the expected length.
    #[error("invalid length for fixed-width payload")]
    InvalidLength,

    /// Schema-aware decoding could not resolve a [`crate::meta::Meta`] for a
    /// node's descriptor or format code.
    #[error("unknown type for descriptor/format code: {0}")]
    UnknownDescriptor(DescriptorKey),
}

/// The identifying key under which a node's schema lookup failed, carried by
/// [`DecodeError::UnknownDescriptor`] so callers can report the exact
/// identifier that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorKey {
    /// Symbolic descriptor name.
    Symbolic(String),
    /// Numeric descriptor value.
    Numeric(u64),
    /// Bare primitive format code, with no descriptor attached.
    FormatCode(u8),
}

impl fmt::Display for DescriptorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKey::Symbolic(name) => write!(f, "symbol {name:?}"),
            DescriptorKey::Numeric(code) => write!(f, "numeric 0x{code:x}"),
            DescriptorKey::FormatCode(code) => write!(f, "format code 0x{code:02x}"),
        }
    }
}

/// Errors raised while validating schema-driven input, mirroring the
/// `ValidationError` subkinds of the original type system.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A mandatory field was absent or null.
    #[error("field {field:?} is mandatory")]
    Required {
        /// Name of the field that was missing.
        field: String,
    },

    /// A `multiple` field's members did not share one native representation.
    #[error("field {field:?} received mixed element types")]
    Polymorphic {
        /// Name of the offending field.
        field: String,
    },

    /// A polymorphic `*` field's value did not provide an archetype the
    /// field requires.
    #[error("field {field:?} is not satisfied by the given provider")]
    NotSatisfied {
        /// Name of the offending field.
        field: String,
    },

    /// A restricted type's choice name was not defined.
    #[error("{choice:?} is not a valid choice for {type_name:?}")]
    Invalid {
        /// Type name of the restricted type.
        type_name: String,
        /// The invalid choice name that was supplied.
        choice: String,
    },
}
