#![deny(missing_docs, missing_debug_implementations)]

//! A schema-driven codec for the AMQP 1.0 binary type system (OASIS AMQP
//! 1.0 §1.6, §3).
//!
//! This crate is deliberately narrower than a full AMQP stack: it has no
//! notion of a connection, session, or link, no SASL or TLS, and no
//! transport framing. What it does is translate between an in-memory
//! [`value::Value`] tree and the wire bytes that carry AMQP's primitive
//! types, compound types, and described (composite/restricted) types — the
//! part of the protocol every other layer is built on top of.
//!
//! # Two ways to decode
//!
//! Bytes always go through the same first step, [`node::parse_buffer`],
//! which walks the buffer once and produces a [`node::Node`] tree recording
//! constructor framing (format code, optional descriptor, payload span)
//! without resolving anything against a schema. From there:
//!
//! - [`decoder::decode_raw`] turns a `Node` into a [`value::Value`] using
//!   only the wire-level format code: composites and restricted types come
//!   back as plain lists and scalars, since nothing is known about named
//!   types at this layer.
//! - [`registry::Registry::decode_schema`] (or the free function
//!   [`decoder::decode_schema`]) additionally resolves each node's
//!   descriptor or format code against a [`registry::Registry`], producing
//!   [`value::CompositeValue`]/[`value::RestrictedValue`] wherever a
//!   registered [`meta::Meta`] matches.
//!
//! # Building values
//!
//! [`encoder::encode`] serialises any [`value::Value`] tree to bytes
//! directly. To build a schema-validated value from loosely-typed input —
//! enforcing mandatory fields, `multiple` arity, and polymorphic `*` field
//! archetypes — go through [`registry::Registry::create`], which delegates
//! to [`meta::Meta::create`] and [`meta::clean_field`].
//!
//! # Schemas
//!
//! A [`registry::Registry`] is populated from AMQP type-system XML
//! documents (`<amqp><section><type>...`) via
//! [`registry::Registry::load_schema_xml`]/[`registry::Registry::load_schema_file`].
//! [`registry::Registry::with_defaults`] (and the process-wide
//! [`registry::Registry::default_for_process`]) preloads the bundled
//! primitive catalogue in `schema/types.xml`; callers register their own
//! composite/restricted types — e.g. the transport-layer frame types this
//! crate does not bundle — the same way.
//!
//! # Example
//!
//! ```rust
//! use amqp_typesystem::{encoder, node, decoder};
//! use amqp_typesystem::value::Value;
//!
//! let value = Value::scalar(7u32);
//! let bytes = encoder::encode(&value).unwrap();
//! assert_eq!(bytes, vec![0x52, 0x07]); // smalluint
//!
//! let parsed = node::parse_buffer(&bytes).unwrap();
//! let decoded = decoder::decode_raw(&parsed, &bytes).unwrap();
//! assert_eq!(decoded.as_scalar(), value.as_scalar());
//! ```
//!
//! # Feature flags
//!
//! - `json`: adds a `serde_json::Value` bridge for callers that want to
//!   build or inspect [`value::Value`] trees from JSON.
//!
//! # Non-goals
//!
//! Decimal32/64/128 arithmetic (the format codes round-trip as opaque
//! bytes via [`primitives::Dec32`]/[`primitives::Dec64`]/[`primitives::Dec128`],
//! but no encoder accepts a decimal-typed input — see
//! [`error::Error::EncoderMissing`]); `char` encoding beyond UTF-32BE
//! pass-through; endianness negotiation (everything is big-endian); and, as
//! noted above, anything belonging to the transport/session/link layer.

pub mod descriptor;
pub mod dto;
pub mod error;
pub mod fixed_width;
pub mod format_code;
pub mod primitives;
pub mod read;
pub mod value;

pub mod decoder;
pub mod encoder;
pub mod meta;
pub mod node;
pub mod registry;
pub mod schema;

pub use decoder::{decode_raw, decode_schema};
pub use encoder::encode;
pub use error::Error;
pub use node::{parse_buffer, Node};
pub use registry::Registry;
pub use value::Value;

#[cfg(feature = "json")]
pub mod json;
