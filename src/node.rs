//! The schema-blind stream parser: walks a byte buffer once, building a
//! [`Node`] tree that records constructor framing and payload spans without
//! resolving format codes to values. Built over the
//! [`Read`](crate::read::Read) trait so it works over both an in-memory
//! slice and an arbitrary `std::io::Read`.

use crate::descriptor::Descriptor;
use crate::error::{DecodeError, Error};
use crate::fixed_width::Category;
use crate::read::{Read, SliceReader};

/// A descriptor as recorded on a [`Node`]: the wire-level encoding of
/// [`Descriptor`], kept separate so node construction doesn't need a
/// registry to decide what a numeric/symbolic descriptor "means".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeDescriptor {
    /// A `sym8`/`sym32`-encoded descriptor.
    Symbolic(String),
    /// A `smallulong`/`ulong`-encoded descriptor.
    Numeric(u64),
}

impl From<&NodeDescriptor> for Descriptor {
    fn from(value: &NodeDescriptor) -> Self {
        match value {
            NodeDescriptor::Symbolic(name) => {
                Descriptor::Symbolic(crate::primitives::Symbol::from(name.clone()))
            }
            NodeDescriptor::Numeric(code) => Descriptor::Numeric(*code),
        }
    }
}

/// One node of the parsed byte-span tree: a format code, its optional
/// descriptor, and (for compound/array categories) the child nodes occupying
/// its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Absolute offset, in the original buffer, of this node's constructor.
    pub start: usize,
    /// The primitive format-code octet (after resolving any `0x00` prefix).
    pub format_code: u8,
    /// This node's descriptor, if it was constructor-prefixed with one.
    pub descriptor: Option<NodeDescriptor>,
    /// Absolute offset where this node's payload (or, for compounds, its
    /// members) begins.
    pub payload_offset: usize,
    /// Payload length in octets: the fixed width, the variable-length
    /// value, or the advertised compound/array "size" (which itself
    /// includes the count field's own width).
    pub payload_length: usize,
    /// Member count, for compound and array categories.
    pub count: Option<usize>,
    /// Child nodes, for compound and array categories, in order.
    pub children: Vec<Node>,
    /// The shared member format code, for array categories.
    pub array_element_code: Option<u8>,
}

/// Parses a single top-level value out of `bytes`, returning the [`Node`]
/// tree describing its framing.
pub fn parse_buffer(bytes: &[u8]) -> Result<Node, Error> {
    if bytes.is_empty() {
        return Err(DecodeError::UnexpectedEof.into());
    }
    let mut reader = SliceReader::new(bytes);
    parse_node(&mut reader)
}

fn parse_node(reader: &mut impl Read) -> Result<Node, Error> {
    let start = reader.position();
    let (descriptor, format_code) = read_constructor(reader)?;
    build_node_body(reader, start, descriptor, format_code)
}

/// Reads a constructor: either a bare format code, or a `0x00` prefix
/// followed by a descriptor value and the described value's own format code.
fn read_constructor(reader: &mut impl Read) -> Result<(Option<NodeDescriptor>, u8), Error> {
    let first = reader.require_next()?;
    if first != 0x00 {
        return Ok((None, first));
    }

    let descriptor_code = reader.require_next()?;
    let descriptor = match descriptor_code {
        0xa3 => {
            let len = reader.require_next()? as usize;
            let bytes = reader.read_bytes(len)?;
            NodeDescriptor::Symbolic(String::from_utf8(bytes)?)
        }
        0xb3 => {
            let len = u32::from_be_bytes(reader.read_const_bytes::<4>()?) as usize;
            let bytes = reader.read_bytes(len)?;
            NodeDescriptor::Symbolic(String::from_utf8(bytes)?)
        }
        0x53 => NodeDescriptor::Numeric(reader.require_next()? as u64),
        0x44 => NodeDescriptor::Numeric(0),
        0x80 => NodeDescriptor::Numeric(u64::from_be_bytes(reader.read_const_bytes::<8>()?)),
        other => return Err(DecodeError::InvalidDescriptorFormatCode(other).into()),
    };
    let format_code = reader.require_next()?;
    Ok((Some(descriptor), format_code))
}

/// Builds a node's body, given its already-read constructor. Used both for
/// top-level parsing and for array elements, which share one constructor
/// read once by the array's own framing.
fn build_node_body(
    reader: &mut impl Read,
    start: usize,
    descriptor: Option<NodeDescriptor>,
    format_code: u8,
) -> Result<Node, Error> {
    let category = Category::of(format_code).ok_or(DecodeError::UnknownFormatCode(format_code))?;

    if let Some(width) = category.fixed_width() {
        reader.read_bytes(width)?;
        return Ok(Node {
            start,
            format_code,
            descriptor,
            payload_offset: reader.position() - width,
            payload_length: width,
            count: None,
            children: Vec::new(),
            array_element_code: None,
        });
    }

    if !category.is_compound() {
        let header_width = category.header_width().expect("variable category has a header");
        let length = read_be_usize(reader, header_width)?;
        reader.read_bytes(length)?;
        return Ok(Node {
            start,
            format_code,
            descriptor,
            payload_offset: reader.position() - length,
            payload_length: length,
            count: None,
            children: Vec::new(),
            array_element_code: None,
        });
    }

    let header_width = category.header_width().expect("compound category has a header");
    let size = read_be_usize(reader, header_width)?;
    let count = read_be_usize(reader, header_width)?;
    let members_length = size
        .checked_sub(header_width)
        .ok_or(DecodeError::SizeMismatch {
            expected: header_width,
            actual: size,
        })?;

    if category.is_array() {
        let members_start = reader.position();
        let (element_descriptor, element_code) = read_constructor(reader)?;
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            let child_start = reader.position();
            children.push(build_node_body(
                reader,
                child_start,
                element_descriptor.clone(),
                element_code,
            )?);
        }
        let consumed = reader.position() - members_start;
        if consumed != members_length {
            return Err(DecodeError::SizeMismatch {
                expected: members_length,
                actual: consumed,
            }
            .into());
        }
        Ok(Node {
            start,
            format_code,
            descriptor,
            payload_offset: members_start,
            payload_length: size,
            count: Some(count),
            children,
            array_element_code: Some(element_code),
        })
    } else {
        let members_start = reader.position();
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(parse_node(reader)?);
        }
        let consumed = reader.position() - members_start;
        if consumed != members_length {
            return Err(DecodeError::SizeMismatch {
                expected: members_length,
                actual: consumed,
            }
            .into());
        }
        Ok(Node {
            start,
            format_code,
            descriptor,
            payload_offset: members_start,
            payload_length: size,
            count: Some(count),
            children,
            array_element_code: None,
        })
    }
}

fn read_be_usize(reader: &mut impl Read, width: usize) -> Result<usize, Error> {
    match width {
        1 => Ok(reader.require_next()? as usize),
        4 => Ok(u32::from_be_bytes(reader.read_const_bytes::<4>()?) as usize),
        _ => unreachable!("header width is always 1 or 4"),
    }
}
