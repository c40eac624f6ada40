//! # TLV Blocks
//!
//! A `Block` is one delineated Type-Length-Value element as handed over by a
//! transport. Types and lengths use the variable-length number encoding:
//!
//! ```text
//! first byte < 253  -> the byte itself
//! first byte == 253 -> next 2 bytes, big endian
//! first byte == 254 -> next 4 bytes, big endian
//! first byte == 255 -> next 8 bytes, big endian
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// TLV type numbers understood by this crate.
pub mod types {
    /// Interest packet.
    pub const INTEREST: u64 = 0x05;
    /// Data packet.
    pub const DATA: u64 = 0x06;
    /// Name.
    pub const NAME: u64 = 0x07;
    /// Generic name component.
    pub const GENERIC_NAME_COMPONENT: u64 = 0x08;
}

/// Errors from reading a TLV element.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TlvError {
    /// The buffer ended before the element did.
    #[error("TLV element truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Bytes left over after a single element.
    #[error("unexpected {0} trailing bytes after TLV element")]
    TrailingBytes(usize),

    /// Empty input.
    #[error("empty buffer")]
    Empty,
}

/// One TLV element with its full wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    tlv_type: u64,
    value: Bytes,
    wire: Bytes,
}

impl Block {
    /// Parse exactly one element spanning the whole of `wire`.
    pub fn parse(wire: Bytes) -> Result<Self, TlvError> {
        let (block, consumed) = Self::read_prefix(&wire)?;
        if consumed != wire.len() {
            return Err(TlvError::TrailingBytes(wire.len() - consumed));
        }
        Ok(block)
    }

    /// Read the element at the front of `buf`, returning it and the number of
    /// bytes it occupies. Used by stream transports to delineate elements.
    pub fn read_prefix(buf: &[u8]) -> Result<(Self, usize), TlvError> {
        if buf.is_empty() {
            return Err(TlvError::Empty);
        }
        let (tlv_type, type_len) = read_var_number(buf)?;
        let (length, length_len) = read_var_number(&buf[type_len..])?;
        let header = type_len + length_len;
        let length = usize::try_from(length).map_err(|_| TlvError::Truncated {
            needed: usize::MAX,
            available: buf.len(),
        })?;
        let total = header.checked_add(length).ok_or(TlvError::Truncated {
            needed: usize::MAX,
            available: buf.len(),
        })?;
        if buf.len() < total {
            return Err(TlvError::Truncated {
                needed: total,
                available: buf.len(),
            });
        }
        let wire = Bytes::copy_from_slice(&buf[..total]);
        let value = wire.slice(header..total);
        Ok((
            Self {
                tlv_type,
                value,
                wire,
            },
            total,
        ))
    }

    /// Build an element from a type and value.
    pub fn encode(tlv_type: u64, value: &[u8]) -> Self {
        let mut out = BytesMut::with_capacity(value.len() + 18);
        write_var_number(&mut out, tlv_type);
        write_var_number(&mut out, value.len() as u64);
        let header = out.len();
        out.put_slice(value);
        let wire = out.freeze();
        let value = wire.slice(header..);
        Self {
            tlv_type,
            value,
            wire,
        }
    }

    /// Build an element whose value is the concatenation of `children`.
    pub fn nest(tlv_type: u64, children: &[Block]) -> Self {
        let mut value = BytesMut::new();
        for child in children {
            value.put_slice(child.wire());
        }
        Self::encode(tlv_type, &value)
    }

    pub fn tlv_type(&self) -> u64 {
        self.tlv_type
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }

    pub fn wire(&self) -> &Bytes {
        &self.wire
    }

    /// Size of the full encoding in bytes.
    pub fn size(&self) -> usize {
        self.wire.len()
    }

    /// Parse the value as a sequence of nested elements.
    pub fn elements(&self) -> Result<Vec<Block>, TlvError> {
        let mut out = Vec::new();
        let mut rest: &[u8] = &self.value;
        while !rest.is_empty() {
            let (child, consumed) = Self::read_prefix(rest)?;
            out.push(child);
            rest = &rest[consumed..];
        }
        Ok(out)
    }
}

fn read_var_number(buf: &[u8]) -> Result<(u64, usize), TlvError> {
    let first = *buf.first().ok_or(TlvError::Truncated {
        needed: 1,
        available: 0,
    })?;
    let width = match first {
        0..=252 => return Ok((u64::from(first), 1)),
        253 => 2,
        254 => 4,
        255 => 8,
    };
    if buf.len() < 1 + width {
        return Err(TlvError::Truncated {
            needed: 1 + width,
            available: buf.len(),
        });
    }
    let number = buf[1..=width]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Ok((number, 1 + width))
}

fn write_var_number(out: &mut BytesMut, number: u64) {
    if number < 253 {
        out.put_u8(number as u8);
    } else if number <= u64::from(u16::MAX) {
        out.put_u8(253);
        out.put_u16(number as u16);
    } else if number <= u64::from(u32::MAX) {
        out.put_u8(254);
        out.put_u32(number as u32);
    } else {
        out.put_u8(255);
        out.put_u64(number);
    }
}
