//! # Network-Layer Packets
//!
//! Minimal Interest/Data representations exchanged between faces and the
//! forwarding core. Only the name is interpreted; everything else travels as
//! the original wire encoding.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::tlv::{types, Block};

/// TLV type for Data content.
const CONTENT: u64 = 0x15;

/// A hierarchical name made of opaque components.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    components: Vec<Bytes>,
}

impl Name {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: Vec<Bytes>) -> Self {
        Self { components }
    }

    /// Append a component.
    #[must_use]
    pub fn append(mut self, component: impl Into<Bytes>) -> Self {
        self.components.push(component.into());
        self
    }

    pub fn components(&self) -> &[Bytes] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Encode as a Name TLV of generic components.
    pub fn to_block(&self) -> Block {
        let children: Vec<Block> = self
            .components
            .iter()
            .map(|c| Block::encode(types::GENERIC_NAME_COMPONENT, c))
            .collect();
        Block::nest(types::NAME, &children)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/")?;
            for byte in component.iter() {
                if byte.is_ascii_alphanumeric() || b"-._~".contains(byte) {
                    write!(f, "{}", *byte as char)?;
                } else {
                    write!(f, "%{:02X}", byte)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = std::convert::Infallible;

    /// Parse `/a/b/c`; percent escapes are not decoded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| Bytes::copy_from_slice(c.as_bytes()))
            .collect();
        Ok(Self { components })
    }
}

/// An Interest packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    name: Name,
    wire: Block,
}

impl Interest {
    /// Build an Interest carrying only a name.
    pub fn new(name: Name) -> Self {
        let wire = Block::nest(types::INTEREST, &[name.to_block()]);
        Self { name, wire }
    }

    /// Wrap an already-decoded Interest.
    pub fn from_parts(name: Name, wire: Block) -> Self {
        Self { name, wire }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn wire(&self) -> &Block {
        &self.wire
    }
}

/// A Data packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    name: Name,
    wire: Block,
}

impl Data {
    /// Build a Data packet with a name and content.
    pub fn new(name: Name, content: &[u8]) -> Self {
        let wire = Block::nest(
            types::DATA,
            &[name.to_block(), Block::encode(CONTENT, content)],
        );
        Self { name, wire }
    }

    /// Wrap an already-decoded Data packet.
    pub fn from_parts(name: Name, wire: Block) -> Self {
        Self { name, wire }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn wire(&self) -> &Block {
        &self.wire
    }
}

/// Either network-layer packet type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Interest(Interest),
    Data(Data),
}

impl Packet {
    pub fn wire(&self) -> &Block {
        match self {
            Packet::Interest(interest) => interest.wire(),
            Packet::Data(data) => data.wire(),
        }
    }

    pub fn name(&self) -> &Name {
        match self {
            Packet::Interest(interest) => interest.name(),
            Packet::Data(data) => data.name(),
        }
    }
}
