//! Default packet decoder.
//!
//! Classifies a block by its outer TLV type and extracts the leading Name.
//! Everything after the Name is left in the wire encoding untouched.

use shared_types::tlv::types;
use shared_types::{Block, Data, Interest, Name, Packet};

use crate::error::DecodeError;
use crate::ports::PacketDecoder;

/// Decodes Interest (0x05) and Data (0x06) blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlvPacketDecoder;

impl TlvPacketDecoder {
    fn read_name(block: &Block) -> Result<Name, DecodeError> {
        let elements = block.elements()?;
        let name = elements
            .first()
            .filter(|e| e.tlv_type() == types::NAME)
            .ok_or(DecodeError::MissingName)?;
        let components = name
            .elements()?
            .into_iter()
            .map(|component| component.value().clone())
            .collect();
        Ok(Name::from_components(components))
    }
}

impl PacketDecoder for TlvPacketDecoder {
    fn decode(&self, block: &Block) -> Result<Packet, DecodeError> {
        match block.tlv_type() {
            types::INTEREST => {
                let name = Self::read_name(block)?;
                Ok(Packet::Interest(Interest::from_parts(name, block.clone())))
            }
            types::DATA => {
                let name = Self::read_name(block)?;
                Ok(Packet::Data(Data::from_parts(name, block.clone())))
            }
            other => Err(DecodeError::UnknownType(other)),
        }
    }
}
