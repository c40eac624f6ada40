//! # Driven Ports (Outbound SPI)
//!
//! What the face system needs from transport implementations and from the
//! wire codec. Concrete socket handling lives behind these traits.

use shared_types::{Block, Packet};

use crate::domain::FaceUri;
use crate::error::{DecodeError, TransportError};

/// Per-face byte pipe owned by a `Face`.
///
/// Implementations that perform I/O on other threads must hand results back
/// to the processing context before calling into the face.
pub trait Transport: Send {
    /// Queue one packet for transmission.
    fn send(&mut self, packet: &Packet) -> Result<(), TransportError>;

    /// Stop all communication and release resources. Idempotent.
    fn close(&mut self);

    /// Take the next delineated element received from the peer, if any.
    fn poll_receive(&mut self) -> Option<Block> {
        None
    }

    /// Whether a packet sent here may reach more than one peer.
    fn is_multi_access(&self) -> bool {
        false
    }

    /// Whether the underlying link is up.
    fn is_up(&self) -> bool {
        true
    }
}

/// Classifies and parses one wire element.
pub trait PacketDecoder: Send + Sync {
    fn decode(&self, block: &Block) -> Result<Packet, DecodeError>;
}

/// Factory-owned listening or dialing endpoint.
///
/// Exposed through `ProtocolFactory::get_channels` for diagnostics only.
pub trait Channel: Send + Sync {
    /// Local endpoint of the channel.
    fn uri(&self) -> &FaceUri;

    /// Number of live faces produced by this channel.
    fn size(&self) -> usize;

    /// Whether the channel accepts inbound connections.
    fn is_listening(&self) -> bool;
}
