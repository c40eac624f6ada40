//! # Shared Types Crate
//!
//! Packet-level types exchanged between faces, transports and the forwarding
//! core. Nothing here knows about faces; the face system and the daemon both
//! depend on this crate.
//!
//! - `tlv` - delineated Type-Length-Value blocks
//! - `packet` - `Name`, `Interest`, `Data`, `Packet`
//! - `persistency` - `FacePersistency`

pub mod packet;
pub mod persistency;
pub mod tlv;

pub use packet::{Data, Interest, Name, Packet};
pub use persistency::{FacePersistency, ParsePersistencyError};
pub use tlv::{Block, TlvError};

/// Largest packet a face will accept from a transport.
pub const MAX_PACKET_SIZE: usize = 8800;
