//! # Adapters Layer
//!
//! Concrete implementations of the ports:
//!
//! - `tlv_decoder` - default `PacketDecoder` over TLV blocks
//! - `config` - TOML document loading for the `face_system` section
//! - `null_transport` - transport that drops everything
//! - `internal` - in-process faces for local applications

pub mod config;
pub mod internal;
pub mod null_transport;
pub mod tlv_decoder;

pub use config::{load_face_system_section, FACE_SYSTEM_SECTION};
pub use internal::{InternalChannel, InternalClient, InternalFactory};
pub use null_transport::NullTransport;
pub use tlv_decoder::TlvPacketDecoder;
