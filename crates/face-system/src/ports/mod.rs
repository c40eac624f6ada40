//! # Ports Layer
//!
//! - **Driving side:** `ProtocolFactory`, implemented once per transport family
//!   and driven by the face system.
//! - **Driven side:** `Transport`, `PacketDecoder` and `Channel`, supplied by
//!   concrete transports and the wire codec.

pub mod factory;
pub mod outbound;

pub use factory::{
    CreateFaceCompletion, CreateFaceRequest, FaceCreatedCallback, FaceCreationFailedCallback,
    ProtocolFactory,
};
pub use outbound::{Channel, PacketDecoder, Transport};
