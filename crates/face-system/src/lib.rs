//! # Face System
//!
//! Uniform endpoint abstraction and runtime configuration for a packet
//! forwarding daemon.
//!
//! A `Face` is one bidirectional endpoint exchanging Interest and Data
//! packets with a remote party. Faces are produced by protocol factories,
//! one per transport family, which the `FaceSystem` registers by name and
//! reconfigures in two phases: every factory validates its section in a dry
//! run, and only then does every factory apply it. Once applied, the
//! factories' URI schemes are collected into the table used to route face
//! creation requests.
//!
//! ## Architecture
//!
//! - **Domain Layer:** ids, locators, counters, event emitters, config tree
//! - **Ports Layer:** `ProtocolFactory`, `Transport`, `Channel`, `PacketDecoder`
//! - **Service Layer:** `Face`, `FaceTable`, `FaceSystem`
//! - **Adapters Layer:** TLV decoder, TOML loading, null and internal transports
//!
//! ## Example
//!
//! ```rust
//! use face_system::{load_face_system_section, CreationError, Face, FaceSystem, FaceTable};
//! use face_system::shared_types::FacePersistency;
//! use std::sync::{Arc, Mutex};
//!
//! let section = load_face_system_section("[face_system.internal]\nmax_faces = 8\n").unwrap();
//! let mut system = FaceSystem::with_default_factories();
//! system.reload(&section).unwrap();
//!
//! let created = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&created);
//! system.create_face(
//!     "internal://",
//!     FacePersistency::Persistent,
//!     false,
//!     Box::new(move |face: Face| sink.lock().unwrap().push(face)),
//!     Box::new(|err: CreationError| panic!("{err}")),
//! );
//!
//! let mut table = FaceTable::new();
//! for face in created.lock().unwrap().drain(..) {
//!     let id = table.add(face).unwrap();
//!     assert!(id.is_valid());
//! }
//! assert_eq!(table.len(), 1);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use shared_types;

// Domain
pub use domain::{
    ByteCounter, ConfigContext, ConfigSection, EventEmitter, FaceCounters, FaceId, FaceUri,
    PacketCounter, Subscription,
};

// Errors
pub use error::{
    ConfigError, CreationError, DecodeError, FaceError, FaceTableError, FaceUriError,
    TransportError,
};

// Ports
pub use ports::{
    Channel, CreateFaceCompletion, CreateFaceRequest, FaceCreatedCallback,
    FaceCreationFailedCallback, PacketDecoder, ProtocolFactory, Transport,
};

// Service
pub use service::{Face, FaceSystem, FaceTable, INTERNAL_FACTORY};

// Adapters
pub use adapters::{
    load_face_system_section, InternalChannel, InternalClient, InternalFactory, NullTransport,
    TlvPacketDecoder, FACE_SYSTEM_SECTION,
};
