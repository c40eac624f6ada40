//! Domain Layer - Pure face-system types with no I/O
//!
//! - Face identifiers and endpoint locators
//! - Per-face traffic counters
//! - Synchronous event fan-out
//! - The configuration tree and per-pass context

pub mod config;
pub mod counters;
pub mod event_emitter;
pub mod face_id;
pub mod face_uri;

pub use config::{ConfigContext, ConfigSection};
pub use counters::{ByteCounter, FaceCounters, PacketCounter};
pub use event_emitter::{EventEmitter, Subscription};
pub use face_id::FaceId;
pub use face_uri::FaceUri;
