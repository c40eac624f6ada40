//! # Service Layer
//!
//! - `Face` - one endpoint, its counters and its events
//! - `FaceTable` - registered faces and id assignment
//! - `FaceSystem` - factory registry and configuration reconciliation

pub mod face;
pub mod face_system;
pub mod face_table;

pub use face::Face;
pub use face_system::{FaceSystem, INTERNAL_FACTORY};
pub use face_table::FaceTable;
