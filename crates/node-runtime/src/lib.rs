//! # Node Runtime Library
//!
//! Internals of the forwarding daemon, exposed for testing. The entry point
//! is the `node-runtime` binary in `main.rs`.
//!
//! - `config` - the daemon's TOML document and config file resolution
//! - `runtime` - face system and face table on the processing context

pub mod config;
pub mod runtime;

pub use config::{resolve_config_path, NodeConfig, RuntimeConfig, StaticFace};
pub use runtime::{FaceEvent, NodeRuntime};
