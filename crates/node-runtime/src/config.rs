//! # Node Configuration
//!
//! The daemon reads one TOML document:
//!
//! ```toml
//! [runtime]
//! log_level = "info"
//! poll_interval_ms = 10
//!
//! [[runtime.faces]]
//! uri = "internal://"
//! persistency = "permanent"
//!
//! [face_system.internal]
//! max_faces = 64
//! ```
//!
//! `[runtime]` belongs to the daemon. `[face_system]` is handed unchanged to
//! the face system, whose factories validate their own subsections.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use face_system::adapters::config::{face_system_section, parse_document};
use face_system::ConfigSection;
use serde::Deserialize;
use shared_types::FacePersistency;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "FWD_CONFIG";

/// Used when neither an argument nor the environment names a file.
pub const DEFAULT_CONFIG_PATH: &str = "fwd.toml";

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeConfig {
    /// Daemon settings.
    pub runtime: RuntimeConfig,
    /// The `[face_system]` table, unvalidated.
    pub face_system: ConfigSection,
}

/// The `[runtime]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// How often faces are polled for buffered input.
    pub poll_interval_ms: u64,
    /// Faces created once at startup.
    pub faces: Vec<StaticFace>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            poll_interval_ms: 10,
            faces: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// One `[[runtime.faces]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticFace {
    pub uri: String,
    #[serde(default = "default_persistency")]
    pub persistency: FacePersistency,
    #[serde(default)]
    pub local_fields: bool,
}

fn default_persistency() -> FacePersistency {
    FacePersistency::Persistent
}

impl NodeConfig {
    /// Parse a configuration document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let document = parse_document(text)?;

        let runtime = match document.get("runtime") {
            None => RuntimeConfig::default(),
            Some(value) => RuntimeConfig::deserialize(value.clone())
                .context("invalid [runtime] section")?,
        };
        let face_system = face_system_section(&document)?;

        Ok(Self {
            runtime,
            face_system,
        })
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("failed to load {}", path.display()))
    }
}

/// Pick the configuration file: first argument, then `FWD_CONFIG`, then
/// `fwd.toml`.
pub fn resolve_config_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}
