//! Configuration tree handed to the face system.
//!
//! A `ConfigSection` is one already-parsed table plus its dotted path, used
//! to name the offending option in errors. Syntax parsing lives in the
//! adapters; this module only reads values out of the tree.

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::error::ConfigError;

/// One named table of the configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSection {
    path: String,
    table: Table,
}

impl ConfigSection {
    pub fn new(path: impl Into<String>, table: Table) -> Self {
        Self {
            path: path.into(),
            table,
        }
    }

    /// An empty section at `path`.
    pub fn empty(path: impl Into<String>) -> Self {
        Self::new(path, Table::new())
    }

    /// Dotted path of this section, e.g. `face_system.internal`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// The sub-table at `key`, or `None` when absent.
    pub fn subsection(&self, key: &str) -> Result<Option<ConfigSection>, ConfigError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Table(table)) => Ok(Some(Self::new(self.child_path(key), table.clone()))),
            Some(other) => Err(self.mismatch(key, "a section", other)),
        }
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.mismatch(key, "a string", other)),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(other) => Err(self.mismatch(key, "a boolean", other)),
        }
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Integer(i)) => u64::try_from(*i)
                .map(Some)
                .map_err(|_| self.invalid(key, format!("{i} is negative"))),
            Some(other) => Err(self.mismatch(key, "an integer", other)),
        }
    }

    /// Deserialize the whole section into a typed options struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Value::Table(self.table.clone())
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidValue {
                path: self.path.clone(),
                reason: e.message().to_string(),
            })
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn mismatch(&self, key: &str, expected: &str, found: &Value) -> ConfigError {
        self.invalid(key, format!("expected {expected}, found {}", found.type_str()))
    }

    fn invalid(&self, key: &str, reason: String) -> ConfigError {
        ConfigError::InvalidValue {
            path: self.child_path(key),
            reason,
        }
    }
}

/// State threaded through one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    /// Validate only; apply nothing.
    pub is_dry_run: bool,
}

impl ConfigContext {
    pub fn new(is_dry_run: bool) -> Self {
        Self { is_dry_run }
    }
}
