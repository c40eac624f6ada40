//! Configuration document loading.
//!
//! Parses TOML text and extracts the `[face_system]` table. Sections
//! belonging to other daemon components are ignored here.

use toml::{Table, Value};

use crate::domain::ConfigSection;
use crate::error::ConfigError;

/// Top-level key of the face system configuration.
pub const FACE_SYSTEM_SECTION: &str = "face_system";

/// Parse a whole configuration document.
pub fn parse_document(text: &str) -> Result<Table, ConfigError> {
    text.parse::<Table>()
        .map_err(|e| ConfigError::Parse(e.message().to_string()))
}

/// Extract the face system section from a parsed document.
///
/// An absent section yields an empty one, so every factory still sees its
/// pass with no subsection.
pub fn face_system_section(document: &Table) -> Result<ConfigSection, ConfigError> {
    match document.get(FACE_SYSTEM_SECTION) {
        None => Ok(ConfigSection::empty(FACE_SYSTEM_SECTION)),
        Some(Value::Table(table)) => Ok(ConfigSection::new(FACE_SYSTEM_SECTION, table.clone())),
        Some(other) => Err(ConfigError::InvalidValue {
            path: FACE_SYSTEM_SECTION.to_string(),
            reason: format!("expected a section, found {}", other.type_str()),
        }),
    }
}

/// Parse `text` and return its face system section.
pub fn load_face_system_section(text: &str) -> Result<ConfigSection, ConfigError> {
    face_system_section(&parse_document(text)?)
}
