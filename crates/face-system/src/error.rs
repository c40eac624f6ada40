//! Error types for the face system.

use shared_types::TlvError;
use thiserror::Error;

use crate::domain::FaceId;

/// Errors raised while reconciling configuration.
///
/// Any of these aborts the current reload; previously committed state stays
/// in effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A subsection names no registered factory.
    #[error("unrecognized section {parent}.{name}")]
    UnrecognizedSection { parent: String, name: String },

    /// An option is present but its value is unusable.
    #[error("invalid value for {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    /// A factory was registered twice under the same name.
    #[error("protocol factory {0} is already registered")]
    DuplicateFactory(String),

    /// Two factories provide the same scheme after a commit.
    #[error("scheme {scheme} is provided by both {first} and {second}")]
    SchemeConflict {
        scheme: String,
        first: String,
        second: String,
    },

    /// The configuration document itself could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Failure delivered to a face creation request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("face creation failed ({status}): {reason}")]
pub struct CreationError {
    /// Management status code.
    pub status: u32,
    /// Human-readable reason.
    pub reason: String,
}

impl CreationError {
    pub fn new(status: u32, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::new(400, reason)
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::new(403, reason)
    }

    pub fn not_acceptable(reason: impl Into<String>) -> Self {
        Self::new(406, reason)
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(500, reason)
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::new(504, reason)
    }
}

/// Errors from parsing a `FaceUri`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaceUriError {
    #[error("missing \"://\" separator in {0:?}")]
    MissingSeparator(String),

    #[error("invalid scheme {0:?}")]
    InvalidScheme(String),

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("invalid host {0:?}")]
    InvalidHost(String),

    #[error("invalid character in {0:?}")]
    InvalidCharacter(String),
}

/// Errors from the packet decoder port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown packet type {0:#x}")]
    UnknownType(u64),

    #[error("packet has no name")]
    MissingName,

    #[error("packet too large: {size} bytes")]
    TooLarge { size: usize },

    #[error("malformed TLV: {0}")]
    Malformed(#[from] TlvError),
}

/// Errors reported by a transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,

    #[error("transport failure: {0}")]
    Failed(String),
}

/// Errors from face table operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaceTableError {
    #[error("face already registered as {0}")]
    AlreadyRegistered(FaceId),

    #[error("face id {0} is not in the reserved range")]
    NotReserved(FaceId),

    #[error("face id {0} is already in use")]
    IdInUse(FaceId),
}

/// Errors from face attribute changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaceError {
    #[error("face {0} is registered; attribute is frozen")]
    Registered(FaceId),
}
