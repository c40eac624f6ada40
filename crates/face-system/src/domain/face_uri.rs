//! # FaceUri
//!
//! Parsed endpoint locator of the form `scheme://authority[path]`, where the
//! authority is `host[:port]` and IPv6 hosts are bracketed:
//!
//! ```text
//! udp4://192.0.2.1:6363
//! tcp6://[2001:db8::1]:6363
//! internal://app/producer
//! fd://3
//! ```
//!
//! Equality, hashing and ordering all use the canonical string, so a
//! `FaceUri` can be used directly as a map or sort key.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{Ipv6Addr, SocketAddr};
use std::str::FromStr;

use crate::error::FaceUriError;

/// Immutable parsed endpoint locator.
#[derive(Debug, Clone)]
pub struct FaceUri {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
    canonical: String,
}

impl FaceUri {
    /// Parse a locator string.
    pub fn parse(input: &str) -> Result<Self, FaceUriError> {
        if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(FaceUriError::InvalidCharacter(input.to_string()));
        }

        let (scheme, rest) = input
            .split_once("://")
            .ok_or_else(|| FaceUriError::MissingSeparator(input.to_string()))?;
        if !is_valid_scheme(scheme) {
            return Err(FaceUriError::InvalidScheme(scheme.to_string()));
        }

        let (authority, path) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        let (host, port) = parse_authority(authority)?;

        Ok(Self::build(scheme, host, port, path))
    }

    /// `udp4://` or `udp6://` locator for a socket address.
    #[must_use]
    pub fn from_udp(addr: SocketAddr) -> Self {
        Self::from_socket("udp", addr)
    }

    /// `tcp4://` or `tcp6://` locator for a socket address.
    #[must_use]
    pub fn from_tcp(addr: SocketAddr) -> Self {
        Self::from_socket("tcp", addr)
    }

    /// `fd://N` locator for a file descriptor.
    #[must_use]
    pub fn from_fd(fd: i32) -> Self {
        Self::build("fd", &fd.to_string(), None, "")
    }

    fn from_socket(base: &str, addr: SocketAddr) -> Self {
        let (scheme, host) = match addr {
            SocketAddr::V4(v4) => (format!("{base}4"), v4.ip().to_string()),
            SocketAddr::V6(v6) => (format!("{base}6"), v6.ip().to_string()),
        };
        Self::build(&scheme, &host, Some(addr.port()), "")
    }

    /// Assemble from already-validated parts.
    pub(crate) fn build(scheme: &str, host: &str, port: Option<u16>, path: &str) -> Self {
        let scheme = scheme.to_ascii_lowercase();
        let mut canonical = format!("{scheme}://");
        if host.contains(':') {
            canonical.push('[');
            canonical.push_str(host);
            canonical.push(']');
        } else {
            canonical.push_str(host);
        }
        if let Some(port) = port {
            canonical.push(':');
            canonical.push_str(&port.to_string());
        }
        canonical.push_str(path);

        Self {
            scheme,
            host: host.to_string(),
            port,
            path: path.to_string(),
            canonical,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `host[:port]`, with IPv6 hosts bracketed.
    pub fn authority(&self) -> &str {
        let start = self.scheme.len() + 3;
        let end = self.canonical.len() - self.path.len();
        &self.canonical[start..end]
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse_authority(authority: &str) -> Result<(&str, Option<u16>), FaceUriError> {
    let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
        let (host, after) = bracketed
            .split_once(']')
            .ok_or_else(|| FaceUriError::InvalidHost(authority.to_string()))?;
        if host.parse::<Ipv6Addr>().is_err() {
            return Err(FaceUriError::InvalidHost(authority.to_string()));
        }
        let port = match after {
            "" => None,
            _ => Some(
                after
                    .strip_prefix(':')
                    .ok_or_else(|| FaceUriError::InvalidHost(authority.to_string()))?,
            ),
        };
        (host, port)
    } else {
        match authority.split_once(':') {
            Some((_, port)) if port.contains(':') => {
                return Err(FaceUriError::InvalidHost(authority.to_string()))
            }
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        }
    };

    if host.contains(['[', ']', '@']) {
        return Err(FaceUriError::InvalidHost(authority.to_string()));
    }

    let port = port
        .map(|p| {
            p.parse::<u16>()
                .map_err(|_| FaceUriError::InvalidPort(p.to_string()))
        })
        .transpose()?;

    Ok((host, port))
}

impl fmt::Display for FaceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for FaceUri {
    type Err = FaceUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for FaceUri {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for FaceUri {}

impl Hash for FaceUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for FaceUri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FaceUri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}
