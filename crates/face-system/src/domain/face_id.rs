//! Face identifiers.

use std::fmt;

/// Stable numeric handle of a registered face.
///
/// Only the face table hands these out. A face that has not been registered
/// carries `FaceId::INVALID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(u64);

impl FaceId {
    /// Sentinel for "not registered".
    pub const INVALID: FaceId = FaceId(0);
    /// Reserved: forwarder-internal face.
    pub const INTERNAL: FaceId = FaceId(1);
    /// Reserved: content store.
    pub const CONTENT_STORE: FaceId = FaceId(254);
    /// Reserved: packet sink.
    pub const NULL: FaceId = FaceId(255);
    /// First id assigned to ordinary faces.
    pub const FIRST_DYNAMIC: FaceId = FaceId(256);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 != Self::INVALID.0
    }

    /// Whether the id lies in the reserved range below `FIRST_DYNAMIC`.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        self.is_valid() && self.0 < Self::FIRST_DYNAMIC.0
    }

    pub(crate) fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for FaceId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_is_default() {
        assert_eq!(FaceId::default(), FaceId::INVALID);
        assert!(!FaceId::INVALID.is_valid());
        assert!(!FaceId::INVALID.is_reserved());
    }

    #[test]
    fn test_reserved_range() {
        assert!(FaceId::NULL.is_reserved());
        assert!(FaceId::INTERNAL.is_reserved());
        assert!(!FaceId::FIRST_DYNAMIC.is_reserved());
    }
}
