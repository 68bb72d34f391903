//! Owner identifiers.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of the record (a character) that owns a set of attributes.
///
/// The host store hands these out as opaque strings. Cloning is O(1).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OwnerId(Arc<str>);

impl OwnerId {
    /// Creates an owner id from its textual form.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the textual form of this id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.0)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_equality_is_textual() {
        assert_eq!(OwnerId::new("-M1"), OwnerId::from("-M1".to_string()));
        assert_ne!(OwnerId::new("-M1"), OwnerId::new("-m1"));
    }

    #[test]
    fn owner_display_and_debug() {
        let id = OwnerId::new("-Mxyz");
        assert_eq!(format!("{id}"), "-Mxyz");
        assert_eq!(format!("{id:?}"), "OwnerId(-Mxyz)");
    }
}
