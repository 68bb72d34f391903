//! Attribute handles, name filters, and pending creations.

use std::fmt;
use std::sync::Arc;

use grimoire_foundation::{Slot, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle to one attribute record in a store.
///
/// Records are never deleted, so a handle stays valid for the store's lifetime.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttrId(pub(crate) u64);

impl AttrId {
    /// Creates a handle from a raw index.
    ///
    /// Stores other than [`MemoryStore`](crate::MemoryStore) use this to mint
    /// their own handles.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttrId({})", self.0)
    }
}

/// A record handle together with its physical name, as returned by a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeRef {
    /// The record handle.
    pub id: AttrId,
    /// The record's physical attribute name.
    pub name: Arc<str>,
}

/// Which of an owner's attributes a search should return.
#[derive(Clone, Copy, Debug)]
pub enum NameFilter<'a> {
    /// Every attribute of the owner.
    All,
    /// The attribute with exactly this name.
    Exact {
        /// Name to match.
        name: &'a str,
        /// When false, ASCII case is ignored.
        case_sensitive: bool,
    },
    /// Attributes whose name starts with this prefix.
    Prefix {
        /// Prefix to match.
        prefix: &'a str,
        /// When false, ASCII case is ignored.
        case_sensitive: bool,
    },
}

impl NameFilter<'_> {
    /// Checks whether a physical name passes this filter.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match *self {
            Self::All => true,
            Self::Exact {
                name,
                case_sensitive: true,
            } => candidate == name,
            Self::Exact {
                name,
                case_sensitive: false,
            } => candidate.eq_ignore_ascii_case(name),
            Self::Prefix {
                prefix,
                case_sensitive,
            } => candidate.get(..prefix.len()).is_some_and(|head| {
                if case_sensitive {
                    head == prefix
                } else {
                    head.eq_ignore_ascii_case(prefix)
                }
            }),
        }
    }
}

/// One flat attribute waiting to be created in a bulk request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PendingAttribute {
    /// Physical attribute name.
    pub name: String,
    /// Slot to write.
    pub slot: Slot,
    /// Value to write.
    pub value: Value,
}

impl PendingAttribute {
    /// Creates a pending attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, slot: Slot, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            slot,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_filter_respects_case_flag() {
        let sensitive = NameFilter::Exact {
            name: "Spell-Level1-Total",
            case_sensitive: true,
        };
        let insensitive = NameFilter::Exact {
            name: "Spell-Level1-Total",
            case_sensitive: false,
        };
        assert!(!sensitive.matches("spell-level1-total"));
        assert!(insensitive.matches("spell-level1-total"));
        assert!(!insensitive.matches("spell-level1-totals"));
    }

    #[test]
    fn prefix_filter() {
        let filter = NameFilter::Prefix {
            prefix: "repeating_spells",
            case_sensitive: false,
        };
        assert!(filter.matches("repeating_spells4_-abc_spellname4"));
        assert!(filter.matches("REPEATING_SPELLS_-abc_spellname"));
        assert!(!filter.matches("repeating_potions_-abc_potion"));
        assert!(!filter.matches("rep"));
    }
}
