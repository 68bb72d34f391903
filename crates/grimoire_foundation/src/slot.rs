//! The two value slots every attribute carries.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};

/// Which of an attribute's two independently settable values is addressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slot {
    /// The `current` value.
    Current,
    /// The `max` value.
    Max,
}

impl Slot {
    /// Returns the slot's name as the host store spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Max => "max",
        }
    }

    /// Returns the other slot.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Current => Self::Max,
            Self::Max => Self::Current,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("current") {
            Ok(Self::Current)
        } else if s.eq_ignore_ascii_case("max") {
            Ok(Self::Max)
        } else {
            Err(Error::new(ErrorKind::Command(format!(
                "unknown slot '{s}': expected current or max"
            ))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Current".parse::<Slot>().unwrap(), Slot::Current);
        assert_eq!("MAX".parse::<Slot>().unwrap(), Slot::Max);
        assert!("value".parse::<Slot>().is_err());
    }

    #[test]
    fn other_slot() {
        assert_eq!(Slot::Current.other(), Slot::Max);
        assert_eq!(Slot::Max.other(), Slot::Current);
    }
}
