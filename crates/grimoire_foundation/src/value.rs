//! The scalar held in an attribute slot.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Text scalar stored in one slot of an attribute.
///
/// The host store keeps everything as text; callers interpret a value as a
/// number or a string as they need. Cloning is O(1).
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Value(Arc<str>);

impl Value {
    /// Creates a value from text.
    #[must_use]
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(Arc::from(text.as_ref()))
    }

    /// Returns the empty value.
    #[must_use]
    pub fn empty() -> Self {
        Self(Arc::from(""))
    }

    /// Returns the text of this value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads the leading integer of the text, the way sheet formulas do.
    ///
    /// Leading whitespace and a sign are accepted; anything after the digits
    /// is ignored (`"3rd"` reads as 3). Returns `None` when no digits lead.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        let text = self.0.trim_start();
        let sign = usize::from(matches!(text.as_bytes().first(), Some(b'-' | b'+')));
        let digits = text[sign..].bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        text[..sign + digits].parse().ok()
    }

    /// Reads the leading integer, falling back to `default`.
    #[must_use]
    pub fn int_or(&self, default: i64) -> i64 {
        self.as_int().unwrap_or(default)
    }

    /// Reads the text as a floating point number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }

    /// Compares against `other` ignoring case, whitespace, `-` and `_`.
    ///
    /// This is how names typed by players are matched against sheet entries.
    #[must_use]
    pub fn matches_loosely(&self, other: &str) -> bool {
        fn significant(s: &str) -> impl Iterator<Item = char> + '_ {
            s.chars()
                .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
                .flat_map(char::to_lowercase)
        }
        significant(&self.0).eq(significant(other))
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Self::new(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::from(n.to_string())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::from(n.to_string())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::from(n.to_string())
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
