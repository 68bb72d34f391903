//! Collision-resistant row identifiers.
//!
//! Identifiers are 20 characters from a 64-character alphabet whose order
//! matches ASCII sort order for the characters that matter: 8 characters of
//! millisecond timestamp, most significant first, followed by 12 random
//! characters. Inside one millisecond the random part is incremented rather
//! than redrawn, so identifiers from one generator sort in creation order.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ALPHABET: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
const STAMP_LEN: usize = 8;
const RANDOM_LEN: usize = 12;

/// The alphabet character row keys must not contain, and its replacement.
const SEPARATOR: char = '_';
const SEPARATOR_SUBSTITUTE: &str = "Z";

/// Source of wall-clock milliseconds.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// The identifier of one repeating row.
///
/// Row keys never contain `_`, which separates the parts of a cell name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(Arc<str>);

impl RowKey {
    /// Wraps an existing key.
    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether `token` can appear as a row key inside a cell name.
    #[must_use]
    pub fn is_valid(token: &str) -> bool {
        !token.is_empty()
            && token
                .bytes()
                .all(|b| b == b'-' || b.is_ascii_alphanumeric())
    }
}

impl fmt::Debug for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowKey({})", self.0)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates identifiers and row keys.
pub struct RowKeyGenerator {
    clock: Box<dyn Clock>,
    rng: ChaCha8Rng,
    last_millis: Option<u64>,
    digits: [u8; RANDOM_LEN],
    /// Row keys issued under the current timestamp, after substitution.
    issued: HashSet<Arc<str>>,
    issued_stamp: String,
}

impl RowKeyGenerator {
    /// Creates a generator seeded from system entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Creates a deterministic generator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            clock: Box::new(SystemClock),
            rng,
            last_millis: None,
            digits: [0; RANDOM_LEN],
            issued: HashSet::new(),
            issued_stamp: String::new(),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Generates a 20-character identifier.
    pub fn next_id(&mut self) -> String {
        let now = self.clock.now_millis();
        if self.last_millis == Some(now) {
            self.increment();
        } else {
            for digit in &mut self.digits {
                *digit = self.rng.gen_range(0..64);
            }
        }
        self.last_millis = Some(now);

        let mut stamp = [0u8; STAMP_LEN];
        let mut rest = now;
        for slot in stamp.iter_mut().rev() {
            *slot = ALPHABET[(rest % 64) as usize];
            rest /= 64;
        }

        stamp
            .iter()
            .copied()
            .chain(self.digits.iter().map(|&d| ALPHABET[d as usize]))
            .map(char::from)
            .collect()
    }

    /// Generates a row key: an identifier with `_` replaced.
    ///
    /// The replacement can make two identifiers from the same millisecond
    /// equal, so keys already issued under the current timestamp are skipped.
    pub fn next_row_key(&mut self) -> RowKey {
        loop {
            let key = self.next_id().replace(SEPARATOR, SEPARATOR_SUBSTITUTE);
            let stamp = &key[..STAMP_LEN];
            if stamp != self.issued_stamp {
                self.issued_stamp = stamp.to_string();
                self.issued.clear();
            }
            let key: Arc<str> = Arc::from(key);
            if self.issued.insert(key.clone()) {
                return RowKey(key);
            }
        }
    }

    /// Adds one to the random part, carrying from the last character.
    fn increment(&mut self) {
        for digit in self.digits.iter_mut().rev() {
            if *digit == 63 {
                *digit = 0;
            } else {
                *digit += 1;
                return;
            }
        }
    }
}

impl Default for RowKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RowKeyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowKeyGenerator")
            .field("last_millis", &self.last_millis)
            .field("issued", &self.issued.len())
            .finish_non_exhaustive()
    }
}
