//! Configuration for the table engine.

/// Prefix of the flat attribute that persists a table's row order.
pub const DEFAULT_ROW_ORDER_PREFIX: &str = "_reporder_";

/// Configuration for a [`Sheet`](crate::Sheet).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Seed for the row-key generator; `None` draws from system entropy.
    pub seed: Option<u64>,

    /// Whether attribute names are matched with ASCII case significant.
    pub case_sensitive: bool,

    /// Prefix of the attributes holding persisted row orders.
    pub row_order_prefix: String,

    /// Whether queue flushes log at info level rather than debug.
    pub announce_flushes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            case_sensitive: false,
            row_order_prefix: DEFAULT_ROW_ORDER_PREFIX.to_string(),
            announce_flushes: false,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a deterministic configuration for tests and replays.
    #[must_use]
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Builder method to set the row-key seed.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set case sensitivity.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Builder method to set the row-order prefix.
    #[must_use]
    pub fn with_row_order_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.row_order_prefix = prefix.into();
        self
    }

    /// Builder method to log flushes at info level.
    #[must_use]
    pub fn with_announce_flushes(mut self, announce: bool) -> Self {
        self.announce_flushes = announce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.seed, None);
        assert!(!config.case_sensitive);
        assert_eq!(config.row_order_prefix, "_reporder_");
    }

    #[test]
    fn builders() {
        let config = EngineConfig::deterministic(4)
            .with_case_sensitive(true)
            .with_row_order_prefix("_order_");
        assert_eq!(config.seed, Some(4));
        assert!(config.case_sensitive);
        assert_eq!(config.row_order_prefix, "_order_");
    }
}
