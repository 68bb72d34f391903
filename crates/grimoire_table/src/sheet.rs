//! The per-request engine context.

use grimoire_foundation::{Error, ErrorKind, OwnerId, Result, Slot, Value};
use grimoire_storage::AttributeStore;
use tracing::{debug, error, info};

use crate::config::EngineConfig;
use crate::pending::PendingQueue;
use crate::rowkey::RowKeyGenerator;

/// A store together with everything one request needs to work on it.
///
/// All table operations go through a `Sheet`: it owns the row-key generator
/// and the queue of flat attributes waiting to be created. Call
/// [`flush`](Self::flush) once at the end of a request.
#[derive(Debug)]
pub struct Sheet<S: AttributeStore> {
    pub(crate) store: S,
    pub(crate) keys: RowKeyGenerator,
    pub(crate) pending: PendingQueue,
    pub(crate) config: EngineConfig,
}

impl<S: AttributeStore> Sheet<S> {
    /// Creates a sheet with the default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Creates a sheet with the given configuration.
    #[must_use]
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        let keys = match config.seed {
            Some(seed) => RowKeyGenerator::seeded(seed),
            None => RowKeyGenerator::new(),
        };
        Self {
            store,
            keys,
            pending: PendingQueue::new(),
            config,
        }
    }

    /// Replaces the row-key generator.
    #[must_use]
    pub fn with_row_keys(mut self, keys: RowKeyGenerator) -> Self {
        self.keys = keys;
        self
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the store mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the sheet, returning the store. Unflushed entries are lost.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the queue of flat attributes awaiting creation.
    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    /// Returns the row-key generator.
    pub fn row_keys(&mut self) -> &mut RowKeyGenerator {
        &mut self.keys
    }

    /// Reads one slot of a flat attribute.
    pub fn read_flat(&self, owner: &OwnerId, name: &str, slot: Slot) -> Option<Value> {
        self.store
            .read_named(owner, name, slot, self.config.case_sensitive)
    }

    /// Reads the leading integer of a flat attribute, or `default`.
    pub fn read_int(&self, owner: &OwnerId, name: &str, slot: Slot, default: i64) -> i64 {
        self.read_flat(owner, name, slot)
            .map_or(default, |v| v.int_or(default))
    }

    /// Writes a flat attribute, queueing its creation if it does not exist.
    ///
    /// Queued attributes become visible after [`flush`](Self::flush).
    ///
    /// # Errors
    ///
    /// Returns an error if an existing attribute cannot be written.
    pub fn ensure_flat_attribute(
        &mut self,
        owner: &OwnerId,
        name: &str,
        slot: Slot,
        value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into();
        match self.store.find_one(owner, name, self.config.case_sensitive) {
            Some(id) => self.store.write(id, slot, value),
            None => {
                debug!(owner = %owner, name, %slot, %value, "Queueing flat attribute");
                self.pending.push(owner, name, slot, value);
                Ok(())
            }
        }
    }

    /// Creates everything in the queue, one bulk request per owner.
    ///
    /// The queue is emptied before the first request is made. Every owner is
    /// attempted even if an earlier one fails. Returns the number of records
    /// created.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::FlushFailed`] naming each owner whose request
    /// failed.
    pub fn flush(&mut self, replace: bool) -> Result<usize> {
        let batches = self.pending.take();
        if batches.is_empty() {
            return Ok(0);
        }

        let mut created = 0;
        let mut failed = Vec::new();
        for (owner, entries) in batches {
            match self.store.create_many(&owner, &entries, replace) {
                Ok(count) => {
                    created += count;
                    if self.config.announce_flushes {
                        info!(owner = %owner, entries = entries.len(), created = count, "Created pending attributes");
                    } else {
                        debug!(owner = %owner, entries = entries.len(), created = count, "Created pending attributes");
                    }
                }
                Err(err) => {
                    error!(owner = %owner, error = %err, "Failed to create pending attributes");
                    failed.push(owner.to_string());
                }
            }
        }

        if failed.is_empty() {
            Ok(created)
        } else {
            Err(Error::new(ErrorKind::FlushFailed { owners: failed }))
        }
    }
}
