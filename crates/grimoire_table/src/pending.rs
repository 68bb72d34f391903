//! The deferred flat-attribute queue.
//!
//! Flat attributes that do not exist yet cannot be created one at a time
//! cheaply, so they are collected per owner during a request and created in
//! one bulk call per owner at the end of it.

use std::collections::BTreeMap;
use std::mem;

use grimoire_foundation::{OwnerId, Slot, Value};
use grimoire_storage::PendingAttribute;

/// Flat attributes waiting for creation, grouped by owner.
#[derive(Clone, Debug, Default)]
pub struct PendingQueue {
    by_owner: BTreeMap<OwnerId, Vec<PendingAttribute>>,
}

impl PendingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one slot of one attribute.
    pub fn push(&mut self, owner: &OwnerId, name: impl Into<String>, slot: Slot, value: Value) {
        self.by_owner
            .entry(owner.clone())
            .or_default()
            .push(PendingAttribute::new(name, slot, value));
    }

    /// Returns the number of queued entries across all owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_owner.values().map(Vec::len).sum()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_owner.is_empty()
    }

    /// Returns the entries queued for one owner.
    #[must_use]
    pub fn for_owner(&self, owner: &OwnerId) -> &[PendingAttribute] {
        self.by_owner.get(owner).map_or(&[], Vec::as_slice)
    }

    /// Removes and returns everything queued, leaving the queue empty.
    ///
    /// Taking the whole map before any bulk call is made means entries queued
    /// while a flush is in progress land in a fresh queue.
    pub fn take(&mut self) -> BTreeMap<OwnerId, Vec<PendingAttribute>> {
        mem::take(&mut self.by_owner)
    }
}
