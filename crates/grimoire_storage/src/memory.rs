//! In-process attribute store.
//!
//! Records are kept in one arena indexed by [`AttrId`], with a per-owner list
//! preserving creation order. Creation order is what table projection treats
//! as discovery order, so it must be stable.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use grimoire_foundation::{Error, ErrorKind, OwnerId, Result, Slot, Value};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::record::{AttrId, AttributeRef, NameFilter, PendingAttribute};
use crate::store::AttributeStore;

/// One stored attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct StoredAttribute {
    owner: OwnerId,
    name: Arc<str>,
    current: Option<Value>,
    max: Option<Value>,
}

impl StoredAttribute {
    fn slot(&self, slot: Slot) -> Option<&Value> {
        match slot {
            Slot::Current => self.current.as_ref(),
            Slot::Max => self.max.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Value> {
        match slot {
            Slot::Current => &mut self.current,
            Slot::Max => &mut self.max,
        }
    }
}

/// An [`AttributeStore`] held entirely in memory.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryStore {
    /// Every record ever created, indexed by `AttrId`.
    records: Vec<StoredAttribute>,
    /// Record ids per owner, in creation order.
    by_owner: BTreeMap<OwnerId, Vec<AttrId>>,
    /// Number of bulk creation requests served.
    #[cfg_attr(feature = "serde", serde(default))]
    bulk_requests: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of records across all owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records belonging to `owner`.
    #[must_use]
    pub fn owner_len(&self, owner: &OwnerId) -> usize {
        self.by_owner.get(owner).map_or(0, Vec::len)
    }

    /// Iterates over the owners that hold at least one record.
    pub fn owners(&self) -> impl Iterator<Item = &OwnerId> + '_ {
        self.by_owner.keys()
    }

    /// Returns the number of bulk creation requests served so far.
    #[must_use]
    pub fn bulk_requests(&self) -> usize {
        self.bulk_requests
    }

    /// Returns the physical name of a record.
    #[must_use]
    pub fn name(&self, id: AttrId) -> Option<&str> {
        self.records.get(id.0 as usize).map(|r| &*r.name)
    }

    /// Finds or creates an attribute and writes one of its slots.
    ///
    /// This is the host-side "set attribute" used by tests and the runtime to
    /// seed sheets; the engine itself goes through the deferred queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn set(
        &mut self,
        owner: &OwnerId,
        name: &str,
        slot: Slot,
        value: impl Into<Value>,
    ) -> Result<AttrId> {
        let id = match self.find_one(owner, name, true) {
            Some(id) => id,
            None => self.create(owner, name)?,
        };
        self.write(id, slot, value.into())?;
        Ok(id)
    }

    /// Lists an owner's attributes with both slots, in creation order.
    #[must_use]
    pub fn dump(&self, owner: &OwnerId) -> Vec<(Arc<str>, Option<Value>, Option<Value>)> {
        self.ids(owner)
            .iter()
            .filter_map(|id| self.records.get(id.0 as usize))
            .map(|r| (r.name.clone(), r.current.clone(), r.max.clone()))
            .collect()
    }

    fn ids(&self, owner: &OwnerId) -> &[AttrId] {
        self.by_owner.get(owner).map_or(&[], Vec::as_slice)
    }
}

impl AttributeStore for MemoryStore {
    fn find(&self, owner: &OwnerId, filter: &NameFilter<'_>) -> Vec<AttributeRef> {
        self.ids(owner)
            .iter()
            .filter_map(|id| {
                let record = self.records.get(id.0 as usize)?;
                filter.matches(&record.name).then(|| AttributeRef {
                    id: *id,
                    name: record.name.clone(),
                })
            })
            .collect()
    }

    fn create(&mut self, owner: &OwnerId, name: &str) -> Result<AttrId> {
        if name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidName(
                "attribute names cannot be empty".to_string(),
            )));
        }
        let id = AttrId(self.records.len() as u64);
        self.records.push(StoredAttribute {
            owner: owner.clone(),
            name: Arc::from(name),
            current: None,
            max: None,
        });
        self.by_owner.entry(owner.clone()).or_default().push(id);
        Ok(id)
    }

    fn read(&self, id: AttrId, slot: Slot) -> Option<Value> {
        self.records.get(id.0 as usize)?.slot(slot).cloned()
    }

    fn write(&mut self, id: AttrId, slot: Slot, value: Value) -> Result<()> {
        let record = self
            .records
            .get_mut(id.0 as usize)
            .ok_or_else(|| Error::internal(format!("no attribute record {id:?}")))?;
        *record.slot_mut(slot) = Some(value);
        Ok(())
    }

    fn create_many(
        &mut self,
        owner: &OwnerId,
        entries: &[PendingAttribute],
        replace: bool,
    ) -> Result<usize> {
        self.bulk_requests += 1;
        let mut created = HashSet::new();
        for entry in entries {
            let id = match self.find_one(owner, &entry.name, false) {
                Some(id) if created.contains(&id) || replace => id,
                Some(_) => {
                    debug!(owner = %owner, name = %entry.name, "Attribute already exists, not replacing");
                    continue;
                }
                None => {
                    let id = self.create(owner, &entry.name)?;
                    created.insert(id);
                    id
                }
            };
            self.write(id, entry.slot, entry.value.clone())?;
        }
        debug!(owner = %owner, created = created.len(), entries = entries.len(), "Bulk attribute creation");
        Ok(created.len())
    }
}
