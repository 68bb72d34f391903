//! The boundary to the host's flat attribute store.

use grimoire_foundation::{OwnerId, Result, Slot, Value};

use crate::record::{AttrId, AttributeRef, NameFilter, PendingAttribute};

/// A flat, sparse key/value store of dual-slot attributes scoped to owners.
///
/// The store knows nothing about tables, rows or ordering; all of that is
/// synthesized above it from attribute naming conventions. Calls are
/// synchronous and the host is single-threaded, so implementations need no
/// interior locking.
pub trait AttributeStore {
    /// Returns the owner's attributes passing `filter`, in creation order.
    fn find(&self, owner: &OwnerId, filter: &NameFilter<'_>) -> Vec<AttributeRef>;

    /// Creates a new attribute with both slots unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the creation.
    fn create(&mut self, owner: &OwnerId, name: &str) -> Result<AttrId>;

    /// Reads one slot of a record.
    ///
    /// Returns `None` if the record does not exist or the slot was never set.
    fn read(&self, id: AttrId, slot: Slot) -> Option<Value>;

    /// Writes one slot of a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    fn write(&mut self, id: AttrId, slot: Slot, value: Value) -> Result<()>;

    /// Creates many flat attributes for one owner in a single request.
    ///
    /// Entries naming an attribute that already exists update it when
    /// `replace` is true and are skipped otherwise. Several entries may name
    /// the same attribute (typically its `current` and its `max`).
    ///
    /// Returns the number of records created.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the request.
    fn create_many(
        &mut self,
        owner: &OwnerId,
        entries: &[PendingAttribute],
        replace: bool,
    ) -> Result<usize>;

    /// Finds a single attribute by exact name.
    fn find_one(&self, owner: &OwnerId, name: &str, case_sensitive: bool) -> Option<AttrId> {
        self.find(
            owner,
            &NameFilter::Exact {
                name,
                case_sensitive,
            },
        )
        .first()
        .map(|found| found.id)
    }

    /// Reads one slot of an attribute addressed by name.
    fn read_named(
        &self,
        owner: &OwnerId,
        name: &str,
        slot: Slot,
        case_sensitive: bool,
    ) -> Option<Value> {
        self.find_one(owner, name, case_sensitive)
            .and_then(|id| self.read(id, slot))
    }
}
