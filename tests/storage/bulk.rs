//! Integration tests for bulk attribute creation

use grimoire_foundation::{OwnerId, Slot, Value};
use grimoire_storage::{AttributeStore, MemoryStore, PendingAttribute};

#[test]
fn one_request_creates_each_name_once() {
    let owner = OwnerId::new("-Mchar");
    let mut store = MemoryStore::new();
    let entries = [
        PendingAttribute::new("mi-power-Fly", Slot::Current, "0"),
        PendingAttribute::new("mi-power-Fly", Slot::Max, "61"),
        PendingAttribute::new("spell-level1-castable", Slot::Current, "4"),
    ];

    let created = store.create_many(&owner, &entries, false).unwrap();

    assert_eq!(created, 2);
    assert_eq!(store.bulk_requests(), 1);
    assert_eq!(
        store.read_named(&owner, "mi-power-Fly", Slot::Max, true),
        Some(Value::new("61"))
    );
}

#[test]
fn existing_names_update_only_on_replace() {
    let owner = OwnerId::new("-Mchar");
    let mut store = MemoryStore::new();
    store.set(&owner, "HP", Slot::Current, "10").unwrap();
    let entries = [PendingAttribute::new("HP", Slot::Current, "12")];

    assert_eq!(store.create_many(&owner, &entries, false).unwrap(), 0);
    assert_eq!(store.read_named(&owner, "HP", Slot::Current, true), Some(Value::new("10")));

    assert_eq!(store.create_many(&owner, &entries, true).unwrap(), 0);
    assert_eq!(store.read_named(&owner, "HP", Slot::Current, true), Some(Value::new("12")));
    assert_eq!(store.len(), 1);
}
