//! Integration tests for attribute records and searches

use grimoire_foundation::{OwnerId, Slot, Value};
use grimoire_storage::{AttributeStore, MemoryStore, NameFilter};

fn owner() -> OwnerId {
    OwnerId::new("-Mchar")
}

// =============================================================================
// Dual Slots
// =============================================================================

#[test]
fn current_and_max_share_one_record() {
    let mut store = MemoryStore::new();
    let hp = store.set(&owner(), "HP", Slot::Current, "31").unwrap();
    let again = store.set(&owner(), "HP", Slot::Max, "40").unwrap();

    assert_eq!(hp, again);
    assert_eq!(store.len(), 1);
    assert_eq!(store.read(hp, Slot::Current), Some(Value::new("31")));
    assert_eq!(store.read(hp, Slot::Max), Some(Value::new("40")));
}

#[test]
fn unset_slot_reads_nothing() {
    let mut store = MemoryStore::new();
    let id = store.create(&owner(), "thac0").unwrap();
    assert_eq!(store.read(id, Slot::Current), None);
    assert_eq!(store.read(id, Slot::Max), None);
}

// =============================================================================
// Searches
// =============================================================================

#[test]
fn prefix_search_finds_one_column_group() {
    let mut store = MemoryStore::new();
    store.set(&owner(), "repeating_spells4_-Ka_spellname4", Slot::Current, "Web").unwrap();
    store.set(&owner(), "repeating_spells5_-Kb_spellname5", Slot::Current, "Fly").unwrap();
    store.set(&owner(), "repeating_spells4_-Kc_spellname4", Slot::Current, "Haste").unwrap();

    let found = store.find(
        &owner(),
        &NameFilter::Prefix {
            prefix: "repeating_spells4_",
            case_sensitive: true,
        },
    );
    let names: Vec<&str> = found.iter().map(|f| &*f.name).collect();
    assert_eq!(
        names,
        ["repeating_spells4_-Ka_spellname4", "repeating_spells4_-Kc_spellname4"]
    );
}

#[test]
fn lookups_ignore_case_when_asked() {
    let mut store = MemoryStore::new();
    store.set(&owner(), "Spell-Level1-Total", Slot::Current, "3").unwrap();

    assert_eq!(
        store.read_named(&owner(), "spell-level1-total", Slot::Current, false),
        Some(Value::new("3"))
    );
    assert_eq!(
        store.read_named(&owner(), "spell-level1-total", Slot::Current, true),
        None
    );
}

#[test]
fn owners_do_not_see_each_other() {
    let mut store = MemoryStore::new();
    let other = OwnerId::new("-Mfriend");
    store.set(&owner(), "class1", Slot::Current, "Fighter").unwrap();

    assert!(store.find_one(&other, "class1", true).is_none());
    assert_eq!(store.owner_len(&owner()), 1);
    assert_eq!(store.owner_len(&other), 0);
}
