//! Integration tests for placing spells into the grid and freeing them

use grimoire_foundation::OwnerId;
use grimoire_magic::{CasterKind, LevelCapacity, MagicSheet, SheetLayout, SpellEntry, Spellbook};
use grimoire_storage::MemoryStore;
use grimoire_table::{ColumnGroup, EngineConfig, Sheet};

fn sheet() -> (Sheet<MemoryStore>, OwnerId) {
    (
        Sheet::with_config(MemoryStore::new(), EngineConfig::deterministic(21)),
        OwnerId::new("-Mchar"),
    )
}

/// One spell level of `capacity` slots starting at column group 1.
fn book(capacity: usize) -> Spellbook {
    Spellbook {
        kind: CasterKind::Wizard,
        class: None,
        class_level: 0,
        levels: vec![LevelCapacity::fixed(1, capacity, 1)],
    }
}

fn entries(names: &[&str]) -> Vec<SpellEntry> {
    names.iter().map(|&n| SpellEntry::new(n)).collect()
}

fn spots(placed: &[grimoire_magic::Placement]) -> Vec<(&str, usize, ColumnGroup)> {
    placed
        .iter()
        .map(|p| (p.name.as_str(), p.row, p.column))
        .collect()
}

#[test]
fn slots_fill_row_major_across_lanes() {
    let (mut sheet, owner) = sheet();
    let layout = SheetLayout::new().with_lanes(2);
    let mut magic = MagicSheet::new(&mut sheet, &layout);

    let allocation = magic
        .allocate(&owner, &book(4), entries(&["Fireball", "Light", "Web"]), false)
        .unwrap();

    assert!(allocation.is_complete());
    assert_eq!(
        spots(&allocation.placed),
        [
            ("Fireball", 0, ColumnGroup::new(1)),
            ("Light", 0, ColumnGroup::new(2)),
            ("Web", 1, ColumnGroup::new(1)),
        ]
    );
}

#[test]
fn evicted_slots_are_reused_first() {
    let (mut sheet, owner) = sheet();
    let layout = SheetLayout::new().with_lanes(2);
    let mut magic = MagicSheet::new(&mut sheet, &layout);
    let book = book(4);
    magic
        .allocate(&owner, &book, entries(&["Fireball", "Light", "Web"]), false)
        .unwrap();

    let eviction = magic.evict(&owner, &book, &["Light"]);
    assert!(eviction.not_found.is_empty());
    let freed = eviction.find("Light").unwrap();
    assert_eq!((freed.row, freed.column), (0, ColumnGroup::new(2)));

    let allocation = magic
        .allocate(&owner, &book, entries(&["Stoneskin"]), false)
        .unwrap();
    assert_eq!(spots(&allocation.placed), [("Stoneskin", 0, ColumnGroup::new(2))]);

    let filled: Vec<String> = magic
        .occupied(&owner, &book)
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(filled, ["Fireball", "Stoneskin", "Web"]);
}

#[test]
fn spells_beyond_capacity_are_reported() {
    let (mut sheet, owner) = sheet();
    let layout = SheetLayout::new().with_lanes(2);
    let mut magic = MagicSheet::new(&mut sheet, &layout);

    let allocation = magic
        .allocate(&owner, &book(2), entries(&["Fireball", "Light", "Web"]), false)
        .unwrap();

    assert!(!allocation.is_complete());
    assert_eq!(allocation.placed.len(), 2);
    let unplaced: Vec<&str> = allocation.unplaced.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(unplaced, ["Web"]);
}

#[test]
fn unknown_names_are_not_found() {
    let (mut sheet, owner) = sheet();
    let layout = SheetLayout::new();
    let mut magic = MagicSheet::new(&mut sheet, &layout);
    let book = book(3);
    magic.allocate(&owner, &book, entries(&["Sleep"]), false).unwrap();

    let eviction = magic.evict(&owner, &book, &["SLEEP", "Wish"]);
    assert_eq!(eviction.freed.len(), 1);
    assert_eq!(eviction.not_found, ["Wish"]);
}
