//! Integration tests for spellbook shapes and rests

use grimoire_foundation::{OwnerId, Slot, Value};
use grimoire_magic::{CasterClass, CasterKind, MagicSheet, RestKind, SheetLayout, SpellEntry};
use grimoire_storage::MemoryStore;
use grimoire_table::{ColumnGroup, EngineConfig, Row, Sheet};

fn character(attributes: &[(&str, &str)]) -> (Sheet<MemoryStore>, OwnerId) {
    let owner = OwnerId::new("-Mchar");
    let mut store = MemoryStore::new();
    for (name, value) in attributes {
        store.set(&owner, name, Slot::Current, *value).unwrap();
    }
    (Sheet::with_config(store, EngineConfig::deterministic(8)), owner)
}

#[test]
fn fifth_level_wizard() {
    let (mut sheet, owner) = character(&[("class2", "Wizard"), ("level-class2", "5")]);
    let layout = SheetLayout::default();
    let book = MagicSheet::new(&mut sheet, &layout)
        .shape(&owner, CasterKind::Wizard)
        .unwrap();
    sheet.flush(false).unwrap();

    assert_eq!(book.class, Some(CasterClass::Wizard));
    assert_eq!(&book.capacities()[..4], [4, 2, 1, 0]);
    assert_eq!(
        sheet.read_flat(&owner, "spell-level2-castable", Slot::Current),
        Some(Value::new("2"))
    );
}

#[test]
fn configured_totals_raise_capacity() {
    let (mut sheet, owner) = character(&[
        ("level-class2", "5"),
        ("spell-level1-total", "6"),
        ("spell-level2-total", "1"),
    ]);
    let layout = SheetLayout::default();
    let book = MagicSheet::new(&mut sheet, &layout)
        .shape(&owner, CasterKind::Wizard)
        .unwrap();
    assert_eq!(&book.capacities()[..2], [6, 2]);
}

#[test]
fn rogue_bards_cast_from_the_bard_table() {
    let (mut sheet, owner) = character(&[("class4", "Bard"), ("level-class4", "4")]);
    let layout = SheetLayout::default();
    let book = MagicSheet::new(&mut sheet, &layout)
        .shape(&owner, CasterKind::Wizard)
        .unwrap();
    assert_eq!(book.class, Some(CasterClass::Bard));
    assert_eq!(book.class_level, 4);
}

#[test]
fn long_rest_refills_what_a_short_rest_does_not() {
    let (mut sheet, owner) = character(&[("level-class2", "5")]);
    let layout = SheetLayout::default();
    {
        let mut magic = MagicSheet::new(&mut sheet, &layout);
        let book = magic.shape(&owner, CasterKind::Wizard).unwrap();
        let spent = ["Sleep", "Shield", "Light", "Charm", "Web", "Blur", "Fly"]
            .into_iter()
            .map(|n| SpellEntry::new(n).with("castValue", "0"));
        let allocation = magic.allocate(&owner, &book, spent, false).unwrap();
        assert!(allocation.is_complete());

        let short = magic.rest(&owner, RestKind::Short, &[CasterKind::Wizard]).unwrap();
        assert_eq!(short.slots, 4);
        let long = magic.rest(&owner, RestKind::Long, &[CasterKind::Wizard]).unwrap();
        assert_eq!(long.slots, 7);
    }

    // third-level Fly lives in the first lane of column group 7
    let view = sheet.project(&owner, &layout.spells, ColumnGroup::new(7));
    assert_eq!(sheet.lookup(&view, "castValue", Row::Index(0)).unwrap(), "1");
}
