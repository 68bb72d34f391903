//! Integration tests for the bag and for moving item spells between characters

use grimoire_foundation::{OwnerId, Slot, Value};
use grimoire_magic::{BagItem, CasterKind, MagicSheet, RestKind, SheetLayout, SpellEntry};
use grimoire_storage::MemoryStore;
use grimoire_table::{EngineConfig, Sheet};

fn sheet() -> (Sheet<MemoryStore>, OwnerId, OwnerId) {
    (
        Sheet::with_config(MemoryStore::new(), EngineConfig::deterministic(33)),
        OwnerId::new("-Mgiver"),
        OwnerId::new("-Mtaker"),
    )
}

#[test]
fn bag_items_are_restored_by_a_long_rest() {
    let (mut sheet, owner, _) = sheet();
    let layout = SheetLayout::default();
    let mut magic = MagicSheet::new(&mut sheet, &layout);

    let mut potion = BagItem::new("Healing").with_qty("4");
    magic.store_item(&owner, 0, &potion).unwrap();
    potion.qty = Value::new("1");
    magic.store_item(&owner, 0, &potion).unwrap();

    let report = magic.rest(&owner, RestKind::Long, &[]).unwrap();
    assert_eq!(report.items, 1);
    let items = magic.bag_items(&owner);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].1.qty, "4");
}

#[test]
fn growable_item_slots_record_their_size() {
    let (mut sheet, owner, _) = sheet();
    let layout = SheetLayout::default();
    {
        let mut magic = MagicSheet::new(&mut sheet, &layout);
        let book = magic.shape(&owner, CasterKind::ItemSpell).unwrap();
        assert_eq!(book.total(), 0);
        let spells = ["Fireball", "Haste", "Slow", "Fly"]
            .into_iter()
            .map(|n| SpellEntry::stored_spell(n, "3.1"));
        let allocation = magic.allocate(&owner, &book, spells, false).unwrap();
        assert!(allocation.is_complete());
    }
    sheet.flush(false).unwrap();
    assert_eq!(
        sheet.read_flat(&owner, "spell-level15-castable", Slot::Current),
        Some(Value::new("4"))
    );
}

#[test]
fn item_spells_follow_the_item() {
    let (mut sheet, giver, taker) = sheet();
    let layout = SheetLayout::default();
    sheet
        .store_mut()
        .set(&giver, "mi-muspells-Staff", Slot::Current, "Fireball,Web")
        .unwrap();
    {
        let mut magic = MagicSheet::new(&mut sheet, &layout);
        let book = magic.shape(&giver, CasterKind::ItemSpell).unwrap();
        let spells = [
            SpellEntry::stored_spell("Fireball", "6.1"),
            SpellEntry::stored_spell("Web", "2.1"),
        ];
        magic.allocate(&giver, &book, spells, false).unwrap();

        let transfer = magic.move_item_spells(&giver, &taker, "Staff").unwrap();
        assert_eq!(transfer.placed.len(), 2);
        assert!(transfer.missing.is_empty());

        let given = magic.shape(&giver, CasterKind::ItemSpell).unwrap();
        assert!(magic.occupied(&giver, &given).is_empty());
    }
    sheet.flush(false).unwrap();

    assert_eq!(
        sheet.read_flat(&taker, "mi-muspells-Staff", Slot::Current),
        Some(Value::new("Fireball,Web"))
    );
    assert_eq!(
        sheet.read_flat(&taker, "mi-muspells-Staff", Slot::Max),
        Some(Value::new("6.1,2.1"))
    );
}
