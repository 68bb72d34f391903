//! Integration tests for row order

use grimoire_foundation::{OwnerId, Slot, Value};
use grimoire_storage::MemoryStore;
use grimoire_table::{
    ColumnGroup, EngineConfig, FieldDef, FirstRow, Row, RowKey, Sheet, TableDef, TableSchema,
    reconcile_order,
};

fn spells() -> TableSchema {
    TableSchema::new(TableDef::new("repeating_spells", FirstRow::Flat))
        .with_field("name", FieldDef::current("spellname", "-"))
        .with_name_field("name")
}

fn keys(discovered: &[&str]) -> Vec<RowKey> {
    discovered.iter().map(RowKey::new).collect()
}

#[test]
fn persisted_keys_lead_and_new_keys_follow() {
    let order = reconcile_order(&["B", "A"], &keys(&["A", "B", "C"]));
    assert_eq!(order, keys(&["B", "A", "C"]));
}

#[test]
fn stale_persisted_keys_are_dropped() {
    let order = reconcile_order(&["gone", "C"], &keys(&["A", "C"]));
    assert_eq!(order, keys(&["C", "A"]));
}

#[test]
fn projection_follows_the_persisted_order() {
    let owner = OwnerId::new("-Mchar");
    let mut store = MemoryStore::new();
    for (key, name) in [("A", "Light"), ("B", "Sleep"), ("C", "Web")] {
        let attr = format!("repeating_spells4_{key}_spellname4");
        store.set(&owner, &attr, Slot::Current, name).unwrap();
    }
    store
        .set(&owner, "_reporder_repeating_spells4", Slot::Current, "B,A")
        .unwrap();
    let sheet = Sheet::with_config(store, EngineConfig::deterministic(3));

    let view = sheet.project(&owner, &spells(), ColumnGroup::new(4));
    let names: Vec<Value> = (0..view.len())
        .filter_map(|row| sheet.lookup(&view, "name", Row::Index(row)))
        .collect();
    assert_eq!(names, ["Sleep", "Light", "Web"]);
}
