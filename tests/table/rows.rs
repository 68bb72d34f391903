//! Integration tests for row writes and deferred flat attributes

use grimoire_foundation::{ErrorKind, OwnerId, Slot, Value};
use grimoire_storage::MemoryStore;
use grimoire_table::{
    ColumnGroup, EngineConfig, FieldDef, FirstRow, Row, RowValues, Sheet, TableDef, TableSchema,
};

fn spells() -> TableSchema {
    TableSchema::new(TableDef::new("repeating_spells", FirstRow::Flat))
        .with_field("name", FieldDef::current("spellname", "-"))
        .with_field("db", FieldDef::max("spellname", ""))
        .with_field("castValue", FieldDef::current("spellmemorized", "0"))
        .with_field("castMax", FieldDef::max("spellmemorized", "0"))
        .with_name_field("name")
}

fn sheet() -> (Sheet<MemoryStore>, OwnerId) {
    (
        Sheet::with_config(MemoryStore::new(), EngineConfig::deterministic(17)),
        OwnerId::new("-Mchar"),
    )
}

// =============================================================================
// Rows
// =============================================================================

#[test]
fn paired_fields_share_one_record() {
    let (mut sheet, owner) = sheet();
    let mut view = sheet.project(&owner, &spells(), ColumnGroup::new(1));
    let values = RowValues::new()
        .with("name", "Fly")
        .with("db", "Fly-MU")
        .with("castValue", "2")
        .with("castMax", "3");
    sheet.add_row(&mut view, Row::Index(0), Some(&values)).unwrap();

    assert_eq!(sheet.store().owner_len(&owner), 2);
    assert_eq!(sheet.lookup(&view, "castValue", Row::Index(0)), Some(Value::new("2")));
    assert_eq!(sheet.lookup(&view, "castMax", Row::Index(0)), Some(Value::new("3")));
}

#[test]
fn rewriting_a_row_creates_nothing() {
    let (mut sheet, owner) = sheet();
    let mut view = sheet.project(&owner, &spells(), ColumnGroup::new(4));
    let values = RowValues::new().with("name", "Haste").with("castValue", "1");
    sheet.add_row(&mut view, Row::Index(0), Some(&values)).unwrap();
    let records = sheet.store().len();

    sheet.add_row(&mut view, Row::Index(0), Some(&values)).unwrap();
    sheet.set(&mut view, "castValue", Row::Index(0), "1").unwrap();

    assert_eq!(sheet.store().len(), records);
    assert_eq!(view.len(), 1);
}

#[test]
fn rows_written_are_found_by_a_fresh_projection() {
    let (mut sheet, owner) = sheet();
    let mut view = sheet.project(&owner, &spells(), ColumnGroup::new(4));
    for name in ["Haste", "Slow", "Fly"] {
        let values = RowValues::new().with("name", name);
        let end = view.len();
        sheet.add_row(&mut view, Row::Index(end), Some(&values)).unwrap();
    }
    sheet.save_row_order(&view).unwrap();
    sheet.flush(false).unwrap();

    let fresh = sheet.project(&owner, &spells(), ColumnGroup::new(4));
    let names: Vec<Value> = (0..fresh.len())
        .filter_map(|row| sheet.lookup(&fresh, "name", Row::Index(row)))
        .collect();
    assert_eq!(names, ["Haste", "Slow", "Fly"]);
}

#[test]
fn writing_past_the_end_fails() {
    let (mut sheet, owner) = sheet();
    let mut view = sheet.project(&owner, &spells(), ColumnGroup::new(1));
    let err = sheet.set(&mut view, "name", Row::Index(0), "Web").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RowOutOfRange { .. }));
    assert_eq!(sheet.store().len(), 0);
}

// =============================================================================
// Deferred Flat Attributes
// =============================================================================

#[test]
fn missing_flat_attributes_wait_for_the_flush() {
    let (mut sheet, owner) = sheet();
    sheet
        .ensure_flat_attribute(&owner, "spell-level1-castable", Slot::Current, "4")
        .unwrap();
    assert_eq!(sheet.read_flat(&owner, "spell-level1-castable", Slot::Current), None);

    assert_eq!(sheet.flush(false).unwrap(), 1);
    assert!(sheet.pending().is_empty());
    assert_eq!(
        sheet.read_flat(&owner, "spell-level1-castable", Slot::Current),
        Some(Value::new("4"))
    );
}

#[test]
fn flat_row_writes_use_the_flat_name() {
    let (mut sheet, owner) = sheet();
    let mut view = sheet.project(&owner, &spells(), ColumnGroup::new(4));
    sheet.set(&mut view, "name", Row::Flat, "Shield").unwrap();
    sheet.flush(false).unwrap();
    assert_eq!(
        sheet.read_flat(&owner, "spellname4", Slot::Current),
        Some(Value::new("Shield"))
    );
}
