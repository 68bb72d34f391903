//! Integration tests for cell names and row keys

use std::collections::HashSet;

use grimoire_table::{
    Clock, ColumnGroup, FirstRow, RowKey, RowKeyGenerator, RowToken, TableDef, flat_name,
};
use proptest::prelude::*;

/// A clock stuck on one millisecond.
struct FrozenClock(u64);

impl Clock for FrozenClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// Cell Names
// =============================================================================

#[test]
fn first_column_of_a_flat_first_row_table_has_no_number() {
    let spells = TableDef::new("repeating_spells", FirstRow::Flat);
    let row = RowToken::Key(RowKey::new("-Mabc"));

    assert_eq!(
        spells.row_name(ColumnGroup::new(1), &row, "spellname"),
        "repeating_spells_-Mabc_spellname"
    );
    assert_eq!(
        spells.row_name(ColumnGroup::new(4), &row, "spellname"),
        "repeating_spells4_-Mabc_spellname4"
    );
    assert_eq!(flat_name(Some(&spells), ColumnGroup::new(1), "spellname"), "spellname");
    assert_eq!(flat_name(Some(&spells), ColumnGroup::new(4), "spellname"), "spellname4");
}

#[test]
fn repeating_first_row_tables_always_number_columns() {
    let spells = TableDef::new("repeating_spells", FirstRow::Repeating);
    let row = RowToken::Placeholder(2);
    let name = spells.row_name(ColumnGroup::new(1), &row, "spellname");

    assert_eq!(name, "repeating_spells1_$2_spellname1");
    let decoded = spells.decode(&name).unwrap();
    assert_eq!(decoded.column, ColumnGroup::new(1));
    assert_eq!(decoded.row, row);
}

#[test]
fn foreign_names_do_not_decode() {
    let spells = TableDef::new("repeating_spells", FirstRow::Flat);
    assert!(spells.decode("repeating_potions_-Ma_name").is_none());
    assert!(spells.decode("repeating_spells4_-Ma_spellname5").is_none());
    assert!(spells.decode("spellname4").is_none());
}

// =============================================================================
// Row Keys
// =============================================================================

#[test]
fn ten_thousand_row_keys_in_one_millisecond_are_unique_and_valid() {
    let mut keys = RowKeyGenerator::seeded(2024).with_clock(FrozenClock(1_700_000_000_000));
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let key = keys.next_row_key();
        assert!(!key.as_str().contains('_'));
        assert!(RowKey::is_valid(key.as_str()));
        assert!(seen.insert(key));
    }
}

proptest! {
    #[test]
    fn cell_names_round_trip(
        column in 1_u32..80,
        key in "-[0-9A-Za-z-]{1,19}",
        suffix in "[a-z][a-z-]{0,15}",
        flat_first in any::<bool>(),
    ) {
        let first_row = if flat_first { FirstRow::Flat } else { FirstRow::Repeating };
        let table = TableDef::new("repeating_spells", first_row);
        let row = RowToken::Key(RowKey::new(&key));
        let name = table.row_name(ColumnGroup::new(column), &row, &suffix);

        let decoded = table.decode(&name).unwrap();
        prop_assert_eq!(decoded.column, ColumnGroup::new(column));
        prop_assert_eq!(decoded.row, row);
        prop_assert_eq!(decoded.suffix, suffix);
    }
}
