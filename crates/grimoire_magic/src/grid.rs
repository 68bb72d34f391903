//! Placing spells into grid slots and taking them out again.
//!
//! A spell level is a block of column groups ("lanes") side by side. Slots
//! are numbered row-major: row 0 lane 0, row 0 lane 1, ..., row 1 lane 0.
//! A slot is free when its name is the empty-slot sentinel, or when it has
//! no name at all.

use std::collections::VecDeque;

use grimoire_foundation::{OwnerId, Result, Slot, Value};
use grimoire_storage::AttributeStore;
use grimoire_table::{ColumnGroup, Fallback, Row, RowValues, TableView};
use tracing::{debug, error, warn};

use crate::caster::MagicSheet;
use crate::layout::spell;
use crate::shape::{LevelCapacity, Spellbook};

/// A spell waiting to be placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpellEntry {
    /// Spell name.
    pub name: String,
    /// Values for the other fields of the slot.
    pub values: RowValues,
}

impl SpellEntry {
    /// Creates an entry with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: RowValues::new(),
        }
    }

    /// Builder method to set a field value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.set(field, value);
        self
    }

    /// A spell stored in an item, from its `level.set` value.
    ///
    /// A spell stored at level 0 (or with no level) has been used up.
    #[must_use]
    pub fn stored_spell(name: impl Into<String>, stored: &str) -> Self {
        let (level, set) = split_pair(stored);
        let spent = Value::new(level).int_or(0) == 0;
        Self::new(name)
            .with(spell::STORED_LEVEL, level)
            .with(spell::SPELL_SET, set.filter(|s| !s.is_empty()).unwrap_or("0"))
            .with(spell::CAST_VALUE, if spent { "0" } else { "1" })
            .with(spell::CAST_MAX, "1")
    }

    /// An item power, from its `per-day.remaining` value.
    #[must_use]
    pub fn power(name: impl Into<String>, stored: &str) -> Self {
        let (per_day, remaining) = split_pair(stored);
        let entry = Self::new(name).with(spell::CAST_MAX, per_day);
        match remaining.filter(|r| !r.is_empty()) {
            Some(remaining) => entry.with(spell::CAST_VALUE, remaining),
            None => entry,
        }
    }
}

fn split_pair(text: &str) -> (&str, Option<&str>) {
    match text.trim().split_once('.') {
        Some((a, b)) => (a, Some(b)),
        None => (text.trim(), None),
    }
}

/// Where a spell was placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Spell name.
    pub name: String,
    /// Spell level.
    pub level: u32,
    /// Grid row.
    pub row: usize,
    /// Column group.
    pub column: ColumnGroup,
}

/// Result of [`MagicSheet::allocate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Spells placed, in placement order.
    pub placed: Vec<Placement>,
    /// Spells that did not fit, in input order.
    pub unplaced: Vec<SpellEntry>,
}

impl Allocation {
    /// Returns true if every spell was placed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// A slot emptied by eviction, with what it held.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreedSlot {
    /// The name as requested.
    pub name: String,
    /// Grid row.
    pub row: usize,
    /// Column group.
    pub column: ColumnGroup,
    /// Field values before the slot was blanked.
    pub values: RowValues,
}

impl FreedSlot {
    fn field(&self, name: &str) -> &str {
        self.values.get(name).map_or("", Value::as_str)
    }

    /// The stored-spell value of the slot: `level.set`, with level 0 once
    /// the spell has been cast.
    #[must_use]
    pub fn stored_value(&self) -> String {
        let cast = Value::new(self.field(spell::CAST_VALUE)).int_or(0);
        let level = if cast <= 0 {
            "0"
        } else {
            self.field(spell::STORED_LEVEL)
        };
        format!("{level}.{}", self.field(spell::SPELL_SET))
    }

    /// The power value of the slot: `per-day.remaining`.
    #[must_use]
    pub fn power_value(&self) -> String {
        format!(
            "{}.{}",
            self.field(spell::CAST_MAX),
            self.field(spell::CAST_VALUE)
        )
    }
}

/// Result of an eviction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Eviction {
    /// Slots emptied, in scan order.
    pub freed: Vec<FreedSlot>,
    /// Requested names that were not found.
    pub not_found: Vec<String>,
}

impl Eviction {
    /// Returns the freed slot for a name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FreedSlot> {
        self.freed.iter().find(|f| f.name == name)
    }
}

impl<S: AttributeStore> MagicSheet<'_, S> {
    /// Projects the spell grid once per lane of a level.
    pub(crate) fn lane_views(&self, owner: &OwnerId, level: &LevelCapacity) -> Vec<TableView> {
        (0..self.layout.lanes)
            .map(|lane| {
                self.sheet
                    .project(owner, &self.layout.spells, level.column(lane))
            })
            .collect()
    }

    /// Reads every field of one grid row.
    pub(crate) fn row_values(&self, view: &TableView, row: usize) -> RowValues {
        view.fields()
            .filter_map(|(name, _)| {
                self.sheet
                    .lookup(view, name, Row::Index(row))
                    .map(|value| (name.to_string(), value))
            })
            .collect()
    }

    /// Places spells into the first free slots of a spellbook.
    ///
    /// Levels are filled lowest first, slots row-major within a level, and
    /// no level takes more than its capacity. Levels that grow on demand may
    /// take up to the layout's slot bound and record how far they reached.
    /// A slot that cannot be written is logged and skipped; the spell moves
    /// on to the next free slot. With `record_locations`, each placed spell's
    /// row and column are written to its location attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if a capacity or location attribute cannot be
    /// written.
    pub fn allocate(
        &mut self,
        owner: &OwnerId,
        book: &Spellbook,
        entries: impl IntoIterator<Item = SpellEntry>,
        record_locations: bool,
    ) -> Result<Allocation> {
        let layout = self.layout;
        let blank = layout.empty_slot();
        let mut pending: VecDeque<SpellEntry> = entries.into_iter().collect();
        let mut placed = Vec::new();

        for level in &book.levels {
            if pending.is_empty() {
                break;
            }
            let limit = level.limit(layout.max_slots);
            let mut views = self.lane_views(owner, level);
            let mut slot = 0;
            let mut used = 0;

            'rows: for row in 0.. {
                for (lane, view) in (0..).zip(views.iter_mut()) {
                    if slot >= limit || pending.is_empty() {
                        break 'rows;
                    }
                    slot += 1;
                    let name = self
                        .sheet
                        .lookup_with(view, spell::NAME, Row::Index(row), &Fallback::Absent);
                    if name.is_some_and(|n| n != blank) {
                        continue;
                    }
                    let Some(entry) = pending.pop_front() else {
                        break 'rows;
                    };

                    let mut values = layout.spells.default_values();
                    for (field, value) in entry.values.iter() {
                        values.set(field, value.clone());
                    }
                    values.set(spell::NAME, entry.name.as_str());

                    match self.sheet.add_row(view, Row::Index(row), Some(&values)) {
                        Ok(written) => {
                            let row = written.index().unwrap_or(row);
                            let column = level.column(lane);
                            used = slot;
                            if record_locations {
                                let location = layout.power_location(&entry.name);
                                self.sheet
                                    .ensure_flat_attribute(owner, &location, Slot::Current, row)?;
                                self.sheet.ensure_flat_attribute(
                                    owner,
                                    &location,
                                    Slot::Max,
                                    column.number().unwrap_or(0),
                                )?;
                            }
                            debug!(owner = %owner, spell = entry.name, level = level.level, row, column = %column, "Placed spell");
                            placed.push(Placement {
                                name: entry.name,
                                level: level.level,
                                row,
                                column,
                            });
                        }
                        Err(err) => {
                            error!(owner = %owner, spell = entry.name, level = level.level, row, error = %err, "Could not place spell");
                            pending.push_front(entry);
                        }
                    }
                }
            }

            if let Some(attr) = &level.grows_into {
                if used > level.capacity {
                    self.sheet
                        .ensure_flat_attribute(owner, attr, Slot::Current, used)?;
                }
            }
        }

        if !pending.is_empty() {
            warn!(
                owner = %owner,
                kind = %book.kind,
                unplaced = pending.len(),
                "Not enough free slots"
            );
        }
        Ok(Allocation {
            placed,
            unplaced: pending.into(),
        })
    }

    /// Empties the slots holding the named spells.
    ///
    /// Each name frees one slot; names match case-insensitively. Each level
    /// is scanned until a slot with no name or the layout's slot bound.
    /// Freed slots get the sentinel name and zeroed cast counts.
    pub fn evict<N: AsRef<str>>(&mut self, owner: &OwnerId, book: &Spellbook, names: &[N]) -> Eviction {
        let layout = self.layout;
        let mut remaining: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let mut freed = Vec::new();

        for level in &book.levels {
            if remaining.is_empty() {
                break;
            }
            let mut views = self.lane_views(owner, level);
            let mut slot = 0;

            'rows: for row in 0.. {
                for (lane, view) in (0..).zip(views.iter_mut()) {
                    if slot >= layout.max_slots || remaining.is_empty() {
                        break 'rows;
                    }
                    slot += 1;
                    let Some(current) = self
                        .sheet
                        .lookup_with(view, spell::NAME, Row::Index(row), &Fallback::Absent)
                    else {
                        break 'rows;
                    };
                    let current = current.as_str().to_lowercase();
                    let Some(found) = remaining.iter().position(|n| n.to_lowercase() == current)
                    else {
                        continue;
                    };

                    let values = self.row_values(view, row);
                    self.blank_spell(view, row, true);
                    freed.push(FreedSlot {
                        name: remaining.remove(found),
                        row,
                        column: level.column(lane),
                        values,
                    });
                }
            }
        }

        if !remaining.is_empty() {
            warn!(owner = %owner, kind = %book.kind, missing = ?remaining, "Spells not found");
        }
        Eviction {
            freed,
            not_found: remaining,
        }
    }

    /// Empties the slots of item powers placed with recorded locations.
    pub fn evict_recorded<N: AsRef<str>>(&mut self, owner: &OwnerId, names: &[N]) -> Eviction {
        let layout = self.layout;
        let mut eviction = Eviction::default();

        for name in names {
            let name = name.as_ref();
            let location = layout.power_location(name);
            let row = self.sheet.read_int(owner, &location, Slot::Current, -1);
            let column = self.sheet.read_int(owner, &location, Slot::Max, -1);
            let (Ok(row), Ok(column)) = (usize::try_from(row), u32::try_from(column)) else {
                warn!(owner = %owner, power = name, "No recorded location");
                eviction.not_found.push(name.to_string());
                continue;
            };
            let column = ColumnGroup::new(column);
            let mut view = self.sheet.project(owner, &layout.spells, column);
            if row >= view.len() {
                warn!(owner = %owner, power = name, row, column = %column, "Recorded location is empty");
                eviction.not_found.push(name.to_string());
                continue;
            }
            let values = self.row_values(&view, row);
            self.blank_spell(&mut view, row, false);
            eviction.freed.push(FreedSlot {
                name: name.to_string(),
                row,
                column,
                values,
            });
        }
        eviction
    }

    /// Lists the filled slots of a spellbook in scan order.
    #[must_use]
    pub fn occupied(&self, owner: &OwnerId, book: &Spellbook) -> Vec<Placement> {
        let blank = self.layout.empty_slot();
        let mut filled = Vec::new();
        for level in &book.levels {
            let limit = level.limit(self.layout.max_slots);
            let views = self.lane_views(owner, level);
            let rows = views.iter().map(TableView::len).max().unwrap_or(0);
            let mut slot = 0;
            'rows: for row in 0..rows {
                for (lane, view) in (0..).zip(&views) {
                    if slot >= limit {
                        break 'rows;
                    }
                    slot += 1;
                    if let Some(name) = self.sheet.lookup_with(view, spell::NAME, Row::Index(row), &Fallback::Absent) {
                        if name != blank {
                            filled.push(Placement {
                                name: name.to_string(),
                                level: level.level,
                                row,
                                column: level.column(lane),
                            });
                        }
                    }
                }
            }
        }
        filled
    }

    /// Writes the empty-slot values into a grid row, logging failures.
    fn blank_spell(&mut self, view: &mut TableView, row: usize, stored: bool) {
        let blank = self.layout.empty_slot();
        let mut fields = vec![
            (spell::NAME, blank),
            (spell::CAST_VALUE, Value::new("0")),
            (spell::CAST_MAX, Value::new("0")),
        ];
        if stored {
            fields.push((spell::STORED_LEVEL, Value::new("0")));
            fields.push((spell::SPELL_SET, Value::new("0")));
        }
        for (field, value) in fields {
            if let Err(err) = self.sheet.set(view, field, Row::Index(row), value) {
                error!(owner = %view.owner(), row, field, error = %err, "Could not blank slot");
            }
        }
    }
}
