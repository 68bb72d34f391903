//! Resting: refilling spell slots and item charges.

use std::fmt;
use std::str::FromStr;

use grimoire_foundation::{Error, OwnerId, Result, Value};
use grimoire_storage::AttributeStore;
use grimoire_table::{ColumnGroup, Fallback, Row};
use tracing::{debug, error, info};

use crate::caster::{CasterKind, MagicSheet};
use crate::layout::{bag, spell};

/// How long the character rested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RestKind {
    /// Refreshes first-level spells only.
    Short,
    /// Refreshes every level, powers, item powers and the bag.
    Long,
}

impl fmt::Display for RestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Short => "short",
            Self::Long => "long",
        })
    }
}

impl FromStr for RestKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "s" => Ok(Self::Short),
            "long" | "l" | "overnight" => Ok(Self::Long),
            _ => Err(Error::command(format!("unknown rest '{s}'"))),
        }
    }
}

/// What a rest refreshed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RestReport {
    /// Spell and power slots refilled.
    pub slots: usize,
    /// Bag rows restored.
    pub items: usize,
}

impl<S: AttributeStore> MagicSheet<'_, S> {
    /// Rests a character.
    ///
    /// Spells refill to one cast; powers refill to their per-rest maximum.
    /// A short rest covers first-level wizard and priest spells. A long rest
    /// covers every level, adds powers and item powers, and restores each
    /// bag row's speed and quantity. Each level is scanned until its
    /// capacity or the first slot without a cast count. Stored item spells
    /// never refill.
    ///
    /// # Errors
    ///
    /// Returns an error if a spellbook cannot be shaped or the bag cannot be
    /// restored.
    pub fn rest(
        &mut self,
        owner: &OwnerId,
        rest: RestKind,
        kinds: &[CasterKind],
    ) -> Result<RestReport> {
        let mut kinds: Vec<CasterKind> = kinds.to_vec();
        if rest == RestKind::Long {
            for kind in [CasterKind::Power, CasterKind::ItemPower] {
                if !kinds.contains(&kind) {
                    kinds.insert(0, kind);
                }
            }
        }

        let mut report = RestReport::default();
        for kind in kinds {
            if kind == CasterKind::ItemSpell || (rest == RestKind::Short && kind.is_power()) {
                debug!(owner = %owner, kind = %kind, rest = %rest, "Nothing to refresh");
                continue;
            }
            report.slots += self.refresh_kind(owner, rest, kind)?;
        }
        if rest == RestKind::Long {
            report.items = self.refresh_bag(owner)?;
        }

        info!(
            owner = %owner,
            rest = %rest,
            slots = report.slots,
            items = report.items,
            "Rested"
        );
        Ok(report)
    }

    fn refresh_kind(&mut self, owner: &OwnerId, rest: RestKind, kind: CasterKind) -> Result<usize> {
        let book = self.shape(owner, kind)?;
        let levels = match rest {
            RestKind::Short => &book.levels[..book.levels.len().min(1)],
            RestKind::Long => &book.levels[..],
        };

        let mut refreshed = 0;
        for level in levels {
            let mut views = self.lane_views(owner, level);
            let mut slot = 0;
            'rows: for row in 0.. {
                for view in &mut views {
                    if slot >= level.capacity {
                        break 'rows;
                    }
                    slot += 1;
                    if self.sheet.record(view, spell::CAST_VALUE, Row::Index(row)).is_none() {
                        break 'rows;
                    }
                    let value = if kind.is_power() {
                        self.sheet
                            .lookup(view, spell::CAST_MAX, Row::Index(row))
                            .unwrap_or_else(|| Value::new("1"))
                    } else {
                        Value::new("1")
                    };
                    match self.sheet.set(view, spell::CAST_VALUE, Row::Index(row), value) {
                        Ok(()) => refreshed += 1,
                        Err(err) => {
                            error!(owner = %owner, kind = %kind, level = level.level, row, error = %err, "Could not refresh slot");
                        }
                    }
                }
            }
        }
        Ok(refreshed)
    }

    /// Restores every bag row's speed and quantity from their true values.
    fn refresh_bag(&mut self, owner: &OwnerId) -> Result<usize> {
        let mut view = self
            .sheet
            .project(owner, &self.layout.bag, ColumnGroup::NONE);
        let mut restored = 0;
        for row in 0..view.len() {
            if self.sheet.record(&view, bag::SPEED, Row::Index(row)).is_none() {
                break;
            }
            for (shown, truth) in [(bag::SPEED, bag::TRUE_SPEED), (bag::QTY, bag::TRUE_QTY)] {
                let value = self
                    .sheet
                    .lookup_with(&view, truth, Row::Index(row), &Fallback::FieldDefault)
                    .unwrap_or_default();
                self.sheet.set(&mut view, shown, Row::Index(row), value)?;
            }
            restored += 1;
        }
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SpellEntry;
    use crate::layout::SheetLayout;
    use grimoire_foundation::Slot;
    use grimoire_storage::MemoryStore;
    use grimoire_table::{EngineConfig, RowValues, Sheet};

    fn wizard() -> (Sheet<MemoryStore>, OwnerId) {
        let owner = OwnerId::new("c1");
        let mut store = MemoryStore::new();
        store.set(&owner, "level-class2", Slot::Current, "5").unwrap();
        (Sheet::with_config(store, EngineConfig::deterministic(5)), owner)
    }

    fn cast_value(sheet: &Sheet<MemoryStore>, owner: &OwnerId, layout: &SheetLayout, column: u32, row: usize) -> Value {
        let view = sheet.project(owner, &layout.spells, ColumnGroup::new(column));
        sheet.lookup(&view, spell::CAST_VALUE, Row::Index(row)).unwrap()
    }

    fn memorise(sheet: &mut Sheet<MemoryStore>, owner: &OwnerId, layout: &SheetLayout) {
        let mut magic = MagicSheet::new(sheet, layout);
        let book = magic.shape(owner, CasterKind::Wizard).unwrap();
        let entries = ["Sleep", "Shield", "Web", "Fly"]
            .into_iter()
            .map(|n| SpellEntry::new(n).with(spell::CAST_VALUE, "0"));
        magic.allocate(owner, &book, entries, false).unwrap();
    }

    #[test]
    fn short_rest_refreshes_first_level_only() {
        let (mut sheet, owner) = wizard();
        let layout = SheetLayout::default();
        memorise(&mut sheet, &owner, &layout);
        // a second-level spell
        let mut view = sheet.project(&owner, &layout.spells, ColumnGroup::new(4));
        sheet
            .add_row(&mut view, Row::Index(0), Some(&RowValues::new().with(spell::NAME, "Web")))
            .unwrap();

        let report = MagicSheet::new(&mut sheet, &layout)
            .rest(&owner, RestKind::Short, &[CasterKind::Wizard])
            .unwrap();

        assert_eq!(report.slots, 4);
        assert_eq!(report.items, 0);
        assert_eq!(cast_value(&sheet, &owner, &layout, 1, 0), "1");
        assert_eq!(cast_value(&sheet, &owner, &layout, 2, 0), "1");
        assert_eq!(cast_value(&sheet, &owner, &layout, 4, 0), "0");
    }

    #[test]
    fn long_rest_refills_powers_to_their_maximum() {
        let (mut sheet, owner) = wizard();
        let layout = SheetLayout::default();
        {
            let mut magic = MagicSheet::new(&mut sheet, &layout);
            let book = magic.shape(&owner, CasterKind::Power).unwrap();
            magic
                .allocate(&owner, &book, [SpellEntry::power("Fly", "3.0")], false)
                .unwrap();
            let report = magic.rest(&owner, RestKind::Long, &[]).unwrap();
            assert_eq!(report.slots, 1);
        }
        assert_eq!(cast_value(&sheet, &owner, &layout, 67, 0), "3");
    }

    #[test]
    fn short_rest_skips_powers() {
        let (mut sheet, owner) = wizard();
        let layout = SheetLayout::default();
        let mut magic = MagicSheet::new(&mut sheet, &layout);
        let book = magic.shape(&owner, CasterKind::Power).unwrap();
        magic
            .allocate(&owner, &book, [SpellEntry::power("Fly", "3.0")], false)
            .unwrap();
        let report = magic.rest(&owner, RestKind::Short, &[CasterKind::Power]).unwrap();
        assert_eq!(report.slots, 0);
    }

    #[test]
    fn long_rest_restores_the_bag() {
        let (mut sheet, owner) = wizard();
        let layout = SheetLayout::default();
        let mut view = sheet.project(&owner, &layout.bag, ColumnGroup::NONE);
        let values = RowValues::new()
            .with(bag::NAME, "Healing")
            .with(bag::QTY, "1")
            .with(bag::TRUE_QTY, "3")
            .with(bag::SPEED, "2")
            .with(bag::TRUE_SPEED, "4");
        sheet.add_row(&mut view, Row::Index(0), Some(&values)).unwrap();

        let report = MagicSheet::new(&mut sheet, &layout)
            .rest(&owner, RestKind::Long, &[CasterKind::Wizard])
            .unwrap();
        assert_eq!(report.items, 1);

        let view = sheet.project(&owner, &layout.bag, ColumnGroup::NONE);
        assert_eq!(sheet.lookup(&view, bag::QTY, Row::Index(0)).unwrap(), "3");
        assert_eq!(sheet.lookup(&view, bag::SPEED, Row::Index(0)).unwrap(), "4");
    }

    #[test]
    fn parse_rest_kinds() {
        assert_eq!("Long".parse::<RestKind>().unwrap(), RestKind::Long);
        assert_eq!("s".parse::<RestKind>().unwrap(), RestKind::Short);
        assert!("nap".parse::<RestKind>().is_err());
    }
}
