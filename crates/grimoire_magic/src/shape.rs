//! How many slots of each spell level a caster has, and where they live.

use grimoire_foundation::{OwnerId, Result, Slot};
use grimoire_storage::AttributeStore;
use grimoire_table::ColumnGroup;
use tracing::debug;

use crate::capacity::CasterClass;
use crate::caster::{CasterKind, MagicSheet};
use crate::layout::ClassSlot;

/// The slots of one spell level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCapacity {
    /// Spell level, from 1.
    pub level: u32,
    /// Number of slots.
    pub capacity: usize,
    /// Column group of the first lane.
    pub base: u32,
    /// Attribute recording the capacity, for levels that grow on demand.
    pub grows_into: Option<String>,
}

impl LevelCapacity {
    /// Creates a level with a fixed number of slots.
    #[must_use]
    pub fn fixed(level: u32, capacity: usize, base: u32) -> Self {
        Self {
            level,
            capacity,
            base,
            grows_into: None,
        }
    }

    /// Creates a level that may grow past `capacity`, recording its new
    /// size in `attribute`.
    #[must_use]
    pub fn growable(level: u32, capacity: usize, base: u32, attribute: impl Into<String>) -> Self {
        Self {
            level,
            capacity,
            base,
            grows_into: Some(attribute.into()),
        }
    }

    /// Returns the column group of a lane, counting lanes from zero.
    #[must_use]
    pub fn column(&self, lane: u32) -> ColumnGroup {
        ColumnGroup::new(self.base + lane)
    }

    /// Returns how many slots an allocation may fill.
    #[must_use]
    pub fn limit(&self, max_slots: usize) -> usize {
        match self.grows_into {
            Some(_) => max_slots,
            None => self.capacity.min(max_slots),
        }
    }
}

/// The shape of one kind of spellbook for one caster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spellbook {
    /// Which slots these are.
    pub kind: CasterKind,
    /// The class whose table was used, if any.
    pub class: Option<CasterClass>,
    /// The level looked up in that table.
    pub class_level: u32,
    /// Per spell level, ascending.
    pub levels: Vec<LevelCapacity>,
}

impl Spellbook {
    /// Returns the total number of slots across levels.
    #[must_use]
    pub fn total(&self) -> usize {
        self.levels.iter().map(|l| l.capacity).sum()
    }

    /// Returns one spell level.
    #[must_use]
    pub fn level(&self, level: u32) -> Option<&LevelCapacity> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Returns the capacity of each level, ascending.
    #[must_use]
    pub fn capacities(&self) -> Vec<usize> {
        self.levels.iter().map(|l| l.capacity).collect()
    }
}

impl<S: AttributeStore> MagicSheet<'_, S> {
    /// Computes how many slots of each level a caster has.
    ///
    /// Wizard and priest capacities come from the class tables, raised (never
    /// lowered) by the sheet's per-level total override. The table value is
    /// written back as the level's castable count. Powers have a fixed number
    /// of slots; item spells and item powers take theirs from the sheet and
    /// grow on demand.
    ///
    /// # Errors
    ///
    /// Returns an error if a castable count cannot be written.
    pub fn shape(&mut self, owner: &OwnerId, kind: CasterKind) -> Result<Spellbook> {
        let layout = self.layout;
        let book = match kind {
            CasterKind::Wizard => {
                let (class, level) = self.wizard_class(owner);
                let counts = |spell_level: u32, suffix: &str| layout.wizard_count(spell_level, suffix);
                self.class_book(owner, kind, class, level, &layout.wizard_bases, counts)?
            }
            CasterKind::Priest => {
                let (class, level) = self.priest_class(owner);
                let counts = |spell_level: u32, suffix: &str| layout.priest_count(spell_level, suffix);
                self.class_book(owner, kind, class, level, &layout.priest_bases, counts)?
            }
            CasterKind::Power => Spellbook {
                kind,
                class: None,
                class_level: self.character_level(owner),
                levels: vec![LevelCapacity::fixed(1, layout.power_capacity, layout.power_base)],
            },
            CasterKind::ItemSpell => {
                let attr = layout.wizard_count(layout.item_spell_level, &layout.castable_suffix);
                self.item_book(owner, kind, attr, layout.item_spell_base)
            }
            CasterKind::ItemPower => {
                let attr = layout.wizard_count(layout.item_power_level, &layout.total_suffix);
                self.item_book(owner, kind, attr, layout.item_power_base)
            }
        };
        debug!(owner = %owner, kind = %kind, capacities = ?book.capacities(), "Shaped spellbook");
        Ok(book)
    }

    /// A wizard without wizard levels may still cast as a bard.
    fn wizard_class(&self, owner: &OwnerId) -> (Option<CasterClass>, u32) {
        let level = self.class_level(owner, ClassSlot::Wizard);
        if level >= 1 {
            let class = match self.class_name(owner, ClassSlot::Wizard).as_str() {
                "BARD" => CasterClass::Bard,
                _ => CasterClass::Wizard,
            };
            (Some(class), level)
        } else if self.class_name(owner, ClassSlot::Rogue) == "BARD" {
            (Some(CasterClass::Bard), self.class_level(owner, ClassSlot::Rogue))
        } else {
            (None, 0)
        }
    }

    /// A priest without priest levels may still cast as a ranger or paladin.
    fn priest_class(&self, owner: &OwnerId) -> (Option<CasterClass>, u32) {
        let level = self.class_level(owner, ClassSlot::Priest);
        if level >= 1 {
            let class = match self.class_name(owner, ClassSlot::Priest).as_str() {
                "RANGER" => CasterClass::Ranger,
                "PALADIN" => CasterClass::Paladin,
                _ => CasterClass::Priest,
            };
            return (Some(class), level);
        }
        match self.class_name(owner, ClassSlot::Fighter).as_str() {
            "RANGER" => (Some(CasterClass::Ranger), self.class_level(owner, ClassSlot::Fighter)),
            "PALADIN" => (Some(CasterClass::Paladin), self.class_level(owner, ClassSlot::Fighter)),
            _ => (None, 0),
        }
    }

    fn class_book(
        &mut self,
        owner: &OwnerId,
        kind: CasterKind,
        class: Option<CasterClass>,
        class_level: u32,
        bases: &[u32],
        counts: impl Fn(u32, &str) -> String,
    ) -> Result<Spellbook> {
        let layout = self.layout;
        let mut levels = Vec::with_capacity(bases.len());
        for (spell_level, &base) in (1..).zip(bases) {
            let from_table = class.map_or(0, |c| c.slots(spell_level, class_level));
            self.sheet.ensure_flat_attribute(
                owner,
                &counts(spell_level, &layout.castable_suffix),
                Slot::Current,
                from_table,
            )?;
            let configured = self.sheet.read_int(
                owner,
                &counts(spell_level, &layout.total_suffix),
                Slot::Current,
                0,
            );
            let capacity = usize::try_from(configured)
                .unwrap_or(0)
                .max(from_table as usize);
            levels.push(LevelCapacity::fixed(spell_level, capacity, base));
        }
        Ok(Spellbook {
            kind,
            class,
            class_level,
            levels,
        })
    }

    fn item_book(&self, owner: &OwnerId, kind: CasterKind, attr: String, base: u32) -> Spellbook {
        let capacity = self.sheet.read_int(owner, &attr, Slot::Current, 0);
        Spellbook {
            kind,
            class: None,
            class_level: self.character_level(owner),
            levels: vec![LevelCapacity::growable(
                1,
                usize::try_from(capacity).unwrap_or(0),
                base,
                attr,
            )],
        }
    }
}
