//! Caster kinds and the magic-layer entry point.

use std::fmt;
use std::str::FromStr;

use grimoire_foundation::{Error, ErrorKind, OwnerId, Slot};
use grimoire_storage::AttributeStore;
use grimoire_table::Sheet;

use crate::layout::{ClassSlot, SheetLayout};

/// Which set of spell slots an operation works on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CasterKind {
    /// Wizard spells, levels 1 to 9 (`MU`).
    Wizard,
    /// Priest spells, levels 1 to 7 (`PR`).
    Priest,
    /// Innate powers (`POWER`).
    Power,
    /// Spells stored in magic items (`MI`).
    ItemSpell,
    /// Powers of magic items (`MIPOWER`).
    ItemPower,
}

impl CasterKind {
    /// Every kind.
    pub const ALL: [Self; 5] = [
        Self::ItemPower,
        Self::Power,
        Self::Wizard,
        Self::Priest,
        Self::ItemSpell,
    ];

    /// Returns the short code used on the command line.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Wizard => "MU",
            Self::Priest => "PR",
            Self::Power => "POWER",
            Self::ItemSpell => "MI",
            Self::ItemPower => "MIPOWER",
        }
    }

    /// Returns true for kinds whose slots refill to their per-rest maximum.
    #[must_use]
    pub const fn is_power(self) -> bool {
        matches!(self, Self::Power | Self::ItemPower)
    }
}

impl fmt::Display for CasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CasterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MU" | "WIZARD" => Ok(Self::Wizard),
            "PR" | "PRIEST" => Ok(Self::Priest),
            "POWER" | "POWERS" => Ok(Self::Power),
            "MI" => Ok(Self::ItemSpell),
            "MIPOWER" => Ok(Self::ItemPower),
            _ => Err(Error::new(ErrorKind::UnknownCasterKind(s.to_string()))),
        }
    }
}

/// Magic operations over one sheet with one layout.
///
/// The caller still owns the sheet and flushes its deferred queue.
#[derive(Debug)]
pub struct MagicSheet<'a, S: AttributeStore> {
    pub(crate) sheet: &'a mut Sheet<S>,
    pub(crate) layout: &'a SheetLayout,
}

impl<'a, S: AttributeStore> MagicSheet<'a, S> {
    /// Wraps a sheet.
    pub fn new(sheet: &'a mut Sheet<S>, layout: &'a SheetLayout) -> Self {
        Self { sheet, layout }
    }

    /// Returns the wrapped sheet.
    pub fn sheet(&mut self) -> &mut Sheet<S> {
        &mut *self.sheet
    }

    /// Returns the layout.
    pub fn layout(&self) -> &SheetLayout {
        self.layout
    }

    pub(crate) fn class_level(&self, owner: &OwnerId, class: ClassSlot) -> u32 {
        let level = self
            .sheet
            .read_int(owner, self.layout.class_level(class), Slot::Current, 0);
        u32::try_from(level).unwrap_or(0)
    }

    pub(crate) fn class_name(&self, owner: &OwnerId, class: ClassSlot) -> String {
        self.sheet
            .read_flat(owner, self.layout.class_name(class), Slot::Current)
            .map(|v| v.as_str().trim().to_ascii_uppercase())
            .unwrap_or_default()
    }

    /// Returns the character's overall level.
    ///
    /// The total-level attribute wins when set; otherwise the class levels
    /// are summed.
    #[must_use]
    pub fn character_level(&self, owner: &OwnerId) -> u32 {
        let total = self
            .sheet
            .read_int(owner, &self.layout.classes.total_level, Slot::Current, 0);
        if total > 0 {
            return u32::try_from(total).unwrap_or(0);
        }
        [
            ClassSlot::Fighter,
            ClassSlot::Wizard,
            ClassSlot::Priest,
            ClassSlot::Rogue,
            ClassSlot::Psion,
        ]
        .into_iter()
        .map(|class| self.class_level(owner, class))
        .sum()
    }

    /// Returns the level a kind of magic is cast at.
    #[must_use]
    pub fn caster_level(&self, owner: &OwnerId, kind: CasterKind) -> u32 {
        match kind {
            CasterKind::Wizard => self.class_level(owner, ClassSlot::Wizard),
            CasterKind::Priest => self.class_level(owner, ClassSlot::Priest),
            CasterKind::Power | CasterKind::ItemSpell | CasterKind::ItemPower => {
                self.character_level(owner)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimoire_storage::MemoryStore;
    use grimoire_table::EngineConfig;

    #[test]
    fn kind_codes_parse() {
        for kind in CasterKind::ALL {
            assert_eq!(kind.code().parse::<CasterKind>().unwrap(), kind);
        }
        assert_eq!("mu".parse::<CasterKind>().unwrap(), CasterKind::Wizard);
        let err = "psionic".parse::<CasterKind>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownCasterKind(_)));
    }

    #[test]
    fn levels() {
        let owner = OwnerId::new("c1");
        let mut store = MemoryStore::new();
        store.set(&owner, "level-class1", Slot::Current, "3").unwrap();
        store.set(&owner, "level-class2", Slot::Current, "4").unwrap();
        let mut sheet = Sheet::with_config(store, EngineConfig::deterministic(1));
        let layout = SheetLayout::default();
        let magic = MagicSheet::new(&mut sheet, &layout);

        assert_eq!(magic.character_level(&owner), 7);
        assert_eq!(magic.caster_level(&owner, CasterKind::Wizard), 4);
        assert_eq!(magic.caster_level(&owner, CasterKind::Priest), 0);
        assert_eq!(magic.caster_level(&owner, CasterKind::Power), 7);
    }

    #[test]
    fn total_level_wins() {
        let owner = OwnerId::new("c1");
        let mut store = MemoryStore::new();
        store.set(&owner, "level-class1", Slot::Current, "3").unwrap();
        store.set(&owner, "level-class5", Slot::Current, "9").unwrap();
        let mut sheet = Sheet::with_config(store, EngineConfig::deterministic(1));
        let layout = SheetLayout::default();
        let magic = MagicSheet::new(&mut sheet, &layout);
        assert_eq!(magic.character_level(&owner), 9);
    }
}
