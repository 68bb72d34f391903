//! Spell slot tables per casting class.
//!
//! Each table has one row per spell level; a row is indexed by the caster's
//! level in the class and gives the number of spells of that level the
//! caster can hold.

use std::fmt;
use std::str::FromStr;

use grimoire_foundation::{Error, ErrorKind};

/// A class with its own spell slot table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CasterClass {
    /// Full arcane caster.
    Wizard,
    /// Full divine caster.
    Priest,
    /// Warrior with late divine spells.
    Ranger,
    /// Warrior with late divine spells.
    Paladin,
    /// Rogue with arcane spells.
    Bard,
}

#[rustfmt::skip]
const WIZARD: &[&[u8]] = &[
    &[0,1,2,2,3,4,4,4,4,4,4,4,4,5,5,5,5,5,5,5,5],
    &[0,0,1,2,2,2,3,3,3,4,4,4,5,5,5,5,5,5,5,5],
    &[0,0,0,0,0,1,2,2,3,3,3,4,4,5,5,5,5,5,5,5,5],
    &[0,0,0,0,0,0,0,1,2,2,2,3,4,4,4,5,5,5,5,5,5],
    &[0,0,0,0,0,0,0,0,0,1,2,3,4,4,4,5,5,5,5,5,5],
    &[0,0,0,0,0,0,0,0,0,0,0,0,1,2,2,2,3,3,3,3,4],
    &[0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1,2,3,3,3,3],
    &[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,2,2,3,3],
    &[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1,2],
];

#[rustfmt::skip]
const PRIEST: &[&[u8]] = &[
    &[0,1,2,2,3,3,3,3,3,4,4,5,6,6,6,6,7,7,8,9,9],
    &[0,0,0,1,2,3,3,3,3,4,4,4,5,6,6,6,7,7,8,9,9],
    &[0,0,0,0,0,1,2,2,3,3,3,4,5,6,6,6,7,7,8,8,9],
    &[0,0,0,0,0,0,0,1,2,2,3,3,3,4,5,6,6,7,8,8,8],
    &[0,0,0,0,0,0,0,0,0,1,2,2,2,2,3,4,4,5,6,6,7],
    &[0,0,0,0,0,0,0,0,0,0,0,1,2,2,2,2,3,3,4,4,5],
    &[0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1,1,2,2,2,2],
];

#[rustfmt::skip]
const RANGER: &[&[u8]] = &[
    &[0,0,0,0,0,0,0,0,1,2,2,2,2,3,3,3,3],
    &[0,0,0,0,0,0,0,0,0,0,1,2,2,2,2,3,3],
    &[0,0,0,0,0,0,0,0,0,0,0,0,1,1,2,2,3],
];

#[rustfmt::skip]
const PALADIN: &[&[u8]] = &[
    &[0,0,0,0,0,0,0,0,0,1,2,2,2,2,3,3,3,3,3,3,3],
    &[0,0,0,0,0,0,0,0,0,0,0,1,2,2,2,2,3,3,3,3,3],
    &[0,0,0,0,0,0,0,0,0,0,0,0,0,1,1,1,2,3,3,3,3],
    &[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1,1,1,2,3],
];

#[rustfmt::skip]
const BARD: &[&[u8]] = &[
    &[0,0,1,2,2,3,3,3,3,3,3,3,3,3,3,3,4,4,4,4,4],
    &[0,0,0,0,1,2,2,2,3,3,3,3,3,3,3,3,3,4,4,4,4],
    &[0,0,0,0,0,0,0,1,1,2,2,3,3,3,3,3,3,3,4,4,4],
    &[0,0,0,0,0,0,0,0,0,0,1,1,2,2,3,3,3,3,3,4,4],
    &[0,0,0,0,0,0,0,0,0,0,0,0,0,1,1,2,2,3,3,3,4],
    &[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1,2,2,3],
];

impl CasterClass {
    /// Returns the class's slot table, one row per spell level.
    #[must_use]
    pub const fn table(self) -> &'static [&'static [u8]] {
        match self {
            Self::Wizard => WIZARD,
            Self::Priest => PRIEST,
            Self::Ranger => RANGER,
            Self::Paladin => PALADIN,
            Self::Bard => BARD,
        }
    }

    /// Returns the highest spell level the class can ever cast.
    #[must_use]
    pub const fn max_spell_level(self) -> u32 {
        self.table().len() as u32
    }

    /// Returns the slots of `spell_level` held at `class_level`.
    ///
    /// Spell levels the class never reaches hold nothing. Class levels past
    /// the end of the table use its last column.
    #[must_use]
    pub fn slots(self, spell_level: u32, class_level: u32) -> u32 {
        let Some(row) = spell_level
            .checked_sub(1)
            .and_then(|i| self.table().get(i as usize))
        else {
            return 0;
        };
        let column = (class_level as usize).min(row.len() - 1);
        u32::from(row[column])
    }

    /// Returns the class name as the sheet spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wizard => "WIZARD",
            Self::Priest => "PRIEST",
            Self::Ranger => "RANGER",
            Self::Paladin => "PALADIN",
            Self::Bard => "BARD",
        }
    }
}

impl fmt::Display for CasterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CasterClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WIZARD" => Ok(Self::Wizard),
            "PRIEST" => Ok(Self::Priest),
            "RANGER" => Ok(Self::Ranger),
            "PALADIN" => Ok(Self::Paladin),
            "BARD" => Ok(Self::Bard),
            _ => Err(Error::new(ErrorKind::Command(format!(
                "'{s}' has no spell slot table"
            )))),
        }
    }
}
