//! Spell slots for Grimoire character sheets.
//!
//! Spells live in a grid built from the repeating spell table: each spell
//! level owns a block of adjacent column groups, and slots are numbered
//! row-major across them.
//!
//! - [`capacity`] - Slot tables per casting class
//! - [`layout`] - Attribute names and grid geometry of a sheet
//! - [`shape`] - Per-level capacity of a caster's spellbook
//! - [`grid`] - Placing spells into free slots and evicting them
//! - [`rest`] - Refilling slots and bag items
//! - [`transfer`] - Moving an item's spells between characters
//! - [`bag`] - Bag rows
//!
//! Every operation goes through a [`MagicSheet`], which borrows a
//! [`grimoire_table::Sheet`] and a [`SheetLayout`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bag;
pub mod capacity;
pub mod caster;
pub mod grid;
pub mod layout;
pub mod rest;
pub mod shape;
pub mod transfer;

pub use bag::BagItem;
pub use capacity::CasterClass;
pub use caster::{CasterKind, MagicSheet};
pub use grid::{Allocation, Eviction, FreedSlot, Placement, SpellEntry};
pub use layout::{ClassFields, ClassSlot, ItemLists, SheetLayout};
pub use rest::{RestKind, RestReport};
pub use shape::{LevelCapacity, Spellbook};
pub use transfer::Transfer;
