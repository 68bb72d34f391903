//! Grimoire - Virtual repeating tables and spell slots over a flat attribute store
//!
//! This crate re-exports all layers of the Grimoire system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: grimoire_runtime    - Sessions, snapshots, REPL, CLI
//! Layer 3: grimoire_magic      - Spellbook shapes, slot allocation, rests, items
//! Layer 2: grimoire_table      - Name codec, row keys, table projection, deferred writes
//! Layer 1: grimoire_storage    - Flat dual-slot attribute store
//! Layer 0: grimoire_foundation - Core types (Value, OwnerId, Slot, Error)
//! ```

pub use grimoire_foundation as foundation;
pub use grimoire_magic as magic;
pub use grimoire_runtime as runtime;
pub use grimoire_storage as storage;
pub use grimoire_table as table;
