//! Integration tests for Layer 3: Magic
//!
//! Tests for spellbook shapes, slot allocation and eviction, rests, and items.

mod allocation;
mod items;
mod shapes;
