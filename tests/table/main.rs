//! Integration tests for Layer 2: Tables
//!
//! Tests for cell naming, row keys, row order and row writes over a flat store.

mod naming;
mod ordering;
mod rows;
