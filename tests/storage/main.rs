//! Integration tests for Layer 1: Storage
//!
//! Tests for the flat attribute store: dual slots, name searches and bulk creation.

mod attributes;
mod bulk;
