//! Integration tests for Layer 4: Runtime
//!
//! Tests for sessions, command scripts, and snapshots.

mod session;
mod snapshot;
