//! Attribute store adapter and in-memory attribute store for Grimoire.
//!
//! This crate provides:
//! - [`AttributeStore`] - The boundary to the host's flat key/value store
//! - [`MemoryStore`] - An in-process store keeping records in creation order
//! - [`AttrId`], [`AttributeRef`], [`NameFilter`], [`PendingAttribute`] - Record
//!   handles and query/creation types shared by every store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod memory;
pub mod record;
pub mod store;

pub use memory::MemoryStore;
pub use record::{AttrId, AttributeRef, NameFilter, PendingAttribute};
pub use store::AttributeStore;
