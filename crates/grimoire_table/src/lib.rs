//! Virtual repeating tables over a flat attribute store for Grimoire.
//!
//! The host store only knows flat, dual-slot attributes. This crate
//! synthesizes rows, columns, ordering and defaults out of attribute naming
//! conventions:
//!
//! - [`codec`] - Bidirectional mapping between table cells and attribute names
//! - [`rowkey`] - Collision-resistant row identifiers
//! - [`schema`] - Field and table definitions, row value sets
//! - [`view`] - In-memory projection of one table for one owner
//! - [`Sheet`] - The per-request context tying a store, a row-key generator
//!   and the deferred-attribute queue together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod config;
pub mod pending;
pub mod projection;
pub mod rowkey;
pub mod rows;
pub mod schema;
pub mod sheet;
pub mod view;

pub use codec::{ColumnGroup, DecodedName, FirstRow, RowToken, TableDef, flat_name};
pub use config::EngineConfig;
pub use pending::PendingQueue;
pub use projection::{Fallback, reconcile_order};
pub use rowkey::{Clock, RowKey, RowKeyGenerator, SystemClock};
pub use schema::{FieldDef, RowValues, TableSchema};
pub use sheet::Sheet;
pub use view::{FieldProjection, Row, TableView};
