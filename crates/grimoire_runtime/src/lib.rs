//! Sessions, snapshots, REPL and CLI for Grimoire.
//!
//! This crate provides:
//! - [`Session`] - One request per command, with the deferred queue flushed
//!   at the end of each
//! - [`Repl`] - Interactive loop and script runner
//! - [`serialize`] - `MessagePack` snapshots of the attribute store
//! - [`RuntimeConfig`] - Command-line options

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod repl;
pub mod serialize;
pub mod session;

pub use config::RuntimeConfig;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::Repl;
pub use session::{COMMANDS, DEFAULT_OWNER, Session};
