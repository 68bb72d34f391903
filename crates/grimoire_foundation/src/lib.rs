//! Core types, values, and errors for Grimoire.
//!
//! This crate provides:
//! - [`OwnerId`] - Identifier of the character record that owns attributes
//! - [`Value`] - The text scalar held in an attribute slot
//! - [`Slot`] - Which of an attribute's two slots is addressed
//! - [`Error`] - Rich error types with diagnostic context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod owner;
pub mod slot;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind};
pub use owner::OwnerId;
pub use slot::Slot;
pub use value::Value;

/// Result type used throughout Grimoire.
pub type Result<T> = std::result::Result<T, Error>;
