//! Error types for the Grimoire system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::owner::OwnerId;

/// The main error type for Grimoire operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a record-not-found error.
    #[must_use]
    pub fn record_not_found(owner: &OwnerId, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::RecordNotFound {
            owner: owner.clone(),
            name: name.into(),
        })
    }

    /// Creates an unknown-field error.
    #[must_use]
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField(name.into()))
    }

    /// Creates a row-out-of-range error for a write past the end of a table.
    #[must_use]
    pub fn row_out_of_range(
        table: impl Into<String>,
        field: impl Into<String>,
        row: usize,
        length: usize,
    ) -> Self {
        Self::new(ErrorKind::RowOutOfRange {
            table: table.into(),
            field: field.into(),
            row,
            length,
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Creates a command error (bad user input at the runtime layer).
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Command(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No attribute record with this name exists for the owner.
    #[error("attribute not found: {name} on {owner}")]
    RecordNotFound {
        /// The owner that was searched.
        owner: OwnerId,
        /// The physical attribute name.
        name: String,
    },

    /// A logical field name is not tracked by the table view.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A cell write targeted a row past the end of the table.
    #[error("cannot write {field} at row {row} of {table}: table has {length} rows")]
    RowOutOfRange {
        /// The table prefix (including column group).
        table: String,
        /// The logical field name.
        field: String,
        /// The requested row.
        row: usize,
        /// The current number of rows.
        length: usize,
    },

    /// A physical attribute name could not be built or parsed.
    #[error("invalid attribute name: {0}")]
    InvalidName(String),

    /// The caster kind is not one the spellbook shape understands.
    #[error("unknown caster kind: {0}")]
    UnknownCasterKind(String),

    /// Deferred attribute creation failed for one or more owners.
    #[error("failed to create pending attributes for {}", owners.join(", "))]
    FlushFailed {
        /// Owners whose pending attributes could not be created.
        owners: Vec<String>,
    },

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File system error.
    #[error("io error: {0}")]
    Io(String),

    /// A runtime command was malformed.
    #[error("{0}")]
    Command(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Owner whose attributes were being touched.
    pub owner: Option<String>,
    /// Table prefix, including column group.
    pub table: Option<String>,
    /// Logical row number.
    pub row: Option<usize>,
    /// Logical field name.
    pub field: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owner.
    #[must_use]
    pub fn with_owner(mut self, owner: &OwnerId) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    /// Sets the table.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Sets the row.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Sets the field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(owner) = &self.owner {
            parts.push(format!("owner {owner}"));
        }
        if let Some(table) = &self.table {
            parts.push(format!("table {table}"));
        }
        if let Some(row) = self.row {
            parts.push(format!("row {row}"));
        }
        if let Some(field) = &self.field {
            parts.push(format!("field {field}"));
        }
        if parts.is_empty() {
            return Ok(());
        }
        write!(f, "at {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_out_of_range_message() {
        let err = Error::row_out_of_range("repeating_spells", "Spells_name", 7, 3);
        assert!(matches!(err.kind, ErrorKind::RowOutOfRange { row: 7, .. }));
        let msg = format!("{err}");
        assert!(msg.contains("repeating_spells"));
        assert!(msg.contains('7'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn error_with_context() {
        let owner = OwnerId::new("-Mabc");
        let err = Error::unknown_field("Spells_db").with_context(
            ErrorContext::new()
                .with_owner(&owner)
                .with_table("repeating_spells4")
                .with_row(2),
        );

        let ctx = err.context.unwrap();
        assert_eq!(ctx.owner.as_deref(), Some("-Mabc"));
        assert_eq!(ctx.row, Some(2));
        let rendered = ctx.to_string();
        assert!(rendered.contains("table repeating_spells4"));
        assert!(rendered.contains("row 2"));
    }

    #[test]
    fn empty_context_renders_nothing() {
        assert_eq!(ErrorContext::new().to_string(), "");
    }

    #[test]
    fn flush_failed_lists_owners() {
        let err = Error::new(ErrorKind::FlushFailed {
            owners: vec!["a".to_string(), "b".to_string()],
        });
        assert_eq!(err.to_string(), "failed to create pending attributes for a, b");
    }
}
