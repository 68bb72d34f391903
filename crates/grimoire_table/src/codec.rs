//! Mapping between table cells and physical attribute names.
//!
//! A cell of a virtual table is addressed by a table prefix, a column group,
//! a row and a field suffix. Repeating rows are stored as
//!
//! ```text
//! <prefix><column>_<row token>_<suffix><column>
//! ```
//!
//! and the flat row as `<suffix><column>`. Column group 1 is written without
//! its number on tables whose first row is flat, so that the first column of
//! such a table reads as plain field names.

use std::fmt;
use std::sync::Arc;

use crate::rowkey::RowKey;

/// How the first logical row of a table is stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FirstRow {
    /// Iteration starts at the flat row, and column group 1 carries no
    /// number in attribute names.
    Flat,
    /// Every row is a repeating row and column numbers are always written.
    Repeating,
}

/// Identifies one column group of a multi-column table.
///
/// Tables without column groups use [`ColumnGroup::NONE`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnGroup(Option<u32>);

impl ColumnGroup {
    /// No column group.
    pub const NONE: Self = Self(None);

    /// Creates a numbered column group.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(Some(number))
    }

    /// Returns the group number, if any.
    #[must_use]
    pub const fn number(self) -> Option<u32> {
        self.0
    }
}

impl From<u32> for ColumnGroup {
    fn from(number: u32) -> Self {
        Self::new(number)
    }
}

impl fmt::Display for ColumnGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{n}"),
            None => Ok(()),
        }
    }
}

/// The row part of a repeating-row name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RowToken {
    /// A generated row key.
    Key(RowKey),
    /// A positional placeholder, written `$N`.
    Placeholder(usize),
}

impl RowToken {
    /// Parses a row token as found between the separators of a name.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(digits) = token.strip_prefix('$') {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            return digits.parse().ok().map(Self::Placeholder);
        }
        RowKey::is_valid(token).then(|| Self::Key(RowKey::new(token)))
    }
}

impl fmt::Display for RowToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key.as_str()),
            Self::Placeholder(n) => write!(f, "${n}"),
        }
    }
}

/// A repeating table: its name prefix and how its first row is stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableDef {
    prefix: Arc<str>,
    first_row: FirstRow,
}

/// The parts of a repeating-row attribute name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedName {
    /// Column group of the cell.
    pub column: ColumnGroup,
    /// Row token of the cell.
    pub row: RowToken,
    /// Field suffix, without the column number.
    pub suffix: String,
}

impl TableDef {
    /// Creates a table definition.
    #[must_use]
    pub fn new(prefix: impl AsRef<str>, first_row: FirstRow) -> Self {
        Self {
            prefix: Arc::from(prefix.as_ref()),
            first_row,
        }
    }

    /// Returns the table prefix, e.g. `repeating_spells`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns how the first row is stored.
    #[must_use]
    pub const fn first_row(&self) -> FirstRow {
        self.first_row
    }

    /// Renders the column number as it appears in names of this table.
    #[must_use]
    pub fn column_token(&self, column: ColumnGroup) -> String {
        column_token(Some(self), column)
    }

    /// Returns `<prefix><column>`, the section name of one column group.
    #[must_use]
    pub fn section(&self, column: ColumnGroup) -> String {
        format!("{}{}", self.prefix, self.column_token(column))
    }

    /// Encodes the name of a repeating-row cell.
    #[must_use]
    pub fn row_name(&self, column: ColumnGroup, row: &RowToken, suffix: &str) -> String {
        let col = self.column_token(column);
        format!("{}{col}_{row}_{suffix}{col}", self.prefix)
    }

    /// Decodes a repeating-row cell name of this table.
    ///
    /// A name without a column number decodes to column group 1 on tables
    /// whose first row is flat, and to [`ColumnGroup::NONE`] otherwise.
    #[must_use]
    pub fn decode(&self, name: &str) -> Option<DecodedName> {
        let rest = name.strip_prefix(&*self.prefix)?;
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (col, rest) = rest.split_at(digits);
        let rest = rest.strip_prefix('_')?;
        let (token, tail) = rest.split_once('_')?;
        let row = RowToken::parse(token)?;
        let suffix = tail.strip_suffix(col)?;
        if suffix.is_empty() {
            return None;
        }
        let column = if col.is_empty() {
            match self.first_row {
                FirstRow::Flat => ColumnGroup::new(1),
                FirstRow::Repeating => ColumnGroup::NONE,
            }
        } else {
            ColumnGroup::new(col.parse().ok()?)
        };
        Some(DecodedName {
            column,
            row,
            suffix: suffix.to_string(),
        })
    }
}

/// Renders a column number for a name, omitting group 1 where it is implied.
#[must_use]
pub fn column_token(table: Option<&TableDef>, column: ColumnGroup) -> String {
    match column.number() {
        None => String::new(),
        Some(1) if table.is_none_or(|t| t.first_row == FirstRow::Flat) => String::new(),
        Some(n) => n.to_string(),
    }
}

/// Encodes the name of a flat cell: `<suffix><column>`.
#[must_use]
pub fn flat_name(table: Option<&TableDef>, column: ColumnGroup, suffix: &str) -> String {
    format!("{suffix}{}", column_token(table, column))
}

/// Matches physical names against one field of one column group.
///
/// Built once per projection, then applied to every candidate attribute.
#[derive(Clone, Debug)]
pub(crate) struct CellMatcher {
    head: String,
    tail: String,
    case_sensitive: bool,
}

impl CellMatcher {
    pub(crate) fn new(
        table: &TableDef,
        column: ColumnGroup,
        suffix: &str,
        case_sensitive: bool,
    ) -> Self {
        let col = table.column_token(column);
        Self {
            head: format!("{}{col}_", table.prefix),
            tail: format!("_{suffix}{col}"),
            case_sensitive,
        }
    }

    /// The fixed start every matching name shares.
    pub(crate) fn head(&self) -> &str {
        &self.head
    }

    /// Returns the row key embedded in `name`, if it belongs to this field.
    pub(crate) fn row_key<'n>(&self, name: &'n str) -> Option<&'n str> {
        if name.len() <= self.head.len() + self.tail.len() {
            return None;
        }
        let head = name.get(..self.head.len())?;
        let tail = name.get(name.len() - self.tail.len()..)?;
        let matched = if self.case_sensitive {
            head == self.head && tail == self.tail
        } else {
            head.eq_ignore_ascii_case(&self.head) && tail.eq_ignore_ascii_case(&self.tail)
        };
        if !matched {
            return None;
        }
        let token = &name[self.head.len()..name.len() - self.tail.len()];
        RowKey::is_valid(token).then_some(token)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn token() -> impl Strategy<Value = RowToken> {
        prop_oneof![
            "[-0-9A-Za-z]{1,20}".prop_map(|s| RowToken::Key(RowKey::new(s))),
            (0usize..1000).prop_map(RowToken::Placeholder),
        ]
    }

    proptest! {
        #[test]
        fn flat_first_row_names_round_trip(
            prefix in "repeating_[a-z]{1,10}",
            column in 1u32..100,
            row in token(),
            suffix in "[a-z][a-z-]{0,12}",
        ) {
            let table = TableDef::new(&prefix, FirstRow::Flat);
            let name = table.row_name(ColumnGroup::new(column), &row, &suffix);
            let decoded = table.decode(&name).unwrap();
            prop_assert_eq!(decoded.column, ColumnGroup::new(column));
            prop_assert_eq!(decoded.row, row);
            prop_assert_eq!(decoded.suffix, suffix);
        }

        #[test]
        fn repeating_first_row_names_round_trip(
            prefix in "repeating_[a-z]{1,10}",
            column in proptest::option::of(0u32..100),
            row in token(),
            suffix in "[a-z][a-z-]{0,12}",
        ) {
            let table = TableDef::new(&prefix, FirstRow::Repeating);
            let column = ColumnGroup(column);
            let name = table.row_name(column, &row, &suffix);
            let decoded = table.decode(&name).unwrap();
            prop_assert_eq!(decoded.column, column);
            prop_assert_eq!(decoded.row, row);
            prop_assert_eq!(decoded.suffix, suffix);
        }
    }
}
