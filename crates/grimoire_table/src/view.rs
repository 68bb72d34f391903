//! In-memory projection of one table for one owner.

use std::sync::Arc;

use grimoire_foundation::{OwnerId, Value};
use grimoire_storage::AttrId;

use crate::codec::{ColumnGroup, TableDef};
use crate::rowkey::RowKey;
use crate::schema::FieldDef;

/// A logical row position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Row {
    /// The flat, non-repeating row.
    Flat,
    /// A repeating row, counted from zero in row order.
    Index(usize),
}

impl Row {
    /// Converts a signed row number; negative numbers address the flat row.
    #[must_use]
    pub fn from_signed(row: i64) -> Self {
        usize::try_from(row).map_or(Self::Flat, Self::Index)
    }

    /// Returns the repeating-row index, if any.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Flat => None,
            Self::Index(i) => Some(i),
        }
    }
}

impl From<usize> for Row {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// The records one field has in one column group, by row key.
#[derive(Clone, Debug)]
pub struct FieldProjection {
    pub(crate) def: FieldDef,
    pub(crate) default: Option<Value>,
    pub(crate) case_sensitive: bool,
    pub(crate) records: im::HashMap<RowKey, AttrId>,
}

impl FieldProjection {
    /// Returns the field definition.
    #[must_use]
    pub fn def(&self) -> &FieldDef {
        &self.def
    }

    /// Returns the default reported for unset slots.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the record a row key maps to.
    #[must_use]
    pub fn record(&self, key: &RowKey) -> Option<AttrId> {
        self.records.get(key).copied()
    }

    /// Returns the number of rows that have a record for this field.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no row has a record for this field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One owner's view of one column group of a table.
///
/// A view is rebuilt from the store on demand and never persisted. Cloning
/// is cheap: row order and field maps are persistent collections.
#[derive(Clone, Debug)]
pub struct TableView {
    owner: OwnerId,
    table: Option<TableDef>,
    column: ColumnGroup,
    pub(crate) sort_keys: im::Vector<RowKey>,
    pub(crate) fields: im::OrdMap<Arc<str>, FieldProjection>,
    name_field: Option<Arc<str>>,
}

impl TableView {
    /// Creates an empty view with no fields projected yet.
    ///
    /// A view without a table only ever addresses flat attributes.
    #[must_use]
    pub fn new(owner: OwnerId, table: Option<TableDef>, column: ColumnGroup) -> Self {
        Self {
            owner,
            table,
            column,
            sort_keys: im::Vector::new(),
            fields: im::OrdMap::new(),
            name_field: None,
        }
    }

    /// Designates the field whose presence marks a row as occupied.
    #[must_use]
    pub fn with_name_field(mut self, name: Option<&str>) -> Self {
        self.name_field = name.map(Arc::from);
        self
    }

    /// Returns the owner.
    #[must_use]
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns the table, if any.
    #[must_use]
    pub fn table(&self) -> Option<&TableDef> {
        self.table.as_ref()
    }

    /// Returns the column group.
    #[must_use]
    pub fn column(&self) -> ColumnGroup {
        self.column
    }

    /// Returns the name field, if one was designated.
    #[must_use]
    pub fn name_field(&self) -> Option<&str> {
        self.name_field.as_deref()
    }

    /// Returns the number of repeating rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sort_keys.len()
    }

    /// Returns true if the table has no repeating rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sort_keys.is_empty()
    }

    /// Returns the key of the row at `index`.
    #[must_use]
    pub fn row_key(&self, index: usize) -> Option<&RowKey> {
        self.sort_keys.get(index)
    }

    /// Iterates over row keys in row order.
    pub fn sort_keys(&self) -> impl Iterator<Item = &RowKey> + '_ {
        self.sort_keys.iter()
    }

    /// Returns the position of a row key.
    #[must_use]
    pub fn position(&self, key: &RowKey) -> Option<usize> {
        self.sort_keys.index_of(key)
    }

    /// Returns the projection of a logical field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldProjection> {
        self.fields.get(name)
    }

    /// Iterates over projected fields by logical name.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldProjection)> + '_ {
        self.fields.iter().map(|(n, p)| (&**n, p))
    }

    /// Returns `<prefix><column>`, or `flat` for views without a table.
    #[must_use]
    pub fn section(&self) -> String {
        self.table
            .as_ref()
            .map_or_else(|| "flat".to_string(), |t| t.section(self.column))
    }

    pub(crate) fn projection(&self, name: &str) -> grimoire_foundation::Result<&FieldProjection> {
        self.fields
            .get(name)
            .ok_or_else(|| grimoire_foundation::Error::unknown_field(name))
    }
}
