//! Field and table definitions.
//!
//! A table's logical fields map onto physical attribute suffixes and slots.
//! Two logical fields may share a suffix and differ only in slot; they then
//! live in the same record.

use std::collections::BTreeMap;
use std::sync::Arc;

use grimoire_foundation::{Slot, Value};

use crate::codec::TableDef;

/// One logical field of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Physical attribute suffix, without the column number.
    pub suffix: Arc<str>,
    /// Which slot of the record holds this field.
    pub slot: Slot,
    /// Value reported for a row whose record exists but whose slot is unset.
    pub default: Option<Value>,
}

impl FieldDef {
    /// Creates a field with no default.
    #[must_use]
    pub fn new(suffix: impl AsRef<str>, slot: Slot) -> Self {
        Self {
            suffix: Arc::from(suffix.as_ref()),
            slot,
            default: None,
        }
    }

    /// Creates a field stored in the `current` slot.
    #[must_use]
    pub fn current(suffix: impl AsRef<str>, default: impl Into<Value>) -> Self {
        Self::new(suffix, Slot::Current).with_default(default)
    }

    /// Creates a field stored in the `max` slot.
    #[must_use]
    pub fn max(suffix: impl AsRef<str>, default: impl Into<Value>) -> Self {
        Self::new(suffix, Slot::Max).with_default(default)
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Returns true if `other` is stored in the same record as this field.
    #[must_use]
    pub fn shares_record_with(&self, other: &FieldDef) -> bool {
        self.suffix == other.suffix
    }
}

/// A table together with its logical fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSchema {
    /// The table the fields live in.
    pub table: TableDef,
    fields: Vec<(Arc<str>, FieldDef)>,
    name_field: Option<Arc<str>>,
}

impl TableSchema {
    /// Creates a schema with no fields.
    #[must_use]
    pub fn new(table: TableDef) -> Self {
        Self {
            table,
            fields: Vec::new(),
            name_field: None,
        }
    }

    /// Adds a logical field.
    ///
    /// A field with the same logical name replaces the earlier one.
    #[must_use]
    pub fn with_field(mut self, name: impl AsRef<str>, field: FieldDef) -> Self {
        let name: Arc<str> = Arc::from(name.as_ref());
        self.fields.retain(|(existing, _)| *existing != name);
        self.fields.push((name, field));
        self
    }

    /// Designates the field whose presence marks a row as occupied.
    #[must_use]
    pub fn with_name_field(mut self, name: impl AsRef<str>) -> Self {
        self.name_field = Some(Arc::from(name.as_ref()));
        self
    }

    /// Returns a field by logical name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, f)| f)
    }

    /// Iterates over the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> + '_ {
        self.fields.iter().map(|(n, f)| (&**n, f))
    }

    /// Returns the name field, if one was designated.
    #[must_use]
    pub fn name_field(&self) -> Option<&str> {
        self.name_field.as_deref()
    }

    /// Builds the row a freshly blanked entry of this table holds.
    ///
    /// Fields without a default are left out.
    #[must_use]
    pub fn default_values(&self) -> RowValues {
        self.fields
            .iter()
            .filter_map(|(name, field)| Some((name.to_string(), field.default.clone()?)))
            .collect()
    }
}

/// Values for some fields of one row, keyed by logical field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowValues(BTreeMap<String, Value>);

impl RowValues {
    /// Creates an empty set of values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Returns the value for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Removes the value for a field.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Iterates over the values in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no values are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for RowValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
