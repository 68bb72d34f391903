//! Writing cells and rows.

use std::sync::Arc;

use grimoire_foundation::{Error, ErrorContext, OwnerId, Result, Slot, Value};
use grimoire_storage::{AttrId, AttributeStore};
use tracing::{debug, error};

use crate::codec::{ColumnGroup, RowToken, TableDef, flat_name};
use crate::projection::Fallback;
use crate::rowkey::RowKey;
use crate::schema::{FieldDef, RowValues};
use crate::sheet::Sheet;
use crate::view::{Row, TableView};

impl<S: AttributeStore> Sheet<S> {
    /// Writes one cell.
    ///
    /// The flat row goes through [`ensure_flat_attribute`](Self::ensure_flat_attribute).
    /// A repeating row inside the table is written in place; if the row has
    /// no record for this field yet, one is created and every field of the
    /// view stored in it is re-projected.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is not projected in `view`, or if `row`
    /// lies past the end of the table. Out-of-range writes change nothing.
    pub fn set(
        &mut self,
        view: &mut TableView,
        field_name: &str,
        row: Row,
        value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into();
        let projection = view.projection(field_name)?;
        let def = projection.def.clone();

        let index = match row {
            Row::Flat => {
                let name = flat_name(view.table(), view.column(), &def.suffix);
                let owner = view.owner().clone();
                return self.ensure_flat_attribute(&owner, &name, def.slot, value);
            }
            Row::Index(index) => index,
        };

        let (Some(table), Some(key)) = (view.table().cloned(), view.row_key(index).cloned()) else {
            error!(
                owner = %view.owner(),
                table = %view.section(),
                row = index,
                field = field_name,
                rows = view.len(),
                "Write past the end of the table"
            );
            return Err(
                Error::row_out_of_range(view.section(), field_name, index, view.len()).with_context(
                    ErrorContext::new()
                        .with_owner(view.owner())
                        .with_table(view.section())
                        .with_row(index)
                        .with_field(field_name),
                ),
            );
        };

        if let Some(id) = projection.record(&key) {
            return self.store.write(id, def.slot, value);
        }

        let id = self.create_cell(view.owner(), &table, view.column(), &key, &def.suffix)?;
        self.store.write(id, def.slot, value)?;
        self.reproject_suffix(view, &def.suffix);
        Ok(())
    }

    /// Adds or updates a row.
    ///
    /// The flat row, and any row whose name field already holds a value, is
    /// updated: only the supplied values are written. Otherwise a row is
    /// inserted. Past the end of the table a new row key is generated and
    /// appended; inside the table the existing key is reused and only the
    /// missing records are created. An inserted record gets the supplied
    /// value, else the field default, else the empty string, in each of its
    /// slots.
    ///
    /// Returns the row that was written.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be created or written.
    pub fn add_row(
        &mut self,
        view: &mut TableView,
        row: Row,
        values: Option<&RowValues>,
    ) -> Result<Row> {
        let empty = RowValues::new();
        let values = values.unwrap_or(&empty);

        if self.is_occupied(view, row) {
            for (field_name, value) in values.iter() {
                if view.field(field_name).is_some() {
                    self.set(view, field_name, row, value.clone())?;
                } else {
                    debug!(field = field_name, table = %view.section(), "Skipping value for unprojected field");
                }
            }
            return Ok(row);
        }

        let Row::Index(index) = row else {
            return Ok(row);
        };
        let Some(table) = view.table().cloned() else {
            return Err(Error::internal(format!(
                "cannot insert row {index} into a view without a table"
            )));
        };

        let (index, key) = match view.row_key(index) {
            Some(key) => (index, key.clone()),
            None => {
                let key = self.keys.next_row_key();
                view.sort_keys.push_back(key.clone());
                (view.len() - 1, key)
            }
        };

        for (suffix, fields) in record_groups(view) {
            let existing = fields
                .iter()
                .find_map(|name| view.field(name).and_then(|p| p.record(&key)));
            match existing {
                Some(id) => {
                    for name in &fields {
                        if let Some(value) = values.get(name) {
                            let slot = view.projection(name)?.def.slot;
                            self.store.write(id, slot, value.clone())?;
                        }
                    }
                }
                None => {
                    let id = self.create_cell(view.owner(), &table, view.column(), &key, &suffix)?;
                    for slot in [Slot::Current, Slot::Max] {
                        let value = fields
                            .iter()
                            .filter_map(|name| view.field(name).map(|p| (name, p)))
                            .find(|(_, p)| p.def.slot == slot)
                            .and_then(|(name, p)| {
                                values.get(name).cloned().or_else(|| p.default.clone())
                            })
                            .unwrap_or_default();
                        self.store.write(id, slot, value)?;
                    }
                    register(view, &fields, &key, id);
                }
            }
        }

        debug!(
            owner = %view.owner(),
            table = %view.section(),
            row = index,
            key = %key,
            "Inserted row"
        );
        Ok(Row::Index(index))
    }

    /// Reads a field addressed directly rather than through a view.
    ///
    /// Repeating rows are resolved by projecting the field on the fly.
    /// Unset slots read as `None`.
    #[must_use]
    pub fn attr_lookup(
        &self,
        owner: &OwnerId,
        field: &FieldDef,
        table: Option<&TableDef>,
        column: ColumnGroup,
        row: Row,
    ) -> Option<Value> {
        match (table, row) {
            (Some(table), Row::Index(_)) => {
                let view = self.get_table(
                    TableView::new(owner.clone(), Some(table.clone()), column),
                    "field",
                    field,
                    None,
                    self.config.case_sensitive,
                );
                self.lookup_with(&view, "field", row, &Fallback::Absent)
            }
            _ => self.read_flat(owner, &flat_name(table, column, &field.suffix), field.slot),
        }
    }

    /// Writes a field addressed directly rather than through a view.
    ///
    /// # Errors
    ///
    /// Returns an error if the row lies past the end of the table.
    pub fn set_attr(
        &mut self,
        owner: &OwnerId,
        field: &FieldDef,
        table: Option<&TableDef>,
        column: ColumnGroup,
        row: Row,
        value: impl Into<Value>,
    ) -> Result<()> {
        match (table, row) {
            (Some(table), Row::Index(_)) => {
                let mut view = self.get_table(
                    TableView::new(owner.clone(), Some(table.clone()), column),
                    "field",
                    field,
                    None,
                    self.config.case_sensitive,
                );
                self.set(&mut view, "field", row, value)
            }
            _ => {
                let name = flat_name(table, column, &field.suffix);
                self.ensure_flat_attribute(owner, &name, field.slot, value)
            }
        }
    }

    /// A repeating row is occupied when its name field holds a value, or,
    /// without a name field, when it lies inside the table.
    fn is_occupied(&self, view: &TableView, row: Row) -> bool {
        match (row, view.name_field()) {
            (Row::Flat, _) => true,
            (Row::Index(_), Some(name)) => self
                .lookup_with(view, name, row, &Fallback::Absent)
                .is_some(),
            (Row::Index(i), None) => i < view.len(),
        }
    }

    fn create_cell(
        &mut self,
        owner: &OwnerId,
        table: &TableDef,
        column: ColumnGroup,
        key: &RowKey,
        suffix: &str,
    ) -> Result<AttrId> {
        let name = table.row_name(column, &RowToken::Key(key.clone()), suffix);
        debug!(owner = %owner, name, "Creating row record");
        self.store.create(owner, &name)
    }

    /// Re-projects every field of the view stored under `suffix`.
    fn reproject_suffix(&self, view: &mut TableView, suffix: &str) {
        let fields: Vec<_> = view
            .fields()
            .filter(|(_, p)| &*p.def.suffix == suffix)
            .map(|(name, p)| (name.to_string(), p.def.clone(), p.default.clone(), p.case_sensitive))
            .collect();
        for (name, def, default, case_sensitive) in fields {
            self.project_field(view, &name, &def, default, case_sensitive);
        }
    }
}

/// Groups a view's fields by the record they share, in field-name order.
fn record_groups(view: &TableView) -> Vec<(Arc<str>, Vec<String>)> {
    let mut groups: Vec<(Arc<str>, Vec<String>)> = Vec::new();
    for (name, projection) in view.fields() {
        let suffix = &projection.def.suffix;
        match groups.iter_mut().find(|(s, _)| s == suffix) {
            Some((_, names)) => names.push(name.to_string()),
            None => groups.push((suffix.clone(), vec![name.to_string()])),
        }
    }
    groups
}

/// Records `id` as the row's record for every field in `fields`.
fn register(view: &mut TableView, fields: &[String], key: &RowKey, id: AttrId) {
    for name in fields {
        if let Some(projection) = view.fields.get_mut(name.as_str()) {
            projection.records.insert(key.clone(), id);
        }
    }
}
