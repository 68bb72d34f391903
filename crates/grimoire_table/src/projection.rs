//! Building table views from the store and reading cells through them.

use std::sync::Arc;

use grimoire_foundation::{OwnerId, Slot, Value};
use grimoire_storage::{AttrId, AttributeStore, NameFilter};
use tracing::{debug, trace};

use crate::codec::{CellMatcher, ColumnGroup, FirstRow, TableDef, flat_name};
use crate::rowkey::RowKey;
use crate::schema::{FieldDef, TableSchema};
use crate::sheet::Sheet;
use crate::view::{FieldProjection, Row, TableView};

/// What a lookup reports when a row's record exists but its slot is unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Fallback {
    /// The field's default.
    #[default]
    FieldDefault,
    /// Nothing.
    Absent,
    /// The given value.
    Use(Value),
}

/// Merges a persisted row order with the keys discovered in the store.
///
/// Persisted keys that still exist come first, in persisted order; keys
/// discovered but never persisted follow in discovery order. Persisted keys
/// are matched ignoring ASCII case and each discovered key appears once.
#[must_use]
pub fn reconcile_order(persisted: &[&str], discovered: &[RowKey]) -> Vec<RowKey> {
    let mut taken = vec![false; discovered.len()];
    let mut order = Vec::with_capacity(discovered.len());
    for wanted in persisted {
        let found = discovered
            .iter()
            .enumerate()
            .find(|(i, key)| !taken[*i] && key.as_str().eq_ignore_ascii_case(wanted));
        if let Some((i, key)) = found {
            taken[i] = true;
            order.push(key.clone());
        }
    }
    order.extend(
        discovered
            .iter()
            .zip(&taken)
            .filter(|(_, taken)| !**taken)
            .map(|(key, _)| key.clone()),
    );
    order
}

impl<S: AttributeStore> Sheet<S> {
    /// Projects one field of a table into `view`.
    ///
    /// Every record of the owner whose name encodes a row of this field in
    /// the view's column group is collected by row key. The view's row order
    /// is recomputed from the persisted order and the keys found, and
    /// replaced unless it would shrink.
    ///
    /// `default` overrides the field's own default for this view.
    #[must_use]
    pub fn get_table(
        &self,
        mut view: TableView,
        field_name: &str,
        field: &FieldDef,
        default: Option<Value>,
        case_sensitive: bool,
    ) -> TableView {
        self.project_field(&mut view, field_name, field, default, case_sensitive);
        view
    }

    /// Projects every field of a schema for one owner and column group.
    #[must_use]
    pub fn project(&self, owner: &OwnerId, schema: &TableSchema, column: ColumnGroup) -> TableView {
        let mut view = TableView::new(owner.clone(), Some(schema.table.clone()), column)
            .with_name_field(schema.name_field());
        for (name, field) in schema.fields() {
            self.project_field(&mut view, name, field, None, self.config.case_sensitive);
        }
        view
    }

    pub(crate) fn project_field(
        &self,
        view: &mut TableView,
        field_name: &str,
        field: &FieldDef,
        default: Option<Value>,
        case_sensitive: bool,
    ) {
        let default = default.or_else(|| field.default.clone());
        let mut records = im::HashMap::new();

        if let Some(table) = view.table().cloned() {
            let matcher = CellMatcher::new(&table, view.column(), &field.suffix, case_sensitive);
            let candidates = self.store.find(
                view.owner(),
                &NameFilter::Prefix {
                    prefix: matcher.head(),
                    case_sensitive,
                },
            );

            let mut discovered = Vec::new();
            for candidate in candidates {
                let Some(token) = matcher.row_key(&candidate.name) else {
                    continue;
                };
                let key = RowKey::new(token);
                if records.contains_key(&key) {
                    trace!(name = %candidate.name, "Duplicate row record ignored");
                    continue;
                }
                records.insert(key.clone(), candidate.id);
                discovered.push(key);
            }

            let persisted = self.persisted_order(view.owner(), &table, view.column());
            let persisted: Vec<&str> = persisted.iter().map(String::as_str).collect();
            let order = reconcile_order(&persisted, &discovered);
            if order.len() >= view.sort_keys.len() {
                view.sort_keys = order.into_iter().collect();
            }
            debug!(
                owner = %view.owner(),
                table = %view.section(),
                field = field_name,
                records = records.len(),
                rows = view.len(),
                "Projected field"
            );
        }

        view.fields.insert(
            Arc::from(field_name),
            FieldProjection {
                def: field.clone(),
                default,
                case_sensitive,
                records,
            },
        );
    }

    /// Name of the flat attribute holding a column group's row order.
    #[must_use]
    pub fn row_order_name(&self, table: &TableDef, column: ColumnGroup) -> String {
        format!("{}{}", self.config.row_order_prefix, table.section(column))
    }

    fn persisted_order(&self, owner: &OwnerId, table: &TableDef, column: ColumnGroup) -> Vec<String> {
        self.read_flat(owner, &self.row_order_name(table, column), Slot::Current)
            .map(|order| {
                order
                    .as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Persists the view's current row order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order attribute exists and cannot be written.
    pub fn save_row_order(&mut self, view: &TableView) -> grimoire_foundation::Result<()> {
        let Some(table) = view.table() else {
            return Ok(());
        };
        let name = self.row_order_name(table, view.column());
        let order = view
            .sort_keys()
            .map(RowKey::as_str)
            .collect::<Vec<_>>()
            .join(",");
        self.ensure_flat_attribute(view.owner(), &name, Slot::Current, order)
    }

    /// Reads a field with the field's default as fallback.
    ///
    /// Returns `None` past the end of the table or where the row has no
    /// record for this field, which is how callers find the end of a table.
    #[must_use]
    pub fn lookup(&self, view: &TableView, field_name: &str, row: Row) -> Option<Value> {
        self.lookup_with(view, field_name, row, &Fallback::FieldDefault)
    }

    /// Reads a field with an explicit fallback.
    #[must_use]
    pub fn lookup_with(
        &self,
        view: &TableView,
        field_name: &str,
        row: Row,
        fallback: &Fallback,
    ) -> Option<Value> {
        let projection = view.field(field_name)?;
        self.lookup_slot(view, field_name, row, projection.def.slot, fallback)
    }

    /// Reads either slot of the record a field lives in.
    #[must_use]
    pub fn lookup_slot(
        &self,
        view: &TableView,
        field_name: &str,
        row: Row,
        slot: Slot,
        fallback: &Fallback,
    ) -> Option<Value> {
        let projection = view.field(field_name)?;
        let value = match row {
            Row::Flat => {
                let name = flat_name(view.table(), view.column(), &projection.def.suffix);
                self.store
                    .read_named(view.owner(), &name, slot, projection.case_sensitive)
            }
            Row::Index(_) => {
                let id = self.record(view, field_name, row)?;
                self.store.read(id, slot)
            }
        };
        value.or_else(|| match fallback {
            Fallback::FieldDefault => projection.default.clone(),
            Fallback::Absent => None,
            Fallback::Use(v) => Some(v.clone()),
        })
    }

    /// Returns the record a field has at a repeating row.
    #[must_use]
    pub fn record(&self, view: &TableView, field_name: &str, row: Row) -> Option<AttrId> {
        let projection = view.field(field_name)?;
        match row {
            Row::Flat => {
                let name = flat_name(view.table(), view.column(), &projection.def.suffix);
                self.store
                    .find_one(view.owner(), &name, projection.case_sensitive)
            }
            Row::Index(i) => projection.record(view.row_key(i)?),
        }
    }

    /// Finds the first row whose field loosely matches `text`.
    ///
    /// Case, whitespace, `-` and `_` are ignored. On tables whose first row
    /// is flat, the flat row is checked first.
    #[must_use]
    pub fn find_row(&self, view: &TableView, field_name: &str, text: &str) -> Option<Row> {
        let projection = view.field(field_name)?;
        let slot = projection.def.slot;
        let flat_first = view
            .table()
            .is_none_or(|t| t.first_row() == FirstRow::Flat);
        if flat_first
            && self
                .lookup_slot(view, field_name, Row::Flat, slot, &Fallback::Absent)
                .is_some_and(|v| v.matches_loosely(text))
        {
            return Some(Row::Flat);
        }
        view.sort_keys().enumerate().find_map(|(i, key)| {
            let id = projection.record(key)?;
            let value = self.store.read(id, slot)?;
            value.matches_loosely(text).then_some(Row::Index(i))
        })
    }
}
