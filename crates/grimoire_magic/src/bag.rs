//! The item bag.

use grimoire_foundation::{OwnerId, Result, Value};
use grimoire_storage::AttributeStore;
use grimoire_table::{ColumnGroup, Row, RowValues, TableView};
use tracing::debug;

use crate::caster::MagicSheet;
use crate::layout::bag;

/// One bag row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BagItem {
    /// Name shown on the sheet.
    pub name: Value,
    /// The item's real name.
    pub true_name: Value,
    /// Speed shown on the sheet.
    pub speed: Value,
    /// Real speed, restored on a long rest.
    pub true_speed: Value,
    /// Quantity left.
    pub qty: Value,
    /// Quantity restored on a long rest.
    pub true_qty: Value,
    /// Cost per use.
    pub cost: Value,
    /// Item type.
    pub kind: Value,
}

impl BagItem {
    /// Creates an item whose shown and true names agree.
    #[must_use]
    pub fn new(name: impl Into<Value>) -> Self {
        let name = name.into();
        Self {
            true_name: name.clone(),
            name,
            speed: Value::new("5"),
            true_speed: Value::new("5"),
            qty: Value::new("1"),
            true_qty: Value::new("1"),
            cost: Value::new("0"),
            kind: Value::empty(),
        }
    }

    /// The contents of an empty bag slot.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            name: Value::new("-"),
            true_name: Value::new("-"),
            speed: Value::new("0"),
            true_speed: Value::new("0"),
            qty: Value::empty(),
            true_qty: Value::empty(),
            cost: Value::new("0"),
            kind: Value::empty(),
        }
    }

    /// Builder method to set both quantities.
    #[must_use]
    pub fn with_qty(mut self, qty: impl Into<Value>) -> Self {
        self.qty = qty.into();
        self.true_qty = self.qty.clone();
        self
    }

    /// Builder method to set both speeds.
    #[must_use]
    pub fn with_speed(mut self, speed: impl Into<Value>) -> Self {
        self.speed = speed.into();
        self.true_speed = self.speed.clone();
        self
    }

    /// Builder method to set the item type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<Value>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Returns true for the empty-slot sentinel.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name == "-"
    }

    fn to_values(&self) -> RowValues {
        RowValues::new()
            .with(bag::NAME, self.name.clone())
            .with(bag::TRUE_NAME, self.true_name.clone())
            .with(bag::SPEED, self.speed.clone())
            .with(bag::TRUE_SPEED, self.true_speed.clone())
            .with(bag::QTY, self.qty.clone())
            .with(bag::TRUE_QTY, self.true_qty.clone())
            .with(bag::COST, self.cost.clone())
            .with(bag::KIND, self.kind.clone())
    }

    fn from_values(values: &RowValues) -> Self {
        let get = |field: &str| values.get(field).cloned().unwrap_or_default();
        Self {
            name: get(bag::NAME),
            true_name: get(bag::TRUE_NAME),
            speed: get(bag::SPEED),
            true_speed: get(bag::TRUE_SPEED),
            qty: get(bag::QTY),
            true_qty: get(bag::TRUE_QTY),
            cost: get(bag::COST),
            kind: get(bag::KIND),
        }
    }
}

impl<S: AttributeStore> MagicSheet<'_, S> {
    fn bag_view(&self, owner: &OwnerId) -> TableView {
        self.sheet
            .project(owner, &self.layout.bag, ColumnGroup::NONE)
    }

    /// Writes an item into a bag row, adding the row if needed.
    ///
    /// Returns the row actually written, which is the end of the bag when
    /// `row` lies past it.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    pub fn store_item(&mut self, owner: &OwnerId, row: usize, item: &BagItem) -> Result<usize> {
        let mut view = self.bag_view(owner);
        let written = self
            .sheet
            .add_row(&mut view, Row::Index(row), Some(&item.to_values()))?;
        let row = written.index().unwrap_or(row);
        debug!(owner = %owner, row, item = %item.name, "Stored bag item");
        Ok(row)
    }

    /// Empties a bag row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    pub fn blank_bag_slot(&mut self, owner: &OwnerId, row: usize) -> Result<usize> {
        self.store_item(owner, row, &BagItem::blank())
    }

    /// Lists the non-empty bag rows.
    #[must_use]
    pub fn bag_items(&self, owner: &OwnerId) -> Vec<(usize, BagItem)> {
        let view = self.bag_view(owner);
        (0..view.len())
            .map(|row| (row, BagItem::from_values(&self.row_values(&view, row))))
            .filter(|(_, item)| !item.is_blank())
            .collect()
    }
}
