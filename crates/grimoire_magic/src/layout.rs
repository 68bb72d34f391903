//! The physical layout of a character sheet.
//!
//! Everything the magic layer knows about attribute names lives here, so a
//! sheet with different naming can be supported by building a different
//! [`SheetLayout`].

use grimoire_foundation::Value;
use grimoire_table::{FieldDef, FirstRow, TableDef, TableSchema};

/// Logical field names of the spell grid.
pub mod spell {
    /// Spell name, or the empty-slot sentinel.
    pub const NAME: &str = "name";
    /// Database the spell definition comes from.
    pub const DB: &str = "db";
    /// Casting time.
    pub const SPEED: &str = "speed";
    /// Cost to cast.
    pub const COST: &str = "cost";
    /// Casts remaining.
    pub const CAST_VALUE: &str = "castValue";
    /// Casts per rest.
    pub const CAST_MAX: &str = "castMax";
    /// Level a stored spell was cast at.
    pub const STORED_LEVEL: &str = "storedLevel";
    /// Which spell set of an item the spell belongs to.
    pub const SPELL_SET: &str = "spellSet";
    /// Message shown when cast.
    pub const MESSAGE: &str = "msg";
}

/// Logical field names of the item bag.
pub mod bag {
    /// Displayed item name.
    pub const NAME: &str = "name";
    /// True item name.
    pub const TRUE_NAME: &str = "trueName";
    /// Displayed speed.
    pub const SPEED: &str = "speed";
    /// True speed.
    pub const TRUE_SPEED: &str = "trueSpeed";
    /// Quantity left.
    pub const QTY: &str = "qty";
    /// Quantity after a rest.
    pub const TRUE_QTY: &str = "trueQty";
    /// Cost per use.
    pub const COST: &str = "cost";
    /// Item type.
    pub const KIND: &str = "kind";
}

/// Attributes holding class names and class levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassFields {
    /// Class-name attributes: fighter, wizard, priest, rogue, psion.
    pub classes: [String; 5],
    /// Class-level attributes, in the same order.
    pub levels: [String; 5],
    /// Attribute holding the total character level.
    pub total_level: String,
}

impl Default for ClassFields {
    fn default() -> Self {
        Self {
            classes: std::array::from_fn(|i| format!("class{}", i + 1)),
            levels: std::array::from_fn(|i| format!("level-class{}", i + 1)),
            total_level: "level-class5".to_string(),
        }
    }
}

/// Index of each class in [`ClassFields`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ClassSlot {
    Fighter = 0,
    Wizard = 1,
    Priest = 2,
    Rogue = 3,
    Psion = 4,
}

/// Attribute prefixes of the per-item spell and power lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemLists {
    /// Wizard spells stored in an item.
    pub wizard: String,
    /// Priest spells stored in an item.
    pub priest: String,
    /// Powers of an item.
    pub powers: String,
}

impl Default for ItemLists {
    fn default() -> Self {
        Self {
            wizard: "mi-muspells-".to_string(),
            priest: "mi-prspells-".to_string(),
            powers: "mi-powers-".to_string(),
        }
    }
}

/// Physical layout of a character sheet.
#[derive(Clone, Debug)]
pub struct SheetLayout {
    /// The spell grid.
    pub spells: TableSchema,
    /// The item bag.
    pub bag: TableSchema,
    /// Column groups per grid row.
    pub lanes: u32,
    /// Upper bound on slots scanned per spell level.
    pub max_slots: usize,
    /// First column group of each wizard spell level, from level 1.
    pub wizard_bases: Vec<u32>,
    /// First column group of each priest spell level, from level 1.
    pub priest_bases: Vec<u32>,
    /// First column group of powers.
    pub power_base: u32,
    /// First column group of spells stored in items.
    pub item_spell_base: u32,
    /// First column group of item powers.
    pub item_power_base: u32,
    /// Spell-count level number used for spells stored in items.
    pub item_spell_level: u32,
    /// Spell-count level number used for item powers.
    pub item_power_level: u32,
    /// Number of power slots.
    pub power_capacity: usize,
    /// Prefix of wizard spell-count attributes.
    pub wizard_counts: String,
    /// Prefix of priest spell-count attributes.
    pub priest_counts: String,
    /// Suffix of the configured spell-count override.
    pub total_suffix: String,
    /// Suffix of the computed castable count.
    pub castable_suffix: String,
    /// Prefix of the attributes recording where item powers were placed.
    pub power_location_prefix: String,
    /// Per-item list attributes.
    pub item_lists: ItemLists,
    /// Class attributes.
    pub classes: ClassFields,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            spells: default_spell_schema(),
            bag: default_bag_schema(),
            lanes: 3,
            max_slots: 99,
            wizard_bases: vec![1, 4, 7, 10, 70, 13, 16, 19, 22],
            priest_bases: vec![28, 31, 34, 37, 40, 43, 46],
            power_base: 67,
            item_spell_base: 64,
            item_power_base: 61,
            item_spell_level: 15,
            item_power_level: 14,
            power_capacity: 18,
            wizard_counts: "spell-level".to_string(),
            priest_counts: "spell-priest-level".to_string(),
            total_suffix: "-total".to_string(),
            castable_suffix: "-castable".to_string(),
            power_location_prefix: "mi-power-".to_string(),
            item_lists: ItemLists::default(),
            classes: ClassFields::default(),
        }
    }
}

impl SheetLayout {
    /// Creates the classic sheet layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the number of column groups per row.
    #[must_use]
    pub fn with_lanes(mut self, lanes: u32) -> Self {
        self.lanes = lanes.max(1);
        self
    }

    /// Builder method to set the per-level slot bound.
    #[must_use]
    pub fn with_max_slots(mut self, max_slots: usize) -> Self {
        self.max_slots = max_slots;
        self
    }

    /// Builder method to set the number of power slots.
    #[must_use]
    pub fn with_power_capacity(mut self, capacity: usize) -> Self {
        self.power_capacity = capacity;
        self
    }

    /// Builder method to replace the spell grid schema.
    #[must_use]
    pub fn with_spells(mut self, spells: TableSchema) -> Self {
        self.spells = spells;
        self
    }

    /// Returns the value marking an empty grid slot.
    #[must_use]
    pub fn empty_slot(&self) -> Value {
        self.spells
            .field(spell::NAME)
            .and_then(|f| f.default.clone())
            .unwrap_or_else(|| Value::new("-"))
    }

    /// Name of a wizard spell-count attribute, e.g. `spell-level3-total`.
    #[must_use]
    pub fn wizard_count(&self, level: u32, suffix: &str) -> String {
        format!("{}{level}{suffix}", self.wizard_counts)
    }

    /// Name of a priest spell-count attribute.
    #[must_use]
    pub fn priest_count(&self, level: u32, suffix: &str) -> String {
        format!("{}{level}{suffix}", self.priest_counts)
    }

    /// Name of the attribute recording where an item power was placed.
    #[must_use]
    pub fn power_location(&self, power: &str) -> String {
        format!("{}{power}", self.power_location_prefix)
    }

    /// Name of a class-name attribute.
    #[must_use]
    pub fn class_name(&self, class: ClassSlot) -> &str {
        &self.classes.classes[class as usize]
    }

    /// Name of a class-level attribute.
    #[must_use]
    pub fn class_level(&self, class: ClassSlot) -> &str {
        &self.classes.levels[class as usize]
    }
}

fn default_spell_schema() -> TableSchema {
    TableSchema::new(TableDef::new("repeating_spells", FirstRow::Flat))
        .with_field(spell::NAME, FieldDef::current("spellname", "-"))
        .with_field(spell::DB, FieldDef::max("spellname", ""))
        .with_field(spell::SPEED, FieldDef::current("casttime", "5"))
        .with_field(spell::COST, FieldDef::max("casttime", "0"))
        .with_field(spell::CAST_VALUE, FieldDef::current("cast-value", "0"))
        .with_field(spell::CAST_MAX, FieldDef::current("cast-max", "1"))
        .with_field(spell::STORED_LEVEL, FieldDef::current("spell-points", "1"))
        .with_field(spell::SPELL_SET, FieldDef::current("arc", "0"))
        .with_field(spell::MESSAGE, FieldDef::current("cast-macro", ""))
        .with_name_field(spell::NAME)
}

fn default_bag_schema() -> TableSchema {
    TableSchema::new(TableDef::new("repeating_potions", FirstRow::Repeating))
        .with_field(bag::NAME, FieldDef::current("potion", "-"))
        .with_field(bag::TRUE_NAME, FieldDef::max("potion", ""))
        .with_field(bag::SPEED, FieldDef::current("potion-speed", "5"))
        .with_field(bag::TRUE_SPEED, FieldDef::max("potion-speed", "5"))
        .with_field(bag::QTY, FieldDef::current("potionqty", "0"))
        .with_field(bag::TRUE_QTY, FieldDef::max("potionqty", "0"))
        .with_field(bag::COST, FieldDef::current("potion-macro", "0"))
        .with_field(bag::KIND, FieldDef::max("potion-macro", ""))
        .with_name_field(bag::NAME)
}
