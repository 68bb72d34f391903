//! Moving a magic item's stored spells and powers between characters.

use grimoire_foundation::{OwnerId, Result, Slot};
use grimoire_storage::AttributeStore;
use tracing::info;

use crate::caster::{CasterKind, MagicSheet};
use crate::grid::{Placement, SpellEntry};

/// Result of [`MagicSheet::move_item_spells`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transfer {
    /// Spells and powers placed on the receiving character.
    pub placed: Vec<Placement>,
    /// Names that found no free slot on the receiving character.
    pub unplaced: Vec<String>,
    /// Names listed on the item but not found on the giving character.
    pub missing: Vec<String>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum ListKind {
    Spells,
    Powers,
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl<S: AttributeStore> MagicSheet<'_, S> {
    /// Moves the spells and powers stored in an item from one character to
    /// another.
    ///
    /// Each of the item's lists (wizard spells, priest spells, powers) is
    /// evicted from `from`, copied to `to` with each entry's value as it was
    /// on `from`, and placed into `to`'s item slots. Powers record where they
    /// were placed.
    ///
    /// # Errors
    ///
    /// Returns an error if a list, capacity or location cannot be written.
    pub fn move_item_spells(
        &mut self,
        from: &OwnerId,
        to: &OwnerId,
        item: &str,
    ) -> Result<Transfer> {
        let layout = self.layout;
        let lists = [
            (&layout.item_lists.wizard, ListKind::Spells),
            (&layout.item_lists.priest, ListKind::Spells),
            (&layout.item_lists.powers, ListKind::Powers),
        ];
        let mut transfer = Transfer::default();

        for (prefix, list) in lists {
            let attr = format!("{prefix}{item}");
            let Some(names) = self.sheet.read_flat(from, &attr, Slot::Current) else {
                continue;
            };
            let names = split_list(names.as_str());
            if names.is_empty() {
                continue;
            }
            let stored: Vec<String> = self
                .sheet
                .read_flat(from, &attr, Slot::Max)
                .map(|v| v.as_str().split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();

            let eviction = match list {
                ListKind::Spells => {
                    let book = self.shape(from, CasterKind::ItemSpell)?;
                    self.evict(from, &book, &names)
                }
                ListKind::Powers => self.evict_recorded(from, &names),
            };
            transfer.missing.extend(eviction.not_found.iter().cloned());

            // Each name keeps the value it had on the giving character; names
            // not found there keep their listed value.
            let mut freed = eviction.freed;
            let values: Vec<String> = names
                .iter()
                .enumerate()
                .map(|(i, name)| match freed.iter().position(|f| &f.name == name) {
                    Some(at) => {
                        let slot = freed.remove(at);
                        match list {
                            ListKind::Spells => slot.stored_value(),
                            ListKind::Powers => slot.power_value(),
                        }
                    }
                    None => stored.get(i).cloned().unwrap_or_default(),
                })
                .collect();

            self.sheet
                .ensure_flat_attribute(to, &attr, Slot::Current, names.join(","))?;
            self.sheet
                .ensure_flat_attribute(to, &attr, Slot::Max, values.join(","))?;

            let (kind, entries): (CasterKind, Vec<SpellEntry>) = match list {
                ListKind::Spells => (
                    CasterKind::ItemSpell,
                    names
                        .iter()
                        .zip(&values)
                        .map(|(name, value)| SpellEntry::stored_spell(name.as_str(), value))
                        .collect(),
                ),
                ListKind::Powers => (
                    CasterKind::ItemPower,
                    names
                        .iter()
                        .zip(&values)
                        .map(|(name, value)| SpellEntry::power(name.as_str(), value))
                        .collect(),
                ),
            };
            let book = self.shape(to, kind)?;
            let allocation = self.allocate(to, &book, entries, list == ListKind::Powers)?;
            transfer.placed.extend(allocation.placed);
            transfer
                .unplaced
                .extend(allocation.unplaced.into_iter().map(|e| e.name));
        }

        info!(
            from = %from,
            to = %to,
            item,
            placed = transfer.placed.len(),
            unplaced = transfer.unplaced.len(),
            "Moved item spells"
        );
        Ok(transfer)
    }
}
