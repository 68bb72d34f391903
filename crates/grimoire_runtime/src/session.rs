//! Per-request sessions over an in-memory sheet.
//!
//! A [`Session`] owns the attribute store and the deferred-attribute queue.
//! Each call to [`Session::execute`] is one request: the command runs, then
//! the queue is flushed exactly once, whether or not the command succeeded.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use grimoire_foundation::{Error, ErrorKind, OwnerId, Result, Slot};
use grimoire_magic::{
    BagItem, CasterKind, MagicSheet, RestKind, SheetLayout, SpellEntry, Spellbook,
};
use grimoire_storage::MemoryStore;
use grimoire_table::{EngineConfig, Sheet};
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::serialize;

/// Owner selected when none is given.
pub const DEFAULT_OWNER: &str = "sheet";

/// Command names understood by [`Session::execute`].
pub const COMMANDS: &[&str] = &[
    "owner", "set", "get", "shape", "add", "remove", "rest", "show", "move", "flush", "save",
    "load", "help",
];

/// An interactive session over one attribute store.
#[derive(Debug)]
pub struct Session {
    sheet: Sheet<MemoryStore>,
    engine: EngineConfig,
    layout: SheetLayout,
    owner: OwnerId,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a session with an engine configuration.
    #[must_use]
    pub fn with_config(engine: EngineConfig) -> Self {
        Self {
            sheet: Sheet::with_config(MemoryStore::new(), engine.clone()),
            engine,
            layout: SheetLayout::default(),
            owner: OwnerId::new(DEFAULT_OWNER),
        }
    }

    /// Creates a session from command-line options, loading the startup
    /// snapshot if one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded.
    pub fn from_runtime(config: &RuntimeConfig) -> Result<Self> {
        let engine = EngineConfig::default()
            .with_seed(config.seed)
            .with_announce_flushes(true);
        let mut session = Self::with_config(engine);
        if let Some(path) = &config.load {
            session.load(path)?;
        }
        if let Some(owner) = &config.owner {
            session.owner = OwnerId::new(owner);
        }
        Ok(session)
    }

    /// Builder method to replace the store.
    #[must_use]
    pub fn with_store(mut self, store: MemoryStore) -> Self {
        self.sheet = Sheet::with_config(store, self.engine.clone());
        self
    }

    /// Builder method to replace the sheet layout.
    #[must_use]
    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Builder method to select the owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl AsRef<str>) -> Self {
        self.owner = OwnerId::new(owner);
        self
    }

    /// Returns the selected owner.
    #[must_use]
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns the sheet.
    #[must_use]
    pub fn sheet(&self) -> &Sheet<MemoryStore> {
        &self.sheet
    }

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        self.sheet.store()
    }

    /// Returns the layout.
    #[must_use]
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Runs one command line and flushes the deferred queue.
    ///
    /// Returns the command's output, which may be empty.
    ///
    /// # Errors
    ///
    /// Returns the command's error if it failed, else the flush error if
    /// the flush failed.
    pub fn execute(&mut self, line: &str) -> Result<String> {
        let line = line.trim();
        let (command, args) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(c, a)| (c, a.trim()));
        debug!(owner = %self.owner, command, args, "Executing");

        let result = self.dispatch(&command.to_ascii_lowercase(), args);
        let flushed = self.sheet.flush(false);
        let output = result?;
        flushed?;
        Ok(output)
    }

    fn dispatch(&mut self, command: &str, args: &str) -> Result<String> {
        match command {
            "" => Ok(String::new()),
            "owner" => Ok(self.select_owner(args)),
            "set" => self.set(args),
            "get" => self.get(args),
            "shape" => self.shape(args),
            "add" => self.add(args),
            "remove" => self.remove(args),
            "rest" => self.rest(args),
            "show" => self.show(args),
            "move" => self.move_item(args),
            "flush" => {
                let created = self.sheet.flush(false)?;
                Ok(format!("created {created} attributes"))
            }
            "save" => {
                let path = required(args, "save <path>")?;
                self.save(path)?;
                Ok(format!("saved to {path}"))
            }
            "load" => {
                let path = required(args, "load <path>")?;
                self.load(path)?;
                Ok(format!("loaded {path}"))
            }
            "help" => Ok(help_text()),
            other => Err(Error::command(format!(
                "unknown command '{other}', try 'help'"
            ))),
        }
    }

    /// Runs every command in a file, one per line, stopping at the first
    /// failure. Blank lines and lines starting with `#` are skipped.
    ///
    /// Returns the output of each command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a command fails; the
    /// error names the file and line.
    pub fn run_script(&mut self, path: &Path) -> Result<Vec<String>> {
        let source = fs::read_to_string(path).map_err(|e| {
            Error::new(ErrorKind::Io(format!(
                "failed to read '{}': {e}",
                path.display()
            )))
        })?;
        debug!(path = %path.display(), "Running script");

        let mut outputs = Vec::new();
        for (number, line) in (1..).zip(source.lines()) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let output = self
                .execute(line)
                .map_err(|e| Error::command(format!("{}:{number}: {e}", path.display())))?;
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// Flushes the queue and writes the store to a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush or the write fails.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.sheet.flush(false)?;
        serialize::save_to_file(self.sheet.store(), path.as_ref())?;
        info!(path = %path.as_ref().display(), "Saved snapshot");
        Ok(())
    }

    /// Replaces the store with a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let store = serialize::load_from_file(path.as_ref())?;
        self.sheet.flush(false)?;
        self.sheet = Sheet::with_config(store, self.engine.clone());
        info!(path = %path.as_ref().display(), "Loaded snapshot");
        Ok(())
    }

    fn magic(&mut self) -> MagicSheet<'_, MemoryStore> {
        MagicSheet::new(&mut self.sheet, &self.layout)
    }

    fn select_owner(&mut self, args: &str) -> String {
        if !args.is_empty() {
            self.owner = OwnerId::new(args);
        }
        format!("owner {}", self.owner)
    }

    fn set(&mut self, args: &str) -> Result<String> {
        let (target, value) = args
            .split_once(char::is_whitespace)
            .map_or((args, ""), |(t, v)| (t, v.trim()));
        let (name, slot) = attribute_target(required(target, "set <name>[:max] <value>")?);
        let owner = self.owner.clone();
        self.sheet.ensure_flat_attribute(&owner, name, slot, value)?;
        Ok(format!("{name} {slot} = {value}"))
    }

    fn get(&self, args: &str) -> Result<String> {
        let (name, slot) = attribute_target(required(args, "get <name>[:max]")?);
        Ok(match self.sheet.read_flat(&self.owner, name, slot) {
            Some(value) => format!("{name} {slot} = {value}"),
            None => format!("{name} {slot} is unset"),
        })
    }

    fn shape(&mut self, args: &str) -> Result<String> {
        let kind: CasterKind = required(args, "shape <kind>")?.parse()?;
        let owner = self.owner.clone();
        let book = self.magic().shape(&owner, kind)?;
        Ok(describe_book(&book))
    }

    fn add(&mut self, args: &str) -> Result<String> {
        let (kind, rest) = split_word(required(args, "add <kind> <names> | add bag <row> <item>")?);
        if kind.eq_ignore_ascii_case("bag") {
            return self.add_to_bag(rest);
        }
        let kind: CasterKind = kind.parse()?;
        let entries: Vec<SpellEntry> = names(rest)
            .map(|spec| match spec.split_once('=') {
                Some((name, value)) => match kind {
                    CasterKind::ItemSpell => SpellEntry::stored_spell(name.trim(), value.trim()),
                    CasterKind::Power | CasterKind::ItemPower => {
                        SpellEntry::power(name.trim(), value.trim())
                    }
                    CasterKind::Wizard | CasterKind::Priest => SpellEntry::new(name.trim()),
                },
                None => SpellEntry::new(spec),
            })
            .collect();
        if entries.is_empty() {
            return Err(Error::command("add: no names given"));
        }

        let owner = self.owner.clone();
        let mut magic = self.magic();
        let book = magic.shape(&owner, kind)?;
        let allocation = magic.allocate(&owner, &book, entries, kind == CasterKind::ItemPower)?;

        let mut out = String::new();
        for placed in &allocation.placed {
            let _ = writeln!(
                out,
                "{} -> level {} row {} column {}",
                placed.name, placed.level, placed.row, placed.column
            );
        }
        if !allocation.is_complete() {
            let missing: Vec<&str> = allocation.unplaced.iter().map(|e| e.name.as_str()).collect();
            let _ = writeln!(out, "warning: no free slot for {}", missing.join(", "));
        }
        Ok(out.trim_end().to_string())
    }

    fn add_to_bag(&mut self, args: &str) -> Result<String> {
        let (row, rest) = split_word(args);
        let row = parse_row(row)?;
        let mut parts = rest.split(',').map(str::trim);
        let name = parts
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::command("usage: add bag <row> <item>[, qty]"))?;
        let mut item = BagItem::new(name);
        if let Some(qty) = parts.next() {
            item = item.with_qty(qty);
        }
        let owner = self.owner.clone();
        let row = self.magic().store_item(&owner, row, &item)?;
        Ok(format!("{name} -> bag row {row}"))
    }

    fn remove(&mut self, args: &str) -> Result<String> {
        let (kind, rest) = split_word(required(args, "remove <kind> <names> | remove bag <row>")?);
        let owner = self.owner.clone();
        if kind.eq_ignore_ascii_case("bag") {
            let row = parse_row(rest)?;
            let row = self.magic().blank_bag_slot(&owner, row)?;
            return Ok(format!("emptied bag row {row}"));
        }
        let kind: CasterKind = kind.parse()?;
        let names: Vec<&str> = names(rest).collect();

        let mut magic = self.magic();
        let eviction = if kind == CasterKind::ItemPower {
            magic.evict_recorded(&owner, &names)
        } else {
            let book = magic.shape(&owner, kind)?;
            magic.evict(&owner, &book, &names)
        };

        let mut out = String::new();
        for freed in &eviction.freed {
            let _ = writeln!(out, "freed {} at row {} column {}", freed.name, freed.row, freed.column);
        }
        if !eviction.not_found.is_empty() {
            let _ = writeln!(out, "not found: {}", eviction.not_found.join(", "));
        }
        Ok(out.trim_end().to_string())
    }

    fn rest(&mut self, args: &str) -> Result<String> {
        let (rest, kinds) = split_word(required(args, "rest short|long [kinds]")?);
        let rest: RestKind = rest.parse()?;
        let kinds = kinds
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<CasterKind>>>()?;
        let kinds = if kinds.is_empty() {
            vec![CasterKind::Wizard, CasterKind::Priest]
        } else {
            kinds
        };
        let owner = self.owner.clone();
        let report = self.magic().rest(&owner, rest, &kinds)?;
        Ok(format!(
            "{rest} rest: {} slots refreshed, {} bag items restored",
            report.slots, report.items
        ))
    }

    fn show(&mut self, args: &str) -> Result<String> {
        let target = required(args, "show <kind>|bag")?;
        let owner = self.owner.clone();
        let mut out = String::new();
        if target.eq_ignore_ascii_case("bag") {
            for (row, item) in self.magic().bag_items(&owner) {
                let _ = writeln!(out, "{row}: {} x{} ({})", item.name, item.qty, item.true_name);
            }
        } else {
            let kind: CasterKind = target.parse()?;
            let mut magic = self.magic();
            let book = magic.shape(&owner, kind)?;
            for placed in magic.occupied(&owner, &book) {
                let _ = writeln!(
                    out,
                    "level {} row {} column {}: {}",
                    placed.level, placed.row, placed.column, placed.name
                );
            }
        }
        Ok(out.trim_end().to_string())
    }

    fn move_item(&mut self, args: &str) -> Result<String> {
        let (item, to) = split_word(required(args, "move <item> <owner>")?);
        let to = OwnerId::new(required(to, "move <item> <owner>")?);
        let from = self.owner.clone();
        let transfer = self.magic().move_item_spells(&from, &to, item)?;
        let mut out = format!("moved {} from {from} to {to}", transfer.placed.len());
        if !transfer.missing.is_empty() {
            let _ = write!(out, "; not on {from}: {}", transfer.missing.join(", "));
        }
        if !transfer.unplaced.is_empty() {
            let _ = write!(out, "; no room on {to}: {}", transfer.unplaced.join(", "));
        }
        Ok(out)
    }
}

fn required<'a>(args: &'a str, usage: &str) -> Result<&'a str> {
    let args = args.trim();
    if args.is_empty() {
        Err(Error::command(format!("usage: {usage}")))
    } else {
        Ok(args)
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    text.split_once(char::is_whitespace)
        .map_or((text, ""), |(a, b)| (a, b.trim()))
}

fn names(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_row(text: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|_| Error::command(format!("invalid row '{text}'")))
}

/// Splits `name:max` into a name and slot; no suffix means the current slot.
fn attribute_target(target: &str) -> (&str, Slot) {
    match target.rsplit_once(':') {
        Some((name, slot)) => match slot.parse() {
            Ok(slot) => (name, slot),
            Err(_) => (target, Slot::Current),
        },
        None => (target, Slot::Current),
    }
}

fn describe_book(book: &Spellbook) -> String {
    let mut out = match book.class {
        Some(class) => format!("{} as {class} level {}", book.kind, book.class_level),
        None => format!("{} at level {}", book.kind, book.class_level),
    };
    for level in &book.levels {
        let _ = write!(
            out,
            "\n  level {}: {} slots from column {}",
            level.level, level.capacity, level.base
        );
        if level.grows_into.is_some() {
            out.push_str(" (grows)");
        }
    }
    out
}

fn help_text() -> String {
    "\
owner [id]                       show or select the character
set <name>[:max] <value>         write a flat attribute
get <name>[:max]                 read a flat attribute
shape <kind>                     slots per level (kinds: MU PR POWER MI MIPOWER)
add <kind> <name>[=value], ...   place spells into free slots
add bag <row> <item>[, qty]      store an item in the bag
remove <kind> <name>, ...        empty the slots holding spells
remove bag <row>                 empty a bag row
rest short|long [kinds]          refresh slots (default MU PR)
show <kind>|bag                  list filled slots
move <item> <owner>              move an item's spells to another character
flush                            create queued attributes now
save <path> | load <path>        write or read a snapshot
help                             this text"
        .to_string()
}
