//! Store snapshots in `MessagePack`.
//!
//! A snapshot is the whole in-memory attribute store plus a format version.
//! Deferred attributes are not part of it; flush before saving.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use grimoire_foundation::{Error, ErrorKind, Result};
use grimoire_storage::MemoryStore;
use serde::{Deserialize, Serialize};

/// Current snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    store: MemoryStore,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    store: &'a MemoryStore,
}

/// Serializes a store to bytes, keeping field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(store: &MemoryStore) -> Result<Vec<u8>> {
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        store,
    };
    rmp_serde::to_vec_named(&snapshot)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a store from bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a snapshot, or were written by a
/// newer format.
pub fn from_bytes(bytes: &[u8]) -> Result<MemoryStore> {
    let snapshot: Snapshot = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(Error::new(ErrorKind::Serialization(format!(
            "snapshot version {} is newer than supported version {SNAPSHOT_VERSION}",
            snapshot.version
        ))));
    }
    Ok(snapshot.store)
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} '{}': {e}",
        path.display()
    )))
}

/// Saves a store to a file, replacing it if it exists.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_to_file<P: AsRef<Path>>(store: &MemoryStore, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(store)?;
    let file = File::create(path).map_err(|e| io_error("create", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_error("write to", path, &e))?;
    writer.flush().map_err(|e| io_error("flush", path, &e))
}

/// Loads a store from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a snapshot.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<MemoryStore> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open", path, &e))?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read", path, &e))?;
    from_bytes(&bytes)
}
