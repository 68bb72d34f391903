//! Integration tests for snapshots

use grimoire_foundation::{ErrorKind, OwnerId, Slot, Value};
use grimoire_runtime::serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
use grimoire_runtime::{RuntimeConfig, Session};
use grimoire_storage::{AttributeStore, MemoryStore};

fn populated() -> MemoryStore {
    let mut store = MemoryStore::new();
    let mage = OwnerId::new("-Mmage");
    let thief = OwnerId::new("-Mthief");
    store.set(&mage, "class2", Slot::Current, "Wizard").unwrap();
    store.set(&mage, "HP", Slot::Current, "12").unwrap();
    store.set(&mage, "HP", Slot::Max, "15").unwrap();
    store
        .set(&thief, "repeating_potions_-Ma_potionname", Slot::Current, "Healing")
        .unwrap();
    store
}

#[test]
fn snapshots_keep_owners_and_both_slots() {
    let store = populated();
    let restored = from_bytes(&to_bytes(&store).unwrap()).unwrap();

    assert_eq!(restored.len(), store.len());
    let mage = OwnerId::new("-Mmage");
    assert_eq!(restored.dump(&mage), store.dump(&mage));
    assert_eq!(
        restored.read_named(&mage, "hp", Slot::Max, false),
        Some(Value::new("15"))
    );
}

#[test]
fn garbage_is_a_serialization_error() {
    let err = from_bytes(&[0xc1, 0x00, 0x13]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Serialization(_)));
}

#[test]
fn a_saved_sheet_resumes_at_startup() {
    let path = std::env::temp_dir().join("grimoire_integration_snapshot.msgpack");
    save_to_file(&populated(), &path).unwrap();
    assert_eq!(load_from_file(&path).unwrap().len(), 3);

    let path_text = path.display().to_string();
    let config =
        RuntimeConfig::from_args(["grimoire", "--load", path_text.as_str(), "--owner", "-Mmage"]).unwrap();
    let mut session = Session::from_runtime(&config).unwrap();
    assert_eq!(session.execute("get HP:max").unwrap(), "HP max = 15");
    let _ = std::fs::remove_file(&path);
}
