//! Integration tests for sessions and command scripts

use std::fs;

use grimoire_foundation::{OwnerId, Slot, Value};
use grimoire_runtime::{DEFAULT_OWNER, RuntimeConfig, Session};
use grimoire_table::EngineConfig;

fn session() -> Session {
    Session::with_config(EngineConfig::deterministic(99))
}

#[test]
fn default_owner_is_selected() {
    let s = session();
    assert_eq!(s.owner(), &OwnerId::new(DEFAULT_OWNER));
}

#[test]
fn a_wizard_memorises_casts_and_rests() {
    let mut s = session().with_owner("-Mmage");
    s.execute("set class2 Wizard").unwrap();
    s.execute("set level-class2 3").unwrap();
    let shape = s.execute("shape MU").unwrap();
    assert!(shape.starts_with("MU as WIZARD level 3"));
    assert!(shape.contains("level 1: 2 slots from column 1"));

    s.execute("add MU Sleep, Shield, Web").unwrap();
    assert_eq!(
        s.execute("show MU").unwrap(),
        "level 1 row 0 column 1: Sleep\nlevel 1 row 0 column 2: Shield\nlevel 2 row 0 column 4: Web"
    );
    s.execute("rest short").unwrap();
    s.execute("remove MU Shield").unwrap();
    assert_eq!(
        s.execute("show MU").unwrap(),
        "level 1 row 0 column 1: Sleep\nlevel 2 row 0 column 4: Web"
    );
    assert!(s.sheet().pending().is_empty());
    assert_eq!(
        s.sheet()
            .read_flat(&OwnerId::new("-Mmage"), "spell-level1-castable", Slot::Current),
        Some(Value::new("2"))
    );
}

#[test]
fn scripts_run_until_the_first_failure() {
    let path = std::env::temp_dir().join("grimoire_integration_script.grim");
    fs::write(
        &path,
        "# a priest\nset class3 Priest\nset level-class3 2\n\nshape PR\nrest sideways\nset hp 9\n",
    )
    .unwrap();

    let mut s = session();
    let err = s.run_script(&path).unwrap_err();
    assert!(err.to_string().contains(":6:"));
    assert_eq!(s.execute("get class3").unwrap(), "class3 current = Priest");
    assert_eq!(s.execute("get hp").unwrap(), "hp current is unset");
    let _ = fs::remove_file(&path);
}

#[test]
fn runtime_options_select_the_owner() {
    let config = RuntimeConfig::from_args(["grimoire", "--owner", "-Mrogue", "--seed", "5"]).unwrap();
    let s = Session::from_runtime(&config).unwrap();
    assert_eq!(s.owner(), &OwnerId::new("-Mrogue"));
}
