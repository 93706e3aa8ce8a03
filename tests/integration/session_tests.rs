use closecheck::checklist::{pairs, Checklist, ChecklistDefinition, ItemRef};
use closecheck::navigator::SectionNavigator;
use closecheck::session::{decode, restore, PersistedSnapshot, SessionStore, STORAGE_KEY};
use closecheck::store::{FileStore, KeyValueStore, MemoryStore};
use serde_json::json;
use tempfile::tempdir;

const PAIRED: &str = r#"
pairs = [["mop", "wetwipe"]]

[[sections]]
title = "Hall"
[[sections.items]]
id = "tables"
label = "Tables wiped"
[[sections.items]]
id = "mop"
label = "Mop"
category = "Floor"
[[sections.items]]
id = "wetwipe"
label = "Wet wipe"
category = "Floor"

[[sections]]
title = "Door"
[[sections.items]]
id = "lock"
label = "Locked"
"#;

fn checklist() -> Checklist {
    Checklist::from_definition(&ChecklistDefinition::from_toml_str(PAIRED).unwrap())
}

fn store_with(raw: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, raw).unwrap();
    store
}

#[test]
fn test_round_trip_through_file_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let mut list = checklist();
    list.set_checked(ItemRef::new(0, 1), true);
    pairs::apply_after_change(&mut list, ItemRef::new(0, 1));
    list.section_mut(1).unwrap().justification_text = "key lost".into();

    let mut session = SessionStore::new(FileStore::new(&path));
    session.save(&list).unwrap();
    assert!(path.exists());

    let reopened = SessionStore::new(FileStore::new(&path));
    let mut fresh = checklist();
    restore(&mut fresh, &reopened.load());

    assert_eq!(fresh.checked_flags(), list.checked_flags());
    assert_eq!(fresh.justification_texts(), list.justification_texts());
    assert!(!fresh.item(ItemRef::new(0, 2)).unwrap().enabled);
}

#[test]
fn test_legacy_record_with_reasons_migrates() {
    let raw = json!({
        "state": [true, false, false, true],
        "reasons": ["", "back door jammed"]
    })
    .to_string();
    let snapshot = SessionStore::new(store_with(&raw)).load();
    assert_eq!(snapshot.checked_flags, vec![true, false, false, true]);
    assert_eq!(snapshot.justification_texts[1], "back door jammed");
}

#[test]
fn test_legacy_record_without_reasons_migrates() {
    let raw = json!({ "state": [false, true] }).to_string();
    let snapshot = decode(&raw).unwrap();
    assert_eq!(snapshot.checked_flags, vec![false, true]);
    assert!(snapshot.justification_texts.is_empty());

    let mut list = checklist();
    restore(&mut list, &snapshot);
    assert!(list.item(ItemRef::new(0, 1)).unwrap().checked);
    assert!(list.sections().iter().all(|s| s.justification_text.is_empty()));
}

#[test]
fn test_tampered_record_loads_empty() {
    let mut list = checklist();
    list.set_checked(ItemRef::new(0, 0), true);
    let mut session = SessionStore::new(MemoryStore::new());
    session.save(&list).unwrap();

    let raw = session.store().get(STORAGE_KEY).unwrap().unwrap();
    let mut envelope: serde_json::Value = serde_json::from_str(&raw).unwrap();
    envelope["snapshot"]["checked_flags"] = json!([true, true, true, true]);

    let tampered = SessionStore::new(store_with(&envelope.to_string()));
    assert_eq!(tampered.load(), PersistedSnapshot::empty());
}

#[test]
fn test_unknown_version_loads_empty() {
    let raw = json!({
        "version": 99,
        "saved_at": "2024-01-01T00:00:00Z",
        "checksum": "",
        "snapshot": { "checked_flags": [true], "justification_texts": [] }
    })
    .to_string();
    assert!(decode(&raw).is_err());
    assert!(SessionStore::new(store_with(&raw)).load().is_empty());
}

#[test]
fn test_garbage_loads_empty() {
    for raw in ["", "not json", "[1,2,3]", "{\"something\": 1}"] {
        assert!(SessionStore::new(store_with(raw)).load().is_empty(), "{raw:?}");
    }
}

#[test]
fn test_restore_tolerates_length_mismatch() {
    let mut list = checklist();
    restore(
        &mut list,
        &PersistedSnapshot {
            checked_flags: vec![true],
            justification_texts: vec!["a".into(), "b".into(), "c".into()],
            ..PersistedSnapshot::default()
        },
    );
    assert_eq!(list.checked_flags(), vec![true, false, false, false]);
    assert_eq!(list.justification_texts(), vec!["a", "b"]);
}

#[test]
fn test_restore_with_both_pair_members_keeps_first() {
    let mut list = checklist();
    restore(
        &mut list,
        &PersistedSnapshot {
            checked_flags: vec![false, true, true, false],
            justification_texts: vec![],
            ..PersistedSnapshot::default()
        },
    );
    assert!(list.item(ItemRef::new(0, 1)).unwrap().checked);
    let second = list.item(ItemRef::new(0, 2)).unwrap();
    assert!(!second.checked);
    assert!(!second.enabled);
}

#[test]
fn test_reset_all_then_load_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let mut list = checklist();
    let mut nav = SectionNavigator::for_checklist(&mut list).unwrap();
    let mut session = SessionStore::new(FileStore::new(&path));

    list.set_checked(ItemRef::new(0, 0), true);
    list.section_mut(0).unwrap().justification_text = "late".into();
    session.save(&list).unwrap();
    nav.advance(&mut list);

    session.reset_all(&mut list, &mut nav).unwrap();

    assert_eq!(nav.current_index(), 0);
    assert!(list.items().all(|i| !i.checked && i.enabled));
    assert!(SessionStore::new(FileStore::new(&path)).load().is_empty());
}
