use closecheck::checklist::{Checklist, ChecklistDefinition, ItemRef};
use closecheck::export::SnapshotExporter;
use closecheck::store::{FileStore, KeyValueStore, MemoryStore};
use closecheck::tui::{Action, AdvanceOutcome, App, AppMode};
use tempfile::tempdir;

const THREE_ITEMS: &str = r#"
[[sections]]
title = "Floor"
[[sections.items]]
id = "sweep"
label = "Swept"
[[sections.items]]
id = "mop"
label = "Mopped"
[[sections.items]]
id = "bins"
label = "Bins out"

[[sections]]
title = "Door"
[[sections.items]]
id = "lock"
label = "Locked"
"#;

fn checklist() -> Checklist {
    Checklist::from_definition(&ChecklistDefinition::from_toml_str(THREE_ITEMS).unwrap())
}

fn app_with(store: Box<dyn KeyValueStore>) -> App {
    let exports = std::env::temp_dir().join("closecheck-flow-tests");
    App::new(checklist(), store, SnapshotExporter::new(exports)).unwrap()
}

#[test]
fn test_advance_refused_lists_unchecked_items() {
    let mut app = app_with(Box::new(MemoryStore::new()));
    assert!(app.toggle(ItemRef::new(0, 0)));

    assert_eq!(app.try_advance(), AdvanceOutcome::Refused);
    assert_eq!(app.navigator().current_index(), 0);
    assert_eq!(app.mode(), AppMode::EditingNote);

    let panel = &app.current_section().panel;
    assert!(panel.visible);
    assert_eq!(panel.unchecked_labels, vec!["Mopped", "Bins out"]);
}

#[test]
fn test_reason_unlocks_advance_and_is_saved() {
    let mut app = app_with(Box::new(MemoryStore::new()));
    app.toggle(ItemRef::new(0, 0));
    assert_eq!(app.try_advance(), AdvanceOutcome::Refused);

    for c in "away sick".chars() {
        app.insert_char(c);
    }
    app.finish_note_edit();

    assert_eq!(app.try_advance(), AdvanceOutcome::Advanced);
    assert_eq!(app.navigator().current_index(), 1);

    let saved = app.session().load();
    assert_eq!(saved.justification_texts[0], "away sick");
    assert_eq!(saved.checked_flags, vec![true, false, false, false]);
}

#[test]
fn test_whitespace_reason_does_not_unlock() {
    let mut app = app_with(Box::new(MemoryStore::new()));
    app.begin_note_edit();
    app.insert_char(' ');
    app.insert_newline();
    app.finish_note_edit();
    assert_eq!(app.try_advance(), AdvanceOutcome::Refused);
}

#[test]
fn test_retreat_is_never_gated() {
    let mut app = app_with(Box::new(MemoryStore::new()));
    for position in 0..3 {
        app.toggle(ItemRef::new(0, position));
    }
    assert_eq!(app.try_advance(), AdvanceOutcome::Advanced);
    assert_eq!(app.try_advance(), AdvanceOutcome::Refused);
    app.finish_note_edit();
    assert!(app.retreat());
    assert_eq!(app.navigator().current_index(), 0);
}

#[test]
fn test_state_survives_restart_with_file_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let mut app = app_with(Box::new(FileStore::new(&path)));
        app.toggle(ItemRef::new(0, 1));
        app.begin_note_edit();
        for c in "no bins today".chars() {
            app.insert_char(c);
        }
        app.finish_note_edit();
    }

    let app = app_with(Box::new(FileStore::new(&path)));
    let section = app.checklist().section(0).unwrap();
    assert!(!section.items[0].checked);
    assert!(section.items[1].checked);
    assert_eq!(section.justification_text, "no bins today");
    assert_eq!(app.navigator().current_index(), 0);
}

#[test]
fn test_shift_notes_survive_restart_until_reset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let mut app = app_with(Box::new(FileStore::new(&path)));
        assert!(app.handle_action(Action::EditShiftNotes));
        assert_eq!(app.mode(), AppMode::EditingShiftNotes);
        for c in "ice machine leaking".chars() {
            app.insert_char(c);
        }
        app.finish_note_edit();
    }

    let mut app = app_with(Box::new(FileStore::new(&path)));
    assert_eq!(app.checklist().shift_notes(), "ice machine leaking");

    app.handle_action(Action::Reset);
    app.handle_action(Action::Confirm);
    assert!(app.checklist().shift_notes().is_empty());
    assert!(app.session().load().is_empty());
}

#[test]
fn test_reset_clears_everything() {
    let mut app = app_with(Box::new(MemoryStore::new()));
    for position in 0..3 {
        app.toggle(ItemRef::new(0, position));
    }
    app.try_advance();
    app.toggle(ItemRef::new(1, 0));

    assert!(app.handle_action(Action::Reset));
    assert_eq!(app.mode(), AppMode::ConfirmingReset);
    assert!(app.handle_action(Action::Confirm));

    assert_eq!(app.navigator().current_index(), 0);
    assert!(app.checklist().items().all(|i| !i.checked && i.enabled));
    assert!(app
        .checklist()
        .sections()
        .iter()
        .all(|s| s.justification_text.is_empty()));

    let saved = app.session().load();
    assert!(saved.is_empty());
}

#[test]
fn test_cancelled_reset_keeps_state() {
    let mut app = app_with(Box::new(MemoryStore::new()));
    app.toggle(ItemRef::new(0, 2));
    app.handle_action(Action::Reset);
    app.handle_action(Action::Cancel);
    assert_eq!(app.mode(), AppMode::Checking);
    assert!(app.checklist().section(0).unwrap().items[2].checked);
}

#[test]
fn test_builtin_pairs_exclude_each_other() {
    let definition = ChecklistDefinition::builtin().unwrap();
    let mut app = App::new(
        Checklist::from_definition(&definition),
        Box::new(MemoryStore::new()),
        SnapshotExporter::new(std::env::temp_dir()),
    )
    .unwrap();

    let mop = app.checklist().find("mop").unwrap();
    let wetwipe = app.checklist().find("wetwipe").unwrap();

    assert!(app.toggle(mop));
    assert!(!app.checklist().item(wetwipe).unwrap().enabled);
    assert!(!app.toggle(wetwipe));
    assert!(app.notice().is_some());

    assert!(app.toggle(mop));
    let partner = app.checklist().item(wetwipe).unwrap();
    assert!(partner.enabled);
    assert!(!partner.checked);
}
