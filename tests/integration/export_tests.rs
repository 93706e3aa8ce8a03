use closecheck::checklist::{Checklist, ChecklistDefinition, ItemRef};
use closecheck::export::{snapshot_file_name, ExportError, RenderOptions, SnapshotExporter};
use closecheck::navigator::SectionNavigator;
use closecheck::session::SessionStore;
use closecheck::store::MemoryStore;
use closecheck::tui::{Action, App};
use std::fs;
use tempfile::tempdir;

fn builtin() -> Checklist {
    Checklist::from_definition(&ChecklistDefinition::builtin().unwrap())
}

fn is_timestamped_png(name: &str, prefix: &str) -> bool {
    let Some(rest) = name.strip_prefix(prefix).and_then(|r| r.strip_prefix('_')) else {
        return false;
    };
    let Some(stamp) = rest.strip_suffix(".png") else {
        return false;
    };
    let parts: Vec<&str> = stamp.split('-').collect();
    parts.len() == 6
        && parts[0].len() == 4
        && parts[1..].iter().all(|p| p.len() == 2)
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
}

#[test]
fn test_file_name_format() {
    let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(23, 5, 7)
        .unwrap();
    let name = snapshot_file_name("closing-checklist", at);
    assert_eq!(name, "closing-checklist_2024-03-09-23-05-07.png");
    assert!(is_timestamped_png(&name, "closing-checklist"));
}

#[test]
fn test_export_last_section_resets_and_stays() {
    let dir = tempdir().unwrap();
    let exporter = SnapshotExporter::new(dir.path());
    let mut list = builtin();
    let mut nav = SectionNavigator::for_checklist(&mut list).unwrap();
    let last = nav.section_count() - 1;
    nav.jump_to(last, &mut list);
    let mut session = SessionStore::new(MemoryStore::new());

    list.set_checked(ItemRef::new(last, 0), true);
    list.section_mut(last).unwrap().justification_text = "alarm broken".into();

    let outcome = exporter
        .export_current_section(&mut list, &mut nav, &mut session)
        .unwrap();

    assert_eq!(nav.current_index(), last);
    assert!(!outcome.advanced);
    let section = list.section(last).unwrap();
    assert!(section.items.iter().all(|i| !i.checked));
    assert!(section.justification_text.is_empty());

    let name = outcome.path.file_name().unwrap().to_string_lossy().to_string();
    assert!(is_timestamped_png(&name, "closing-checklist"), "{name}");
    let png = fs::read(&outcome.path).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn test_export_leaves_other_sections_alone() {
    let dir = tempdir().unwrap();
    let exporter = SnapshotExporter::new(dir.path());
    let mut list = builtin();
    let mut nav = SectionNavigator::for_checklist(&mut list).unwrap();
    let mut session = SessionStore::new(MemoryStore::new());

    list.set_checked(ItemRef::new(1, 0), true);
    list.section_mut(1).unwrap().justification_text = "fryer still hot".into();

    exporter
        .export_current_section(&mut list, &mut nav, &mut session)
        .unwrap();

    assert_eq!(nav.current_index(), 1);
    assert!(list.item(ItemRef::new(1, 0)).unwrap().checked);
    assert_eq!(list.section(1).unwrap().justification_text, "fryer still hot");
}

#[test]
fn test_invalid_scale_fails_without_changes() {
    let dir = tempdir().unwrap();
    let exporter = SnapshotExporter::new(dir.path())
        .with_options(RenderOptions::default().with_scale(0));
    let mut list = builtin();
    let mut nav = SectionNavigator::for_checklist(&mut list).unwrap();
    let mut session = SessionStore::new(MemoryStore::new());
    list.set_checked(ItemRef::new(0, 0), true);

    let err = exporter
        .export_current_section(&mut list, &mut nav, &mut session)
        .unwrap_err();
    assert!(matches!(err, ExportError::InvalidOptions(_)));
    assert!(list.item(ItemRef::new(0, 0)).unwrap().checked);
    assert_eq!(nav.current_index(), 0);
}

fn long_checklist(items: usize) -> Checklist {
    let mut toml = String::from("[[sections]]\ntitle = \"Cellar\"\n");
    for n in 0..items {
        toml.push_str(&format!("[[sections.items]]\nid = \"keg{n}\"\nlabel = \"Keg {n}\"\n"));
    }
    toml.push_str("[[sections]]\ntitle = \"Door\"\n[[sections.items]]\nid = \"lock\"\nlabel = \"Lock\"\n");
    Checklist::from_definition(&ChecklistDefinition::from_toml_str(&toml).unwrap())
}

#[test]
fn test_section_too_long_for_one_image_is_left_alone() {
    let dir = tempdir().unwrap();
    let exporter = SnapshotExporter::new(dir.path());
    let mut list = long_checklist(1200);
    let mut nav = SectionNavigator::for_checklist(&mut list).unwrap();
    let mut session = SessionStore::new(MemoryStore::new());

    for position in (0..1200).step_by(3) {
        list.set_checked(ItemRef::new(0, position), true);
    }
    list.section_mut(0).unwrap().justification_text = "half the kegs are empty".into();
    let before = list.clone();

    let err = exporter
        .export_current_section(&mut list, &mut nav, &mut session)
        .unwrap_err();

    assert!(matches!(err, ExportError::Render(_)));
    assert!(err.to_string().contains("65535"));
    assert_eq!(list.sections(), before.sections());
    assert_eq!(nav.current_index(), 0);
    assert!(session.load().is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_app_export_failure_shows_error() {
    let dir = tempdir().unwrap();
    // a regular file where the export directory should be
    let blocked = dir.path().join("exports");
    fs::write(&blocked, "not a directory").unwrap();

    let mut app = App::new(
        builtin(),
        Box::new(MemoryStore::new()),
        SnapshotExporter::new(&blocked),
    )
    .unwrap();
    app.toggle(ItemRef::new(0, 0));

    assert!(!app.handle_action(Action::Export));
    assert!(app
        .error_message()
        .is_some_and(|m| m.starts_with("Could not create the image")));
    assert!(app.checklist().item(ItemRef::new(0, 0)).unwrap().checked);
    assert_eq!(app.navigator().current_index(), 0);

    // the next key only dismisses the dialog
    assert!(app.handle_action(Action::ToggleItem));
    assert!(app.error_message().is_none());
    assert!(app.checklist().item(ItemRef::new(0, 0)).unwrap().checked);
}

#[test]
fn test_app_export_success_moves_on() {
    let dir = tempdir().unwrap();
    let mut app = App::new(
        builtin(),
        Box::new(MemoryStore::new()),
        SnapshotExporter::new(dir.path()).with_prefix("night"),
    )
    .unwrap();
    app.toggle(ItemRef::new(0, 0));

    assert!(app.handle_action(Action::Export));
    assert_eq!(app.navigator().current_index(), 1);
    assert!(app.error_message().is_none());
    assert!(!app.checklist().item(ItemRef::new(0, 0)).unwrap().checked);

    let written: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(is_timestamped_png(&written[0], "night"), "{written:?}");
}
