use clap::Parser;
use closecheck::cli::{Cli, Commands};
use closecheck::error::ExitCode;
use closecheck::run_app;
use std::fs;
use tempfile::tempdir;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("closecheck").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_status_strict_refuses_unfinished_checklist() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");
    let store = store.to_str().unwrap();

    let code = run_app(cli(&["-q", "status", "--store", store, "--json"])).unwrap();
    assert_eq!(code, ExitCode::Success);

    let code = run_app(cli(&["-q", "status", "--store", store, "--strict", "--json"])).unwrap();
    assert_eq!(code, ExitCode::GateRefused);
}

#[test]
fn test_headless_export_and_reset() {
    let dir = tempdir().unwrap();
    let checklist = dir.path().join("bar.toml");
    fs::write(
        &checklist,
        r#"
[[sections]]
title = "Bar"
[[sections.items]]
id = "taps"
label = "Taps off"
"#,
    )
    .unwrap();
    let store = dir.path().join("store.json");
    let out = dir.path().join("out");

    let code = run_app(cli(&[
        "-q",
        "export",
        "--checklist",
        checklist.to_str().unwrap(),
        "--store",
        store.to_str().unwrap(),
        "--export-dir",
        out.to_str().unwrap(),
        "--scale",
        "1",
    ]))
    .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);

    let code = run_app(cli(&[
        "-q",
        "reset",
        "--yes",
        "--checklist",
        checklist.to_str().unwrap(),
        "--store",
        store.to_str().unwrap(),
    ]))
    .unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_export_of_missing_section_fails() {
    let dir = tempdir().unwrap();
    let result = run_app(cli(&[
        "-q",
        "export",
        "--ephemeral",
        "--section",
        "42",
        "--export-dir",
        dir.path().to_str().unwrap(),
    ]));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Section 42 does not exist"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_bad_checklist_file_is_reported() {
    let dir = tempdir().unwrap();
    let checklist = dir.path().join("broken.toml");
    fs::write(&checklist, "pairs = [[\"a\", \"a\"]]\n").unwrap();

    let err = run_app(cli(&[
        "-q",
        "status",
        "--ephemeral",
        "--checklist",
        checklist.to_str().unwrap(),
    ]))
    .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load checklist"));
}

#[test]
fn test_default_command_is_run() {
    let parsed = cli(&[]);
    assert!(matches!(parsed.command.unwrap_or_default(), Commands::Run(_)));
}
