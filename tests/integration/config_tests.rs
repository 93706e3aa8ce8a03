use closecheck::cli::ThemeArg;
use closecheck::config::Config;
use closecheck::tui::keybindings::KeybindingProfile;
use closecheck::tui::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert_eq!(config.theme, ThemeArg::Auto);
    assert_eq!(config.keybinding_profile, KeybindingProfile::Universal);
    assert_eq!(config.export_prefix, "closing-checklist");
    assert!(config.checklist.is_none());
}

#[test]
fn test_config_load_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
theme = "light"
keybinding_profile = "vim"
export_dir = "/srv/reports"
export_prefix = "bar-close"
export_scale = 3
checklist = "bar.toml"

[custom_keybindings]
export = ["Ctrl+e"]

[accessibility]
use_ascii_borders = true
"#,
    )
    .unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .extract()
        .unwrap();

    assert_eq!(config.theme, ThemeArg::Light);
    assert_eq!(config.keybinding_profile, KeybindingProfile::Vim);
    assert_eq!(config.export_dir, Some(PathBuf::from("/srv/reports")));
    assert_eq!(config.export_prefix, "bar-close");
    assert_eq!(config.export_scale, 3);
    assert_eq!(config.checklist, Some(PathBuf::from("bar.toml")));
    assert!(config.accessibility.use_ascii_borders);

    let bindings = config.keybindings().unwrap();
    let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
    assert_eq!(bindings.resolve(&ctrl_e), Some(Action::Export));
}

#[test]
fn test_config_env_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "export_scale = 3\ntheme = \"light\"\n").unwrap();

    figment::Jail::expect_with(|jail| {
        jail.set_env("CLOSECHECK_EXPORT_SCALE", "5");
        jail.set_env("CLOSECHECK_ACCESSIBILITY__USE_ASCII_BORDERS", "true");

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(&path))
            .merge(Env::prefixed("CLOSECHECK_").split("__"))
            .extract()?;

        assert_eq!(config.export_scale, 5);
        assert_eq!(config.theme, ThemeArg::Light);
        assert!(config.accessibility.use_ascii_borders);
        Ok(())
    });
}

#[test]
fn test_config_load_with_missing_file_uses_defaults() {
    let dir = tempdir().unwrap();
    figment::Jail::expect_with(|_| {
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.export_scale, 2);
        Ok(())
    });
}

#[test]
fn test_config_invalid_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "theme = [unclosed").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .extract();
    assert!(result.is_err());
}

#[test]
fn test_config_unknown_theme_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "theme = \"sepia\"\n").unwrap();
    assert!(Config::load(Some(&path)).is_err());
}
