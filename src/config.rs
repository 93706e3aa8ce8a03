//! Application configuration.
//!
//! Values are layered with figment, later layers winning:
//!
//! 1. built-in defaults
//! 2. the TOML file (`--config`, or `config.toml` in the platform config dir)
//! 3. `CLOSECHECK_*` environment variables, `__` separating nested keys
//!    (`CLOSECHECK_ACCESSIBILITY__USE_ASCII_BORDERS=true`)
//!
//! Command-line flags are applied on top by the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::ThemeArg;
use crate::export::DEFAULT_PREFIX;
use crate::tui::keybindings::{KeyBindings, KeybindingError, KeybindingProfile};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "CLOSECHECK_";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    /// Draw borders with `+`, `-` and `|`.
    pub use_ascii_borders: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeArg,
    pub keybinding_profile: KeybindingProfile,
    /// Extra keys per action name, e.g. `export = ["Ctrl+e"]`.
    pub custom_keybindings: HashMap<String, Vec<String>>,
    /// Where exported images go. Defaults to `exports/` in the data dir.
    pub export_dir: Option<PathBuf>,
    pub export_prefix: String,
    pub export_scale: u32,
    /// Checklist definition file. The built-in checklist is used if unset.
    pub checklist: Option<PathBuf>,
    /// Store file. Defaults to `store.json` in the data dir.
    pub store_path: Option<PathBuf>,
    pub accessibility: AccessibilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeArg::Auto,
            keybinding_profile: KeybindingProfile::Universal,
            custom_keybindings: HashMap::new(),
            export_dir: None,
            export_prefix: DEFAULT_PREFIX.to_string(),
            export_scale: 2,
            checklist: None,
            store_path: None,
            accessibility: AccessibilityConfig::default(),
        }
    }
}

impl Config {
    /// The layered figment for `path`, or for the default config file.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        match path.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(file) => {
                log::debug!("Reading configuration from {}", file.display());
                figment = figment.merge(Toml::file(file));
            }
            None => log::debug!("No configuration directory available"),
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the configuration. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not valid TOML or a value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(path)
            .extract()
            .context("Invalid configuration")?;
        Ok(config)
    }

    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Export directory after applying the default.
    #[must_use]
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| {
            project_dirs().map_or_else(
                || PathBuf::from("."),
                |dirs| dirs.data_dir().join("exports"),
            )
        })
    }

    /// Key bindings for the configured profile and overrides.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first unknown action or key.
    pub fn keybindings(&self) -> Result<KeyBindings, KeybindingError> {
        KeyBindings::from_profile_with_custom(self.keybinding_profile, &self.custom_keybindings)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "closecheck", "closecheck")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .extract()
            .unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.export_prefix, "closing-checklist");
        assert_eq!(config.export_scale, 2);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "export_scale = 4\n[accessibility]\nuse_ascii_borders = true\n").unwrap();

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(&path))
            .extract()
            .unwrap();
        assert_eq!(config.export_scale, 4);
        assert!(config.accessibility.use_ascii_borders);
        assert_eq!(config.theme, ThemeArg::Auto);
    }

    #[test]
    fn test_load_rejects_bad_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "export_scale = \"big\"\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_unknown_action_is_reported() {
        let mut config = Config::default();
        config
            .custom_keybindings
            .insert("exprot".to_string(), vec!["Ctrl+e".to_string()]);
        let err = config.keybindings().unwrap_err();
        assert!(err.to_string().contains("export"));
    }

    #[test]
    fn test_explicit_export_dir_wins() {
        let config = Config {
            export_dir: Some(PathBuf::from("/tmp/out")),
            ..Config::default()
        };
        assert_eq!(config.resolved_export_dir(), PathBuf::from("/tmp/out"));
    }
}
