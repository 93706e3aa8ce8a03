//! Command-line interface definitions.
//!
//! ```bash
//! # Work through the checklist (default command)
//! closecheck
//!
//! # Use a site-specific checklist with vim keys
//! closecheck run --checklist ./bar.toml --keys vim
//!
//! # Show progress without the TUI, failing if a section still blocks
//! closecheck status --strict
//!
//! # Write section 3 to a PNG and clear it
//! closecheck export --section 3 --export-dir ~/shift-reports
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tui::keybindings::KeybindingProfile;

/// End-of-shift closing checklist for the terminal.
///
/// Items are ticked section by section; unchecked items need a written
/// reason before moving on, and each finished section can be saved as an
/// image.
#[derive(Debug, Parser)]
#[command(name = "closecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file to use instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive checklist
    Run(RunArgs),
    /// Print per-section progress
    Status(StatusArgs),
    /// Export one section as a PNG and clear it
    Export(ExportArgs),
    /// Uncheck everything and delete all notes
    Reset(ResetArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Self::Run(RunArgs::default())
    }
}

/// Where the checklist and its saved state come from.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Checklist definition (TOML); the built-in closing checklist if omitted
    #[arg(long, value_name = "FILE")]
    pub checklist: Option<PathBuf>,

    /// Store file holding the saved state
    #[arg(long, value_name = "FILE", conflicts_with = "ephemeral")]
    pub store: Option<PathBuf>,

    /// Keep state in memory only; nothing is read or written
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Colour theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Keybinding profile
    #[arg(long, value_enum)]
    pub keys: Option<KeybindingProfile>,

    /// Draw borders with plain ASCII characters
    #[arg(long)]
    pub ascii: bool,

    /// Directory for exported images
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Exit with code 2 if any section has unchecked items and no reason
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Section number, starting at 1
    #[arg(long, short, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub section: u32,

    /// Directory for the image
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Pixel scale of the image (1-16)
    #[arg(long, value_name = "N")]
    pub scale: Option<u32>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ResetArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Colour theme selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeArg {
    /// Follow the terminal background
    #[default]
    Auto,
    Light,
    Dark,
}

impl std::fmt::Display for ThemeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}
