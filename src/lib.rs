//! closecheck - end-of-shift closing checklist for the terminal.
//!
//! Items are grouped in sections and worked through one section at a time.
//! Leaving a section with unchecked items requires a written reason, paired
//! alternatives (mop or wet wipe) exclude each other, and a finished section
//! can be saved as a PNG, which also clears it for the next shift. Every
//! change is saved immediately.

pub mod checklist;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod navigator;
pub mod render;
pub mod session;
pub mod signal;
pub mod store;
pub mod tui;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::ExitCode;

/// Run the command selected on the command line.
///
/// # Errors
///
/// Returns any error that should end the process; `main` maps it to an exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref())?;
    log::debug!("Configuration: {:?}", config);

    match cli.command.unwrap_or_default() {
        Commands::Run(args) => commands::run(args, &config),
        Commands::Status(args) => commands::status(args, &config),
        Commands::Export(args) => commands::export(args, &config),
        Commands::Reset(args) => commands::reset(args, &config),
    }
}
