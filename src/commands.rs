//! Subcommand implementations.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use yansi::Paint;

use crate::checklist::{gate, Checklist, ChecklistDefinition};
use crate::cli::{ExportArgs, ResetArgs, RunArgs, SourceArgs, StatusArgs, ThemeArg};
use crate::config::Config;
use crate::error::ExitCode;
use crate::export::{RenderOptions, SnapshotExporter};
use crate::navigator::SectionNavigator;
use crate::session::{self, SessionStore};
use crate::signal;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::tui::{run_tui, App, EventHandler, Theme};

/// Checklist with its saved state applied, for the non-interactive commands.
pub struct Workspace {
    pub checklist: Checklist,
    pub navigator: SectionNavigator,
    pub session: SessionStore<Box<dyn KeyValueStore>>,
}

impl Workspace {
    /// Load the definition, open the store, and restore the saved state.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is invalid or has no sections.
    pub fn open(source: &SourceArgs, config: &Config) -> Result<Self> {
        let mut checklist = load_checklist(source, config)?;
        let session = SessionStore::new(open_store(source, config)?);
        session::restore(&mut checklist, &session.load());
        let navigator = SectionNavigator::for_checklist(&mut checklist)?;
        Ok(Self {
            checklist,
            navigator,
            session,
        })
    }
}

fn load_checklist(source: &SourceArgs, config: &Config) -> Result<Checklist> {
    let path = source.checklist.as_deref().or(config.checklist.as_deref());
    let definition = ChecklistDefinition::load_or_builtin(path).with_context(|| match path {
        Some(path) => format!("Failed to load checklist {}", path.display()),
        None => "Built-in checklist is invalid".to_string(),
    })?;
    Ok(Checklist::from_definition(&definition))
}

fn open_store(source: &SourceArgs, config: &Config) -> Result<Box<dyn KeyValueStore>> {
    if source.ephemeral {
        log::debug!("Using in-memory store");
        return Ok(Box::new(MemoryStore::new()));
    }
    let path = match source.store.clone().or_else(|| config.store_path.clone()) {
        Some(path) => path,
        None => FileStore::default_path()?,
    };
    log::debug!("Using store file {}", path.display());
    Ok(Box::new(FileStore::new(path)))
}

fn build_exporter(
    config: &Config,
    export_dir: Option<PathBuf>,
    scale: Option<u32>,
    ascii_borders: bool,
) -> SnapshotExporter {
    let dir = export_dir.unwrap_or_else(|| config.resolved_export_dir());
    SnapshotExporter::new(dir)
        .with_prefix(config.export_prefix.clone())
        .with_options(RenderOptions::default().with_scale(scale.unwrap_or(config.export_scale)))
        .with_ascii_borders(ascii_borders)
}

// ==================== run ====================

/// Open the interactive checklist.
///
/// # Errors
///
/// Returns an error if setup fails, the terminal fails, or Ctrl+C is pressed.
pub fn run(args: RunArgs, config: &Config) -> Result<ExitCode> {
    let theme = match args.theme.unwrap_or(config.theme) {
        ThemeArg::Auto => Theme::auto(),
        ThemeArg::Light => Theme::light(),
        ThemeArg::Dark => Theme::dark(),
    };
    let mut keys_config = config.clone();
    if let Some(profile) = args.keys {
        keys_config.keybinding_profile = profile;
    }
    let bindings = keys_config
        .keybindings()
        .context("Invalid keybinding configuration")?;
    let ascii = args.ascii || config.accessibility.use_ascii_borders;

    let checklist = load_checklist(&args.source, config)?;
    let store = open_store(&args.source, config)?;
    let exporter = build_exporter(config, args.export_dir, None, ascii);
    log::info!("Exports go to {}", exporter.output_dir().display());

    let mut app = App::new(checklist, store, exporter)?
        .with_theme(theme)
        .with_accessible(ascii)
        .with_keybindings(bindings.clone());
    let events = EventHandler::with_bindings(bindings);
    let shutdown = signal::install_handler()?;

    run_tui(&mut app, &events, Some(&shutdown))?;
    Ok(ExitCode::Success)
}

// ==================== status ====================

/// Progress of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStatus {
    /// 1-based section number.
    pub number: usize,
    pub title: String,
    pub checked: usize,
    pub total: usize,
    pub unchecked: Vec<String>,
    pub justification: String,
    /// Whether the section may be left.
    pub satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub sections: Vec<SectionStatus>,
    pub all_satisfied: bool,
    pub shift_notes: String,
}

/// Per-section progress of `checklist`.
#[must_use]
pub fn status_report(checklist: &Checklist) -> StatusReport {
    let sections: Vec<SectionStatus> = checklist
        .sections()
        .iter()
        .map(|section| {
            let outcome = gate::evaluate(section);
            SectionStatus {
                number: section.index + 1,
                title: section.title.clone(),
                checked: section.checked_count(),
                total: section.items.len(),
                unchecked: outcome.unchecked_labels,
                justification: section.justification_text.clone(),
                satisfied: outcome.is_satisfied,
            }
        })
        .collect();
    let all_satisfied = sections.iter().all(|s| s.satisfied);
    StatusReport {
        sections,
        all_satisfied,
        shift_notes: checklist.shift_notes().to_string(),
    }
}

/// Print per-section progress.
///
/// # Errors
///
/// Returns an error if the workspace cannot be opened or output fails.
pub fn status(args: StatusArgs, config: &Config) -> Result<ExitCode> {
    let workspace = Workspace::open(&args.source, config)?;
    let report = status_report(&workspace.checklist);

    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write_status_text(&mut out, &report)?;
    }

    if args.strict && !report.all_satisfied {
        return Ok(ExitCode::GateRefused);
    }
    Ok(ExitCode::Success)
}

fn write_status_text(out: &mut impl Write, report: &StatusReport) -> io::Result<()> {
    let width = report
        .sections
        .iter()
        .map(|s| s.title.chars().count())
        .max()
        .unwrap_or(0);

    for section in &report.sections {
        let progress = format!("{}/{}", section.checked, section.total);
        let state = if section.unchecked.is_empty() {
            "done".green().bold().to_string()
        } else if section.satisfied {
            "reason given".yellow().to_string()
        } else {
            "needs a reason".red().bold().to_string()
        };
        writeln!(
            out,
            "{:>2}. {:<width$}  {:>5}  {}",
            section.number, section.title, progress, state
        )?;
        for label in &section.unchecked {
            writeln!(out, "      {} {}", "-".dim(), label)?;
        }
        if !section.justification.trim().is_empty() {
            writeln!(out, "      {} {}", "reason:".dim(), section.justification.trim())?;
        }
    }
    let notes = report.shift_notes.trim();
    if !notes.is_empty() {
        writeln!(out, "\n{}", "Shift notes:".bold())?;
        for line in notes.lines() {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}

// ==================== export ====================

/// Export one section without the TUI.
///
/// # Errors
///
/// Returns an error for an unknown section number or a failed export.
pub fn export(args: ExportArgs, config: &Config) -> Result<ExitCode> {
    let mut workspace = Workspace::open(&args.source, config)?;
    let count = workspace.checklist.section_count();
    let index = usize::try_from(args.section)
        .unwrap_or(usize::MAX)
        .saturating_sub(1);
    if index >= count {
        bail!("Section {} does not exist (the checklist has {count})", args.section);
    }

    let exporter = build_exporter(
        config,
        args.export_dir,
        args.scale,
        config.accessibility.use_ascii_borders,
    );
    workspace
        .navigator
        .jump_to(index, &mut workspace.checklist);
    let outcome = exporter
        .export_current_section(
            &mut workspace.checklist,
            &mut workspace.navigator,
            &mut workspace.session,
        )
        .context("Could not create the image")?;

    println!("{}", outcome.path.display());
    Ok(ExitCode::Success)
}

// ==================== reset ====================

/// Clear every check and note after confirmation.
///
/// # Errors
///
/// Returns an error if the prompt cannot be read or the record not deleted.
pub fn reset(args: ResetArgs, config: &Config) -> Result<ExitCode> {
    let mut workspace = Workspace::open(&args.source, config)?;

    if !args.yes {
        let stdin = io::stdin();
        if !confirm(&mut stdin.lock(), &mut io::stderr())? {
            eprintln!("Nothing was changed.");
            return Ok(ExitCode::Success);
        }
    }

    workspace
        .session
        .reset_all(&mut workspace.checklist, &mut workspace.navigator)?;
    eprintln!("{}", "All checks and notes cleared.".green());
    Ok(ExitCode::Success)
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
fn confirm(input: &mut impl BufRead, prompt: &mut impl Write) -> io::Result<bool> {
    write!(prompt, "Clear all checks and notes? [y/N] ")?;
    prompt.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
