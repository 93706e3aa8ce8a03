//! Ctrl+C handling.
//!
//! The handler only raises a shared flag; the TUI loop polls it every frame
//! and leaves with [`crate::error::ExitCode::Interrupted`].

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared "shutdown requested" flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static INSTALLED: OnceLock<ShutdownHandler> = OnceLock::new();

/// Register the process-wide Ctrl+C handler.
///
/// Calling it again returns the already registered handler with its flag
/// cleared, so several `run_app` calls in one process (tests) share it.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if another handler was registered
/// outside this module.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(existing) = INSTALLED.get() {
        existing.reset();
        return Ok(existing.clone());
    }

    let handler = ShutdownHandler::new();
    let signalled = handler.clone();
    ctrlc::set_handler(move || {
        signalled.request_shutdown();
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted, saving and leaving...");
        let _ = stderr.flush();
    })?;

    let installed = INSTALLED.get_or_init(|| handler);
    Ok(installed.clone())
}
