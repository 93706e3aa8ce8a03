//! Exit codes and the machine-readable error record.

use serde::Serialize;

/// Process exit codes.
///
/// - 0: success
/// - 1: unexpected failure
/// - 2: `status --strict` found a section that cannot be left
/// - 130: interrupted by Ctrl+C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    GateRefused = 2,
    Interrupted = 130,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable code used in `--json-errors` output.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "CC000",
            Self::GeneralError => "CC001",
            Self::GateRefused => "CC002",
            Self::Interrupted => "CC130",
        }
    }
}

/// Error printed to stderr as JSON when `--json-errors` is given.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    pub code: String,
    pub exit_code: i32,
    pub message: String,
    pub interrupted: bool,
}

impl StructuredError {
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
