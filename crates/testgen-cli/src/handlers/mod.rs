//! Command handlers, kept out of main.rs for testability

pub mod dialects;
pub mod generate;
pub mod verify;

pub use dialects::{execute_dialects, render_dialects};
pub use generate::{execute_generate, resolve_dialect, GenerateSummary};
pub use verify::execute_verify;

use crate::config::CliConfig;
use crate::output::ProgressReporter;

/// Reporter configured from the CLI flags
#[must_use]
pub fn reporter(config: &CliConfig) -> ProgressReporter {
    ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet())
}
