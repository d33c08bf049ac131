//! Verify command handler

use crate::commands::VerifyArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use testgen::{verify_output, VerifyReport};

/// Execute the verify command.
///
/// Fails when any listed file is modified or missing.
pub fn execute_verify(config: &CliConfig, args: &VerifyArgs) -> CliResult<VerifyReport> {
    let report = verify_output(&args.dir)?;
    let reporter = super::reporter(config);

    if report.is_clean() {
        reporter.success(&format!(
            "{} file(s) match {}",
            report.checked,
            args.dir.display()
        ));
        return Ok(report);
    }

    for path in &report.modified {
        reporter.failure(&format!("modified: {path}"));
    }
    for path in &report.missing {
        reporter.failure(&format!("missing: {path}"));
    }
    Err(CliError::verification(format!(
        "{} modified, {} missing of {} file(s)",
        report.modified.len(),
        report.missing.len(),
        report.checked
    )))
}
