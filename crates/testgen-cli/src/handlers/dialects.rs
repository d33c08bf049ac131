//! Dialects command handler

use crate::config::CliConfig;
use testgen::DialectKind;

/// One line per built-in dialect: name, then description
#[must_use]
pub fn render_dialects() -> String {
    let width = DialectKind::ALL
        .iter()
        .map(|kind| kind.as_str().len())
        .max()
        .unwrap_or(0);
    DialectKind::ALL
        .iter()
        .map(|kind| format!("{:width$}  {}\n", kind.as_str(), kind.description()))
        .collect()
}

/// Execute the dialects command
pub fn execute_dialects(_config: &CliConfig) {
    print!("{}", render_dialects());
}
