//! testgen CLI Library
//!
//! Command-line front end for the testgen generator: loads a project file,
//! runs a dialect and writes or verifies the output tree.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod loader;
pub mod logging;
mod output;

pub use commands::{Cli, ColorArg, Commands, GenerateArgs, LogFormatArg, VerifyArgs};
pub use config::{CliConfig, ColorChoice, LogFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use loader::{load_project, parse_project, ProjectFormat};
pub use output::ProgressReporter;
