//! testgen CLI: generate Playwright test sources
//!
//! ## Usage
//!
//! ```bash
//! testgen generate shop.yaml -o out                  # C# / NUnit (default)
//! testgen generate shop.yaml -o out --dialect playwright-typescript --full
//! testgen generate shop.yaml --environment staging --dry-run
//! testgen verify out                                 # detect hand edits
//! testgen dialects                                   # list dialects
//! ```

use clap::Parser;
use std::process::ExitCode;
use testgen_cli::{
    handlers::{execute_dialects, execute_generate, execute_verify},
    logging, Cli, CliConfig, CliResult, ColorChoice, Commands, LogFormat, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init(&config);
    tracing::debug!(?config, "starting testgen");

    match cli.command {
        Commands::Generate(args) => execute_generate(&config, &args).map(|_| ()),
        Commands::Verify(args) => execute_verify(&config, &args).map(|_| ()),
        Commands::Dialects => {
            execute_dialects(&config);
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.into();
    let log_format: LogFormat = cli.log_format.into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_format(log_format)
}
