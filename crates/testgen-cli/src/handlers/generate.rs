//! Generate command handler

use crate::commands::GenerateArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::loader::load_project;
use std::path::PathBuf;
use testgen::{generate, DialectKind, DirectoryWriter, GenerateOptions, OutputWriter, Project};

/// What a generate run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Dialect used
    pub dialect: DialectKind,
    /// Output directory
    pub output: PathBuf,
    /// Relative paths of the rendered files, in emission order
    pub files: Vec<String>,
    /// Whether files were written
    pub written: bool,
}

/// Pick the dialect: the command line, then the project file, then C#.
pub fn resolve_dialect(requested: Option<&str>, project: &Project) -> CliResult<DialectKind> {
    match requested {
        Some(name) => name
            .parse()
            .map_err(|e: testgen::ParseDialectError| CliError::invalid_argument(e.to_string())),
        None => Ok(project
            .settings
            .dialect
            .unwrap_or(DialectKind::PlaywrightCsharpNunit)),
    }
}

/// Execute the generate command
pub fn execute_generate(config: &CliConfig, args: &GenerateArgs) -> CliResult<GenerateSummary> {
    let project = load_project(&args.project)?;
    let dialect = resolve_dialect(args.dialect.as_deref(), &project)?;

    let mut options = GenerateOptions::new().with_full(args.full);
    if let Some(ref environment) = args.environment {
        options = options.with_environment(environment.clone());
    }

    let output = generate(&project, dialect, &options)?;
    let files: Vec<String> = output.paths().map(str::to_string).collect();
    let mut reporter = super::reporter(config);

    if args.dry_run {
        for path in &files {
            println!("{path}");
        }
        reporter.info(&format!(
            "Dry run: {} file(s) rendered for {dialect}, nothing written",
            files.len()
        ));
        return Ok(GenerateSummary {
            dialect,
            output: args.output.clone(),
            files,
            written: false,
        });
    }

    let mut writer = DirectoryWriter::new(args.output.clone());
    reporter.start_progress(output.len() as u64, "writing");
    for file in &output.files {
        reporter.set_message(&file.path);
        if let Err(e) = writer.write(&file.path, &file.content) {
            reporter.finish();
            return Err(e.into());
        }
        if config.verbosity.is_verbose() {
            reporter.info(&file.path);
        }
        reporter.increment(1);
    }
    reporter.finish();

    tracing::info!(
        dialect = %dialect,
        files = writer.written(),
        output = %args.output.display(),
        "generation complete"
    );
    reporter.success(&format!(
        "Generated {} file(s) for {dialect} in {}",
        writer.written(),
        args.output.display()
    ));

    Ok(GenerateSummary {
        dialect,
        output: args.output.clone(),
        files,
        written: true,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Verbosity;
    use tempfile::TempDir;

    const PROJECT: &str = r##"{
        "settings": {"name": "Shop"},
        "pages": [{"id": "p1", "name": "Home", "elements": [
            {"type": "pageElement", "id": "e1", "name": "Search", "findBy": "css", "locator": "#q"}
        ]}],
        "testCases": [{"id": "tc1", "name": "Search works", "steps": [
            {"type": "testStep", "page": "p1", "element": "e1", "action": "Input", "data": "shoes"}
        ]}],
        "testSuites": [{"id": "s1", "name": "Smoke", "testCases": ["tc1"]}]
    }"##;

    fn quiet() -> CliConfig {
        CliConfig::new().with_verbosity(Verbosity::Quiet)
    }

    fn args(dir: &TempDir, dialect: Option<&str>, dry_run: bool) -> GenerateArgs {
        let project = dir.path().join("shop.json");
        std::fs::write(&project, PROJECT).unwrap();
        GenerateArgs {
            project,
            output: dir.path().join("out"),
            dialect: dialect.map(str::to_string),
            environment: None,
            full: false,
            dry_run,
        }
    }

    #[test]
    fn test_resolve_dialect_order() {
        let mut project = Project::default();
        assert_eq!(
            resolve_dialect(None, &project).unwrap(),
            DialectKind::PlaywrightCsharpNunit
        );
        project.settings.dialect = Some(DialectKind::PlaywrightTypescript);
        assert_eq!(
            resolve_dialect(None, &project).unwrap(),
            DialectKind::PlaywrightTypescript
        );
        assert_eq!(
            resolve_dialect(Some("playwright-csharp-nunit"), &project).unwrap(),
            DialectKind::PlaywrightCsharpNunit
        );
    }

    #[test]
    fn test_resolve_unknown_dialect() {
        let err = resolve_dialect(Some("cobol"), &Project::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(err.to_string().contains("cobol"));
    }

    #[test]
    fn test_generate_writes_tree() {
        let dir = TempDir::new().unwrap();
        let summary = execute_generate(&quiet(), &args(&dir, None, false)).unwrap();
        assert!(summary.written);
        assert_eq!(summary.dialect, DialectKind::PlaywrightCsharpNunit);
        assert!(summary.files.iter().any(|p| p == "Pages/HomePage.cs"));
        for path in &summary.files {
            assert!(dir.path().join("out").join(path).exists(), "{path}");
        }
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let summary =
            execute_generate(&quiet(), &args(&dir, Some("playwright-typescript"), true)).unwrap();
        assert!(!summary.written);
        assert!(summary.files.iter().any(|p| p == "pages/HomePage.ts"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_unknown_environment_fails() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, None, false);
        args.environment = Some("prod".to_string());
        let err = execute_generate(&quiet(), &args).unwrap_err();
        assert!(matches!(err, CliError::Generation(_)));
        assert!(!dir.path().join("out").exists());
    }
}
