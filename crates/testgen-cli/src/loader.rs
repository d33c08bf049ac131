//! Project file loading.
//!
//! `.yaml`/`.yml` files are read with `serde_yaml_ng`, everything else as
//! JSON.

use crate::error::{CliError, CliResult};
use std::path::Path;
use testgen::Project;

/// Project file syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    /// YAML document
    Yaml,
    /// JSON document
    Json,
}

impl ProjectFormat {
    /// Pick the format from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parse project text in the given format
pub fn parse_project(text: &str, format: ProjectFormat) -> CliResult<Project> {
    let project = match format {
        ProjectFormat::Yaml => serde_yaml_ng::from_str(text)?,
        ProjectFormat::Json => serde_json::from_str(text)?,
    };
    Ok(project)
}

/// Read and parse a project file.
///
/// # Errors
///
/// Returns [`CliError::ProjectLoad`] naming the file when it cannot be
/// read or parsed.
pub fn load_project(path: &Path) -> CliResult<Project> {
    let display_path = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::project_load(&display_path, e.to_string()))?;
    let format = ProjectFormat::from_path(path);
    let project = parse_project(&text, format)
        .map_err(|e| CliError::project_load(&display_path, e.to_string()))?;
    tracing::info!(
        path = %display_path,
        ?format,
        pages = project.pages.len(),
        test_cases = project.test_cases.len(),
        test_routines = project.test_routines.len(),
        test_suites = project.test_suites.len(),
        "loaded project"
    );
    Ok(project)
}
