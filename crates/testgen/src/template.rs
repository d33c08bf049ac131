//! Template provider capability.
//!
//! The generator assembles bodies, names and imports; a provider turns them
//! into dialect text, one method per fragment kind. Bodies handed to a
//! provider are already indented one level.
//!
//! Dialect templates are plain strings indented with tabs and holding
//! `{{name}}` placeholders; [`fill`] converts the tabs to the project's
//! indentation unit and substitutes the values.

use crate::metadata::{OutputFileMetadata, OutputLayout};
use crate::model::LocatorKind;
use crate::output::OutputFile;
use crate::result::{RenderError, RenderResult};

/// Project-level values every provider may need
#[derive(Debug, Clone, Copy)]
pub struct ProjectContext<'a> {
    /// Project display name
    pub name: &'a str,
    /// Sanitized root namespace
    pub root_namespace: &'a str,
    /// One indentation level
    pub indent: &'a str,
    /// Attribute used by test-id locators
    pub test_id_attribute: &'a str,
    /// The project declares test routines
    pub has_routines: bool,
}

/// Locator accessor on a page class
#[derive(Debug, Clone, Copy)]
pub struct LocatorFragment<'a> {
    /// Accessor name
    pub accessor: &'a str,
    /// Locator strategy
    pub kind: LocatorKind,
    /// Locator text, possibly with `{n}` placeholders
    pub locator: &'a str,
    /// Element description
    pub description: &'a str,
    /// Number of string parameters (0 when not parameterized)
    pub parameter_count: usize,
}

/// Page class file
#[derive(Debug, Clone, Copy)]
pub struct PageFragment<'a> {
    /// Page output metadata
    pub file: &'a OutputFileMetadata,
    /// Page description
    pub description: &'a str,
    /// Rendered elements
    pub body: &'a str,
}

/// Test case class file
#[derive(Debug, Clone, Copy)]
pub struct TestCaseFragment<'a> {
    /// Case output metadata
    pub file: &'a OutputFileMetadata,
    /// Case description
    pub description: &'a str,
    /// Rendered import lines
    pub imports: &'a str,
    /// Rendered steps
    pub body: &'a str,
}

/// One suite test method running a case
#[derive(Debug, Clone, Copy)]
pub struct TestMethodFragment<'a> {
    /// Method (or test title) name
    pub method_name: &'a str,
    /// Output metadata of the case it runs
    pub test_case: &'a OutputFileMetadata,
    /// Case description
    pub description: &'a str,
}

/// Test suite file
#[derive(Debug, Clone, Copy)]
pub struct TestSuiteFragment<'a> {
    /// Suite output metadata
    pub file: &'a OutputFileMetadata,
    /// Suite description
    pub description: &'a str,
    /// Rendered import lines
    pub imports: &'a str,
    /// Rendered test methods
    pub body: &'a str,
}

/// One routine variant class
#[derive(Debug, Clone, Copy)]
pub struct TestRoutineClassFragment<'a> {
    /// Variant class name
    pub class_name: &'a str,
    /// Routine description
    pub description: &'a str,
    /// Data set name
    pub data_set: &'a str,
    /// Data set description
    pub data_set_description: &'a str,
    /// Rendered steps
    pub body: &'a str,
}

/// Routine file holding all variant classes
#[derive(Debug, Clone, Copy)]
pub struct TestRoutineFileFragment<'a> {
    /// Routine output metadata
    pub file: &'a OutputFileMetadata,
    /// Routine description
    pub description: &'a str,
    /// Rendered import lines
    pub imports: &'a str,
    /// Rendered variant classes; empty for routines without data sets
    pub classes: &'a [String],
}

/// Page-definitions aggregator
#[derive(Debug, Clone, Copy)]
pub struct PageDefinitionsFragment<'a> {
    /// Aggregator output metadata
    pub file: &'a OutputFileMetadata,
    /// Rendered import lines
    pub imports: &'a str,
    /// Rendered properties, indented once
    pub properties: &'a str,
    /// Rendered initializations, indented twice
    pub initializations: &'a str,
}

/// Generated environment setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingFragment {
    /// Property identifier, also the environment variable name
    pub property: String,
    /// Fallback value from the active environment
    pub default_value: String,
}

/// Environment settings file
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentSettingsFragment<'a> {
    /// Settings file output metadata
    pub file: &'a OutputFileMetadata,
    /// Active environment name
    pub environment: &'a str,
    /// Settings in first-declared order
    pub settings: &'a [SettingFragment],
}

/// Setter script for one environment
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentSetterFragment<'a> {
    /// Environment name
    pub environment: &'a str,
    /// `(variable, value)` pairs declared by this environment
    pub values: &'a [(String, String)],
}

/// Dialect text for every fragment kind
pub trait TemplateProvider {
    /// Folder and naming layout
    fn layout(&self) -> &OutputLayout;

    /// Result file the execution collaborator reads after a run
    fn test_result_file_name(&self) -> &'static str;

    fn locator(&self, ctx: &ProjectContext<'_>, fragment: &LocatorFragment<'_>) -> RenderResult;

    fn comment(&self, text: &str) -> RenderResult;

    fn page(&self, ctx: &ProjectContext<'_>, fragment: &PageFragment<'_>) -> RenderResult;

    /// Import of `symbols` from `target` into the file described by `from`
    fn import(
        &self,
        from: &OutputFileMetadata,
        target: &OutputFileMetadata,
        symbols: &[&str],
    ) -> RenderResult;

    fn page_definition_property(&self, page: &OutputFileMetadata) -> RenderResult;

    fn page_definition_init(&self, page: &OutputFileMetadata) -> RenderResult;

    fn page_definitions(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &PageDefinitionsFragment<'_>,
    ) -> RenderResult;

    fn test_method(&self, ctx: &ProjectContext<'_>, fragment: &TestMethodFragment<'_>)
        -> RenderResult;

    fn test_case(&self, ctx: &ProjectContext<'_>, fragment: &TestCaseFragment<'_>) -> RenderResult;

    fn test_suite(&self, ctx: &ProjectContext<'_>, fragment: &TestSuiteFragment<'_>)
        -> RenderResult;

    fn test_routine_class(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &TestRoutineClassFragment<'_>,
    ) -> RenderResult;

    fn test_routine_file(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &TestRoutineFileFragment<'_>,
    ) -> RenderResult;

    fn environment_settings(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &EnvironmentSettingsFragment<'_>,
    ) -> RenderResult;

    fn environment_setter(&self, fragment: &EnvironmentSetterFragment<'_>) -> RenderResult;

    /// Base classes and helpers
    fn support_files(&self, ctx: &ProjectContext<'_>) -> Result<Vec<OutputFile>, RenderError>;

    /// Build and runner configuration, emitted only for full runs
    fn project_files(&self, ctx: &ProjectContext<'_>) -> Result<Vec<OutputFile>, RenderError>;
}

/// Expand a tab-indented template and substitute `{{name}}` placeholders.
///
/// Leading tabs become `indent` before substitution, so substituted values
/// keep their own indentation. A line holding nothing but a placeholder
/// whose value is empty is dropped. Unknown placeholders are left as-is.
#[must_use]
pub fn fill(template: &str, indent: &str, values: &[(&str, &str)]) -> String {
    let lookup = |key: &str| values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
    let mut lines = Vec::new();
    for line in template.lines() {
        let tabs = line.chars().take_while(|c| *c == '\t').count();
        let rest = &line[tabs..];
        if let Some(key) = rest.strip_prefix("{{").and_then(|r| r.strip_suffix("}}")) {
            if lookup(key) == Some("") {
                continue;
            }
        }
        lines.push(format!("{}{}", indent.repeat(tabs), substitute(rest, &lookup)));
    }
    let mut out = lines.join("\n");
    if template.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn substitute<'v>(line: &str, lookup: &impl Fn(&str) -> Option<&'v str>) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}").and_then(|end| lookup(&after[..end]).map(|v| (end, v))) {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
