//! In-memory project model.
//!
//! The model is loaded once per run by an external loader and treated as
//! immutable by the engine. Field names follow the camelCase layout of the
//! project files, e.g.
//!
//! ```yaml
//! pages:
//!   - id: p-fills
//!     name: FillsScreen
//!     elements:
//!       - type: pageElement
//!         id: e-district
//!         name: district
//!         findBy: css
//!         locator: "[name='district']"
//! testCases:
//!   - id: tc-fills
//!     name: fills
//!     steps:
//!       - type: testStep
//!         page: p-fills
//!         element: e-district
//!         action: Input
//!         data: ABC
//! ```

use crate::action::ActionKind;
use crate::dialect::DialectKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete test project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project-wide settings
    #[serde(default)]
    pub settings: ProjectSettings,
    /// Page definitions, in declaration order
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Test cases, in declaration order
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    /// Parameterized test routines
    #[serde(default)]
    pub test_routines: Vec<TestRoutine>,
    /// Test suites
    #[serde(default)]
    pub test_suites: Vec<TestSuite>,
    /// Environment (configuration) sets
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl Project {
    /// Find a page by id
    #[must_use]
    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Find a test case by id
    #[must_use]
    pub fn test_case(&self, id: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|tc| tc.id == id)
    }

    /// Find a test routine by id
    #[must_use]
    pub fn test_routine(&self, id: &str) -> Option<&TestRoutine> {
        self.test_routines.iter().find(|r| r.id == id)
    }

    /// Find an environment by name (case-insensitive)
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments
            .iter()
            .find(|env| env.name.eq_ignore_ascii_case(name))
    }
}

/// Indentation character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndentStyle {
    /// Spaces, `indentSize` per level
    #[default]
    Space,
    /// One tab per level
    Tab,
}

/// Line separator of generated files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    /// The separator text
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Project-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    /// Project name
    pub name: String,
    /// Root namespace (C#) or package name seed (TypeScript)
    pub root_namespace: String,
    /// Preferred output dialect; the caller may override it
    pub dialect: Option<DialectKind>,
    /// Indentation character
    pub indent: IndentStyle,
    /// Spaces per indentation level
    pub indent_size: usize,
    /// Attribute used by test-id locators
    pub test_id_attribute_name: String,
    /// Line separator of generated files
    pub line_ending: LineEnding,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: "TestProject".to_string(),
            root_namespace: "TestProject".to_string(),
            dialect: None,
            indent: IndentStyle::Space,
            indent_size: 4,
            test_id_attribute_name: "data-testid".to_string(),
            line_ending: LineEnding::Lf,
        }
    }
}

impl ProjectSettings {
    /// Text of one indentation level
    #[must_use]
    pub fn indent_unit(&self) -> String {
        match self.indent {
            IndentStyle::Space => " ".repeat(self.indent_size),
            IndentStyle::Tab => "\t".to_string(),
        }
    }
}

/// Catalog of locatable elements for one screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Stable id
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Source sub-folder, slash separated
    #[serde(default)]
    pub folder: String,
    /// Elements in declaration order
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Page {
    /// Find an element by id
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }
}

/// Page entry: a locator or a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    /// Named locator
    PageElement(PageElement),
    /// Free text, emitted as a comment
    Comment(CommentElement),
}

impl Element {
    /// Element id
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::PageElement(e) => &e.id,
            Self::Comment(c) => &c.id,
        }
    }
}

/// Named locator on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElement {
    /// Stable id
    pub id: String,
    /// Element name, unique within its page
    pub name: String,
    /// How the locator string is interpreted
    pub find_by: LocatorKind,
    /// Locator text, possibly with `{n}` placeholders
    #[serde(default)]
    pub locator: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
}

/// Comment line on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentElement {
    /// Stable id
    #[serde(default)]
    pub id: String,
    /// Comment text
    #[serde(default)]
    pub comment: String,
}

/// Locator strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocatorKind {
    /// CSS selector
    Css,
    /// XPath expression
    Xpath,
    /// Element id attribute
    Id,
    /// Associated label text
    Label,
    /// Placeholder text
    Placeholder,
    /// Test-id attribute value
    TestId,
    /// Text content
    Text,
    /// Title attribute
    Title,
    /// ARIA role
    Role,
    /// Image alt text
    AltText,
    /// Frame located by CSS selector
    #[serde(rename = "iframe", alias = "iFrame")]
    IFrame,
    /// Frame located by id
    #[serde(rename = "iframeId", alias = "iFrameId")]
    IFrameId,
    /// Frame located by name
    #[serde(rename = "iframeName", alias = "iFrameName")]
    IFrameName,
}

impl LocatorKind {
    /// Frame locators can be chained but not acted on
    #[must_use]
    pub const fn is_frame(self) -> bool {
        matches!(self, Self::IFrame | Self::IFrameId | Self::IFrameName)
    }
}

/// Non-parameterized sequence of steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Stable id
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Source sub-folder
    #[serde(default)]
    pub folder: String,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Reusable steps expanded once per data set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRoutine {
    /// Stable id
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Source sub-folder
    #[serde(default)]
    pub folder: String,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Declared data sets, in expansion order
    #[serde(default)]
    pub data_sets: Vec<DataSet>,
}

/// Named set of values for a routine's data-driven steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    /// Stable id
    pub id: String,
    /// Name, used as the key in data-driven steps
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
}

/// Test step or comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    /// Executable step
    TestStep(TestStep),
    /// Comment line in the generated body
    Comment(StepComment),
}

/// Executable step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    /// Stable id
    #[serde(default)]
    pub id: String,
    /// Page id, empty for global actions
    #[serde(default)]
    pub page: String,
    /// Element id, empty for global actions
    #[serde(default)]
    pub element: String,
    /// Action kind
    pub action: ActionKind,
    /// Step value
    #[serde(default)]
    pub data: StepData,
    /// Locator parameters, or data-set ids for `RunTestRoutine`
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl TestStep {
    /// Page id, if any
    #[must_use]
    pub fn page_id(&self) -> Option<&str> {
        Some(self.page.as_str()).filter(|id| !id.is_empty())
    }

    /// Element id, if any
    #[must_use]
    pub fn element_id(&self) -> Option<&str> {
        Some(self.element.as_str()).filter(|id| !id.is_empty())
    }
}

/// Comment step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepComment {
    /// Stable id
    #[serde(default)]
    pub id: String,
    /// Comment text
    #[serde(default)]
    pub comment: String,
}

/// Step payload: one literal, or one value per data set name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepData {
    /// Same value in every run
    Literal(String),
    /// Value keyed by data set name
    PerDataSet(BTreeMap<String, String>),
}

impl Default for StepData {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

impl StepData {
    /// Check whether this is data-driven
    #[must_use]
    pub const fn is_data_driven(&self) -> bool {
        matches!(self, Self::PerDataSet(_))
    }
}

/// Ordered group of test cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuite {
    /// Stable id
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Source sub-folder
    #[serde(default)]
    pub folder: String,
    /// Referenced test case ids, in run order
    #[serde(default, alias = "testcases")]
    pub test_cases: Vec<String>,
}

/// Named configuration set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Environment name
    pub name: String,
    /// Settings in declaration order
    #[serde(default)]
    pub settings: Vec<Setting>,
}

/// Key/value configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    /// Setting name
    pub name: String,
    /// Setting value
    #[serde(default)]
    pub value: String,
}
