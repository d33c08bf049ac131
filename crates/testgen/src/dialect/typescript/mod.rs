//! Playwright Test for TypeScript.
//!
//! Output layout:
//!
//! ```text
//! EnvironmentSettings.ts
//! environments/<Environment>.env
//! pages/<Name>Page.ts
//! test-cases/<Name>.ts
//! test-routines/<Name>.ts       one exported class per data set
//! test-suites/<Name>Suite.spec.ts
//! PageDefinitions.ts
//! support/{LocatorHelper,TestCaseBase,TestSuiteBase}.ts
//! package.json, playwright.config.ts, tsconfig.json   (full runs)
//! .code-metadata
//! ```
//!
//! Namespaces are module paths relative to the output root; imports are
//! rewritten relative to the importing file with [`relative_module`].

mod actions;
mod templates;

use super::{Dialect, DialectKind};
use crate::action::ActionSyntax;
use crate::metadata::{KindLayout, NamespaceStyle, OutputLayout};

/// Playwright TypeScript dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct Typescript;

pub(crate) const LAYOUT: OutputLayout = OutputLayout {
    file_extension: ".ts",
    namespace_style: NamespaceStyle::ModulePath,
    pages: KindLayout {
        folder: "pages",
        class_suffix: "Page",
        file_suffix: "",
    },
    test_cases: KindLayout {
        folder: "test-cases",
        class_suffix: "",
        file_suffix: "",
    },
    test_routines: KindLayout {
        folder: "test-routines",
        class_suffix: "",
        file_suffix: "",
    },
    test_suites: KindLayout {
        folder: "test-suites",
        class_suffix: "Suite",
        file_suffix: ".spec",
    },
    support_folder: "support",
    environments_folder: "environments",
    environment_script_extension: ".env",
    reserved_class_names: &[
        "EnvironmentSettings",
        "LocatorHelper",
        "PageDefinitions",
        "TestCaseBase",
        "TestSuiteBase",
    ],
    reserved_member_names: &["Page", "Constructor"],
};

impl Dialect for Typescript {
    fn kind(&self) -> DialectKind {
        DialectKind::PlaywrightTypescript
    }

    fn syntax(&self) -> &dyn ActionSyntax {
        self
    }
}

/// Import specifier of `target_module` as seen from the file at `from_path`.
///
/// Both arguments are relative to the output root and use `/`.
#[must_use]
pub fn relative_module(from_path: &str, target_module: &str) -> String {
    let depth = from_path.matches('/').count();
    if depth == 0 {
        format!("./{target_module}")
    } else {
        format!("{}{target_module}", "../".repeat(depth))
    }
}

/// npm package name derived from the project name
pub(crate) fn package_name(name: &str) -> String {
    let mut out = String::new();
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "playwright-tests".to_string()
    } else {
        trimmed.to_string()
    }
}
