//! Built-in output dialects.
//!
//! A dialect bundles a [`TemplateProvider`] and an [`ActionSyntax`]. The
//! generator only ever holds a `&dyn Dialect`.

pub mod csharp;
pub mod typescript;

use crate::action::ActionSyntax;
use crate::model::LocatorKind;
use crate::template::TemplateProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use csharp::CsharpNunit;
pub use typescript::Typescript;

/// Target language and runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialectKind {
    /// Playwright for .NET with NUnit
    PlaywrightCsharpNunit,
    /// Playwright Test for TypeScript
    PlaywrightTypescript,
}

impl DialectKind {
    /// All built-in dialects
    pub const ALL: [Self; 2] = [Self::PlaywrightCsharpNunit, Self::PlaywrightTypescript];

    /// Identifier used in project files and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlaywrightCsharpNunit => "playwright-csharp-nunit",
            Self::PlaywrightTypescript => "playwright-typescript",
        }
    }

    /// Short description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::PlaywrightCsharpNunit => "Playwright for .NET, NUnit test runner (C#)",
            Self::PlaywrightTypescript => "Playwright Test runner (TypeScript)",
        }
    }

    /// Dialect implementation
    #[must_use]
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::PlaywrightCsharpNunit => &CsharpNunit,
            Self::PlaywrightTypescript => &Typescript,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown dialect name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dialect '{name}' (expected one of: playwright-csharp-nunit, playwright-typescript)")]
pub struct ParseDialectError {
    /// Rejected name
    pub name: String,
}

impl FromStr for DialectKind {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDialectError {
                name: s.to_string(),
            })
    }
}

/// Complete output dialect
pub trait Dialect: TemplateProvider + ActionSyntax + Send + Sync {
    /// Which dialect this is
    fn kind(&self) -> DialectKind;

    /// Action rules of this dialect
    fn syntax(&self) -> &dyn ActionSyntax;
}

/// Playwright selector text for locator kinds resolved through
/// `Locator`/`FrameLocator`; `None` for the `GetBy*` kinds.
pub(crate) fn selector_text(kind: LocatorKind, locator: &str) -> Option<String> {
    let selector = match kind {
        LocatorKind::Css | LocatorKind::IFrame => locator.to_string(),
        LocatorKind::Xpath if locator.starts_with("xpath=") => locator.to_string(),
        LocatorKind::Xpath => format!("xpath={locator}"),
        LocatorKind::Id => format!("id={locator}"),
        LocatorKind::Role => format!("role={locator}"),
        LocatorKind::IFrameId => format!("iframe[id='{locator}']"),
        LocatorKind::IFrameName => format!("iframe[name='{locator}']"),
        LocatorKind::Label
        | LocatorKind::Placeholder
        | LocatorKind::TestId
        | LocatorKind::Text
        | LocatorKind::Title
        | LocatorKind::AltText => return None,
    };
    Some(selector)
}

/// Prefix every line of `text` with `marker`, for line comments.
pub(crate) fn line_comment(marker: &str, text: &str) -> String {
    if text.trim().is_empty() {
        return marker.to_string();
    }
    text.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                marker.to_string()
            } else {
                format!("{marker} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
