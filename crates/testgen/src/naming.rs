//! Identifier and text helpers shared by the metadata generator, the
//! dataset expander and the dialects.
//!
//! Names coming from the project model are free text ("Login Page",
//! "DataSet Number Two"). Everything that ends up as a class, member or
//! file name goes through [`sanitize_identifier`] and is then claimed in a
//! [`NameRegistry`] so that two entities never receive the same name.

use crate::result::IntegrityError;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Strip characters that are illegal in identifiers and upper-case the
/// first letter.
///
/// A leading digit is prefixed with `_`. The result may be empty when the
/// name has no identifier characters at all.
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let mut ident = upper_case_first(&stripped);
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Sanitize `name`, falling back to `fallback` when nothing is left.
#[must_use]
pub fn identifier_or(name: &str, fallback: &str) -> String {
    let ident = sanitize_identifier(name);
    if ident.is_empty() {
        fallback.to_string()
    } else {
        ident
    }
}

/// Upper-case the first character.
#[must_use]
pub fn upper_case_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character.
#[must_use]
pub fn lower_case_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a slash-separated source folder into sanitized path segments.
///
/// Both `/` and `\` separate segments; segments without identifier
/// characters are dropped.
#[must_use]
pub fn folder_segments(folder: &str) -> Vec<String> {
    folder
        .split(['/', '\\'])
        .map(sanitize_identifier)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Set of claimed identifiers, compared case-insensitively.
///
/// Case-insensitive comparison keeps two files from mapping onto the
/// same path on case-insensitive file systems.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    taken: BTreeSet<String>,
}

impl NameRegistry {
    /// Highest numeric discriminator tried before giving up.
    pub const MAX_DISCRIMINATOR: usize = 10_000;

    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with names that may never be handed out
    #[must_use]
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.reserve(name.as_ref());
        }
        registry
    }

    /// Mark a name as taken without returning it
    pub fn reserve(&mut self, name: &str) {
        let _ = self.taken.insert(name.to_lowercase());
    }

    /// Check whether a name is already taken
    #[must_use]
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&name.to_lowercase())
    }

    /// Claim `base`, or the first free `base2`, `base3`, ...
    ///
    /// Calls happen in declaration order, so the first entity keeps the
    /// plain name.
    pub fn claim(&mut self, base: &str) -> Result<String, IntegrityError> {
        if self.taken.insert(base.to_lowercase()) {
            return Ok(base.to_string());
        }
        for n in 2..=Self::MAX_DISCRIMINATOR {
            let candidate = format!("{base}{n}");
            if self.taken.insert(candidate.to_lowercase()) {
                return Ok(candidate);
            }
        }
        Err(IntegrityError::UnresolvedCollision {
            name: base.to_string(),
        })
    }
}

/// Escape text for a double-quoted string literal.
///
/// The escapes used (`\\`, `\"`, `\n`, `\r`, `\t`, `\uXXXX`) are valid in
/// both C# and TypeScript.
#[must_use]
pub fn escape_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// Escape and wrap text in double quotes.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("\"{}\"", escape_string_literal(value))
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern is valid"))
}

/// Most parameters a single locator may take.
pub const MAX_LOCATOR_PARAMETERS: usize = 32;

/// Number of parameters a locator takes: highest `{n}` placeholder + 1.
///
/// Returns `None` when a placeholder index is at or above
/// [`MAX_LOCATOR_PARAMETERS`].
#[must_use]
pub fn placeholder_count(locator: &str) -> Option<usize> {
    let mut count = 0;
    for caps in placeholder_pattern().captures_iter(locator) {
        let needed = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| index.checked_add(1))
            .filter(|needed| *needed <= MAX_LOCATOR_PARAMETERS)?;
        count = count.max(needed);
    }
    Some(count)
}

/// Check whether a locator contains `{n}` placeholders.
#[must_use]
pub fn has_placeholder(locator: &str) -> bool {
    placeholder_pattern().is_match(locator)
}

/// Indent every non-blank line by `levels` copies of `unit`.
///
/// Blank lines stay empty so generated files carry no trailing
/// whitespace.
#[must_use]
pub fn indent(text: &str, unit: &str, levels: usize) -> String {
    let prefix = unit.repeat(levels);
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
