//! Output project metadata.
//!
//! Assigns every page, test case, routine and suite a file path, a
//! namespace (or module path) and a class name. The table is built once per
//! run, before any rendering, and every later stage reads names from it
//! instead of deriving them again.
//!
//! Class names are unique per entity kind across all sub-folders, compared
//! case-insensitively. Entities claim names in declaration order; the first
//! keeps the plain name and later ones get the smallest free numeric
//! suffix starting at 2.

use crate::model::{Element, Project};
use crate::naming::{folder_segments, identifier_or, sanitize_identifier, NameRegistry};
use crate::result::{GenError, GenResult, IntegrityError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Layout
// ============================================================================

/// Kind of generated entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Page object
    Page,
    /// Test case
    TestCase,
    /// Parameterized test routine
    TestRoutine,
    /// Test suite
    TestSuite,
}

impl EntityKind {
    /// Human-readable label used in messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::TestCase => "test case",
            Self::TestRoutine => "test routine",
            Self::TestSuite => "test suite",
        }
    }

    /// Class name used when an entity name has no identifier characters
    #[must_use]
    pub const fn fallback_name(self) -> &'static str {
        match self {
            Self::Page => "Page",
            Self::TestCase => "TestCase",
            Self::TestRoutine => "TestRoutine",
            Self::TestSuite => "TestSuite",
        }
    }
}

/// How namespaces are derived from folders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceStyle {
    /// `Root.Folder.Sub` (C#)
    Dotted,
    /// Relative module path without extension (TypeScript)
    ModulePath,
}

/// Where one entity kind is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindLayout {
    /// Standard folder for the kind
    pub folder: &'static str,
    /// Appended to class names that do not already end with it
    pub class_suffix: &'static str,
    /// Inserted between class name and extension, e.g. `.spec`
    pub file_suffix: &'static str,
}

/// Dialect output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayout {
    /// Source file extension including the dot
    pub file_extension: &'static str,
    /// Namespace derivation
    pub namespace_style: NamespaceStyle,
    /// Page placement
    pub pages: KindLayout,
    /// Test case placement
    pub test_cases: KindLayout,
    /// Routine placement
    pub test_routines: KindLayout,
    /// Suite placement
    pub test_suites: KindLayout,
    /// Folder of support (base class) files
    pub support_folder: &'static str,
    /// Folder of environment setter scripts
    pub environments_folder: &'static str,
    /// Extension of environment setter scripts
    pub environment_script_extension: &'static str,
    /// Class names used by support files
    pub reserved_class_names: &'static [&'static str],
    /// Member names a page class already declares
    pub reserved_member_names: &'static [&'static str],
}

impl OutputLayout {
    /// Placement of an entity kind
    #[must_use]
    pub const fn kind(&self, kind: EntityKind) -> &KindLayout {
        match kind {
            EntityKind::Page => &self.pages,
            EntityKind::TestCase => &self.test_cases,
            EntityKind::TestRoutine => &self.test_routines,
            EntityKind::TestSuite => &self.test_suites,
        }
    }

    /// Metadata for a class file below `folders`.
    ///
    /// `folders` are path segments relative to the output root; an empty
    /// slice places the file at the root.
    #[must_use]
    pub fn file(
        &self,
        root_namespace: &str,
        folders: &[&str],
        class_name: &str,
        file_suffix: &str,
    ) -> OutputFileMetadata {
        let folders: Vec<&str> = folders.iter().copied().filter(|f| !f.is_empty()).collect();
        let stem = format!("{class_name}{file_suffix}");
        let module = if folders.is_empty() {
            stem
        } else {
            format!("{}/{stem}", folders.join("/"))
        };
        let namespace = match self.namespace_style {
            NamespaceStyle::Dotted => std::iter::once(root_namespace)
                .chain(folders.iter().copied())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("."),
            NamespaceStyle::ModulePath => module.clone(),
        };
        OutputFileMetadata {
            output_file_rel_path: format!("{module}{}", self.file_extension),
            output_file_full_namespace: namespace,
            output_file_class_name: class_name.to_string(),
        }
    }

    /// Metadata for a support file, in the support folder or at the root
    #[must_use]
    pub fn support_file(
        &self,
        root_namespace: &str,
        in_support_folder: bool,
        class_name: &str,
    ) -> OutputFileMetadata {
        let folders: &[&str] = if in_support_folder {
            &[self.support_folder]
        } else {
            &[]
        };
        self.file(root_namespace, folders, class_name, "")
    }
}

/// Sanitized root namespace: each dotted segment becomes an identifier.
///
/// Falls back to the project name, then to `Tests`.
#[must_use]
pub fn root_namespace(configured: &str, project_name: &str) -> String {
    let dotted = |value: &str| {
        value
            .split('.')
            .map(sanitize_identifier)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(".")
    };
    let root = dotted(configured);
    if !root.is_empty() {
        return root;
    }
    identifier_or(project_name, "Tests")
}

// ============================================================================
// Metadata table
// ============================================================================

/// Where an entity's code lives and what it is called
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFileMetadata {
    /// Path relative to the output root, forward-slash separated
    pub output_file_rel_path: String,
    /// Namespace (C#) or module path (TypeScript)
    pub output_file_full_namespace: String,
    /// Class name
    pub output_file_class_name: String,
}

/// Metadata of one model entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataEntry {
    /// Entity id
    pub id: String,
    /// Entity kind
    pub kind: EntityKind,
    /// Display name
    pub name: String,
    /// Assigned output location
    #[serde(flatten)]
    pub file: OutputFileMetadata,
}

/// Immutable id → output metadata table for one run
#[derive(Debug, Clone, Default)]
pub struct OutputProjectMetadata {
    entries: Vec<MetadataEntry>,
    index: BTreeMap<String, usize>,
    accessors: BTreeMap<String, BTreeMap<String, String>>,
}

impl OutputProjectMetadata {
    /// Assign output metadata to every entity of `project`.
    ///
    /// Fails on duplicate ids and on collisions the registry cannot
    /// resolve.
    pub fn build(
        project: &Project,
        layout: &OutputLayout,
        root_namespace: &str,
    ) -> GenResult<Self> {
        check_unique_ids(project)?;

        let mut metadata = Self::default();
        let entities = project
            .pages
            .iter()
            .map(|p| (EntityKind::Page, p.id.as_str(), p.name.as_str(), p.folder.as_str()))
            .chain(project.test_cases.iter().map(|tc| {
                (EntityKind::TestCase, tc.id.as_str(), tc.name.as_str(), tc.folder.as_str())
            }))
            .chain(project.test_routines.iter().map(|r| {
                (EntityKind::TestRoutine, r.id.as_str(), r.name.as_str(), r.folder.as_str())
            }))
            .chain(project.test_suites.iter().map(|s| {
                (EntityKind::TestSuite, s.id.as_str(), s.name.as_str(), s.folder.as_str())
            }));

        let mut registries: BTreeMap<EntityKind, NameRegistry> = BTreeMap::new();
        for (kind, id, name, folder) in entities {
            let kind_layout = layout.kind(kind);
            let registry = registries.entry(kind).or_insert_with(|| {
                let mut registry = NameRegistry::with_reserved(layout.reserved_class_names);
                // Suites import every case class they run.
                if kind == EntityKind::TestSuite {
                    for entry in metadata.of_kind(EntityKind::TestCase) {
                        registry.reserve(&entry.file.output_file_class_name);
                    }
                }
                registry
            });
            let class_name = registry.claim(&class_base_name(name, kind, kind_layout))?;

            let segments = folder_segments(folder);
            let folders: Vec<&str> = std::iter::once(kind_layout.folder)
                .chain(segments.iter().map(String::as_str))
                .collect();
            let file = layout.file(root_namespace, &folders, &class_name, kind_layout.file_suffix);
            tracing::trace!(
                kind = kind.label(),
                id,
                path = %file.output_file_rel_path,
                "assigned output file"
            );

            let _ = metadata.index.insert(id.to_string(), metadata.entries.len());
            metadata.entries.push(MetadataEntry {
                id: id.to_string(),
                kind,
                name: name.to_string(),
                file,
            });
        }

        for page in &project.pages {
            let page_class = &metadata.get(&page.id)?.output_file_class_name;
            let mut registry = NameRegistry::with_reserved(layout.reserved_member_names);
            registry.reserve(page_class);
            let mut accessors = BTreeMap::new();
            for element in &page.elements {
                if let Element::PageElement(element) = element {
                    let accessor = registry.claim(&identifier_or(&element.name, "Element"))?;
                    let _ = accessors.insert(element.id.clone(), accessor);
                }
            }
            let _ = metadata.accessors.insert(page.id.clone(), accessors);
        }

        Ok(metadata)
    }

    /// Look up an entity's output metadata
    pub fn get(&self, id: &str) -> GenResult<&OutputFileMetadata> {
        self.entry(id).map(|entry| &entry.file)
    }

    /// Look up an entity's full metadata entry
    pub fn entry(&self, id: &str) -> GenResult<&MetadataEntry> {
        self.index
            .get(id)
            .and_then(|&i| self.entries.get(i))
            .ok_or_else(|| GenError::missing_metadata(id))
    }

    /// Accessor name of a page element
    pub fn accessor(&self, page_id: &str, element_id: &str) -> GenResult<&str> {
        self.accessors
            .get(page_id)
            .and_then(|elements| elements.get(element_id))
            .map(String::as_str)
            .ok_or_else(|| GenError::missing_metadata(format!("{page_id}/{element_id}")))
    }

    /// All entries in declaration order (pages, cases, routines, suites)
    #[must_use]
    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    /// Entries of one kind in declaration order
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &MetadataEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// Number of entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn class_base_name(name: &str, kind: EntityKind, layout: &KindLayout) -> String {
    let base = identifier_or(name, kind.fallback_name());
    if layout.class_suffix.is_empty() || base.ends_with(layout.class_suffix) {
        base
    } else {
        format!("{base}{}", layout.class_suffix)
    }
}

fn check_unique_ids(project: &Project) -> GenResult<()> {
    let ids = project
        .pages
        .iter()
        .map(|p| &p.id)
        .chain(project.test_cases.iter().map(|tc| &tc.id))
        .chain(project.test_routines.iter().map(|r| &r.id))
        .chain(project.test_suites.iter().map(|s| &s.id));
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(IntegrityError::DuplicateId { id: id.clone() }.into());
        }
    }
    for page in &project.pages {
        let mut elements = BTreeSet::new();
        for element in &page.elements {
            if !element.id().is_empty() && !elements.insert(element.id()) {
                return Err(IntegrityError::DuplicateId {
                    id: format!("{}/{}", page.id, element.id()),
                }
                .into());
            }
        }
    }
    Ok(())
}
