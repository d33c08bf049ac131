//! Generated files and the writers that persist them.

use crate::result::{GenError, GenResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Path relative to the output root, forward-slash separated
    pub path: String,
    /// File content
    pub content: String,
}

impl OutputFile {
    /// Create an output file
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Complete output of a successful run, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedProject {
    /// Files in emission order; the metadata file is last
    pub files: Vec<OutputFile>,
}

impl GeneratedProject {
    /// Find a file by relative path
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&OutputFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Relative paths in emission order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check whether nothing was generated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Hand every file to `writer`, stopping at the first failure
    pub fn write_to(&self, writer: &mut dyn OutputWriter) -> GenResult<()> {
        for file in &self.files {
            writer.write(&file.path, &file.content)?;
        }
        Ok(())
    }
}

/// Sink for generated files
pub trait OutputWriter {
    /// Persist one file at a relative path
    fn write(&mut self, path: &str, content: &str) -> GenResult<()>;
}

/// Reject absolute paths, parent references and empty segments.
pub fn ensure_relative(path: &str) -> GenResult<()> {
    let unsafe_path = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.contains(':')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if unsafe_path {
        return Err(GenError::UnsafePath {
            path: path.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Memory writer
// ============================================================================

/// Keeps files in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    files: BTreeMap<String, String>,
}

impl MemoryWriter {
    /// Create an empty writer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Content written at `path`
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// All files, sorted by path
    #[must_use]
    pub const fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }
}

impl OutputWriter for MemoryWriter {
    fn write(&mut self, path: &str, content: &str) -> GenResult<()> {
        ensure_relative(path)?;
        let _ = self.files.insert(path.to_string(), content.to_string());
        Ok(())
    }
}

// ============================================================================
// Directory writer
// ============================================================================

/// Writes files below a root directory, creating parent folders
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    root: PathBuf,
    written: usize,
}

impl DirectoryWriter {
    /// Create a writer for `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: 0,
        }
    }

    /// Output root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files written so far
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }
}

impl OutputWriter for DirectoryWriter {
    fn write(&mut self, path: &str, content: &str) -> GenResult<()> {
        ensure_relative(path)?;
        let target = path.split('/').fold(self.root.clone(), |acc, seg| acc.join(seg));
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GenError::writer(path, e))?;
        }
        std::fs::write(&target, content).map_err(|e| GenError::writer(path, e))?;
        self.written += 1;
        tracing::debug!(path, bytes = content.len(), "wrote file");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_paths_accepted() {
        assert!(ensure_relative("Pages/LoginPage.cs").is_ok());
        assert!(ensure_relative(".code-metadata").is_ok());
    }

    #[test]
    fn test_unsafe_paths_rejected() {
        for path in ["", "/etc/passwd", "../x.cs", "a/../../x", "a//b", "C:/x", "a\\b", "./a"] {
            let err = ensure_relative(path).unwrap_err();
            assert!(matches!(err, GenError::UnsafePath { .. }), "{path}");
        }
    }

    #[test]
    fn test_memory_writer() {
        let project = GeneratedProject {
            files: vec![
                OutputFile::new("b.cs", "b"),
                OutputFile::new("a/a.cs", "a"),
            ],
        };
        let mut writer = MemoryWriter::new();
        project.write_to(&mut writer).unwrap();
        assert_eq!(writer.get("a/a.cs"), Some("a"));
        assert_eq!(writer.files().len(), 2);
        assert_eq!(project.paths().collect::<Vec<_>>(), vec!["b.cs", "a/a.cs"]);
    }

    #[test]
    fn test_directory_writer_creates_parents() {
        let dir = TempDir::new().unwrap();
        let mut writer = DirectoryWriter::new(dir.path());
        writer.write("Pages/Admin/LoginPage.cs", "class").unwrap();
        let written = std::fs::read_to_string(dir.path().join("Pages/Admin/LoginPage.cs")).unwrap();
        assert_eq!(written, "class");
        assert_eq!(writer.written(), 1);
    }

    #[test]
    fn test_directory_writer_refuses_escape() {
        let dir = TempDir::new().unwrap();
        let mut writer = DirectoryWriter::new(dir.path().join("out"));
        assert!(writer.write("../evil.cs", "x").is_err());
        assert!(!dir.path().join("evil.cs").exists());
    }
}
