//! Output metadata file.
//!
//! Every run ends with `.code-metadata`, a pretty JSON document describing
//! the generated project: which tool and dialect produced it, where every
//! entity lives, and a Blake3 hash per generated file. The file carries no
//! timestamps, so regenerating an unchanged model is byte-identical.
//!
//! # Workflow
//!
//! 1. Generate → write the source tree plus `.code-metadata`
//! 2. Verify → re-hash every listed file and compare
//! 3. Modified or missing files are reported for regeneration

use crate::dialect::DialectKind;
use crate::metadata::MetadataEntry;
use crate::output::ensure_relative;
use crate::result::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the metadata file at the output root
pub const METADATA_FILE: &str = ".code-metadata";

/// Tool name recorded in the metadata file
pub const TOOL_NAME: &str = "testgen";

/// Contents of `.code-metadata`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMetadata {
    /// Version of the metadata format
    pub manifest_version: u32,
    /// How the output was produced
    pub generation: GenerationInfo,
    /// Every generated entity
    pub entities: Vec<EntityRecord>,
    /// Every generated file except this one
    pub files: Vec<FileRecord>,
}

/// Generation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInfo {
    /// Generator name
    pub tool: String,
    /// Generator version
    pub version: String,
    /// Output dialect
    pub dialect: DialectKind,
    /// Root namespace used
    pub root_namespace: String,
    /// Active environment, if the project declares any
    pub environment: Option<String>,
    /// Blake3 hash of the serialized input model
    pub input_hash: String,
    /// Result file the test runner produces
    pub test_result_file_name: String,
    /// Project files were generated
    pub full: bool,
}

/// Generated entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// Output metadata of the entity
    #[serde(flatten)]
    pub entry: MetadataEntry,
    /// Routine variants, one per data set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantRecord>,
}

/// Routine variant class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    /// Data set id
    pub data_set_id: String,
    /// Data set name
    pub data_set_name: String,
    /// Variant class name
    pub class_name: String,
}

/// Generated file and its content hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Path relative to the output root
    pub path: String,
    /// Blake3 hash of the content
    pub hash: String,
}

impl CodeMetadata {
    /// Current format version.
    pub const VERSION: u32 = 1;

    /// Serialize as pretty JSON with a trailing newline
    pub fn to_json(&self) -> GenResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Read the metadata file of an output directory.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, unparsable or has an unknown
    /// format version.
    pub fn read(root: &Path) -> GenResult<Self> {
        let path = root.join(METADATA_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| GenError::Manifest {
            path: root.display().to_string(),
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        let metadata: Self = serde_json::from_str(&json)?;
        if metadata.manifest_version != Self::VERSION {
            return Err(GenError::Manifest {
                path: root.display().to_string(),
                reason: format!(
                    "unsupported manifest version {} (expected {})",
                    metadata.manifest_version,
                    Self::VERSION
                ),
            });
        }
        Ok(metadata)
    }
}

/// Compute the Blake3 hash of file contents.
#[must_use]
pub fn hash_contents(contents: &str) -> String {
    hash_bytes(contents.as_bytes())
}

fn hash_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Outcome of [`verify_output`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Files listed in the metadata file
    pub checked: usize,
    /// Files whose hash no longer matches
    pub modified: Vec<String>,
    /// Files listed but absent
    pub missing: Vec<String>,
}

impl VerifyReport {
    /// Check whether every file matches
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.missing.is_empty()
    }
}

/// Re-hash an output directory against its metadata file.
///
/// # Errors
///
/// Returns error if the metadata file cannot be read, lists a path outside
/// `root`, or a listed file exists but cannot be read.
pub fn verify_output(root: &Path) -> GenResult<VerifyReport> {
    let metadata = CodeMetadata::read(root)?;
    let mut report = VerifyReport {
        checked: metadata.files.len(),
        ..VerifyReport::default()
    };
    for file in &metadata.files {
        ensure_relative(&file.path)?;
        let path = file.path.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg));
        match std::fs::read(&path) {
            Ok(bytes) => {
                if hash_bytes(&bytes) != file.hash {
                    report.modified.push(file.path.clone());
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                report.missing.push(file.path.clone());
            }
            Err(e) => return Err(GenError::writer(file.path.clone(), e)),
        }
    }
    tracing::info!(
        checked = report.checked,
        modified = report.modified.len(),
        missing = report.missing.len(),
        "verified output"
    );
    Ok(report)
}
