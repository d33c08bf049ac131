//! Error types for code generation.
//!
//! Every failure inside the engine is fatal for the run: the first error is
//! returned and nothing is handed to the output writer.

use thiserror::Error;

/// Result type for generation operations
pub type GenResult<T> = Result<T, GenError>;

/// Result type for template fragments
pub type RenderResult = Result<String, RenderError>;

/// Errors that can occur while generating an output project
#[derive(Debug, Error)]
pub enum GenError {
    /// The project model is inconsistent
    #[error("Model integrity error: {0}")]
    ModelIntegrity(#[from] IntegrityError),

    /// A template provider failed to render a fragment
    #[error(transparent)]
    Rendering(#[from] RenderError),

    /// An entity id was looked up but never assigned output metadata
    #[error("No output metadata for entity '{id}'")]
    MissingMetadata {
        /// Entity id
        id: String,
    },

    /// Output path is absolute or leaves the output root
    #[error("Output path '{path}' escapes the output root")]
    UnsafePath {
        /// Offending path
        path: String,
    },

    /// Writer failed to persist a file
    #[error("Failed to write '{path}': {source}")]
    Writer {
        /// Relative output path
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Manifest could not be read or does not match the output
    #[error("Manifest error for '{path}': {reason}")]
    Manifest {
        /// Path to the output root or file
        path: String,
        /// Why the manifest was rejected
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenError {
    /// Create a missing metadata error
    #[must_use]
    pub fn missing_metadata(id: impl Into<String>) -> Self {
        Self::MissingMetadata { id: id.into() }
    }

    /// Create a writer error
    #[must_use]
    pub fn writer(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Writer {
            path: path.into(),
            source,
        }
    }

    /// Check whether this error came from an inconsistent model
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::ModelIntegrity(_))
    }
}

/// A template provider could not produce a fragment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Rendering of {fragment} failed: {message}")]
pub struct RenderError {
    /// Fragment kind (e.g. "page", "locator")
    pub fragment: String,
    /// Failure detail
    pub message: String,
}

impl RenderError {
    /// Create a render error for a fragment kind
    #[must_use]
    pub fn new(fragment: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            message: message.into(),
        }
    }
}

/// Inconsistencies in the source project model
///
/// `origin` fields name the step being rendered, e.g.
/// `test case 'Login' step 3`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// Two entities share one id
    #[error("duplicate entity id '{id}'")]
    DuplicateId {
        /// Shared id
        id: String,
    },

    /// Suite references a test case that does not exist
    #[error("test suite '{suite}' references unknown test case '{id}'")]
    UnknownTestCase {
        /// Suite name
        suite: String,
        /// Missing test case id
        id: String,
    },

    /// Step references a page that does not exist
    #[error("{origin}: unknown page '{id}'")]
    UnknownPage {
        /// Step location
        origin: String,
        /// Missing page id
        id: String,
    },

    /// Step references an element missing from its page
    #[error("{origin}: page '{page}' has no element '{id}'")]
    UnknownElement {
        /// Step location
        origin: String,
        /// Page name
        page: String,
        /// Missing element id
        id: String,
    },

    /// Action needs an element but the step has none
    #[error("{origin}: action {action} requires a page element")]
    ElementRequired {
        /// Step location
        origin: String,
        /// Action name
        action: String,
    },

    /// Data-driven step lacks a value for a declared data set
    #[error("test routine '{routine}' step {step}: no value for data set '{data_set}'")]
    MissingDataSetValue {
        /// Routine name
        routine: String,
        /// 1-based step number
        step: usize,
        /// Data set name
        data_set: String,
    },

    /// Data references a data set the routine does not declare
    #[error("test routine '{routine}': unknown data set '{data_set}'")]
    UnknownDataSet {
        /// Routine name
        routine: String,
        /// Data set name or id
        data_set: String,
    },

    /// Routine declares the same data set name twice
    #[error("test routine '{routine}' declares data set '{data_set}' more than once")]
    DuplicateDataSet {
        /// Routine name
        routine: String,
        /// Data set name
        data_set: String,
    },

    /// Per-data-set values used where no data sets exist
    #[error("{origin}: data-driven values are only allowed in test routines")]
    DataDrivenOutsideRoutine {
        /// Step location
        origin: String,
    },

    /// `RunTestRoutine` names a routine that does not exist
    #[error("{origin}: unknown test routine '{id}'")]
    UnknownTestRoutine {
        /// Step location
        origin: String,
        /// Missing routine id
        id: String,
    },

    /// A routine tries to run another routine
    #[error("{origin}: test routines cannot run other test routines")]
    NestedRoutineCall {
        /// Step location
        origin: String,
    },

    /// Step data does not fit the action
    #[error("{origin}: {message}")]
    InvalidStepData {
        /// Step location
        origin: String,
        /// What is wrong with the data
        message: String,
    },

    /// Requested environment is not declared
    #[error("unknown environment '{name}'")]
    UnknownEnvironment {
        /// Environment name
        name: String,
    },

    /// Environment reference names no declared setting
    #[error("{origin}: unknown environment setting '{name}'")]
    UnknownSetting {
        /// Step location
        origin: String,
        /// Setting name
        name: String,
    },

    /// Environment declares the same setting twice
    #[error("environment '{environment}' declares setting '{name}' more than once")]
    DuplicateSetting {
        /// Environment name
        environment: String,
        /// Setting name
        name: String,
    },

    /// Identifier collision the naming policy cannot resolve
    #[error("cannot derive a unique name for '{name}'")]
    UnresolvedCollision {
        /// Colliding identifier
        name: String,
    },

    /// Two generated files map to the same path
    #[error("output path '{path}' generated more than once")]
    DuplicateOutputPath {
        /// Colliding path
        path: String,
    },
}
