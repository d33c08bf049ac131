//! testgen: Playwright Test Source Generator
//!
//! Turns a declarative UI test project (pages of locators, test cases,
//! data-driven test routines, suites and environments) into compilable
//! Playwright test sources.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────┐   ┌───────────────┐   ┌────────────┐
//! │ Project     │──►│ Output Metadata  │──►│ CodeGenerator │──►│ Generated  │
//! │ (model)     │   │ (id → file/class)│   │ + Dialect     │   │ Project    │
//! └─────────────┘   └──────────────────┘   └───────┬───────┘   └─────┬──────┘
//!                                                  │                 │
//!                                    ┌─────────────┴──────┐   ┌──────▼──────┐
//!                                    │ dataset expansion  │   │ OutputWriter│
//!                                    │ action mapping     │   └─────────────┘
//!                                    └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use testgen::{generate, DialectKind, GenerateOptions, Project};
//!
//! let project = Project::default();
//! let output = generate(&project, DialectKind::PlaywrightTypescript, &GenerateOptions::default())?;
//! assert!(output.file(".code-metadata").is_some());
//! # Ok::<(), testgen::GenError>(())
//! ```

#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod action;
pub mod dataset;
pub mod dialect;
pub mod generator;
pub mod manifest;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod output;
mod result;
pub mod template;

pub use action::{ActionData, ActionKind, ActionSyntax, ElementRequirement};
pub use dataset::{expand, ExpandedDataSet};
pub use dialect::{CsharpNunit, Dialect, DialectKind, ParseDialectError, Typescript};
pub use generator::{generate, CodeGenerator, GenerateOptions};
pub use manifest::{verify_output, CodeMetadata, VerifyReport, METADATA_FILE};
pub use metadata::{EntityKind, OutputFileMetadata, OutputLayout, OutputProjectMetadata};
pub use model::{
    DataSet, Element, Environment, IndentStyle, LineEnding, LocatorKind, Page, PageElement,
    Project, ProjectSettings, Setting, Step, StepData, TestCase, TestRoutine, TestStep, TestSuite,
};
pub use output::{DirectoryWriter, GeneratedProject, MemoryWriter, OutputFile, OutputWriter};
pub use result::{GenError, GenResult, IntegrityError, RenderError, RenderResult};
pub use template::TemplateProvider;
