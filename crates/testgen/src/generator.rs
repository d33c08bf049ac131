//! Code generator: walks the project model and emits the output tree.
//!
//! Emission order:
//!
//! 1. `EnvironmentSettings` and one setter script per environment
//! 2. Pages
//! 3. Test cases
//! 4. Test routines (one class per data set)
//! 5. Test suites
//! 6. `PageDefinitions` and the support files
//! 7. Project files (full runs only)
//! 8. `.code-metadata`
//!
//! Everything is rendered into memory first. The first error aborts the
//! run and no file reaches a writer.

use crate::action::{
    environment_reference, render_step, ActionData, ActionKind, ElementRequirement,
    ElementTarget, RoutineCall, RoutineInvocation, StepContext,
};
use crate::dataset::{self, ExpandedDataSet};
use crate::dialect::{Dialect, DialectKind};
use crate::manifest::{
    hash_contents, CodeMetadata, EntityRecord, FileRecord, GenerationInfo, VariantRecord,
    METADATA_FILE, TOOL_NAME,
};
use crate::metadata::{root_namespace, EntityKind, OutputFileMetadata, OutputProjectMetadata};
use crate::model::{
    Element, LineEnding, Page, PageElement, Project, Step, StepData, TestStep,
};
use crate::naming::{
    identifier_or, indent, placeholder_count, NameRegistry, MAX_LOCATOR_PARAMETERS,
};
use crate::output::{ensure_relative, GeneratedProject, OutputFile};
use crate::result::{GenResult, IntegrityError};
use crate::template::{
    EnvironmentSetterFragment, EnvironmentSettingsFragment, LocatorFragment,
    PageDefinitionsFragment, PageFragment, ProjectContext, SettingFragment, TestCaseFragment,
    TestMethodFragment, TestRoutineClassFragment, TestRoutineFileFragment, TestSuiteFragment,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

// ============================================================================
// Options
// ============================================================================

/// Per-run options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Also emit build and runner configuration
    pub full: bool,
    /// Active environment; defaults to the first declared one
    pub environment: Option<String>,
}

impl GenerateOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit project files
    #[must_use]
    pub const fn with_full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    /// Select the active environment
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

/// Generate `project` in the given dialect.
///
/// # Errors
///
/// Returns the first integrity or rendering error; nothing is emitted.
pub fn generate(
    project: &Project,
    dialect: DialectKind,
    options: &GenerateOptions,
) -> GenResult<GeneratedProject> {
    CodeGenerator::new(project, dialect.dialect())?.generate(options)
}

// ============================================================================
// Generator
// ============================================================================

/// Generator bound to one project and one dialect
pub struct CodeGenerator<'a> {
    project: &'a Project,
    dialect: &'a dyn Dialect,
    metadata: OutputProjectMetadata,
    root_namespace: String,
    indent: String,
}

impl std::fmt::Debug for CodeGenerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator")
            .field("dialect", &self.dialect.kind())
            .field("root_namespace", &self.root_namespace)
            .field("entities", &self.metadata.len())
            .finish_non_exhaustive()
    }
}

impl<'a> CodeGenerator<'a> {
    /// Build the output metadata table for `project`.
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids or unresolvable name collisions.
    pub fn new(project: &'a Project, dialect: &'a dyn Dialect) -> GenResult<Self> {
        let root_namespace = root_namespace(
            &project.settings.root_namespace,
            &project.settings.name,
        );
        let metadata = OutputProjectMetadata::build(project, dialect.layout(), &root_namespace)?;
        Ok(Self {
            project,
            dialect,
            metadata,
            root_namespace,
            indent: project.settings.indent_unit(),
        })
    }

    /// Output metadata of this run
    #[must_use]
    pub const fn metadata(&self) -> &OutputProjectMetadata {
        &self.metadata
    }

    /// Sanitized root namespace
    #[must_use]
    pub fn root_namespace(&self) -> &str {
        &self.root_namespace
    }

    /// Render the complete output project.
    ///
    /// # Errors
    ///
    /// Returns the first integrity or rendering error.
    pub fn generate(&self, options: &GenerateOptions) -> GenResult<GeneratedProject> {
        let settings = &self.project.settings;
        let ctx = ProjectContext {
            name: &settings.name,
            root_namespace: &self.root_namespace,
            indent: &self.indent,
            test_id_attribute: &settings.test_id_attribute_name,
            has_routines: !self.project.test_routines.is_empty(),
        };
        let environments = EnvironmentTable::build(self.project, options.environment.as_deref())?;
        let variants = self.expand_routines()?;

        let mut run = Run {
            generator: self,
            ctx,
            environments: &environments,
            variants: &variants,
            emitter: Emitter::new(settings.line_ending),
        };
        run.environment_files()?;
        run.pages()?;
        run.test_cases()?;
        run.test_routines()?;
        run.test_suites()?;
        run.support_files()?;
        if options.full {
            run.project_files()?;
        }
        run.metadata_file(options, environments.active.as_deref())?;

        let files = run.emitter.files;
        info!(
            dialect = %self.dialect.kind(),
            files = files.len(),
            entities = self.metadata.len(),
            "generated output project"
        );
        Ok(GeneratedProject { files })
    }

    /// Expand every routine; variant class names are unique across every
    /// generated class.
    fn expand_routines(&self) -> GenResult<BTreeMap<&'a str, Vec<ExpandedDataSet<'a>>>> {
        let mut registry = NameRegistry::with_reserved(self.dialect.layout().reserved_class_names);
        for kind in [
            EntityKind::Page,
            EntityKind::TestCase,
            EntityKind::TestRoutine,
            EntityKind::TestSuite,
        ] {
            for entry in self.metadata.of_kind(kind) {
                registry.reserve(&entry.file.output_file_class_name);
            }
        }

        let mut expanded = BTreeMap::new();
        for routine in &self.project.test_routines {
            let base = &self.metadata.get(&routine.id)?.output_file_class_name;
            let mut variants = dataset::expand(routine, base)?;
            for variant in &mut variants {
                variant.class_name = registry.claim(&variant.class_name)?;
            }
            let _ = expanded.insert(routine.id.as_str(), variants);
        }
        Ok(expanded)
    }
}

// ============================================================================
// Environments
// ============================================================================

/// Settings across all environments, with defaults from the active one
#[derive(Debug, Default)]
struct EnvironmentTable {
    active: Option<String>,
    settings: Vec<SettingFragment>,
    properties: BTreeMap<String, String>,
}

impl EnvironmentTable {
    fn build(project: &Project, requested: Option<&str>) -> GenResult<Self> {
        let active = match requested {
            Some(name) => Some(project.environment(name).ok_or_else(|| {
                IntegrityError::UnknownEnvironment {
                    name: name.to_string(),
                }
            })?),
            None => project.environments.first(),
        };

        let mut table = Self {
            active: active.map(|env| env.name.clone()),
            ..Self::default()
        };
        let mut registry = NameRegistry::new();
        for environment in &project.environments {
            let mut declared = BTreeSet::new();
            for setting in &environment.settings {
                if !declared.insert(setting.name.as_str()) {
                    return Err(IntegrityError::DuplicateSetting {
                        environment: environment.name.clone(),
                        name: setting.name.clone(),
                    }
                    .into());
                }
                if table.properties.contains_key(&setting.name) {
                    continue;
                }
                let property = registry.claim(&identifier_or(&setting.name, "Setting"))?;
                let default_value = active
                    .and_then(|env| env.settings.iter().find(|s| s.name == setting.name))
                    .map(|s| s.value.clone())
                    .unwrap_or_default();
                let _ = table
                    .properties
                    .insert(setting.name.clone(), property.clone());
                table.settings.push(SettingFragment {
                    property,
                    default_value,
                });
            }
        }
        Ok(table)
    }

    fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

// ============================================================================
// Run state
// ============================================================================

struct Run<'g, 'a> {
    generator: &'g CodeGenerator<'a>,
    ctx: ProjectContext<'g>,
    environments: &'g EnvironmentTable,
    variants: &'g BTreeMap<&'a str, Vec<ExpandedDataSet<'a>>>,
    emitter: Emitter,
}

/// Where a step list lives, for messages and routine rules
#[derive(Debug, Clone, Copy)]
enum StepOwner<'s> {
    TestCase(&'s str),
    TestRoutine {
        routine: &'s str,
        data_set: &'s str,
    },
}

impl StepOwner<'_> {
    fn origin(self, index: usize) -> String {
        match self {
            Self::TestCase(name) => format!("test case '{name}' step {}", index + 1),
            Self::TestRoutine { routine, data_set } => {
                format!("test routine '{routine}' (data set '{data_set}') step {}", index + 1)
            }
        }
    }

    const fn is_routine(self) -> bool {
        matches!(self, Self::TestRoutine { .. })
    }
}

/// Imports a file needs, deduplicated, in first-use order
#[derive(Debug, Default)]
struct Imports {
    targets: Vec<(String, Vec<String>)>,
}

impl Imports {
    fn add(&mut self, target_id: &str, symbol: &str) {
        let index = match self.targets.iter().position(|(id, _)| id == target_id) {
            Some(index) => index,
            None => {
                self.targets.push((target_id.to_string(), Vec::new()));
                self.targets.len() - 1
            }
        };
        let symbols = &mut self.targets[index].1;
        if !symbols.iter().any(|s| s == symbol) {
            symbols.push(symbol.to_string());
        }
    }

    fn render(
        &self,
        generator: &CodeGenerator<'_>,
        from: &OutputFileMetadata,
    ) -> GenResult<String> {
        let mut lines: Vec<String> = Vec::new();
        for (id, symbols) in &self.targets {
            let target = generator.metadata.get(id)?;
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            let line = generator.dialect.import(from, target, &symbols)?;
            if !line.is_empty() && !lines.contains(&line) {
                lines.push(line);
            }
        }
        Ok(lines.join("\n"))
    }
}

impl<'g, 'a> Run<'g, 'a> {
    fn dialect(&self) -> &'a dyn Dialect {
        self.generator.dialect
    }

    fn project(&self) -> &'a Project {
        self.generator.project
    }

    fn unit(&self) -> &'g str {
        self.ctx.indent
    }

    // ------------------------------------------------------------------
    // Environments
    // ------------------------------------------------------------------

    fn environment_files(&mut self) -> GenResult<()> {
        let dialect = self.dialect();
        let layout = dialect.layout();
        let file =
            layout.support_file(&self.generator.root_namespace, false, "EnvironmentSettings");
        let content = dialect.environment_settings(
            &self.ctx,
            &EnvironmentSettingsFragment {
                file: &file,
                environment: self.environments.active.as_deref().unwrap_or_default(),
                settings: &self.environments.settings,
            },
        )?;
        self.emitter.emit(file.output_file_rel_path, content)?;

        let mut scripts = NameRegistry::new();
        for environment in &self.project().environments {
            let script = scripts.claim(&identifier_or(&environment.name, "Environment"))?;
            let values: Vec<(String, String)> = environment
                .settings
                .iter()
                .filter_map(|setting| {
                    self.environments
                        .property(&setting.name)
                        .map(|property| (property.to_string(), setting.value.clone()))
                })
                .collect();
            let content = dialect.environment_setter(&EnvironmentSetterFragment {
                environment: &environment.name,
                values: &values,
            })?;
            self.emitter.emit(
                format!(
                    "{}/{script}{}",
                    layout.environments_folder, layout.environment_script_extension
                ),
                content,
            )?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    fn pages(&mut self) -> GenResult<()> {
        for page in &self.project().pages {
            let content = self.render_page(page)?;
            let path = self.generator.metadata.get(&page.id)?.output_file_rel_path.clone();
            self.emitter.emit(path, content)?;
        }
        Ok(())
    }

    fn render_page(&self, page: &Page) -> GenResult<String> {
        let dialect = self.dialect();
        let file = self.generator.metadata.get(&page.id)?;
        let mut items = Vec::with_capacity(page.elements.len());
        for element in &page.elements {
            let item = match element {
                Element::PageElement(element) => dialect.locator(
                    &self.ctx,
                    &LocatorFragment {
                        accessor: self.generator.metadata.accessor(&page.id, &element.id)?,
                        kind: element.find_by,
                        locator: &element.locator,
                        description: &element.description,
                        parameter_count: locator_parameters(page, element)?,
                    },
                )?,
                Element::Comment(comment) => {
                    if !items.is_empty() {
                        items.push(String::new());
                    }
                    dialect.comment(&comment.comment)?
                }
            };
            items.push(item);
        }
        let body = indent(&items.join("\n\n"), self.unit(), 1);
        Ok(dialect.page(
            &self.ctx,
            &PageFragment {
                file,
                description: &page.description,
                body: &body,
            },
        )?)
    }

    // ------------------------------------------------------------------
    // Test cases and routines
    // ------------------------------------------------------------------

    fn test_cases(&mut self) -> GenResult<()> {
        for case in &self.project().test_cases {
            let file = self.generator.metadata.get(&case.id)?;
            let mut imports = Imports::default();
            let body = self.render_steps(
                StepOwner::TestCase(&case.name),
                &case.steps,
                None,
                &mut imports,
            )?;
            let imports = imports.render(self.generator, file)?;
            let content = self.dialect().test_case(
                &self.ctx,
                &TestCaseFragment {
                    file,
                    description: &case.description,
                    imports: &imports,
                    body: &body,
                },
            )?;
            self.emitter.emit(file.output_file_rel_path.clone(), content)?;
        }
        Ok(())
    }

    fn test_routines(&mut self) -> GenResult<()> {
        for routine in &self.project().test_routines {
            let file = self.generator.metadata.get(&routine.id)?;
            let variants = self
                .variants
                .get(routine.id.as_str())
                .map_or(&[][..], Vec::as_slice);
            let mut imports = Imports::default();
            let mut classes = Vec::with_capacity(variants.len());
            for variant in variants {
                let owner = StepOwner::TestRoutine {
                    routine: &routine.name,
                    data_set: variant.name(),
                };
                let body = self.render_steps(
                    owner,
                    &routine.steps,
                    Some(variant.values.as_slice()),
                    &mut imports,
                )?;
                classes.push(self.dialect().test_routine_class(
                    &self.ctx,
                    &TestRoutineClassFragment {
                        class_name: &variant.class_name,
                        description: &routine.description,
                        data_set: variant.name(),
                        data_set_description: variant.description(),
                        body: &body,
                    },
                )?);
            }
            let imports = imports.render(self.generator, file)?;
            let content = self.dialect().test_routine_file(
                &self.ctx,
                &TestRoutineFileFragment {
                    file,
                    description: &routine.description,
                    imports: &imports,
                    classes: &classes,
                },
            )?;
            self.emitter.emit(file.output_file_rel_path.clone(), content)?;
        }
        Ok(())
    }

    /// Render a step list, indented once.
    ///
    /// `values` holds the expanded per-step values of a routine variant.
    fn render_steps(
        &self,
        owner: StepOwner<'_>,
        steps: &[Step],
        values: Option<&[Option<&str>]>,
        imports: &mut Imports,
    ) -> GenResult<String> {
        let mut lines = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let line = match step {
                Step::Comment(comment) => self.dialect().step_comment(&comment.comment),
                Step::TestStep(step) => {
                    let value = values.and_then(|v| v.get(index).copied().flatten());
                    self.render_step(owner, index, step, value, imports)?
                }
            };
            lines.push(line);
        }
        Ok(indent(&lines.join("\n"), self.unit(), 1))
    }

    fn render_step(
        &self,
        owner: StepOwner<'_>,
        index: usize,
        step: &TestStep,
        expanded: Option<&str>,
        imports: &mut Imports,
    ) -> GenResult<String> {
        let origin = owner.origin(index);
        let raw = match (&step.data, expanded) {
            (_, Some(value)) => value,
            (StepData::Literal(value), None) => value.as_str(),
            (StepData::PerDataSet(_), None) => {
                return Err(IntegrityError::DataDrivenOutsideRoutine { origin }.into());
            }
        };

        let action = step.action;
        let data = if action.takes_raw_code() || action == ActionKind::RunTestRoutine {
            ActionData::Literal(raw.to_string())
        } else {
            self.action_data(&origin, raw)?
        };
        let target = if action.element_requirement() == ElementRequirement::Ignored {
            None
        } else {
            self.element_target(&origin, step)?
        };
        let routine = if action == ActionKind::RunTestRoutine {
            if owner.is_routine() {
                return Err(IntegrityError::NestedRoutineCall { origin }.into());
            }
            Some(self.routine_invocation(&origin, raw, &step.parameters, imports)?)
        } else {
            None
        };

        let ctx = StepContext {
            origin: &origin,
            target,
            data,
            raw,
            routine,
        };
        render_step(self.dialect().syntax(), action, &ctx)
    }

    fn action_data(&self, origin: &str, raw: &str) -> GenResult<ActionData> {
        match environment_reference(raw) {
            Some(name) => self
                .environments
                .property(name)
                .map(|property| ActionData::Environment(property.to_string()))
                .ok_or_else(|| {
                    IntegrityError::UnknownSetting {
                        origin: origin.to_string(),
                        name: name.to_string(),
                    }
                    .into()
                }),
            None => Ok(ActionData::Literal(raw.to_string())),
        }
    }

    fn element_target(&self, origin: &str, step: &TestStep) -> GenResult<Option<ElementTarget>> {
        let Some(element_id) = step.element_id() else {
            return Ok(None);
        };
        let page_id = step.page_id().unwrap_or_default();
        let page = self
            .project()
            .page(page_id)
            .ok_or_else(|| IntegrityError::UnknownPage {
                origin: origin.to_string(),
                id: page_id.to_string(),
            })?;
        let Some(Element::PageElement(element)) = page.element(element_id) else {
            return Err(IntegrityError::UnknownElement {
                origin: origin.to_string(),
                page: page.name.clone(),
                id: element_id.to_string(),
            }
            .into());
        };

        let expected = locator_parameters(page, element)?;
        if step.parameters.len() != expected {
            return Err(IntegrityError::InvalidStepData {
                origin: origin.to_string(),
                message: format!(
                    "element '{}' takes {expected} locator parameter(s), got {}",
                    element.name,
                    step.parameters.len()
                ),
            }
            .into());
        }
        let parameters = step
            .parameters
            .iter()
            .map(|p| self.action_data(origin, p))
            .collect::<GenResult<Vec<_>>>()?;

        let metadata = &self.generator.metadata;
        Ok(Some(ElementTarget {
            page: metadata.get(&page.id)?.output_file_class_name.clone(),
            element: metadata.accessor(&page.id, &element.id)?.to_string(),
            frame: element.find_by.is_frame(),
            parameters,
        }))
    }

    fn routine_invocation(
        &self,
        origin: &str,
        routine_id: &str,
        data_set_ids: &[String],
        imports: &mut Imports,
    ) -> GenResult<RoutineInvocation> {
        let routine_id = routine_id.trim();
        let routine = self
            .project()
            .test_routine(routine_id)
            .ok_or_else(|| IntegrityError::UnknownTestRoutine {
                origin: origin.to_string(),
                id: routine_id.to_string(),
            })?;
        let variants = self
            .variants
            .get(routine.id.as_str())
            .map_or(&[][..], Vec::as_slice);

        let selected: Vec<&ExpandedDataSet<'_>> = if data_set_ids.is_empty() {
            variants.iter().collect()
        } else {
            data_set_ids
                .iter()
                .map(|id| {
                    variants
                        .iter()
                        .find(|v| v.data_set.id == *id)
                        .ok_or_else(|| IntegrityError::UnknownDataSet {
                            routine: routine.name.clone(),
                            data_set: id.clone(),
                        })
                })
                .collect::<Result<_, _>>()?
        };

        for variant in &selected {
            imports.add(&routine.id, &variant.class_name);
        }
        Ok(RoutineInvocation {
            routine: routine.name.clone(),
            calls: selected
                .iter()
                .map(|variant| RoutineCall {
                    class_name: variant.class_name.clone(),
                })
                .collect(),
        })
    }

    // ------------------------------------------------------------------
    // Suites
    // ------------------------------------------------------------------

    fn test_suites(&mut self) -> GenResult<()> {
        for suite in &self.project().test_suites {
            let file = self.generator.metadata.get(&suite.id)?;
            let mut methods = NameRegistry::new();
            methods.reserve(&file.output_file_class_name);
            let mut imports = Imports::default();
            let mut rendered = Vec::with_capacity(suite.test_cases.len());
            for case_id in &suite.test_cases {
                let case = self.project().test_case(case_id).ok_or_else(|| {
                    IntegrityError::UnknownTestCase {
                        suite: suite.name.clone(),
                        id: case_id.clone(),
                    }
                })?;
                let case_file = self.generator.metadata.get(&case.id)?;
                imports.add(&case.id, &case_file.output_file_class_name);
                let method_name = methods.claim(&case_file.output_file_class_name)?;
                rendered.push(self.dialect().test_method(
                    &self.ctx,
                    &TestMethodFragment {
                        method_name: &method_name,
                        test_case: case_file,
                        description: &case.description,
                    },
                )?);
            }
            let body = indent(&rendered.join("\n\n"), self.unit(), 1);
            let imports = imports.render(self.generator, file)?;
            let content = self.dialect().test_suite(
                &self.ctx,
                &TestSuiteFragment {
                    file,
                    description: &suite.description,
                    imports: &imports,
                    body: &body,
                },
            )?;
            self.emitter.emit(file.output_file_rel_path.clone(), content)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Support, project and metadata files
    // ------------------------------------------------------------------

    fn support_files(&mut self) -> GenResult<()> {
        let dialect = self.dialect();
        let file = dialect
            .layout()
            .support_file(&self.generator.root_namespace, false, "PageDefinitions");
        let mut imports = Imports::default();
        let mut properties = Vec::new();
        let mut initializations = Vec::new();
        for entry in self.generator.metadata.of_kind(EntityKind::Page) {
            imports.add(&entry.id, &entry.file.output_file_class_name);
            properties.push(dialect.page_definition_property(&entry.file)?);
            initializations.push(dialect.page_definition_init(&entry.file)?);
        }
        let imports = imports.render(self.generator, &file)?;
        let content = dialect.page_definitions(
            &self.ctx,
            &PageDefinitionsFragment {
                file: &file,
                imports: &imports,
                properties: &indent(&properties.join("\n"), self.unit(), 1),
                initializations: &indent(&initializations.join("\n"), self.unit(), 2),
            },
        )?;
        self.emitter.emit(file.output_file_rel_path, content)?;

        for support in dialect.support_files(&self.ctx)? {
            self.emitter.emit(support.path, support.content)?;
        }
        Ok(())
    }

    fn project_files(&mut self) -> GenResult<()> {
        for file in self.dialect().project_files(&self.ctx)? {
            self.emitter.emit(file.path, file.content)?;
        }
        Ok(())
    }

    fn metadata_file(
        &mut self,
        options: &GenerateOptions,
        environment: Option<&str>,
    ) -> GenResult<()> {
        let generator = self.generator;
        let input = serde_json::to_vec(generator.project)?;
        let entities = generator
            .metadata
            .entries()
            .iter()
            .map(|entry| EntityRecord {
                entry: entry.clone(),
                variants: self
                    .variants
                    .get(entry.id.as_str())
                    .filter(|_| entry.kind == EntityKind::TestRoutine)
                    .map(|variants| {
                        variants
                            .iter()
                            .map(|v| VariantRecord {
                                data_set_id: v.data_set.id.clone(),
                                data_set_name: v.data_set.name.clone(),
                                class_name: v.class_name.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();
        let files = self
            .emitter
            .files
            .iter()
            .map(|file| FileRecord {
                path: file.path.clone(),
                hash: hash_contents(&file.content),
            })
            .collect();
        let manifest = CodeMetadata {
            manifest_version: CodeMetadata::VERSION,
            generation: GenerationInfo {
                tool: TOOL_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                dialect: generator.dialect.kind(),
                root_namespace: generator.root_namespace.clone(),
                environment: environment.map(str::to_string),
                input_hash: blake3::hash(&input).to_hex().to_string(),
                test_result_file_name: generator.dialect.test_result_file_name().to_string(),
                full: options.full,
            },
            entities,
            files,
        };
        self.emitter.emit(METADATA_FILE.to_string(), manifest.to_json()?)
    }
}

fn locator_parameters(page: &Page, element: &PageElement) -> GenResult<usize> {
    placeholder_count(&element.locator).ok_or_else(|| {
        IntegrityError::InvalidStepData {
            origin: format!("page '{}'", page.name),
            message: format!(
                "element '{}' uses a locator placeholder above {{{}}}",
                element.name,
                MAX_LOCATOR_PARAMETERS - 1
            ),
        }
        .into()
    })
}

// ============================================================================
// Emitter
// ============================================================================

/// Collects files, enforcing unique safe paths and the line ending
#[derive(Debug)]
struct Emitter {
    files: Vec<OutputFile>,
    seen: BTreeSet<String>,
    line_ending: LineEnding,
}

impl Emitter {
    fn new(line_ending: LineEnding) -> Self {
        Self {
            files: Vec::new(),
            seen: BTreeSet::new(),
            line_ending,
        }
    }

    fn emit(&mut self, path: String, content: String) -> GenResult<()> {
        ensure_relative(&path)?;
        if !self.seen.insert(path.to_lowercase()) {
            return Err(IntegrityError::DuplicateOutputPath { path }.into());
        }
        let content = match self.line_ending {
            LineEnding::Lf => content,
            LineEnding::Crlf => content.replace("\r\n", "\n").replace('\n', "\r\n"),
        };
        debug!(path = %path, bytes = content.len(), "rendered file");
        self.files.push(OutputFile::new(path, content));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{
        DataSet, Environment, LocatorKind, PageElement, Setting, StepComment, TestCase,
        TestRoutine, TestSuite,
    };
    use pretty_assertions::assert_eq;

    fn page(id: &str, name: &str, elements: Vec<Element>) -> Page {
        Page {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            folder: String::new(),
            elements,
        }
    }

    fn css(id: &str, name: &str, locator: &str) -> Element {
        Element::PageElement(PageElement {
            id: id.to_string(),
            name: name.to_string(),
            find_by: LocatorKind::Css,
            locator: locator.to_string(),
            description: String::new(),
        })
    }

    fn step(page: &str, element: &str, action: ActionKind, data: &str) -> Step {
        Step::TestStep(TestStep {
            id: String::new(),
            page: page.to_string(),
            element: element.to_string(),
            action,
            data: StepData::Literal(data.to_string()),
            parameters: vec![],
        })
    }

    fn case(id: &str, name: &str, steps: Vec<Step>) -> TestCase {
        TestCase {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            folder: String::new(),
            steps,
        }
    }

    fn fills_project() -> Project {
        let mut project = Project::default();
        project.settings.root_namespace = "Demo".to_string();
        project.pages = vec![page(
            "p1",
            "FillsScreen",
            vec![css("e1", "district", "[name='district']")],
        )];
        project.test_cases = vec![case(
            "tc1",
            "fills",
            vec![step("p1", "e1", ActionKind::Input, "ABC")],
        )];
        project
    }

    fn run(project: &Project) -> GenResult<GeneratedProject> {
        generate(project, DialectKind::PlaywrightCsharpNunit, &GenerateOptions::default())
    }

    #[test]
    fn test_fills_case_body() {
        let out = run(&fills_project()).unwrap();
        let case = out.file("TestCases/Fills.cs").unwrap();
        assert!(case
            .content
            .contains("        await defs.FillsScreenPage.District().FillAsync(\"ABC\");\n"));
        let page = out.file("Pages/FillsScreenPage.cs").unwrap();
        assert!(page.content.contains("_page.Locator(\"[name='district']\")"));
    }

    #[test]
    fn test_emission_order() {
        let mut project = fills_project();
        project.test_suites = vec![TestSuite {
            id: "s1".to_string(),
            name: "Smoke".to_string(),
            description: String::new(),
            folder: String::new(),
            test_cases: vec!["tc1".to_string()],
        }];
        let out = run(&project).unwrap();
        let paths: Vec<_> = out.paths().collect();
        assert_eq!(
            paths,
            vec![
                "EnvironmentSettings.cs",
                "Pages/FillsScreenPage.cs",
                "TestCases/Fills.cs",
                "TestSuites/SmokeSuite.cs",
                "PageDefinitions.cs",
                "Support/LocatorHelper.cs",
                "Support/TestCaseBase.cs",
                "Support/TestSuiteBase.cs",
                ".code-metadata",
            ]
        );
    }

    #[test]
    fn test_unknown_element_is_reported() {
        let mut project = fills_project();
        project.test_cases[0].steps = vec![step("p1", "e9", ActionKind::Click, "")];
        let err = run(&project).unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains("test case 'fills' step 1"));
        assert!(err.to_string().contains("no element 'e9'"));
    }

    #[test]
    fn test_comment_element_is_not_a_target() {
        let mut project = fills_project();
        project.pages[0].elements.push(Element::Comment(crate::model::CommentElement {
            id: "c1".to_string(),
            comment: "Address".to_string(),
        }));
        project.test_cases[0].steps = vec![step("p1", "c1", ActionKind::Click, "")];
        assert!(run(&project).is_err());
    }

    #[test]
    fn test_data_driven_outside_routine() {
        let mut project = fills_project();
        if let Step::TestStep(step) = &mut project.test_cases[0].steps[0] {
            step.data = StepData::PerDataSet(BTreeMap::from([("A".to_string(), "1".to_string())]));
        }
        let err = run(&project).unwrap_err();
        assert!(err.to_string().contains("only allowed in test routines"));
    }

    #[test]
    fn test_locator_parameter_count_checked() {
        let mut project = fills_project();
        project.pages[0].elements = vec![css("e1", "row", "tr:nth-child({0})")];
        let err = run(&project).unwrap_err();
        assert!(err.to_string().contains("takes 1 locator parameter(s), got 0"));

        if let Step::TestStep(step) = &mut project.test_cases[0].steps[0] {
            step.parameters = vec!["3".to_string()];
        }
        let out = run(&project).unwrap();
        assert!(out
            .file("TestCases/Fills.cs")
            .unwrap()
            .content
            .contains("defs.FillsScreenPage.Row(\"3\").FillAsync(\"ABC\")"));
    }

    #[test]
    fn test_environment_reference() {
        let mut project = fills_project();
        project.environments = vec![
            Environment {
                name: "local".to_string(),
                settings: vec![Setting {
                    name: "District".to_string(),
                    value: "North".to_string(),
                }],
            },
            Environment {
                name: "ci".to_string(),
                settings: vec![Setting {
                    name: "District".to_string(),
                    value: "South".to_string(),
                }],
            },
        ];
        project.test_cases[0].steps = vec![step("p1", "e1", ActionKind::Input, "${District}")];

        let options = GenerateOptions::new().with_environment("CI");
        let out = generate(&project, DialectKind::PlaywrightCsharpNunit, &options).unwrap();
        assert!(out
            .file("TestCases/Fills.cs")
            .unwrap()
            .content
            .contains("FillAsync(EnvironmentSettings.District)"));
        assert!(out
            .file("EnvironmentSettings.cs")
            .unwrap()
            .content
            .contains("?? \"South\";"));
        assert_eq!(
            out.file("Environments/Local.ps1").unwrap().content,
            "# Sets the 'local' environment for the generated tests.\n$env:District = 'North'\n"
        );

        project.test_cases[0].steps = vec![step("p1", "e1", ActionKind::Input, "${Missing}")];
        let err = run(&project).unwrap_err();
        assert!(err.to_string().contains("unknown environment setting 'Missing'"));

        let err = generate(
            &project,
            DialectKind::PlaywrightCsharpNunit,
            &GenerateOptions::new().with_environment("prod"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown environment 'prod'"));
    }

    #[test]
    fn test_duplicate_setting_in_environment() {
        let mut project = fills_project();
        let setting = Setting {
            name: "Url".to_string(),
            value: String::new(),
        };
        project.environments = vec![Environment {
            name: "local".to_string(),
            settings: vec![setting.clone(), setting],
        }];
        let err = run(&project).unwrap_err();
        assert!(err.to_string().contains("declares setting 'Url' more than once"));
    }

    fn routine_project() -> Project {
        let mut project = fills_project();
        let mut fill = step("p1", "e1", ActionKind::Input, "");
        if let Step::TestStep(s) = &mut fill {
            s.data = StepData::PerDataSet(BTreeMap::from([
                ("One".to_string(), "Joe".to_string()),
                ("Two".to_string(), "Jane".to_string()),
            ]));
        }
        project.test_routines = vec![TestRoutine {
            id: "r1".to_string(),
            name: "FillName".to_string(),
            description: String::new(),
            folder: String::new(),
            steps: vec![
                Step::Comment(StepComment {
                    id: String::new(),
                    comment: "Name".to_string(),
                }),
                fill,
            ],
            data_sets: vec![
                DataSet {
                    id: "ds1".to_string(),
                    name: "One".to_string(),
                    description: String::new(),
                },
                DataSet {
                    id: "ds2".to_string(),
                    name: "Two".to_string(),
                    description: String::new(),
                },
            ],
        }];
        project
    }

    #[test]
    fn test_run_test_routine_selects_data_sets() {
        let mut project = routine_project();
        let mut call = step("", "", ActionKind::RunTestRoutine, "r1");
        if let Step::TestStep(s) = &mut call {
            s.parameters = vec!["ds2".to_string()];
        }
        project.test_cases[0].steps.push(call);
        let out = run(&project).unwrap();
        let case = &out.file("TestCases/Fills.cs").unwrap().content;
        assert!(case.contains("using Demo.TestRoutines;"));
        assert!(case.contains("await new FillNameTwo(Page).RunAsync();"));
        assert!(!case.contains("FillNameOne"));

        let routines = &out.file("TestRoutines/FillName.cs").unwrap().content;
        assert!(routines.contains("public class FillNameOne : TestCaseBase"));
        assert!(routines.contains(
            "        // Name\n        await defs.FillsScreenPage.District().FillAsync(\"Jane\");"
        ));
    }

    #[test]
    fn test_run_test_routine_errors() {
        let mut project = routine_project();
        project.test_cases[0].steps = vec![step("", "", ActionKind::RunTestRoutine, "r9")];
        assert!(run(&project)
            .unwrap_err()
            .to_string()
            .contains("unknown test routine 'r9'"));

        let mut call = step("", "", ActionKind::RunTestRoutine, "r1");
        if let Step::TestStep(s) = &mut call {
            s.parameters = vec!["ds9".to_string()];
        }
        project.test_cases[0].steps = vec![call];
        assert!(run(&project)
            .unwrap_err()
            .to_string()
            .contains("unknown data set 'ds9'"));

        let mut project = routine_project();
        project.test_routines[0]
            .steps
            .push(step("", "", ActionKind::RunTestRoutine, "r1"));
        assert!(run(&project)
            .unwrap_err()
            .to_string()
            .contains("cannot run other test routines"));
    }

    #[test]
    fn test_variant_names_avoid_case_classes() {
        let mut project = routine_project();
        project.test_cases.push(case("tc2", "FillNameOne", vec![]));
        let out = run(&project).unwrap();
        let routines = &out.file("TestRoutines/FillName.cs").unwrap().content;
        assert!(routines.contains("public class FillNameOne2 : TestCaseBase"));
        assert!(routines.contains("public class FillNameTwo : TestCaseBase"));
    }

    #[test]
    fn test_suite_imports_deduplicated() {
        let mut project = fills_project();
        project.test_suites = vec![TestSuite {
            id: "s1".to_string(),
            name: "Smoke".to_string(),
            description: String::new(),
            folder: String::new(),
            test_cases: vec!["tc1".to_string(), "tc1".to_string()],
        }];
        let out = run(&project).unwrap();
        let suite = &out.file("TestSuites/SmokeSuite.cs").unwrap().content;
        assert_eq!(suite.matches("using Demo.TestCases;").count(), 1);
        assert!(suite.contains("public async Task Fills()"));
        assert!(suite.contains("public async Task Fills2()"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut project = fills_project();
        project.settings.line_ending = LineEnding::Crlf;
        let out = run(&project).unwrap();
        for file in &out.files {
            assert!(!file.content.replace("\r\n", "").contains('\n'), "{}", file.path);
        }
    }

    #[test]
    fn test_metadata_lists_files_and_variants() {
        let project = routine_project();
        let out = generate(
            &project,
            DialectKind::PlaywrightTypescript,
            &GenerateOptions::new().with_full(true),
        )
        .unwrap();
        let last = out.files.last().unwrap();
        assert_eq!(last.path, METADATA_FILE);
        let manifest: CodeMetadata = serde_json::from_str(&last.content).unwrap();
        assert_eq!(manifest.files.len(), out.len() - 1);
        assert!(manifest.generation.full);
        assert_eq!(manifest.generation.test_result_file_name, "test-result/index.html");
        let routine = manifest
            .entities
            .iter()
            .find(|e| e.entry.kind == EntityKind::TestRoutine)
            .unwrap();
        let names: Vec<_> = routine.variants.iter().map(|v| v.class_name.as_str()).collect();
        assert_eq!(names, vec!["FillNameOne", "FillNameTwo"]);
        assert!(out.file("package.json").is_some());
    }
}
