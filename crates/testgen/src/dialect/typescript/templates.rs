use super::{package_name, relative_module, Typescript, LAYOUT};
use crate::dialect::{line_comment, selector_text};
use crate::metadata::{OutputFileMetadata, OutputLayout};
use crate::model::LocatorKind;
use crate::naming::{escape_string_literal, indent, lower_case_first, quote};
use crate::output::OutputFile;
use crate::result::{RenderError, RenderResult};
use crate::template::{
    fill, EnvironmentSetterFragment, EnvironmentSettingsFragment, LocatorFragment,
    PageDefinitionsFragment, PageFragment, ProjectContext, TemplateProvider, TestCaseFragment,
    TestMethodFragment, TestRoutineClassFragment, TestRoutineFileFragment, TestSuiteFragment,
};

// ============================================================================
// Templates
// ============================================================================

const PAGE: &str = "import type { FrameLocator, Locator, Page } from \"@playwright/test\";
import { format } from \"{{support}}/LocatorHelper\";

{{doc}}
export class {{class}} {
\tconstructor(private readonly page: Page) {}{{body}}
}
";

const LOCATOR: &str = "{{doc}}
{{accessor}}({{params}}): {{type}} {
\treturn {{expression}};
}";

const TEST_CASE: &str = "{{imports}}

{{doc}}
export class {{class}} extends TestCaseBase {
\tasync run(): Promise<void> {
{{body}}
\t}
}
";

const TEST_ROUTINE_CLASS: &str = "{{doc}}
export class {{class}} extends TestCaseBase {
\tasync run(): Promise<void> {
{{body}}
\t}
}";

const TEST_ROUTINE_FILE: &str = "{{imports}}

{{classes}}
";

const TEST_SUITE: &str = "{{imports}}

{{doc}}
test.describe({{title}}, () => {
{{body}}
});
";

const TEST_METHOD: &str = "{{doc}}
test({{title}}, async ({ page }) => {
\tawait new {{class}}(page).run();
});";

const PAGE_DEFINITIONS: &str = "import type { Page } from \"@playwright/test\";
{{imports}}

/**
 * Entry point to every page object of the project.
 */
export class PageDefinitions {
\tconstructor(page: Page) {
{{initializations}}
\t}{{properties}}
}
";

const ENVIRONMENT_SETTINGS: &str = "{{doc}}
export const EnvironmentSettings = {
{{settings}}
};
";

const LOCATOR_HELPER: &str = "/**
 * Replaces `{n}` placeholders with the matching argument.
 */
export function format(template: string, ...args: string[]): string {
\treturn template.replace(/\\{(\\d+)\\}/g, (match: string, index: string) => args[Number(index)] ?? match);
}

/** Attribute name of a `name=value` pair. */
export function attributeName(nameValue: string): string {
\tconst index = nameValue.indexOf(\"=\");
\treturn index < 0 ? nameValue.trim() : nameValue.slice(0, index).trim();
}

/** Attribute value of a `name=value` pair. */
export function attributeValue(nameValue: string): string {
\tconst index = nameValue.indexOf(\"=\");
\treturn index < 0 ? \"\" : nameValue.slice(index + 1);
}

export function escapeRegExp(text: string): string {
\treturn text.replace(/[.*+?^${}()|[\\]\\\\]/g, \"\\\\$&\");
}
";

const TEST_CASE_BASE: &str = "import type { Page } from \"@playwright/test\";
import { PageDefinitions } from \"../PageDefinitions\";

/**
 * Base class of generated test cases and test routine variants.
 */
export abstract class TestCaseBase {
\tprotected defs: PageDefinitions;
\tprivate openerPage: Page | undefined;

\tconstructor(protected page: Page) {
\t\tthis.defs = new PageDefinitions(page);
\t}

\t/** Runs the test steps. */
\tabstract run(): Promise<void>;

\tprotected async switchToPopup(action: () => Promise<unknown>): Promise<void> {
\t\tconst [popup] = await Promise.all([this.page.context().waitForEvent(\"page\"), action()]);
\t\tawait popup.waitForLoadState();
\t\tthis.openerPage ??= this.page;
\t\tthis.page = popup;
\t\tthis.defs = new PageDefinitions(popup);
\t}

\tprotected async closePopup(): Promise<void> {
\t\tif (this.openerPage === undefined) {
\t\t\treturn;
\t\t}

\t\tawait this.page.close();
\t\tthis.page = this.openerPage;
\t\tthis.defs = new PageDefinitions(this.openerPage);
\t\tthis.openerPage = undefined;
\t}
}
";

const TEST_SUITE_BASE: &str = "import { test as base } from \"@playwright/test\";

/**
 * Playwright test with the project's test id attribute applied.
 */
export const test = base.extend<{ useTestIdAttribute: void }>({
\tuseTestIdAttribute: [
\t\tasync ({ playwright }, use) => {
\t\t\tplaywright.selectors.setTestIdAttribute(\"{{testIdAttribute}}\");
\t\t\tawait use();
\t\t},
\t\t{ auto: true },
\t],
});

export { expect } from \"@playwright/test\";
";

const PACKAGE_JSON: &str = "{
\t\"name\": \"{{package}}\",
\t\"version\": \"1.0.0\",
\t\"private\": true,
\t\"scripts\": {
\t\t\"test\": \"playwright test\"
\t},
\t\"devDependencies\": {
\t\t\"@playwright/test\": \"^1.45.0\",
\t\t\"@types/node\": \"^20.14.0\",
\t\t\"typescript\": \"^5.5.0\"
\t}
}
";

const PLAYWRIGHT_CONFIG: &str = "import { defineConfig } from \"@playwright/test\";

export default defineConfig({
\ttestDir: \"./test-suites\",
\ttestMatch: \"**/*.spec.ts\",
\treporter: [[\"html\", { outputFolder: \"test-result\", open: \"never\" }]],
\tuse: {
\t\ttestIdAttribute: \"{{testIdAttribute}}\",
\t},
});
";

const TSCONFIG: &str = "{
\t\"compilerOptions\": {
\t\t\"target\": \"ES2022\",
\t\t\"module\": \"commonjs\",
\t\t\"strict\": true,
\t\t\"esModuleInterop\": true,
\t\t\"skipLibCheck\": true,
\t\t\"noEmit\": true
\t}
}
";

// ============================================================================
// Helpers
// ============================================================================

/// JSDoc block, empty for blank descriptions
fn jsdoc(description: &str) -> String {
    let lines: Vec<String> = description
        .trim()
        .lines()
        .map(|line| line.trim_end().replace("*/", "*\\/"))
        .collect();
    match lines.as_slice() {
        [] => String::new(),
        [single] => format!("/** {single} */"),
        _ => {
            let mut out = vec!["/**".to_string()];
            out.extend(lines.iter().map(|line| {
                if line.is_empty() {
                    " *".to_string()
                } else {
                    format!(" * {line}")
                }
            }));
            out.push(" */".to_string());
            out.join("\n")
        }
    }
}

/// Prefix a non-empty section with a blank line
fn section(text: &str) -> String {
    if text.trim().is_empty() {
        String::new()
    } else {
        format!("\n\n{text}")
    }
}

fn import_lines(fixed: &[String], imports: &str) -> String {
    fixed
        .iter()
        .map(String::as_str)
        .chain(imports.lines().filter(|line| !line.trim().is_empty()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn case_imports(file: &OutputFileMetadata) -> Vec<String> {
    let path = &file.output_file_rel_path;
    vec![
        "import { expect } from \"@playwright/test\";".to_string(),
        format!(
            "import {{ EnvironmentSettings }} from {};",
            quote(&relative_module(path, "EnvironmentSettings"))
        ),
        format!(
            "import {{ attributeName, attributeValue, escapeRegExp }} from {};",
            quote(&relative_module(path, "support/LocatorHelper"))
        ),
        format!(
            "import {{ TestCaseBase }} from {};",
            quote(&relative_module(path, "support/TestCaseBase"))
        ),
    ]
}

fn locator_expression(kind: LocatorKind, locator: &str, parameter_count: usize) -> String {
    let (method, text) = match selector_text(kind, locator) {
        Some(selector) if kind.is_frame() => ("frameLocator", selector),
        Some(selector) => ("locator", selector),
        None => {
            let method = match kind {
                LocatorKind::Label => "getByLabel",
                LocatorKind::Placeholder => "getByPlaceholder",
                LocatorKind::TestId => "getByTestId",
                LocatorKind::Title => "getByTitle",
                LocatorKind::AltText => "getByAltText",
                _ => "getByText",
            };
            (method, locator.to_string())
        }
    };
    let argument = if parameter_count == 0 {
        quote(&text)
    } else {
        let params: Vec<String> = (0..parameter_count).map(|i| format!("p{i}")).collect();
        format!("format({}, {})", quote(&text), params.join(", "))
    };
    format!("this.page.{method}({argument})")
}

// ============================================================================
// Provider
// ============================================================================

impl TemplateProvider for Typescript {
    fn layout(&self) -> &OutputLayout {
        &LAYOUT
    }

    fn test_result_file_name(&self) -> &'static str {
        "test-result/index.html"
    }

    fn locator(&self, ctx: &ProjectContext<'_>, fragment: &LocatorFragment<'_>) -> RenderResult {
        let return_type = if fragment.kind.is_frame() {
            "FrameLocator"
        } else {
            "Locator"
        };
        let params: Vec<String> = (0..fragment.parameter_count)
            .map(|i| format!("p{i}: string"))
            .collect();
        Ok(fill(
            LOCATOR,
            ctx.indent,
            &[
                ("doc", &jsdoc(fragment.description)),
                ("accessor", &lower_case_first(fragment.accessor)),
                ("params", &params.join(", ")),
                ("type", return_type),
                (
                    "expression",
                    &locator_expression(fragment.kind, fragment.locator, fragment.parameter_count),
                ),
            ],
        ))
    }

    fn comment(&self, text: &str) -> RenderResult {
        Ok(line_comment("//", text))
    }

    fn page(&self, ctx: &ProjectContext<'_>, fragment: &PageFragment<'_>) -> RenderResult {
        Ok(fill(
            PAGE,
            ctx.indent,
            &[
                (
                    "support",
                    &relative_module(&fragment.file.output_file_rel_path, LAYOUT.support_folder),
                ),
                ("doc", &jsdoc(fragment.description)),
                ("class", &fragment.file.output_file_class_name),
                ("body", &section(fragment.body)),
            ],
        ))
    }

    fn import(
        &self,
        from: &OutputFileMetadata,
        target: &OutputFileMetadata,
        symbols: &[&str],
    ) -> RenderResult {
        if from.output_file_full_namespace == target.output_file_full_namespace {
            return Ok(String::new());
        }
        if symbols.is_empty() {
            return Err(RenderError::new(
                "import",
                format!("no symbols to import from '{}'", target.output_file_full_namespace),
            ));
        }
        Ok(format!(
            "import {{ {} }} from {};",
            symbols.join(", "),
            quote(&relative_module(
                &from.output_file_rel_path,
                &target.output_file_full_namespace
            ))
        ))
    }

    fn page_definition_property(&self, page: &OutputFileMetadata) -> RenderResult {
        let class = &page.output_file_class_name;
        Ok(format!("readonly {}: {class};", lower_case_first(class)))
    }

    fn page_definition_init(&self, page: &OutputFileMetadata) -> RenderResult {
        let class = &page.output_file_class_name;
        Ok(format!("this.{} = new {class}(page);", lower_case_first(class)))
    }

    fn page_definitions(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &PageDefinitionsFragment<'_>,
    ) -> RenderResult {
        Ok(fill(
            PAGE_DEFINITIONS,
            ctx.indent,
            &[
                ("imports", &import_lines(&[], fragment.imports)),
                ("initializations", fragment.initializations),
                ("properties", &section(fragment.properties)),
            ],
        ))
    }

    fn test_method(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &TestMethodFragment<'_>,
    ) -> RenderResult {
        Ok(fill(
            TEST_METHOD,
            ctx.indent,
            &[
                ("doc", &jsdoc(fragment.description)),
                ("title", &quote(fragment.method_name)),
                ("class", &fragment.test_case.output_file_class_name),
            ],
        ))
    }

    fn test_case(&self, ctx: &ProjectContext<'_>, fragment: &TestCaseFragment<'_>) -> RenderResult {
        Ok(fill(
            TEST_CASE,
            ctx.indent,
            &[
                (
                    "imports",
                    &import_lines(&case_imports(fragment.file), fragment.imports),
                ),
                ("doc", &jsdoc(fragment.description)),
                ("class", &fragment.file.output_file_class_name),
                ("body", &indent(fragment.body, ctx.indent, 1)),
            ],
        ))
    }

    fn test_suite(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &TestSuiteFragment<'_>,
    ) -> RenderResult {
        let fixed = vec![format!(
            "import {{ test }} from {};",
            quote(&relative_module(
                &fragment.file.output_file_rel_path,
                "support/TestSuiteBase"
            ))
        )];
        let name = fragment
            .file
            .output_file_class_name
            .strip_suffix(LAYOUT.test_suites.class_suffix)
            .filter(|name| !name.is_empty())
            .unwrap_or(&fragment.file.output_file_class_name);
        Ok(fill(
            TEST_SUITE,
            ctx.indent,
            &[
                ("imports", &import_lines(&fixed, fragment.imports)),
                ("doc", &jsdoc(fragment.description)),
                ("title", &quote(name)),
                ("body", fragment.body),
            ],
        ))
    }

    fn test_routine_class(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &TestRoutineClassFragment<'_>,
    ) -> RenderResult {
        let mut description = fragment.description.trim_end().to_string();
        if !description.is_empty() {
            description.push('\n');
        }
        description.push_str(&format!("Data set: {}", fragment.data_set));
        if !fragment.data_set_description.trim().is_empty() {
            description.push_str(&format!(" ({})", fragment.data_set_description.trim()));
        }
        Ok(fill(
            TEST_ROUTINE_CLASS,
            ctx.indent,
            &[
                ("doc", &jsdoc(&description)),
                ("class", fragment.class_name),
                ("body", &indent(fragment.body, ctx.indent, 1)),
            ],
        ))
    }

    fn test_routine_file(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &TestRoutineFileFragment<'_>,
    ) -> RenderResult {
        let classes = if fragment.classes.is_empty() {
            format!(
                "{}\nexport {{}};",
                line_comment(
                    "//",
                    &format!(
                        "Test routine {} has no data sets yet.",
                        fragment.file.output_file_class_name
                    ),
                )
            )
        } else {
            fragment.classes.join("\n\n")
        };
        Ok(fill(
            TEST_ROUTINE_FILE,
            ctx.indent,
            &[
                (
                    "imports",
                    &import_lines(&case_imports(fragment.file), fragment.imports),
                ),
                ("classes", &classes),
            ],
        ))
    }

    fn environment_settings(
        &self,
        ctx: &ProjectContext<'_>,
        fragment: &EnvironmentSettingsFragment<'_>,
    ) -> RenderResult {
        let heading = if fragment.environment.is_empty() {
            "Environment settings.".to_string()
        } else {
            format!(
                "Environment settings, defaults from the '{}' environment.",
                fragment.environment
            )
        };
        let settings = fragment
            .settings
            .iter()
            .map(|s| {
                format!(
                    "{}{}: process.env.{} ?? {},",
                    ctx.indent,
                    s.property,
                    s.property,
                    quote(&s.default_value)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(fill(
            ENVIRONMENT_SETTINGS,
            ctx.indent,
            &[
                (
                    "doc",
                    &jsdoc(&format!(
                        "{heading}\nEvery value can be overridden by an environment variable of the same name."
                    )),
                ),
                ("settings", &settings),
            ],
        ))
    }

    fn environment_setter(&self, fragment: &EnvironmentSetterFragment<'_>) -> RenderResult {
        let mut lines = vec![format!(
            "# Sets the '{}' environment for the generated tests.",
            fragment.environment
        )];
        lines.extend(
            fragment
                .values
                .iter()
                .map(|(name, value)| format!("{name}={}", quote(value))),
        );
        Ok(lines.join("\n") + "\n")
    }

    fn support_files(&self, ctx: &ProjectContext<'_>) -> Result<Vec<OutputFile>, RenderError> {
        let attribute = escape_string_literal(ctx.test_id_attribute);
        let values = [("testIdAttribute", attribute.as_str())];
        let file = |class: &str, template: &str| {
            OutputFile::new(
                LAYOUT
                    .support_file(ctx.root_namespace, true, class)
                    .output_file_rel_path,
                fill(template, ctx.indent, &values),
            )
        };
        Ok(vec![
            file("LocatorHelper", LOCATOR_HELPER),
            file("TestCaseBase", TEST_CASE_BASE),
            file("TestSuiteBase", TEST_SUITE_BASE),
        ])
    }

    fn project_files(&self, ctx: &ProjectContext<'_>) -> Result<Vec<OutputFile>, RenderError> {
        let attribute = escape_string_literal(ctx.test_id_attribute);
        let package = package_name(ctx.name);
        Ok(vec![
            OutputFile::new(
                "package.json",
                fill(PACKAGE_JSON, ctx.indent, &[("package", &package)]),
            ),
            OutputFile::new(
                "playwright.config.ts",
                fill(PLAYWRIGHT_CONFIG, ctx.indent, &[("testIdAttribute", &attribute)]),
            ),
            OutputFile::new("tsconfig.json", fill(TSCONFIG, ctx.indent, &[])),
        ])
    }
}
