use super::{CsharpNunit, LAYOUT};
use crate::dialect::{line_comment, selector_text};
use crate::metadata::{OutputFileMetadata, OutputLayout};
use crate::model::LocatorKind;
use crate::naming::{escape_string_literal, indent, quote};
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

const PAGE: &str = "using Microsoft.Playwright;

namespace {{namespace}};

{{summary}}
public class {{class}}
{
\tprivate readonly IPage _page;

\tpublic {{class}}(IPage page)
\t{
\t\t_page = page;
\t}{{body}}
}
";

const TEST_CASE: &str = "{{usings}}

namespace {{namespace}};

{{summary}}
public class {{class}} : TestCaseBase
{
\tpublic {{class}}(IPage page)
\t\t: base(page)
\t{
\t}

\tpublic override async Task RunAsync()
\t{
{{body}}
\t}
}
";

const TEST_ROUTINE_CLASS: &str = "{{summary}}
public class {{class}} : TestCaseBase
{
\tpublic {{class}}(IPage page)
\t\t: base(page)
\t{
\t}

\tpublic override async Task RunAsync()
\t{
{{body}}
\t}
}";

const TEST_ROUTINE_FILE: &str = "{{usings}}

namespace {{namespace}};

{{classes}}
";

const TEST_SUITE: &str = "{{usings}}

namespace {{namespace}};

{{summary}}
[TestFixture]
public class {{class}} : TestSuiteBase
{
{{body}}
}
";

const TEST_METHOD: &str = "{{summary}}
[Test]
public async Task {{method}}()
{
\tawait new {{class}}(Page).RunAsync();
}";

const PAGE_DEFINITIONS: &str = "{{usings}}

namespace {{namespace}};

/// <summary>
/// Entry point to every page object of the project.
/// </summary>
public class PageDefinitions
{
\tpublic PageDefinitions(IPage page)
\t{
{{initializations}}
\t}{{properties}}
}
";

const ENVIRONMENT_SETTINGS: &str = "namespace {{namespace}};

{{summary}}
public static class EnvironmentSettings
{
{{settings}}
}
";

const LOCATOR_HELPER: &str = "namespace {{root}}.Support;

/// <summary>
/// Helpers used by generated test code.
/// </summary>
public static class LocatorHelper
{
\t/// <summary>
\t/// Attribute name of a <c>name=value</c> pair.
\t/// </summary>
\tpublic static string AttributeName(string nameValue)
\t{
\t\tvar index = nameValue.IndexOf('=');
\t\treturn index < 0 ? nameValue.Trim() : nameValue[..index].Trim();
\t}

\t/// <summary>
\t/// Attribute value of a <c>name=value</c> pair.
\t/// </summary>
\tpublic static string AttributeValue(string nameValue)
\t{
\t\tvar index = nameValue.IndexOf('=');
\t\treturn index < 0 ? string.Empty : nameValue[(index + 1)..];
\t}
}
";

const TEST_CASE_BASE: &str = "using Microsoft.Playwright;

namespace {{root}}.Support;

/// <summary>
/// Base class of generated test cases and test routine variants.
/// </summary>
public abstract class TestCaseBase
{
\tprivate IPage? _openerPage;

\tprotected TestCaseBase(IPage page)
\t{
\t\tPage = page;
\t\tdefs = new PageDefinitions(page);
\t}

\t/// <summary>
\t/// Page the test currently acts on.
\t/// </summary>
\tprotected IPage Page { get; private set; }

\t/// <summary>
\t/// Page objects bound to <see cref=\"Page\"/>.
\t/// </summary>
\tprotected PageDefinitions defs { get; private set; }

\t/// <summary>
\t/// Runs the test steps.
\t/// </summary>
\tpublic abstract Task RunAsync();

\tprotected async Task SwitchToPopupAsync(Func<Task> action)
\t{
\t\tvar popup = await Page.Context.RunAndWaitForPageAsync(action);
\t\tawait popup.WaitForLoadStateAsync();
\t\t_openerPage ??= Page;
\t\tPage = popup;
\t\tdefs = new PageDefinitions(popup);
\t}

\tprotected async Task ClosePopupAsync()
\t{
\t\tif (_openerPage is null)
\t\t{
\t\t\treturn;
\t\t}

\t\tawait Page.CloseAsync();
\t\tPage = _openerPage;
\t\tdefs = new PageDefinitions(_openerPage);
\t\t_openerPage = null;
\t}
}
";

const TEST_SUITE_BASE: &str = "using Microsoft.Playwright.NUnit;
using NUnit.Framework;

namespace {{root}}.Support;

/// <summary>
/// Base class of generated test suites.
/// </summary>
public abstract class TestSuiteBase : PageTest
{
\t[SetUp]
\tpublic void UseTestIdAttribute()
\t{
\t\tPlaywright.Selectors.SetTestIdAttribute(\"{{testIdAttribute}}\");
\t}
}
";

const CSPROJ: &str = "<Project Sdk=\"Microsoft.NET.Sdk\">

  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <IsPackable>false</IsPackable>
    <RootNamespace>{{root}}</RootNamespace>
    <RunSettingsFilePath>$(MSBuildProjectDirectory)/.runsettings</RunSettingsFilePath>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include=\"Microsoft.NET.Test.Sdk\" Version=\"17.10.0\" />
    <PackageReference Include=\"Microsoft.Playwright.NUnit\" Version=\"1.45.0\" />
    <PackageReference Include=\"NUnit\" Version=\"4.1.0\" />
    <PackageReference Include=\"NUnit3TestAdapter\" Version=\"4.5.0\" />
  </ItemGroup>

</Project>
";

const RUN_SETTINGS: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>
<RunSettings>
  <Playwright>
    <BrowserName>chromium</BrowserName>
    <LaunchOptions>
      <Headless>true</Headless>
    </LaunchOptions>
  </Playwright>
</RunSettings>
";

// ============================================================================
// Helpers
// ============================================================================

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// `/// <summary>` block, empty for blank descriptions
fn summary(description: &str) -> String {
    if description.trim().is_empty() {
        return String::new();
    }
    let mut lines = vec!["/// <summary>".to_string()];
    lines.extend(
        description
            .lines()
            .map(|line| format!("/// {}", xml_escape(line.trim_end())).trim_end().to_string()),
    );
    lines.push("/// </summary>".to_string());
    lines.join("\n")
}

fn usings(fixed: &[String], imports: &str) -> String {
    fixed
        .iter()
        .map(String::as_str)
        .chain(imports.lines().filter(|line| !line.trim().is_empty()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn case_usings(ctx: &ProjectContext<'_>) -> Vec<String> {
    vec![
        "using Microsoft.Playwright;".to_string(),
        format!("using {}.Support;", ctx.root_namespace),
        "using static Microsoft.Playwright.Assertions;".to_string(),
    ]
}

/// Prefix a non-empty section with a blank line
fn section(text: &str) -> String {
    if text.trim().is_empty() {
        String::new()
    } else {
        format!("\n\n{text}")
    }
}

fn locator_expression(kind: LocatorKind, locator: &str, parameter_count: usize) -> String {
    let (method, text) = match selector_text(kind, locator) {
        Some(selector) if kind.is_frame() => ("FrameLocator", selector),
        Some(selector) => ("Locator", selector),
        None => {
            let method = match kind {
                LocatorKind::Label => "GetByLabel",
                LocatorKind::Placeholder => "GetByPlaceholder",
                LocatorKind::TestId => "GetByTestId",
                LocatorKind::Title => "GetByTitle",
                LocatorKind::AltText => "GetByAltText",
                _ => "GetByText",
            };
            (method, locator.to_string())
        }
    };
    let argument = if parameter_count == 0 {
        quote(&text)
    } else {
        let params: Vec<String> = (0..parameter_count).map(|i| format!("p{i}")).collect();
        format!("string.Format({}, {})", quote(&text), params.join(", "))
    };
    format!("_page.{method}({argument})")
}

fn powershell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

// ============================================================================
// Provider
// ============================================================================

impl TemplateProvider for CsharpNunit {
    fn layout(&self) -> &OutputLayout {
        &LAYOUT
    }

    fn test_result_file_name(&self) -> &'static str {
        "test-result.trx"
    }

    fn locator(&self, _ctx: &ProjectContext<'_>, fragment: &LocatorFragment<'_>) -> RenderResult {
        let return_type = if fragment.kind.is_frame() {
            "IFrameLocator"
        } else {
            "ILocator"
        };
        let params: Vec<String> = (0..fragment.parameter_count)
            .map(|i| format!("string p{i}"))
            .collect();
        let accessor = format!(
            "public {return_type} {}({}) => {};",
            fragment.accessor,
            params.join(", "),
            locator_expression(fragment.kind, fragment.locator, fragment.parameter_count)
        );
        let doc = summary(fragment.description);
        Ok(if doc.is_empty() {
            accessor
        } else {
            format!("{doc}\n{accessor}")
        })
    }

    fn comment(&self, text: &str) -> RenderResult {
        Ok(line_comment("//", text))
    }

    fn page(&self, ctx: &ProjectContext<'_>, fragment: &PageFragment<'_>) -> RenderResult {
        Ok(fill(
            PAGE,
            ctx.indent,
            &[
                ("namespace", &fragment.file.output_file_full_namespace),
                ("class", &fragment.file.output_file_class_name),
                ("summary", &summary(fragment.description)),
                ("body", &section(fragment.body)),
            ],
        ))
    }

    fn import(
        &self,
        from: &OutputFileMetadata,
        target: &OutputFileMetadata,
        _symbols: &[&str],
    ) -> RenderResult {
        if from.output_file_full_namespace == target.output_file_full_namespace {
            return Ok(String::new());
        }
        Ok(format!("using {};", target.output_file_full_namespace))
    }

    fn page_definition_property(&self, page: &OutputFileMetadata) -> RenderResult {
        let class = &page.output_file_class_name;
        Ok(format!("public {class} {class} {{ get; }}"))
    }

    fn page_definition_init(&self, page: &OutputFileMetadata) -> RenderResult {
        let class = &page.output_file_class_name;
        Ok(format!("{class} = new {class}(page);"))
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
                (
                    "usings",
                    &usings(&["using Microsoft.Playwright;".to_string()], fragment.imports),
                ),
                ("namespace", &fragment.file.output_file_full_namespace),
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
                ("summary", &summary(fragment.description)),
                ("method", fragment.method_name),
                ("class", &fragment.test_case.output_file_class_name),
            ],
        ))
    }

    fn test_case(&self, ctx: &ProjectContext<'_>, fragment: &TestCaseFragment<'_>) -> RenderResult {
        Ok(fill(
            TEST_CASE,
            ctx.indent,
            &[
                ("usings", &usings(&case_usings(ctx), fragment.imports)),
                ("namespace", &fragment.file.output_file_full_namespace),
                ("summary", &summary(fragment.description)),
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
        let fixed = vec![
            "using NUnit.Framework;".to_string(),
            format!("using {}.Support;", ctx.root_namespace),
        ];
        Ok(fill(
            TEST_SUITE,
            ctx.indent,
            &[
                ("usings", &usings(&fixed, fragment.imports)),
                ("namespace", &fragment.file.output_file_full_namespace),
                ("summary", &summary(fragment.description)),
                ("class", &fragment.file.output_file_class_name),
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
                ("summary", &summary(&description)),
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
            line_comment(
                "//",
                &format!(
                    "Test routine {} has no data sets yet.",
                    fragment.file.output_file_class_name
                ),
            )
        } else {
            fragment.classes.join("\n\n")
        };
        Ok(fill(
            TEST_ROUTINE_FILE,
            ctx.indent,
            &[
                ("usings", &usings(&case_usings(ctx), fragment.imports)),
                ("namespace", &fragment.file.output_file_full_namespace),
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
                    "{}public static string {} => System.Environment.GetEnvironmentVariable({}) ?? {};",
                    ctx.indent,
                    s.property,
                    quote(&s.property),
                    quote(&s.default_value)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(fill(
            ENVIRONMENT_SETTINGS,
            ctx.indent,
            &[
                ("namespace", &fragment.file.output_file_full_namespace),
                (
                    "summary",
                    &summary(&format!(
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
                .map(|(name, value)| format!("$env:{name} = {}", powershell_quote(value))),
        );
        Ok(lines.join("\n") + "\n")
    }

    fn support_files(&self, ctx: &ProjectContext<'_>) -> Result<Vec<OutputFile>, RenderError> {
        let attribute = escape_string_literal(ctx.test_id_attribute);
        let values = [
            ("root", ctx.root_namespace),
            ("testIdAttribute", attribute.as_str()),
        ];
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
        let mut global_usings = vec![
            "global using Microsoft.Playwright;".to_string(),
            "global using NUnit.Framework;".to_string(),
            format!("global using {}.Support;", ctx.root_namespace),
        ];
        if ctx.has_routines {
            global_usings.push(format!("global using {}.TestRoutines;", ctx.root_namespace));
        }
        Ok(vec![
            OutputFile::new(
                format!("{}.csproj", ctx.root_namespace),
                fill(CSPROJ, ctx.indent, &[("root", ctx.root_namespace)]),
            ),
            OutputFile::new(
                format!("Usings{}", LAYOUT.file_extension),
                global_usings.join("\n") + "\n",
            ),
            OutputFile::new(".runsettings", RUN_SETTINGS),
        ])
    }
}
