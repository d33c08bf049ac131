//! Playwright for .NET with NUnit.
//!
//! Output layout:
//!
//! ```text
//! EnvironmentSettings.cs
//! Environments/<Environment>.ps1
//! Pages/<Name>Page.cs
//! TestCases/<Name>.cs
//! TestRoutines/<Name>.cs        one class per data set
//! TestSuites/<Name>Suite.cs
//! PageDefinitions.cs
//! Support/{LocatorHelper,TestCaseBase,TestSuiteBase}.cs
//! <RootNamespace>.csproj, Usings.cs, .runsettings   (full runs)
//! .code-metadata
//! ```

mod actions;
mod templates;

use super::{Dialect, DialectKind};
use crate::action::ActionSyntax;
use crate::metadata::{KindLayout, NamespaceStyle, OutputLayout};

/// Playwright C# / NUnit dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct CsharpNunit;

pub(crate) const LAYOUT: OutputLayout = OutputLayout {
    file_extension: ".cs",
    namespace_style: NamespaceStyle::Dotted,
    pages: KindLayout {
        folder: "Pages",
        class_suffix: "Page",
        file_suffix: "",
    },
    test_cases: KindLayout {
        folder: "TestCases",
        class_suffix: "",
        file_suffix: "",
    },
    test_routines: KindLayout {
        folder: "TestRoutines",
        class_suffix: "",
        file_suffix: "",
    },
    test_suites: KindLayout {
        folder: "TestSuites",
        class_suffix: "Suite",
        file_suffix: "",
    },
    support_folder: "Support",
    environments_folder: "Environments",
    environment_script_extension: ".ps1",
    reserved_class_names: &[
        "EnvironmentSettings",
        "LocatorHelper",
        "PageDefinitions",
        "TestCaseBase",
        "TestSuiteBase",
        "Usings",
    ],
    reserved_member_names: &["Page"],
};

impl Dialect for CsharpNunit {
    fn kind(&self) -> DialectKind {
        DialectKind::PlaywrightCsharpNunit
    }

    fn syntax(&self) -> &dyn ActionSyntax {
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::action::{
        render_step, ActionData, ActionKind, ElementTarget, StepContext,
    };
    use crate::metadata::OutputFileMetadata;
    use crate::model::LocatorKind;
    use crate::template::{
        LocatorFragment, PageFragment, ProjectContext, TemplateProvider, TestMethodFragment,
    };
    use pretty_assertions::assert_eq;

    const CTX: ProjectContext<'static> = ProjectContext {
        name: "Demo",
        root_namespace: "Demo",
        indent: "    ",
        test_id_attribute: "data-testid",
        has_routines: true,
    };

    fn district() -> ElementTarget {
        ElementTarget {
            page: "FillsScreenPage".to_string(),
            element: "District".to_string(),
            frame: false,
            parameters: vec![],
        }
    }

    fn render(kind: ActionKind, target: Option<ElementTarget>, data: &str) -> String {
        let ctx = StepContext {
            origin: "test",
            target,
            data: ActionData::Literal(data.to_string()),
            raw: data,
            routine: None,
        };
        render_step(&CsharpNunit, kind, &ctx).unwrap()
    }

    #[test]
    fn test_input_line() {
        assert_eq!(
            render(ActionKind::Input, Some(district()), "ABC"),
            "await defs.FillsScreenPage.District().FillAsync(\"ABC\");"
        );
    }

    #[test]
    fn test_select_option_from_setting() {
        let ctx = StepContext {
            origin: "test",
            target: Some(district()),
            data: ActionData::Environment("TestUser".to_string()),
            raw: "${TestUser}",
            routine: None,
        };
        assert_eq!(
            render_step(&CsharpNunit, ActionKind::SelectOption, &ctx).unwrap(),
            "await defs.FillsScreenPage.District().SelectOptionAsync(EnvironmentSettings.TestUser);"
        );
    }

    #[test]
    fn test_global_actions() {
        assert_eq!(
            render(ActionKind::GoToUrl, None, "http://localhost:3000/routines/fills.html"),
            "await Page.GotoAsync(\"http://localhost:3000/routines/fills.html\");"
        );
        assert_eq!(render(ActionKind::Delay, None, "2000"), "await Task.Delay(2000);");
        assert_eq!(
            render(ActionKind::VerifyTitle, None, "TRZ"),
            "await Expect(Page).ToHaveTitleAsync(\"TRZ\");"
        );
        assert_eq!(render(ActionKind::ClosePopup, None, ""), "await ClosePopupAsync();");
    }

    #[test]
    fn test_verify_attribute_literal() {
        assert_eq!(
            render(ActionKind::VerifyAttribute, Some(district()), "ABC=DEF"),
            "await Expect(defs.FillsScreenPage.District()).ToHaveAttributeAsync(\"ABC\", \"DEF\");"
        );
    }

    #[test]
    fn test_parameterized_element_expression() {
        let mut target = district();
        target.parameters = vec![
            ActionData::Literal("2".to_string()),
            ActionData::Environment("Row".to_string()),
        ];
        assert_eq!(
            render(ActionKind::Click, Some(target), ""),
            "await defs.FillsScreenPage.District(\"2\", EnvironmentSettings.Row).ClickAsync();"
        );
    }

    #[test]
    fn test_locator_accessor() {
        let fragment = LocatorFragment {
            accessor: "District",
            kind: LocatorKind::Css,
            locator: "[name='district']",
            description: "District",
            parameter_count: 0,
        };
        assert_eq!(
            CsharpNunit.locator(&CTX, &fragment).unwrap(),
            "/// <summary>\n/// District\n/// </summary>\npublic ILocator District() => _page.Locator(\"[name='district']\");"
        );
    }

    #[test]
    fn test_parameterized_frame_accessor() {
        let fragment = LocatorFragment {
            accessor: "Editor",
            kind: LocatorKind::IFrameName,
            locator: "editor-{0}",
            description: "",
            parameter_count: 1,
        };
        assert_eq!(
            CsharpNunit.locator(&CTX, &fragment).unwrap(),
            "public IFrameLocator Editor(string p0) => _page.FrameLocator(string.Format(\"iframe[name='editor-{0}']\", p0));"
        );
    }

    #[test]
    fn test_get_by_accessor() {
        let fragment = LocatorFragment {
            accessor: "Submit",
            kind: LocatorKind::TestId,
            locator: "submit",
            description: "",
            parameter_count: 0,
        };
        assert_eq!(
            CsharpNunit.locator(&CTX, &fragment).unwrap(),
            "public ILocator Submit() => _page.GetByTestId(\"submit\");"
        );
    }

    #[test]
    fn test_page_file() {
        let file = OutputFileMetadata {
            output_file_rel_path: "Pages/FillsScreenPage.cs".to_string(),
            output_file_full_namespace: "Demo.Pages".to_string(),
            output_file_class_name: "FillsScreenPage".to_string(),
        };
        let page = CsharpNunit
            .page(
                &CTX,
                &PageFragment {
                    file: &file,
                    description: "Fills page",
                    body: "    public ILocator Name() => _page.Locator(\"[name='name']\");",
                },
            )
            .unwrap();
        let expected = "\
using Microsoft.Playwright;

namespace Demo.Pages;

/// <summary>
/// Fills page
/// </summary>
public class FillsScreenPage
{
    private readonly IPage _page;

    public FillsScreenPage(IPage page)
    {
        _page = page;
    }

    public ILocator Name() => _page.Locator(\"[name='name']\");
}
";
        assert_eq!(page, expected);
    }

    #[test]
    fn test_suite_method() {
        let case = OutputFileMetadata {
            output_file_rel_path: "TestCases/Fills.cs".to_string(),
            output_file_full_namespace: "Demo.TestCases".to_string(),
            output_file_class_name: "Fills".to_string(),
        };
        let method = CsharpNunit
            .test_method(
                &CTX,
                &TestMethodFragment {
                    method_name: "Fills",
                    test_case: &case,
                    description: "",
                },
            )
            .unwrap();
        assert_eq!(
            method,
            "[Test]\npublic async Task Fills()\n{\n    await new Fills(Page).RunAsync();\n}"
        );
    }

    #[test]
    fn test_import_skips_own_namespace() {
        let a = OutputFileMetadata {
            output_file_rel_path: "TestSuites/ASuite.cs".to_string(),
            output_file_full_namespace: "Demo.TestSuites".to_string(),
            output_file_class_name: "ASuite".to_string(),
        };
        let b = OutputFileMetadata {
            output_file_rel_path: "TestCases/B.cs".to_string(),
            output_file_full_namespace: "Demo.TestCases".to_string(),
            output_file_class_name: "B".to_string(),
        };
        assert_eq!(CsharpNunit.import(&a, &b, &["B"]).unwrap(), "using Demo.TestCases;");
        assert_eq!(CsharpNunit.import(&a, &a, &["ASuite"]).unwrap(), "");
    }

    #[test]
    fn test_support_files_use_root_namespace() {
        let files = CsharpNunit.support_files(&CTX).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["Support/LocatorHelper.cs", "Support/TestCaseBase.cs", "Support/TestSuiteBase.cs"]
        );
        assert!(files[2].content.contains("SetTestIdAttribute(\"data-testid\")"));
        assert!(files.iter().all(|f| f.content.contains("namespace Demo.Support;")));
    }

    #[test]
    fn test_project_files() {
        let files = CsharpNunit.project_files(&CTX).unwrap();
        assert_eq!(files[0].path, "Demo.csproj");
        assert!(files[1].content.contains("global using Demo.TestRoutines;"));
        assert_eq!(files[2].path, ".runsettings");
    }
}
