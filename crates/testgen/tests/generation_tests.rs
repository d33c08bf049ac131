//! End-to-end generation tests.
//!
//! Projects are written as JSON in the project-file layout, loaded through
//! serde and generated in both dialects.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use testgen::{
    generate, verify_output, CodeMetadata, DialectKind, DirectoryWriter, GenError,
    GenerateOptions, GeneratedProject, IntegrityError, MemoryWriter, Project,
};

fn load(json: &str) -> Project {
    serde_json::from_str(json).expect("fixture parses")
}

fn run(json: &str, dialect: DialectKind) -> Result<GeneratedProject, GenError> {
    generate(&load(json), dialect, &GenerateOptions::default())
}

const FILLS: &str = r#"{
    "settings": { "name": "Demo", "rootNamespace": "Demo" },
    "pages": [{
        "id": "p-fills",
        "name": "FillsScreen",
        "elements": [
            { "type": "pageElement", "id": "e-district", "name": "district",
              "findBy": "css", "locator": "[name='district']" }
        ]
    }],
    "testCases": [{
        "id": "tc-fills",
        "name": "fills",
        "steps": [
            { "type": "testStep", "page": "p-fills", "element": "e-district",
              "action": "Input", "data": "ABC" }
        ]
    }],
    "testSuites": [{ "id": "s-smoke", "name": "Smoke", "testCases": ["tc-fills"] }]
}"#;

const DATASETS: &str = r#"{
    "settings": { "name": "Demo", "rootNamespace": "Demo" },
    "pages": [{
        "id": "p1",
        "name": "Person",
        "elements": [
            { "type": "pageElement", "id": "e1", "name": "name",
              "findBy": "testId", "locator": "person-name" }
        ]
    }],
    "testRoutines": [{
        "id": "r1",
        "name": "FillName",
        "steps": [
            { "type": "comment", "comment": "Type the name" },
            { "type": "testStep", "page": "p1", "element": "e1", "action": "Input",
              "data": { "DataSet One": "Joe", "DataSet Number Two": "Jane" } },
            { "type": "testStep", "page": "p1", "element": "e1", "action": "VerifyIsVisible" }
        ],
        "dataSets": [
            { "id": "ds1", "name": "DataSet One" },
            { "id": "ds2", "name": "DataSet Number Two" }
        ]
    }],
    "testCases": [{
        "id": "tc1",
        "name": "Register",
        "steps": [
            { "type": "testStep", "action": "RunTestRoutine", "data": "r1" }
        ]
    }]
}"#;

// ============================================================================
// Fills scenario
// ============================================================================

#[test]
fn fills_page_and_case_csharp() {
    let out = run(FILLS, DialectKind::PlaywrightCsharpNunit).unwrap();

    let page = &out.file("Pages/FillsScreenPage.cs").unwrap().content;
    assert_eq!(
        page,
        "\
using Microsoft.Playwright;

namespace Demo.Pages;

public class FillsScreenPage
{
    private readonly IPage _page;

    public FillsScreenPage(IPage page)
    {
        _page = page;
    }

    public ILocator District() => _page.Locator(\"[name='district']\");
}
"
    );

    let case = &out.file("TestCases/Fills.cs").unwrap().content;
    assert_eq!(
        case,
        "\
using Microsoft.Playwright;
using Demo.Support;
using static Microsoft.Playwright.Assertions;

namespace Demo.TestCases;

public class Fills : TestCaseBase
{
    public Fills(IPage page)
        : base(page)
    {
    }

    public override async Task RunAsync()
    {
        await defs.FillsScreenPage.District().FillAsync(\"ABC\");
    }
}
"
    );

    let definitions = &out.file("PageDefinitions.cs").unwrap().content;
    assert!(definitions.contains("using Demo.Pages;"));
    assert!(definitions.contains("        FillsScreenPage = new FillsScreenPage(page);"));
    assert!(definitions.contains("    public FillsScreenPage FillsScreenPage { get; }"));
}

#[test]
fn page_comment_gets_extra_leading_blank_line() {
    let json = r##"{
        "settings": { "rootNamespace": "Demo" },
        "pages": [{
            "id": "p1",
            "name": "Form",
            "elements": [
                { "type": "comment", "comment": "Header" },
                { "type": "pageElement", "id": "e1", "name": "a",
                  "findBy": "css", "locator": "#a" },
                { "type": "comment", "comment": "Address" },
                { "type": "pageElement", "id": "e2", "name": "b",
                  "findBy": "css", "locator": "#b" }
            ]
        }]
    }"##;
    let out = run(json, DialectKind::PlaywrightCsharpNunit).unwrap();

    let page = &out.file("Pages/FormPage.cs").unwrap().content;
    assert_eq!(
        page,
        "\
using Microsoft.Playwright;

namespace Demo.Pages;

public class FormPage
{
    private readonly IPage _page;

    public FormPage(IPage page)
    {
        _page = page;
    }

    // Header

    public ILocator A() => _page.Locator(\"#a\");



    // Address

    public ILocator B() => _page.Locator(\"#b\");
}
"
    );
}

#[test]
fn fills_suite_typescript() {
    let out = run(FILLS, DialectKind::PlaywrightTypescript).unwrap();

    let suite = &out.file("test-suites/SmokeSuite.spec.ts").unwrap().content;
    assert_eq!(
        suite,
        "\
import { test } from \"../support/TestSuiteBase\";
import { Fills } from \"../test-cases/Fills\";

test.describe(\"Smoke\", () => {
    test(\"Fills\", async ({ page }) => {
        await new Fills(page).run();
    });
});
"
    );

    let case = &out.file("test-cases/Fills.ts").unwrap().content;
    assert!(case.contains("import { TestCaseBase } from \"../support/TestCaseBase\";"));
    assert!(case.contains("export class Fills extends TestCaseBase {"));
    assert!(case.contains("        await this.defs.fillsScreenPage.district().fill(\"ABC\");\n"));

    let definitions = &out.file("PageDefinitions.ts").unwrap().content;
    assert!(definitions.contains("import { FillsScreenPage } from \"./pages/FillsScreenPage\";"));
    assert!(definitions.contains("this.fillsScreenPage = new FillsScreenPage(page);"));
}

// ============================================================================
// Data sets
// ============================================================================

fn variant_blocks(content: &str, marker: &str) -> Vec<String> {
    content
        .split(marker)
        .skip(1)
        .map(|block| format!("{marker}{block}"))
        .collect()
}

#[test]
fn data_driven_value_only_in_its_variant() {
    let out = run(DATASETS, DialectKind::PlaywrightCsharpNunit).unwrap();
    let routine = &out.file("TestRoutines/FillName.cs").unwrap().content;
    let blocks = variant_blocks(routine, "public class ");
    assert_eq!(blocks.len(), 2);

    let two = blocks
        .iter()
        .find(|b| b.starts_with("public class FillNameDataSetNumberTwo "))
        .unwrap();
    assert!(two.contains("FillAsync(\"Jane\")"));
    assert!(!two.contains("\"Joe\""));

    let one = blocks
        .iter()
        .find(|b| b.starts_with("public class FillNameDataSetOne "))
        .unwrap();
    assert!(one.contains("FillAsync(\"Joe\")"));
    assert!(!one.contains("\"Jane\""));

    for block in &blocks {
        assert!(block.contains("// Type the name"));
        assert!(block.contains("ToBeVisibleAsync()"));
    }

    let case = &out.file("TestCases/Register.cs").unwrap().content;
    assert!(case.contains(
        "        await new FillNameDataSetOne(Page).RunAsync();\n        await new FillNameDataSetNumberTwo(Page).RunAsync();\n"
    ));
}

#[test]
fn routine_variants_typescript() {
    let out = run(DATASETS, DialectKind::PlaywrightTypescript).unwrap();
    let routine = &out.file("test-routines/FillName.ts").unwrap().content;
    assert_eq!(variant_blocks(routine, "export class ").len(), 2);
    assert!(routine
        .contains("/** Data set: DataSet Number Two */\nexport class FillNameDataSetNumberTwo"));
    assert!(routine.contains("await this.defs.personPage.name().fill(\"Jane\");"));

    let case = &out.file("test-cases/Register.ts").unwrap().content;
    assert!(case.contains(
        "import { FillNameDataSetOne, FillNameDataSetNumberTwo } from \"../test-routines/FillName\";"
    ));

    let page = &out.file("pages/PersonPage.ts").unwrap().content;
    assert!(page.contains("return this.page.getByTestId(\"person-name\");"));
}

#[test]
fn routine_without_data_sets_has_no_variants() {
    let mut project = load(DATASETS);
    project.test_routines[0].data_sets.clear();
    project.test_cases.clear();
    let out = generate(&project, DialectKind::PlaywrightCsharpNunit, &GenerateOptions::default())
        .unwrap();
    let routine = &out.file("TestRoutines/FillName.cs").unwrap().content;
    assert!(!routine.contains("public class"));
    assert!(routine.contains("// Test routine FillName has no data sets yet."));
}

#[test]
fn missing_data_set_value_is_fatal() {
    let json = DATASETS.replace(r#""DataSet One": "Joe", "#, "");
    let err = run(&json, DialectKind::PlaywrightCsharpNunit).unwrap_err();
    match err {
        GenError::ModelIntegrity(IntegrityError::MissingDataSetValue { step, data_set, .. }) => {
            assert_eq!(step, 2);
            assert_eq!(data_set, "DataSet One");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Integrity
// ============================================================================

#[test]
fn unknown_case_in_suite_emits_nothing() {
    let json = FILLS.replace(r#"["tc-fills"]"#, r#"["tc-fills", "tc-missing"]"#);
    let err = run(&json, DialectKind::PlaywrightCsharpNunit).unwrap_err();
    assert!(matches!(
        err,
        GenError::ModelIntegrity(IntegrityError::UnknownTestCase { ref id, .. })
            if id == "tc-missing"
    ));
}

#[test]
fn same_named_pages_get_distinct_classes() {
    let json = r#"{
        "pages": [
            { "id": "a", "name": "Login Page" },
            { "id": "b", "name": "Login Page" },
            { "id": "c", "name": "Login Page", "folder": "Admin" }
        ]
    }"#;
    let out = run(json, DialectKind::PlaywrightCsharpNunit).unwrap();
    assert!(out.file("Pages/LoginPage.cs").is_some());
    assert!(out.file("Pages/LoginPage2.cs").is_some());
    assert!(out.file("Pages/Admin/LoginPage3.cs").is_some());

    let definitions = &out.file("PageDefinitions.cs").unwrap().content;
    assert!(definitions.contains("using TestProject.Pages.Admin;"));
}

#[test]
fn suite_class_never_shadows_a_case_it_runs() {
    let json = r#"{
        "settings": { "rootNamespace": "Demo" },
        "testCases": [{ "id": "tc1", "name": "Fills Suite" }],
        "testSuites": [{ "id": "s1", "name": "Fills", "testCases": ["tc1"] }]
    }"#;
    for dialect in DialectKind::ALL {
        let out = run(json, dialect).unwrap();
        let manifest: CodeMetadata =
            serde_json::from_str(&out.file(".code-metadata").unwrap().content).unwrap();
        let classes: Vec<&str> = manifest
            .entities
            .iter()
            .map(|e| e.entry.file.output_file_class_name.as_str())
            .collect();
        assert_eq!(classes, vec!["FillsSuite", "FillsSuite2"], "{dialect}");
    }

    let out = run(json, DialectKind::PlaywrightCsharpNunit).unwrap();
    let suite = &out.file("TestSuites/FillsSuite2.cs").unwrap().content;
    assert!(suite.contains("public class FillsSuite2 : TestSuiteBase"));
    assert!(suite.contains("await new FillsSuite(Page).RunAsync();"));
}

#[test]
fn routine_variants_avoid_page_and_suite_classes() {
    let json = r#"{
        "settings": { "rootNamespace": "Demo" },
        "pages": [{ "id": "p1", "name": "Home" }],
        "testRoutines": [{
            "id": "r1",
            "name": "Home",
            "steps": [{ "type": "testStep", "action": "GoToUrl", "data": "/" }],
            "dataSets": [{ "id": "ds1", "name": "Page" }, { "id": "ds2", "name": "Suite" }]
        }],
        "testSuites": [{ "id": "s1", "name": "Home", "testCases": [] }]
    }"#;
    let options = GenerateOptions::new().with_full(true);
    let out = generate(&load(json), DialectKind::PlaywrightCsharpNunit, &options).unwrap();

    let routines = &out.file("TestRoutines/Home.cs").unwrap().content;
    assert!(routines.contains("public class HomePage2 : TestCaseBase"));
    assert!(routines.contains("public class HomeSuite2 : TestCaseBase"));
    assert!(!routines.contains("class HomePage "));
    assert!(out.file("Pages/HomePage.cs").is_some());
    assert!(out.file("TestSuites/HomeSuite.cs").is_some());

    let definitions = &out.file("PageDefinitions.cs").unwrap().content;
    assert!(definitions.contains("    public HomePage HomePage { get; }"));
}

#[test]
fn oversized_locator_placeholder_is_rejected() {
    let json = FILLS.replace("[name='district']", "#row-{18446744073709551615}");
    let err = run(&json, DialectKind::PlaywrightTypescript).unwrap_err();
    assert!(matches!(
        err,
        GenError::ModelIntegrity(IntegrityError::InvalidStepData { ref origin, .. })
            if origin == "page 'FillsScreen'"
    ));
    assert!(err.to_string().contains("element 'district'"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let json = FILLS.replace(r#""id": "s-smoke""#, r#""id": "p-fills""#);
    let err = run(&json, DialectKind::PlaywrightTypescript).unwrap_err();
    assert!(err.is_integrity());
    assert!(err.to_string().contains("duplicate entity id 'p-fills'"));
}

// ============================================================================
// Determinism and manifest
// ============================================================================

#[test]
fn regeneration_is_byte_identical() {
    let project = load(DATASETS);
    let options = GenerateOptions::new().with_full(true);
    for dialect in DialectKind::ALL {
        let first = generate(&project, dialect, &options).unwrap();
        let second = generate(&project, dialect, &options).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn output_paths_are_unique_and_relative() {
    let options = GenerateOptions::new().with_full(true);
    for dialect in DialectKind::ALL {
        let out = generate(&load(DATASETS), dialect, &options).unwrap();
        let mut seen = std::collections::BTreeSet::new();
        for path in out.paths() {
            assert!(seen.insert(path.to_lowercase()), "{path} emitted twice");
            assert!(!path.starts_with('/') && !path.contains(".."));
        }
        assert_eq!(out.files.last().unwrap().path, ".code-metadata");
    }
}

#[test]
fn written_tree_verifies_clean_until_edited() {
    let out = run(FILLS, DialectKind::PlaywrightCsharpNunit).unwrap();
    let dir = TempDir::new().unwrap();
    let mut writer = DirectoryWriter::new(dir.path());
    out.write_to(&mut writer).unwrap();
    assert_eq!(writer.written(), out.len());

    let report = verify_output(dir.path()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.checked, out.len() - 1);

    std::fs::write(dir.path().join("TestCases").join("Fills.cs"), "// edited\n").unwrap();
    std::fs::remove_file(dir.path().join("Pages").join("FillsScreenPage.cs")).unwrap();
    let report = verify_output(dir.path()).unwrap();
    assert_eq!(report.modified, vec!["TestCases/Fills.cs".to_string()]);
    assert_eq!(report.missing, vec!["Pages/FillsScreenPage.cs".to_string()]);
}

#[test]
fn manifest_describes_entities() {
    let out = run(DATASETS, DialectKind::PlaywrightCsharpNunit).unwrap();
    let mut memory = MemoryWriter::new();
    out.write_to(&mut memory).unwrap();
    let manifest: CodeMetadata =
        serde_json::from_str(memory.get(".code-metadata").unwrap()).unwrap();
    assert_eq!(manifest.generation.dialect, DialectKind::PlaywrightCsharpNunit);
    assert_eq!(manifest.generation.root_namespace, "Demo");
    assert_eq!(manifest.generation.test_result_file_name, "test-result.trx");
    assert!(manifest.generation.environment.is_none());
    assert_eq!(manifest.entities.len(), 3);
    assert!(manifest
        .files
        .iter()
        .any(|f| f.path == "TestRoutines/FillName.cs" && f.hash.len() == 64));
}
