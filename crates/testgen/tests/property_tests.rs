//! Property-based tests for testgen.
//!
//! Uses proptest to check the naming, expansion and determinism invariants
//! for arbitrary project shapes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use testgen::naming::{quote, sanitize_identifier, NameRegistry};
use testgen::{
    expand, generate, ActionKind, DataSet, DialectKind, GenerateOptions, OutputProjectMetadata,
    Page, Project, Step, StepData, TestCase, TestRoutine, TestStep,
};

fn page(index: usize, name: &str) -> Page {
    Page {
        id: format!("p{index}"),
        name: name.to_string(),
        description: String::new(),
        folder: String::new(),
        elements: vec![],
    }
}

fn routine(data_set_names: &[String], steps: usize) -> TestRoutine {
    let data_sets: Vec<DataSet> = data_set_names
        .iter()
        .enumerate()
        .map(|(i, name)| DataSet {
            id: format!("ds{i}"),
            name: name.clone(),
            description: String::new(),
        })
        .collect();
    let steps = (0..steps)
        .map(|i| {
            let values: BTreeMap<String, String> = data_set_names
                .iter()
                .map(|name| (name.clone(), format!("{name}-value-{i}")))
                .collect();
            Step::TestStep(TestStep {
                id: format!("s{i}"),
                page: String::new(),
                element: String::new(),
                action: ActionKind::GoToUrl,
                data: StepData::PerDataSet(values),
                parameters: vec![],
            })
        })
        .collect();
    TestRoutine {
        id: "r1".to_string(),
        name: "Routine".to_string(),
        description: String::new(),
        folder: String::new(),
        steps,
        data_sets,
    }
}

// === Naming Property Tests ===

proptest! {
    /// Sanitized names contain identifier characters only and never start
    /// with a digit.
    #[test]
    fn prop_sanitized_identifier_is_valid(name in ".{0,40}") {
        let ident = sanitize_identifier(&name);
        prop_assert!(ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        prop_assert!(!ident.starts_with(|c: char| c.is_ascii_digit()));
    }

    /// Every claim returns a name no earlier claim returned.
    #[test]
    fn prop_registry_claims_are_unique(names in prop::collection::vec("[a-zA-Z]{1,6}", 1..40)) {
        let mut registry = NameRegistry::new();
        let mut seen = BTreeSet::new();
        for name in &names {
            let claimed = registry.claim(name).unwrap();
            prop_assert!(seen.insert(claimed.to_lowercase()), "duplicate claim {}", claimed);
        }
    }

    /// Quoted literals never end early.
    #[test]
    fn prop_quote_escapes_delimiters(value in ".{0,40}") {
        let quoted = quote(&value);
        let inner = &quoted[1..quoted.len() - 1];
        let mut escaped = false;
        for c in inner.chars() {
            prop_assert!(escaped || c != '"', "unescaped quote in {}", quoted);
            escaped = !escaped && c == '\\';
        }
        prop_assert!(!escaped);
    }

    /// Pages with arbitrary (often colliding) names get distinct classes
    /// and paths.
    #[test]
    fn prop_page_classes_distinct(names in prop::collection::vec("[a-cA-C ]{0,4}", 1..20)) {
        let project = Project {
            pages: names.iter().enumerate().map(|(i, n)| page(i, n)).collect(),
            ..Project::default()
        };
        for dialect in DialectKind::ALL {
            let meta = OutputProjectMetadata::build(
                &project,
                dialect.dialect().layout(),
                "Demo",
            ).unwrap();
            let classes: BTreeSet<String> = meta
                .entries()
                .iter()
                .map(|e| e.file.output_file_class_name.to_lowercase())
                .collect();
            prop_assert_eq!(classes.len(), names.len());
        }
    }
}

// === Expansion Property Tests ===

proptest! {
    /// k data sets and m steps give k variants of m values, with distinct
    /// class names, and each value belongs to its own data set.
    #[test]
    fn prop_expansion_shape(
        names in prop::collection::btree_set("[A-Za-z][A-Za-z ]{0,8}", 0..6),
        steps in 0usize..6
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let routine = routine(&names, steps);
        let variants = expand(&routine, "Routine").unwrap();
        prop_assert_eq!(variants.len(), names.len());

        let classes: BTreeSet<String> =
            variants.iter().map(|v| v.class_name.to_lowercase()).collect();
        prop_assert_eq!(classes.len(), variants.len());

        for variant in &variants {
            prop_assert_eq!(variant.values.len(), steps);
            for (i, value) in variant.values.iter().enumerate() {
                let expected = format!("{}-value-{i}", variant.name());
                prop_assert_eq!(*value, Some(expected.as_str()));
            }
        }
    }
}

// === Generation Property Tests ===

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Generation is deterministic and paths are unique.
    #[test]
    fn prop_generation_deterministic(
        page_names in prop::collection::vec("[A-Za-z]{1,5}", 0..5),
        case_names in prop::collection::vec("[A-Za-z]{1,5}", 0..5),
        full in any::<bool>()
    ) {
        let project = Project {
            pages: page_names.iter().enumerate().map(|(i, n)| page(i, n)).collect(),
            test_cases: case_names
                .iter()
                .enumerate()
                .map(|(i, n)| TestCase {
                    id: format!("tc{i}"),
                    name: n.clone(),
                    description: String::new(),
                    folder: String::new(),
                    steps: vec![],
                })
                .collect(),
            ..Project::default()
        };
        let options = GenerateOptions::new().with_full(full);
        for dialect in DialectKind::ALL {
            let first = generate(&project, dialect, &options).unwrap();
            let second = generate(&project, dialect, &options).unwrap();
            prop_assert_eq!(&first, &second);

            let paths: BTreeSet<String> = first.paths().map(str::to_lowercase).collect();
            prop_assert_eq!(paths.len(), first.len());
        }
    }
}
