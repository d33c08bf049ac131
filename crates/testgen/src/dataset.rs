//! Dataset expansion for test routines.
//!
//! A routine with `k` declared data sets expands into `k` variants, in
//! declaration order. Each variant carries one concrete value per step: the
//! entry keyed by the data set's name for data-driven steps, the literal
//! otherwise.

use crate::model::{DataSet, Step, StepData, TestRoutine};
use crate::naming::{identifier_or, NameRegistry};
use crate::result::{GenResult, IntegrityError};
use std::collections::BTreeSet;

/// One concrete variant of a routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedDataSet<'a> {
    /// Source data set
    pub data_set: &'a DataSet,
    /// Variant class name: routine class + sanitized data set name
    pub class_name: String,
    /// Value per step, aligned with the routine's steps; `None` for
    /// comment steps
    pub values: Vec<Option<&'a str>>,
}

impl ExpandedDataSet<'_> {
    /// Data set name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data_set.name
    }

    /// Data set description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.data_set.description
    }
}

/// Expand `routine` into one variant per declared data set.
///
/// Zero data sets yield zero variants without validating the steps.
pub fn expand<'a>(
    routine: &'a TestRoutine,
    base_class: &str,
) -> GenResult<Vec<ExpandedDataSet<'a>>> {
    if routine.data_sets.is_empty() {
        return Ok(Vec::new());
    }
    validate(routine)?;

    let mut suffixes = NameRegistry::new();
    let mut variants = Vec::with_capacity(routine.data_sets.len());
    for data_set in &routine.data_sets {
        let suffix = suffixes.claim(&identifier_or(&data_set.name, "DataSet"))?;
        let values = routine
            .steps
            .iter()
            .map(|step| match step {
                Step::Comment(_) => None,
                Step::TestStep(step) => Some(match &step.data {
                    StepData::Literal(value) => value.as_str(),
                    StepData::PerDataSet(values) => values
                        .get(&data_set.name)
                        .map_or("", String::as_str),
                }),
            })
            .collect();
        variants.push(ExpandedDataSet {
            data_set,
            class_name: format!("{base_class}{suffix}"),
            values,
        });
    }
    tracing::debug!(
        routine = %routine.name,
        variants = variants.len(),
        "expanded test routine"
    );
    Ok(variants)
}

fn validate(routine: &TestRoutine) -> GenResult<()> {
    let mut declared = BTreeSet::new();
    for data_set in &routine.data_sets {
        if !declared.insert(data_set.name.as_str()) {
            return Err(IntegrityError::DuplicateDataSet {
                routine: routine.name.clone(),
                data_set: data_set.name.clone(),
            }
            .into());
        }
    }

    for (index, step) in routine.steps.iter().enumerate() {
        let Step::TestStep(step) = step else {
            continue;
        };
        let StepData::PerDataSet(values) = &step.data else {
            continue;
        };
        if let Some(unknown) = values.keys().find(|key| !declared.contains(key.as_str())) {
            return Err(IntegrityError::UnknownDataSet {
                routine: routine.name.clone(),
                data_set: unknown.clone(),
            }
            .into());
        }
        if let Some(missing) = routine
            .data_sets
            .iter()
            .find(|data_set| !values.contains_key(&data_set.name))
        {
            return Err(IntegrityError::MissingDataSetValue {
                routine: routine.name.clone(),
                step: index + 1,
                data_set: missing.name.clone(),
            }
            .into());
        }
    }
    Ok(())
}
