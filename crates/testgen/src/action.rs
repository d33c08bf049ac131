//! Action-to-code mapping.
//!
//! Every [`ActionKind`] has exactly one rendering rule. [`render_step`]
//! dispatches with an exhaustive `match` onto [`ActionSyntax`], which every
//! dialect implements with one method per kind, so a new action kind cannot
//! build without a rule in each dialect.

use crate::result::{GenResult, IntegrityError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Action kinds
// ============================================================================

/// Closed set of step actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Navigate to a URL
    GoToUrl,
    /// Clear an input
    Clear,
    /// Click an element
    Click,
    /// Click an element that opens a popup and switch to the popup
    ClickPopup,
    /// Close the current popup and switch back
    ClosePopup,
    /// Wait a number of milliseconds
    Delay,
    /// Fill an input with text
    Input,
    /// Fill an input with the result of a code expression
    InputByCode,
    /// Emit raw code
    RunCode,
    /// Select an option of a `<select>`
    SelectOption,
    /// Assert an attribute value (`name=value`)
    VerifyAttribute,
    /// Assert element text
    VerifyHasText,
    /// Assert input value
    VerifyHasValue,
    /// Assert the element is editable
    VerifyIsEditable,
    /// Assert the element is read-only
    VerifyIsReadOnly,
    /// Assert the element is hidden
    VerifyIsHidden,
    /// Assert the element is visible
    VerifyIsVisible,
    /// Assert the page title
    VerifyTitle,
    /// Assert the page title contains text
    VerifyTitleContains,
    /// Assert the page URL
    VerifyUrl,
    /// Run variants of a test routine
    RunTestRoutine,
}

/// Whether an action acts on a page element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRequirement {
    /// Step must reference an element
    Required,
    /// Element is used when present
    Optional,
    /// Element is ignored
    Ignored,
}

impl ActionKind {
    /// Every action kind, in declaration order
    pub const ALL: [Self; 21] = [
        Self::GoToUrl,
        Self::Clear,
        Self::Click,
        Self::ClickPopup,
        Self::ClosePopup,
        Self::Delay,
        Self::Input,
        Self::InputByCode,
        Self::RunCode,
        Self::SelectOption,
        Self::VerifyAttribute,
        Self::VerifyHasText,
        Self::VerifyHasValue,
        Self::VerifyIsEditable,
        Self::VerifyIsReadOnly,
        Self::VerifyIsHidden,
        Self::VerifyIsVisible,
        Self::VerifyTitle,
        Self::VerifyTitleContains,
        Self::VerifyUrl,
        Self::RunTestRoutine,
    ];

    /// Name as written in project files
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GoToUrl => "GoToUrl",
            Self::Clear => "Clear",
            Self::Click => "Click",
            Self::ClickPopup => "ClickPopup",
            Self::ClosePopup => "ClosePopup",
            Self::Delay => "Delay",
            Self::Input => "Input",
            Self::InputByCode => "InputByCode",
            Self::RunCode => "RunCode",
            Self::SelectOption => "SelectOption",
            Self::VerifyAttribute => "VerifyAttribute",
            Self::VerifyHasText => "VerifyHasText",
            Self::VerifyHasValue => "VerifyHasValue",
            Self::VerifyIsEditable => "VerifyIsEditable",
            Self::VerifyIsReadOnly => "VerifyIsReadOnly",
            Self::VerifyIsHidden => "VerifyIsHidden",
            Self::VerifyIsVisible => "VerifyIsVisible",
            Self::VerifyTitle => "VerifyTitle",
            Self::VerifyTitleContains => "VerifyTitleContains",
            Self::VerifyUrl => "VerifyUrl",
            Self::RunTestRoutine => "RunTestRoutine",
        }
    }

    /// Element requirement of this action
    #[must_use]
    pub const fn element_requirement(self) -> ElementRequirement {
        match self {
            Self::Clear
            | Self::Click
            | Self::ClickPopup
            | Self::Input
            | Self::InputByCode
            | Self::SelectOption
            | Self::VerifyAttribute
            | Self::VerifyHasText
            | Self::VerifyHasValue
            | Self::VerifyIsEditable
            | Self::VerifyIsReadOnly
            | Self::VerifyIsHidden
            | Self::VerifyIsVisible => ElementRequirement::Required,
            Self::ClosePopup => ElementRequirement::Optional,
            Self::GoToUrl
            | Self::Delay
            | Self::RunCode
            | Self::VerifyTitle
            | Self::VerifyTitleContains
            | Self::VerifyUrl
            | Self::RunTestRoutine => ElementRequirement::Ignored,
        }
    }

    /// Step data is emitted as code, never escaped
    #[must_use]
    pub const fn takes_raw_code(self) -> bool {
        matches!(self, Self::InputByCode | Self::RunCode)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Step context
// ============================================================================

/// Resolved step value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionData {
    /// Inline value, escaped on rendering
    Literal(String),
    /// Lookup of a generated environment setting (property name)
    Environment(String),
}

impl Default for ActionData {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

/// Setting name referenced by a `${Name}` value, if the whole value is one.
#[must_use]
pub fn environment_reference(raw: &str) -> Option<&str> {
    raw.trim()
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.contains(['{', '}']))
}

/// Resolved page element a step acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTarget {
    /// Page class name, also the page-definitions property
    pub page: String,
    /// Accessor name on the page class
    pub element: String,
    /// Element is a frame locator
    pub frame: bool,
    /// Locator parameters
    pub parameters: Vec<ActionData>,
}

/// One routine variant a `RunTestRoutine` step runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineCall {
    /// Variant class name
    pub class_name: String,
}

/// Routine invocation of a `RunTestRoutine` step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineInvocation {
    /// Routine display name
    pub routine: String,
    /// Selected variants, in run order
    pub calls: Vec<RoutineCall>,
}

/// Everything an action needs to render
#[derive(Debug, Clone, Default)]
pub struct StepContext<'a> {
    /// Step location for error messages
    pub origin: &'a str,
    /// Element the step acts on
    pub target: Option<ElementTarget>,
    /// Step value
    pub data: ActionData,
    /// Unprocessed step value for raw-code actions
    pub raw: &'a str,
    /// Routine invocation for `RunTestRoutine`
    pub routine: Option<RoutineInvocation>,
}

/// `Delay` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelayValue {
    /// Literal milliseconds
    Millis(u64),
    /// Setting lookup expression holding milliseconds
    Setting(String),
}

/// Rendered attribute name/value pair for `VerifyAttribute`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeExpr {
    /// Attribute name expression
    pub name: String,
    /// Expected value expression
    pub value: String,
}

// ============================================================================
// Dialect syntax
// ============================================================================

/// Per-dialect rendering rule for every action kind.
///
/// Arguments are already rendered expressions: `element` is the locator
/// expression, `value` an escaped literal or a setting lookup.
pub trait ActionSyntax {
    /// Escaped string literal
    fn literal(&self, value: &str) -> String;
    /// Lookup of a generated environment setting
    fn environment(&self, setting: &str) -> String;
    /// Locator expression for a resolved element
    fn element(&self, target: &ElementTarget) -> String;
    /// Attribute name part of a runtime `name=value` expression
    fn attribute_name(&self, expr: &str) -> String;
    /// Attribute value part of a runtime `name=value` expression
    fn attribute_value(&self, expr: &str) -> String;
    /// Comment line inside a test body
    fn step_comment(&self, text: &str) -> String;

    fn go_to_url(&self, url: &str) -> String;
    fn clear(&self, element: &str) -> String;
    fn click(&self, element: &str) -> String;
    fn click_popup(&self, element: &str) -> String;
    fn close_popup(&self, element: Option<&str>) -> String;
    fn delay(&self, delay: &DelayValue) -> String;
    fn input(&self, element: &str, value: &str) -> String;
    fn input_by_code(&self, element: &str, code: &str) -> String;
    fn run_code(&self, code: &str) -> String;
    fn select_option(&self, element: &str, value: &str) -> String;
    fn verify_attribute(&self, element: &str, attribute: &AttributeExpr) -> String;
    fn verify_has_text(&self, element: &str, value: &str) -> String;
    fn verify_has_value(&self, element: &str, value: &str) -> String;
    fn verify_is_editable(&self, element: &str) -> String;
    fn verify_is_read_only(&self, element: &str) -> String;
    fn verify_is_hidden(&self, element: &str) -> String;
    fn verify_is_visible(&self, element: &str) -> String;
    fn verify_title(&self, value: &str) -> String;
    fn verify_title_contains(&self, value: &str) -> String;
    fn verify_url(&self, value: &str) -> String;
    fn run_test_routine(&self, call: &RoutineCall) -> String;

    /// Render a data descriptor
    fn data(&self, data: &ActionData) -> String {
        match data {
            ActionData::Literal(value) => self.literal(value),
            ActionData::Environment(setting) => self.environment(setting),
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Render one step through the dialect's rule for `kind`.
///
/// Shape errors (missing element, frame targets, malformed `Delay` or
/// `VerifyAttribute` data) are reported as integrity errors.
pub fn render_step(
    syntax: &dyn ActionSyntax,
    kind: ActionKind,
    ctx: &StepContext<'_>,
) -> GenResult<String> {
    let element = match kind.element_requirement() {
        ElementRequirement::Ignored => None,
        ElementRequirement::Optional | ElementRequirement::Required => {
            match (&ctx.target, kind.element_requirement()) {
                (Some(target), _) if target.frame => {
                    return Err(invalid(ctx, format!("{kind} cannot act on a frame locator")));
                }
                (Some(target), _) => Some(syntax.element(target)),
                (None, ElementRequirement::Required) => {
                    return Err(IntegrityError::ElementRequired {
                        origin: ctx.origin.to_string(),
                        action: kind.to_string(),
                    }
                    .into());
                }
                (None, _) => None,
            }
        }
    };
    let el = element.as_deref().unwrap_or_default();
    let value = || syntax.data(&ctx.data);

    let code = match kind {
        ActionKind::GoToUrl => syntax.go_to_url(&value()),
        ActionKind::Clear => syntax.clear(el),
        ActionKind::Click => syntax.click(el),
        ActionKind::ClickPopup => syntax.click_popup(el),
        ActionKind::ClosePopup => syntax.close_popup(element.as_deref()),
        ActionKind::Delay => syntax.delay(&delay_value(syntax, ctx)?),
        ActionKind::Input => syntax.input(el, &value()),
        ActionKind::InputByCode => syntax.input_by_code(el, ctx.raw),
        ActionKind::RunCode => syntax.run_code(ctx.raw),
        ActionKind::SelectOption => syntax.select_option(el, &value()),
        ActionKind::VerifyAttribute => {
            syntax.verify_attribute(el, &attribute_expr(syntax, ctx)?)
        }
        ActionKind::VerifyHasText => syntax.verify_has_text(el, &value()),
        ActionKind::VerifyHasValue => syntax.verify_has_value(el, &value()),
        ActionKind::VerifyIsEditable => syntax.verify_is_editable(el),
        ActionKind::VerifyIsReadOnly => syntax.verify_is_read_only(el),
        ActionKind::VerifyIsHidden => syntax.verify_is_hidden(el),
        ActionKind::VerifyIsVisible => syntax.verify_is_visible(el),
        ActionKind::VerifyTitle => syntax.verify_title(&value()),
        ActionKind::VerifyTitleContains => syntax.verify_title_contains(&value()),
        ActionKind::VerifyUrl => syntax.verify_url(&value()),
        ActionKind::RunTestRoutine => run_test_routine(syntax, ctx)?,
    };
    Ok(code)
}

fn invalid(ctx: &StepContext<'_>, message: String) -> crate::result::GenError {
    IntegrityError::InvalidStepData {
        origin: ctx.origin.to_string(),
        message,
    }
    .into()
}

fn delay_value(syntax: &dyn ActionSyntax, ctx: &StepContext<'_>) -> GenResult<DelayValue> {
    match &ctx.data {
        ActionData::Literal(text) => text.trim().parse::<u64>().map(DelayValue::Millis).map_err(
            |_| invalid(ctx, format!("Delay expects milliseconds, got '{text}'")),
        ),
        ActionData::Environment(_) => Ok(DelayValue::Setting(syntax.data(&ctx.data))),
    }
}

fn attribute_expr(syntax: &dyn ActionSyntax, ctx: &StepContext<'_>) -> GenResult<AttributeExpr> {
    match &ctx.data {
        ActionData::Literal(text) => {
            let (name, value) = text
                .split_once('=')
                .filter(|(name, _)| !name.trim().is_empty())
                .ok_or_else(|| {
                    invalid(
                        ctx,
                        format!("VerifyAttribute expects 'name=value', got '{text}'"),
                    )
                })?;
            Ok(AttributeExpr {
                name: syntax.literal(name.trim()),
                value: syntax.literal(value),
            })
        }
        ActionData::Environment(_) => {
            let expr = syntax.data(&ctx.data);
            Ok(AttributeExpr {
                name: syntax.attribute_name(&expr),
                value: syntax.attribute_value(&expr),
            })
        }
    }
}

fn run_test_routine(syntax: &dyn ActionSyntax, ctx: &StepContext<'_>) -> GenResult<String> {
    let invocation = ctx
        .routine
        .as_ref()
        .ok_or_else(|| invalid(ctx, "RunTestRoutine has no resolved routine".to_string()))?;
    if invocation.calls.is_empty() {
        return Ok(syntax.step_comment(&format!(
            "Test routine '{}' has no data sets to run",
            invocation.routine
        )));
    }
    Ok(invocation
        .calls
        .iter()
        .map(|call| syntax.run_test_routine(call))
        .collect::<Vec<_>>()
        .join("\n"))
}
