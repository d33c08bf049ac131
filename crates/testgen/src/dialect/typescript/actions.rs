use super::Typescript;
use crate::action::{ActionSyntax, AttributeExpr, DelayValue, ElementTarget, RoutineCall};
use crate::dialect::line_comment;
use crate::naming::{lower_case_first, quote};

impl ActionSyntax for Typescript {
    fn literal(&self, value: &str) -> String {
        quote(value)
    }

    fn environment(&self, setting: &str) -> String {
        format!("EnvironmentSettings.{setting}")
    }

    fn element(&self, target: &ElementTarget) -> String {
        let args: Vec<String> = target.parameters.iter().map(|p| self.data(p)).collect();
        format!(
            "this.defs.{}.{}({})",
            lower_case_first(&target.page),
            lower_case_first(&target.element),
            args.join(", ")
        )
    }

    fn attribute_name(&self, expr: &str) -> String {
        format!("attributeName({expr})")
    }

    fn attribute_value(&self, expr: &str) -> String {
        format!("attributeValue({expr})")
    }

    fn step_comment(&self, text: &str) -> String {
        line_comment("//", text)
    }

    fn go_to_url(&self, url: &str) -> String {
        format!("await this.page.goto({url});")
    }

    fn clear(&self, element: &str) -> String {
        format!("await {element}.clear();")
    }

    fn click(&self, element: &str) -> String {
        format!("await {element}.click();")
    }

    fn click_popup(&self, element: &str) -> String {
        format!("await this.switchToPopup(() => {element}.click());")
    }

    fn close_popup(&self, element: Option<&str>) -> String {
        match element {
            Some(element) => format!("await {element}.click();\nawait this.closePopup();"),
            None => "await this.closePopup();".to_string(),
        }
    }

    fn delay(&self, delay: &DelayValue) -> String {
        match delay {
            DelayValue::Millis(ms) => format!("await this.page.waitForTimeout({ms});"),
            DelayValue::Setting(expr) => format!("await this.page.waitForTimeout(Number({expr}));"),
        }
    }

    fn input(&self, element: &str, value: &str) -> String {
        format!("await {element}.fill({value});")
    }

    fn input_by_code(&self, element: &str, code: &str) -> String {
        format!("await {element}.fill({code});")
    }

    fn run_code(&self, code: &str) -> String {
        code.to_string()
    }

    fn select_option(&self, element: &str, value: &str) -> String {
        format!("await {element}.selectOption({value});")
    }

    fn verify_attribute(&self, element: &str, attribute: &AttributeExpr) -> String {
        format!(
            "await expect({element}).toHaveAttribute({}, {});",
            attribute.name, attribute.value
        )
    }

    fn verify_has_text(&self, element: &str, value: &str) -> String {
        format!("await expect({element}).toHaveText({value});")
    }

    fn verify_has_value(&self, element: &str, value: &str) -> String {
        format!("await expect({element}).toHaveValue({value});")
    }

    fn verify_is_editable(&self, element: &str) -> String {
        format!("await expect({element}).toBeEditable();")
    }

    fn verify_is_read_only(&self, element: &str) -> String {
        format!("await expect({element}).not.toBeEditable();")
    }

    fn verify_is_hidden(&self, element: &str) -> String {
        format!("await expect({element}).toBeHidden();")
    }

    fn verify_is_visible(&self, element: &str) -> String {
        format!("await expect({element}).toBeVisible();")
    }

    fn verify_title(&self, value: &str) -> String {
        format!("await expect(this.page).toHaveTitle({value});")
    }

    fn verify_title_contains(&self, value: &str) -> String {
        format!("await expect(this.page).toHaveTitle(new RegExp(escapeRegExp({value})));")
    }

    fn verify_url(&self, value: &str) -> String {
        format!("await expect(this.page).toHaveURL({value});")
    }

    fn run_test_routine(&self, call: &RoutineCall) -> String {
        format!("await new {}(this.page).run();", call.class_name)
    }
}
