use super::CsharpNunit;
use crate::action::{ActionSyntax, AttributeExpr, DelayValue, ElementTarget, RoutineCall};
use crate::dialect::line_comment;
use crate::naming::quote;

impl ActionSyntax for CsharpNunit {
    fn literal(&self, value: &str) -> String {
        quote(value)
    }

    fn environment(&self, setting: &str) -> String {
        format!("EnvironmentSettings.{setting}")
    }

    fn element(&self, target: &ElementTarget) -> String {
        let args: Vec<String> = target.parameters.iter().map(|p| self.data(p)).collect();
        format!("defs.{}.{}({})", target.page, target.element, args.join(", "))
    }

    fn attribute_name(&self, expr: &str) -> String {
        format!("LocatorHelper.AttributeName({expr})")
    }

    fn attribute_value(&self, expr: &str) -> String {
        format!("LocatorHelper.AttributeValue({expr})")
    }

    fn step_comment(&self, text: &str) -> String {
        line_comment("//", text)
    }

    fn go_to_url(&self, url: &str) -> String {
        format!("await Page.GotoAsync({url});")
    }

    fn clear(&self, element: &str) -> String {
        format!("await {element}.ClearAsync();")
    }

    fn click(&self, element: &str) -> String {
        format!("await {element}.ClickAsync();")
    }

    fn click_popup(&self, element: &str) -> String {
        format!("await SwitchToPopupAsync(() => {element}.ClickAsync());")
    }

    fn close_popup(&self, element: Option<&str>) -> String {
        match element {
            Some(element) => format!("await {element}.ClickAsync();\nawait ClosePopupAsync();"),
            None => "await ClosePopupAsync();".to_string(),
        }
    }

    fn delay(&self, delay: &DelayValue) -> String {
        match delay {
            DelayValue::Millis(ms) => format!("await Task.Delay({ms});"),
            DelayValue::Setting(expr) => format!("await Task.Delay(int.Parse({expr}));"),
        }
    }

    fn input(&self, element: &str, value: &str) -> String {
        format!("await {element}.FillAsync({value});")
    }

    fn input_by_code(&self, element: &str, code: &str) -> String {
        format!("await {element}.FillAsync({code});")
    }

    fn run_code(&self, code: &str) -> String {
        code.to_string()
    }

    fn select_option(&self, element: &str, value: &str) -> String {
        format!("await {element}.SelectOptionAsync({value});")
    }

    fn verify_attribute(&self, element: &str, attribute: &AttributeExpr) -> String {
        format!(
            "await Expect({element}).ToHaveAttributeAsync({}, {});",
            attribute.name, attribute.value
        )
    }

    fn verify_has_text(&self, element: &str, value: &str) -> String {
        format!("await Expect({element}).ToHaveTextAsync({value});")
    }

    fn verify_has_value(&self, element: &str, value: &str) -> String {
        format!("await Expect({element}).ToHaveValueAsync({value});")
    }

    fn verify_is_editable(&self, element: &str) -> String {
        format!("await Expect({element}).ToBeEditableAsync();")
    }

    fn verify_is_read_only(&self, element: &str) -> String {
        format!("await Expect({element}).Not.ToBeEditableAsync();")
    }

    fn verify_is_hidden(&self, element: &str) -> String {
        format!("await Expect({element}).ToBeHiddenAsync();")
    }

    fn verify_is_visible(&self, element: &str) -> String {
        format!("await Expect({element}).ToBeVisibleAsync();")
    }

    fn verify_title(&self, value: &str) -> String {
        format!("await Expect(Page).ToHaveTitleAsync({value});")
    }

    fn verify_title_contains(&self, value: &str) -> String {
        format!(
            "await Expect(Page).ToHaveTitleAsync(new System.Text.RegularExpressions.Regex(System.Text.RegularExpressions.Regex.Escape({value})));"
        )
    }

    fn verify_url(&self, value: &str) -> String {
        format!("await Expect(Page).ToHaveURLAsync({value});")
    }

    fn run_test_routine(&self, call: &RoutineCall) -> String {
        format!("await new {}(Page).RunAsync();", call.class_name)
    }
}
