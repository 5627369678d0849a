//! Page scan: suggest manual test cases from the controls on a page.
//!
//! Each heuristic looks for one kind of control (forms, typed inputs,
//! validation attributes, embedded content) and emits a [`TestCase`]
//! targeting it with a synthesized structural locator.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::EngineConfig;
use crate::dom::{DomTree, NodeId};
use crate::synth::Synthesizer;

/// Selector shared by the search heuristic and its test case target
pub const SEARCH_SELECTOR: &str = "input[type=search], [role=search]";

/// A suggested manual test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Short title
    pub title: String,
    /// Locator of the element under test
    pub target: String,
    /// Steps in order
    pub steps: Vec<String>,
    /// Expected outcome
    pub expected: String,
}

impl TestCase {
    /// Create a test case
    #[must_use]
    pub fn new<S: Into<String>>(
        title: impl Into<String>,
        target: impl Into<String>,
        steps: impl IntoIterator<Item = S>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            target: target.into(),
            steps: steps.into_iter().map(Into::into).collect(),
            expected: expected.into(),
        }
    }
}

/// Scans a document for testable controls
#[derive(Debug, Clone, Default)]
pub struct PageScanner {
    synthesizer: Synthesizer,
}

impl PageScanner {
    /// Create a scanner from configuration
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            synthesizer: Synthesizer::new(config),
        }
    }

    /// All suggested test cases, grouped by heuristic
    pub fn scan<D: DomTree + ?Sized>(&self, dom: &D) -> Vec<TestCase> {
        let mut cases = Vec::new();
        let elements = dom.elements();
        let target = |node: NodeId| {
            self.synthesizer
                .structural(dom, node)
                .map(|locator| locator.into_string())
                .unwrap_or_default()
        };
        let tag_is = |node: NodeId, tag: &str| dom.tag_name(node) == Some(tag);
        let controls: Vec<NodeId> = elements
            .iter()
            .copied()
            .filter(|node| matches!(dom.tag_name(*node), Some("input" | "textarea" | "select")))
            .collect();
        let inputs_of_type = |kind: &str| -> Vec<NodeId> {
            controls
                .iter()
                .copied()
                .filter(|node| tag_is(*node, "input") && input_type(dom, *node) == kind)
                .collect()
        };

        for (index, form) in elements.iter().filter(|n| tag_is(**n, "form")).enumerate() {
            cases.push(TestCase::new(
                format!("Form {} validation", index + 1),
                target(*form),
                [
                    "Submit with empty required fields",
                    "Verify validation messages",
                    "Submit with valid values",
                ],
                "Required errors displayed, valid submission succeeds",
            ));
        }

        for input in inputs_of_type("password") {
            cases.push(TestCase::new(
                "Password field behavior",
                target(input),
                ["Enter weak password", "Enter strong password", "Toggle show/hide if available"],
                "Validation reflects strength rules and visibility toggles work",
            ));
        }

        for input in inputs_of_type("email") {
            cases.push(TestCase::new(
                "Email format validation",
                target(input),
                ["Enter invalid email", "Enter valid email", "Check trimming and normalization"],
                "Invalid formats rejected and valid formats accepted",
            ));
        }

        if dom.match_count(SEARCH_SELECTOR) > 0 {
            cases.push(TestCase::new(
                "Search behavior",
                SEARCH_SELECTOR,
                ["Search with empty query", "Search with special characters", "Search with long query"],
                "Handles empty/special queries and returns results or empty state",
            ));
        }

        let has_external_link = elements.iter().any(|node| {
            tag_is(*node, "a")
                && dom
                    .attribute(*node, "href")
                    .is_some_and(|href| is_external(dom.url(), href))
        });
        if has_external_link {
            cases.push(TestCase::new(
                "External link safety",
                "a[href]",
                ["Click external link", "Verify rel=noopener and correct target"],
                "External links open safely without window.opener",
            ));
        }

        for input in inputs_of_type("number") {
            cases.push(TestCase::new(
                "Number field boundaries",
                target(input),
                ["Enter min-1", "Enter max+1", "Enter decimals"],
                "Invalid ranges rejected, valid numbers accepted",
            ));
        }

        for input in inputs_of_type("date") {
            cases.push(TestCase::new(
                "Date field validation",
                target(input),
                ["Enter invalid date", "Enter leap day", "Enter valid date"],
                "Invalid dates rejected, valid dates accepted",
            ));
        }

        for input in inputs_of_type("file") {
            cases.push(TestCase::new(
                "File upload validation",
                target(input),
                ["Upload invalid file type", "Upload large file", "Upload valid file"],
                "Only allowed file types and sizes are accepted",
            ));
            if has_value(dom, input, "accept") {
                cases.push(TestCase::new(
                    "File accept restrictions",
                    target(input),
                    ["Upload file outside accept list", "Upload allowed file"],
                    "Only accepted file extensions/types are allowed",
                ));
            }
        }

        for select in controls.iter().copied().filter(|n| tag_is(*n, "select")) {
            cases.push(TestCase::new(
                "Select list validation",
                target(select),
                ["Choose default option", "Select valid option", "Try invalid value"],
                "Selection requires valid option and default behaves as expected",
            ));
            if dom.attribute(select, "multiple").is_some() {
                cases.push(TestCase::new(
                    "Multi-select list behavior",
                    target(select),
                    ["Select multiple options", "Deselect option", "Submit form"],
                    "Multiple selections are preserved and validated",
                ));
            }
        }

        if let Some(checkbox) = inputs_of_type("checkbox").first() {
            cases.push(TestCase::new(
                "Checkbox states",
                target(*checkbox),
                ["Check", "Uncheck", "Submit form"],
                "Checkbox state saved and validated",
            ));
        }

        if let Some(radio) = inputs_of_type("radio").first() {
            cases.push(TestCase::new(
                "Radio group selection",
                target(*radio),
                ["Select option A", "Select option B", "Submit form"],
                "Only one option selectable at a time",
            ));
        }

        for control in controls.iter().copied() {
            cases.extend(self.attribute_cases(dom, control, &target));
        }

        for input in inputs_of_type("url") {
            cases.push(TestCase::new(
                "URL input validation",
                target(input),
                ["Enter invalid URL", "Enter valid URL", "Enter URL with query"],
                "Only valid URL formats are accepted",
            ));
        }

        for input in inputs_of_type("tel") {
            cases.push(TestCase::new(
                "Telephone input validation",
                target(input),
                ["Enter letters", "Enter intl number", "Enter formatted number"],
                "Only valid phone formats are accepted",
            ));
        }

        for textarea in controls.iter().copied().filter(|n| tag_is(*n, "textarea")) {
            cases.push(TestCase::new(
                "Textarea length handling",
                target(textarea),
                ["Enter long text", "Enter special characters", "Submit form"],
                "Textarea accepts allowed content and respects limits",
            ));
        }

        for editable in elements
            .iter()
            .copied()
            .filter(|n| dom.attribute(*n, "contenteditable") == Some("true"))
        {
            cases.push(TestCase::new(
                "Contenteditable input",
                target(editable),
                ["Enter formatted text", "Paste content", "Submit form"],
                "Editable region stores content safely",
            ));
        }

        if elements.iter().any(|n| tag_is(*n, "iframe")) {
            cases.push(TestCase::new(
                "Embedded iframe content",
                "iframe",
                ["Verify iframe loads", "Check permissions/sandbox", "Test interactions inside iframe"],
                "Iframe content loads securely and interactions work",
            ));
        }

        debug!(cases = cases.len(), controls = controls.len(), "page scan complete");
        cases
    }

    fn attribute_cases<D: DomTree + ?Sized>(
        &self,
        dom: &D,
        control: NodeId,
        target: &dyn Fn(NodeId) -> String,
    ) -> Vec<TestCase> {
        let mut cases = Vec::new();
        let present = |attr: &str| dom.attribute(control, attr).is_some();

        if present("disabled") || present("readonly") {
            cases.push(TestCase::new(
                "Disabled/readonly field handling",
                target(control),
                ["Try to focus", "Attempt input", "Submit form"],
                "Disabled or readonly fields block editing and behave consistently",
            ));
        }

        let autocomplete_off = dom.tag_name(control) == Some("input")
            && dom
                .attribute(control, "autocomplete")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("off"));
        if autocomplete_off {
            cases.push(TestCase::new(
                "Autocomplete disabled",
                target(control),
                ["Focus input", "Attempt browser autofill"],
                "Autocomplete is disabled for sensitive fields",
            ));
        }

        if present("required") {
            cases.push(TestCase::new(
                "Required field enforcement",
                target(control),
                ["Leave field empty", "Submit form"],
                "Required field blocks submission with clear error",
            ));
        }

        if let Some(min) = non_empty_attribute(dom, control, "minlength") {
            cases.push(TestCase::new(
                "Min length validation",
                target(control),
                [format!("Enter {} characters", offset_length(min, -1)), "Submit".to_string()],
                "Input shorter than min length is rejected",
            ));
        }

        if let Some(max) = non_empty_attribute(dom, control, "maxlength") {
            cases.push(TestCase::new(
                "Max length validation",
                target(control),
                [format!("Enter {} characters", offset_length(max, 1)), "Submit".to_string()],
                "Input longer than max length is rejected",
            ));
        }

        if has_value(dom, control, "pattern") {
            cases.push(TestCase::new(
                "Pattern validation",
                target(control),
                ["Enter invalid pattern value", "Enter valid pattern value"],
                "Pattern mismatch rejected and valid pattern accepted",
            ));
        }
        cases
    }
}

fn input_type<D: DomTree + ?Sized>(dom: &D, node: NodeId) -> String {
    dom.attribute(node, "type")
        .map_or_else(|| "text".to_string(), |kind| kind.trim().to_ascii_lowercase())
}

fn non_empty_attribute<'d, D: DomTree + ?Sized>(dom: &'d D, node: NodeId, attr: &str) -> Option<&'d str> {
    dom.attribute(node, attr).filter(|value| !value.is_empty())
}

fn has_value<D: DomTree + ?Sized>(dom: &D, node: NodeId, attr: &str) -> bool {
    non_empty_attribute(dom, node, attr).is_some()
}

/// Length attribute shifted by `delta`; non-numeric values stay verbatim
fn offset_length(value: &str, delta: i64) -> String {
    value
        .trim()
        .parse::<i64>()
        .map_or_else(|_| value.to_string(), |length| (length + delta).to_string())
}

/// Whether `href` points at a different origin than the page
fn is_external(page: Option<&str>, href: &str) -> bool {
    let base = page.and_then(|page| Url::parse(page).ok());
    let link = match &base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };
    match (link, base) {
        (Ok(link), Some(base)) => link.origin() != base.origin(),
        (Ok(link), None) => matches!(link.scheme(), "http" | "https"),
        (Err(_), _) => false,
    }
}

/// Scan with the default configuration
pub fn scan_page<D: DomTree + ?Sized>(dom: &D) -> Vec<TestCase> {
    PageScanner::default().scan(dom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dom::{Document, ElementSpec};

    fn titles(cases: &[TestCase]) -> Vec<&str> {
        cases.iter().map(|case| case.title.as_str()).collect()
    }

    fn page(body: ElementSpec) -> Document {
        Document::from_spec(ElementSpec::new("html").child(body)).with_url("https://shop.example/cart")
    }

    #[test]
    fn test_empty_page() {
        assert!(scan_page(&page(ElementSpec::new("body"))).is_empty());
    }

    #[test]
    fn test_login_form() {
        let doc = page(
            ElementSpec::new("body").child(
                ElementSpec::new("form")
                    .id("login")
                    .child(ElementSpec::new("input").id("email").attr("type", "email").attr("required", ""))
                    .child(ElementSpec::new("input").id("pw").attr("type", "password").attr("minlength", "8")),
            ),
        );
        let cases = scan_page(&doc);
        assert_eq!(
            titles(&cases),
            [
                "Form 1 validation",
                "Password field behavior",
                "Email format validation",
                "Required field enforcement",
                "Min length validation",
            ]
        );
        assert_eq!(cases[0].target, "#login");
        assert_eq!(cases[1].target, "#pw");
        assert_eq!(cases[4].steps, ["Enter 7 characters", "Submit"]);
    }

    #[test]
    fn test_first_checkbox_and_radio_only() {
        let doc = page(
            ElementSpec::new("body")
                .child(ElementSpec::new("input").attr("type", "checkbox").attr("name", "a"))
                .child(ElementSpec::new("input").attr("type", "checkbox").attr("name", "b"))
                .child(ElementSpec::new("input").attr("type", "radio").attr("name", "r")),
        );
        let cases = scan_page(&doc);
        assert_eq!(titles(&cases), ["Checkbox states", "Radio group selection"]);
        assert_eq!(cases[0].target, "input[name=\"a\"]:nth-of-type(1)");
    }

    #[test]
    fn test_file_and_select_variants() {
        let doc = page(
            ElementSpec::new("body")
                .child(ElementSpec::new("input").attr("type", "file").attr("accept", ".png"))
                .child(ElementSpec::new("select").attr("multiple", "")),
        );
        assert_eq!(
            titles(&scan_page(&doc)),
            [
                "File upload validation",
                "File accept restrictions",
                "Select list validation",
                "Multi-select list behavior",
            ]
        );
    }

    #[test]
    fn test_attribute_heuristics() {
        let doc = page(
            ElementSpec::new("body").child(
                ElementSpec::new("input")
                    .attr("readonly", "")
                    .attr("autocomplete", "OFF")
                    .attr("maxlength", "10")
                    .attr("pattern", "[0-9]+"),
            ),
        );
        let cases = scan_page(&doc);
        assert_eq!(
            titles(&cases),
            [
                "Disabled/readonly field handling",
                "Autocomplete disabled",
                "Max length validation",
                "Pattern validation",
            ]
        );
        assert_eq!(cases[2].steps[0], "Enter 11 characters");
    }

    #[test]
    fn test_search_links_editable_iframe() {
        let doc = page(
            ElementSpec::new("body")
                .child(ElementSpec::new("div").attr("role", "search"))
                .child(ElementSpec::new("a").attr("href", "/help"))
                .child(ElementSpec::new("a").attr("href", "https://elsewhere.example/"))
                .child(ElementSpec::new("div").attr("contenteditable", "true"))
                .child(ElementSpec::new("iframe").attr("src", "/embed")),
        );
        let cases = scan_page(&doc);
        assert_eq!(
            titles(&cases),
            [
                "Search behavior",
                "External link safety",
                "Contenteditable input",
                "Embedded iframe content",
            ]
        );
        assert_eq!(cases[0].target, SEARCH_SELECTOR);
    }

    #[test]
    fn test_external_origin_detection() {
        let page = Some("https://shop.example/cart");
        assert!(!is_external(page, "/help"));
        assert!(!is_external(page, "https://shop.example/other"));
        assert!(is_external(page, "http://shop.example/"));
        assert!(is_external(page, "https://cdn.shop.example/x"));
        assert!(is_external(page, "mailto:qa@shop.example"));
        assert!(!is_external(None, "/relative"));
        assert!(is_external(None, "https://elsewhere.example"));
    }

    #[test]
    fn test_offset_length() {
        assert_eq!(offset_length("8", -1), "7");
        assert_eq!(offset_length("abc", 1), "abc");
    }
}
