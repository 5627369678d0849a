//! Dialect formatting.
//!
//! Three forms, all pure functions of their inputs:
//!
//! - **passive**: `(locator, dialect)`, a neutral click snippet
//! - **strategy**: `(locator, dialect, element)`, semantic dialects rebuild
//!   their locator from the element and fall back to the passive snippet of
//!   their family when the semantic value is missing
//! - **action**: `(locator, dialect, verb)`, one template per back-end and verb
//!
//! An empty locator always formats to the empty string.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::descriptor::{accessible_name, frame_locator, infer_role, DescriptorExtractor};
use crate::dialect::{ActionBackend, ActionVerb, Dialect, SnippetFamily};
use crate::dom::{DomTree, NodeId};
use crate::synth::Synthesizer;

/// Escape text for a single-quoted JavaScript string literal
#[must_use]
pub fn js_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

/// One dialect's snippet in a preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    /// Dialect the snippet is written in
    pub dialect: Dialect,
    /// Snippet text
    pub snippet: String,
}

/// Locator recomputed from element semantics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLocator {
    /// ARIA role and accessible name
    Role {
        /// Role
        role: String,
        /// Accessible name
        name: String,
    },
    /// Accessible name for `getByLabel`
    Label(String),
    /// Test attribute value
    TestId(String),
    /// Locator of the hosting frame
    Frame(String),
    /// Absolute XPath
    XPath(String),
}

/// Renders snippets for every dialect and verb
#[derive(Debug, Clone)]
pub struct SnippetFormatter {
    target_placeholder: String,
    file_placeholder: String,
    synthesizer: Synthesizer,
    extractor: DescriptorExtractor,
}

impl Default for SnippetFormatter {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl SnippetFormatter {
    /// Create a formatter from configuration
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            target_placeholder: config.target_placeholder.clone(),
            file_placeholder: config.file_placeholder.clone(),
            synthesizer: Synthesizer::new(config),
            extractor: DescriptorExtractor::new(config),
        }
    }

    /// Neutral click snippet
    #[must_use]
    pub fn passive(&self, locator: &str, dialect: Dialect) -> String {
        if locator.is_empty() {
            return String::new();
        }
        let q = js_quote(locator);
        match dialect.family() {
            SnippetFamily::Raw | SnippetFamily::XPath => locator.to_string(),
            SnippetFamily::Playwright | SnippetFamily::PlaywrightSemantic => {
                format!("await page.locator('{q}').click();")
            }
            SnippetFamily::Cypress => format!("cy.get('{q}').click();"),
            SnippetFamily::Selenium => format!("await driver.findElement(By.css('{q}')).click();"),
            SnippetFamily::VanillaJs => format!("document.querySelector('{q}')?.click();"),
        }
    }

    /// Semantic locator of the element for a semantic dialect.
    ///
    /// `playwright-role` needs both a role and an accessible name; a role
    /// without a name yields `None`, so the strategy form falls back to the
    /// structural snippet rather than emitting a bare `getByRole('<role>')`.
    pub fn semantic_locator<D: DomTree + ?Sized>(
        &self,
        dom: &D,
        node: NodeId,
        dialect: Dialect,
    ) -> Option<SemanticLocator> {
        if !dom.is_element(node) {
            return None;
        }
        let non_empty = |value: String| (!value.is_empty()).then_some(value);
        match dialect {
            Dialect::PlaywrightRole => {
                let role = infer_role(dom, node)?;
                let name = non_empty(accessible_name(dom, node))?;
                Some(SemanticLocator::Role { role, name })
            }
            Dialect::PlaywrightLabel => {
                non_empty(accessible_name(dom, node)).map(SemanticLocator::Label)
            }
            Dialect::PlaywrightTestId => self
                .extractor
                .test_id(dom, node)
                .map(SemanticLocator::TestId),
            Dialect::PlaywrightFrame => non_empty(frame_locator(dom)).map(SemanticLocator::Frame),
            Dialect::XPath => self
                .synthesizer
                .absolute(dom, node)
                .map(|locator| SemanticLocator::XPath(locator.into_string())),
            Dialect::Css
            | Dialect::Playwright
            | Dialect::PlaywrightTs
            | Dialect::Cypress
            | Dialect::CypressTs
            | Dialect::SeleniumJs
            | Dialect::SeleniumTs
            | Dialect::Js => None,
        }
    }

    /// Snippet using the element's semantics where the dialect allows
    pub fn strategy<D: DomTree + ?Sized>(
        &self,
        locator: &str,
        dialect: Dialect,
        dom: &D,
        node: Option<NodeId>,
    ) -> String {
        if locator.is_empty() {
            return String::new();
        }
        let semantic = node
            .filter(|_| dialect.is_semantic())
            .and_then(|node| self.semantic_locator(dom, node, dialect));
        match semantic {
            Some(semantic) => render_semantic(locator, &semantic),
            None => self.passive(locator, dialect),
        }
    }

    /// Snippet performing `verb` on the located element
    #[must_use]
    pub fn action(&self, locator: &str, dialect: Dialect, verb: ActionVerb) -> String {
        if locator.is_empty() {
            return String::new();
        }
        let q = js_quote(locator);
        let target = js_quote(&self.target_placeholder);
        let file = js_quote(&self.file_placeholder);
        match dialect.action_backend() {
            ActionBackend::Playwright => playwright_action(&q, verb, &target, &file),
            ActionBackend::Cypress => cypress_action(&q, verb, &target, &file),
            ActionBackend::Selenium => selenium_action(&q, verb, &target, &file),
            ActionBackend::BrowserEvents => browser_events_action(&q, verb),
        }
    }

    /// Strategy snippets for each dialect, in the given order
    pub fn preview<D: DomTree + ?Sized>(
        &self,
        dom: &D,
        node: Option<NodeId>,
        locator: &str,
        dialects: &[Dialect],
    ) -> Vec<PreviewEntry> {
        dialects
            .iter()
            .map(|dialect| PreviewEntry {
                dialect: *dialect,
                snippet: self.strategy(locator, *dialect, dom, node),
            })
            .collect()
    }
}

fn render_semantic(locator: &str, semantic: &SemanticLocator) -> String {
    match semantic {
        SemanticLocator::Role { role, name } => format!(
            "await page.getByRole('{}', {{ name: '{}' }}).click();",
            js_quote(role),
            js_quote(name)
        ),
        SemanticLocator::Label(name) => {
            format!("await page.getByLabel('{}').fill('');", js_quote(name))
        }
        SemanticLocator::TestId(test_id) => {
            format!("await page.getByTestId('{}').click();", js_quote(test_id))
        }
        SemanticLocator::Frame(frame) => format!(
            "await page.frameLocator('{}').locator('{}').click();",
            js_quote(frame),
            js_quote(locator)
        ),
        SemanticLocator::XPath(xpath) => xpath.clone(),
    }
}

fn playwright_action(q: &str, verb: ActionVerb, target: &str, file: &str) -> String {
    let on = |call: &str| format!("await page.locator('{q}').{call};");
    match verb {
        ActionVerb::Click => on("click()"),
        ActionVerb::DoubleClick => on("dblclick()"),
        ActionVerb::TripleClick => on("click({ clickCount: 3 })"),
        ActionVerb::Hover => on("hover()"),
        ActionVerb::RightClick => on("click({ button: 'right' })"),
        ActionVerb::LongPress => on("click({ delay: 1000 })"),
        ActionVerb::Swipe | ActionVerb::Drag => {
            on(&format!("dragTo(page.locator('{target}'))"))
        }
        ActionVerb::FileUpload => format!("await page.setInputFiles('{q}', '{file}');"),
        ActionVerb::Type => on("fill('')"),
        ActionVerb::SelectOption => on("selectOption('')"),
        ActionVerb::Check => on("check()"),
        ActionVerb::Uncheck => on("uncheck()"),
        ActionVerb::PressEnter => on("press('Enter')"),
        ActionVerb::PressEscape => on("press('Escape')"),
        ActionVerb::PressTab => on("press('Tab')"),
        ActionVerb::ScrollIntoView => on("scrollIntoViewIfNeeded()"),
    }
}

fn cypress_action(q: &str, verb: ActionVerb, target: &str, file: &str) -> String {
    let on = |call: &str| format!("cy.get('{q}').{call};");
    match verb {
        ActionVerb::Click => on("click()"),
        ActionVerb::DoubleClick => on("dblclick()"),
        ActionVerb::TripleClick => on("click().click().click()"),
        ActionVerb::Hover => on("trigger('mouseover')"),
        ActionVerb::RightClick => on("rightclick()"),
        ActionVerb::LongPress => [
            on("trigger('mousedown')"),
            "cy.wait(1000);".to_string(),
            on("trigger('mouseup')"),
        ]
        .join("\n"),
        ActionVerb::Swipe => format!(
            "{}\ncy.get('{target}').trigger('pointermove').trigger('pointerup');",
            on("trigger('pointerdown')")
        ),
        ActionVerb::Drag => format!(
            "{}\ncy.get('{target}').trigger('mousemove').trigger('mouseup');",
            on("trigger('mousedown')")
        ),
        ActionVerb::FileUpload => on(&format!("selectFile('{file}')")),
        ActionVerb::Type => on("type('')"),
        ActionVerb::SelectOption => on("select('')"),
        ActionVerb::Check => on("check()"),
        ActionVerb::Uncheck => on("uncheck()"),
        ActionVerb::PressEnter => on("type('{enter}')"),
        ActionVerb::PressEscape => on("type('{esc}')"),
        ActionVerb::PressTab => on("type('{tab}')"),
        ActionVerb::ScrollIntoView => on("scrollIntoView()"),
    }
}

fn selenium_action(q: &str, verb: ActionVerb, target: &str, file: &str) -> String {
    let find = format!("driver.findElement(By.css('{q}'))");
    let on = |call: &str| format!("await {find}.{call};");
    let with_el = |lines: &[&str]| {
        let mut out = format!("const el = await {find};");
        for line in lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    };
    match verb {
        ActionVerb::Click | ActionVerb::Check | ActionVerb::Uncheck => on("click()"),
        ActionVerb::DoubleClick => with_el(&["await driver.actions().doubleClick(el).perform();"]),
        ActionVerb::TripleClick => {
            with_el(&["await el.click();", "await el.click();", "await el.click();"])
        }
        ActionVerb::Hover => with_el(&["await driver.actions().move({ origin: el }).perform();"]),
        ActionVerb::RightClick => with_el(&["await driver.actions().contextClick(el).perform();"]),
        ActionVerb::LongPress => with_el(&[
            "await driver.actions().clickAndHold(el).pause(1000).release().perform();",
        ]),
        ActionVerb::Swipe | ActionVerb::Drag => {
            let target_line = format!("const target = await driver.findElement(By.css('{target}'));");
            with_el(&[
                target_line.as_str(),
                "await driver.actions().dragAndDrop(el, target).perform();",
            ])
        }
        ActionVerb::FileUpload => on(&format!("sendKeys('{file}')")),
        ActionVerb::Type => on("sendKeys('')"),
        ActionVerb::SelectOption => on("sendKeys('OPTION_VALUE')"),
        ActionVerb::PressEnter => on("sendKeys(Key.ENTER)"),
        ActionVerb::PressEscape => on("sendKeys(Key.ESCAPE)"),
        ActionVerb::PressTab => on("sendKeys(Key.TAB)"),
        ActionVerb::ScrollIntoView => with_el(&[
            "await driver.executeScript('arguments[0].scrollIntoView({block: \"center\"});', el);",
        ]),
    }
}

fn browser_events_action(q: &str, verb: ActionVerb) -> String {
    let query = format!("document.querySelector('{q}')");
    let dispatch = |event: &str| format!("{query}?.dispatchEvent({event});");
    let with_el = |body: &str| format!("const el = {query};\nif (el) {{ {body} }}");
    match verb {
        ActionVerb::Click => format!("{query}?.click();"),
        ActionVerb::DoubleClick => dispatch("new MouseEvent('dblclick', { bubbles: true })"),
        ActionVerb::TripleClick => with_el("el.click(); el.click(); el.click();"),
        ActionVerb::Hover => dispatch("new MouseEvent('mouseover', { bubbles: true })"),
        ActionVerb::RightClick => dispatch("new MouseEvent('contextmenu', { bubbles: true })"),
        ActionVerb::LongPress => format!(
            "const el = {query};\nif (el) {{ el.dispatchEvent(new MouseEvent('mousedown', {{ bubbles: true }}));\nsetTimeout(() => el.dispatchEvent(new MouseEvent('mouseup', {{ bubbles: true }})), 1000); }}"
        ),
        ActionVerb::Swipe => {
            with_el("el.dispatchEvent(new PointerEvent('pointerdown', { bubbles: true }));")
        }
        ActionVerb::Drag => with_el("el.dispatchEvent(new DragEvent('dragstart', { bubbles: true }));"),
        ActionVerb::FileUpload => dispatch("new Event('change', { bubbles: true })"),
        ActionVerb::Type => with_el(
            "el.focus(); el.value = ''; el.dispatchEvent(new Event('input', { bubbles: true }));",
        ),
        ActionVerb::SelectOption => {
            with_el("el.value = ''; el.dispatchEvent(new Event('change', { bubbles: true }));")
        }
        ActionVerb::Check => {
            with_el("el.checked = true; el.dispatchEvent(new Event('change', { bubbles: true }));")
        }
        ActionVerb::Uncheck => {
            with_el("el.checked = false; el.dispatchEvent(new Event('change', { bubbles: true }));")
        }
        ActionVerb::PressEnter => {
            dispatch("new KeyboardEvent('keydown', { key: 'Enter', bubbles: true })")
        }
        ActionVerb::PressEscape => {
            dispatch("new KeyboardEvent('keydown', { key: 'Escape', bubbles: true })")
        }
        ActionVerb::PressTab => dispatch("new KeyboardEvent('keydown', { key: 'Tab', bubbles: true })"),
        ActionVerb::ScrollIntoView => {
            format!("{query}?.scrollIntoView({{ behavior: 'smooth', block: 'center' }});")
        }
    }
}

/// Passive snippet with the default configuration
#[must_use]
pub fn format_snippet(locator: &str, dialect: Dialect) -> String {
    SnippetFormatter::default().passive(locator, dialect)
}

/// Action snippet with the default configuration
#[must_use]
pub fn format_action(locator: &str, dialect: Dialect, verb: ActionVerb) -> String {
    SnippetFormatter::default().action(locator, dialect, verb)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dom::{Document, ElementSpec, FrameHost};

    // ========================================================================
    // Passive form
    // ========================================================================

    mod passive_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_templates() {
            let l = "form > input:nth-of-type(2)";
            assert_eq!(format_snippet(l, Dialect::Css), l);
            assert_eq!(format_snippet(l, Dialect::XPath), l);
            assert_eq!(
                format_snippet(l, Dialect::Playwright),
                "await page.locator('form > input:nth-of-type(2)').click();"
            );
            assert_eq!(
                format_snippet(l, Dialect::CypressTs),
                "cy.get('form > input:nth-of-type(2)').click();"
            );
            assert_eq!(
                format_snippet(l, Dialect::SeleniumJs),
                "await driver.findElement(By.css('form > input:nth-of-type(2)')).click();"
            );
            assert_eq!(
                format_snippet(l, Dialect::Js),
                "document.querySelector('form > input:nth-of-type(2)')?.click();"
            );
        }

        #[test]
        fn test_semantic_dialects_fall_back_to_playwright() {
            assert_eq!(
                format_snippet("#go", Dialect::PlaywrightRole),
                "await page.locator('#go').click();"
            );
        }

        #[test]
        fn test_empty_locator() {
            for dialect in Dialect::ALL {
                assert_eq!(format_snippet("", dialect), "");
            }
        }

        #[test]
        fn test_literal_escaping() {
            assert_eq!(
                format_snippet("input[name=\"it's\"]", Dialect::Cypress),
                "cy.get('input[name=\"it\\'s\"]').click();"
            );
            assert_eq!(
                format_snippet("#user\\.name", Dialect::Js),
                "document.querySelector('#user\\\\.name')?.click();"
            );
        }

        #[test]
        fn test_js_quote() {
            assert_eq!(js_quote("a'b\\c\nd"), "a\\'b\\\\c\\nd");
        }
    }

    // ========================================================================
    // Strategy form
    // ========================================================================

    mod strategy_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        fn doc() -> Document {
            Document::from_spec(
                ElementSpec::new("html").child(
                    ElementSpec::new("body")
                        .child(ElementSpec::new("button").attr("aria-label", "Save").attr("data-testid", "save-btn"))
                        .child(ElementSpec::new("input").id("email").attr("type", "email"))
                        .child(ElementSpec::new("div").child(ElementSpec::new("span"))),
                ),
            )
            .with_frame_host(FrameHost::new().attr("title", "checkout"))
        }

        fn strategy(dialect: Dialect, selector: &str, locator: &str) -> String {
            let doc = doc();
            let node = doc.query_selector(selector).unwrap();
            SnippetFormatter::default().strategy(locator, dialect, &doc, node)
        }

        #[test]
        fn test_role_with_name() {
            assert_eq!(
                strategy(Dialect::PlaywrightRole, "button", "button"),
                "await page.getByRole('button', { name: 'Save' }).click();"
            );
        }

        #[test]
        fn test_role_without_name_falls_back() {
            assert_eq!(
                strategy(Dialect::PlaywrightRole, "#email", "#email"),
                "await page.locator('#email').click();"
            );
        }

        #[test]
        fn test_label() {
            assert_eq!(
                strategy(Dialect::PlaywrightLabel, "button", "button"),
                "await page.getByLabel('Save').fill('');"
            );
            assert_eq!(
                strategy(Dialect::PlaywrightLabel, "span", "span"),
                "await page.locator('span').click();"
            );
        }

        #[test]
        fn test_test_id() {
            assert_eq!(
                strategy(Dialect::PlaywrightTestId, "button", "button"),
                "await page.getByTestId('save-btn').click();"
            );
        }

        #[test]
        fn test_frame() {
            assert_eq!(
                strategy(Dialect::PlaywrightFrame, "span", "div > span"),
                "await page.frameLocator('iframe[title=\"checkout\"]').locator('div > span').click();"
            );
        }

        #[test]
        fn test_xpath() {
            assert_eq!(
                strategy(Dialect::XPath, "span", "span"),
                "/html/body[1]/div[1]/span[1]"
            );
            assert_eq!(strategy(Dialect::XPath, "#email", "#email"), "//*[@id=\"email\"]");
        }

        #[test]
        fn test_non_semantic_dialects_ignore_element() {
            assert_eq!(strategy(Dialect::Cypress, "button", "button"), "cy.get('button').click();");
        }

        #[test]
        fn test_without_element() {
            let doc = doc();
            let formatter = SnippetFormatter::default();
            assert_eq!(
                formatter.strategy("#x", Dialect::PlaywrightTestId, &doc, None),
                "await page.locator('#x').click();"
            );
            assert_eq!(formatter.strategy("", Dialect::XPath, &doc, doc.body()), "");
        }

        #[test]
        fn test_preview_order() {
            let doc = doc();
            let body = doc.body();
            let preview = SnippetFormatter::default().preview(&doc, body, "body", &Dialect::ALL);
            let dialects: Vec<_> = preview.iter().map(|entry| entry.dialect).collect();
            assert_eq!(dialects, Dialect::ALL);
            assert!(preview.iter().all(|entry| !entry.snippet.is_empty()));
        }
    }

    // ========================================================================
    // Action form
    // ========================================================================

    mod action_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_playwright() {
            assert_eq!(
                format_action("#a", Dialect::PlaywrightTs, ActionVerb::RightClick),
                "await page.locator('#a').click({ button: 'right' });"
            );
            assert_eq!(
                format_action("#a", Dialect::Playwright, ActionVerb::Drag),
                "await page.locator('#a').dragTo(page.locator('TARGET_SELECTOR'));"
            );
            assert_eq!(
                format_action("#a", Dialect::Playwright, ActionVerb::FileUpload),
                "await page.setInputFiles('#a', 'path/to/file');"
            );
            assert_eq!(
                format_action("#a", Dialect::PlaywrightRole, ActionVerb::ScrollIntoView),
                "await page.locator('#a').scrollIntoViewIfNeeded();"
            );
        }

        #[test]
        fn test_cypress() {
            assert_eq!(
                format_action("#a", Dialect::Cypress, ActionVerb::LongPress),
                "cy.get('#a').trigger('mousedown');\ncy.wait(1000);\ncy.get('#a').trigger('mouseup');"
            );
            assert_eq!(
                format_action("#a", Dialect::Cypress, ActionVerb::Swipe),
                "cy.get('#a').trigger('pointerdown');\ncy.get('TARGET_SELECTOR').trigger('pointermove').trigger('pointerup');"
            );
            assert_eq!(
                format_action("#a", Dialect::CypressTs, ActionVerb::PressEscape),
                "cy.get('#a').type('{esc}');"
            );
        }

        #[test]
        fn test_selenium() {
            assert_eq!(
                format_action("#a", Dialect::SeleniumTs, ActionVerb::Drag),
                "const el = await driver.findElement(By.css('#a'));\nconst target = await driver.findElement(By.css('TARGET_SELECTOR'));\nawait driver.actions().dragAndDrop(el, target).perform();"
            );
            assert_eq!(
                format_action("#a", Dialect::SeleniumJs, ActionVerb::SelectOption),
                "await driver.findElement(By.css('#a')).sendKeys('OPTION_VALUE');"
            );
            assert_eq!(
                format_action("#a", Dialect::SeleniumJs, ActionVerb::ScrollIntoView),
                "const el = await driver.findElement(By.css('#a'));\nawait driver.executeScript('arguments[0].scrollIntoView({block: \"center\"});', el);"
            );
        }

        #[test]
        fn test_browser_events() {
            assert_eq!(
                format_action("#a", Dialect::Js, ActionVerb::Check),
                "const el = document.querySelector('#a');\nif (el) { el.checked = true; el.dispatchEvent(new Event('change', { bubbles: true })); }"
            );
            assert_eq!(
                format_action("#a", Dialect::XPath, ActionVerb::PressTab),
                "document.querySelector('#a')?.dispatchEvent(new KeyboardEvent('keydown', { key: 'Tab', bubbles: true }));"
            );
            assert_eq!(
                format_action("#a", Dialect::Css, ActionVerb::LongPress),
                "const el = document.querySelector('#a');\nif (el) { el.dispatchEvent(new MouseEvent('mousedown', { bubbles: true }));\nsetTimeout(() => el.dispatchEvent(new MouseEvent('mouseup', { bubbles: true })), 1000); }"
            );
        }

        #[test]
        fn test_unknown_verb_is_click() {
            let verb = ActionVerb::parse_lenient("pinch-zoom");
            assert_eq!(
                format_action("#a", Dialect::Cypress, verb),
                "cy.get('#a').click();"
            );
        }

        #[test]
        fn test_every_pair_non_empty() {
            for dialect in Dialect::ALL {
                for verb in ActionVerb::ALL {
                    assert!(!format_action("#a", dialect, verb).is_empty());
                    assert_eq!(format_action("", dialect, verb), "");
                }
            }
        }

        #[test]
        fn test_custom_placeholders() {
            let config = EngineConfig::default().with_target_placeholder("DROP_HERE");
            let formatter = SnippetFormatter::new(&config);
            assert!(formatter
                .action("#a", Dialect::Cypress, ActionVerb::Drag)
                .contains("cy.get('DROP_HERE')"));
        }
    }
}
