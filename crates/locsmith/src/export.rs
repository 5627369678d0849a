//! Test case export.
//!
//! Renders scanned [`TestCase`]s as documentation (Markdown, Gherkin, Jira
//! wiki markup, plain text), data (JSON, CSV) or runnable script skeletons
//! (Playwright, Cypress).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::format::js_quote;
use crate::result::{LocsmithError, LocsmithResult};
use crate::scan::TestCase;

const UNTITLED: &str = "Test case";

/// Output layout for a list of test cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Markdown sections
    Markdown,
    /// Gherkin scenarios
    Gherkin,
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
    /// Plain numbered text
    Txt,
    /// Jira wiki markup
    Jira,
    /// Playwright test file
    Playwright,
    /// Cypress spec file
    Cypress,
}

impl ExportFormat {
    /// All formats
    pub const ALL: [Self; 8] = [
        Self::Markdown,
        Self::Gherkin,
        Self::Json,
        Self::Csv,
        Self::Txt,
        Self::Jira,
        Self::Playwright,
        Self::Cypress,
    ];

    /// Identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Gherkin => "gherkin",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Jira => "jira",
            Self::Playwright => "playwright",
            Self::Cypress => "cypress",
        }
    }

    /// Render the cases
    pub fn render(self, cases: &[TestCase]) -> LocsmithResult<String> {
        Ok(match self {
            Self::Markdown => to_markdown(cases),
            Self::Gherkin => to_gherkin(cases),
            Self::Json => serde_json::to_string_pretty(cases)?,
            Self::Csv => to_csv(cases)?,
            Self::Txt => to_txt(cases),
            Self::Jira => to_jira(cases),
            Self::Playwright => to_playwright(cases),
            Self::Cypress => to_cypress(cases),
        })
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = LocsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "md" => "markdown",
            "feature" => "gherkin",
            "text" => "txt",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == alias)
            .ok_or_else(|| LocsmithError::UnknownFormat {
                name: s.to_string(),
            })
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn title(case: &TestCase) -> &str {
    if case.title.is_empty() {
        UNTITLED
    } else {
        &case.title
    }
}

fn bullets(steps: &[String], marker: &str) -> String {
    if steps.is_empty() {
        return "-".to_string();
    }
    steps
        .iter()
        .map(|step| format!("{marker} {step}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn to_markdown(cases: &[TestCase]) -> String {
    cases
        .iter()
        .enumerate()
        .map(|(index, case)| {
            format!(
                "### {}. {}\n**Target:** {}\n\n**Steps:**\n{}\n\n**Expected:** {}",
                index + 1,
                title(case),
                or_dash(&case.target),
                bullets(&case.steps, "-"),
                or_dash(&case.expected)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn to_txt(cases: &[TestCase]) -> String {
    cases
        .iter()
        .enumerate()
        .map(|(index, case)| {
            format!(
                "{}. {}\nTarget: {}\nSteps:\n{}\nExpected: {}",
                index + 1,
                title(case),
                or_dash(&case.target),
                bullets(&case.steps, "-"),
                or_dash(&case.expected)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn to_jira(cases: &[TestCase]) -> String {
    cases
        .iter()
        .map(|case| {
            format!(
                "h3. {}\n*Target:* {}\n*Steps:*\n{}\n*Expected:* {}",
                title(case),
                or_dash(&case.target),
                bullets(&case.steps, "*"),
                or_dash(&case.expected)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn to_gherkin(cases: &[TestCase]) -> String {
    cases
        .iter()
        .enumerate()
        .map(|(index, case)| {
            let given = if case.target.is_empty() {
                "the element"
            } else {
                &case.target
            };
            let (first, rest) = case
                .steps
                .split_first()
                .map_or(("the user interacts", &[][..]), |(first, rest)| {
                    (first.as_str(), rest)
                });
            let mut lines = vec![
                format!("Scenario: {} - {}", index + 1, title(case)),
                format!("  Given {given}"),
                format!("  When {first}"),
            ];
            lines.extend(rest.iter().map(|step| format!("  And {step}")));
            if !case.expected.is_empty() {
                lines.push(format!("  Then {}", case.expected));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn to_csv(cases: &[TestCase]) -> LocsmithResult<String> {
    let mut rows = vec!["title,target,steps,expected".to_string()];
    for case in cases {
        let fields = [
            serde_json::to_string(title(case))?,
            serde_json::to_string(&case.target)?,
            serde_json::to_string(&case.steps.join(" | "))?,
            serde_json::to_string(&case.expected)?,
        ];
        rows.push(fields.join(","));
    }
    Ok(rows.join("\n"))
}

/// Script action implied by a step's wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepAction {
    Submit,
    Fill,
    Select,
    Check,
    Click,
}

impl StepAction {
    fn from_step(step: &str) -> Self {
        let text = step.to_lowercase();
        if text.contains("submit") {
            Self::Submit
        } else if text.contains("type") || text.contains("enter") {
            Self::Fill
        } else if text.contains("select") {
            Self::Select
        } else if text.contains("check") {
            Self::Check
        } else {
            Self::Click
        }
    }
}

fn comment<'a>(step: &'a str, fallback: &'a str) -> &'a str {
    if step.is_empty() {
        fallback
    } else {
        step
    }
}

fn playwright_line(target: &str, step: &str) -> String {
    if target.is_empty() {
        return format!("  // {}", comment(step, "step"));
    }
    let on = format!("  await page.locator('{}')", js_quote(target));
    match StepAction::from_step(step) {
        StepAction::Fill => format!("{on}.fill(''); // {}", comment(step, "fill")),
        StepAction::Check => format!("{on}.check(); // {}", comment(step, "check")),
        StepAction::Select => format!("{on}.selectOption(''); // {}", comment(step, "select")),
        StepAction::Submit => format!("{on}.press('Enter'); // {}", comment(step, "submit")),
        StepAction::Click => format!("{on}.click(); // {}", comment(step, "click")),
    }
}

fn cypress_line(target: &str, step: &str) -> String {
    if target.is_empty() {
        return format!("    // {}", comment(step, "step"));
    }
    let on = format!("    cy.get('{}')", js_quote(target));
    match StepAction::from_step(step) {
        StepAction::Fill => format!("{on}.type(''); // {}", comment(step, "type")),
        StepAction::Check => format!("{on}.check(); // {}", comment(step, "check")),
        StepAction::Select => format!("{on}.select(''); // {}", comment(step, "select")),
        StepAction::Submit => format!("{on}.type('{{enter}}'); // {}", comment(step, "submit")),
        StepAction::Click => format!("{on}.click(); // {}", comment(step, "click")),
    }
}

fn script_body(cases: &[TestCase], indent: &str, line: fn(&str, &str) -> String) -> Vec<String> {
    cases
        .iter()
        .flat_map(|case| {
            if case.steps.is_empty() {
                vec![format!("{indent}// {}", title(case))]
            } else {
                case.steps
                    .iter()
                    .map(|step| line(&case.target, step))
                    .collect()
            }
        })
        .collect()
}

fn to_playwright(cases: &[TestCase]) -> String {
    let mut lines = vec![
        "import { test, expect } from '@playwright/test';".to_string(),
        String::new(),
        "test('qa generated cases', async ({ page }) => {".to_string(),
    ];
    lines.extend(script_body(cases, "  ", playwright_line));
    lines.push("});".to_string());
    lines.join("\n")
}

fn to_cypress(cases: &[TestCase]) -> String {
    let mut lines = vec![
        "describe('qa generated cases', () => {".to_string(),
        "  it('runs generated steps', () => {".to_string(),
    ];
    lines.extend(script_body(cases, "    ", cypress_line));
    lines.push("  });".to_string());
    lines.push("});".to_string());
    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cases() -> Vec<TestCase> {
        vec![
            TestCase::new(
                "Email format validation",
                "#email",
                ["Enter invalid email", "Submit form"],
                "Invalid formats rejected",
            ),
            TestCase::new("", "", Vec::<String>::new(), ""),
        ]
    }

    #[test]
    fn test_parse_formats() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(LocsmithError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_markdown() {
        let out = ExportFormat::Markdown.render(&cases()).unwrap();
        assert_eq!(
            out,
            "### 1. Email format validation\n**Target:** #email\n\n**Steps:**\n- Enter invalid email\n- Submit form\n\n**Expected:** Invalid formats rejected\n\n### 2. Test case\n**Target:** -\n\n**Steps:**\n-\n\n**Expected:** -"
        );
    }

    #[test]
    fn test_txt_and_jira() {
        let txt = ExportFormat::Txt.render(&cases()[..1]).unwrap();
        assert_eq!(
            txt,
            "1. Email format validation\nTarget: #email\nSteps:\n- Enter invalid email\n- Submit form\nExpected: Invalid formats rejected"
        );
        let jira = ExportFormat::Jira.render(&cases()[..1]).unwrap();
        assert!(jira.starts_with("h3. Email format validation\n*Target:* #email\n*Steps:*\n* Enter invalid email"));
    }

    #[test]
    fn test_gherkin() {
        let out = ExportFormat::Gherkin.render(&cases()).unwrap();
        assert_eq!(
            out,
            "Scenario: 1 - Email format validation\n  Given #email\n  When Enter invalid email\n  And Submit form\n  Then Invalid formats rejected\n\nScenario: 2 - Test case\n  Given the element\n  When the user interacts"
        );
    }

    #[test]
    fn test_csv_quotes_like_json() {
        let mut rows = cases();
        rows[0].target = "input[name=\"q\"]".to_string();
        let out = ExportFormat::Csv.render(&rows).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "title,target,steps,expected");
        assert_eq!(
            lines[1],
            "\"Email format validation\",\"input[name=\\\"q\\\"]\",\"Enter invalid email | Submit form\",\"Invalid formats rejected\""
        );
        assert_eq!(lines[2], "\"Test case\",\"\",\"\",\"\"");
    }

    #[test]
    fn test_json_round_trips() {
        let out = ExportFormat::Json.render(&cases()).unwrap();
        let back: Vec<TestCase> = serde_json::from_str(&out).unwrap();
        assert_eq!(back, cases());
    }

    #[test]
    fn test_playwright_script() {
        let out = ExportFormat::Playwright.render(&cases()).unwrap();
        assert_eq!(
            out,
            "import { test, expect } from '@playwright/test';\n\ntest('qa generated cases', async ({ page }) => {\n  await page.locator('#email').fill(''); // Enter invalid email\n  await page.locator('#email').press('Enter'); // Submit form\n  // Test case\n});"
        );
    }

    #[test]
    fn test_cypress_script() {
        let out = ExportFormat::Cypress.render(&cases()).unwrap();
        assert!(out.contains("    cy.get('#email').type(''); // Enter invalid email"));
        assert!(out.contains("    cy.get('#email').type('{enter}'); // Submit form"));
        assert!(out.ends_with("  });\n});"));
    }

    #[test]
    fn test_step_actions() {
        assert_eq!(StepAction::from_step("Select option B"), StepAction::Select);
        assert_eq!(StepAction::from_step("Uncheck"), StepAction::Check);
        assert_eq!(StepAction::from_step("Toggle show/hide"), StepAction::Click);
        assert_eq!(StepAction::from_step("Type a name"), StepAction::Fill);
    }
}
