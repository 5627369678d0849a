//! Target dialects and action verbs.
//!
//! Thirteen surface dialects fold onto seven snippet families for passive
//! and strategy snippets, and onto four code-generation back-ends for
//! action snippets. Every lookup is an exhaustive `match`, so adding a
//! variant is a compile error until each table covers it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::result::LocsmithError;

/// Automation grammar a snippet is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dialect {
    /// Raw CSS locator
    #[serde(rename = "css")]
    Css,
    /// Playwright `page.locator`
    #[serde(rename = "playwright")]
    Playwright,
    /// Playwright `page.locator` (TypeScript)
    #[serde(rename = "playwright-ts")]
    PlaywrightTs,
    /// Playwright `getByRole`
    #[serde(rename = "playwright-role")]
    PlaywrightRole,
    /// Playwright `getByLabel`
    #[serde(rename = "playwright-label")]
    PlaywrightLabel,
    /// Playwright `getByTestId`
    #[serde(rename = "playwright-testid")]
    PlaywrightTestId,
    /// Playwright `frameLocator`
    #[serde(rename = "playwright-frame")]
    PlaywrightFrame,
    /// Absolute XPath
    #[serde(rename = "xpath")]
    XPath,
    /// Cypress `cy.get`
    #[serde(rename = "cypress")]
    Cypress,
    /// Cypress `cy.get` (TypeScript)
    #[serde(rename = "cypress-ts")]
    CypressTs,
    /// selenium-webdriver for JavaScript
    #[serde(rename = "selenium-js")]
    SeleniumJs,
    /// selenium-webdriver for TypeScript
    #[serde(rename = "selenium-ts")]
    SeleniumTs,
    /// Plain DOM APIs
    #[serde(rename = "js")]
    Js,
}

/// Formatting family of passive and strategy snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnippetFamily {
    /// The locator itself
    Raw,
    /// `page.locator(...)`
    Playwright,
    /// Playwright locators recomputed from element semantics
    PlaywrightSemantic,
    /// Absolute XPath of the element
    XPath,
    /// `cy.get(...)`
    Cypress,
    /// `driver.findElement(By.css(...))`
    Selenium,
    /// `document.querySelector(...)`
    VanillaJs,
}

/// Code-generation back-end of action snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionBackend {
    /// Playwright locator actions
    Playwright,
    /// Cypress commands
    Cypress,
    /// selenium-webdriver actions API
    Selenium,
    /// Synthetic DOM events
    BrowserEvents,
}

impl Dialect {
    /// All dialects in preview order
    pub const ALL: [Self; 13] = [
        Self::Css,
        Self::Playwright,
        Self::PlaywrightTs,
        Self::PlaywrightRole,
        Self::PlaywrightLabel,
        Self::PlaywrightTestId,
        Self::PlaywrightFrame,
        Self::XPath,
        Self::Cypress,
        Self::CypressTs,
        Self::SeleniumJs,
        Self::SeleniumTs,
        Self::Js,
    ];

    /// Dialects offered for action snippets
    pub const ACTION_TARGETS: [Self; 7] = [
        Self::Playwright,
        Self::PlaywrightTs,
        Self::Cypress,
        Self::CypressTs,
        Self::SeleniumJs,
        Self::SeleniumTs,
        Self::Js,
    ];

    /// Wire identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Playwright => "playwright",
            Self::PlaywrightTs => "playwright-ts",
            Self::PlaywrightRole => "playwright-role",
            Self::PlaywrightLabel => "playwright-label",
            Self::PlaywrightTestId => "playwright-testid",
            Self::PlaywrightFrame => "playwright-frame",
            Self::XPath => "xpath",
            Self::Cypress => "cypress",
            Self::CypressTs => "cypress-ts",
            Self::SeleniumJs => "selenium-js",
            Self::SeleniumTs => "selenium-ts",
            Self::Js => "js",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Css => "CSS selector",
            Self::Playwright => "Playwright (CSS)",
            Self::PlaywrightTs => "Playwright (TypeScript)",
            Self::PlaywrightRole => "Playwright (getByRole)",
            Self::PlaywrightLabel => "Playwright (getByLabel)",
            Self::PlaywrightTestId => "Playwright (getByTestId)",
            Self::PlaywrightFrame => "Playwright (iframe)",
            Self::XPath => "XPath",
            Self::Cypress => "Cypress (CSS)",
            Self::CypressTs => "Cypress (TypeScript)",
            Self::SeleniumJs => "Selenium (JavaScript)",
            Self::SeleniumTs => "Selenium (TypeScript)",
            Self::Js => "Vanilla JS",
        }
    }

    /// Snippet family used by passive and strategy formatting
    #[must_use]
    pub const fn family(self) -> SnippetFamily {
        match self {
            Self::Css => SnippetFamily::Raw,
            Self::Playwright | Self::PlaywrightTs => SnippetFamily::Playwright,
            Self::PlaywrightRole
            | Self::PlaywrightLabel
            | Self::PlaywrightTestId
            | Self::PlaywrightFrame => SnippetFamily::PlaywrightSemantic,
            Self::XPath => SnippetFamily::XPath,
            Self::Cypress | Self::CypressTs => SnippetFamily::Cypress,
            Self::SeleniumJs | Self::SeleniumTs => SnippetFamily::Selenium,
            Self::Js => SnippetFamily::VanillaJs,
        }
    }

    /// Back-end used by action formatting
    #[must_use]
    pub const fn action_backend(self) -> ActionBackend {
        match self {
            Self::Playwright
            | Self::PlaywrightTs
            | Self::PlaywrightRole
            | Self::PlaywrightLabel
            | Self::PlaywrightTestId
            | Self::PlaywrightFrame => ActionBackend::Playwright,
            Self::Cypress | Self::CypressTs => ActionBackend::Cypress,
            Self::SeleniumJs | Self::SeleniumTs => ActionBackend::Selenium,
            Self::Css | Self::XPath | Self::Js => ActionBackend::BrowserEvents,
        }
    }

    /// Whether strategy formatting recomputes a locator from the element
    #[must_use]
    pub const fn is_semantic(self) -> bool {
        matches!(
            self.family(),
            SnippetFamily::PlaywrightSemantic | SnippetFamily::XPath
        )
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = LocsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LocsmithError::UnknownDialect {
                name: s.to_string(),
            })
    }
}

/// Interaction intent rendered by action snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ActionVerb {
    /// Single left click
    #[default]
    Click,
    /// Double click
    DoubleClick,
    /// Triple click
    TripleClick,
    /// Pointer hover
    Hover,
    /// Context-menu click
    RightClick,
    /// Press and hold
    LongPress,
    /// Swipe towards a second element
    Swipe,
    /// Drag onto a second element
    Drag,
    /// Attach a file to an input
    FileUpload,
    /// Fill text
    Type,
    /// Choose a select option
    SelectOption,
    /// Tick a checkbox
    Check,
    /// Untick a checkbox
    Uncheck,
    /// Press Enter
    PressEnter,
    /// Press Escape
    PressEscape,
    /// Press Tab
    PressTab,
    /// Scroll the element into view
    ScrollIntoView,
}

impl ActionVerb {
    /// All verbs in menu order
    pub const ALL: [Self; 17] = [
        Self::Click,
        Self::DoubleClick,
        Self::TripleClick,
        Self::Hover,
        Self::RightClick,
        Self::LongPress,
        Self::Swipe,
        Self::Drag,
        Self::FileUpload,
        Self::Type,
        Self::SelectOption,
        Self::Check,
        Self::Uncheck,
        Self::PressEnter,
        Self::PressEscape,
        Self::PressTab,
        Self::ScrollIntoView,
    ];

    /// Wire identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "double",
            Self::TripleClick => "triple",
            Self::Hover => "hover",
            Self::RightClick => "right",
            Self::LongPress => "long-press",
            Self::Swipe => "swipe",
            Self::Drag => "drag",
            Self::FileUpload => "file-upload",
            Self::Type => "type",
            Self::SelectOption => "select",
            Self::Check => "check",
            Self::Uncheck => "uncheck",
            Self::PressEnter => "key-enter",
            Self::PressEscape => "key-escape",
            Self::PressTab => "key-tab",
            Self::ScrollIntoView => "scroll",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Click => "Click",
            Self::DoubleClick => "Double click",
            Self::TripleClick => "Triple click",
            Self::Hover => "Hover",
            Self::RightClick => "Right click",
            Self::LongPress => "Long press",
            Self::Swipe => "Swipe",
            Self::Drag => "Drag & drop",
            Self::FileUpload => "File upload",
            Self::Type => "Type",
            Self::SelectOption => "Select option",
            Self::Check => "Check",
            Self::Uncheck => "Uncheck",
            Self::PressEnter => "Press Enter",
            Self::PressEscape => "Press Escape",
            Self::PressTab => "Press Tab",
            Self::ScrollIntoView => "Scroll into view",
        }
    }

    /// Whether the snippet needs a second locator the engine cannot know
    #[must_use]
    pub const fn needs_target(self) -> bool {
        matches!(self, Self::Swipe | Self::Drag)
    }

    /// Parse a wire id or a long-form alias
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        if let Some(verb) = Self::ALL.into_iter().find(|verb| verb.as_str() == id) {
            return Some(verb);
        }
        let verb = match id.as_str() {
            "double-click" | "dblclick" => Self::DoubleClick,
            "triple-click" => Self::TripleClick,
            "right-click" | "context-click" => Self::RightClick,
            "longpress" | "long-click" => Self::LongPress,
            "drag-and-drop" | "drag-drop" => Self::Drag,
            "upload" | "file" => Self::FileUpload,
            "fill" => Self::Type,
            "select-option" => Self::SelectOption,
            "press-enter" | "enter" => Self::PressEnter,
            "press-escape" | "escape" | "esc" => Self::PressEscape,
            "press-tab" | "tab" => Self::PressTab,
            "scroll-into-view" => Self::ScrollIntoView,
            _ => return None,
        };
        Some(verb)
    }

    /// Parse an id, treating anything unrecognized as a click
    #[must_use]
    pub fn parse_lenient(id: &str) -> Self {
        Self::from_id(id).unwrap_or_default()
    }
}

impl fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionVerb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionVerb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&id))
    }
}
