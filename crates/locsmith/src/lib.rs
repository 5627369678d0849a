//! Locsmith: Element Locators and Test Snippets for Web Pages
//!
//! Locsmith turns a point of interest in a live document into something a
//! test can use: a locator that finds the element again, a descriptor of
//! its semantics, and ready-to-paste snippets for thirteen test-automation
//! dialects. It also drives the interactive picker and the frame-coalesced
//! live preview a browser host wires to pointer events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   LOCSMITH Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ DomTree    │    │ Synthesizer│    │ Snippet    │            │
//! │   │ (host or   │───►│ Descriptor │───►│ Formatter  │            │
//! │   │  fixture)  │    │ Extractor  │    │ (dialects) │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │          ▲                 ▲                 │                   │
//! │          │          ┌──────┴─────┐           ▼                   │
//! │   pointer/click ───►│  Session   │───► Observer / Clipboard      │
//! │                     │ Picker     │                               │
//! │                     │ LivePreview│                               │
//! │                     └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use locsmith::prelude::*;
//!
//! let doc = Document::from_spec(
//!     ElementSpec::new("html").child(
//!         ElementSpec::new("body").child(ElementSpec::new("button").class("buy").text("Buy")),
//!     ),
//! );
//! let button = doc.query_selector("button").unwrap().unwrap();
//! let locator = synthesize(&doc, button).unwrap();
//! assert_eq!(locator.as_str(), "button.buy");
//! assert_eq!(
//!     format_snippet(locator.as_str(), Dialect::Cypress),
//!     "cy.get('button.buy').click();"
//! );
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Engine configuration
#[allow(clippy::missing_errors_doc)]
pub mod config;

/// CSS escaping, parsing and matching
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod css;

/// Element descriptors
pub mod descriptor;

/// Test-automation dialects and action verbs
pub mod dialect;

/// Document model the engine reads
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod dom;

/// Test case export formats
#[allow(clippy::missing_errors_doc, clippy::format_push_string)]
pub mod export;

/// Snippet rendering
pub mod format;

/// Outline bookkeeping
pub mod highlight;

/// Interactive picker
pub mod picker;

/// Live preview pipeline
pub mod preview;

/// Error types
pub mod result;

/// Page scan heuristics
pub mod scan;

/// Per-document session
#[allow(clippy::missing_errors_doc)]
pub mod session;

/// Locator synthesis
pub mod synth;

pub use config::EngineConfig;
pub use css::{css_escape, SelectorList};
pub use descriptor::{
    accessible_name, describe, frame_locator, implicit_role, infer_role, DescriptorExtractor,
    ElementDescriptor,
};
pub use dialect::{ActionBackend, ActionVerb, Dialect, SnippetFamily};
pub use dom::{
    Document, DocumentFixture, DomTree, ElementSpec, FrameHost, NodeId, NodeSpec, OutlineHost,
};
pub use export::ExportFormat;
pub use format::{
    format_action, format_snippet, js_quote, PreviewEntry, SemanticLocator, SnippetFormatter,
};
pub use highlight::OutlineRegistry;
pub use picker::{ClickEvent, PickResult, PickState, Picker};
pub use preview::{FrameTicket, LivePreview, PreviewFrame, PreviewState};
pub use result::{LocsmithError, LocsmithResult};
pub use scan::{scan_page, PageScanner, TestCase, SEARCH_SELECTOR};
pub use session::{
    Clipboard, EngineEvent, EventLog, FrameOutcome, MemoryClipboard, Observer, PickOutcome,
    Request, Response, Session,
};
pub use synth::{
    absolute_path, find_test_id, synthesize, xpath_literal, Locator, LocatorKind, PathSegment,
    Resolution, Synthesizer,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::config::*;
    pub use super::css::*;
    pub use super::descriptor::*;
    pub use super::dialect::*;
    pub use super::dom::*;
    pub use super::export::*;
    pub use super::format::*;
    pub use super::highlight::*;
    pub use super::picker::*;
    pub use super::preview::*;
    pub use super::result::*;
    pub use super::scan::*;
    pub use super::session::*;
    pub use super::synth::*;
}
