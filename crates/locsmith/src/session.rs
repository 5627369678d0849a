//! Per-document session.
//!
//! A [`Session`] owns everything one tab needs: configuration, the picker,
//! the live preview, and its collaborators. Requests arrive as typed
//! [`Request`] values and are answered with [`Response`]s; picks and
//! preview frames are pushed to the injected [`Observer`] as
//! [`EngineEvent`]s. Delivery and clipboard failures are logged and
//! reported as `false`, never propagated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::dialect::{ActionVerb, Dialect};
use crate::dom::{DomTree, NodeId, OutlineHost};
use crate::format::SnippetFormatter;
use crate::picker::{ClickEvent, PickResult, Picker};
use crate::preview::{FrameTicket, LivePreview, PreviewFrame};
use crate::result::LocsmithResult;
use crate::scan::{PageScanner, TestCase};
use crate::synth::Synthesizer;

/// Directive sent to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Liveness check
    Ping,
    /// Arm the picker
    StartPickSelector,
    /// Disarm the picker without a result
    StopPickSelector,
    /// Start the live preview
    StartLivePreview,
    /// Stop the live preview
    StopLivePreview,
    /// Suggest test cases for the page
    ScanPage,
    /// Strategy snippet for a stored or synthesized locator
    #[serde(rename_all = "camelCase")]
    CopySnippet {
        /// Stored locator; synthesized from the active element when absent
        #[serde(default)]
        selector: Option<String>,
        /// Dialect id
        #[serde(alias = "target")]
        dialect: String,
    },
    /// Action snippet for a stored or synthesized locator
    #[serde(rename_all = "camelCase")]
    CopyActionSnippet {
        /// Stored locator; synthesized from the active element when absent
        #[serde(default)]
        selector: Option<String>,
        /// Dialect id
        #[serde(alias = "target")]
        dialect: String,
        /// Verb id; unknown ids mean click
        #[serde(default)]
        action: ActionVerb,
    },
    /// All-dialect preview for a stored or synthesized locator
    #[serde(rename_all = "camelCase")]
    SelectorPreview {
        /// Stored locator; synthesized from the active element when absent
        #[serde(default)]
        selector: Option<String>,
    },
}

/// Reply to a [`Request`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// Acknowledgement
    Ack {
        /// Whether the directive was applied
        ok: bool,
    },
    /// Rendered snippet
    Snippet {
        /// Snippet text, empty when no locator was available
        snippet: String,
        /// Whether the snippet reached the clipboard
        copied: bool,
    },
    /// Locator with all-dialect snippets
    Preview(PreviewFrame),
    /// Page scan result
    #[serde(rename_all = "camelCase")]
    TestCases {
        /// Suggested cases
        test_cases: Vec<TestCase>,
    },
}

/// Message pushed to the observer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    /// The picker captured an element
    SelectorPicked(PickResult),
    /// A live preview frame was computed
    LivePreviewUpdate {
        /// Frame contents
        preview: PreviewFrame,
    },
}

/// A pick and whether it reached the session's collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOutcome {
    /// Picked locator and descriptor
    pub result: PickResult,
    /// Whether the observer accepted the `SELECTOR_PICKED` event
    pub delivered: bool,
    /// Whether the locator reached the clipboard
    pub copied: bool,
}

/// A preview frame and whether the observer accepted it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Computed frame
    pub frame: PreviewFrame,
    /// Whether the observer accepted the `LIVE_PREVIEW_UPDATE` event
    pub delivered: bool,
}

/// Receiver of engine events (side panel, background coordinator)
pub trait Observer {
    /// Deliver one event; failures are expected and recoverable
    fn deliver(&mut self, event: &EngineEvent) -> LocsmithResult<()>;
}

/// System clipboard
pub trait Clipboard {
    /// Replace the clipboard contents
    fn write_text(&mut self, text: &str) -> LocsmithResult<()>;
}

/// Observer that keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in delivery order
    #[must_use]
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Take all events, leaving the log empty
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Observer for EventLog {
    fn deliver(&mut self, event: &EngineEvent) -> LocsmithResult<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Clipboard held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    /// Create an empty clipboard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> LocsmithResult<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Engine state for one document
pub struct Session<O: Observer> {
    config: EngineConfig,
    picker: Picker,
    preview: LivePreview,
    synthesizer: Synthesizer,
    formatter: SnippetFormatter,
    scanner: PageScanner,
    observer: O,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl<O: Observer + fmt::Debug> fmt::Debug for Session<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("picker", &self.picker.state())
            .field("preview", &self.preview.state())
            .field("observer", &self.observer)
            .field("clipboard", &self.clipboard.is_some())
            .finish_non_exhaustive()
    }
}

impl<O: Observer> Session<O> {
    /// Create a session delivering events to `observer`
    #[must_use]
    pub fn new(config: EngineConfig, observer: O) -> Self {
        Self {
            picker: Picker::new(&config),
            preview: LivePreview::new(&config),
            synthesizer: Synthesizer::new(&config),
            formatter: SnippetFormatter::new(&config),
            scanner: PageScanner::new(&config),
            config,
            observer,
            clipboard: None,
        }
    }

    /// Copy picks and snippets to `clipboard`
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The picker
    #[must_use]
    pub const fn picker(&self) -> &Picker {
        &self.picker
    }

    /// The live preview
    #[must_use]
    pub const fn preview(&self) -> &LivePreview {
        &self.preview
    }

    /// The observer
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// The observer, mutably
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Consume the session, returning the observer
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Answer a request
    pub fn handle<D: DomTree + OutlineHost + ?Sized>(
        &mut self,
        dom: &mut D,
        request: Request,
    ) -> Response {
        debug!(?request, "handling request");
        match request {
            Request::Ping => Response::Ack { ok: true },
            Request::StartPickSelector => {
                self.picker.start();
                Response::Ack { ok: true }
            }
            Request::StopPickSelector => {
                self.picker.stop(dom);
                Response::Ack { ok: true }
            }
            Request::StartLivePreview => {
                self.preview.start();
                Response::Ack { ok: true }
            }
            Request::StopLivePreview => {
                self.preview.stop();
                Response::Ack { ok: true }
            }
            Request::ScanPage => Response::TestCases {
                test_cases: self.scanner.scan(&*dom),
            },
            Request::CopySnippet { selector, dialect } => {
                let element = snippet_element(&*dom);
                let locator = self.resolve_locator(&*dom, selector, element);
                // Unknown ids render the raw locator
                let dialect = Dialect::from_str(&dialect).unwrap_or(Dialect::Css);
                let snippet = self.formatter.strategy(&locator, dialect, &*dom, element);
                let copied = !snippet.is_empty() && self.copy(&snippet);
                Response::Snippet { snippet, copied }
            }
            Request::CopyActionSnippet {
                selector,
                dialect,
                action,
            } => {
                let element = snippet_element(&*dom);
                let locator = self.resolve_locator(&*dom, selector, element);
                // Unknown ids use synthetic DOM events
                let dialect = Dialect::from_str(&dialect).unwrap_or(Dialect::Js);
                let snippet = self.formatter.action(&locator, dialect, action);
                let copied = !snippet.is_empty() && self.copy(&snippet);
                Response::Snippet { snippet, copied }
            }
            Request::SelectorPreview { selector } => {
                let element = snippet_element(&*dom);
                let locator = self.resolve_locator(&*dom, selector, element);
                let preview = self.formatter.preview(
                    &*dom,
                    element,
                    &locator,
                    &self.config.preview_dialects,
                );
                Response::Preview(PreviewFrame { locator, preview })
            }
        }
    }

    /// Route a pointer move to the picker outline and the live preview.
    ///
    /// Returns the ticket to run on the next animation frame, if any.
    pub fn on_pointer_move<D: DomTree + OutlineHost + ?Sized>(
        &mut self,
        dom: &mut D,
        target: NodeId,
    ) -> Option<FrameTicket> {
        self.picker.on_pointer_move(dom, target);
        self.preview.on_pointer_move(target)
    }

    /// Route a captured click to the picker, publishing any pick
    pub fn on_click<D: DomTree + OutlineHost + ?Sized>(
        &mut self,
        dom: &mut D,
        event: &mut ClickEvent,
    ) -> Option<PickOutcome> {
        let result = self.picker.on_click(dom, event)?;
        let copied = self.copy(&result.locator);
        let delivered = self.emit(&EngineEvent::SelectorPicked(result.clone()));
        Some(PickOutcome {
            result,
            delivered,
            copied,
        })
    }

    /// Run a scheduled preview computation, publishing the frame
    pub fn on_animation_frame<D: DomTree + ?Sized>(
        &mut self,
        dom: &D,
        ticket: FrameTicket,
    ) -> Option<FrameOutcome> {
        let frame = self.preview.run_frame(dom, ticket)?;
        let delivered = self.emit(&EngineEvent::LivePreviewUpdate {
            preview: frame.clone(),
        });
        Some(FrameOutcome { frame, delivered })
    }

    fn resolve_locator<D: DomTree + ?Sized>(
        &self,
        dom: &D,
        stored: Option<String>,
        element: Option<NodeId>,
    ) -> String {
        stored
            .filter(|locator| !locator.is_empty())
            .or_else(|| {
                element
                    .and_then(|node| self.synthesizer.structural(dom, node))
                    .map(|locator| locator.into_string())
            })
            .unwrap_or_default()
    }

    fn emit(&mut self, event: &EngineEvent) -> bool {
        match self.observer.deliver(event) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "event delivery failed");
                false
            }
        }
    }

    fn copy(&mut self, text: &str) -> bool {
        let Some(clipboard) = self.clipboard.as_mut() else {
            debug!("no clipboard attached");
            return false;
        };
        match clipboard.write_text(text) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                false
            }
        }
    }
}

/// Element snippet requests describe: the focused one, else `<body>`
fn snippet_element<D: DomTree + ?Sized>(dom: &D) -> Option<NodeId> {
    dom.active_element().or_else(|| dom.body())
}
