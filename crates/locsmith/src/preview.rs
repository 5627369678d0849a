//! Live preview pipeline.
//!
//! Pointer moves are coalesced into at most one pending computation: each
//! move issues a new [`FrameTicket`] and cancels the previous one, and only
//! the most recent ticket produces a [`PreviewFrame`] when the host's next
//! animation frame runs. A frame is also skipped when the hovered element
//! is the one processed last.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::dialect::Dialect;
use crate::dom::{DomTree, NodeId};
use crate::format::{PreviewEntry, SnippetFormatter};
use crate::synth::Synthesizer;

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewState {
    /// Ignoring pointer moves
    #[default]
    Stopped,
    /// Sampling pointer moves
    Running,
}

/// Handle of a scheduled computation; only the latest one is honored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameTicket(u64);

impl FrameTicket {
    /// Sequence number
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Locator and all-dialect snippets for the hovered element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFrame {
    /// Structural locator
    pub locator: String,
    /// One entry per configured dialect
    pub preview: Vec<PreviewEntry>,
}

/// Frame-coalesced locator preview
#[derive(Debug, Clone)]
pub struct LivePreview {
    state: PreviewState,
    sequence: u64,
    pending: Option<(FrameTicket, NodeId)>,
    last_target: Option<NodeId>,
    dialects: Vec<Dialect>,
    synthesizer: Synthesizer,
    formatter: SnippetFormatter,
}

impl Default for LivePreview {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl LivePreview {
    /// Create a stopped pipeline
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: PreviewState::Stopped,
            sequence: 0,
            pending: None,
            last_target: None,
            dialects: config.preview_dialects.clone(),
            synthesizer: Synthesizer::new(config),
            formatter: SnippetFormatter::new(config),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> PreviewState {
        self.state
    }

    /// Whether pointer moves are sampled
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == PreviewState::Running
    }

    /// Ticket of the computation waiting for the next frame
    #[must_use]
    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending.map(|(ticket, _)| ticket)
    }

    /// Start sampling; `false` if already running
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = PreviewState::Running;
        debug!("live preview started");
        true
    }

    /// Stop sampling, dropping any pending computation and the last target
    pub fn stop(&mut self) {
        if self.pending.take().is_some() {
            trace!("pending preview frame cancelled by stop");
        }
        self.last_target = None;
        if self.state == PreviewState::Running {
            debug!("live preview stopped");
        }
        self.state = PreviewState::Stopped;
    }

    /// Record a pointer sample, superseding any pending one.
    ///
    /// Returns the ticket to hand to the next animation frame, or `None`
    /// while stopped.
    pub fn on_pointer_move(&mut self, target: NodeId) -> Option<FrameTicket> {
        if !self.is_running() {
            return None;
        }
        self.sequence += 1;
        let ticket = FrameTicket(self.sequence);
        if let Some((cancelled, _)) = self.pending.replace((ticket, target)) {
            trace!(cancelled = cancelled.sequence(), "pending preview frame superseded");
        }
        Some(ticket)
    }

    /// Run the computation scheduled under `ticket`.
    ///
    /// Stale or cancelled tickets, non-element targets and repeats of the
    /// last processed element produce nothing.
    pub fn run_frame<D: DomTree + ?Sized>(
        &mut self,
        dom: &D,
        ticket: FrameTicket,
    ) -> Option<PreviewFrame> {
        if !self.is_running() {
            return None;
        }
        let target = match self.pending {
            Some((pending, target)) if pending == ticket => target,
            _ => {
                trace!(ticket = ticket.sequence(), "stale preview ticket");
                return None;
            }
        };
        self.pending = None;
        if !dom.is_element(target) || self.last_target == Some(target) {
            return None;
        }
        self.last_target = Some(target);

        let locator = self.synthesizer.structural(dom, target)?.into_string();
        let preview = self
            .formatter
            .preview(dom, Some(target), &locator, &self.dialects);
        debug!(locator = %locator, dialects = preview.len(), "preview frame computed");
        Some(PreviewFrame { locator, preview })
    }
}
