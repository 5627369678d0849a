//! Interactive picking state machine.
//!
//! `Idle → Armed` on [`Picker::start`]. While armed, pointer moves outline
//! the hovered element and the next click is swallowed and turned into a
//! [`PickResult`], returning the picker to `Idle`. [`Picker::stop`] leaves
//! `Armed` without a result. Every exit from `Armed` restores outlines.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::descriptor::{DescriptorExtractor, ElementDescriptor};
use crate::dom::{DomTree, NodeId, OutlineHost};
use crate::highlight::OutlineRegistry;
use crate::synth::Synthesizer;

/// Picker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PickState {
    /// Not listening
    #[default]
    Idle,
    /// Waiting for the pick click
    Armed,
}

/// A click delivered by the host's capturing listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Clicked element
    pub target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl ClickEvent {
    /// Click on `target`
    #[must_use]
    pub const fn new(target: NodeId) -> Self {
        Self {
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Suppress the default action (navigation, submit)
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Keep the click away from page handlers
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether the default action was suppressed
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether propagation was stopped
    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Outcome of a successful pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickResult {
    /// Structural locator of the picked element
    pub locator: String,
    /// Descriptor of the picked element
    pub descriptor: Option<ElementDescriptor>,
}

/// Pointer-driven element picker
#[derive(Debug, Clone)]
pub struct Picker {
    state: PickState,
    outlines: OutlineRegistry,
    outline_style: String,
    synthesizer: Synthesizer,
    extractor: DescriptorExtractor,
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Picker {
    /// Create an idle picker
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: PickState::Idle,
            outlines: OutlineRegistry::new(),
            outline_style: config.outline_style.clone(),
            synthesizer: Synthesizer::new(config),
            extractor: DescriptorExtractor::new(config),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> PickState {
        self.state
    }

    /// Whether the picker is waiting for a click
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state == PickState::Armed
    }

    /// Outlines currently applied
    #[must_use]
    pub const fn outlines(&self) -> &OutlineRegistry {
        &self.outlines
    }

    /// Arm the picker; `false` if it was already armed
    pub fn start(&mut self) -> bool {
        if self.is_armed() {
            return false;
        }
        self.state = PickState::Armed;
        debug!("picker armed");
        true
    }

    /// Move the hover outline to `target`
    pub fn on_pointer_move<H: OutlineHost + ?Sized>(&mut self, host: &mut H, target: NodeId) {
        if !self.is_armed() {
            return;
        }
        self.outlines.clear(host);
        self.outlines.apply(host, target, &self.outline_style);
    }

    /// Intercept a click while armed.
    ///
    /// Returns `None` when idle (the event is left untouched) or when the
    /// target is not an element.
    pub fn on_click<D: DomTree + OutlineHost + ?Sized>(
        &mut self,
        dom: &mut D,
        event: &mut ClickEvent,
    ) -> Option<PickResult> {
        if !self.is_armed() {
            return None;
        }
        event.prevent_default();
        event.stop_propagation();

        let result = self
            .synthesizer
            .structural(&*dom, event.target)
            .map(|locator| PickResult {
                descriptor: self.extractor.describe(&*dom, event.target, locator.as_str()),
                locator: locator.into_string(),
            });

        self.state = PickState::Idle;
        let restored = self.outlines.clear(dom);
        debug!(
            picked = result.is_some(),
            restored, "picker returned to idle after click"
        );
        result
    }

    /// Leave `Armed` without picking; `false` if already idle
    pub fn stop<H: OutlineHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.is_armed() {
            return false;
        }
        self.state = PickState::Idle;
        self.outlines.clear(host);
        debug!("picker stopped");
        true
    }
}
