//! Hover highlight bookkeeping.
//!
//! Every element the registry outlines has its previous inline outline
//! recorded first, and [`OutlineRegistry::clear`] writes each recorded value
//! back before forgetting it.

use std::collections::HashMap;
use tracing::trace;

use crate::dom::{NodeId, OutlineHost};

/// Outlined elements and the outlines they had before
#[derive(Debug, Clone, Default)]
pub struct OutlineRegistry {
    previous: HashMap<NodeId, Option<String>>,
}

impl OutlineRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outline `node`, remembering its prior outline on first touch
    pub fn apply<H: OutlineHost + ?Sized>(&mut self, host: &mut H, node: NodeId, style: &str) -> bool {
        let first_touch = !self.previous.contains_key(&node);
        if first_touch {
            self.previous.insert(node, host.outline(node));
        }
        let applied = host.set_outline(node, style);
        if !applied && first_touch {
            self.previous.remove(&node);
        }
        trace!(node = node.index(), applied, "outline applied");
        applied
    }

    /// Restore every recorded outline and empty the registry.
    ///
    /// Returns the number of elements restored.
    pub fn clear<H: OutlineHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut restored = 0;
        for (node, previous) in self.previous.drain() {
            if host.set_outline(node, previous.as_deref().unwrap_or_default()) {
                restored += 1;
            }
        }
        restored
    }

    /// Whether `node` is currently outlined by the registry
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.previous.contains_key(&node)
    }

    /// Number of outlined elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.previous.len()
    }

    /// Whether nothing is outlined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}
