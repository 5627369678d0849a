//! Locator synthesis.
//!
//! Two syntaxes are produced for an element:
//!
//! - **Structural** CSS paths, built leaf-first from test attributes,
//!   `name`/`aria-label`/`placeholder` predicates, classes and
//!   `:nth-of-type` tie-breakers, stopping at the shortest suffix that
//!   resolves to exactly one element.
//! - **Absolute** XPath chains with an ordinal at every level, truncated at
//!   the nearest ancestor carrying a document-unique id.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::css::css_escape;
use crate::dom::{DomTree, NodeId};

/// Locator syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocatorKind {
    /// CSS path of tag/attribute/class predicates
    Structural,
    /// XPath of ordinal-qualified ancestors
    Absolute,
}

/// Whether a locator was confirmed to match a single element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    /// Resolves to exactly the source element
    Unique,
    /// Full chain returned without reaching uniqueness
    BestEffort,
}

/// A synthesized locator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// Syntax of `value`
    pub kind: LocatorKind,
    /// Locator text
    pub value: String,
    /// Uniqueness at synthesis time
    pub resolution: Resolution,
}

impl Locator {
    fn new(kind: LocatorKind, value: String, resolution: Resolution) -> Self {
        Self {
            kind,
            value,
            resolution,
        }
    }

    /// Locator text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the locator was confirmed unique
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.resolution == Resolution::Unique
    }

    /// Consume into the locator text
    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// One level of a structural path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Lower-case tag name
    pub tag: String,
    /// Attribute and class predicates, already escaped
    pub predicates: Vec<String>,
    /// `:nth-of-type` ordinal when the tag repeats among siblings
    pub position: Option<usize>,
    /// Built from a test attribute
    pub from_test_id: bool,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        for predicate in &self.predicates {
            f.write_str(predicate)?;
        }
        if let Some(position) = self.position {
            write!(f, ":nth-of-type({position})")?;
        }
        Ok(())
    }
}

/// First test attribute present on the element, as `(attribute, value)`
pub fn find_test_id<'a, 'd, D: DomTree + ?Sized>(
    dom: &'d D,
    node: NodeId,
    attributes: &'a [String],
) -> Option<(&'a str, &'d str)> {
    attributes.iter().find_map(|attr| {
        dom.attribute(node, attr)
            .filter(|value| !value.is_empty())
            .map(|value| (attr.as_str(), value))
    })
}

/// Quote a string for an XPath expression
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let parts: Vec<String> = value
        .split('"')
        .map(|part| format!("\"{part}\""))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}

/// Builds locators for elements of a [`DomTree`]
#[derive(Debug, Clone)]
pub struct Synthesizer {
    test_id_attributes: Vec<String>,
    max_class_predicates: usize,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Synthesizer {
    /// Create a synthesizer using the configured attribute priorities
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            test_id_attributes: config.test_id_attributes.clone(),
            max_class_predicates: config.max_class_predicates,
        }
    }

    /// Test attributes in priority order
    #[must_use]
    pub fn test_id_attributes(&self) -> &[String] {
        &self.test_id_attributes
    }

    /// Build the path segment for one element
    pub fn segment<D: DomTree + ?Sized>(&self, dom: &D, node: NodeId) -> Option<PathSegment> {
        let tag = dom.tag_name(node)?.to_string();

        if let Some((attr, value)) = find_test_id(dom, node, &self.test_id_attributes) {
            return Some(PathSegment {
                tag,
                predicates: vec![attribute_predicate(attr, value)],
                position: None,
                from_test_id: true,
            });
        }

        let mut predicates = Vec::new();
        for attr in ["name", "aria-label", "placeholder"] {
            if let Some(value) = dom.attribute(node, attr).filter(|v| !v.is_empty()) {
                predicates.push(attribute_predicate(attr, value));
            }
        }
        predicates.extend(
            dom.class_list(node)
                .into_iter()
                .take(self.max_class_predicates)
                .map(|class| format!(".{}", css_escape(class))),
        );

        let siblings = dom.siblings_of_type(node);
        let position = (siblings.len() > 1).then(|| dom.position_of_type(node));

        Some(PathSegment {
            tag,
            predicates,
            position,
            from_test_id: false,
        })
    }

    /// Shortest structural path resolving to the element.
    ///
    /// Returns `None` for handles that are not elements.
    pub fn structural<D: DomTree + ?Sized>(&self, dom: &D, node: NodeId) -> Option<Locator> {
        if !dom.is_element(node) {
            trace!(node = node.index(), "structural locator requested for non-element");
            return None;
        }
        let root = dom.document_element();
        if root == Some(node) {
            return Some(Locator::new(
                LocatorKind::Structural,
                "html".to_string(),
                Resolution::Unique,
            ));
        }
        if let Some(id) = dom.unique_id(node) {
            let value = format!("#{}", css_escape(id));
            debug!(locator = %value, "unique id shortcut");
            return Some(Locator::new(LocatorKind::Structural, value, Resolution::Unique));
        }

        let mut segments: Vec<String> = Vec::new();
        let mut current = Some(node);
        while let Some(level) = current.filter(|level| Some(*level) != root) {
            let Some(segment) = self.segment(dom, level) else {
                break;
            };
            segments.insert(0, segment.to_string());
            let candidate = segments.join(" > ");
            let unique = dom.resolves_to(&candidate, node);
            trace!(candidate = %candidate, unique, "uniqueness check");

            if segment.from_test_id {
                debug!(locator = %candidate, unique, "test attribute short-circuit");
                let resolution = if unique {
                    Resolution::Unique
                } else {
                    Resolution::BestEffort
                };
                return Some(Locator::new(LocatorKind::Structural, candidate, resolution));
            }
            if unique {
                debug!(locator = %candidate, depth = segments.len(), "unique suffix found");
                return Some(Locator::new(
                    LocatorKind::Structural,
                    candidate,
                    Resolution::Unique,
                ));
            }
            current = dom.parent_element(level);
        }

        let value = segments.join(" > ");
        debug!(locator = %value, "no unique suffix, returning full chain");
        Some(Locator::new(LocatorKind::Structural, value, Resolution::BestEffort))
    }

    /// Ordinal XPath chain to the element.
    ///
    /// Returns `None` for handles that are not elements.
    pub fn absolute<D: DomTree + ?Sized>(&self, dom: &D, node: NodeId) -> Option<Locator> {
        if !dom.is_element(node) {
            return None;
        }
        let mut steps: Vec<String> = Vec::new();
        let mut anchored = false;
        let mut current = Some(node);
        while let Some(level) = current {
            let Some(tag) = dom.tag_name(level) else {
                break;
            };
            if let Some(id) = dom.unique_id(level) {
                steps.push(format!("//*[@id={}]", xpath_literal(id)));
                anchored = true;
                break;
            }
            match dom.parent_element(level) {
                Some(parent) => {
                    steps.push(format!("/{tag}[{}]", dom.position_of_type(level)));
                    current = Some(parent);
                }
                None => {
                    steps.push(format!("/{tag}"));
                    anchored = dom.document_element() == Some(level);
                    current = None;
                }
            }
        }
        steps.reverse();
        let resolution = if anchored {
            Resolution::Unique
        } else {
            Resolution::BestEffort
        };
        Some(Locator::new(LocatorKind::Absolute, steps.concat(), resolution))
    }
}

fn attribute_predicate(attr: &str, value: &str) -> String {
    format!("[{attr}=\"{}\"]", css_escape(value))
}

/// Structural locator with the default configuration
pub fn synthesize<D: DomTree + ?Sized>(dom: &D, node: NodeId) -> Option<Locator> {
    Synthesizer::default().structural(dom, node)
}

/// Absolute XPath with the default configuration
pub fn absolute_path<D: DomTree + ?Sized>(dom: &D, node: NodeId) -> Option<Locator> {
    Synthesizer::default().absolute(dom, node)
}
