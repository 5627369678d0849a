//! Element descriptors.
//!
//! A descriptor is a point-in-time snapshot of the attributes that identify
//! an element: the ones shown to the tester after a pick and the ones the
//! semantic dialects (`getByRole`, `getByLabel`, `getByTestId`,
//! `frameLocator`) rebuild their locators from.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::css::css_escape;
use crate::dom::{DomTree, NodeId};
use crate::synth::find_test_id;

/// Normalized snapshot of an element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// Structural locator the descriptor was taken for
    pub locator: String,
    /// Lower-case tag name
    pub tag: String,
    /// id attribute
    pub id: String,
    /// Leading classes
    pub classes: Vec<String>,
    /// name attribute
    pub name: String,
    /// Explicit or implicit ARIA role
    pub role: String,
    /// aria-label attribute
    pub aria_label: String,
    /// Resolved accessible name
    pub accessible_name: String,
    /// placeholder attribute
    pub placeholder: String,
    /// type attribute
    #[serde(rename = "type")]
    pub input_type: String,
    /// First test attribute value
    pub test_id: String,
    /// Trimmed, truncated text content
    pub text: String,
    /// Truncated serialized markup
    #[serde(rename = "outerHTML")]
    pub outer_html: String,
    /// Locator of the hosting frame, empty at top level
    pub frame: String,
}

/// Implicit role for a tag and input type
#[must_use]
pub fn implicit_role(tag: &str, input_type: Option<&str>) -> Option<&'static str> {
    match tag {
        "button" => Some("button"),
        "a" => Some("link"),
        "input" => {
            let input_type = input_type.unwrap_or("text").to_ascii_lowercase();
            Some(match input_type.as_str() {
                "checkbox" => "checkbox",
                "radio" => "radio",
                "submit" | "button" | "reset" | "image" => "button",
                _ => "textbox",
            })
        }
        "select" => Some("combobox"),
        "textarea" => Some("textbox"),
        _ => None,
    }
}

/// Explicit `role` attribute, else the implicit role
pub fn infer_role<D: DomTree + ?Sized>(dom: &D, node: NodeId) -> Option<String> {
    if let Some(role) = dom
        .attribute(node, "role")
        .map(str::trim)
        .filter(|role| !role.is_empty())
    {
        return Some(role.to_string());
    }
    let tag = dom.tag_name(node)?;
    implicit_role(tag, dom.attribute(node, "type")).map(str::to_string)
}

/// Accessible name: aria-label, aria-labelledby, `<label for>`, wrapping label
pub fn accessible_name<D: DomTree + ?Sized>(dom: &D, node: NodeId) -> String {
    if !dom.is_element(node) {
        return String::new();
    }
    let non_empty = |text: String| {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    if let Some(label) = dom.attribute(node, "aria-label").and_then(|v| non_empty(v.to_string())) {
        return label;
    }
    if let Some(ids) = dom.attribute(node, "aria-labelledby") {
        let joined: Vec<String> = ids
            .split_whitespace()
            .filter_map(|id| dom.element_by_id(id))
            .map(|target| dom.text_content(target).trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        if let Some(label) = non_empty(joined.join(" ")) {
            return label;
        }
    }
    if let Some(id) = dom.attribute(node, "id").filter(|id| !id.is_empty()) {
        let associated = dom.elements().into_iter().find(|candidate| {
            dom.tag_name(*candidate) == Some("label") && dom.attribute(*candidate, "for") == Some(id)
        });
        if let Some(label) = associated.and_then(|label| non_empty(dom.text_content(label))) {
            return label;
        }
    }
    dom.closest(node, "label")
        .and_then(|label| non_empty(dom.text_content(label)))
        .unwrap_or_default()
}

/// Locator of the frame element hosting the document, empty at top level
pub fn frame_locator<D: DomTree + ?Sized>(dom: &D) -> String {
    let Some(host) = dom.frame_host() else {
        return String::new();
    };
    if let Some(id) = host.attribute("id") {
        return format!("#{}", css_escape(id));
    }
    ["name", "title", "src"]
        .into_iter()
        .find_map(|attr| {
            host.attribute(attr)
                .map(|value| format!("iframe[{attr}=\"{}\"]", css_escape(value)))
        })
        .unwrap_or_else(|| "iframe".to_string())
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Builds [`ElementDescriptor`]s with configured limits
#[derive(Debug, Clone)]
pub struct DescriptorExtractor {
    test_id_attributes: Vec<String>,
    max_classes: usize,
    text_limit: usize,
    markup_limit: usize,
}

impl Default for DescriptorExtractor {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl DescriptorExtractor {
    /// Create an extractor from configuration
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            test_id_attributes: config.test_id_attributes.clone(),
            max_classes: config.max_descriptor_classes,
            text_limit: config.text_limit,
            markup_limit: config.markup_limit,
        }
    }

    /// First configured test attribute value on the element
    pub fn test_id<D: DomTree + ?Sized>(&self, dom: &D, node: NodeId) -> Option<String> {
        find_test_id(dom, node, &self.test_id_attributes).map(|(_, value)| value.to_string())
    }

    /// Snapshot an element; `None` for non-elements
    pub fn describe<D: DomTree + ?Sized>(
        &self,
        dom: &D,
        node: NodeId,
        locator: &str,
    ) -> Option<ElementDescriptor> {
        let tag = dom.tag_name(node)?.to_string();
        let attr = |name: &str| dom.attribute(node, name).unwrap_or_default().to_string();
        Some(ElementDescriptor {
            locator: locator.to_string(),
            id: attr("id"),
            classes: dom
                .class_list(node)
                .into_iter()
                .take(self.max_classes)
                .map(str::to_string)
                .collect(),
            name: attr("name"),
            role: infer_role(dom, node).unwrap_or_default(),
            aria_label: attr("aria-label"),
            accessible_name: accessible_name(dom, node),
            placeholder: attr("placeholder"),
            input_type: attr("type"),
            test_id: self.test_id(dom, node).unwrap_or_default(),
            text: truncate_chars(dom.text_content(node).trim(), self.text_limit),
            outer_html: truncate_chars(&dom.outer_html(node), self.markup_limit),
            frame: frame_locator(dom),
            tag,
        })
    }
}

/// Describe with the default configuration
pub fn describe<D: DomTree + ?Sized>(
    dom: &D,
    node: NodeId,
    locator: &str,
) -> Option<ElementDescriptor> {
    DescriptorExtractor::default().describe(dom, node, locator)
}
