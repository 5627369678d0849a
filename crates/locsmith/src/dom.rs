//! Read-only DOM capability layer.
//!
//! The synthesizer, extractor and formatter only ever ask a tree for
//! ancestors, siblings, attributes and text. [`DomTree`] is that minimal
//! capability; [`OutlineHost`] is the single mutating capability used by
//! the hover highlight. [`Document`] implements both over an in-memory
//! arena so the engine runs against fixtures without a browser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::css::SelectorList;
use crate::result::{LocsmithError, LocsmithResult};

/// Opaque handle to a node owned by a [`DomTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw arena index
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Attributes of the `<iframe>` element hosting a frame document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameHost {
    attributes: BTreeMap<String, String>,
}

impl FrameHost {
    /// Create a host with no attributes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Non-empty attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Read-only view of a document tree.
///
/// Methods taking a [`NodeId`] answer `None`/empty for handles that do not
/// name an element of this tree.
pub trait DomTree {
    /// The root element (`<html>`)
    fn document_element(&self) -> Option<NodeId>;

    /// Whether the handle names an element node
    fn is_element(&self, node: NodeId) -> bool;

    /// Lower-case tag name of an element
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Attribute value as written
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Parent element, `None` at the root or for detached nodes
    fn parent_element(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in document order
    fn element_children(&self, node: NodeId) -> Vec<NodeId>;

    /// Concatenated descendant text
    fn text_content(&self, node: NodeId) -> String;

    /// Serialized markup of the element and its subtree
    fn outer_html(&self, node: NodeId) -> String;

    /// Element that currently has focus
    fn active_element(&self) -> Option<NodeId> {
        None
    }

    /// Address of the document
    fn url(&self) -> Option<&str> {
        None
    }

    /// Hosting frame element when this is a frame document
    fn frame_host(&self) -> Option<&FrameHost> {
        None
    }

    /// The `<body>` child of the document element
    fn body(&self) -> Option<NodeId> {
        let root = self.document_element()?;
        self.element_children(root)
            .into_iter()
            .find(|child| self.tag_name(*child) == Some("body"))
    }

    /// Every element in document order (pre-order)
    fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.document_element().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.element_children(node).into_iter().rev());
        }
        out
    }

    /// Ancestors from the parent up to the root
    fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent_element(node);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent_element(parent);
        }
        out
    }

    /// Nearest ancestor-or-self with the given tag
    fn closest(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|candidate| self.tag_name(*candidate) == Some(tag))
    }

    /// All elements carrying `id`
    fn elements_with_id(&self, id: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|node| self.attribute(*node, "id") == Some(id))
            .collect()
    }

    /// First element carrying `id`
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    /// Non-empty id attribute that finds this element and no other
    fn unique_id(&self, node: NodeId) -> Option<&str> {
        let id = self.attribute(node, "id").filter(|id| !id.is_empty())?;
        (self.elements_with_id(id) == [node]).then_some(id)
    }

    /// Classes from the `class` attribute in written order
    fn class_list(&self, node: NodeId) -> Vec<&str> {
        self.attribute(node, "class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Same-tag element siblings including the node itself
    fn siblings_of_type(&self, node: NodeId) -> Vec<NodeId> {
        let Some(tag) = self.tag_name(node) else {
            return Vec::new();
        };
        match self.parent_element(node) {
            Some(parent) => self
                .element_children(parent)
                .into_iter()
                .filter(|sibling| self.tag_name(*sibling) == Some(tag))
                .collect(),
            None => vec![node],
        }
    }

    /// 1-based ordinal among same-tag siblings
    fn position_of_type(&self, node: NodeId) -> usize {
        self.siblings_of_type(node)
            .iter()
            .position(|sibling| *sibling == node)
            .map_or(1, |index| index + 1)
    }

    /// All elements matching a selector, in document order
    fn query_selector_all(&self, selector: &str) -> LocsmithResult<Vec<NodeId>> {
        Ok(SelectorList::parse(selector)?.select(self))
    }

    /// First element matching a selector
    fn query_selector(&self, selector: &str) -> LocsmithResult<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Whether `selector` matches `node` and nothing else
    fn resolves_to(&self, selector: &str, node: NodeId) -> bool {
        self.query_selector_all(selector)
            .is_ok_and(|nodes| nodes == [node])
    }

    /// Number of matches; unparsable selectors match nothing
    fn match_count(&self, selector: &str) -> usize {
        self.query_selector_all(selector).map_or(0, |nodes| nodes.len())
    }
}

/// Inline outline access used by the hover highlight
pub trait OutlineHost {
    /// Current inline outline of an element
    fn outline(&self, node: NodeId) -> Option<String>;

    /// Replace the inline outline; `false` when the node cannot be styled
    fn set_outline(&mut self, node: NodeId, outline: &str) -> bool;
}

/// Declarative element description used to build a [`Document`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Tag name
    pub tag: String,
    /// Attributes
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// Child of an [`ElementSpec`]: text or a nested element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// Text node
    Text(String),
    /// Element node
    Element(ElementSpec),
}

impl ElementSpec {
    /// Element with no attributes or children
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the id attribute
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Append to the class attribute
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.attrs
            .entry("class".to_string())
            .and_modify(|existing| {
                existing.push(' ');
                existing.push_str(&class);
            })
            .or_insert(class);
        self
    }

    /// Append a text child
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(NodeSpec::Text(text.into()));
        self
    }

    /// Append an element child
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(NodeSpec::Element(child));
        self
    }
}

/// JSON document fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFixture {
    /// Page address
    #[serde(default)]
    pub url: Option<String>,
    /// Hosting frame attributes for frame documents
    #[serde(default)]
    pub frame: Option<FrameHost>,
    /// Selector of the focused element
    #[serde(default)]
    pub active: Option<String>,
    /// Document element
    pub root: ElementSpec,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
        outline: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
    data: NodeData,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// In-memory document
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    url: Option<String>,
    frame_host: Option<FrameHost>,
    active: Option<NodeId>,
}

impl Document {
    /// Build a document whose document element is `root`
    #[must_use]
    pub fn from_spec(root: ElementSpec) -> Self {
        let mut doc = Self::default();
        let id = doc.insert(None, NodeSpec::Element(root));
        doc.root = Some(id);
        doc
    }

    /// Build a document from a parsed fixture
    pub fn from_fixture(fixture: DocumentFixture) -> LocsmithResult<Self> {
        let mut doc = Self::from_spec(fixture.root);
        doc.url = fixture.url;
        doc.frame_host = fixture.frame;
        if let Some(selector) = fixture.active {
            let active = doc.query_selector(&selector)?.ok_or_else(|| {
                LocsmithError::fixture(format!("active selector '{selector}' matches nothing"))
            })?;
            doc.active = Some(active);
        }
        Ok(doc)
    }

    /// Parse a JSON fixture
    pub fn from_json_str(json: &str) -> LocsmithResult<Self> {
        let fixture: DocumentFixture = serde_json::from_str(json)?;
        Self::from_fixture(fixture)
    }

    /// Load a JSON fixture from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> LocsmithResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Set the page address
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Mark this as a frame document hosted by `host`
    #[must_use]
    pub fn with_frame_host(mut self, host: FrameHost) -> Self {
        self.frame_host = Some(host);
        self
    }

    /// Move focus to an element
    pub fn set_active(&mut self, node: Option<NodeId>) {
        self.active = node.filter(|node| self.is_element(*node));
    }

    /// Set or replace an attribute; `false` for non-elements
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        match self.nodes.get_mut(node.index()).map(|n| &mut n.data) {
            Some(NodeData::Element { attrs, .. }) => {
                attrs.insert(name.to_string(), value.to_string());
                true
            }
            _ => false,
        }
    }

    /// Append a subtree under `parent`, returning the new element
    pub fn append_child(&mut self, parent: NodeId, child: ElementSpec) -> Option<NodeId> {
        if !self.is_element(parent) {
            return None;
        }
        let id = self.insert(Some(parent), NodeSpec::Element(child));
        let attached = self.nodes[parent.index()].attached;
        self.mark_attached(id, attached);
        self.nodes[parent.index()].children.push(id);
        Some(id)
    }

    /// Remove a subtree from the document; handles stay valid but detached
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node.index()).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent.index()].children.retain(|child| *child != node);
        self.nodes[node.index()].parent = None;
        if self.root == Some(node) {
            self.root = None;
        }
        self.mark_attached(node, false);
    }

    /// Whether the node is reachable from the document element
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes.get(node.index()).is_some_and(|n| n.attached)
    }

    fn mark_attached(&mut self, node: NodeId, attached: bool) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let entry = &mut self.nodes[current.index()];
            entry.attached = attached;
            stack.extend(entry.children.iter().copied());
        }
    }

    fn insert(&mut self, parent: Option<NodeId>, spec: NodeSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        match spec {
            NodeSpec::Text(text) => self.nodes.push(Node {
                parent,
                children: Vec::new(),
                attached: true,
                data: NodeData::Text(text),
            }),
            NodeSpec::Element(element) => {
                let attrs = element
                    .attrs
                    .into_iter()
                    .map(|(name, value)| (name.to_ascii_lowercase(), value))
                    .collect();
                self.nodes.push(Node {
                    parent,
                    children: Vec::new(),
                    attached: true,
                    data: NodeData::Element {
                        tag: element.tag.to_ascii_lowercase(),
                        attrs,
                        outline: None,
                    },
                });
                let children: Vec<NodeId> = element
                    .children
                    .into_iter()
                    .map(|child| self.insert(Some(id), child))
                    .collect();
                self.nodes[id.index()].children = children;
            }
        }
        id
    }

    fn element(&self, node: NodeId) -> Option<(&str, &BTreeMap<String, String>)> {
        match &self.nodes.get(node.index())?.data {
            NodeData::Element { tag, attrs, .. } => Some((tag.as_str(), attrs)),
            NodeData::Text(_) => None,
        }
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(entry) = self.nodes.get(node.index()) else {
            return;
        };
        match &entry.data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element { tag, attrs, .. } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in &entry.children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    fn write_text(&self, node: NodeId, out: &mut String) {
        let Some(entry) = self.nodes.get(node.index()) else {
            return;
        };
        match &entry.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { .. } => {
                for child in &entry.children {
                    self.write_text(*child, out);
                }
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

impl DomTree for Document {
    fn document_element(&self) -> Option<NodeId> {
        self.root
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|(tag, _)| tag)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.1.get(name).map(String::as_str)
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.nodes
            .get(node.index())?
            .parent
            .filter(|parent| self.is_element(*parent))
    }

    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.index())
            .map(|entry| {
                entry
                    .children
                    .iter()
                    .copied()
                    .filter(|child| self.is_element(*child))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_text(node, &mut out);
        out
    }

    fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        if self.is_element(node) {
            self.write_html(node, &mut out);
        }
        out
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|node| self.is_attached(*node))
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn frame_host(&self) -> Option<&FrameHost> {
        self.frame_host.as_ref()
    }
}

impl OutlineHost for Document {
    fn outline(&self, node: NodeId) -> Option<String> {
        match &self.nodes.get(node.index())?.data {
            NodeData::Element { outline, .. } => outline.clone(),
            NodeData::Text(_) => None,
        }
    }

    fn set_outline(&mut self, node: NodeId, value: &str) -> bool {
        let Some(entry) = self.nodes.get_mut(node.index()) else {
            return false;
        };
        if !entry.attached {
            return false;
        }
        match &mut entry.data {
            NodeData::Element { outline, .. } => {
                *outline = (!value.is_empty()).then(|| value.to_string());
                true
            }
            NodeData::Text(_) => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::from_spec(
            ElementSpec::new("html").child(
                ElementSpec::new("BODY")
                    .child(
                        ElementSpec::new("ul")
                            .child(ElementSpec::new("li").text("one"))
                            .child(ElementSpec::new("li").class("hot").text("two"))
                            .child(ElementSpec::new("li").text("three")),
                    )
                    .child(
                        ElementSpec::new("label")
                            .text("Email ")
                            .child(ElementSpec::new("input").id("email").attr("type", "email")),
                    ),
            ),
        )
    }

    mod tree_tests {
        use super::*;

        #[test]
        fn test_document_order() {
            let doc = sample();
            let tags: Vec<_> = doc
                .elements()
                .into_iter()
                .filter_map(|n| doc.tag_name(n))
                .collect();
            assert_eq!(tags, ["html", "body", "ul", "li", "li", "li", "label", "input"]);
        }

        #[test]
        fn test_body_and_ancestors() {
            let doc = sample();
            let body = doc.body().unwrap();
            let input = doc.element_by_id("email").unwrap();
            assert_eq!(doc.ancestors(input).len(), 3);
            assert_eq!(doc.ancestors(input)[1], body);
            assert_eq!(doc.tag_name(doc.closest(input, "label").unwrap()), Some("label"));
            assert_eq!(doc.closest(input, "form"), None);
        }

        #[test]
        fn test_position_of_type() {
            let doc = sample();
            let items = doc.query_selector_all("li").unwrap();
            assert_eq!(doc.position_of_type(items[2]), 3);
            assert_eq!(doc.siblings_of_type(items[0]).len(), 3);
            assert_eq!(doc.position_of_type(doc.document_element().unwrap()), 1);
        }

        #[test]
        fn test_text_and_markup() {
            let doc = sample();
            let label = doc.query_selector("label").unwrap().unwrap();
            assert_eq!(doc.text_content(label), "Email ");
            assert_eq!(
                doc.outer_html(label),
                "<label>Email <input id=\"email\" type=\"email\"></label>"
            );
        }

        #[test]
        fn test_unique_id() {
            let mut doc = sample();
            let input = doc.element_by_id("email").unwrap();
            assert_eq!(doc.unique_id(input), Some("email"));
            let ul = doc.query_selector("ul").unwrap().unwrap();
            doc.set_attribute(ul, "id", "email");
            assert_eq!(doc.unique_id(input), None);
        }

        #[test]
        fn test_unique_id_requires_the_holder() {
            let mut doc = sample();
            let ul = doc.query_selector("ul").unwrap().unwrap();
            let li = doc.query_selector("li").unwrap().unwrap();
            doc.set_attribute(li, "id", "row");
            doc.detach(ul);
            assert_eq!(doc.unique_id(li), None);
        }

        #[test]
        fn test_resolves_to() {
            let doc = sample();
            let input = doc.element_by_id("email").unwrap();
            let ul = doc.query_selector("ul").unwrap().unwrap();
            assert!(doc.resolves_to("#email", input));
            assert!(!doc.resolves_to("#email", ul));
            assert!(!doc.resolves_to("li", doc.query_selector("li").unwrap().unwrap()));
            assert!(!doc.resolves_to("div >", input));
        }

        #[test]
        fn test_text_nodes_are_not_elements() {
            let doc = sample();
            let li = doc.query_selector("li").unwrap().unwrap();
            let text = NodeId::new(li.index() + 1);
            assert!(!doc.is_element(text));
            assert_eq!(doc.tag_name(text), None);
            assert!(!doc.is_element(NodeId::new(9999)));
        }
    }

    mod mutation_tests {
        use super::*;

        #[test]
        fn test_detach_and_outline() {
            let mut doc = sample();
            let ul = doc.query_selector("ul").unwrap().unwrap();
            let li = doc.query_selector("li").unwrap().unwrap();
            assert!(doc.set_outline(li, "1px solid red"));
            assert_eq!(doc.outline(li).as_deref(), Some("1px solid red"));
            doc.detach(ul);
            assert!(!doc.is_attached(li));
            assert!(!doc.set_outline(li, ""));
            assert_eq!(doc.match_count("li"), 0);
        }

        #[test]
        fn test_append_child() {
            let mut doc = sample();
            let body = doc.body().unwrap();
            let added = doc
                .append_child(body, ElementSpec::new("button").text("Save"))
                .unwrap();
            assert_eq!(doc.parent_element(added), Some(body));
            assert_eq!(doc.match_count("body > button"), 1);
        }
    }

    mod fixture_tests {
        use super::*;

        #[test]
        fn test_json_fixture() {
            let json = r##"{
                "url": "https://shop.example/cart",
                "frame": {"title": "checkout"},
                "active": "#q",
                "root": {"tag": "html", "children": [
                    {"tag": "body", "children": [
                        {"tag": "input", "attrs": {"id": "q", "type": "search"}},
                        "trailing text"
                    ]}
                ]}
            }"##;
            let doc = Document::from_json_str(json).unwrap();
            assert_eq!(doc.url(), Some("https://shop.example/cart"));
            assert_eq!(doc.frame_host().unwrap().attribute("title"), Some("checkout"));
            assert_eq!(doc.active_element(), doc.element_by_id("q"));
            assert_eq!(doc.text_content(doc.body().unwrap()), "trailing text");
        }

        #[test]
        fn test_fixture_active_must_match() {
            let json = r##"{"active": "#missing", "root": {"tag": "html"}}"##;
            assert!(matches!(
                Document::from_json_str(json),
                Err(LocsmithError::Fixture { .. })
            ));
        }

        #[test]
        fn test_fixture_bad_json() {
            assert!(matches!(
                Document::from_json_str("{\"root\": 3}"),
                Err(LocsmithError::Json(_))
            ));
        }
    }
}
