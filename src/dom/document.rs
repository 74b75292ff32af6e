//! Document Tree - Node storage and structural operations.
//!
//! Manages the lifecycle of node handles:
//! - Arena allocation (handles never move, never get reused)
//! - Parent/child links with detach-on-insert semantics
//! - Attributes and inline style per element
//! - Listener table per node

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::event::{EventType, Listener};
use crate::error::{DomError, ParseError};

/// Document handle shared between the caller and the engine.
pub type SharedDocument = Rc<RefCell<Document>>;

// =============================================================================
// Node Handles
// =============================================================================

/// Stable handle to a node in a [`Document`].
///
/// Handles are plain indices, so they are cheap to copy and usable as map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of this node in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

// =============================================================================
// Node Data
// =============================================================================

/// Payload stored for each node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document itself. Always `NodeId(0)`.
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

impl NodeData {
    /// Element payload, if this node is an element.
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Can this node hold children?
    pub fn is_container(&self) -> bool {
        matches!(self, NodeData::Document | NodeData::Element(_))
    }
}

/// Tag, attributes and inline style of an element.
///
/// The `style` attribute is not kept in `attributes`; it is parsed into the
/// `style` map so presentation can be changed one property at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementData {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub style: IndexMap<String, String>,
}

impl ElementData {
    /// Create an element with a lowercase tag name.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Get an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Is `class` one of the whitespace-separated tokens of the `class` attribute?
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Set an attribute, routing `style` into the style map.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if name == "style" {
            self.style = parse_style_declarations(value);
        } else {
            self.attributes.insert(name.to_string(), value.to_string());
        }
    }
}

/// Parse `display: none; color: red` into an ordered property map.
///
/// Declarations without a colon are dropped.
pub fn parse_style_declarations(source: &str) -> IndexMap<String, String> {
    source
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(property, value)| (property.trim().to_ascii_lowercase(), value.trim().to_string()))
        .filter(|(property, _)| !property.is_empty())
        .collect()
}

/// Elements that never have children or a closing tag.
pub(crate) fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// An in-memory document tree.
pub struct Document {
    nodes: Vec<Node>,
    listeners: HashMap<NodeId, Vec<(EventType, Listener)>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            listeners: HashMap::new(),
        }
    }

    /// Build a document from a markup fragment.
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        let mut document = Self::new();
        let root = document.root();
        super::parse::parse_fragment(&mut document, root, markup)?;
        Ok(document)
    }

    /// Wrap this document for sharing with an engine.
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    /// The document node.
    #[inline]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always contains its document node.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Does this handle belong to this document?
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    fn slot(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    /// Store an already-built element, detached.
    pub(crate) fn adopt_element(&mut self, element: ElementData) -> NodeId {
        self.push(NodeData::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    /// Node payload.
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).map(|node| &node.data)
    }

    /// Element payload, if `id` is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.data(id).and_then(NodeData::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self.slot_mut(id)?.data {
            NodeData::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn is_comment(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Comment(_)))
    }

    /// Parent of a node (None when detached or for the document node).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Children in document order. Empty for unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Position of a node among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Iterate the ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&node| self.parent(node))
    }

    /// All descendants of a node in document (pre-)order, excluding the node.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Is the node attached to the document node?
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.root() || self.ancestors(id).any(|node| node == self.root())
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.data(id) {
            Some(NodeData::Text(text)) | Some(NodeData::Comment(text)) => text.clone(),
            _ => self
                .descendants(id)
                .into_iter()
                .filter_map(|node| match self.data(node) {
                    Some(NodeData::Text(text)) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.slot(parent)?.data.is_container() {
            return Err(DomError::NotAContainer(parent));
        }
        if matches!(self.slot(child)?.data, NodeData::Document) {
            return Err(DomError::Hierarchy { parent, child });
        }
        if parent == child || self.ancestors(parent).any(|node| node == child) {
            return Err(DomError::Hierarchy { parent, child });
        }
        Ok(())
    }

    /// Unlink a node from its parent, if any.
    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }

        // Inserting a node before itself keeps its position
        let reference = match reference {
            Some(reference) if reference == child => {
                let index = self.index_in_parent(child).unwrap_or(0);
                self.children(parent).get(index + 1).copied()
            }
            other => other,
        };

        self.detach(child);
        let index = match reference {
            Some(reference) => self
                .children(parent)
                .iter()
                .position(|&node| node == reference)
                .unwrap_or(self.children(parent).len()),
            None => self.children(parent).len(),
        };
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Put `new_child` into the slot `old_child` occupies under `parent`.
    ///
    /// `old_child` ends up detached; its own subtree is left intact.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), DomError> {
        if self.parent(old_child) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if new_child == old_child {
            return Ok(());
        }
        self.check_insert(parent, new_child)?;

        self.detach(new_child);
        let index = self
            .index_in_parent(old_child)
            .ok_or(DomError::NotAChild {
                parent,
                child: old_child,
            })?;
        self.nodes[parent.0].children[index] = new_child;
        self.nodes[new_child.0].parent = Some(parent);
        self.nodes[old_child.0].parent = None;
        Ok(())
    }

    /// Detach `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Attributes & Style
    // -------------------------------------------------------------------------

    /// Get an attribute of an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attribute(name))
    }

    /// Set an attribute. `style` replaces the whole inline style.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.element_mut(id)?.attributes.shift_remove(name))
    }

    /// Get an inline style property.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)
            .and_then(|element| element.style.get(property))
            .map(String::as_str)
    }

    /// Set an inline style property.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?
            .style
            .insert(property.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    /// Remove an inline style property, returning its previous value.
    pub fn remove_style(&mut self, id: NodeId, property: &str) -> Result<Option<String>, DomError> {
        Ok(self.element_mut(id)?.style.shift_remove(property))
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Attach a listener to a node. Listeners live as long as the document.
    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: EventType,
        listener: Listener,
    ) -> Result<(), DomError> {
        self.slot(id)?;
        self.listeners
            .entry(id)
            .or_default()
            .push((event_type, listener));
        Ok(())
    }

    /// Listeners of one type on a node, in attachment order.
    pub fn listeners(&self, id: NodeId, event_type: EventType) -> Vec<Listener> {
        self.listeners
            .get(&id)
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|(ty, _)| *ty == event_type)
                    .map(|(_, listener)| listener.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners of one type on a node.
    pub fn listener_count(&self, id: NodeId, event_type: EventType) -> usize {
        self.listeners
            .get(&id)
            .map_or(0, |listeners| listeners.iter().filter(|(ty, _)| *ty == event_type).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc.create_element("UL");
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        let c = doc.create_element("li");
        doc.append_child(root, list).unwrap();
        for item in [a, b, c] {
            doc.append_child(list, item).unwrap();
        }
        (doc, list, a, b, c)
    }

    #[test]
    fn test_create_and_append() {
        let (doc, list, a, b, c) = setup();

        assert_eq!(doc.element(list).unwrap().tag, "ul");
        assert_eq!(doc.children(list), &[a, b, c]);
        assert_eq!(doc.parent(b), Some(list));
        assert_eq!(doc.index_in_parent(c), Some(2));
        assert!(doc.is_connected(c));
    }

    #[test]
    fn test_replace_child_keeps_slot() {
        let (mut doc, list, a, b, c) = setup();
        let marker = doc.create_comment("marker");

        doc.replace_child(list, marker, b).unwrap();
        assert_eq!(doc.children(list), &[a, marker, c]);
        assert_eq!(doc.parent(b), None);
        assert!(!doc.is_connected(b));

        doc.replace_child(list, b, marker).unwrap();
        assert_eq!(doc.children(list), &[a, b, c]);
        assert_eq!(doc.parent(marker), None);
    }

    #[test]
    fn test_replace_child_rejects_non_child() {
        let (mut doc, list, _a, _b, _c) = setup();
        let stray = doc.create_element("span");
        let other = doc.create_element("span");

        let err = doc.replace_child(list, other, stray).unwrap_err();
        assert_eq!(
            err,
            DomError::NotAChild {
                parent: list,
                child: stray
            }
        );
    }

    #[test]
    fn test_replace_with_sibling_moves_it() {
        let (mut doc, list, a, b, c) = setup();

        doc.replace_child(list, c, a).unwrap();
        assert_eq!(doc.children(list), &[c, b]);
        assert_eq!(doc.parent(a), None);
    }

    #[test]
    fn test_insert_before() {
        let (mut doc, list, a, b, c) = setup();
        let d = doc.create_element("li");

        doc.insert_before(list, d, Some(b)).unwrap();
        assert_eq!(doc.children(list), &[a, d, b, c]);

        // Moving an existing child
        doc.insert_before(list, c, Some(a)).unwrap();
        assert_eq!(doc.children(list), &[c, a, d, b]);

        // Before itself is a no-op
        doc.insert_before(list, d, Some(d)).unwrap();
        assert_eq!(doc.children(list), &[c, a, d, b]);
    }

    #[test]
    fn test_hierarchy_errors() {
        let (mut doc, list, a, _b, _c) = setup();
        let text = doc.create_text("hi");

        assert_eq!(
            doc.append_child(a, list),
            Err(DomError::Hierarchy { parent: a, child: list })
        );
        assert_eq!(doc.append_child(text, a), Err(DomError::NotAContainer(text)));
        assert_eq!(
            doc.append_child(list, doc.root()),
            Err(DomError::Hierarchy {
                parent: list,
                child: doc.root()
            })
        );
    }

    #[test]
    fn test_style_and_attributes() {
        let (mut doc, list, a, _b, _c) = setup();

        doc.set_attribute(list, "class", "menu open").unwrap();
        assert!(doc.element(list).unwrap().has_class("open"));
        assert!(!doc.element(list).unwrap().has_class("men"));

        doc.set_attribute(a, "style", "display: inline; color: red").unwrap();
        assert_eq!(doc.style(a, "display"), Some("inline"));
        assert_eq!(doc.attribute(a, "style"), None);

        doc.set_style(a, "display", "none").unwrap();
        assert_eq!(doc.style(a, "display"), Some("none"));
        assert_eq!(doc.remove_style(a, "display").unwrap(), Some("none".to_string()));
        assert_eq!(doc.style(a, "display"), None);

        let text = doc.create_text("x");
        assert_eq!(doc.set_style(text, "display", "none"), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn test_descendants_preorder() {
        let (mut doc, list, a, b, c) = setup();
        let inner = doc.create_text("inner");
        doc.append_child(a, inner).unwrap();

        assert_eq!(doc.descendants(list), vec![a, inner, b, c]);
        assert_eq!(doc.text_content(list), "inner");
    }

    #[test]
    fn test_parse_style_declarations() {
        let style = parse_style_declarations(" Display : none ;color:red;; bogus ");
        assert_eq!(style.get("display").map(String::as_str), Some("none"));
        assert_eq!(style.get("color").map(String::as_str), Some("red"));
        assert_eq!(style.len(), 2);
    }
}
