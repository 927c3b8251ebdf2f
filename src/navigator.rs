//! The cursor that exposes a parsed document to the XPath engine.

use std::hash::{Hash, Hasher};

use htmlpath_dom::{Document, NodeId, NodeType};
use htmlpath_xpath1::{Navigator, NodeKind};

use crate::node::Node;

/// A position inside a [`Document`]: a node, or one attribute of an
/// element.
///
/// The engine forks cursors freely while exploring path branches, so the
/// type is `Copy`: three words of state, no heap. All moves follow the
/// tree links unfiltered, which is what lets path steps see text,
/// comment, and doctype siblings.
#[derive(Debug, Clone, Copy)]
pub struct NodeNavigator<'d> {
    doc: &'d Document,
    root: NodeId,
    curr: NodeId,
    attr: Option<usize>,
}

impl<'d> NodeNavigator<'d> {
    /// A cursor positioned at `id`, with `id` as the navigation root.
    /// Absolute paths evaluated through it resolve against `id`, not
    /// against the document node.
    pub fn new(doc: &'d Document, id: NodeId) -> Self {
        NodeNavigator {
            doc,
            root: id,
            curr: id,
            attr: None,
        }
    }

    /// The node the cursor sits on. When positioned on an attribute this
    /// is the owning element.
    pub fn current_id(&self) -> NodeId {
        self.curr
    }

    /// Whether the cursor is positioned on an attribute rather than on
    /// the node itself.
    pub fn is_on_attribute(&self) -> bool {
        self.attr.is_some()
    }

    /// Materializes the current position as a [`Node`]. An attribute
    /// position becomes a detached synthetic node carrying the
    /// attribute's key and value; anything else is the tree node itself.
    pub fn current_node(&self) -> Node<'d> {
        match self.attr {
            Some(i) => {
                let attr = &self.doc.get(self.curr).attrs[i];
                Node::Synthetic {
                    name: attr.key.clone(),
                    value: attr.value.clone(),
                }
            }
            None => Node::Tree {
                doc: self.doc,
                id: self.curr,
            },
        }
    }
}

impl<'d> Navigator<'d> for NodeNavigator<'d> {
    fn node_kind(&self) -> NodeKind {
        if self.attr.is_some() {
            return NodeKind::Attribute;
        }
        match self.doc.get(self.curr).node_type {
            NodeType::Document => NodeKind::Root,
            NodeType::Doctype => NodeKind::Doctype,
            NodeType::Element => NodeKind::Element,
            NodeType::Text => NodeKind::Text,
            NodeType::Comment => NodeKind::Comment,
        }
    }

    fn local_name(&self) -> &'d str {
        if let Some(i) = self.attr {
            return self.doc.get(self.curr).attrs[i].key.as_str();
        }
        let node = self.doc.get(self.curr);
        match node.node_type {
            NodeType::Element => node.data.as_str(),
            _ => "",
        }
    }

    fn value(&self) -> String {
        if let Some(i) = self.attr {
            return self.doc.get(self.curr).attrs[i].value.clone();
        }
        let node = self.doc.get(self.curr);
        match node.node_type {
            NodeType::Text | NodeType::Comment => node.data.clone(),
            _ => {
                let mut out = String::new();
                self.doc.text_content(self.curr, &mut out);
                out
            }
        }
    }

    fn move_to_root(&mut self) {
        self.curr = self.root;
        self.attr = None;
    }

    fn move_to_parent(&mut self) -> bool {
        // Climbing out of an attribute lands on the owning element, not
        // on the element's parent.
        if self.attr.is_some() {
            self.attr = None;
            return true;
        }
        match self.doc.parent(self.curr) {
            Some(parent) => {
                self.curr = parent;
                true
            }
            None => false,
        }
    }

    fn move_to_first_child(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        match self.doc.first_child(self.curr) {
            Some(first) => {
                self.curr = first;
                true
            }
            None => false,
        }
    }

    fn move_to_next_sibling(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        match self.doc.next_sibling(self.curr) {
            Some(next) => {
                self.curr = next;
                true
            }
            None => false,
        }
    }

    fn move_to_previous_sibling(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        match self.doc.prev_sibling(self.curr) {
            Some(prev) => {
                self.curr = prev;
                true
            }
            None => false,
        }
    }

    fn move_to_first_sibling(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        let mut head = match self.doc.prev_sibling(self.curr) {
            Some(prev) => prev,
            None => return false,
        };
        while let Some(prev) = self.doc.prev_sibling(head) {
            head = prev;
        }
        self.curr = head;
        true
    }

    fn move_to_next_attribute(&mut self) -> bool {
        let count = self.doc.get(self.curr).attrs.len();
        match self.attr {
            None if count > 0 => {
                self.attr = Some(0);
                true
            }
            Some(i) if i + 1 < count => {
                self.attr = Some(i + 1);
                true
            }
            _ => false,
        }
    }
}

impl PartialEq for NodeNavigator<'_> {
    /// Two cursors are equal when they sit on the same position of the
    /// same document. The stored root plays no part: the engine compares
    /// positions, not origins.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.curr == other.curr && self.attr == other.attr
    }
}

impl Eq for NodeNavigator<'_> {}

impl Hash for NodeNavigator<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.doc, state);
        self.curr.hash(state);
        self.attr.hash(state);
    }
}
