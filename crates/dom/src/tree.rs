//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` owned by the [`Document`]; they refer to
//! each other through [`NodeId`] indices instead of pointers, so the tree
//! is `Send` and node handles stay valid for the document's lifetime.

use std::num::NonZeroU32;

/// Index of a node inside a [`Document`] arena.
///
/// Slot zero of the arena is a placeholder, which keeps the index nonzero
/// and lets `Option<NodeId>` occupy the same space as `NodeId`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index > 0 && index < u32::MAX as usize);
        NodeId(NonZeroU32::new(index as u32).unwrap())
    }

    #[inline]
    pub(crate) fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// The kind of a tree node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeType {
    /// The document itself, root of the tree.
    Document,
    /// A `<!DOCTYPE ...>` declaration.
    Doctype,
    Element,
    Text,
    Comment,
}

/// A single attribute of an element.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Attribute {
    /// Namespace url for foreign attributes (`xml:`, `xlink:`, ...);
    /// `None` for ordinary HTML attributes.
    pub namespace: Option<String>,
    pub key: String,
    pub value: String,
}

/// Payload and links of one arena slot.
#[derive(Clone, Debug)]
pub struct NodeData {
    pub node_type: NodeType,
    /// Tag name for elements, text for text and comment nodes, the
    /// doctype name for doctype nodes, empty for the document node.
    pub data: String,
    pub attrs: Vec<Attribute>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
}

impl NodeData {
    pub(crate) fn new(node_type: NodeType, data: String) -> Self {
        NodeData {
            node_type,
            data,
            attrs: Vec::new(),
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
        }
    }

    /// Value of the first attribute with the given key, ignoring namespaces.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|a| a.key == key)
    }
}

/// A parsed HTML document owning all of its nodes.
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    /// Recoverable parse errors, in the order the parser reported them.
    pub errors: Vec<String>,
    /// Whether the parser switched into quirks mode.
    pub quirks_mode: bool,
}

impl Document {
    /// An empty document containing only the root node.
    pub fn new() -> Self {
        let placeholder = NodeData::new(NodeType::Document, String::new());
        let root_data = NodeData::new(NodeType::Document, String::new());
        Document {
            nodes: vec![placeholder, root_data],
            root: NodeId::from_index(1),
            errors: Vec::new(),
            quirks_mode: false,
        }
    }

    /// The document node at the top of the tree.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).first_child
    }

    #[inline]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).last_child
    }

    #[inline]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).prev_sibling
    }

    #[inline]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).next_sibling
    }

    /// Iterator over the direct children of a node, left to right.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Allocate a new detached node and return its id.
    pub(crate) fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(data);
        id
    }

    /// Link `child` as the last child of `parent`. `child` must be detached.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.get(child).parent.is_none());
        match self.get(parent).last_child {
            Some(last) => {
                self.get_mut(last).next_sibling = Some(child);
                self.get_mut(child).prev_sibling = Some(last);
            }
            None => self.get_mut(parent).first_child = Some(child),
        }
        self.get_mut(parent).last_child = Some(child);
        self.get_mut(child).parent = Some(parent);
    }

    /// Link `new` immediately before `sibling`. `sibling` must have a
    /// parent and `new` must be detached.
    pub(crate) fn insert_before(&mut self, sibling: NodeId, new: NodeId) {
        debug_assert!(self.get(new).parent.is_none());
        let parent = self.get(sibling).parent;
        debug_assert!(parent.is_some());
        let prev = self.get(sibling).prev_sibling;
        match prev {
            Some(prev) => {
                self.get_mut(prev).next_sibling = Some(new);
                self.get_mut(new).prev_sibling = Some(prev);
            }
            None => {
                if let Some(parent) = parent {
                    self.get_mut(parent).first_child = Some(new);
                }
            }
        }
        self.get_mut(sibling).prev_sibling = Some(new);
        self.get_mut(new).next_sibling = Some(sibling);
        self.get_mut(new).parent = parent;
    }

    /// Unlink a node from its parent and siblings. The node keeps its
    /// own children; its arena slot is never reclaimed.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let NodeData {
            parent,
            prev_sibling,
            next_sibling,
            ..
        } = *self.get(id);

        match prev_sibling {
            Some(prev) => self.get_mut(prev).next_sibling = next_sibling,
            None => {
                if let Some(parent) = parent {
                    self.get_mut(parent).first_child = next_sibling;
                }
            }
        }
        match next_sibling {
            Some(next) => self.get_mut(next).prev_sibling = prev_sibling,
            None => {
                if let Some(parent) = parent {
                    self.get_mut(parent).last_child = prev_sibling;
                }
            }
        }
        let node = self.get_mut(id);
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Append the concatenated text of the subtree under `id` to `out`,
    /// in document order. Comment subtrees contribute nothing.
    pub fn text_content(&self, id: NodeId, out: &mut String) {
        let node = self.get(id);
        match node.node_type {
            NodeType::Text => out.push_str(&node.data),
            NodeType::Comment => {}
            _ => {
                for child in self.children(id) {
                    self.text_content(child, out);
                }
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("errors", &self.errors.len())
            .field("quirks_mode", &self.quirks_mode)
            .finish()
    }
}

/// See [`Document::children`].
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.get(id).next_sibling;
        Some(id)
    }
}
