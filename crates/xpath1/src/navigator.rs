//! Defines the core abstraction for a navigable, read-only document tree.
use std::hash::Hash;

/// The kind of position a navigator can sit on, aligned with the XPath 1.0
/// data model as far as the HTML tree provides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    Doctype,
}

/// The universal contract for a cursor over a read-only, hierarchical document.
///
/// This trait is the heart of the decoupled architecture. The XPath engine is
/// written exclusively against this trait, allowing it to operate on any
/// document representation that implements it.
///
/// A navigator is a small value type: it identifies one position in the tree
/// (a node, or one attribute of an element) and the move methods mutate it in
/// place, returning `false` when the move is impossible. Failed moves leave
/// the cursor where it was.
///
/// `'a` is the lifetime of the underlying document.
pub trait Navigator<'a>: std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash {
    /// The kind of the current position. An attribute position reports
    /// [`NodeKind::Attribute`] regardless of the element it belongs to.
    fn node_kind(&self) -> NodeKind;

    /// The local name of the current position: the attribute key when sitting
    /// on an attribute, the tag name when sitting on an element, and the
    /// empty string everywhere else.
    fn local_name(&self) -> &'a str;

    /// The string value of the current position, as defined by the XPath 1.0
    /// `string()` function.
    /// - For an attribute, its value.
    /// - For a text or comment node, its content.
    /// - For anything else, the concatenation of all descendant text.
    fn value(&self) -> String;

    /// Jumps back to the root the navigator was created with and leaves any
    /// attribute position.
    fn move_to_root(&mut self);

    /// Moves to the parent. From an attribute position this pops back to the
    /// owning element; otherwise it follows the tree's parent link, failing
    /// only when there is none. The creation root does not clamp upward
    /// movement.
    fn move_to_parent(&mut self) -> bool;

    /// Moves to the first child. Fails on an attribute position or a node
    /// without children.
    fn move_to_first_child(&mut self) -> bool;

    /// Moves to the next sibling, whatever its kind. Fails on an attribute
    /// position or the last sibling.
    fn move_to_next_sibling(&mut self) -> bool;

    /// Moves to the previous sibling, whatever its kind. Fails on an
    /// attribute position or the first sibling.
    fn move_to_previous_sibling(&mut self) -> bool;

    /// Moves to the head of the sibling chain. Fails on an attribute
    /// position, and on a node that is already first among its siblings.
    fn move_to_first_sibling(&mut self) -> bool;

    /// Advances to the next attribute of the current element, entering the
    /// attribute list on the first call. Fails past the last attribute.
    fn move_to_next_attribute(&mut self) -> bool;
}

// Test utilities - publicly available for integration testing in downstream crates
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::hash::Hasher;

    // --- Mock Implementation for TDD ---

    #[derive(Debug, Clone)]
    struct MockNodeData {
        kind: NodeKind,
        name: &'static str,
        value: String,
        children: Vec<usize>,
        attrs: Vec<(&'static str, &'static str)>,
    }

    #[derive(Debug)]
    pub struct MockTree {
        nodes: HashMap<usize, MockNodeData>,
        // Maps a child ID back to its parent ID for upward moves.
        parent_map: HashMap<usize, usize>,
    }

    /// A simple in-memory cursor that holds a reference to its tree.
    /// This is necessary so that the cursor can navigate itself (e.g. find
    /// its parent or siblings).
    #[derive(Debug, Clone, Copy)]
    pub struct MockNav<'a> {
        pub tree: &'a MockTree,
        pub root: usize,
        pub curr: usize,
        pub attr: Option<usize>,
    }

    impl<'a> MockNav<'a> {
        /// A cursor positioned on the virtual root.
        pub fn new(tree: &'a MockTree) -> Self {
            MockNav {
                tree,
                root: 0,
                curr: 0,
                attr: None,
            }
        }

        /// A cursor positioned on an arbitrary node, still rooted at the
        /// virtual root.
        pub fn at(tree: &'a MockTree, id: usize) -> Self {
            MockNav {
                tree,
                root: 0,
                curr: id,
                attr: None,
            }
        }

        fn data(&self) -> &'a MockNodeData {
            &self.tree.nodes[&self.curr]
        }

        /// The position of the current node among its parent's children,
        /// along with that child list. `None` at the top of the tree.
        fn sibling_position(&self) -> Option<(&'a [usize], usize)> {
            let parent = *self.tree.parent_map.get(&self.curr)?;
            let siblings = self.tree.nodes[&parent].children.as_slice();
            let pos = siblings.iter().position(|&id| id == self.curr)?;
            Some((siblings, pos))
        }
    }

    impl<'a> PartialEq for MockNav<'a> {
        fn eq(&self, other: &Self) -> bool {
            self.curr == other.curr && self.attr == other.attr
        }
    }
    impl<'a> Eq for MockNav<'a> {}

    impl<'a> Hash for MockNav<'a> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.curr.hash(state);
            self.attr.hash(state);
        }
    }

    impl<'a> Navigator<'a> for MockNav<'a> {
        fn node_kind(&self) -> NodeKind {
            if self.attr.is_some() {
                NodeKind::Attribute
            } else {
                self.data().kind
            }
        }

        fn local_name(&self) -> &'a str {
            if let Some(i) = self.attr {
                return self.data().attrs[i].0;
            }
            match self.data().kind {
                NodeKind::Element => self.data().name,
                _ => "",
            }
        }

        fn value(&self) -> String {
            if let Some(i) = self.attr {
                return self.data().attrs[i].1.to_string();
            }
            self.data().value.clone()
        }

        fn move_to_root(&mut self) {
            self.curr = self.root;
            self.attr = None;
        }

        fn move_to_parent(&mut self) -> bool {
            if self.attr.is_some() {
                self.attr = None;
                return true;
            }
            match self.tree.parent_map.get(&self.curr) {
                Some(&parent) => {
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
            match self.data().children.first() {
                Some(&first) => {
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
            match self.sibling_position() {
                Some((siblings, pos)) if pos + 1 < siblings.len() => {
                    self.curr = siblings[pos + 1];
                    true
                }
                _ => false,
            }
        }

        fn move_to_previous_sibling(&mut self) -> bool {
            if self.attr.is_some() {
                return false;
            }
            match self.sibling_position() {
                Some((siblings, pos)) if pos > 0 => {
                    self.curr = siblings[pos - 1];
                    true
                }
                _ => false,
            }
        }

        fn move_to_first_sibling(&mut self) -> bool {
            if self.attr.is_some() {
                return false;
            }
            match self.sibling_position() {
                Some((siblings, pos)) if pos > 0 => {
                    self.curr = siblings[0];
                    true
                }
                _ => false,
            }
        }

        fn move_to_next_attribute(&mut self) -> bool {
            let count = self.data().attrs.len();
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

    /// Creates a simple mock tree for testing:
    /// <!DOCTYPE html> <!-- id 9 -->
    /// <root> <!-- id 0 -->
    ///   <p id="p1" lang="en">Hello</p> <!-- id 1, text 4 -->
    ///   <!-- comment node --> <!-- id 8 -->
    ///   <div></div> <!-- id 5 -->
    ///   <p>World</p> <!-- id 6, text 7 -->
    /// </root>
    ///
    /// Node 0 is the document root; the doctype and the elements under it are
    /// all siblings in document order, like an HTML parser would lay them out.
    pub fn create_test_tree() -> MockTree {
        let mut nodes = HashMap::new();
        let mut parent_map = HashMap::new();

        nodes.insert(
            0,
            MockNodeData {
                kind: NodeKind::Root,
                name: "",
                value: "Hello World".to_string(),
                children: vec![9, 1, 8, 5, 6],
                attrs: vec![],
            },
        );

        nodes.insert(
            9,
            MockNodeData {
                kind: NodeKind::Doctype,
                name: "html",
                value: "".to_string(),
                children: vec![],
                attrs: vec![],
            },
        );
        parent_map.insert(9, 0);

        nodes.insert(
            1,
            MockNodeData {
                kind: NodeKind::Element,
                name: "p",
                value: "Hello".to_string(),
                children: vec![4],
                attrs: vec![("id", "p1"), ("lang", "en")],
            },
        );
        parent_map.insert(1, 0);

        nodes.insert(
            4,
            MockNodeData {
                kind: NodeKind::Text,
                name: "",
                value: "Hello".to_string(),
                children: vec![],
                attrs: vec![],
            },
        );
        parent_map.insert(4, 1);

        nodes.insert(
            8,
            MockNodeData {
                kind: NodeKind::Comment,
                name: "",
                value: " comment node ".to_string(),
                children: vec![],
                attrs: vec![],
            },
        );
        parent_map.insert(8, 0);

        nodes.insert(
            5,
            MockNodeData {
                kind: NodeKind::Element,
                name: "div",
                value: "".to_string(),
                children: vec![],
                attrs: vec![],
            },
        );
        parent_map.insert(5, 0);

        nodes.insert(
            6,
            MockNodeData {
                kind: NodeKind::Element,
                name: "p",
                value: "World".to_string(),
                children: vec![7],
                attrs: vec![],
            },
        );
        parent_map.insert(6, 0);

        nodes.insert(
            7,
            MockNodeData {
                kind: NodeKind::Text,
                name: "",
                value: "World".to_string(),
                children: vec![],
                attrs: vec![],
            },
        );
        parent_map.insert(7, 6);

        MockTree { nodes, parent_map }
    }

}
