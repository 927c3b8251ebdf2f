//! html5ever front end.
//!
//! A [`TreeSink`] that builds straight into the arena, so parsing a
//! document allocates one `Vec` of nodes and no reference-counted cells.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ExpandedName, ParseOpts, QualName, parse_document};

use crate::error::DomError;
use crate::tree::{Document, NodeData, NodeId, NodeType};

/// Builds a [`Document`] from the tree builder's callbacks.
struct Sink {
    doc: Document,
    /// Qualified element names, kept for the tree builder's scope checks
    /// while parsing runs and dropped when it finishes. The arena itself
    /// only stores local names.
    names: HashMap<NodeId, QualName>,
}

impl Sink {
    fn new() -> Self {
        Sink {
            doc: Document::new(),
            names: HashMap::new(),
        }
    }

    fn new_text(&mut self, text: StrTendril) -> NodeId {
        self.doc
            .push_node(NodeData::new(NodeType::Text, text.to_string()))
    }
}

fn convert_attr(attr: Attribute) -> crate::tree::Attribute {
    let namespace = if attr.name.ns.is_empty() {
        None
    } else {
        Some(attr.name.ns.to_string())
    };
    crate::tree::Attribute {
        namespace,
        key: attr.name.local.to_string(),
        value: attr.value.to_string(),
    }
}

impl TreeSink for Sink {
    type Handle = NodeId;
    type Output = Document;

    fn finish(self) -> Document {
        self.doc
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        log::trace!("parse error: {msg}");
        self.doc.errors.push(msg.into_owned());
    }

    fn get_document(&mut self) -> NodeId {
        self.doc.root()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> ExpandedName<'a> {
        self.names
            .get(target)
            .expect("elem_name called on a non-element node")
            .expanded()
    }

    fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> NodeId {
        let mut data = NodeData::new(NodeType::Element, name.local.to_string());
        data.attrs = attrs.into_iter().map(convert_attr).collect();
        let id = self.doc.push_node(data);
        self.names.insert(id, name);
        id
    }

    fn create_comment(&mut self, text: StrTendril) -> NodeId {
        self.doc
            .push_node(NodeData::new(NodeType::Comment, text.to_string()))
    }

    // The HTML tokenizer turns `<?...>` into bogus comments before this
    // could ever be called; kept total for the trait.
    fn create_pi(&mut self, target: StrTendril, data: StrTendril) -> NodeId {
        self.doc
            .push_node(NodeData::new(NodeType::Comment, format!("{target} {data}")))
    }

    fn append(&mut self, parent: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(node) => self.doc.append_child(*parent, node),
            NodeOrText::AppendText(text) => {
                // Merge adjacent text instead of growing the sibling list.
                if let Some(last) = self.doc.last_child(*parent) {
                    if self.doc.get(last).node_type == NodeType::Text {
                        self.doc.get_mut(last).data.push_str(&text);
                        return;
                    }
                }
                let node = self.new_text(text);
                self.doc.append_child(*parent, node);
            }
        }
    }

    fn append_before_sibling(&mut self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let node = match new_node {
            NodeOrText::AppendNode(node) => {
                self.doc.detach(node);
                node
            }
            NodeOrText::AppendText(text) => {
                if let Some(prev) = self.doc.prev_sibling(*sibling) {
                    if self.doc.get(prev).node_type == NodeType::Text {
                        self.doc.get_mut(prev).data.push_str(&text);
                        return;
                    }
                }
                self.new_text(text)
            }
        };
        self.doc.insert_before(*sibling, node);
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        if self.doc.parent(*element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &mut self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut data = NodeData::new(NodeType::Doctype, name.to_string());
        if !public_id.is_empty() {
            data.attrs.push(crate::tree::Attribute {
                namespace: None,
                key: "public".to_string(),
                value: public_id.to_string(),
            });
        }
        if !system_id.is_empty() {
            data.attrs.push(crate::tree::Attribute {
                namespace: None,
                key: "system".to_string(),
                value: system_id.to_string(),
            });
        }
        let id = self.doc.push_node(data);
        let root = self.doc.root();
        self.doc.append_child(root, id);
    }

    // Template children stay inline in the tree, so the insertion point
    // for template contents is the template element itself.
    fn get_template_contents(&mut self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.doc.quirks_mode = !matches!(mode, QuirksMode::NoQuirks);
    }

    fn add_attrs_if_missing(&mut self, target: &NodeId, attrs: Vec<Attribute>) {
        let node = self.doc.get_mut(*target);
        for attr in attrs.into_iter().map(convert_attr) {
            if !node
                .attrs
                .iter()
                .any(|a| a.key == attr.key && a.namespace == attr.namespace)
            {
                node.attrs.push(attr);
            }
        }
    }

    fn remove_from_parent(&mut self, target: &NodeId) {
        self.doc.detach(*target);
    }

    fn reparent_children(&mut self, node: &NodeId, new_parent: &NodeId) {
        let children: Vec<NodeId> = self.doc.children(*node).collect();
        for child in children {
            self.doc.detach(child);
            self.doc.append_child(*new_parent, child);
        }
    }
}

impl Document {
    /// Parse a complete HTML document from a string.
    ///
    /// Parsing never fails: malformed input gets the same error recovery
    /// a browser applies, and the complaints accumulate in
    /// [`Document::errors`].
    pub fn parse_str(html: &str) -> Document {
        parse_document(Sink::new(), ParseOpts::default()).one(html)
    }

    /// Parse a document from a byte stream, decoding it as UTF-8 after
    /// an optional BOM.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Document> {
        parse_document(Sink::new(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut reader)
    }

    /// Read and parse an HTML file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document, DomError> {
        let file = File::open(path)?;
        let doc = Document::from_reader(BufReader::new(file))?;
        Ok(doc)
    }
}
