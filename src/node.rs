//! Typed views over nodes of a parsed document.

use std::fmt;
use std::hash::{Hash, Hasher};

use htmlpath_dom::{Attribute, Document, NodeId, NodeType};
use regex::Regex;

use crate::error::Error;

/// A read-only view of one query result.
///
/// Most results are `Tree` positions inside a [`Document`]. Queries that
/// select attributes return `Synthetic` nodes instead: detached leaves
/// named after the attribute, whose text is the attribute's value, so an
/// attribute result reads through the same accessors as an element
/// result.
#[derive(Debug, Clone)]
pub enum Node<'d> {
    Tree { doc: &'d Document, id: NodeId },
    Synthetic { name: String, value: String },
}

impl<'d> Node<'d> {
    /// The document node at the top of `doc`, the usual starting point
    /// for queries over a freshly parsed document.
    pub fn from_document(doc: &'d Document) -> Node<'d> {
        Node::Tree {
            doc,
            id: doc.root(),
        }
    }

    /// The node's kind. Synthetic attribute nodes report `Element`.
    pub fn node_type(&self) -> NodeType {
        match *self {
            Node::Tree { doc, id } => doc.get(id).node_type,
            Node::Synthetic { .. } => NodeType::Element,
        }
    }

    /// The node's raw data: tag name for elements, content for text and
    /// comment nodes, the doctype name, empty for the document node. For
    /// a synthetic node this is the attribute's key.
    pub fn data(&self) -> &str {
        match self {
            Node::Tree { doc, id } => doc.get(*id).data.as_str(),
            Node::Synthetic { name, .. } => name.as_str(),
        }
    }

    /// Concatenated text of the subtree, in document order. Comment
    /// subtrees contribute nothing. For a synthetic node this is the
    /// attribute's value.
    pub fn inner_text(&self) -> String {
        match self {
            Node::Tree { doc, id } => {
                let mut out = String::new();
                doc.text_content(*id, &mut out);
                out
            }
            Node::Synthetic { value, .. } => value.clone(),
        }
    }

    /// The tag name, or [`Error::NotAnElement`] for any other kind.
    pub fn tag_name(&self) -> Result<&str, Error> {
        match self {
            Node::Tree { doc, id } if doc.get(*id).node_type == NodeType::Element => {
                Ok(doc.get(*id).data.as_str())
            }
            Node::Tree { .. } => Err(Error::NotAnElement),
            Node::Synthetic { name, .. } => Ok(name.as_str()),
        }
    }

    /// First attribute with the given key, in declaration order.
    pub fn attribute(&self, key: &str) -> Option<&'d Attribute> {
        self.attributes().iter().find(|a| a.key == key)
    }

    /// First attribute with the given value.
    pub fn attribute_by_value(&self, value: &str) -> Option<&'d Attribute> {
        self.attributes().iter().find(|a| a.value == value)
    }

    /// First attribute in the given namespace. Only foreign attributes
    /// (`xml:`, `xlink:`, ...) carry one.
    pub fn attribute_by_namespace(&self, ns: &str) -> Option<&'d Attribute> {
        self.attributes()
            .iter()
            .find(|a| a.namespace.as_deref() == Some(ns))
    }

    /// The declaration-order attribute list. Empty for non-elements and
    /// for synthetic nodes, which carry no attribute list of their own.
    pub fn attributes(&self) -> &'d [Attribute] {
        match *self {
            Node::Tree { doc, id } => &doc.get(id).attrs,
            Node::Synthetic { .. } => &[],
        }
    }

    /// The value of the named attribute, for element nodes.
    ///
    /// A synthetic attribute node has no parent and no attribute list,
    /// but answers for its own name: asking it for `key` equal to its
    /// name yields its text. That keeps `//a/@href` results readable
    /// both as text and as an attribute lookup.
    pub fn attribute_value(&self, key: &str) -> Result<String, Error> {
        if self.node_type() != NodeType::Element {
            return Err(Error::NotAnElement);
        }
        if self.parent().is_none() && self.data() == key {
            return Ok(self.inner_text());
        }
        self.attribute(key)
            .map(|a| a.value.clone())
            .ok_or_else(|| Error::NoSuchAttribute(key.to_string()))
    }

    pub fn parent(&self) -> Option<Node<'d>> {
        match *self {
            Node::Tree { doc, id } => doc.parent(id).map(|id| Node::Tree { doc, id }),
            Node::Synthetic { .. } => None,
        }
    }

    pub fn first_child(&self) -> Option<Node<'d>> {
        match *self {
            Node::Tree { doc, id } => doc.first_child(id).map(|id| Node::Tree { doc, id }),
            Node::Synthetic { .. } => None,
        }
    }

    pub fn last_child(&self) -> Option<Node<'d>> {
        match *self {
            Node::Tree { doc, id } => doc.last_child(id).map(|id| Node::Tree { doc, id }),
            Node::Synthetic { .. } => None,
        }
    }

    pub fn prev_sibling(&self) -> Option<Node<'d>> {
        match *self {
            Node::Tree { doc, id } => doc.prev_sibling(id).map(|id| Node::Tree { doc, id }),
            Node::Synthetic { .. } => None,
        }
    }

    pub fn next_sibling(&self) -> Option<Node<'d>> {
        match *self {
            Node::Tree { doc, id } => doc.next_sibling(id).map(|id| Node::Tree { doc, id }),
            Node::Synthetic { .. } => None,
        }
    }

    /// Iterator over the direct children, left to right.
    pub fn children(&self) -> ChildNodes<'d> {
        let next = match *self {
            Node::Tree { doc, id } => doc.first_child(id).map(|first| (doc, first)),
            Node::Synthetic { .. } => None,
        };
        ChildNodes { next }
    }

    /// Serializes the node to HTML. With `include_self` the node's own
    /// markup is part of the output, otherwise only its children are
    /// rendered.
    pub fn output_html(&self, include_self: bool) -> String {
        match self {
            Node::Tree { doc, id } => doc.serialize_node(*id, include_self),
            Node::Synthetic { name, value } => {
                let text = escape_text(value);
                if include_self {
                    format!("<{name}>{text}</{name}>")
                } else {
                    text
                }
            }
        }
    }

    /// All non-overlapping matches of `re` in the node's [`data`].
    ///
    /// [`data`]: Node::data
    pub fn find_all(&self, re: &Regex) -> Vec<String> {
        re.find_iter(self.data())
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Like [`find_all`], but each match carries its capture groups:
    /// the whole match first, then one entry per group, empty for groups
    /// that did not participate in the match.
    ///
    /// [`find_all`]: Node::find_all
    pub fn find_all_submatch(&self, re: &Regex) -> Vec<Vec<String>> {
        re.captures_iter(self.data())
            .map(|caps| {
                (0..caps.len())
                    .map(|i| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string()))
                    .collect()
            })
            .collect()
    }

    /// All nodes selected by evaluating `path` with this node as the
    /// context, through the shared default executor.
    pub fn query_all(&self, path: &str) -> Result<Vec<Node<'d>>, Error> {
        crate::query::query_all(self, path)
    }

    /// The first node selected by `path`, or `None`.
    pub fn query(&self, path: &str) -> Result<Option<Node<'d>>, Error> {
        crate::query::query(self, path)
    }

    /// Like [`query_all`], for callers who guarantee `path` is valid.
    ///
    /// [`query_all`]: Node::query_all
    ///
    /// # Panics
    /// Panics if the expression fails to compile or evaluate.
    pub fn find(&self, path: &str) -> Vec<Node<'d>> {
        crate::query::default_queryer().find(self, path)
    }

    /// Like [`query`], for callers who guarantee `path` is valid.
    ///
    /// [`query`]: Node::query
    ///
    /// # Panics
    /// Panics if the expression fails to compile or evaluate.
    pub fn find_one(&self, path: &str) -> Option<Node<'d>> {
        crate::query::default_queryer().find_one(self, path)
    }
}

impl PartialEq for Node<'_> {
    /// Tree nodes are equal when they are the same position in the same
    /// document; synthetic nodes when name and value agree. The two
    /// forms never compare equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Tree { doc: a, id: i }, Node::Tree { doc: b, id: j }) => {
                std::ptr::eq(*a, *b) && i == j
            }
            (
                Node::Synthetic { name: a, value: x },
                Node::Synthetic { name: b, value: y },
            ) => a == b && x == y,
            _ => false,
        }
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Node::Tree { doc, id } => {
                0u8.hash(state);
                std::ptr::hash(*doc, state);
                id.hash(state);
            }
            Node::Synthetic { name, value } => {
                1u8.hash(state);
                name.hash(state);
                value.hash(state);
            }
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output_html(true))
    }
}

/// See [`Node::children`].
pub struct ChildNodes<'d> {
    next: Option<(&'d Document, NodeId)>,
}

impl<'d> Iterator for ChildNodes<'d> {
    type Item = Node<'d>;

    fn next(&mut self) -> Option<Node<'d>> {
        let (doc, id) = self.next?;
        self.next = doc.next_sibling(id).map(|next| (doc, next));
        Some(Node::Tree { doc, id })
    }
}

/// Text escaping matching what the serializer emits, for synthetic nodes
/// that have no document to serialize through.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element<'d>(node: Node<'d>, tag: &str) -> Option<Node<'d>> {
        if node.node_type() == NodeType::Element && node.data() == tag {
            return Some(node);
        }
        let mut child = node.first_child();
        while let Some(c) = child {
            let found = first_element(c.clone(), tag);
            if found.is_some() {
                return found;
            }
            child = c.next_sibling();
        }
        None
    }

    #[test]
    fn tag_name_rejects_non_elements() {
        let doc = Document::parse_str("<p>Hi</p>");
        let root = Node::from_document(&doc);
        assert!(matches!(root.tag_name(), Err(Error::NotAnElement)));

        let p = first_element(root, "p").unwrap();
        assert_eq!(p.tag_name().unwrap(), "p");

        let text = p.first_child().unwrap();
        assert_eq!(text.node_type(), NodeType::Text);
        assert!(matches!(text.tag_name(), Err(Error::NotAnElement)));
    }

    #[test]
    fn attribute_lookups_find_the_first_match() {
        let doc = Document::parse_str(r#"<a href="/London" title="x">London</a>"#);
        let a = first_element(Node::from_document(&doc), "a").unwrap();

        assert_eq!(a.attribute("href").unwrap().value, "/London");
        assert_eq!(a.attribute_by_value("x").unwrap().key, "title");
        assert!(a.attribute("class").is_none());
        assert!(a.attribute_by_namespace("http://example.com").is_none());
        assert_eq!(a.attributes().len(), 2);
    }

    #[test]
    fn attribute_value_reports_missing_attributes() {
        let doc = Document::parse_str(r#"<a href="/London">London</a>"#);
        let a = first_element(Node::from_document(&doc), "a").unwrap();

        assert_eq!(a.attribute_value("href").unwrap(), "/London");
        assert!(matches!(
            a.attribute_value("class"),
            Err(Error::NoSuchAttribute(name)) if name == "class"
        ));
    }

    #[test]
    fn synthetic_node_answers_for_its_own_name() {
        let node = Node::Synthetic {
            name: "href".to_string(),
            value: "/London".to_string(),
        };
        assert_eq!(node.node_type(), NodeType::Element);
        assert_eq!(node.tag_name().unwrap(), "href");
        assert_eq!(node.inner_text(), "/London");
        assert_eq!(node.attribute_value("href").unwrap(), "/London");
        assert!(matches!(
            node.attribute_value("title"),
            Err(Error::NoSuchAttribute(_))
        ));
        assert!(node.attribute("href").is_none());
        assert!(node.parent().is_none());
        assert!(node.children().next().is_none());
        assert_eq!(node.to_string(), "<href>/London</href>");
    }

    #[test]
    fn tree_and_synthetic_nodes_never_compare_equal() {
        let doc = Document::parse_str("<b>1</b>");
        let b = first_element(Node::from_document(&doc), "b").unwrap();
        let synthetic = Node::Synthetic {
            name: "b".to_string(),
            value: "1".to_string(),
        };
        assert_ne!(b, synthetic);
        assert_eq!(b, b.clone());
        assert_eq!(
            synthetic,
            Node::Synthetic {
                name: "b".to_string(),
                value: "1".to_string(),
            }
        );
    }

    #[test]
    fn inner_text_skips_comment_subtrees() {
        let doc = Document::parse_str("<header><!-- Logo --><h1>City Gallery</h1></header>");
        let header = first_element(Node::from_document(&doc), "header").unwrap();

        assert_eq!(header.inner_text(), "City Gallery");
        assert!(header.output_html(true).contains("<!-- Logo -->"));

        let comment = header.first_child().unwrap();
        assert_eq!(comment.node_type(), NodeType::Comment);
        assert_eq!(comment.inner_text(), "");
        assert_eq!(comment.data(), " Logo ");
    }

    #[test]
    fn find_all_submatch_pads_missing_groups() {
        let doc = Document::parse_str("<p>cat dog</p>");
        let p = first_element(Node::from_document(&doc), "p").unwrap();
        let text = p.first_child().unwrap();

        let re = Regex::new(r"(c)?(at|og)").unwrap();
        let matches = text.find_all(&re);
        assert_eq!(matches, vec!["cat", "og"]);

        let submatches = text.find_all_submatch(&re);
        assert_eq!(submatches[0], vec!["cat", "c", "at"]);
        assert_eq!(submatches[1], vec!["og", "", "og"]);
    }

    #[test]
    fn children_iterates_left_to_right() {
        let doc = Document::parse_str("<ul><li>a</li><li>b</li><li>c</li></ul>");
        let ul = first_element(Node::from_document(&doc), "ul").unwrap();
        let texts: Vec<String> = ul.children().map(|li| li.inner_text()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
