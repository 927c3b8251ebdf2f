//! HTML serialization of arena subtrees, driven through html5ever's
//! serializer so void elements, raw-text elements and escaping follow
//! the HTML serialization algorithm.

use std::io;

use html5ever::serialize::{self, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{LocalName, Namespace, QualName};

use crate::tree::{Attribute, Document, NodeId, NodeType};

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";

fn element_name(tag: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NS), LocalName::from(tag))
}

fn attr_name(attr: &Attribute) -> QualName {
    let ns = match &attr.namespace {
        Some(url) => Namespace::from(url.as_str()),
        None => Namespace::default(),
    };
    QualName::new(None, ns, LocalName::from(attr.key.as_str()))
}

struct SerializableNode<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => write_node(self.doc, self.id, serializer),
            TraversalScope::ChildrenOnly(_) => write_children(self.doc, self.id, serializer),
        }
    }
}

fn write_node<S: Serializer>(doc: &Document, id: NodeId, s: &mut S) -> io::Result<()> {
    let node = doc.get(id);
    match node.node_type {
        // The document node has no markup of its own.
        NodeType::Document => write_children(doc, id, s),
        NodeType::Doctype => s.write_doctype(&node.data),
        NodeType::Text => s.write_text(&node.data),
        NodeType::Comment => s.write_comment(&node.data),
        NodeType::Element => {
            let name = element_name(&node.data);
            let attr_names: Vec<QualName> = node.attrs.iter().map(attr_name).collect();
            s.start_elem(
                name.clone(),
                attr_names
                    .iter()
                    .zip(&node.attrs)
                    .map(|(qn, a)| (qn, a.value.as_str())),
            )?;
            write_children(doc, id, s)?;
            s.end_elem(name)
        }
    }
}

fn write_children<S: Serializer>(doc: &Document, id: NodeId, s: &mut S) -> io::Result<()> {
    for child in doc.children(id) {
        write_node(doc, child, s)?;
    }
    Ok(())
}

impl Document {
    /// Serialize the subtree rooted at `id` to an HTML string.
    ///
    /// With `include_self` the node's own markup is part of the output,
    /// otherwise only its children are rendered. The document node always
    /// renders just its children.
    pub fn serialize_node(&self, id: NodeId, include_self: bool) -> String {
        let traversal_scope = if include_self {
            TraversalScope::IncludeNode
        } else {
            TraversalScope::ChildrenOnly(None)
        };
        let opts = SerializeOpts {
            traversal_scope,
            ..SerializeOpts::default()
        };
        let node = SerializableNode { doc: self, id };
        let mut buf = Vec::new();
        serialize::serialize(&mut buf, &node, opts).expect("writing to a Vec cannot fail");
        String::from_utf8(buf).expect("serializer emits UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_element(doc: &Document, from: NodeId, tag: &str) -> Option<NodeId> {
        let node = doc.get(from);
        if node.node_type == NodeType::Element && node.data == tag {
            return Some(from);
        }
        doc.children(from)
            .find_map(|child| find_element(doc, child, tag))
    }

    #[test]
    fn round_trips_a_document() {
        let html =
            "<!DOCTYPE html><html><head></head><body><p class=\"x\">hi</p></body></html>";
        let doc = Document::parse_str(html);
        assert_eq!(doc.serialize_node(doc.root(), true), html);
    }

    #[test]
    fn include_self_controls_the_outer_markup() {
        let doc = Document::parse_str("<!DOCTYPE html><p class=\"x\">hi</p>");
        let p = find_element(&doc, doc.root(), "p").unwrap();
        assert_eq!(doc.serialize_node(p, true), "<p class=\"x\">hi</p>");
        assert_eq!(doc.serialize_node(p, false), "hi");
    }

    #[test]
    fn children_only_renders_each_child_once() {
        let doc = Document::parse_str("<!DOCTYPE html><div><a>1</a><b>2</b><i>3</i></div>");
        let div = find_element(&doc, doc.root(), "div").unwrap();
        assert_eq!(doc.serialize_node(div, false), "<a>1</a><b>2</b><i>3</i>");
    }

    #[test]
    fn void_elements_take_no_end_tag() {
        let doc = Document::parse_str("<!DOCTYPE html><p>a<br>b</p>");
        let p = find_element(&doc, doc.root(), "p").unwrap();
        assert_eq!(doc.serialize_node(p, true), "<p>a<br>b</p>");
    }

    #[test]
    fn escapes_text_and_attributes() {
        let doc = Document::parse_str("<!DOCTYPE html><p title='a\"b'>x &amp; y</p>");
        let p = find_element(&doc, doc.root(), "p").unwrap();
        assert_eq!(
            doc.serialize_node(p, true),
            "<p title=\"a&quot;b\">x &amp; y</p>"
        );
    }

    #[test]
    fn script_contents_stay_raw() {
        let doc = Document::parse_str("<!DOCTYPE html><script>if (a<b) f();</script>");
        let script = find_element(&doc, doc.root(), "script").unwrap();
        assert_eq!(
            doc.serialize_node(script, true),
            "<script>if (a<b) f();</script>"
        );
    }

    #[test]
    fn comments_keep_their_markers() {
        let doc = Document::parse_str("<!DOCTYPE html><div><!-- note --></div>");
        let div = find_element(&doc, doc.root(), "div").unwrap();
        assert_eq!(doc.serialize_node(div, true), "<div><!-- note --></div>");
    }
}
