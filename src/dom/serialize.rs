//! Document serialization back to markup
//!
//! Produces the annotated page: the parsed snapshot plus any projected
//! highlight wrappers and visualization containers.

use super::node::{Document, NodeData, NodeId};

/// Serialize the whole document (children of the synthetic root).
pub fn serialize_document(doc: &Document) -> String {
    let mut out = String::new();
    for &child in doc.children(doc.root()) {
        serialize_node(doc, child, &mut out);
    }
    out
}

/// Serialize one node and its subtree.
pub fn serialize_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.data(id) {
        NodeData::Text { content } => {
            out.push_str(&html_escape::encode_text(content));
        }
        NodeData::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            let children = doc.children(id);
            if children.is_empty() && super::parse::is_void_tag(tag) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for &child in children {
                serialize_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}
