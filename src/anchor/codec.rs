//! Path codec
//!
//! Converts between live arena nodes and structural [`NodePath`]s. Encoding
//! walks ancestors up to the document root; decoding is a deterministic
//! structural lookup with no fuzzy fallback. Cheap to compute, brittle under
//! heavy page mutation: that trade-off is deliberate.

use crate::dom::{Document, NodeId};

use super::types::{NodePath, PathStep, TextStep};

/// Encode a node into a path. Text nodes get a trailing `text()[k]` step.
/// Returns `None` if the node is detached from the document root.
pub fn encode(doc: &Document, node: NodeId) -> Option<NodePath> {
    if doc.is_text(node) {
        encode_text(doc, node)
    } else {
        encode_element(doc, node).map(NodePath::new)
    }
}

fn encode_element(doc: &Document, node: NodeId) -> Option<Vec<PathStep>> {
    let mut steps = Vec::new();
    let mut current = node;
    while current != doc.root() {
        let parent = doc.parent(current)?;
        let tag = doc.tag(current)?;
        // 1-based index among preceding siblings with the same tag; siblings
        // of a different tag do not affect the count.
        let mut index = 1u32;
        for &sibling in doc.children(parent) {
            if sibling == current {
                break;
            }
            if doc.tag(sibling) == Some(tag) {
                index += 1;
            }
        }
        steps.push(PathStep::new(tag, index));
        current = parent;
    }
    steps.reverse();
    Some(steps)
}

fn encode_text(doc: &Document, node: NodeId) -> Option<NodePath> {
    let parent = doc.parent(node)?;
    let steps = if parent == doc.root() {
        Vec::new()
    } else {
        encode_element(doc, parent)?
    };
    let mut index = 1u32;
    for &sibling in doc.children(parent) {
        if sibling == node {
            return Some(NodePath {
                steps,
                text: Some(TextStep { index }),
            });
        }
        if doc.is_text(sibling) {
            index += 1;
        }
    }
    None
}

/// Decode a path back into a node. Returns `None` when the document
/// structure no longer matches; the caller drops the record.
pub fn decode(doc: &Document, path: &NodePath) -> Option<NodeId> {
    let mut current = doc.root();
    for step in &path.steps {
        current = nth_element_child(doc, current, &step.tag, step.index)?;
    }
    match path.text {
        Some(TextStep { index }) => nth_text_child(doc, current, index),
        None => Some(current),
    }
}

fn nth_element_child(doc: &Document, parent: NodeId, tag: &str, index: u32) -> Option<NodeId> {
    let mut seen = 0u32;
    for &child in doc.children(parent) {
        if doc.tag(child) == Some(tag) {
            seen += 1;
            if seen == index {
                return Some(child);
            }
        }
    }
    None
}

fn nth_text_child(doc: &Document, parent: NodeId, index: u32) -> Option<NodeId> {
    let mut seen = 0u32;
    for &child in doc.children(parent) {
        if doc.is_text(child) {
            seen += 1;
            if seen == index {
                return Some(child);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    #[test]
    fn test_roundtrip_every_node() {
        let doc = parse_document(
            "<html><body><div><p>one</p><p>two <b>bold</b> tail</p></div></body></html>",
        )
        .unwrap();
        for node in doc.descendants(doc.root()) {
            if node == doc.root() {
                continue;
            }
            let path = encode(&doc, node).expect("encode");
            assert_eq!(decode(&doc, &path), Some(node), "path {}", path);
        }
    }

    #[test]
    fn test_concrete_scenario_path() {
        // 2nd <p> under <article>; selection covers its whole text node.
        let doc = parse_document(
            "<html><body><article><p>intro</p><p>hello world</p></article></body></html>",
        )
        .unwrap();
        let article = doc.find_element("article").unwrap();
        let p2 = doc.children(article)[1];
        let text = doc.children(p2)[0];
        let path = encode(&doc, text).unwrap();
        assert!(path.to_string().ends_with("/p[2]/text()[1]"));
        assert_eq!(
            path.to_string(),
            "/html[1]/body[1]/article[1]/p[2]/text()[1]"
        );
    }

    #[test]
    fn test_sibling_index_ignores_other_tags() {
        let mut doc = parse_document("<body><p>target</p></body>").unwrap();
        let p = doc.find_element("p").unwrap();
        let before = encode(&doc, p).unwrap();

        // A different-tag sibling inserted before must not shift the index.
        let body = doc.find_element("body").unwrap();
        let div = doc.create_element("div");
        doc.insert_before(body, div, p);
        let after = encode(&doc, p).unwrap();
        assert_eq!(before, after);

        // A same-tag sibling does shift it.
        let p0 = doc.create_element("p");
        doc.insert_before(body, p0, p);
        let shifted = encode(&doc, p).unwrap();
        assert_ne!(before, shifted);
        assert_eq!(decode(&doc, &shifted), Some(p));
    }

    #[test]
    fn test_text_index_counts_only_text_siblings() {
        let doc = parse_document("<p>a<b>x</b>c</p>").unwrap();
        let p = doc.find_element("p").unwrap();
        let second_text = doc.children(p)[2];
        let path = encode(&doc, second_text).unwrap();
        // The <b> element between the text nodes does not affect the count.
        assert!(path.to_string().ends_with("/text()[2]"));
        assert_eq!(decode(&doc, &path), Some(second_text));
    }

    #[test]
    fn test_encode_detached_node_fails() {
        let mut doc = parse_document("<body><p>gone</p></body>").unwrap();
        let p = doc.find_element("p").unwrap();
        doc.detach(p);
        assert!(encode(&doc, p).is_none());
    }

    #[test]
    fn test_decode_structural_mismatch_fails() {
        let doc = parse_document("<body><p>only</p></body>").unwrap();
        let path: NodePath = "/body[1]/p[2]".parse().unwrap();
        assert_eq!(decode(&doc, &path), None);
        let path: NodePath = "/body[1]/div[1]".parse().unwrap();
        assert_eq!(decode(&doc, &path), None);
    }
}
