//! Markup parsing into the document arena
//!
//! Page snapshots arrive as serialized markup; this parser builds the arena
//! tree the anchor codec walks. Parsing is lenient: unknown entities are kept
//! verbatim, void elements (`<br>`, `<img>`, ...) do not need to be
//! self-closed, and stray end tags are skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::node::{Document, NodeId};

/// Markup parsing errors
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("Malformed markup: {0}")]
    Malformed(String),

    #[error("Empty input")]
    Empty,
}

/// HTML elements that never have children.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Parse a full page snapshot into a new document.
pub fn parse_document(markup: &str) -> Result<Document, MarkupError> {
    if markup.trim().is_empty() {
        return Err(MarkupError::Empty);
    }
    let mut doc = Document::new();
    let root = doc.root();
    parse_into(&mut doc, root, markup)?;
    Ok(doc)
}

/// Parse a markup fragment into detached nodes inside an existing arena.
/// Returns the top-level nodes of the fragment.
pub fn parse_fragment(doc: &mut Document, markup: &str) -> Result<Vec<NodeId>, MarkupError> {
    let holder = doc.create_element("#fragment");
    parse_into(doc, holder, markup)?;
    let children: Vec<NodeId> = doc.children(holder).to_vec();
    for &child in &children {
        doc.detach(child);
    }
    Ok(children)
}

fn parse_into(doc: &mut Document, parent: NodeId, markup: &str) -> Result<(), MarkupError> {
    let mut reader = Reader::from_str(markup);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut stack: Vec<NodeId> = vec![parent];

    loop {
        let event = reader
            .read_event()
            .map_err(|e| MarkupError::Malformed(e.to_string()))?;
        match event {
            Event::Start(start) => {
                let element = build_element(doc, &start);
                let top = *stack.last().unwrap_or(&parent);
                doc.append_child(top, element);
                // Void tags sometimes arrive unclosed; never push them.
                if !is_void_tag(tag_name(&start).as_str()) {
                    stack.push(element);
                }
            }
            Event::Empty(start) => {
                let element = build_element(doc, &start);
                let top = *stack.last().unwrap_or(&parent);
                doc.append_child(top, element);
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                // Pop to the matching open element; a stray end tag that
                // matches nothing is dropped.
                if let Some(pos) = stack
                    .iter()
                    .rposition(|&n| doc.tag(n) == Some(name.as_str()))
                {
                    if pos > 0 {
                        stack.truncate(pos);
                    }
                }
            }
            Event::Text(text) => {
                let content = match text.unescape() {
                    Ok(unescaped) => unescaped.into_owned(),
                    // HTML-only entities (&nbsp; etc.) are not XML; keep the
                    // raw text rather than failing the whole page.
                    Err(_) => String::from_utf8_lossy(text.as_ref()).into_owned(),
                };
                if !content.is_empty() {
                    let top = *stack.last().unwrap_or(&parent);
                    let node = doc.create_text(&content);
                    doc.append_child(top, node);
                }
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(cdata.as_ref()).into_owned();
                if !content.is_empty() {
                    let top = *stack.last().unwrap_or(&parent);
                    let node = doc.create_text(&content);
                    doc.append_child(top, node);
                }
            }
            // Comments, doctype, processing instructions and the XML
            // declaration carry no anchorable content.
            Event::Comment(_) | Event::DocType(_) | Event::PI(_) | Event::Decl(_) => {}
            Event::Eof => break,
        }
    }

    Ok(())
}

fn tag_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase()
}

fn build_element(doc: &mut Document, start: &BytesStart<'_>) -> NodeId {
    let element = doc.create_element(&tag_name(start));
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        doc.set_attr(element, &key, &value);
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_page() {
        let doc = parse_document("<html><body><p>hello</p></body></html>").unwrap();
        let p = doc.find_element("p").unwrap();
        assert_eq!(doc.text_content(p), "hello");
    }

    #[test]
    fn test_parse_preserves_text_nodes_and_attrs() {
        let doc =
            parse_document(r#"<div class="a">one<span id="s">two</span>three</div>"#).unwrap();
        let div = doc.find_element("div").unwrap();
        assert_eq!(doc.attr(div, "class"), Some("a"));
        assert_eq!(doc.children(div).len(), 3);
        let span = doc.find_element("span").unwrap();
        assert_eq!(doc.attr(span, "id"), Some("s"));
    }

    #[test]
    fn test_parse_unclosed_void_element() {
        let doc = parse_document("<p>line<br>break</p>").unwrap();
        let p = doc.find_element("p").unwrap();
        // text, br, text
        assert_eq!(doc.children(p).len(), 3);
        assert_eq!(doc.text_content(p), "linebreak");
    }

    #[test]
    fn test_parse_skips_comments() {
        let doc = parse_document("<p>a<!-- note -->b</p>").unwrap();
        let p = doc.find_element("p").unwrap();
        assert_eq!(doc.children(p).len(), 2);
    }

    #[test]
    fn test_parse_entities() {
        let doc = parse_document("<p>a &amp; b</p>").unwrap();
        let p = doc.find_element("p").unwrap();
        assert_eq!(doc.text_content(p), "a & b");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_document("  "), Err(MarkupError::Empty)));
    }

    #[test]
    fn test_parse_fragment_detached() {
        let mut doc = parse_document("<body></body>").unwrap();
        let nodes = parse_fragment(&mut doc, "<svg><g>x</g></svg>").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(doc.tag(nodes[0]), Some("svg"));
        assert!(!doc.is_attached(nodes[0]));
    }
}
