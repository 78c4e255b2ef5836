//! Highlight projection
//!
//! Wraps a resolved range in a marker `<span>` carrying the record id and
//! color. A range inside a single text node is wrapped in place by splitting
//! the node; a range crossing element boundaries falls back to
//! extract-and-reinsert, which changes node identity for contained elements
//! but preserves visible content and structure.

use crate::anchor::resolve_range;
use crate::annotations::HighlightRecord;
use crate::dom::{Document, DomRange, NodeId, SplitResult};

use super::{child_with_class, Projector};

const WRAPPER_CLASS: &str = "text-highlight";
const ICON_CLASS: &str = "comment-icon";
const ICON_GLYPH: &str = "\u{1F4AC}";
const EMPTY_TITLE: &str = "Click to add comment";

pub struct HighlightProjector;

impl Projector<HighlightRecord> for HighlightProjector {
    fn project(&self, doc: &mut Document, record: &HighlightRecord) -> Option<NodeId> {
        let range = resolve_range(doc, &record.anchor)?;
        let span = wrap_range(doc, range)?;
        doc.set_attr(span, "class", WRAPPER_CLASS);
        doc.set_attr(span, "data-highlight-id", &record.id);
        doc.set_attr(
            span,
            "style",
            &format!("background-color: {};", record.color.css()),
        );
        self.refresh(doc, record, span);
        Some(span)
    }

    fn unproject(&self, doc: &mut Document, node: NodeId) {
        let Some(parent) = doc.parent(node) else {
            return;
        };
        // The indicator is a projection artifact, not page content; drop it
        // before handing the children back.
        if let Some(icon) = child_with_class(doc, node, ICON_CLASS) {
            doc.detach(icon);
        }
        let children: Vec<NodeId> = doc.children(node).to_vec();
        for child in children {
            doc.insert_before(parent, child, node);
        }
        doc.detach(node);
        // Merge the text nodes back together so path encoding stays stable
        // for other anchors under this parent.
        doc.normalize(parent);
    }

    fn refresh(&self, doc: &mut Document, record: &HighlightRecord, node: NodeId) {
        if record.comment.is_empty() {
            if let Some(icon) = child_with_class(doc, node, ICON_CLASS) {
                doc.detach(icon);
            }
            doc.set_attr(node, "title", EMPTY_TITLE);
        } else {
            let joined = record.comment.joined();
            let icon = match child_with_class(doc, node, ICON_CLASS) {
                Some(icon) => icon,
                None => {
                    let icon = doc.create_element("span");
                    doc.set_attr(icon, "class", ICON_CLASS);
                    let glyph = doc.create_text(ICON_GLYPH);
                    doc.append_child(icon, glyph);
                    doc.append_child(node, icon);
                    icon
                }
            };
            doc.set_attr(icon, "title", &joined);
            doc.set_attr(node, "title", &joined);
        }
    }
}

/// Wrap the range's contents in a fresh (unattributed) `<span>`.
///
/// Returns `None` for malformed ranges: non-text endpoints, offsets past the
/// node length, inverted boundaries. All of these are treated identically to
/// a resolve failure by the caller.
fn wrap_range(doc: &mut Document, range: DomRange) -> Option<NodeId> {
    if !doc.is_text(range.start) || !doc.is_text(range.end) {
        return None;
    }
    if range.start_offset > doc.text_len(range.start)
        || range.end_offset > doc.text_len(range.end)
    {
        return None;
    }

    if range.start == range.end {
        if range.end_offset <= range.start_offset {
            return None;
        }
        wrap_within_text_node(doc, range.start, range.start_offset, range.end_offset)
    } else {
        extract_and_reinsert(doc, range)
    }
}

/// Simple wrap: both boundaries inside one text node.
fn wrap_within_text_node(
    doc: &mut Document,
    node: NodeId,
    start: usize,
    end: usize,
) -> Option<NodeId> {
    let parent = doc.parent(node)?;
    // Split the tail off first so the start split does not shift the end
    // offset.
    match doc.split_text(node, end) {
        SplitResult::Split(_) | SplitResult::AtEnd => {}
        SplitResult::AtStart | SplitResult::NotText => return None,
    }
    let middle = match doc.split_text(node, start) {
        SplitResult::Split(tail) => tail,
        SplitResult::AtStart => node,
        SplitResult::AtEnd | SplitResult::NotText => return None,
    };
    let span = doc.create_element("span");
    doc.insert_before(parent, span, middle);
    doc.append_child(span, middle);
    Some(span)
}

/// Fallback for ranges crossing element boundaries: split the boundary text
/// nodes, hoist the edges up to the common ancestor by splitting partially
/// selected ancestors, then move the covered sibling run into the wrapper.
fn extract_and_reinsert(doc: &mut Document, range: DomRange) -> Option<NodeId> {
    // In-range side of the start boundary.
    let first = match doc.split_text(range.start, range.start_offset) {
        SplitResult::Split(tail) => tail,
        SplitResult::AtStart => range.start,
        SplitResult::AtEnd => {
            // Selection begins exactly at the end of the start node; use an
            // empty placeholder so the climb below has a concrete node.
            let parent = doc.parent(range.start)?;
            let placeholder = doc.create_text("");
            doc.insert_after(parent, placeholder, range.start);
            placeholder
        }
        SplitResult::NotText => return None,
    };

    // In-range side of the end boundary (the head keeps [0, end_offset)).
    let last = match doc.split_text(range.end, range.end_offset) {
        SplitResult::Split(_) | SplitResult::AtEnd => range.end,
        SplitResult::AtStart => {
            let parent = doc.parent(range.end)?;
            let placeholder = doc.create_text("");
            doc.insert_before(parent, placeholder, range.end);
            placeholder
        }
        SplitResult::NotText => return None,
    };

    let common = doc.common_ancestor(first, last)?;
    let first = hoist_start_edge(doc, first, common)?;
    let last = hoist_end_edge(doc, last, common)?;

    let first_idx = doc.child_index(first)?;
    let last_idx = doc.child_index(last)?;
    if last_idx < first_idx {
        return None;
    }

    let covered: Vec<NodeId> = doc.children(common)[first_idx..=last_idx].to_vec();
    let span = doc.create_element("span");
    doc.insert_before(common, span, first);
    for node in covered {
        doc.append_child(span, node);
    }
    // Clean up placeholder fragments inside the wrapper.
    doc.normalize(span);
    Some(span)
}

/// Split every ancestor of `edge` below `common` so that `edge` and the
/// content after it end up in fresh shells; returns the child of `common`
/// that begins the covered run.
fn hoist_start_edge(doc: &mut Document, mut edge: NodeId, common: NodeId) -> Option<NodeId> {
    loop {
        let parent = doc.parent(edge)?;
        if parent == common {
            return Some(edge);
        }
        let grandparent = doc.parent(parent)?;
        let idx = doc.child_index(edge)?;
        let moved: Vec<NodeId> = doc.children(parent)[idx..].to_vec();
        let shell = clone_shell(doc, parent);
        for node in moved {
            doc.append_child(shell, node);
        }
        doc.insert_after(grandparent, shell, parent);
        edge = shell;
    }
}

/// Mirror of [`hoist_start_edge`] for the end boundary: `edge` and the
/// content before it move into fresh shells inserted before the originals.
fn hoist_end_edge(doc: &mut Document, mut edge: NodeId, common: NodeId) -> Option<NodeId> {
    loop {
        let parent = doc.parent(edge)?;
        if parent == common {
            return Some(edge);
        }
        let grandparent = doc.parent(parent)?;
        let idx = doc.child_index(edge)?;
        let moved: Vec<NodeId> = doc.children(parent)[..=idx].to_vec();
        let shell = clone_shell(doc, parent);
        for node in moved {
            doc.append_child(shell, node);
        }
        doc.insert_before(grandparent, shell, parent);
        edge = shell;
    }
}

/// Fresh element with the same tag and attributes, no children.
fn clone_shell(doc: &mut Document, node: NodeId) -> NodeId {
    let tag = doc.tag(node).unwrap_or("span").to_string();
    let attrs: Vec<(String, String)> = doc.attrs(node).to_vec();
    let shell = doc.create_element(&tag);
    for (name, value) in attrs {
        doc.set_attr(shell, &name, &value);
    }
    shell
}
