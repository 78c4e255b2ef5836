//! Arena-based document tree
//!
//! The document is a flat arena of nodes addressed by [`NodeId`]. All tree
//! surgery (wrapping, unwrapping, container insertion) goes through methods
//! on [`Document`] so that sibling bookkeeping stays in one place. Detached
//! subtrees remain in the arena but become unreachable from the root; a
//! detached node can no longer produce an anchor path.
//!
//! Text offsets throughout this module are **character** offsets, not byte
//! offsets, so they are stable across serialization boundaries.

use std::collections::HashMap;

/// Index of a node in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Payload of a single node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text {
        content: String,
    },
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A mutable document tree.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create an empty document with a synthetic root.
    pub fn new() -> Self {
        let root_node = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element {
                tag: "#document".to_string(),
                attrs: Vec::new(),
            },
        };
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// The synthetic document root. Never appears in anchor paths.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(NodeData::Text {
            content: content.to_string(),
        })
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// Tag name if the node is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text { .. } => None,
        }
    }

    /// Text content if the node is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text { content } => Some(content),
            NodeData::Element { .. } => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Text { .. })
    }

    /// Character length of a text node (0 for elements).
    pub fn text_len(&self, id: NodeId) -> usize {
        self.text(id).map(|t| t.chars().count()).unwrap_or(0)
    }

    pub fn set_text(&mut self, id: NodeId, new_content: &str) {
        if let NodeData::Text { content } = &mut self.nodes[id.0].data {
            *content = new_content.to_string();
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text { .. } => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            if let Some(entry) = attrs.iter_mut().find(|(k, _)| k == name) {
                entry.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs,
            NodeData::Text { .. } => &[],
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Nearest element ancestor, or the node itself if it is an element.
    /// Skips the synthetic root.
    pub fn element_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if node != self.root && self.is_element(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Whether the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Remove the node from its parent's child list. The subtree stays in
    /// the arena but is no longer reachable.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first if
    /// it is attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` into `parent` immediately before `reference`, which
    /// must be a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let pos = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(pos, child);
    }

    /// Insert `child` into `parent` immediately after `reference`.
    pub fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let pos = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
            .map(|p| p + 1)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(pos, child);
    }

    /// Position of `child` within its parent's child list.
    pub fn child_index(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.nodes[parent.0].children.iter().position(|&c| c == child)
    }

    /// Split a text node at a character offset. The original node keeps the
    /// head; a new sibling text node holding the tail is inserted after it
    /// and returned. Offsets at or past either end return the boundary
    /// without splitting (`Err` side tells the caller which).
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> SplitResult {
        let Some(content) = self.text(id).map(|t| t.to_string()) else {
            return SplitResult::NotText;
        };
        let len = content.chars().count();
        if offset == 0 {
            return SplitResult::AtStart;
        }
        if offset >= len {
            return SplitResult::AtEnd;
        }
        let byte_split = char_to_byte(&content, offset);
        let head = content[..byte_split].to_string();
        let tail = content[byte_split..].to_string();
        self.set_text(id, &head);
        let tail_node = self.create_text(&tail);
        if let Some(parent) = self.parent(id) {
            self.insert_after(parent, tail_node, id);
        }
        SplitResult::Split(tail_node)
    }

    /// Merge adjacent text children and drop empty text nodes, recursively,
    /// like DOM `Node.normalize()`. Keeps path encoding stable for anchors
    /// under this subtree after a wrapper is removed.
    pub fn normalize(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        let mut merged: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            if let Some(text) = self.text(child).map(|t| t.to_string()) {
                if text.is_empty() {
                    self.detach(child);
                    continue;
                }
                if let Some(&prev) = merged.last() {
                    if self.is_text(prev) {
                        let combined = format!("{}{}", self.text(prev).unwrap_or(""), text);
                        self.set_text(prev, &combined);
                        self.detach(child);
                        continue;
                    }
                }
                merged.push(child);
            } else {
                self.normalize(child);
                merged.push(child);
            }
        }
    }

    /// Pre-order traversal of the subtree rooted at `id`, including `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            for &child in self.children(node).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// First element in pre-order with the given tag name, searching the
    /// whole document.
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.tag(n) == Some(tag))
    }

    /// First element in pre-order below `from` matching `pred`.
    pub fn find_element_by<F>(&self, from: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.descendants(from)
            .into_iter()
            .filter(|&n| self.is_element(n))
            .find(|&n| pred(self, n))
    }

    /// Concatenated text of all text nodes in the subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Deepest ancestor shared by both nodes.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut seen = HashMap::new();
        let mut current = Some(a);
        let mut depth = 0usize;
        while let Some(node) = current {
            seen.insert(node, depth);
            depth += 1;
            current = self.parent(node);
        }
        let mut current = Some(b);
        while let Some(node) = current {
            if seen.contains_key(&node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`Document::split_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitResult {
    /// A new tail node was created and inserted after the original.
    Split(NodeId),
    /// Offset 0: nothing precedes the split point.
    AtStart,
    /// Offset at or past the end: nothing follows the split point.
    AtEnd,
    /// The node is not a text node.
    NotText,
}

/// A span between two text positions in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomRange {
    pub start: NodeId,
    pub start_offset: usize,
    pub end: NodeId,
    pub end_offset: usize,
}

impl DomRange {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end && self.start_offset == self.end_offset
    }

    /// Extract the selected text, crossing element boundaries in document
    /// order. Returns an empty string for a malformed range.
    pub fn text(&self, doc: &Document) -> String {
        if self.start == self.end {
            return doc
                .text(self.start)
                .map(|t| char_slice(t, self.start_offset, self.end_offset))
                .unwrap_or_default();
        }
        let order = doc.descendants(doc.root());
        let Some(start_pos) = order.iter().position(|&n| n == self.start) else {
            return String::new();
        };
        let Some(end_pos) = order.iter().position(|&n| n == self.end) else {
            return String::new();
        };
        if end_pos < start_pos {
            return String::new();
        }
        let mut out = String::new();
        for &node in &order[start_pos..=end_pos] {
            let Some(text) = doc.text(node) else { continue };
            if node == self.start {
                out.push_str(&char_slice(text, self.start_offset, text.chars().count()));
            } else if node == self.end {
                out.push_str(&char_slice(text, 0, self.end_offset));
            } else {
                out.push_str(text);
            }
        }
        out
    }
}

/// Byte index of the `offset`-th character.
pub(crate) fn char_to_byte(s: &str, offset: usize) -> usize {
    s.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Substring by character offsets, clamped to the string bounds.
pub(crate) fn char_slice(s: &str, from: usize, to: usize) -> String {
    if to <= from {
        return String::new();
    }
    s.chars().skip(from).take(to - from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let text = doc.create_text("hello world");
        let root = doc.root();
        doc.append_child(root, p);
        doc.append_child(p, text);
        (doc, p, text)
    }

    #[test]
    fn test_append_and_children() {
        let (doc, p, text) = sample();
        assert_eq!(doc.children(p), &[text]);
        assert_eq!(doc.parent(text), Some(p));
        assert!(doc.is_attached(text));
    }

    #[test]
    fn test_detach_makes_unreachable() {
        let (mut doc, p, text) = sample();
        doc.detach(p);
        assert!(!doc.is_attached(p));
        assert!(!doc.is_attached(text));
        assert_eq!(doc.children(doc.root()), &[] as &[NodeId]);
    }

    #[test]
    fn test_split_text_mid() {
        let (mut doc, p, text) = sample();
        let SplitResult::Split(tail) = doc.split_text(text, 5) else {
            panic!("expected split");
        };
        assert_eq!(doc.text(text), Some("hello"));
        assert_eq!(doc.text(tail), Some(" world"));
        assert_eq!(doc.children(p), &[text, tail]);
    }

    #[test]
    fn test_split_text_boundaries() {
        let (mut doc, _p, text) = sample();
        assert_eq!(doc.split_text(text, 0), SplitResult::AtStart);
        assert_eq!(doc.split_text(text, 11), SplitResult::AtEnd);
        assert_eq!(doc.split_text(text, 42), SplitResult::AtEnd);
    }

    #[test]
    fn test_split_text_multibyte() {
        let mut doc = Document::new();
        let text = doc.create_text("héllo wörld");
        let root = doc.root();
        doc.append_child(root, text);
        let SplitResult::Split(tail) = doc.split_text(text, 5) else {
            panic!("expected split");
        };
        assert_eq!(doc.text(text), Some("héllo"));
        assert_eq!(doc.text(tail), Some(" wörld"));
    }

    #[test]
    fn test_normalize_merges_adjacent_text() {
        let (mut doc, p, text) = sample();
        let extra = doc.create_text("!");
        doc.append_child(p, extra);
        let empty = doc.create_text("");
        doc.append_child(p, empty);
        doc.normalize(p);
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text(text), Some("hello world!"));
    }

    #[test]
    fn test_normalize_leaves_elements_alone() {
        let (mut doc, p, _text) = sample();
        let b = doc.create_element("b");
        let btext = doc.create_text("bold");
        doc.append_child(b, btext);
        doc.append_child(p, b);
        let after = doc.create_text(" tail");
        doc.append_child(p, after);
        doc.normalize(p);
        assert_eq!(doc.children(p).len(), 3);
    }

    #[test]
    fn test_range_text_single_node() {
        let (doc, _p, text) = sample();
        let range = DomRange {
            start: text,
            start_offset: 0,
            end: text,
            end_offset: 5,
        };
        assert_eq!(range.text(&doc), "hello");
        assert!(!range.is_collapsed());
    }

    #[test]
    fn test_range_text_cross_element() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t1 = doc.create_text("one ");
        let b = doc.create_element("b");
        let t2 = doc.create_text("two");
        let t3 = doc.create_text(" three");
        let root = doc.root();
        doc.append_child(root, p);
        doc.append_child(p, t1);
        doc.append_child(p, b);
        doc.append_child(b, t2);
        doc.append_child(p, t3);
        let range = DomRange {
            start: t1,
            start_offset: 0,
            end: t3,
            end_offset: 6,
        };
        assert_eq!(range.text(&doc), "one two three");
    }

    #[test]
    fn test_common_ancestor() {
        let mut doc = Document::new();
        let article = doc.create_element("article");
        let p1 = doc.create_element("p");
        let p2 = doc.create_element("p");
        let t1 = doc.create_text("a");
        let t2 = doc.create_text("b");
        let root = doc.root();
        doc.append_child(root, article);
        doc.append_child(article, p1);
        doc.append_child(article, p2);
        doc.append_child(p1, t1);
        doc.append_child(p2, t2);
        assert_eq!(doc.common_ancestor(t1, t2), Some(article));
        assert_eq!(doc.common_ancestor(t1, t1), Some(t1));
    }
}
