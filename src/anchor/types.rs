//! Anchor path types
//!
//! A node path is a structural route from the document root to a node:
//! ordered steps `tag[i]` where `i` counts only same-tag element siblings
//! (1-based), optionally ending in a `text()[k]` step addressing the k-th
//! text-node child. Example: `/html[1]/body[1]/p[2]/text()[1]`.
//!
//! Paths are recomputed fresh from the live node at creation time; they are
//! never mutated, only regenerated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::parser::{parse, PathParseError};

/// A structural path from the document root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath {
    /// Element steps, outermost first.
    pub steps: Vec<PathStep>,
    /// Optional trailing text-node step.
    pub text: Option<TextStep>,
}

/// One element step in a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    /// Lowercase tag name.
    pub tag: String,
    /// 1-based index among siblings with the same tag.
    pub index: u32,
}

/// A trailing step addressing a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStep {
    /// 1-based index among sibling text nodes.
    pub index: u32,
}

impl NodePath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps, text: None }
    }

    pub fn with_text(steps: Vec<PathStep>, text_index: u32) -> Self {
        Self {
            steps,
            text: Some(TextStep { index: text_index }),
        }
    }

    /// Whether this path addresses a text node.
    pub fn is_text_position(&self) -> bool {
        self.text.is_some()
    }
}

impl PathStep {
    pub fn new(tag: impl Into<String>, index: u32) -> Self {
        Self {
            tag: tag.into(),
            index,
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "/{}[{}]", step.tag, step.index)?;
        }
        if let Some(text) = &self.text {
            write!(f, "/text()[{}]", text.index)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<String> for NodePath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse(&value)
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

/// A two-sided anchor for a highlighted span. Offsets are character offsets
/// within the addressed text nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeAnchor {
    #[serde(rename = "startPath")]
    pub start_path: NodePath,
    #[serde(rename = "startOffset")]
    pub start_offset: usize,
    #[serde(rename = "endPath")]
    pub end_path: NodePath,
    #[serde(rename = "endOffset")]
    pub end_offset: usize,
}

/// A one-sided anchor for an inserted container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAnchor {
    #[serde(rename = "anchorPath")]
    pub path: NodePath,
    #[serde(rename = "insertAfter")]
    pub insert_after: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_element_path() {
        let path = NodePath::new(vec![
            PathStep::new("html", 1),
            PathStep::new("body", 1),
            PathStep::new("p", 2),
        ]);
        assert_eq!(path.to_string(), "/html[1]/body[1]/p[2]");
        assert!(!path.is_text_position());
    }

    #[test]
    fn test_display_text_path() {
        let path = NodePath::with_text(
            vec![PathStep::new("html", 1), PathStep::new("p", 2)],
            1,
        );
        assert_eq!(path.to_string(), "/html[1]/p[2]/text()[1]");
        assert!(path.is_text_position());
    }

    #[test]
    fn test_serde_as_string() {
        let anchor = RangeAnchor {
            start_path: NodePath::with_text(vec![PathStep::new("p", 1)], 1),
            start_offset: 0,
            end_path: NodePath::with_text(vec![PathStep::new("p", 1)], 1),
            end_offset: 11,
        };
        let json = serde_json::to_value(&anchor).unwrap();
        assert_eq!(json["startPath"], "/p[1]/text()[1]");
        assert_eq!(json["endOffset"], 11);

        let back: RangeAnchor = serde_json::from_value(json).unwrap();
        assert_eq!(back, anchor);
    }
}
