//! Annotation record types
//!
//! Records are the single source of truth for annotations. The rendered DOM
//! node for a record is a derived, disposable projection; records never hold
//! DOM handles. Field names in the serialized form match the persisted
//! per-page storage shape.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::anchor::{PointAnchor, RangeAnchor};

/// Kind of annotation record; doubles as the storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Highlights,
    Visualizations,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highlights => "highlights",
            Self::Visualizations => "visualizations",
        }
    }
}

/// Highlight colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    Yellow,
    LightBlue,
    LightGreen,
    Pink,
    Orange,
}

impl Default for HighlightColor {
    fn default() -> Self {
        Self::Yellow
    }
}

impl HighlightColor {
    /// CSS background-color value for the wrapper element.
    pub fn css(&self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::LightBlue => "lightblue",
            Self::LightGreen => "lightgreen",
            Self::Pink => "pink",
            Self::Orange => "orange",
        }
    }
}

/// Comment list attached to a highlight.
///
/// Older persisted rows stored a single string; current rows store a list.
/// Both shapes deserialize; serialization always writes the list form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Comments(Vec<String>);

impl Comments {
    pub fn new(entries: Vec<String>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn push(&mut self, comment: String) {
        self.0.push(comment);
    }

    /// All comments joined for display in a title/tooltip.
    pub fn joined(&self) -> String {
        self.0.join("\n")
    }
}

impl<'de> Deserialize<'de> for Comments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(s) if s.is_empty() => Comments(Vec::new()),
            Repr::One(s) => Comments(vec![s]),
            Repr::Many(list) => Comments(list),
        })
    }
}

/// A persisted text highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRecord {
    pub id: String,
    #[serde(flatten)]
    pub anchor: RangeAnchor,
    pub color: HighlightColor,
    /// Text snapshot taken at creation; display-only, never re-anchored.
    pub text: String,
    #[serde(default)]
    pub comment: Comments,
    /// Creation time, milliseconds since the epoch.
    pub timestamp: i64,
}

impl HighlightRecord {
    pub fn new(anchor: RangeAnchor, color: HighlightColor, text: String) -> Self {
        Self {
            id: new_record_id("highlight"),
            anchor,
            color,
            text,
            comment: Comments::default(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// A persisted inserted-diagram container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationRecord {
    pub id: String,
    #[serde(flatten)]
    pub anchor: PointAnchor,
    #[serde(rename = "selectedText")]
    pub selected_text: String,
    /// Filled in asynchronously once external rendering completes.
    #[serde(rename = "renderedContent", default)]
    pub rendered_content: Option<String>,
    pub timestamp: i64,
}

impl VisualizationRecord {
    pub fn new(anchor: PointAnchor, selected_text: String) -> Self {
        Self {
            id: new_record_id("viz"),
            anchor,
            selected_text,
            rendered_content: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Reduced, DOM-free projection of a highlight for UI listings.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightSummary {
    pub id: String,
    pub text: String,
    pub comment: Comments,
    pub color: HighlightColor,
    pub timestamp: i64,
}

impl From<&HighlightRecord> for HighlightSummary {
    fn from(record: &HighlightRecord) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            comment: record.comment.clone(),
            color: record.color,
            timestamp: record.timestamp,
        }
    }
}

/// Reduced projection of a visualization for UI listings.
#[derive(Debug, Clone, Serialize)]
pub struct VisualizationSummary {
    pub id: String,
    #[serde(rename = "selectedText")]
    pub selected_text: String,
    pub timestamp: i64,
}

impl From<&VisualizationRecord> for VisualizationSummary {
    fn from(record: &VisualizationRecord) -> Self {
        Self {
            id: record.id.clone(),
            selected_text: record.selected_text.clone(),
            timestamp: record.timestamp,
        }
    }
}

/// Fresh record id: timestamp plus a random suffix, unique even across
/// rapid concurrent creation.
fn new_record_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, millis, &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::NodePath;

    fn anchor() -> RangeAnchor {
        let path: NodePath = "/html[1]/body[1]/p[1]/text()[1]".parse().unwrap();
        RangeAnchor {
            start_path: path.clone(),
            start_offset: 0,
            end_path: path,
            end_offset: 5,
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let a = HighlightRecord::new(anchor(), HighlightColor::Yellow, "hello".into());
        let b = HighlightRecord::new(anchor(), HighlightColor::Yellow, "hello".into());
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("highlight-"));
    }

    #[test]
    fn test_highlight_serialized_shape() {
        let record = HighlightRecord::new(anchor(), HighlightColor::Pink, "hello".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["startPath"], "/html[1]/body[1]/p[1]/text()[1]");
        assert_eq!(json["startOffset"], 0);
        assert_eq!(json["endOffset"], 5);
        assert_eq!(json["color"], "pink");
        assert_eq!(json["comment"], serde_json::json!([]));
    }

    #[test]
    fn test_comment_deserializes_from_legacy_string() {
        let json = serde_json::json!({
            "id": "highlight-1-abc",
            "startPath": "/p[1]/text()[1]",
            "startOffset": 0,
            "endPath": "/p[1]/text()[1]",
            "endOffset": 5,
            "color": "yellow",
            "text": "hello",
            "comment": "note A",
            "timestamp": 123
        });
        let record: HighlightRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.comment.entries(), &["note A".to_string()]);

        let json = serde_json::json!({
            "id": "highlight-2-abc",
            "startPath": "/p[1]/text()[1]",
            "startOffset": 0,
            "endPath": "/p[1]/text()[1]",
            "endOffset": 5,
            "color": "yellow",
            "text": "hello",
            "comment": "",
            "timestamp": 123
        });
        let record: HighlightRecord = serde_json::from_value(json).unwrap();
        assert!(record.comment.is_empty());
    }

    #[test]
    fn test_visualization_serialized_shape() {
        let point = PointAnchor {
            path: "/body[1]/p[2]".parse().unwrap(),
            insert_after: true,
        };
        let record = VisualizationRecord::new(point, "hello".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["anchorPath"], "/body[1]/p[2]");
        assert_eq!(json["insertAfter"], true);
        assert_eq!(json["selectedText"], "hello");
        assert_eq!(json["renderedContent"], serde_json::Value::Null);
    }

    #[test]
    fn test_roundtrip_record() {
        let mut record = HighlightRecord::new(anchor(), HighlightColor::Orange, "hello".into());
        record.comment.push("note A".into());
        let json = serde_json::to_string(&record).unwrap();
        let back: HighlightRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
