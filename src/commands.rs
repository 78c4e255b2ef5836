//! Annotation commands
//!
//! The typed message union for page-session operations: one tagged variant
//! per operation and a single dispatch function, replacing any ambiguity
//! about listener ordering with explicit handler signatures.

use serde::{Deserialize, Serialize};

use crate::anchor::RangeAnchor;
use crate::annotations::{
    Comments, HighlightColor, HighlightRecord, HighlightSummary, VisualizationRecord,
    VisualizationSummary,
};
use crate::error::Result;
use crate::session::PageSession;

fn default_true() -> bool {
    true
}

/// A page-session command. The `selection` payloads describe the client's
/// live selection; the session re-resolves them against the current document
/// before any anchor is computed.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    CreateHighlight {
        selection: RangeAnchor,
        color: Option<HighlightColor>,
    },
    GetHighlights,
    UpdateComment {
        #[serde(rename = "highlightId")]
        highlight_id: String,
        comment: Comments,
    },
    DeleteHighlight {
        #[serde(rename = "highlightId")]
        highlight_id: String,
    },
    ClearAllHighlights,
    CreateVisualization {
        selection: RangeAnchor,
        #[serde(rename = "insertAfter", default = "default_true")]
        insert_after: bool,
    },
    GetVisualizations,
    DeleteVisualization {
        #[serde(rename = "vizId")]
        viz_id: String,
    },
    ClearAllVisualizations,
}

/// Typed response for each command.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandResponse {
    /// `highlight` is absent when there was nothing to anchor (collapsed
    /// selection, unresolvable paths); that is a no-op, not an error.
    HighlightCreated {
        highlight: Option<HighlightRecord>,
    },
    Highlights {
        highlights: Vec<HighlightSummary>,
    },
    VisualizationCreated {
        visualization: Option<VisualizationRecord>,
    },
    Visualizations {
        visualizations: Vec<VisualizationSummary>,
    },
    Ack {
        success: bool,
    },
}

/// Apply one command to a page session.
pub async fn dispatch(session: &mut PageSession, command: Command) -> Result<CommandResponse> {
    match command {
        Command::CreateHighlight { selection, color } => {
            let highlight = session.create_highlight(&selection, color).await?;
            Ok(CommandResponse::HighlightCreated { highlight })
        }
        Command::GetHighlights => Ok(CommandResponse::Highlights {
            highlights: session.export_highlights(),
        }),
        Command::UpdateComment {
            highlight_id,
            comment,
        } => {
            let success = session.update_comment(&highlight_id, comment).await?;
            Ok(CommandResponse::Ack { success })
        }
        Command::DeleteHighlight { highlight_id } => {
            let success = session.delete_highlight(&highlight_id).await?;
            Ok(CommandResponse::Ack { success })
        }
        Command::ClearAllHighlights => {
            session.clear_highlights().await?;
            Ok(CommandResponse::Ack { success: true })
        }
        Command::CreateVisualization {
            selection,
            insert_after,
        } => {
            let visualization = session.create_visualization(&selection, insert_after).await?;
            Ok(CommandResponse::VisualizationCreated { visualization })
        }
        Command::GetVisualizations => Ok(CommandResponse::Visualizations {
            visualizations: session.export_visualizations(),
        }),
        Command::DeleteVisualization { viz_id } => {
            let success = session.delete_visualization(&viz_id).await?;
            Ok(CommandResponse::Ack { success })
        }
        Command::ClearAllVisualizations => {
            session.clear_visualizations().await?;
            Ok(CommandResponse::Ack { success: true })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tags_deserialize() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "CREATE_HIGHLIGHT",
            "selection": {
                "startPath": "/p[1]/text()[1]",
                "startOffset": 0,
                "endPath": "/p[1]/text()[1]",
                "endOffset": 5
            },
            "color": "pink"
        }))
        .unwrap();
        assert!(matches!(
            command,
            Command::CreateHighlight {
                color: Some(HighlightColor::Pink),
                ..
            }
        ));

        let command: Command =
            serde_json::from_value(serde_json::json!({ "type": "CLEAR_ALL_HIGHLIGHTS" })).unwrap();
        assert!(matches!(command, Command::ClearAllHighlights));
    }

    #[test]
    fn test_update_comment_accepts_string_or_list() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "UPDATE_COMMENT",
            "highlightId": "highlight-1-abc",
            "comment": "just one note"
        }))
        .unwrap();
        let Command::UpdateComment { comment, .. } = command else {
            panic!("wrong variant");
        };
        assert_eq!(comment.entries().len(), 1);
    }

    #[test]
    fn test_response_tags_serialize() {
        let response = CommandResponse::Ack { success: true };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "ACK");
    }
}
