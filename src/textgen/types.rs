//! Text-generation types
//!
//! The generation backend is an external collaborator consumed over a
//! request/response protocol. Consumers must tolerate empty results, output
//! missing the expected fenced diagram block, and any number of progress
//! notifications before the final result.

use serde::Serialize;

/// A generation request: the text payload plus a system/context prompt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub text: String,
    pub context: String,
}

/// Progress and completion notifications for one generation call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationEvent {
    /// Multi-stage progress; any number may arrive before the result.
    Progress { percent: u8 },
    /// Final successful payload.
    Done { output: String },
    /// Final failure with a presentable message.
    Failed { message: String },
}

/// Text-generation error types
#[derive(Debug, thiserror::Error)]
pub enum TextGenError {
    #[error("Generation backend not available: {0}")]
    BackendUnavailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Generation returned an empty result")]
    EmptyResult,

    #[error("No fenced {0} block in generated output")]
    MissingFencedBlock(&'static str),

    #[error("Generation failed: {0}")]
    Failed(String),
}

impl TextGenError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Extract the body of the first fenced code block labeled `lang` from
/// markdown output. Returns `None` when the block is missing or empty.
pub fn extract_fenced_block(markdown: &str, lang: &str) -> Option<String> {
    let mut in_block = false;
    let mut body: Vec<&str> = Vec::new();
    for line in markdown.lines() {
        let trimmed = line.trim();
        if !in_block {
            if let Some(info) = trimmed.strip_prefix("```") {
                if info.trim().eq_ignore_ascii_case(lang) {
                    in_block = true;
                }
            }
        } else {
            if trimmed == "```" {
                break;
            }
            body.push(line);
        }
    }
    let joined = body.join("\n");
    if !in_block || joined.trim().is_empty() {
        None
    } else {
        Some(joined.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_block() {
        let markdown = "Here is the diagram:\n```mermaid\ngraph TD\n  A --> B\n```\nDone.";
        assert_eq!(
            extract_fenced_block(markdown, "mermaid"),
            Some("graph TD\n  A --> B".to_string())
        );
    }

    #[test]
    fn test_extract_ignores_other_languages() {
        let markdown = "```python\nprint(1)\n```";
        assert_eq!(extract_fenced_block(markdown, "mermaid"), None);
    }

    #[test]
    fn test_extract_missing_block() {
        assert_eq!(extract_fenced_block("no fences here", "mermaid"), None);
    }

    #[test]
    fn test_extract_empty_block() {
        assert_eq!(extract_fenced_block("```mermaid\n\n```", "mermaid"), None);
    }

    #[test]
    fn test_extract_unterminated_block() {
        let markdown = "```mermaid\ngraph TD";
        assert_eq!(
            extract_fenced_block(markdown, "mermaid"),
            Some("graph TD".to_string())
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = GenerationEvent::Progress { percent: 40 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["percent"], 40);
    }
}
