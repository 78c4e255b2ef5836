//! Generation service
//!
//! Orchestrates summary and diagram generation against the configured
//! provider. Each call yields a stream of [`GenerationEvent`]s: zero or more
//! progress notifications followed by exactly one `Done` or `Failed`.
//! Generation failures never touch the annotation stores.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::TextGenConfig;

use super::provider::{OllamaProvider, TextGenProvider};
use super::types::{extract_fenced_block, GenerationEvent, GenerationRequest, TextGenError};

/// System prompt for diagram generation. The reply must carry a fenced
/// mermaid block; anything else is treated as a generation failure.
const DIAGRAM_CONTEXT: &str = "You are a diagram generator. Express the structure of the \
provided text as a Mermaid diagram. Reply with exactly one fenced code block labeled \
`mermaid` and no other prose.";

/// Assemble the summary context prompt from the user's settings.
pub fn summary_context(occupation: &str, custom_prompt: &str) -> String {
    format!("Summary for a {}.{}", occupation, custom_prompt.trim())
}

#[derive(Clone)]
pub struct TextGenService {
    provider: Arc<dyn TextGenProvider>,
}

impl TextGenService {
    pub fn new(provider: Arc<dyn TextGenProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &TextGenConfig) -> Self {
        Self::new(Arc::new(OllamaProvider::from_config(config)))
    }

    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Generate a markdown summary of `text`.
    pub fn summarize(&self, text: String, context: String) -> mpsc::UnboundedReceiver<GenerationEvent> {
        self.run(GenerationRequest { text, context }, None)
    }

    /// Generate diagram source for `text`. The final `Done` payload is the
    /// extracted mermaid source, not the raw model output.
    pub fn diagram(&self, text: String) -> mpsc::UnboundedReceiver<GenerationEvent> {
        self.run(
            GenerationRequest {
                text,
                context: DIAGRAM_CONTEXT.to_string(),
            },
            Some("mermaid"),
        )
    }

    fn run(
        &self,
        request: GenerationRequest,
        fenced_lang: Option<&'static str>,
    ) -> mpsc::UnboundedReceiver<GenerationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider = self.provider.clone();

        tokio::spawn(async move {
            // Receiver drops are fine; a navigated-away client just abandons
            // the stream.
            let _ = tx.send(GenerationEvent::Progress { percent: 0 });

            if !provider.is_available().await {
                let err = TextGenError::BackendUnavailable(provider.name().to_string());
                let _ = tx.send(GenerationEvent::Failed {
                    message: err.to_string(),
                });
                return;
            }
            let _ = tx.send(GenerationEvent::Progress { percent: 50 });

            let outcome = match provider.generate(&request).await {
                Ok(output) if output.trim().is_empty() => Err(TextGenError::EmptyResult),
                Ok(output) => match fenced_lang {
                    Some(lang) => extract_fenced_block(&output, lang)
                        .ok_or(TextGenError::MissingFencedBlock(lang)),
                    None => Ok(output),
                },
                Err(err) => Err(err),
            };

            let _ = tx.send(GenerationEvent::Progress { percent: 100 });
            let _ = tx.send(match outcome {
                Ok(output) => GenerationEvent::Done { output },
                Err(err) => {
                    tracing::warn!("generation failed: {}", err);
                    GenerationEvent::Failed {
                        message: err.to_string(),
                    }
                }
            });
        });

        rx
    }
}

/// Drain an event stream to its final result, forwarding progress
/// notifications to `on_progress`.
pub async fn collect_result(
    mut events: mpsc::UnboundedReceiver<GenerationEvent>,
    mut on_progress: impl FnMut(u8),
) -> Result<String, TextGenError> {
    while let Some(event) = events.recv().await {
        match event {
            GenerationEvent::Progress { percent } => on_progress(percent),
            GenerationEvent::Done { output } => return Ok(output),
            GenerationEvent::Failed { message } => return Err(TextGenError::Failed(message)),
        }
    }
    Err(TextGenError::Failed(
        "generation ended without a result".to_string(),
    ))
}
