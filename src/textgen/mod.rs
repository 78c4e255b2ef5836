//! Text generation
//!
//! Client side of the external summarization / diagram-generation service.
//! The annotation core never implements generation; it consumes results and
//! tolerates the collaborator's failure modes.

mod provider;
mod service;
mod types;

pub use provider::{OllamaProvider, TextGenProvider};
pub use service::{collect_result, summary_context, TextGenService};
pub use types::{extract_fenced_block, GenerationEvent, GenerationRequest, TextGenError};
