//! Text-generation API routes
//!
//! Thin surface over the generation service. Progress notifications are
//! drained server-side; the client gets the final payload or an explicit
//! error. Generation failures never touch the annotation stores.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;
use crate::textgen::{collect_result, summary_context};

/// Create the generation router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/availability", get(availability))
        .route("/summary", post(summary))
        .route("/diagram", post(diagram))
}

#[derive(Debug, Serialize)]
struct AvailabilityResponse {
    available: bool,
}

async fn availability(State(state): State<AppState>) -> Json<AvailabilityResponse> {
    Json(AvailabilityResponse {
        available: state.textgen().is_available().await,
    })
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    result: String,
}

/// Summarize text using the stored occupation/custom-prompt settings as
/// context.
async fn summary(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<SummaryResponse>> {
    let settings = state.settings().load().await?;
    let mut context = summary_context(&settings.occupation, &settings.custom_prompt);
    context.push_str(&format!(" Summary type: {}.", settings.summary_type));
    let events = state.textgen().summarize(request.text, context);
    let result = collect_result(events, |percent| {
        tracing::debug!("summary generation progress: {}%", percent);
    })
    .await?;
    Ok(Json(SummaryResponse { result }))
}

#[derive(Debug, Serialize)]
struct DiagramResponse {
    #[serde(rename = "mermaidSource")]
    mermaid_source: String,
}

/// Generate diagram source. The client renders it externally and posts the
/// result back to the owning visualization container.
async fn diagram(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<DiagramResponse>> {
    let events = state.textgen().diagram(request.text);
    let mermaid_source = collect_result(events, |percent| {
        tracing::debug!("diagram generation progress: {}%", percent);
    })
    .await?;
    Ok(Json(DiagramResponse { mermaid_source }))
}
