//! Page session API routes

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchor::RangeAnchor;
use crate::commands::{dispatch, Command, CommandResponse};
use crate::error::{AppError, Result};
use crate::session::{Extraction, PageSession, RestoreCounts};
use crate::state::{AppState, SessionHandle};

/// Create the sessions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_session))
        .route("/:id", delete(close_session))
        .route("/:id/html", get(annotated_html))
        .route("/:id/commands", post(run_command))
        .route("/:id/extract", post(extract))
        .route("/:id/visualizations/:viz_id/content", post(fill_visualization))
}

#[derive(Debug, Deserialize)]
struct OpenSessionRequest {
    url: String,
    html: String,
}

#[derive(Debug, Serialize)]
struct OpenSessionResponse {
    #[serde(rename = "sessionId")]
    session_id: Uuid,
    title: String,
    #[serde(flatten)]
    restored: RestoreCounts,
}

/// Open a page session: parse the snapshot and restore persisted
/// annotations for the page's storage keys.
async fn open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<OpenSessionResponse>)> {
    let (session, restored) =
        PageSession::open(&request.url, &request.html, state.gateway().clone()).await?;
    let title = session.title().to_string();
    let session_id = state.insert_session(session);
    tracing::debug!("opened session {} for {}", session_id, request.url);

    Ok((
        StatusCode::CREATED,
        Json(OpenSessionResponse {
            session_id,
            title,
            restored,
        }),
    ))
}

fn lookup(state: &AppState, id: &Uuid) -> Result<SessionHandle> {
    state
        .session(id)
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))
}

/// Close a session, abandoning any in-flight work.
async fn close_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if state.remove_session(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session not found: {}", id)))
    }
}

/// The annotated page: snapshot plus live projections.
async fn annotated_html(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let handle = lookup(&state, &id)?;
    let session = handle.lock().await;
    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        session.annotated_markup(),
    ))
}

/// Apply one typed annotation command.
async fn run_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(command): Json<Command>,
) -> Result<Json<CommandResponse>> {
    let handle = lookup(&state, &id)?;
    let mut session = handle.lock().await;
    let response = dispatch(&mut session, command).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct ExtractRequest {
    #[serde(default)]
    selection: Option<RangeAnchor>,
}

/// Extract text for summarization (selection or page mode).
async fn extract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<Extraction>> {
    let handle = lookup(&state, &id)?;
    let session = handle.lock().await;
    Ok(Json(session.extract(request.selection.as_ref())))
}

#[derive(Debug, Deserialize)]
struct FillContentRequest {
    markup: String,
}

/// Swap externally rendered content into a pending visualization container.
async fn fill_visualization(
    State(state): State<AppState>,
    Path((id, viz_id)): Path<(Uuid, String)>,
    Json(request): Json<FillContentRequest>,
) -> Result<StatusCode> {
    let handle = lookup(&state, &id)?;
    let mut session = handle.lock().await;
    if session.fill_visualization(&viz_id, &request.markup).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Visualization not found: {}",
            viz_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;

    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryGateway;
    use crate::textgen::TextGenService;

    fn test_server() -> TestServer {
        let gateway = Arc::new(MemoryGateway::new());
        let config = Config::default();
        let textgen = TextGenService::from_config(&config.textgen);
        let state = AppState::new(config, gateway, textgen);
        let app = Router::new()
            .nest("/api/v1/sessions", router())
            .with_state(state);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_open_command_and_readback() {
        let server = test_server();

        let open = server
            .post("/api/v1/sessions")
            .json(&serde_json::json!({
                "url": "https://example.com/a?x=1#frag",
                "html": "<html><body><article><p>intro</p><p>hello world</p></article></body></html>"
            }))
            .await;
        open.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = open.json();
        assert_eq!(body["restoredHighlights"], 0);
        let session_id = body["sessionId"].as_str().unwrap().to_string();

        let command = server
            .post(&format!("/api/v1/sessions/{}/commands", session_id))
            .json(&serde_json::json!({
                "type": "CREATE_HIGHLIGHT",
                "selection": {
                    "startPath": "/html[1]/body[1]/article[1]/p[2]/text()[1]",
                    "startOffset": 0,
                    "endPath": "/html[1]/body[1]/article[1]/p[2]/text()[1]",
                    "endOffset": 11
                },
                "color": "yellow"
            }))
            .await;
        command.assert_status_ok();
        let body: serde_json::Value = command.json();
        assert_eq!(body["type"], "HIGHLIGHT_CREATED");
        assert_eq!(body["highlight"]["text"], "hello world");

        let html = server
            .get(&format!("/api/v1/sessions/{}/html", session_id))
            .await;
        html.assert_status_ok();
        assert!(html.text().contains("text-highlight"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let server = test_server();
        let response = server
            .get(&format!("/api/v1/sessions/{}/html", Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
