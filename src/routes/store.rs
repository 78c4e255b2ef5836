//! Stored-set tooling routes
//!
//! Raw access to the persisted per-page sets: key listing, row inspection
//! and bulk clearing. Debug and maintenance surface; the session API is the
//! normal path.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::annotations::RecordKind;
use crate::error::Result;
use crate::page::PageKey;
use crate::state::AppState;

/// Create the store tooling router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/keys", get(list_keys))
        .route("/page", get(page_records))
        .route("/page", delete(clear_page))
}

/// Every stored key, across all pages and kinds.
async fn list_keys(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.gateway().keys().await?))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    url: String,
    kind: RecordKind,
}

/// Raw persisted rows for one page and kind.
async fn page_records(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let key = PageKey::new(&query.url).storage_key(query.kind);
    let value = state
        .gateway()
        .get(&key)
        .await?
        .unwrap_or_else(|| Value::Array(Vec::new()));
    Ok(Json(value))
}

#[derive(Debug, Deserialize)]
struct ClearQuery {
    url: String,
}

/// Drop both stored sets for a page.
async fn clear_page(
    State(state): State<AppState>,
    Query(query): Query<ClearQuery>,
) -> Result<StatusCode> {
    let page = PageKey::new(&query.url);
    let gateway = state.gateway();
    gateway
        .remove(&page.storage_key(RecordKind::Highlights))
        .await?;
    gateway
        .remove(&page.storage_key(RecordKind::Visualizations))
        .await?;
    tracing::info!("cleared stored annotations for {}", page.canonical());
    Ok(StatusCode::NO_CONTENT)
}
