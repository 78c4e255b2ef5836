//! Settings API routes

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::error::Result;
use crate::settings::Settings;
use crate::state::AppState;

/// Create the settings router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings))
        .route("/", put(put_settings))
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>> {
    Ok(Json(state.settings().load().await?))
}

async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<StatusCode> {
    state.settings().save(&settings).await?;
    Ok(StatusCode::NO_CONTENT)
}
