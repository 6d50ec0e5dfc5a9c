use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use crate::AppState;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System health status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.db.ping().await.is_ok();

    // A missing probe key is fine; only transport errors count.
    let storage_ok = state.storage.file_exists("health-check").await.is_ok();

    let label = |ok: bool| if ok { "connected" } else { "disconnected" };

    Json(HealthResponse {
        status: if db_ok && storage_ok { "ok" } else { "degraded" }.to_string(),
        database: label(db_ok).to_string(),
        storage: label(storage_ok).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
