use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::input::FormInput;
use super::types::{ListQuery, VideoResponse};
use crate::AppState;
use crate::api::error::AppError;

#[utoipa::path(
    get,
    path = "/videos",
    params(ListQuery),
    responses(
        (status = 200, description = "Videos", body = Vec<VideoResponse>)
    ),
    tag = "videos"
)]
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    let rows = state.catalog.list_videos(&query.into()).await?;
    Ok(Json(rows.into_iter().map(VideoResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/videos/{id}",
    params(
        ("id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 404, description = "Video not found")
    ),
    tag = "videos"
)]
pub async fn show_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VideoResponse>, AppError> {
    let row = state.catalog.get_video(&id).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    post,
    path = "/videos",
    request_body(content = VideoRequest, content_type = "multipart/form-data", description = "Video fields and optional files"),
    responses(
        (status = 201, description = "Video created", body = VideoResponse),
        (status = 422, description = "Validation failed", body = ValidationReport)
    ),
    tag = "videos"
)]
pub async fn create_video(
    State(state): State<AppState>,
    FormInput(input): FormInput,
) -> Result<(StatusCode, Json<VideoResponse>), AppError> {
    let row = state.catalog.create_video(input).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[utoipa::path(
    put,
    path = "/videos/{id}",
    request_body(content = VideoRequest, content_type = "multipart/form-data", description = "Video fields and optional files"),
    params(
        ("id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video updated", body = VideoResponse),
        (status = 404, description = "Video not found"),
        (status = 422, description = "Validation failed", body = ValidationReport)
    ),
    tag = "videos"
)]
/// Slots without a new file keep their stored file; a replaced file is
/// removed once the update has committed.
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormInput(input): FormInput,
) -> Result<Json<VideoResponse>, AppError> {
    let row = state.catalog.update_video(&id, input).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    delete,
    path = "/videos/{id}",
    params(
        ("id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video moved to trash"),
        (status = 404, description = "Video not found")
    ),
    tag = "videos"
)]
/// Stored files are kept so the video can be restored.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_video(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/videos/{id}/restore",
    params(
        ("id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video restored", body = VideoResponse),
        (status = 404, description = "No trashed video with this ID")
    ),
    tag = "videos"
)]
pub async fn restore_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VideoResponse>, AppError> {
    let row = state.catalog.restore_video(&id).await?;
    Ok(Json(row.into()))
}
