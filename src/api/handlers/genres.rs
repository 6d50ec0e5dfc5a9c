use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::input::FormInput;
use super::types::{ListQuery, GenreResponse};
use crate::AppState;
use crate::api::error::AppError;

#[utoipa::path(
    get,
    path = "/genres",
    params(ListQuery),
    responses(
        (status = 200, description = "Genres", body = Vec<GenreResponse>)
    ),
    tag = "genres"
)]
pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<GenreResponse>>, AppError> {
    let rows = state.catalog.list_genres(&query.into()).await?;
    Ok(Json(rows.into_iter().map(GenreResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/genres/{id}",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre found", body = GenreResponse),
        (status = 404, description = "Genre not found")
    ),
    tag = "genres"
)]
pub async fn show_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GenreResponse>, AppError> {
    let row = state.catalog.get_genre(&id).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    post,
    path = "/genres",
    request_body = GenreRequest,
    responses(
        (status = 201, description = "Genre created", body = GenreResponse),
        (status = 422, description = "Validation failed", body = ValidationReport)
    ),
    tag = "genres"
)]
pub async fn create_genre(
    State(state): State<AppState>,
    FormInput(input): FormInput,
) -> Result<(StatusCode, Json<GenreResponse>), AppError> {
    let row = state.catalog.create_genre(input).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[utoipa::path(
    put,
    path = "/genres/{id}",
    request_body = GenreRequest,
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre updated", body = GenreResponse),
        (status = 404, description = "Genre not found"),
        (status = 422, description = "Validation failed", body = ValidationReport)
    ),
    tag = "genres"
)]
/// `categories_id` replaces the genre's categories.
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormInput(input): FormInput,
) -> Result<Json<GenreResponse>, AppError> {
    let row = state.catalog.update_genre(&id, input).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    delete,
    path = "/genres/{id}",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 204, description = "Genre moved to trash"),
        (status = 404, description = "Genre not found")
    ),
    tag = "genres"
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_genre(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/genres/{id}/restore",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre restored", body = GenreResponse),
        (status = 404, description = "No trashed genre with this ID")
    ),
    tag = "genres"
)]
pub async fn restore_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GenreResponse>, AppError> {
    let row = state.catalog.restore_genre(&id).await?;
    Ok(Json(row.into()))
}
