use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::input::FormInput;
use super::types::{ListQuery, CastMemberResponse};
use crate::AppState;
use crate::api::error::AppError;

#[utoipa::path(
    get,
    path = "/cast_members",
    params(ListQuery),
    responses(
        (status = 200, description = "Cast members", body = Vec<CastMemberResponse>)
    ),
    tag = "cast_members"
)]
pub async fn list_cast_members(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CastMemberResponse>>, AppError> {
    let rows = state.catalog.list_cast_members(&query.into()).await?;
    Ok(Json(rows.into_iter().map(CastMemberResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/cast_members/{id}",
    params(
        ("id" = String, Path, description = "Cast member ID")
    ),
    responses(
        (status = 200, description = "Cast member found", body = CastMemberResponse),
        (status = 404, description = "Cast member not found")
    ),
    tag = "cast_members"
)]
pub async fn show_cast_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CastMemberResponse>, AppError> {
    let row = state.catalog.get_cast_member(&id).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    post,
    path = "/cast_members",
    request_body = CastMemberRequest,
    responses(
        (status = 201, description = "Cast member created", body = CastMemberResponse),
        (status = 422, description = "Validation failed", body = ValidationReport)
    ),
    tag = "cast_members"
)]
pub async fn create_cast_member(
    State(state): State<AppState>,
    FormInput(input): FormInput,
) -> Result<(StatusCode, Json<CastMemberResponse>), AppError> {
    let row = state.catalog.create_cast_member(input).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[utoipa::path(
    put,
    path = "/cast_members/{id}",
    request_body = CastMemberRequest,
    params(
        ("id" = String, Path, description = "Cast member ID")
    ),
    responses(
        (status = 200, description = "Cast member updated", body = CastMemberResponse),
        (status = 404, description = "Cast member not found"),
        (status = 422, description = "Validation failed", body = ValidationReport)
    ),
    tag = "cast_members"
)]
pub async fn update_cast_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormInput(input): FormInput,
) -> Result<Json<CastMemberResponse>, AppError> {
    let row = state.catalog.update_cast_member(&id, input).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    delete,
    path = "/cast_members/{id}",
    params(
        ("id" = String, Path, description = "Cast member ID")
    ),
    responses(
        (status = 204, description = "Cast member moved to trash"),
        (status = 404, description = "Cast member not found")
    ),
    tag = "cast_members"
)]
pub async fn delete_cast_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_cast_member(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/cast_members/{id}/restore",
    params(
        ("id" = String, Path, description = "Cast member ID")
    ),
    responses(
        (status = 200, description = "Cast member restored", body = CastMemberResponse),
        (status = 404, description = "No trashed cast member with this ID")
    ),
    tag = "cast_members"
)]
pub async fn restore_cast_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CastMemberResponse>, AppError> {
    let row = state.catalog.restore_cast_member(&id).await?;
    Ok(Json(row.into()))
}
