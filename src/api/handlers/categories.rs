use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::input::FormInput;
use super::types::{ListQuery, CategoryResponse};
use crate::AppState;
use crate::api::error::AppError;

#[utoipa::path(
    get,
    path = "/categories",
    params(ListQuery),
    responses(
        (status = 200, description = "Categories", body = Vec<CategoryResponse>)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = state.catalog.list_categories(&query.into()).await?;
    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn show_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let row = state.catalog.get_category(&id).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 422, description = "Validation failed", body = ValidationReport)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    FormInput(input): FormInput,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let row = state.catalog.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    request_body = CategoryRequest,
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Validation failed", body = ValidationReport)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormInput(input): FormInput,
) -> Result<Json<CategoryResponse>, AppError> {
    let row = state.catalog.update_category(&id, input).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category moved to trash"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/categories/{id}/restore",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category restored", body = CategoryResponse),
        (status = 404, description = "No trashed category with this ID")
    ),
    tag = "categories"
)]
pub async fn restore_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let row = state.catalog.restore_category(&id).await?;
    Ok(Json(row.into()))
}
