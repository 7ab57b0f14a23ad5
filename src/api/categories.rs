//! Category API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{form::JsonBody, parse_id, ApiResponse, Page};
use crate::{
    error::{AppError, AppResult},
    models::{Category, NewCategory},
    pagination::ListQuery,
};

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    params(ListQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Page<Category>>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Category>>>> {
    let listing = state.services.categories.list(&query).await?;
    Ok(Json(ApiResponse::success("Categories fetched successfully", listing.into())))
}

/// Get category by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = ApiResponse<Category>),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let id = parse_id(&id)?;
    let category = state.services.categories.get(id).await?;
    Ok(Json(ApiResponse::success("Category fetched successfully", category)))
}

/// Create category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    JsonBody(raw): JsonBody,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let category = state.services.categories.create(&raw, Vec::new()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Category created successfully", category)),
    ))
}

/// Update category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = NewCategory,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    body: Result<JsonBody, AppError>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let id = parse_id(&id)?;
    let JsonBody(raw) = body?;
    let category = state.services.categories.update(id, &raw, Vec::new()).await?;
    Ok(Json(ApiResponse::success("Category updated successfully", category)))
}

/// Delete category
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
