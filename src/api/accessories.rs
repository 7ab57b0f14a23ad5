//! Accessory API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{form::JsonBody, parse_id, ApiResponse, Page};
use crate::{
    error::{AppError, AppResult},
    models::{Accessory, NewAccessory},
    pagination::ListQuery,
};

/// List accessories with search and pagination
#[utoipa::path(
    get,
    path = "/accessories",
    tag = "accessories",
    params(ListQuery),
    responses(
        (status = 200, description = "List of accessories", body = ApiResponse<Page<Accessory>>)
    )
)]
pub async fn list_accessories(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Accessory>>>> {
    let listing = state.services.accessories.list(&query).await?;
    Ok(Json(ApiResponse::success("Accessories fetched successfully", listing.into())))
}

/// Get accessory by ID
#[utoipa::path(
    get,
    path = "/accessories/{id}",
    tag = "accessories",
    params(("id" = i32, Path, description = "Accessory ID")),
    responses(
        (status = 200, description = "Accessory details", body = ApiResponse<Accessory>),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Accessory not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_accessory(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Accessory>>> {
    let id = parse_id(&id)?;
    let accessory = state.services.accessories.get(id).await?;
    Ok(Json(ApiResponse::success("Accessory fetched successfully", accessory)))
}

/// Create accessory
#[utoipa::path(
    post,
    path = "/accessories",
    tag = "accessories",
    request_body = NewAccessory,
    responses(
        (status = 201, description = "Accessory created", body = ApiResponse<Accessory>),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_accessory(
    State(state): State<crate::AppState>,
    JsonBody(raw): JsonBody,
) -> AppResult<(StatusCode, Json<ApiResponse<Accessory>>)> {
    let accessory = state.services.accessories.create(&raw, Vec::new()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Accessory created successfully", accessory)),
    ))
}

/// Update accessory
#[utoipa::path(
    put,
    path = "/accessories/{id}",
    tag = "accessories",
    params(("id" = i32, Path, description = "Accessory ID")),
    request_body = NewAccessory,
    responses(
        (status = 200, description = "Accessory updated", body = ApiResponse<Accessory>),
        (status = 404, description = "Accessory not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_accessory(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    body: Result<JsonBody, AppError>,
) -> AppResult<Json<ApiResponse<Accessory>>> {
    let id = parse_id(&id)?;
    let JsonBody(raw) = body?;
    let accessory = state.services.accessories.update(id, &raw, Vec::new()).await?;
    Ok(Json(ApiResponse::success("Accessory updated successfully", accessory)))
}

/// Delete accessory
#[utoipa::path(
    delete,
    path = "/accessories/{id}",
    tag = "accessories",
    params(("id" = i32, Path, description = "Accessory ID")),
    responses(
        (status = 204, description = "Accessory deleted"),
        (status = 404, description = "Accessory not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_accessory(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.accessories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
