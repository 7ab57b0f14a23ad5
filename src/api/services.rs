//! Repair service API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{form::JsonBody, parse_id, ApiResponse, Page};
use crate::{
    error::{AppError, AppResult},
    models::{Service, NewService},
    pagination::ListQuery,
};

/// List services
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    params(ListQuery),
    responses(
        (status = 200, description = "List of services", body = ApiResponse<Page<Service>>)
    )
)]
pub async fn list_services(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Service>>>> {
    let listing = state.services.services.list(&query).await?;
    Ok(Json(ApiResponse::success("Services fetched successfully", listing.into())))
}

/// Get service by ID
#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service details", body = ApiResponse<Service>),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_service(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let id = parse_id(&id)?;
    let service = state.services.services.get(id).await?;
    Ok(Json(ApiResponse::success("Service fetched successfully", service)))
}

/// Book a repair job
#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = NewService,
    responses(
        (status = 201, description = "Service created", body = ApiResponse<Service>),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_service(
    State(state): State<crate::AppState>,
    JsonBody(raw): JsonBody,
) -> AppResult<(StatusCode, Json<ApiResponse<Service>>)> {
    let service = state.services.services.create(&raw, Vec::new()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Service created successfully", service)),
    ))
}

/// Update service
#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service ID")),
    request_body = NewService,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<Service>),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_service(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    body: Result<JsonBody, AppError>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let id = parse_id(&id)?;
    let JsonBody(raw) = body?;
    let service = state.services.services.update(id, &raw, Vec::new()).await?;
    Ok(Json(ApiResponse::success("Service updated successfully", service)))
}

/// Delete service
#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service deleted"),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_service(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.services.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
