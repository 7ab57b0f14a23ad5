//! Mobile inventory API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{form::FormBody, parse_id, ApiResponse, Page};
use crate::{
    error::{AppError, AppResult},
    models::{Mobile, NewMobile},
    pagination::ListQuery,
};

/// List mobiles, newest first
#[utoipa::path(
    get,
    path = "/mobiles",
    tag = "mobiles",
    params(ListQuery),
    responses(
        (status = 200, description = "List of mobiles", body = ApiResponse<Page<Mobile>>)
    )
)]
pub async fn list_mobiles(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Mobile>>>> {
    let listing = state.services.mobiles.list(&query).await?;
    Ok(Json(ApiResponse::success("Mobiles fetched successfully", listing.into())))
}

/// Get mobile by ID
#[utoipa::path(
    get,
    path = "/mobiles/{id}",
    tag = "mobiles",
    params(("id" = i32, Path, description = "Mobile ID")),
    responses(
        (status = 200, description = "Mobile details", body = ApiResponse<Mobile>),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Mobile not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_mobile(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Mobile>>> {
    let id = parse_id(&id)?;
    let mobile = state.services.mobiles.get(id).await?;
    Ok(Json(ApiResponse::success("Mobile fetched successfully", mobile)))
}

/// Create a mobile with up to ten photos
#[utoipa::path(
    post,
    path = "/mobiles",
    tag = "mobiles",
    request_body(content = NewMobile, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Mobile created", body = ApiResponse<Mobile>),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 500, description = "Photo upload failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_mobile(
    State(state): State<crate::AppState>,
    form: FormBody<Mobile>,
) -> AppResult<(StatusCode, Json<ApiResponse<Mobile>>)> {
    let mobile = state.services.mobiles.create(&form.raw, form.files).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Mobile created successfully", mobile)),
    ))
}

/// Update a mobile; uploaded photos replace the stored ones
#[utoipa::path(
    put,
    path = "/mobiles/{id}",
    tag = "mobiles",
    params(("id" = i32, Path, description = "Mobile ID")),
    request_body(content = NewMobile, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Mobile updated", body = ApiResponse<Mobile>),
        (status = 404, description = "Mobile not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_mobile(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    form: Result<FormBody<Mobile>, AppError>,
) -> AppResult<Json<ApiResponse<Mobile>>> {
    let id = parse_id(&id)?;
    let form = form?;
    let mobile = state.services.mobiles.update(id, &form.raw, form.files).await?;
    Ok(Json(ApiResponse::success("Mobile updated successfully", mobile)))
}

/// Delete a mobile
#[utoipa::path(
    delete,
    path = "/mobiles/{id}",
    tag = "mobiles",
    params(("id" = i32, Path, description = "Mobile ID")),
    responses(
        (status = 204, description = "Mobile deleted"),
        (status = 404, description = "Mobile not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_mobile(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.mobiles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
