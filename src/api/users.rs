//! User API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{form::FormBody, parse_id, ApiResponse, Page};
use crate::{
    error::{AppError, AppResult},
    models::{NewUser, User},
    pagination::ListQuery,
};

/// List users with search and pagination
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListQuery),
    responses(
        (status = 200, description = "List of users", body = ApiResponse<Page<User>>)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<User>>>> {
    let listing = state.services.users.list(&query).await?;
    Ok(Json(ApiResponse::success("Users fetched successfully", listing.into())))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<User>),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<User>>> {
    let id = parse_id(&id)?;
    let user = state.services.users.get(id).await?;
    Ok(Json(ApiResponse::success("User fetched successfully", user)))
}

/// Create a user, optionally with a profile photo
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body(content = NewUser, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 409, description = "Contact number already in use", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    form: FormBody<User>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state.services.users.create(&form.raw, form.files).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User created successfully", user)),
    ))
}

/// Update a user; a new photo replaces the stored one
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    request_body(content = NewUser, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Contact number already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    form: Result<FormBody<User>, AppError>,
) -> AppResult<Json<ApiResponse<User>>> {
    let id = parse_id(&id)?;
    let form = form?;
    let user = state.services.users.update(id, &form.raw, form.files).await?;
    Ok(Json(ApiResponse::success("User updated successfully", user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
