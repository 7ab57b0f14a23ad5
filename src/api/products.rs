//! Product catalog API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{form::JsonBody, parse_id, ApiResponse, Page};
use crate::{
    error::{AppError, AppResult},
    models::{Product, NewProduct},
    pagination::ListQuery,
};

/// List products
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "List of products", body = ApiResponse<Page<Product>>)
    )
)]
pub async fn list_products(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Product>>>> {
    let listing = state.services.products.list(&query).await?;
    Ok(Json(ApiResponse::success("Products fetched successfully", listing.into())))
}

/// Get product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<Product>),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let id = parse_id(&id)?;
    let product = state.services.products.get(id).await?;
    Ok(Json(ApiResponse::success("Product fetched successfully", product)))
}

/// Create a product under an existing category
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<crate::AppState>,
    JsonBody(raw): JsonBody,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state.services.products.create(&raw, Vec::new()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Product created successfully", product)),
    ))
}

/// Update product
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = NewProduct,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    body: Result<JsonBody, AppError>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let id = parse_id(&id)?;
    let JsonBody(raw) = body?;
    let product = state.services.products.update(id, &raw, Vec::new()).await?;
    Ok(Json(ApiResponse::success("Product updated successfully", product)))
}

/// Delete product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
