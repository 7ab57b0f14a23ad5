//! API handlers for the mobile shop REST endpoints

pub mod accessories;
pub mod categories;
pub mod form;
pub mod health;
pub mod mobiles;
pub mod openapi;
pub mod products;
pub mod services;
pub mod users;

use axum::{routing::get, Router};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    pagination::Pagination,
    services::resource::Listing,
    AppState,
};

/// Success envelope
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Always "Success"
    pub status: &'static str,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "Success",
            message: message.into(),
            data,
        }
    }
}

/// One page of records
#[derive(Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> From<Listing<T>> for Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn from(listing: Listing<T>) -> Self {
        Self {
            items: listing.items,
            pagination: listing.pagination,
        }
    }
}

/// Parse a path id, rejecting anything but a positive integer
pub fn parse_id(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadId(format!("Invalid id '{}'", raw)))
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        // Mobiles
        .route("/mobiles", get(mobiles::list_mobiles).post(mobiles::create_mobile))
        .route(
            "/mobiles/:id",
            get(mobiles::get_mobile)
                .put(mobiles::update_mobile)
                .delete(mobiles::delete_mobile),
        )
        // Accessories
        .route(
            "/accessories",
            get(accessories::list_accessories).post(accessories::create_accessory),
        )
        .route(
            "/accessories/:id",
            get(accessories::get_accessory)
                .put(accessories::update_accessory)
                .delete(accessories::delete_accessory),
        )
        // Services
        .route("/services", get(services::list_services).post(services::create_service))
        .route(
            "/services/:id",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Products
        .route("/products", get(products::list_products).post(products::create_product))
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::BadId(_))));
        assert!(matches!(parse_id("1.5"), Err(AppError::BadId(_))));
        assert!(matches!(parse_id("0"), Err(AppError::BadId(_))));
        assert!(matches!(parse_id(""), Err(AppError::BadId(_))));
    }
}
