//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{accessories, categories, health, mobiles, products, services, users};
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mobile Shop API",
        version = "1.0.0",
        description = "Inventory, customer and repair tracking for a mobile phone shop"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Mobiles
        mobiles::list_mobiles,
        mobiles::get_mobile,
        mobiles::create_mobile,
        mobiles::update_mobile,
        mobiles::delete_mobile,
        // Accessories
        accessories::list_accessories,
        accessories::get_accessory,
        accessories::create_accessory,
        accessories::update_accessory,
        accessories::delete_accessory,
        // Services
        services::list_services,
        services::get_service,
        services::create_service,
        services::update_service,
        services::delete_service,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Products
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
    ),
    components(
        schemas(
            models::User,
            models::NewUser,
            models::Mobile,
            models::NewMobile,
            models::Accessory,
            models::NewAccessory,
            models::Service,
            models::NewService,
            models::Category,
            models::NewCategory,
            models::Product,
            models::NewProduct,
            models::Brand,
            models::ItemStatus,
            models::AccessoryType,
            models::ServiceType,
            crate::pagination::Pagination,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Customers"),
        (name = "mobiles", description = "Handset inventory"),
        (name = "accessories", description = "Accessory stock"),
        (name = "services", description = "Repair jobs"),
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Product catalog")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
