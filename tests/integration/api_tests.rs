//! API tests driving the full router in-process against the memory store

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use mobile_shop_server::{
    api::create_router,
    config::AppConfig,
    error::AppResult,
    repository::Repository,
    services::{
        assets::{AssetStore, AssetUploader},
        Services,
    },
    AppState,
};

const BOUNDARY: &str = "XTESTBOUNDARY";

/// Asset store answering with a URL derived from the file content
struct FakeAssets;

#[async_trait]
impl AssetStore for FakeAssets {
    async fn upload(&self, data: Vec<u8>) -> AppResult<String> {
        Ok(format!("https://assets.test/{}.jpg", String::from_utf8_lossy(&data)))
    }
}

fn app() -> Router {
    let uploader = AssetUploader::new(Arc::new(FakeAssets));
    let services = Services::new(Repository::in_memory(), uploader);
    create_router(AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_request(method: Method, uri: &str, fields: &[(&str, &str)], files: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    for (name, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{content}.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn create_user(app: &Router, name: &str, contact_number: &str) -> Value {
    let (status, body) = send(
        app,
        form_request(
            Method::POST,
            "/users",
            &[("name", name), ("contact_number", contact_number)],
            &[],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = app();

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, empty_request(Method::GET, "/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_accessory_defaults_then_conflict() {
    let app = app();
    let payload = json!({
        "name": "Case A",
        "type": "CASE",
        "selling_price": 10,
        "stock_count": 5
    });

    let (status, body) = send(&app, json_request(Method::POST, "/accessories", payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Success");
    assert_eq!(body["message"], "Accessory created successfully");
    assert_eq!(body["data"]["sold_count"], 0);
    assert_eq!(body["data"]["status"], "IN_STOCK");
    assert_eq!(body["data"]["type"], "CASE");

    let (status, body) = send(&app, json_request(Method::POST, "/accessories", payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "Error");
    assert_eq!(body["error"], "Conflict");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_mobile_update_without_model_name_is_missing_field() {
    let app = app();

    let (status, body) = send(
        &app,
        form_request(Method::PUT, "/mobiles/5", &[("purchase_price", "100")], &[]),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "MissingField");
    assert!(body["message"].as_str().unwrap().contains("model_name"));
}

#[tokio::test]
async fn test_user_search_and_pagination() {
    let app = app();
    create_user(&app, "Asha", "9900").await;
    create_user(&app, "Ravi", "1234").await;
    create_user(&app, "Mina", "5599").await;
    create_user(&app, "Omar", "1990").await;

    let (status, body) = send(
        &app,
        empty_request(Method::GET, "/users?page=1&limit=2&search=99"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Users fetched successfully");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["pagination"]["total"], 3);
    assert_eq!(body["data"]["pagination"]["page"], 1);
    assert_eq!(body["data"]["pagination"]["limit"], 2);
    assert_eq!(body["data"]["pagination"]["totalPages"], 2);
    // Newest first
    assert_eq!(body["data"]["items"][0]["name"], "Omar");
}

#[tokio::test]
async fn test_list_falls_back_to_default_window() {
    let app = app();
    create_user(&app, "Asha", "9900").await;

    let (status, body) = send(&app, empty_request(Method::GET, "/users?page=abc&limit=-3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["page"], 1);
    assert_eq!(body["data"]["pagination"]["limit"], 10);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = app();

    let (status, body) = send(&app, empty_request(Method::GET, "/users/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadId");

    let (status, _) = send(&app, empty_request(Method::DELETE, "/categories/1.5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let app = app();
    let (_, body) = send(
        &app,
        json_request(Method::POST, "/categories", json!({"name": "Chargers"})),
    )
    .await;
    let uri = format!("/categories/{}", body["data"]["id"]);

    let (status, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");

    let (status, _) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_enum_value_is_invalid() {
    let app = app();

    let (status, body) = send(
        &app,
        form_request(
            Method::POST,
            "/mobiles",
            &[("model_name", "3310"), ("purchase_price", "20"), ("brand", "NOKIAX")],
            &[],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidValue");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("NOKIAX"));
    assert!(message.contains("NOKIA"));
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/services", json!({"model": "A52", "date": "31/02/2024"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidDate");
}

#[tokio::test]
async fn test_service_create_defaults_completed() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/services",
            json!({"model": "A52", "service_type": "BATTERY_REPLACEMENT", "date": "2024-05-01"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["completed"], false);
    assert_eq!(body["data"]["service_type"], "BATTERY_REPLACEMENT");
}

#[tokio::test]
async fn test_user_with_profile_photo() {
    let app = app();

    let (status, body) = send(
        &app,
        form_request(
            Method::POST,
            "/users",
            &[("name", "Asha"), ("contact_number", "9900")],
            &[("profile_photo", "asha")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["profile_photo"], "https://assets.test/asha.jpg");
    assert_eq!(body["data"]["contact_number"], "9900");

    // Updating without a file keeps the photo
    let uri = format!("/users/{}", body["data"]["id"]);
    let (status, body) = send(
        &app,
        form_request(
            Method::PUT,
            &uri,
            &[("name", "Asha K"), ("contact_number", "9900")],
            &[],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Asha K");
    assert_eq!(body["data"]["profile_photo"], "https://assets.test/asha.jpg");
}

#[tokio::test]
async fn test_user_rejects_second_photo_and_foreign_file_fields() {
    let app = app();
    let fields = [("name", "Asha"), ("contact_number", "9900")];

    let (status, body) = send(
        &app,
        form_request(
            Method::POST,
            "/users",
            &fields,
            &[("profile_photo", "a"), ("profile_photo", "b")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidValue");

    let (status, body) = send(
        &app,
        form_request(Method::POST, "/users", &fields, &[("avatar", "a")]),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidValue");
}

#[tokio::test]
async fn test_user_update_conflicts_with_other_contact_number() {
    let app = app();
    create_user(&app, "Asha", "9900").await;
    let ravi = create_user(&app, "Ravi", "1234").await;
    let uri = format!("/users/{}", ravi["id"]);

    let (status, body) = send(
        &app,
        form_request(Method::PUT, &uri, &[("name", "Ravi"), ("contact_number", "9900")], &[]),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let (status, _) = send(
        &app,
        form_request(Method::PUT, &uri, &[("name", "Ravi S"), ("contact_number", "1234")], &[]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_mobile_photos_keep_upload_order() {
    let app = app();

    let (status, body) = send(
        &app,
        form_request(
            Method::POST,
            "/mobiles",
            &[("model_name", "Pixel 8"), ("purchase_price", "450"), ("brand", "GOOGLE")],
            &[("photos", "front"), ("photos", "back")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["data"]["photos"],
        json!(["https://assets.test/front.jpg", "https://assets.test/back.jpg"])
    );
    assert_eq!(body["data"]["brand"], "GOOGLE");
}

#[tokio::test]
async fn test_product_requires_existing_category() {
    let app = app();
    let product = json!({"name": "Fast charger", "price": 19.99, "category_id": 7});

    let (status, body) = send(&app, json_request(Method::POST, "/products", product)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category 7 not found");

    let (_, category) = send(
        &app,
        json_request(Method::POST, "/categories", json!({"name": "Chargers"})),
    )
    .await;
    let product = json!({
        "name": "Fast charger",
        "price": 19.99,
        "category_id": category["data"]["id"]
    });
    let (status, body) = send(&app, json_request(Method::POST, "/products", product)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["category_id"], category["data"]["id"]);
}

#[tokio::test]
async fn test_malformed_json_is_invalid_format() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/categories")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidFormat");
}

#[tokio::test]
async fn test_huge_limit_counts_a_single_page() {
    let app = app();
    create_user(&app, "Asha", "9900").await;
    create_user(&app, "Ravi", "1234").await;

    let (status, body) = send(
        &app,
        empty_request(Method::GET, "/users?limit=9223372036854775807"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["pagination"]["total"], 2);
    assert_eq!(body["data"]["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn test_mobile_json_update_without_model_name_is_missing_field() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/mobiles/5", json!({ "purchase_price": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    assert_eq!(body["status"], "Error");
    assert_eq!(body["error"], "MissingField");
    assert!(body["message"].as_str().unwrap().contains("model_name"));
}

#[tokio::test]
async fn test_bad_id_is_reported_before_the_body() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/mobiles/abc", json!({ "model_name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadId");

    let (status, body) = send(&app, empty_request(Method::PUT, "/mobiles/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadId");

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/categories/abc")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadId");
}

#[tokio::test]
async fn test_user_created_from_json_body() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/users",
            json!({ "name": "Asha", "contact_number": 9900, "place": "Pune" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["name"], "Asha");
    assert_eq!(body["data"]["place"], "Pune");
    assert!(body["data"]["profile_photo"].is_null());
}

#[tokio::test]
async fn test_unsupported_content_type_is_invalid_format() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/mobiles")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from("model_name=X"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "Error");
    assert_eq!(body["error"], "InvalidFormat");
}
