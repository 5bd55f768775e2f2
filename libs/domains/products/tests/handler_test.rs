//! Handler tests for Products domain
//!
//! These drive the products router over the in-memory repository:
//! - Request deserialization and validation
//! - Response bodies and HTTP status codes
//! - Error payloads (`{error, code, details?}`)

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let service = ProductService::new(InMemoryProductRepository::new());
    Router::new().nest("/products", handlers::router(service))
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn create(app: &Router, name: &str, price: f64, category: &str) -> Product {
    let response = send(
        app,
        "POST",
        "/products",
        Some(json!({ "name": name, "price": price, "category": category })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_product_returns_201() {
    let app = app();

    let response = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "name": "Smartphone",
            "price": 299.99,
            "description": "6.1 inch display",
            "category": "electronics"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["name"], "Smartphone");
    assert_eq!(body["price"], 299.99);
    assert_eq!(body["description"], "6.1 inch display");
    assert_eq!(body["category"], "electronics");
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_product_missing_fields_returns_400() {
    let app = app();

    for body in [
        json!({ "price": 10.0, "category": "books" }),
        json!({ "name": "Notebook", "category": "books" }),
        json!({ "name": "Notebook", "price": 10.0 }),
    ] {
        let response = send(&app, "POST", "/products", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["code"], "VALIDATION_ERROR");
        assert!(error["error"].is_string());
        assert!(error["details"].is_object());
    }

    let response = send(&app, "GET", "/products", None).await;
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_create_product_price_bounds() {
    let app = app();

    for price in [0.0, 0.01, 15.0, 1_000_000.0] {
        let response = send(
            &app,
            "POST",
            "/products",
            Some(json!({ "name": "Widget", "price": price, "category": "tools" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED, "price {}", price);
    }

    for price in [-0.01, -1.0, -500.0] {
        let response = send(
            &app,
            "POST",
            "/products",
            Some(json!({ "name": "Widget", "price": price, "category": "tools" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "price {}", price);

        let error: Value = json_body(response.into_body()).await;
        assert!(error["details"]["price"].is_array());
    }
}

#[tokio::test]
async fn test_create_product_rejects_string_price() {
    let app = app();

    let response = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "Widget", "price": "12", "category": "tools" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["code"], "INVALID_JSON");
}

#[tokio::test]
async fn test_list_products_paginates() {
    let app = app();
    for i in 0..25 {
        create(&app, &format!("Product {:02}", i), 1.0, "misc").await;
    }

    let response = send(&app, "GET", "/products", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["totalItems"], 25);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"][0]["name"], "Product 00");

    let response = send(&app, "GET", "/products?page=3&limit=10", None).await;
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.current_page, 3);
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.data[0].name, "Product 20");

    let response = send(&app, "GET", "/products?page=9", None).await;
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total_items, 25);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_list_products_empty_store() {
    let app = app();

    let response = send(&app, "GET", "/products", None).await;
    let body: Value = json_body(response.into_body()).await;

    assert_eq!(body["totalItems"], 0);
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_products_rejects_bad_pagination() {
    let app = app();

    for uri in ["/products?page=abc", "/products?limit=0", "/products?page=-1"] {
        let response = send(&app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["code"], "INVALID_QUERY");
    }
}

#[tokio::test]
async fn test_list_products_rejects_out_of_range_pagination() {
    let app = app();
    create(&app, "Smartphone", 299.0, "electronics").await;

    for uri in [
        "/products?limit=10000000000000000000",
        "/products?page=3&limit=10000000000000000000",
        "/products?page=1000000000000000000&limit=10",
        "/products?page=99999999999999999999",
    ] {
        let response = send(&app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["code"], "INVALID_QUERY");
    }
}

#[tokio::test]
async fn test_list_products_filters() {
    let app = app();
    create(&app, "Smartphone", 299.0, "electronics").await;
    create(&app, "Laptop", 999.0, "electronics").await;
    create(&app, "Phone Case", 15.0, "accessories").await;
    create(&app, "Headphones", 79.0, "electronics-refurbished").await;

    let response = send(&app, "GET", "/products?category=electronics", None).await;
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total_items, 2);
    assert!(page.data.iter().all(|p| p.category == "electronics"));

    let response = send(&app, "GET", "/products?name=phone", None).await;
    let page: ProductPage = json_body(response.into_body()).await;
    let names: Vec<&str> = page.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Smartphone", "Headphones"]);

    let response = send(&app, "GET", "/products?name=phone&category=electronics", None).await;
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total_items, 1);
    assert_eq!(page.data[0].name, "Smartphone");

    let response = send(&app, "GET", "/products?name=&category=", None).await;
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total_items, 4);
}

#[tokio::test]
async fn test_get_product_round_trip() {
    let app = app();
    let created = create(&app, "Desk Lamp", 39.5, "home").await;

    let response = send(&app, "GET", &format!("/products/{}", created.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: Product = json_body(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_missing_product_returns_404() {
    let app = app();
    let id = uuid::Uuid::now_v7();
    let uri = format!("/products/{}", id);

    let response = send(&app, "GET", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["code"], "NOT_FOUND");
    assert_eq!(error["error"], format!("Product {} not found", id));

    let response = send(&app, "PUT", &uri, Some(json!({ "price": 1.0 }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_returns_400() {
    let app = app();

    let response = send(&app, "GET", "/products/not-a-uuid", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["code"], "INVALID_UUID");
}

#[tokio::test]
async fn test_update_product_merges_fields() {
    let app = app();
    let created = create(&app, "Desk Lamp", 39.5, "home").await;
    let uri = format!("/products/{}", created.id);

    let response = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "price": 29.0, "description": "LED" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Desk Lamp");
    assert_eq!(updated.price, 29.0);
    assert_eq!(updated.description.as_deref(), Some("LED"));
    assert_eq!(updated.category, "home");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let response = send(&app, "PUT", &uri, Some(json!({ "description": null }))).await;
    let cleared: Product = json_body(response.into_body()).await;
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.price, 29.0);
}

#[tokio::test]
async fn test_update_product_invalid_fields_returns_400() {
    let app = app();
    let created = create(&app, "Desk Lamp", 39.5, "home").await;
    let uri = format!("/products/{}", created.id);

    for body in [
        json!({ "price": -1.0 }),
        json!({ "name": "" }),
        json!({ "category": "   " }),
    ] {
        let response = send(&app, "PUT", &uri, Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["code"], "VALIDATION_ERROR");
    }

    let response = send(&app, "GET", &uri, None).await;
    let unchanged: Product = json_body(response.into_body()).await;
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn test_delete_product_returns_204_then_404() {
    let app = app();
    let created = create(&app, "Desk Lamp", 39.5, "home").await;
    let uri = format!("/products/{}", created.id);

    let response = send(&app, "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let response = send(&app, "GET", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
