//! HTTP API tests
//!
//! Drives the full router (auth middleware, form extraction, error rendering)
//! against the in-memory store.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use stockroom_backend::create_app;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

async fn app() -> Router {
    create_app(common::setup().await.state())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn form(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, FORM);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={}&password={}", username, password);
    let (status, json) = send(app, form("POST", "/api/v1/auth/login", None, &body)).await;
    assert_eq!(status, StatusCode::OK, "login failed: {json}");
    json["access_token"].as_str().unwrap().to_string()
}

// ============================================================================
// Public Endpoints
// ============================================================================

#[tokio::test]
async fn test_health_reports_store() {
    let app = app().await;
    let request = Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap();

    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let app = app().await;
    let (status, json) = send(
        &app,
        form("POST", "/api/v1/auth/login", None, "username=admin&password=admin123"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["user"]["username"], "admin");
    assert_eq!(json["user"]["role"], "admin");
}

#[tokio::test]
async fn test_bad_login_is_unauthorized() {
    let app = app().await;
    let (status, json) = send(
        &app,
        form("POST", "/api/v1/auth/login", None, "username=admin&password=nope"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app().await;
    let request = Request::builder().uri("/api/v1/inventory").body(Body::empty()).unwrap();

    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, get("/api/v1/inventory", "garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Stock Flow
// ============================================================================

#[tokio::test]
async fn test_item_movement_inventory_flow() {
    let app = app().await;
    let token = login(&app, "admin", "admin123").await;

    let (status, item) = send(
        &app,
        form("POST", "/api/v1/items", Some(&token), "name=Beans&par=10"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["unit"], "個");
    let item_id = item["id"].as_str().unwrap().to_string();

    for (kind, qty) in [("in", "15"), ("out", "3"), ("waste", "2")] {
        let body = format!("item_id={}&kind={}&qty={}", item_id, kind, qty);
        let (status, _) = send(&app, form("POST", "/api/v1/movements", Some(&token), &body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, rows) = send(&app, get("/api/v1/inventory", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows[0]["id"], item_id.as_str());
    assert_eq!(rows[0]["current_quantity"], 10.0);
    assert_eq!(rows[0]["suggested_reorder"], 0);

    let uri = format!("/api/v1/items/{}/movements", item_id);
    let (status, history) = send(&app, get(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 3);
    assert_eq!(history[0]["kind"], "waste");
}

#[tokio::test]
async fn test_bogus_kind_is_bad_request() {
    let app = app().await;
    let token = login(&app, "admin", "admin123").await;
    let (_, item) = send(&app, form("POST", "/api/v1/items", Some(&token), "name=Cups")).await;

    let body = format!("item_id={}&kind=bogus&qty=1", item["id"].as_str().unwrap());
    let (status, json) = send(&app, form("POST", "/api/v1/movements", Some(&token), &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "kind");

    let uri = format!("/api/v1/items/{}/movements", item["id"].as_str().unwrap());
    let (_, history) = send(&app, get(&uri, &token)).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_unknown_item_is_not_found() {
    let app = app().await;
    let token = login(&app, "admin", "admin123").await;

    let uri = format!("/api/v1/items/{}", uuid::Uuid::new_v4());
    let (status, json) = send(&app, form("PUT", &uri, Some(&token), "name=Ghost")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");

    let (_, items) = send(&app, get("/api/v1/items", &token)).await;
    assert!(items.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_id_is_json_not_found() {
    let app = app().await;
    let token = login(&app, "admin", "admin123").await;

    for uri in ["/api/v1/items/42", "/api/v1/suppliers/nope", "/api/v1/items/42/movements"] {
        let (status, json) = send(&app, get(uri, &token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json["error"]["code"], "NOT_FOUND", "{uri}");
    }
}

#[tokio::test]
async fn test_unreadable_form_is_json_validation_error() {
    let app = app().await;
    let token = login(&app, "admin", "admin123").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/items")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Beans"}"#))
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "form");

    let (_, items) = send(&app, get("/api/v1/items", &token)).await;
    assert!(items.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_quantity_keeps_inventory_readable() {
    let app = app().await;
    let token = login(&app, "admin", "admin123").await;
    let (_, item) = send(&app, form("POST", "/api/v1/items", Some(&token), "name=Beans&par=5")).await;
    let item_id = item["id"].as_str().unwrap();

    let body = format!("item_id={}&kind=in&qty=1e308", item_id);
    let (status, json) = send(&app, form("POST", "/api/v1/movements", Some(&token), &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["field"], "qty");

    let (status, rows) = send(&app, get("/api/v1/inventory", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows[0]["current_quantity"], 0.0);
    assert_eq!(rows[0]["suggested_reorder"], 5);
}

// ============================================================================
// Permissions
// ============================================================================

#[tokio::test]
async fn test_staff_permissions() {
    let app = app().await;
    let admin = login(&app, "admin", "admin123").await;

    let (status, user) = send(
        &app,
        form(
            "POST",
            "/api/v1/users",
            Some(&admin),
            "username=barista&password=staff-password&role=staff",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "staff");

    let staff = login(&app, "barista", "staff-password").await;

    let (status, supplier) = send(
        &app,
        form("POST", "/api/v1/suppliers", Some(&staff), "name=Acme+Paper"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(supplier["name"], "Acme Paper");

    let uri = format!("/api/v1/suppliers/{}", supplier["id"].as_str().unwrap());
    let delete = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", staff))
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, delete).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "INSUFFICIENT_PERMISSIONS");

    let (status, _) = send(
        &app,
        form(
            "POST",
            "/api/v1/users",
            Some(&staff),
            "username=intruder&password=long-enough",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_change_own_password() {
    let app = app().await;
    let token = login(&app, "admin", "admin123").await;

    let (status, _) = send(
        &app,
        form(
            "PUT",
            "/api/v1/users/me/password",
            Some(&token),
            "current_password=admin123&new_password=better-secret",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    login(&app, "admin", "better-secret").await;
}
