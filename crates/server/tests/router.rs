use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use models::customer::CustomerStatus;
use server::routes::build_router;
use server::AppState;
use service::customer::repository::mock::InMemoryCustomerRepository;

fn app() -> (InMemoryCustomerRepository, Router) {
    let repo = InMemoryCustomerRepository::new();
    let app = build_router(AppState::new(Arc::new(repo.clone())), CorsLayer::very_permissive());
    (repo, app)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn customer(code: &str, name: &str, email: &str) -> Value {
    json!({ "customerCode": code, "fullName": name, "email": email, "phone": "0900" })
}

#[tokio::test]
async fn health_ok() {
    let (_, app) = app();
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_get_and_duplicate() {
    let (_, app) = app();
    let (status, created) = call(&app, Method::POST, "/api/customers", Some(customer("C1", "Alice", "a@x.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["customerCode"], "C1");
    assert_eq!(created["status"], "ACTIVE");
    assert!(created["createdAt"].is_string());

    let id = created["id"].as_i64().unwrap();
    let (status, got) = call(&app, Method::GET, &format!("/api/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got, created);

    let (status, err) = call(&app, Method::POST, "/api/customers", Some(customer("C1", "Bob", "b@x.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["message"], "Customer code already exists: C1");
}

#[tokio::test]
async fn invalid_body_is_bad_request() {
    let (repo, app) = app();
    let (status, err) = call(&app, Method::POST, "/api/customers", Some(customer("", "Alice", "a@x.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Validation Error");
    let (status, _) = call(&app, Method::POST, "/api/customers", Some(customer("C1", "Alice", "not-an-email"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(repo.rows().is_empty());
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let (_, app) = app();
    let (status, err) = call(&app, Method::GET, "/api/customers/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Customer not found with id: 99");
    let (status, _) = call(&app, Method::DELETE, "/api/customers/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_patch_and_delete() {
    let (repo, app) = app();
    let (_, a) = call(&app, Method::POST, "/api/customers", Some(customer("C1", "Alice", "a@x.com"))).await;
    call(&app, Method::POST, "/api/customers", Some(customer("C2", "Bob", "b@x.com"))).await;
    let id = a["id"].as_i64().unwrap();
    let uri = format!("/api/customers/{id}");

    let (status, patched) = call(&app, Method::PATCH, &uri, Some(json!({ "address": "Main St" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["address"], "Main St");
    assert_eq!(patched["phone"], "0900");

    let (status, _) = call(&app, Method::PATCH, &uri, Some(json!({ "fullName": "X", "email": "b@x.com" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(repo.get(id).unwrap().full_name, "Alice");

    let body = json!({ "fullName": "Alice Cooper", "email": "alice@x.com" });
    let (status, updated) = call(&app, Method::PUT, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fullName"], "Alice Cooper");
    assert_eq!(updated["customerCode"], "C1");
    assert_eq!(updated["phone"], Value::Null);

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert!(repo.get(id).is_none());
}

#[tokio::test]
async fn list_uses_query_defaults_and_sorting() {
    let (_, app) = app();
    for (code, name) in [("C1", "Carol"), ("C2", "Alice"), ("C3", "Bob")] {
        call(&app, Method::POST, "/api/customers", Some(customer(code, name, &format!("{code}@x.com")))).await;
    }
    let (status, page) = call(&app, Method::GET, "/api/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalElements"], 3);
    assert_eq!(page["size"], 10);
    assert_eq!(page["content"][0]["customerCode"], "C1");

    let (_, page) = call(&app, Method::GET, "/api/customers?page=0&size=2&sortBy=fullName&sortDir=desc", None).await;
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["content"][0]["fullName"], "Carol");
    assert_eq!(page["content"][1]["fullName"], "Bob");

    let (status, _) = call(&app, Method::GET, "/api/customers?sortBy=shoeSize", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn status_and_search_endpoints() {
    let (repo, app) = app();
    let (_, a) = call(&app, Method::POST, "/api/customers", Some(customer("C1", "Alice Smith", "alice@x.com"))).await;
    let (_, b) = call(&app, Method::POST, "/api/customers", Some(customer("C2", "Bob Smith", "bob@y.com"))).await;
    let b_id = b["id"].as_i64().unwrap();
    repo.set_status(b_id, CustomerStatus::Inactive);

    let (status, active) = call(&app, Method::GET, "/api/customers/status/active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["id"], a["id"]);

    let (status, err) = call(&app, Method::GET, "/api/customers/status/bogus", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Invalid status: bogus");

    let (_, found) = call(&app, Method::GET, "/api/customers/search?keyword=SMITH", None).await;
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (_, found) = call(&app, Method::GET, "/api/customers/advanced-search?name=smith&status=bogus", None).await;
    assert_eq!(found.as_array().unwrap().len(), 2);
    let (_, found) = call(&app, Method::GET, "/api/customers/advanced-search?name=smith&status=INACTIVE", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], b_id);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_, app) = app();
    let (status, doc) = call(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/customers/{id}"].is_object());
}
