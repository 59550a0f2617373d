use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::build_router;
use server::AppState;
use service::customer::repository::mock::InMemoryCustomerRepository;

struct TestApp {
    base_url: String,
}

async fn serve(app: Router) -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

async fn start_in_memory() -> anyhow::Result<TestApp> {
    let state = AppState::new(Arc::new(InMemoryCustomerRepository::new()));
    serve(build_router(state, CorsLayer::very_permissive())).await
}

/// Postgres-backed server, or `None` when the run has no database
async fn start_with_db() -> anyhow::Result<Option<TestApp>> {
    let _ = dotenvy::dotenv();
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let db = models::db::connect().await?;
    <migration::Migrator as migration::MigratorTrait>::up(&db, None).await?;
    Ok(Some(serve(server::startup::build_app(db)).await?))
}

async fn customer_lifecycle(app: &TestApp) -> anyhow::Result<()> {
    let c = reqwest::Client::new();
    let tag = Uuid::new_v4().simple().to_string();
    let code = format!("E2E{}", &tag[..12]);
    let email = format!("e2e_{tag}@example.com");

    let res = c.post(format!("{}/api/customers", app.base_url))
        .json(&json!({ "customerCode": code, "fullName": "End To End", "email": email }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let id = created["id"].as_i64().unwrap_or_default();
    assert_eq!(created["status"], "ACTIVE");

    let res = c.post(format!("{}/api/customers", app.base_url))
        .json(&json!({ "customerCode": format!("{code}X"), "fullName": "Other", "email": email }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = c.patch(format!("{}/api/customers/{id}", app.base_url))
        .json(&json!({ "phone": "0912" }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["phone"], "0912");

    let res = c.get(format!("{}/api/customers/search", app.base_url))
        .query(&[("keyword", code.to_lowercase())])
        .send().await?;
    let found = res.json::<Value>().await?;
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let res = c.delete(format!("{}/api/customers/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.get(format!("{}/api/customers/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_in_memory().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_customer_lifecycle_in_memory() -> anyhow::Result<()> {
    let app = start_in_memory().await?;
    customer_lifecycle(&app).await
}

#[tokio::test]
async fn e2e_customer_lifecycle_postgres() -> anyhow::Result<()> {
    let Some(app) = start_with_db().await? else { return Ok(()) };
    customer_lifecycle(&app).await
}

#[tokio::test]
async fn e2e_graceful_shutdown_stops_server() -> anyhow::Result<()> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let app = build_router(AppState::new(Arc::new(InMemoryCustomerRepository::new())), CorsLayer::very_permissive());

    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(server::startup::serve(listener, app, async move {
        let _ = stopped.await;
    }));

    let res = reqwest::get(format!("{base_url}/health")).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let _ = stop.send(());
    server.await??;
    assert!(reqwest::get(format!("{base_url}/health")).await.is_err());
    Ok(())
}
