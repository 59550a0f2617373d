use std::{env, future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, DatabaseConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use service::customer::repo::seaorm::SeaOrmCustomerRepository;
use tower_http::cors::CorsLayer;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: Option<&AppConfig>) -> Result<SocketAddr, StartupError> {
    let (host, port) = match cfg {
        Some(cfg) => (cfg.server.host.clone(), cfg.server.port),
        None => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    format!("{}:{}", host, port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {host}:{port}: {e}")))
}

/// config.toml when present, otherwise `DATABASE_URL` with pool defaults
fn database_config(cfg: Option<&AppConfig>) -> Result<DatabaseConfig, StartupError> {
    let db = match cfg {
        Some(cfg) => cfg.database.clone(),
        None => DatabaseConfig::from_env(),
    };
    db.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(db)
}

/// Connect and bring the schema up to date
async fn connect_db(cfg: &DatabaseConfig) -> Result<DatabaseConnection, StartupError> {
    let db = models::db::connect_with_config(cfg)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(format!("migration failed: {e}")))?;
    Ok(db)
}

/// Router over the SeaORM repository
pub fn build_app(db: DatabaseConnection) -> Router {
    let state = AppState::new(Arc::new(SeaOrmCustomerRepository::new(db)));
    routes::build_router(state, build_cors())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(event = "shutdown_signal", signal = "ctrl_c", "shutting down"),
        _ = terminate => info!(event = "shutdown_signal", signal = "sigterm", "shutting down"),
    }
}

/// Serve `app` until `shutdown` resolves, letting in-flight requests finish
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(event = "stop", "customer api stopped");
    Ok(())
}

/// Public entry: build the app and run the HTTP server until a shutdown signal
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(error = %e, "config.toml not usable, falling back to environment");
            None
        }
    };

    let db_cfg = database_config(cfg.as_ref())?;
    let db = connect_db(&db_cfg).await?;
    let app = build_app(db);

    // Bind and serve
    let addr = load_bind_addr(cfg.as_ref())?;
    info!(%addr, "starting customer api");
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown_signal()).await
}
