use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerAuthConfig, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// TOML config when `CONFIG_PATH` (or `config.toml`) exists, otherwise the
/// environment alone.
fn load_config() -> Result<AppConfig, StartupError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let loaded = if std::path::Path::new(&path).exists() {
        AppConfig::load_and_validate()
    } else {
        warn!(%path, "config file not found, using environment");
        AppConfig::from_env()
    };
    loaded.map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address {}:{}: {e}", server.host, server.port)))
}

/// Public entry: connect the store, build the app and run the HTTP server
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    let cfg = load_config()?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        models::db::migrate(&db).await?;
    }

    let state = ServerState::from_db(db, ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() });
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting catalog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
