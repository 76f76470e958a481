use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging;
use configs::{AppConfig, ContentSource};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::cache::CacheSettings;
use service::storage::{JsonMapStore, KeyValueStore};
use service::Catalog;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_or_default().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Postgres when a URL is configured, otherwise process-local storage.
async fn open_catalog(cfg: &AppConfig) -> Result<Catalog, StartupError> {
    let settings = CacheSettings::from(&cfg.cache);
    if cfg.database.is_memory() {
        warn!("no database configured; content and accounts live in memory and are lost on restart");
        return Ok(Catalog::memory(settings));
    }

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::test_connection(&db)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Database(format!("migrations: {e}")))?;
        info!("migrations applied");
    }
    Ok(Catalog::seaorm(&db, settings))
}

/// Everything `run` needs before binding: storage, services, seed data, bootstrap admin.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let data_dir = Path::new(&cfg.preferences.store_path)
        .parent()
        .and_then(|p| p.to_str())
        .filter(|p| !p.is_empty())
        .unwrap_or(".");
    let fixtures_dir = matches!(cfg.content.source, ContentSource::Fixtures).then_some(cfg.content.fixtures_dir.as_str());
    common::env::ensure_env(&cfg.server.frontend_dir, fixtures_dir, data_dir).await?;

    let catalog = open_catalog(cfg).await?;
    if cfg.content.source == ContentSource::Database {
        service::seed::seed_from_fixtures(&catalog, Path::new(&cfg.content.fixtures_dir)).await?;
    }

    let store: Arc<dyn KeyValueStore> = JsonMapStore::<String, String>::open_with_capacity(
        &cfg.preferences.store_path,
        Some(cfg.preferences.max_entries),
    )
    .await?;
    let state = AppState::from_config(cfg, catalog, store).await?;

    if let (Some(email), Some(password)) = (&cfg.auth.bootstrap_admin_email, &cfg.auth.bootstrap_admin_password) {
        if state.auth.ensure_bootstrap_admin(email, password).await? {
            info!(%email, "bootstrap admin created");
        }
    }
    Ok(state)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = load_config()?;
    init_logging(&cfg.server.log_format);

    let state = build_state(&cfg).await?;
    info!(source = ?state.site.source(), "site content source");
    let app: Router = routes::build_router(state, &cfg.server.frontend_dir, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
