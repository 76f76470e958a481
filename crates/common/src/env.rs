//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure expected directories exist; warn on missing optional ones.
///
/// The front-end bundle and the fixtures directory are optional; the data
/// directory (preferences store) is created when missing.
pub async fn ensure_env(frontend_dir: &str, fixtures_dir: Option<&str>, data_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; static assets may 404");
    }
    if let Some(dir) = fixtures_dir {
        if tokio::fs::metadata(dir).await.is_err() {
            warn!(fixtures_dir = %dir, "fixtures directory not found; landing content will be empty");
        }
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}
