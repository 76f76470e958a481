//! First-run content: copy the bundled fixtures into empty tables.
//!
//! Tables that already hold rows are left alone, so running this on every
//! start is safe.

use std::path::Path;

use serde_json::json;
use tracing::info;

use models::{company_history, offering, project, review, site_statistic, team_member, Resource};

use crate::catalog::Catalog;
use crate::crud::CrudService;
use crate::errors::ServiceError;
use crate::site::fixtures;

async fn seed_table<M: Resource>(
    svc: &CrudService<M>,
    dir: &Path,
    file: &str,
    defaults: &[(&str, serde_json::Value)],
) -> Result<usize, ServiceError> {
    let rows = fixtures::load::<M>(dir, file, defaults).await?;
    svc.seed(rows).await
}

/// Returns the number of rows inserted across all tables.
pub async fn seed_from_fixtures(catalog: &Catalog, dir: &Path) -> Result<usize, ServiceError> {
    let mut total = 0;
    total += seed_table(&catalog.services, dir, "services.json", &[]).await?;
    total += seed_table(&catalog.team, dir, "team.json", &[]).await?;
    total += seed_table(&catalog.projects, dir, "projects.json", &[]).await?;
    total += seed_table(&catalog.reviews, dir, "reviews.json", &[("approved", json!(true))]).await?;
    total += seed_table(&catalog.statistics, dir, "statistics.json", &[]).await?;
    total += seed_table(&catalog.history, dir, "history.json", &[]).await?;
    info!(rows = total, dir = %dir.display(), "fixtures seeded");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheSettings;
    use models::offering::CreateService;

    #[tokio::test]
    async fn seeds_empty_tables_once() {
        let dir = std::env::temp_dir().join(format!("seed_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("services.json"),
            r#"[{"title": "Web", "description": "Sites"}, {"title": "Apps", "description": "Mobile"}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(dir.join("reviews.json"), r#"[{"client_name": "Ali", "content": "Great", "rating": 5}]"#)
            .await
            .unwrap();

        let catalog = Catalog::memory(CacheSettings::default());
        assert_eq!(seed_from_fixtures(&catalog, &dir).await.unwrap(), 3);
        assert_eq!(seed_from_fixtures(&catalog, &dir).await.unwrap(), 0);

        let reviews = catalog.reviews.list(None).await.unwrap();
        assert!(reviews[0].approved);
        let services = catalog.services.list(None).await.unwrap();
        assert_eq!(services[0].title, "Web");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn populated_tables_are_not_touched() {
        let dir = std::env::temp_dir().join(format!("seed_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("services.json"), r#"[{"title": "Web", "description": "Sites"}]"#)
            .await
            .unwrap();

        let catalog = Catalog::memory(CacheSettings::default());
        catalog
            .services
            .create(CreateService { title: "Existing".into(), description: "Kept".into(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(seed_from_fixtures(&catalog, &dir).await.unwrap(), 0);
        assert_eq!(catalog.services.list(None).await.unwrap().len(), 1);
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn invalid_fixture_rows_fail_with_validation() {
        let dir = std::env::temp_dir().join(format!("seed_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("reviews.json"), r#"[{"client_name": "Ali", "content": "Great", "rating": 0}]"#)
            .await
            .unwrap();

        let catalog = Catalog::memory(CacheSettings::default());
        let err = seed_from_fixtures(&catalog, &dir).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.starts_with("reviews.json: entry 0")), "{err:?}");
        assert!(catalog.reviews.list(None).await.unwrap().is_empty());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
