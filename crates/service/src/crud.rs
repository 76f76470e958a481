//! One CRUD service for every table, parameterized by the [`Resource`] it serves.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{Filter, Ordinal, Resource, Timestamp};

use crate::cache::{CacheSettings, QueryCache};
use crate::errors::ServiceError;
use crate::metrics;
use crate::pagination::{Page, Pagination};
use crate::repository::Repository;

fn now() -> Timestamp {
    Utc::now().into()
}

pub struct CrudService<M: Resource> {
    repo: Arc<dyn Repository<M>>,
    cache: QueryCache<M>,
}

impl<M: Resource> CrudService<M> {
    pub fn new(repo: Arc<dyn Repository<M>>, settings: CacheSettings) -> Self {
        Self { repo, cache: QueryCache::new(settings) }
    }

    pub fn table(&self) -> &'static str {
        M::TABLE
    }

    /// All rows, optionally narrowed by one equality filter, in `M::SORT` order.
    pub async fn list(&self, filter: Option<Filter>) -> Result<Arc<Vec<M>>, ServiceError> {
        let repo = self.repo.clone();
        let key = filter.clone();
        self.cache.list(key, async move { repo.list(filter).await }).await
    }

    pub async fn list_page(&self, filter: Option<Filter>, page: Pagination) -> Result<Page<M>, ServiceError> {
        let rows = self.list(filter).await?;
        Ok(page.apply(&rows))
    }

    /// Row by id. `None` means the lookup is disabled: no repository call is made.
    pub async fn get(&self, id: Option<Uuid>) -> Result<Option<M>, ServiceError> {
        let Some(id) = id else { return Ok(None) };
        let repo = self.repo.clone();
        let row = self.cache.item(id, async move { repo.get(id).await }).await?;
        Ok((*row).clone())
    }

    /// Like [`CrudService::get`] but a missing row is `NotFound`.
    pub async fn require(&self, id: Uuid) -> Result<M, ServiceError> {
        self.get(Some(id)).await?.ok_or_else(|| ServiceError::not_found(M::TABLE))
    }

    #[instrument(skip(self, input), fields(table = M::TABLE))]
    pub async fn create(&self, input: M::Create) -> Result<M, ServiceError> {
        let row = M::build(Uuid::new_v4(), now(), input)?;
        let saved = self.repo.insert(row).await?;
        self.cache.invalidate_lists();
        metrics::record_mutation(M::TABLE, "create");
        info!(id = %saved.id(), "created");
        Ok(saved)
    }

    #[instrument(skip(self, patch), fields(table = M::TABLE, id = %id))]
    pub async fn update(&self, id: Uuid, patch: M::Patch) -> Result<M, ServiceError> {
        let mut row = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(M::TABLE))?;
        row.apply(patch, now())?;
        let saved = self.repo.update(row).await?;
        self.cache.invalidate_lists();
        self.cache.invalidate_item(id).await;
        metrics::record_mutation(M::TABLE, "update");
        info!("updated");
        Ok(saved)
    }

    #[instrument(skip(self), fields(table = M::TABLE, id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found(M::TABLE));
        }
        self.cache.invalidate_lists();
        self.cache.invalidate_item(id).await;
        metrics::record_mutation(M::TABLE, "delete");
        info!("deleted");
        Ok(())
    }

    /// Insert prepared rows, keeping their ids, only when the table is empty.
    /// Returns how many rows were written.
    #[instrument(skip(self, rows), fields(table = M::TABLE, count = rows.len()))]
    pub async fn seed(&self, rows: Vec<M>) -> Result<usize, ServiceError> {
        if rows.is_empty() || !self.repo.list(None).await?.is_empty() {
            return Ok(0);
        }
        let count = rows.len();
        for row in rows {
            self.repo.insert(row).await?;
        }
        self.cache.invalidate_lists();
        metrics::record_mutation(M::TABLE, "seed");
        info!(count, "seeded");
        Ok(count)
    }
}

impl<M: Ordinal> CrudService<M> {
    /// Give the row at position `i` of `ids` ordinal `i`, as one batch.
    ///
    /// Unknown or repeated ids reject the whole request before anything is written.
    #[instrument(skip(self, ids), fields(table = M::TABLE, count = ids.len()))]
    pub async fn reorder(&self, ids: &[Uuid]) -> Result<Vec<M>, ServiceError> {
        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
            return Err(ServiceError::Validation(format!("id {dup} appears more than once")));
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut current: HashMap<Uuid, M> = self
            .repo
            .list(None)
            .await?
            .into_iter()
            .map(|row| (row.id(), row))
            .collect();
        let stamp = now();
        let mut batch = Vec::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            let mut row = current
                .remove(id)
                .ok_or_else(|| ServiceError::NotFound(format!("{} {id} not found", M::TABLE)))?;
            let ordinal = i32::try_from(position)
                .map_err(|_| ServiceError::Validation("too many rows to reorder".into()))?;
            row.set_ordinal(ordinal, stamp);
            batch.push(row);
        }

        self.repo.update_batch(batch.clone()).await?;
        self.cache.invalidate_lists();
        for id in ids {
            self.cache.invalidate_item(*id).await;
        }
        metrics::record_mutation(M::TABLE, "reorder");
        info!("reordered");
        Ok(batch)
    }
}
