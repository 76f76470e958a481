//! Query cache in front of a repository.
//!
//! List results are keyed by their filter, single rows by id. Concurrent
//! misses on one key share a single load; failed loads are not stored.
//!
//! Every key also carries the generation it was read under. Invalidation bumps
//! the generation first, so a load that was already running when a mutation
//! landed stores its result under a key no later reader asks for.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use models::{Filter, Resource};

use crate::errors::ServiceError;
use crate::metrics;

#[derive(Clone, Copy, Debug)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(30), max_capacity: 1_000 }
    }
}

impl From<&configs::CacheConfig> for CacheSettings {
    fn from(cfg: &configs::CacheConfig) -> Self {
        Self { ttl: Duration::from_secs(cfg.ttl_secs), max_capacity: cfg.max_capacity }
    }
}

pub struct QueryCache<M: Resource> {
    lists: Cache<(u64, Option<Filter>), Arc<Vec<M>>>,
    items: Cache<(u64, Uuid), Arc<Option<M>>>,
    list_generation: AtomicU64,
    item_generation: AtomicU64,
}

impl<M: Resource> QueryCache<M> {
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            lists: Cache::builder()
                .max_capacity(settings.max_capacity)
                .time_to_live(settings.ttl)
                .build(),
            items: Cache::builder()
                .max_capacity(settings.max_capacity)
                .time_to_live(settings.ttl)
                .build(),
            list_generation: AtomicU64::new(0),
            item_generation: AtomicU64::new(0),
        }
    }

    pub async fn list<F>(&self, filter: Option<Filter>, load: F) -> Result<Arc<Vec<M>>, ServiceError>
    where
        F: Future<Output = Result<Vec<M>, ServiceError>>,
    {
        let entry = self
            .lists
            .entry((self.list_generation.load(Ordering::SeqCst), filter))
            .or_try_insert_with(async { load.await.map(Arc::new) })
            .await
            .map_err(ServiceError::from_shared)?;
        metrics::record_lookup(M::TABLE, "list", !entry.is_fresh());
        Ok(entry.into_value())
    }

    pub async fn item<F>(&self, id: Uuid, load: F) -> Result<Arc<Option<M>>, ServiceError>
    where
        F: Future<Output = Result<Option<M>, ServiceError>>,
    {
        let entry = self
            .items
            .entry((self.item_generation.load(Ordering::SeqCst), id))
            .or_try_insert_with(async { load.await.map(Arc::new) })
            .await
            .map_err(ServiceError::from_shared)?;
        metrics::record_lookup(M::TABLE, "item", !entry.is_fresh());
        Ok(entry.into_value())
    }

    /// Drop every cached list of the table, including loads still in flight.
    pub fn invalidate_lists(&self) {
        let generation = self.list_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.lists.invalidate_all();
        debug!(table = M::TABLE, generation, "list keys invalidated");
    }

    /// Drop the cached row. In-flight item loads of the table are discarded too.
    pub async fn invalidate_item(&self, id: Uuid) {
        let stale = self.item_generation.fetch_add(1, Ordering::SeqCst);
        self.items.invalidate(&(stale, id)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use models::offering;

    use super::*;

    fn row(title: &str) -> offering::Model {
        let input = offering::CreateService { title: title.into(), description: "d".into(), ..Default::default() };
        offering::Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap()
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = QueryCache::<offering::Model>::new(CacheSettings::default());
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let got = cache
                .list(None, async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![row("a")])
                })
                .await
                .unwrap();
            assert_eq!(got.len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_returned_and_not_cached() {
        let cache = QueryCache::<offering::Model>::new(CacheSettings::default());
        let err = cache
            .list(None, async { Err(ServiceError::Db("connection refused".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));

        let ok = cache.list(None, async { Ok(vec![row("a")]) }).await.unwrap();
        assert_eq!(ok.len(), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_reload() {
        let cache = QueryCache::<offering::Model>::new(CacheSettings::default());
        cache.list(None, async { Ok(vec![]) }).await.unwrap();
        cache.invalidate_lists();
        let fresh = cache.list(None, async { Ok(vec![row("new")]) }).await.unwrap();
        assert_eq!(fresh.len(), 1);

        let id = Uuid::new_v4();
        assert!(cache.item(id, async { Ok(None) }).await.unwrap().is_none());
        cache.invalidate_item(id).await;
        let r = row("x");
        let loaded = cache.item(id, async { Ok(Some(r)) }).await.unwrap();
        assert!(loaded.is_some());
    }

    #[tokio::test]
    async fn load_started_before_invalidation_is_not_served_after_it() {
        let cache = Arc::new(QueryCache::<offering::Model>::new(CacheSettings::default()));
        let release = Arc::new(tokio::sync::Notify::new());
        let started = Arc::new(tokio::sync::Notify::new());

        let slow = {
            let (cache, release, started) = (cache.clone(), release.clone(), started.clone());
            tokio::spawn(async move {
                cache
                    .list(None, async move {
                        started.notify_one();
                        release.notified().await;
                        Ok(vec![])
                    })
                    .await
            })
        };
        started.notified().await;
        cache.invalidate_lists();
        release.notify_one();
        assert!(slow.await.unwrap().unwrap().is_empty());

        let fresh = cache.list(None, async { Ok(vec![row("new")]) }).await.unwrap();
        assert_eq!(fresh.len(), 1);

        let id = Uuid::new_v4();
        let held = {
            let (cache, release, started) = (cache.clone(), release.clone(), started.clone());
            tokio::spawn(async move {
                cache
                    .item(id, async move {
                        started.notify_one();
                        release.notified().await;
                        Ok(None)
                    })
                    .await
            })
        };
        started.notified().await;
        cache.invalidate_item(id).await;
        release.notify_one();
        assert!(held.await.unwrap().unwrap().is_none());
        assert!(cache.item(id, async { Ok(Some(row("x"))) }).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_load() {
        let cache = Arc::new(QueryCache::<offering::Model>::new(CacheSettings::default()));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .list(None, async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(vec![])
                    })
                    .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
