use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Keeps a `HashMap<K, V>` in memory and rewrites the whole file on every
/// change. A corrupt file is logged and replaced by an empty map. With a
/// capacity, the least recently written keys are dropped once it is exceeded.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<Entries<K, V>>>,
    file_path: PathBuf,
    capacity: Option<usize>,
}

#[derive(Clone)]
struct Entries<K, V> {
    map: HashMap<K, V>,
    /// Write clock per key; smallest is evicted first.
    written: HashMap<K, u64>,
    clock: u64,
}

impl<K: Eq + Hash + Clone, V> Entries<K, V> {
    fn new(map: HashMap<K, V>) -> Self {
        let written: HashMap<K, u64> = map.keys().cloned().zip(0u64..).collect();
        let clock = written.len() as u64;
        Self { map, written, clock }
    }

    fn insert(&mut self, key: K, value: V) {
        self.clock += 1;
        self.written.insert(key.clone(), self.clock);
        self.map.insert(key, value);
    }

    /// Drop oldest keys until at most `capacity` remain. Returns how many went.
    fn evict_to(&mut self, capacity: usize) -> usize {
        let excess = self.map.len().saturating_sub(capacity);
        if excess == 0 {
            return 0;
        }
        let mut by_age: Vec<(u64, K)> = self.written.iter().map(|(k, t)| (*t, k.clone())).collect();
        by_age.sort_unstable_by_key(|(t, _)| *t);
        for (_, key) in by_age.into_iter().take(excess) {
            self.map.remove(&key);
            self.written.remove(&key);
        }
        excess
    }
}

fn io_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Db(format!("preference store: {e}"))
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone + PartialEq + Send + Sync,
{
    /// Open the store at `path`, creating the file with an empty map if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        Self::open_with_capacity(path, None).await
    }

    /// Like [`JsonMapStore::open`], keeping at most `capacity` keys.
    pub async fn open_with_capacity<P: Into<PathBuf>>(
        path: P,
        capacity: Option<usize>,
    ) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "unreadable store file, starting empty");
                HashMap::new()
            }),
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(io_err)?)
                    .await
                    .map_err(io_err)?;
                empty
            }
        };

        let mut entries = Entries::new(map);
        let store = Self { inner: Arc::new(RwLock::new(entries.clone())), file_path, capacity };
        if let Some(cap) = capacity {
            if entries.evict_to(cap) > 0 {
                store.save(&entries.map).await?;
                *store.inner.write().await = entries;
            }
        }
        Ok(Arc::new(store))
    }

    async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(map).map_err(io_err)?;
        fs::write(&self.file_path, data).await.map_err(io_err)
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.inner.read().await;
        entries.map.get(key).cloned()
    }

    /// Insert or update a value by key and persist.
    ///
    /// Memory only changes once the file is written.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        // The write guard is held across the save so concurrent writers persist in order.
        let mut entries = self.inner.write().await;
        let mut next = entries.clone();
        next.insert(key, value);
        let evicted = self.capacity.map_or(0, |cap| next.evict_to(cap));
        self.save(&next.map).await?;
        if evicted > 0 {
            debug!(evicted, path = %self.file_path.display(), "oldest keys evicted");
        }
        *entries = next;
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::open(&tmp).await?;
        assert_eq!(store.len().await, 0);

        store.insert("a".into(), "1".into()).await?;
        store.insert("b".into(), "2".into()).await?;
        store.insert("a".into(), "10".into()).await?;
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("10"));

        let reloaded = JsonMapStore::<String, String>::open(&tmp).await?;
        assert_eq!(reloaded.len().await, 2);
        assert_eq!(reloaded.get(&"a".into()).await.as_deref(), Some("10"));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"{not json").await?;
        let store = JsonMapStore::<String, String>::open(&tmp).await?;
        assert_eq!(store.len().await, 0);
        store.insert("k".into(), "v".into()).await?;
        assert_eq!(JsonMapStore::<String, String>::open(&tmp).await?.len().await, 1);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn capacity_drops_least_recently_written_keys() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::open_with_capacity(&tmp, Some(3)).await?;
        for i in 0..3 {
            store.insert(format!("k{i}"), "v".into()).await?;
        }
        store.insert("k0".into(), "again".into()).await?;
        for i in 3..10 {
            store.insert(format!("k{i}"), "v".into()).await?;
            assert!(store.len().await <= 3);
        }
        assert_eq!(store.get(&"k9".into()).await.as_deref(), Some("v"));
        assert_eq!(store.get(&"k1".into()).await, None);

        let on_disk: HashMap<String, String> = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(on_disk.len(), 3);

        let reopened = JsonMapStore::<String, String>::open_with_capacity(&tmp, Some(2)).await?;
        assert_eq!(reopened.len().await, 2);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_unchanged() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_map_store_{}", uuid::Uuid::new_v4()));
        let path = dir.join("prefs.json");
        let store = JsonMapStore::<String, String>::open(&path).await?;
        store.insert("a".into(), "1".into()).await?;

        tokio::fs::remove_dir_all(&dir).await?;
        assert!(store.insert("b".into(), "2".into()).await.is_err());
        assert!(store.insert("a".into(), "9".into()).await.is_err());
        assert_eq!(store.get(&"b".into()).await, None);
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));
        assert_eq!(store.len().await, 1);
        Ok(())
    }
}
