use super::CacheResult;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache entry with expiration.
#[derive(Clone, Debug)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(value: &str, ttl: Duration) -> Self {
        // TTLs here are bounded (minutes), far below the chrono range limit
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            value: value.to_string(),
            expires_at: Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// In-memory store with expiry enforced on read.
#[derive(Clone, Default)]
pub struct MemoryStore {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut store = self.store.write().await;
        store.insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let store = self.store.read().await;
        match store.get(key) {
            Some(entry) if entry.is_expired() => {
                drop(store);
                // Clean up the expired entry
                let mut store = self.store.write().await;
                store.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();

        store
            .set("key1", "value1", Duration::from_secs(600))
            .await
            .unwrap();
        assert_eq!(
            store.get("key1").await.unwrap(),
            Some("value1".to_string())
        );
        assert_eq!(store.get("nonexistent").await.unwrap(), None);

        store.delete("key1").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_expiration() {
        let store = MemoryStore::new();

        store
            .set("key1", "value1", Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(
            store.get("key1").await.unwrap(),
            Some("value1".to_string())
        );

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Expired records behave identically to deleted ones
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_overwrite() {
        let store = MemoryStore::new();

        store
            .set("key1", "first", Duration::from_secs(600))
            .await
            .unwrap();
        store
            .set("key1", "second", Duration::from_secs(600))
            .await
            .unwrap();

        // Last writer wins
        assert_eq!(
            store.get("key1").await.unwrap(),
            Some("second".to_string())
        );
    }
}
