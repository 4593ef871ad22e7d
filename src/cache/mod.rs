//! Ephemeral key-value store for transient OAuth state and credentials.
//!
//! Values are opaque serialized payloads keyed by plain strings; every record
//! carries a TTL so orphaned secrets expire on their own.

pub mod config;
pub mod memory;
pub mod redis;

use crate::cache::config::CacheConfig;
use crate::health::HealthCheckResult;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Connection error: {0}")]
    Connection(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Clone)]
enum Backend {
    Memory(memory::MemoryStore),
    Redis(redis::RedisStore),
}

/// Key-value store over a memory or Redis backend.
#[derive(Clone)]
pub struct CacheManager {
    backend: Backend,
}

impl CacheManager {
    /// Memory-backed store for tests and single-instance deployments.
    pub fn new_memory() -> Self {
        Self {
            backend: Backend::Memory(memory::MemoryStore::new()),
        }
    }

    pub async fn new_from_config(config: &CacheConfig) -> CacheResult<Self> {
        let backend = match config.backend.as_str() {
            "redis" => {
                let store =
                    redis::RedisStore::connect(&config.redis_url, config.key_prefix.clone())
                        .await?;
                Backend::Redis(store)
            }
            "memory" => Backend::Memory(memory::MemoryStore::new()),
            other => {
                return Err(CacheError::Cache(format!(
                    "Unknown cache backend: {other}"
                )));
            }
        };

        Ok(Self { backend })
    }

    /// Store a value under `key`, expiring after `ttl`.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        match &self.backend {
            Backend::Memory(store) => store.set(key, value, ttl).await,
            Backend::Redis(store) => store.set(key, value, ttl).await,
        }
    }

    /// Fetch a value. Expired records behave identically to deleted ones.
    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match &self.backend {
            Backend::Memory(store) => store.get(key).await,
            Backend::Redis(store) => store.get(key).await,
        }
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        match &self.backend {
            Backend::Memory(store) => store.delete(key).await,
            Backend::Redis(store) => store.delete(key).await,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis(_) => "redis",
        }
    }

    pub async fn health_check(&self) -> HealthCheckResult {
        match &self.backend {
            Backend::Memory(_) => HealthCheckResult::healthy_with_details(serde_json::json!({
                "backend": "memory",
            })),
            Backend::Redis(store) => match store.ping().await {
                Ok(()) => HealthCheckResult::healthy_with_details(serde_json::json!({
                    "backend": "redis",
                })),
                Err(err) => HealthCheckResult::unhealthy_with_details(
                    "Redis health check failed".to_string(),
                    serde_json::json!({
                        "backend": "redis",
                        "error": err.to_string(),
                    }),
                ),
            },
        }
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manager_set_get_delete() {
        let cache = CacheManager::new_memory();

        cache
            .set("k1", "v1", Duration::from_secs(600))
            .await
            .unwrap();
        assert_eq!(cache.get("k1").await.unwrap(), Some("v1".to_string()));

        cache.delete("k1").await.unwrap();
        assert_eq!(cache.get("k1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_deleted_key_stays_gone() {
        let cache = CacheManager::new_memory();

        cache
            .set("once", "payload", Duration::from_secs(600))
            .await
            .unwrap();
        cache.delete("once").await.unwrap();

        // A re-fetch after delete must be "not found", never a stale read.
        assert_eq!(cache.get("once").await.unwrap(), None);
        assert_eq!(cache.get("once").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_backend_rejected() {
        let config = CacheConfig {
            backend: "memcached".to_string(),
            ..Default::default()
        };
        assert!(CacheManager::new_from_config(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_backend_from_config() {
        let config = CacheConfig::default();
        let cache = CacheManager::new_from_config(&config).await.unwrap();
        assert_eq!(cache.backend_name(), "memory");
    }
}
