use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// "memory" or "redis"
    pub backend: String,
    pub redis_url: String,
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "hublink:".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, "memory");
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.key_prefix, "hublink:");
    }
}
