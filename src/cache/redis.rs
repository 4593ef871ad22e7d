use super::{CacheError, CacheResult};
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Redis store with a single multiplexed connection and reconnection logic.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    connection: Arc<Mutex<Option<redis::aio::MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisStore {
    /// Connect and verify the server responds before accepting traffic.
    pub async fn connect(redis_url: &str, key_prefix: String) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Redis client error: {e}")))?;

        let mut conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis connection failed: {e}")))?;

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| CacheError::Connection(format!("Redis ping failed: {e}")))?;

        Ok(Self {
            client,
            connection: Arc::new(Mutex::new(Some(conn))),
            key_prefix,
        })
    }

    /// Get a working connection, reusing the existing one when still alive.
    async fn get_connection(&self) -> CacheResult<redis::aio::MultiplexedConnection> {
        let mut conn_guard = self.connection.lock().await;

        if let Some(conn) = conn_guard.take() {
            if self.test_connection(&conn).await.is_ok() {
                return Ok(conn);
            }
        }

        self.client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| CacheError::Connection(format!("Connection failed: {e}")))
    }

    async fn test_connection(
        &self,
        conn: &redis::aio::MultiplexedConnection,
    ) -> Result<(), redis::RedisError> {
        let mut conn = conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn return_connection(&self, conn: redis::aio::MultiplexedConnection) {
        *self.connection.lock().await = Some(conn);
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let key = self.prefixed_key(key);
        let mut conn = self.get_connection().await?;

        conn.set_ex::<_, _, ()>(&key, value, ttl.as_secs())
            .await
            .map_err(|e| CacheError::Cache(e.to_string()))?;

        self.return_connection(conn).await;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let key = self.prefixed_key(key);
        let mut conn = self.get_connection().await?;

        let result: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| CacheError::Cache(e.to_string()))?;

        self.return_connection(conn).await;
        Ok(result)
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let key = self.prefixed_key(key);
        let mut conn = self.get_connection().await?;

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| CacheError::Cache(e.to_string()))?;

        self.return_connection(conn).await;
        Ok(())
    }

    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| CacheError::Cache(format!("Ping failed: {e}")))?;

        self.return_connection(conn).await;
        Ok(())
    }
}
