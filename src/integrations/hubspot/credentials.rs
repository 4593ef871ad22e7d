use crate::cache::CacheManager;
use crate::error::AppError;
use crate::integrations::hubspot::flow::credentials_key;
use std::sync::Arc;

/// One-time retrieval of the credential record parked by the OAuth callback.
#[derive(Clone)]
pub struct CredentialStore {
    cache: Arc<CacheManager>,
}

impl CredentialStore {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Read and consume the stored token payload. The record is deleted on
    /// the first successful read, so a second call within the TTL window
    /// fails with NotFound even though the token is now held by the caller.
    pub async fn get_credentials(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> Result<serde_json::Value, AppError> {
        let key = credentials_key(org_id, user_id);

        let stored = self
            .cache
            .get(&key)
            .await?
            .ok_or_else(|| AppError::NotFound("No credentials found.".to_string()))?;

        let payload: serde_json::Value = serde_json::from_str(&stored)
            .map_err(|e| AppError::Internal(format!("stored credentials corrupt: {e}")))?;

        self.cache.delete(&key).await?;
        Ok(payload)
    }
}
