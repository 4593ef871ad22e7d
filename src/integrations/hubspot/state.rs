use crate::cache::{CacheManager, CacheResult};
use crate::error::AppError;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// State and credential records live at most this long (10 minutes).
pub const RECORD_TTL: Duration = Duration::from_secs(600);

/// Anti-forgery state bundled into the authorization redirect and echoed
/// back by the provider on callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthState {
    /// Random token proving the callback corresponds to a request we issued.
    pub state: String,
    pub user_id: String,
    pub org_id: String,
}

impl AuthState {
    pub fn new(user_id: &str, org_id: &str) -> Self {
        Self {
            state: random_token(),
            user_id: user_id.to_string(),
            org_id: org_id.to_string(),
        }
    }
}

/// 32 bytes of entropy, URL-safe encoded without padding.
fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn state_key(org_id: &str, user_id: &str) -> String {
    format!("hubspot_state:{org_id}:{user_id}")
}

/// Mints and validates the per-attempt authorization state.
#[derive(Clone)]
pub struct StateManager {
    cache: Arc<CacheManager>,
}

impl StateManager {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Mint a state record for one authorization attempt and store it under
    /// the (org, user) key. Returns the serialized form for embedding in the
    /// redirect URL. A second attempt for the same pair overwrites the first;
    /// only the most recently issued state validates.
    pub async fn create(&self, user_id: &str, org_id: &str) -> Result<String, AppError> {
        let state = AuthState::new(user_id, org_id);
        let encoded =
            serde_json::to_string(&state).map_err(|e| AppError::Internal(e.to_string()))?;
        self.cache
            .set(&state_key(org_id, user_id), &encoded, RECORD_TTL)
            .await?;
        Ok(encoded)
    }

    /// Compare the presented token against the stored record. Does not delete
    /// the record; the caller discards it alongside the token exchange.
    pub async fn validate(
        &self,
        org_id: &str,
        user_id: &str,
        presented_token: &str,
    ) -> Result<AuthState, AppError> {
        let saved = self
            .cache
            .get(&state_key(org_id, user_id))
            .await?
            .ok_or(AppError::StateMismatch)?;

        let saved: AuthState =
            serde_json::from_str(&saved).map_err(|_| AppError::StateMismatch)?;

        if saved.state != presented_token {
            return Err(AppError::StateMismatch);
        }
        Ok(saved)
    }

    /// Consume the state record. Once deleted it never validates again.
    pub async fn discard(&self, org_id: &str, user_id: &str) -> CacheResult<()> {
        self.cache.delete(&state_key(org_id, user_id)).await
    }
}
