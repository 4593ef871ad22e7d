use crate::cache::CacheManager;
use crate::config::HubSpotConfig;
use crate::error::AppError;
use crate::integrations::hubspot::state::{AuthState, RECORD_TTL, StateManager};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Query parameters the provider sends to the callback endpoint.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub fn credentials_key(org_id: &str, user_id: &str) -> String {
    format!("hubspot_credentials:{org_id}:{user_id}")
}

/// Drives the authorization-code flow: builds the redirect URL, handles the
/// provider callback, exchanges the code for a token, and parks the token in
/// the ephemeral store for one-time pickup.
pub struct HubSpotOAuth {
    config: HubSpotConfig,
    cache: Arc<CacheManager>,
    state: StateManager,
    http_client: reqwest::Client,
}

impl HubSpotOAuth {
    pub fn new(config: HubSpotConfig, cache: Arc<CacheManager>) -> Result<Self, AppError> {
        // Following redirects opens the client up to SSRF vulnerabilities.
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::Internal(format!("reqwest build error: {e}")))?;

        Ok(Self {
            state: StateManager::new(cache.clone()),
            config,
            cache,
            http_client,
        })
    }

    /// Mint state for this attempt and return the full authorization URL the
    /// caller should redirect the user to.
    pub async fn begin_authorization(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> Result<String, AppError> {
        let encoded_state = self.state.create(user_id, org_id).await?;

        let mut url = Url::parse(&self.config.authorization_url)
            .map_err(|e| AppError::Internal(format!("bad authorization URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope)
            .append_pair("state", &encoded_state);

        tracing::debug!(%org_id, %user_id, "issued authorization redirect");
        Ok(url.to_string())
    }

    /// Handle the provider callback: validate state, exchange the code, and
    /// store the credential record for one-time retrieval.
    pub async fn handle_callback(&self, params: CallbackParams) -> Result<(), AppError> {
        if let Some(error) = params.error {
            return Err(AppError::UpstreamAuth(error));
        }

        let code = params
            .code
            .ok_or_else(|| AppError::MalformedCallback("missing code parameter".to_string()))?;
        let raw_state = params
            .state
            .ok_or_else(|| AppError::MalformedCallback("missing state parameter".to_string()))?;

        let presented: AuthState = serde_json::from_str(&raw_state)
            .map_err(|e| AppError::MalformedCallback(format!("unparseable state: {e}")))?;

        self.state
            .validate(&presented.org_id, &presented.user_id, &presented.state)
            .await?;

        // The exchange and the state delete run together as a latency
        // optimization. The delete's outcome is ignored, and a failed
        // exchange still leaves the state consumed: a used code or state is
        // never replayable.
        let (token, _) = tokio::join!(
            self.exchange_code(&code),
            self.state.discard(&presented.org_id, &presented.user_id),
        );
        let token = token?;

        let payload =
            serde_json::to_string(&token).map_err(|e| AppError::Internal(e.to_string()))?;
        self.cache
            .set(
                &credentials_key(&presented.org_id, &presented.user_id),
                &payload,
                RECORD_TTL,
            )
            .await?;

        tracing::info!(
            org_id = %presented.org_id,
            user_id = %presented.user_id,
            "stored HubSpot credentials"
        );
        Ok(())
    }

    async fn exchange_code(&self, code: &str) -> Result<serde_json::Value, AppError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TokenExchange(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(format!("invalid token response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> HubSpotOAuth {
        let config = HubSpotConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret-456".to_string(),
            ..Default::default()
        };
        HubSpotOAuth::new(config, Arc::new(CacheManager::new_memory())).unwrap()
    }

    #[tokio::test]
    async fn test_begin_authorization_url_shape() {
        let flow = flow();
        let url = flow.begin_authorization("u1", "o1").await.unwrap();
        let url = Url::parse(&url).unwrap();

        assert_eq!(url.host_str(), Some("app.hubspot.com"));
        assert_eq!(url.path(), "/oauth/authorize");

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("client_id").map(String::as_str), Some("client-123"));
        assert!(pairs.get("scope").unwrap().contains("crm.objects.contacts.read"));

        // The state parameter carries the serialized record
        let state: AuthState = serde_json::from_str(pairs.get("state").unwrap()).unwrap();
        assert_eq!(state.user_id, "u1");
        assert_eq!(state.org_id, "o1");
    }

    #[tokio::test]
    async fn test_callback_with_provider_error() {
        let flow = flow();
        let err = flow
            .handle_callback(CallbackParams {
                code: None,
                state: None,
                error: Some("access_denied".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamAuth(msg) if msg == "access_denied"));
    }

    #[tokio::test]
    async fn test_callback_missing_code() {
        let flow = flow();
        let err = flow
            .handle_callback(CallbackParams {
                code: None,
                state: Some("{}".to_string()),
                error: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedCallback(_)));
    }

    #[tokio::test]
    async fn test_callback_unparseable_state() {
        let flow = flow();
        let err = flow
            .handle_callback(CallbackParams {
                code: Some("c".to_string()),
                state: Some("not json".to_string()),
                error: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedCallback(_)));
    }

    #[tokio::test]
    async fn test_callback_unknown_state_mismatch() {
        let flow = flow();
        let state = serde_json::json!({
            "state": "never-issued",
            "user_id": "u1",
            "org_id": "o1",
        })
        .to_string();

        let err = flow
            .handle_callback(CallbackParams {
                code: Some("c".to_string()),
                state: Some(state),
                error: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StateMismatch));
    }
}
