use crate::{
    cache::CacheManager,
    config::Config,
    error::AppError,
    integrations::hubspot::{CredentialStore, HubSpotOAuth},
    routes::{create_health_routes, create_integration_routes},
};
use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub cache: Arc<CacheManager>,
    pub hubspot: Arc<HubSpotOAuth>,
    pub credentials: Arc<CredentialStore>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let cache = Arc::new(CacheManager::new_from_config(&config.cache).await?);
        Self::with_cache(config, cache)
    }

    /// Wire the server around an already-built cache. Used by tests to
    /// inject a memory backend.
    pub fn with_cache(config: Config, cache: Arc<CacheManager>) -> Result<Self, AppError> {
        let hubspot = Arc::new(HubSpotOAuth::new(config.hubspot.clone(), cache.clone())?);
        let credentials = Arc::new(CredentialStore::new(cache.clone()));

        Ok(Self {
            config: Arc::new(config),
            cache,
            hubspot,
            credentials,
        })
    }

    pub fn router(&self) -> Router {
        Router::new()
            .merge(create_integration_routes())
            .merge(create_health_routes())
            .with_state(self.clone())
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| AppError::Internal(format!("invalid listen address: {e}")))?;

        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {} (cache backend: {})", addr, self.cache.backend_name());

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown signal handler: {}", e);
    }
    info!("Shutdown signal received");
}
