use crate::cache::config::CacheConfig;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub hubspot: HubSpotConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Fixed HubSpot app credentials and endpoints. These are process-wide
/// configuration injected into the flow, never literals in flow logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSpotConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub authorization_url: String,
    pub token_url: String,
    /// Base URL of the HubSpot REST API, overridable for tests.
    pub api_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:8000/integrations/hubspot/oauth2callback"
                .to_string(),
            scope: "crm.objects.contacts.read crm.objects.contacts.write oauth".to_string(),
            authorization_url: "https://app.hubspot.com/oauth/authorize".to_string(),
            token_url: "https://api.hubapi.com/oauth/v1/token".to_string(),
            api_base_url: "https://api.hubapi.com".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("HUBLINK")
                .prefix_separator("_")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        builder = builder.add_source(
            Environment::with_prefix("HUBLINK")
                .prefix_separator("_")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(
            config.hubspot.token_url,
            "https://api.hubapi.com/oauth/v1/token"
        );
        assert!(config.hubspot.scope.contains("crm.objects.contacts.read"));
        assert_eq!(config.cache.backend, "memory");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            r#"
server:
  port: 9000
hubspot:
  client_id: test-client
  client_secret: test-secret
"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.hubspot.client_id, "test-client");
        assert_eq!(config.hubspot.client_secret, "test-secret");
        // Untouched sections keep their defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.hubspot.authorization_url,
            "https://app.hubspot.com/oauth/authorize"
        );
    }

    #[test]
    fn test_config_load_missing_file_uses_defaults() {
        let config = Config::load_from_file("/nonexistent/config.yaml").unwrap();
        assert_eq!(config.server.port, 8000);
    }
}
