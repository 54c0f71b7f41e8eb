use chrono::Duration;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::auth::JwtConfig;
use crate::infrastructure::invite::InviteConfig;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig};

const MAX_INVITE_EXPIRATION_DAYS: i64 = 3650;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub invites: InviteSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub database_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
    pub token_expiration_hours: u64,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InviteSettings {
    /// Public URL invite links are built on
    pub base_url: String,
    pub expiration_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: PostgresConfig::default().url,
            max_connections: 10,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_expiration_hours: 24,
            audience: None,
        }
    }
}

impl Default for InviteSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            expiration_days: 7,
        }
    }
}

impl StorageSettings {
    pub fn to_storage_config(&self) -> StorageConfig {
        match self.backend {
            StorageBackend::Memory => StorageConfig::in_memory(),
            StorageBackend::Postgres => StorageConfig::postgres(
                PostgresConfig::new(&self.database_url).with_max_connections(self.max_connections),
            ),
        }
    }
}

impl AuthSettings {
    pub fn to_jwt_config(&self) -> JwtConfig {
        let config = JwtConfig::new(&self.jwt_secret, self.token_expiration_hours);

        match &self.audience {
            Some(audience) => config.with_audience(audience),
            None => config,
        }
    }
}

impl InviteSettings {
    pub fn to_invite_config(&self) -> InviteConfig {
        InviteConfig::new(&self.base_url, Duration::days(self.expiration_days))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the services cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.invites.base_url.trim().is_empty() {
            return Err(DomainError::configuration("invites.base_url cannot be empty"));
        }

        if !(1..=MAX_INVITE_EXPIRATION_DAYS).contains(&self.invites.expiration_days) {
            return Err(DomainError::configuration(format!(
                "invites.expiration_days must be between 1 and {}",
                MAX_INVITE_EXPIRATION_DAYS
            )));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(DomainError::configuration("auth.jwt_secret cannot be empty"));
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::StorageType;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.invites.base_url, "http://localhost:3000");
        assert_eq!(config.invites.expiration_days, 7);
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("invites.base_url", "https://teams.example")
            .unwrap()
            .set_override("storage.backend", "postgres")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.invites.base_url, "https://teams.example");
        assert_eq!(config.invites.expiration_days, 7);
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.storage.to_storage_config().storage_type(),
            StorageType::Postgres
        );
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.invites.expiration_days = 0;
        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));

        let mut config = AppConfig::default();
        config.invites.expiration_days = 100_000_000;
        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));

        let mut config = AppConfig::default();
        config.invites.expiration_days = MAX_INVITE_EXPIRATION_DAYS;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.invites.base_url = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.jwt_secret.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invite_settings_conversion() {
        let settings = InviteSettings {
            base_url: "https://teams.example/".to_string(),
            expiration_days: 3,
        };

        let config = settings.to_invite_config();
        assert_eq!(config.base_url, "https://teams.example/");
        assert_eq!(config.expiration, Duration::days(3));
    }

    #[test]
    fn test_auth_settings_audience() {
        let settings = AuthSettings {
            audience: Some("authenticated".to_string()),
            ..Default::default()
        };

        assert_eq!(
            settings.to_jwt_config().audience.as_deref(),
            Some("authenticated")
        );
    }
}
