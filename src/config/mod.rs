//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthSettings, InviteSettings, LogFormat, LoggingConfig, ServerConfig,
    StorageBackend, StorageSettings,
};
