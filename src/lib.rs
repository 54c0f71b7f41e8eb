//! Teamform API
//!
//! Team management for the Teamform form builder:
//! - Team creation with the creator as manager
//! - Single-use, expiring email invites
//! - Lazily created per-user profiles

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{auth::JwtService, storage::StorageFactory};
use tracing::info;

/// Create the application state for the configured storage backend
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let repositories = StorageFactory::create(&config.storage.to_storage_config()).await?;
    let identity = Arc::new(JwtService::new(config.auth.to_jwt_config()));

    info!(backend = repositories.health.backend(), "Application state initialized");

    Ok(AppState::new(
        repositories,
        identity,
        config.invites.to_invite_config(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_app_state_in_memory() {
        let state = create_app_state(&AppConfig::default()).await.unwrap();

        assert_eq!(state.storage.backend(), "memory");
        assert_eq!(
            state.invite_service.config().base_url,
            "http://localhost:3000"
        );
    }
}
