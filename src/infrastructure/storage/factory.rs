//! Storage factory for runtime storage selection

use std::sync::Arc;

use tracing::info;

use crate::domain::invite::InviteRepository;
use crate::domain::membership::MembershipRepository;
use crate::domain::profile::ProfileRepository;
use crate::domain::storage::StorageHealth;
use crate::domain::team::TeamRepository;
use crate::domain::DomainError;

use super::in_memory::InMemoryStore;
use super::migrations::run_storage_migrations;
use super::postgres::{connect_pool, PostgresConfig, PostgresStore};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Every repository the services need, backed by one store
#[derive(Clone)]
pub struct Repositories {
    pub teams: Arc<dyn TeamRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub invites: Arc<dyn InviteRepository>,
    pub membership: Arc<dyn MembershipRepository>,
    pub health: Arc<dyn StorageHealth>,
}

impl Repositories {
    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: TeamRepository
            + ProfileRepository
            + InviteRepository
            + MembershipRepository
            + StorageHealth
            + 'static,
    {
        Self {
            teams: store.clone(),
            profiles: store.clone(),
            invites: store.clone(),
            membership: store.clone(),
            health: store,
        }
    }

    /// Repositories over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories")
            .field("backend", &self.health.backend())
            .finish()
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the repositories for the configured backend
    ///
    /// PostgreSQL storage has its pending migrations applied first.
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Repositories::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;
                let applied = run_storage_migrations(&pool).await?;
                info!(applied, "Using PostgreSQL storage");
                Ok(Repositories::from_store(Arc::new(PostgresStore::new(pool))))
            }
        }
    }
}
