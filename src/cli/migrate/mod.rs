//! Migrate command - applies the PostgreSQL schema

use anyhow::bail;
use tracing::info;

use crate::config::StorageBackend;
use crate::infrastructure::storage::{
    connect_pool, storage_migrations, PostgresConfig, PostgresMigrator,
};

/// Apply pending migrations to the configured database
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    if config.storage.backend != StorageBackend::Postgres {
        bail!("Migrations require storage.backend = \"postgres\"");
    }

    let pg_config = PostgresConfig::new(&config.storage.database_url)
        .with_max_connections(config.storage.max_connections);
    let pool = connect_pool(&pg_config).await?;
    let migrator = PostgresMigrator::new(pool);

    let applied = migrator.run_all(&storage_migrations()).await?;
    let version = migrator.current_version().await?;

    info!(applied, ?version, "Migrations complete");

    Ok(())
}
