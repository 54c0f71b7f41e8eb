//! Storage domain - backend-agnostic storage concerns

use async_trait::async_trait;

use crate::domain::DomainError;

/// Liveness of the storage backend, used by readiness probes
#[async_trait]
pub trait StorageHealth: Send + Sync {
    /// Short name of the backend (e.g. "memory", "postgres")
    fn backend(&self) -> &'static str;

    /// Round-trip to the backend
    async fn ping(&self) -> Result<(), DomainError>;
}
