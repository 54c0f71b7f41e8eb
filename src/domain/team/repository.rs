//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId};
use crate::domain::DomainError;

/// Read access to teams
///
/// Teams are only ever written together with their creator's profile, see
/// [`MembershipRepository`](crate::domain::membership::MembershipRepository).
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;
}
