//! Profile repository trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::Profile;
use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for user profiles
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Get a profile by its user ID
    async fn get(&self, id: &UserId) -> Result<Option<Profile>, DomainError>;

    /// Insert a new profile, fails with `Conflict` if one already exists
    async fn insert(&self, profile: Profile) -> Result<Profile, DomainError>;

    /// Count profiles that reference a team
    async fn count_by_team(&self, team_id: &TeamId) -> Result<usize, DomainError>;
}
