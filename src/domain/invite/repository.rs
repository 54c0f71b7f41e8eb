//! Invite repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use super::entity::{Invite, InviteId};
use crate::domain::DomainError;

/// Repository for invites
///
/// Redemption is not part of this trait: it changes the invite and the
/// redeemer's profile together, see
/// [`MembershipRepository`](crate::domain::membership::MembershipRepository).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Insert a new invite
    async fn insert(&self, invite: Invite) -> Result<Invite, DomainError>;

    /// Get an invite by ID
    async fn get(&self, id: &InviteId) -> Result<Option<Invite>, DomainError>;

    /// Find the invite with this token hash that is unused and not expired at `now`
    async fn find_redeemable_by_token_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Invite>, DomainError>;
}
