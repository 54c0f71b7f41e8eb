//! Membership unit of work

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::domain::invite::{Invite, InviteId};
use crate::domain::profile::Profile;
use crate::domain::team::Team;
use crate::domain::DomainError;

/// Writes that change a user's team membership
///
/// Each method commits all of its writes or none of them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert `team` and store `manager`, who must already reference it
    ///
    /// Fails with `NotFound` if the manager's profile does not exist, in
    /// which case the team is not created either.
    async fn create_team(&self, team: Team, manager: Profile) -> Result<(Team, Profile), DomainError>;

    /// Mark the invite used and store `member` in one step
    ///
    /// The invite is only marked if it is still unused and unexpired at
    /// `now`; otherwise nothing is written and `None` is returned.
    async fn redeem_invite(
        &self,
        invite_id: &InviteId,
        member: Profile,
        now: DateTime<Utc>,
    ) -> Result<Option<(Invite, Profile)>, DomainError>;
}
