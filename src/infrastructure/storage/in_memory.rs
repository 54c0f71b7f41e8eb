//! In-memory storage implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::invite::{Invite, InviteId, InviteRepository};
use crate::domain::membership::MembershipRepository;
use crate::domain::profile::{Profile, ProfileRepository};
use crate::domain::storage::StorageHealth;
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    teams: HashMap<TeamId, Team>,
    profiles: HashMap<UserId, Profile>,
    invites: HashMap<InviteId, Invite>,
}

/// Thread-safe in-memory store for teams, profiles and invites
///
/// Useful for testing and development. Data is lost when the process
/// terminates. All tables sit behind one lock, so membership changes are
/// applied atomically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.teams.get(id).cloned())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn get(&self, id: &UserId) -> Result<Option<Profile>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.get(id).cloned())
    }

    async fn insert(&self, profile: Profile) -> Result<Profile, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.profiles.contains_key(profile.id()) {
            return Err(DomainError::conflict(format!(
                "Profile '{}' already exists",
                profile.id()
            )));
        }

        tables.profiles.insert(profile.id().clone(), profile.clone());
        Ok(profile)
    }

    async fn count_by_team(&self, team_id: &TeamId) -> Result<usize, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .filter(|p| p.team_id() == Some(team_id))
            .count())
    }
}

#[async_trait]
impl InviteRepository for InMemoryStore {
    async fn insert(&self, invite: Invite) -> Result<Invite, DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.teams.contains_key(invite.team_id()) {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                invite.team_id()
            )));
        }

        if tables
            .invites
            .values()
            .any(|i| i.token_hash() == invite.token_hash())
        {
            return Err(DomainError::conflict("Invite token already exists"));
        }

        tables.invites.insert(*invite.id(), invite.clone());
        Ok(invite)
    }

    async fn get(&self, id: &InviteId) -> Result<Option<Invite>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.invites.get(id).cloned())
    }

    async fn find_redeemable_by_token_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Invite>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .invites
            .values()
            .find(|i| i.token_hash() == token_hash && i.is_redeemable_at(now))
            .cloned())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn create_team(&self, team: Team, manager: Profile) -> Result<(Team, Profile), DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.profiles.contains_key(manager.id()) {
            return Err(DomainError::not_found(format!(
                "Profile '{}' not found",
                manager.id()
            )));
        }

        if tables.teams.contains_key(team.id()) {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team.id()
            )));
        }

        tables.teams.insert(*team.id(), team.clone());
        tables.profiles.insert(manager.id().clone(), manager.clone());

        Ok((team, manager))
    }

    async fn redeem_invite(
        &self,
        invite_id: &InviteId,
        member: Profile,
        now: DateTime<Utc>,
    ) -> Result<Option<(Invite, Profile)>, DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.profiles.contains_key(member.id()) {
            return Err(DomainError::not_found(format!(
                "Profile '{}' not found",
                member.id()
            )));
        }

        let Some(invite) = tables.invites.get_mut(invite_id) else {
            return Ok(None);
        };

        if !invite.redeem(now) {
            return Ok(None);
        }

        let invite = invite.clone();
        tables.profiles.insert(member.id().clone(), member.clone());

        Ok(Some((invite, member)))
    }
}

#[async_trait]
impl StorageHealth for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let _tables = self.tables.read().await;
        Ok(())
    }
}
