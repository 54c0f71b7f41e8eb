//! Team service for team creation and overview

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::membership::MembershipRepository;
use crate::domain::profile::{Profile, ProfileRepository};
use crate::domain::team::{Team, TeamRepository, TeamRole};
use crate::domain::user::AuthenticatedUser;
use crate::domain::DomainError;
use crate::infrastructure::profile::ProfileService;

/// A newly created team and its manager's profile
#[derive(Debug, Clone)]
pub struct TeamCreated {
    pub team: Team,
    pub profile: Profile,
}

/// The caller's profile with the team it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct TeamOverview {
    pub profile: Profile,
    pub team: Option<Team>,
    pub member_count: usize,
}

/// Team service for creating teams and reporting membership
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    profiles: Arc<dyn ProfileRepository>,
    membership: Arc<dyn MembershipRepository>,
    profile_service: Arc<ProfileService>,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        profiles: Arc<dyn ProfileRepository>,
        membership: Arc<dyn MembershipRepository>,
        profile_service: Arc<ProfileService>,
    ) -> Self {
        Self {
            teams,
            profiles,
            membership,
            profile_service,
        }
    }

    /// Create a team owned by the caller and make them its manager
    pub async fn create_team(
        &self,
        user: &AuthenticatedUser,
        name: &str,
    ) -> Result<TeamCreated, DomainError> {
        let team = Team::new(name, user.id().clone()).map_err(|e| {
            warn!(user_id = %user.id(), error = %e, "Rejected team name");
            DomainError::validation(e.to_string())
        })?;

        info!(user_id = %user.id(), team_id = %team.id(), name = %team.name(), "Creating team");

        let mut profile = self
            .profile_service
            .get_or_create(user)
            .await
            .map_err(|e| Self::creation_failed(user, e))?;

        if let Some(previous) = profile.team_id() {
            warn!(
                user_id = %user.id(),
                previous_team_id = %previous,
                "Replacing existing team membership"
            );
        }

        profile.join_team(*team.id(), TeamRole::Manager);

        let (team, profile) = self
            .membership
            .create_team(team, profile)
            .await
            .map_err(|e| Self::creation_failed(user, e))?;

        info!(team_id = %team.id(), "Team created");

        Ok(TeamCreated { team, profile })
    }

    /// Load the caller's profile, team and the team's member count
    pub async fn overview(&self, user: &AuthenticatedUser) -> Result<TeamOverview, DomainError> {
        self.load_overview(user).await.map_err(|e| {
            error!(user_id = %user.id(), error = %e, "Failed to load team overview");
            e
        })
    }

    async fn load_overview(&self, user: &AuthenticatedUser) -> Result<TeamOverview, DomainError> {
        let profile = self.profile_service.get_or_create(user).await?;

        let Some(team_id) = profile.team_id().copied() else {
            return Ok(TeamOverview {
                profile,
                team: None,
                member_count: 0,
            });
        };

        let team = self.teams.get(&team_id).await?;
        let member_count = match team {
            Some(_) => self.profiles.count_by_team(&team_id).await?,
            None => 0,
        };

        Ok(TeamOverview {
            profile,
            team,
            member_count,
        })
    }

    fn creation_failed(user: &AuthenticatedUser, e: DomainError) -> DomainError {
        error!(user_id = %user.id(), error = %e, "Failed to create team");
        DomainError::internal("Failed to create team")
    }
}

impl std::fmt::Debug for TeamService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::MockMembershipRepository;
    use crate::domain::profile::MockProfileRepository;
    use crate::domain::user::UserId;
    use crate::infrastructure::storage::InMemoryStore;

    fn user(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap())
    }

    fn create_service() -> (TeamService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let profiles = Arc::new(ProfileService::new(store.clone()));
        let service = TeamService::new(store.clone(), store.clone(), store.clone(), profiles);
        (service, store)
    }

    #[tokio::test]
    async fn test_create_team_promotes_creator() {
        let (service, store) = create_service();

        let created = service
            .create_team(&user("owner"), "  Marketing  ")
            .await
            .unwrap();

        assert_eq!(created.team.name(), "Marketing");
        assert!(created.team.is_owned_by(created.profile.id()));
        assert_eq!(created.profile.role(), TeamRole::Manager);
        assert_eq!(created.profile.team_id(), Some(created.team.id()));

        let stored = ProfileRepository::get(store.as_ref(), created.profile.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.team_id(), Some(created.team.id()));
        assert_eq!(stored.role(), TeamRole::Manager);
    }

    #[tokio::test]
    async fn test_create_team_invalid_name() {
        let (service, _) = create_service();

        let result = service.create_team(&user("owner"), "   ").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = service.create_team(&user("owner"), &"x".repeat(101)).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_second_team_replaces_membership() {
        let (service, _) = create_service();
        let owner = user("owner");

        let first = service.create_team(&owner, "First").await.unwrap();
        let second = service.create_team(&owner, "Second").await.unwrap();

        assert_ne!(first.team.id(), second.team.id());
        assert_eq!(second.profile.team_id(), Some(second.team.id()));

        let overview = service.overview(&owner).await.unwrap();
        assert_eq!(overview.team.unwrap().name(), "Second");
    }

    #[tokio::test]
    async fn test_create_team_storage_failure_is_generic() {
        let store = Arc::new(InMemoryStore::new());
        let profiles = Arc::new(ProfileService::new(store.clone()));
        let mut membership = MockMembershipRepository::new();
        membership
            .expect_create_team()
            .returning(|_, _| Err(DomainError::storage("deadlock detected")));

        let service = TeamService::new(store.clone(), store.clone(), Arc::new(membership), profiles);
        let result = service.create_team(&user("owner"), "Marketing").await;

        match result {
            Err(DomainError::Internal { message }) => assert_eq!(message, "Failed to create team"),
            other => panic!("Expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_overview_without_team() {
        let (service, _) = create_service();

        let overview = service.overview(&user("loner")).await.unwrap();

        assert!(overview.team.is_none());
        assert_eq!(overview.member_count, 0);
        assert_eq!(overview.profile.id().as_str(), "loner");
    }

    #[tokio::test]
    async fn test_overview_with_team() {
        let (service, _) = create_service();
        let owner = user("owner");
        let created = service.create_team(&owner, "Marketing").await.unwrap();

        let overview = service.overview(&owner).await.unwrap();

        assert_eq!(overview.team.as_ref(), Some(&created.team));
        assert_eq!(overview.member_count, 1);
        assert_eq!(overview.profile.role(), TeamRole::Manager);
    }

    #[tokio::test]
    async fn test_overview_propagates_storage_failure() {
        let store = Arc::new(InMemoryStore::new());
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_get()
            .returning(|_| Err(DomainError::storage("connection refused")));
        let profiles: Arc<dyn ProfileRepository> = Arc::new(profiles);

        let service = TeamService::new(
            store.clone(),
            profiles.clone(),
            store,
            Arc::new(ProfileService::new(profiles)),
        );

        let result = service.overview(&user("owner")).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
