//! Application state for shared services

use std::sync::Arc;

use crate::domain::storage::StorageHealth;
use crate::infrastructure::auth::IdentityTokenService;
use crate::infrastructure::invite::{InviteConfig, InviteService};
use crate::infrastructure::profile::ProfileService;
use crate::infrastructure::storage::Repositories;
use crate::infrastructure::team::TeamService;

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub profile_service: Arc<ProfileService>,
    pub team_service: Arc<TeamService>,
    pub invite_service: Arc<InviteService>,
    pub identity: Arc<dyn IdentityTokenService>,
    pub storage: Arc<dyn StorageHealth>,
}

impl AppState {
    /// Wire the services over one set of repositories
    pub fn new(
        repositories: Repositories,
        identity: Arc<dyn IdentityTokenService>,
        invite_config: InviteConfig,
    ) -> Self {
        let profile_service = Arc::new(ProfileService::new(repositories.profiles.clone()));

        let team_service = Arc::new(TeamService::new(
            repositories.teams.clone(),
            repositories.profiles.clone(),
            repositories.membership.clone(),
            profile_service.clone(),
        ));

        let invite_service = Arc::new(InviteService::new(
            repositories.invites.clone(),
            repositories.membership.clone(),
            profile_service.clone(),
            invite_config,
        ));

        Self {
            profile_service,
            team_service,
            invite_service,
            identity,
            storage: repositories.health,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("storage", &self.storage.backend())
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
