//! Profile service

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::profile::{Profile, ProfileRepository};
use crate::domain::user::AuthenticatedUser;
use crate::domain::DomainError;

/// Lazily creates and loads per-user profiles
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Return the caller's profile, creating it on first access
    ///
    /// A concurrent first access may insert the profile between our lookup
    /// and insert; the stored profile is returned in that case.
    pub async fn get_or_create(&self, user: &AuthenticatedUser) -> Result<Profile, DomainError> {
        if let Some(profile) = self.profiles.get(user.id()).await? {
            debug!(user_id = %user.id(), "Loaded profile");
            return Ok(profile);
        }

        match self.profiles.insert(Profile::new(user)).await {
            Ok(profile) => {
                info!(user_id = %user.id(), "Created profile");
                Ok(profile)
            }
            Err(DomainError::Conflict { .. }) => self
                .profiles
                .get(user.id())
                .await?
                .ok_or_else(|| DomainError::internal("Profile vanished after conflict")),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for ProfileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileService").finish_non_exhaustive()
    }
}
