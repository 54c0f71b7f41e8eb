//! Invite service for issuing and redeeming team invites

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use super::generator::InviteTokenGenerator;
use crate::domain::invite::{normalize_invite_email, Invite, InviteRepository};
use crate::domain::membership::MembershipRepository;
use crate::domain::profile::Profile;
use crate::domain::team::{TeamId, TeamRole};
use crate::domain::user::AuthenticatedUser;
use crate::domain::DomainError;
use crate::infrastructure::profile::ProfileService;

/// Invite link and expiration settings
#[derive(Debug, Clone)]
pub struct InviteConfig {
    /// Public URL the invite links point at
    pub base_url: String,
    /// How long an invite stays redeemable
    pub expiration: Duration,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            expiration: Duration::days(7),
        }
    }
}

impl InviteConfig {
    pub fn new(base_url: impl Into<String>, expiration: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            expiration,
        }
    }
}

/// A freshly issued invite
///
/// `token` is only available here; storage keeps its hash.
#[derive(Debug, Clone)]
pub struct CreatedInvite {
    pub invite: Invite,
    pub token: String,
    pub link: String,
}

/// A redeemed invite and the redeemer's updated profile
#[derive(Debug, Clone)]
pub struct AcceptedInvite {
    pub invite: Invite,
    pub profile: Profile,
}

/// Issues invites for managers and redeems them for invitees
pub struct InviteService {
    invites: Arc<dyn InviteRepository>,
    membership: Arc<dyn MembershipRepository>,
    profile_service: Arc<ProfileService>,
    generator: InviteTokenGenerator,
    config: InviteConfig,
}

impl InviteService {
    pub fn new(
        invites: Arc<dyn InviteRepository>,
        membership: Arc<dyn MembershipRepository>,
        profile_service: Arc<ProfileService>,
        config: InviteConfig,
    ) -> Self {
        Self {
            invites,
            membership,
            profile_service,
            generator: InviteTokenGenerator::default(),
            config,
        }
    }

    pub fn with_generator(mut self, generator: InviteTokenGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn config(&self) -> &InviteConfig {
        &self.config
    }

    /// Shareable URL for an invite token
    pub fn invite_link(&self, token: &str) -> String {
        format!(
            "{}/invite/{}",
            self.config.base_url.trim_end_matches('/'),
            token
        )
    }

    /// Issue an invite to `email` for a team the caller manages
    pub async fn create_invite(
        &self,
        user: &AuthenticatedUser,
        team_id: &TeamId,
        email: &str,
    ) -> Result<CreatedInvite, DomainError> {
        self.create_invite_at(user, team_id, email, Utc::now()).await
    }

    /// Issue an invite as of `now`
    pub async fn create_invite_at(
        &self,
        user: &AuthenticatedUser,
        team_id: &TeamId,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<CreatedInvite, DomainError> {
        let email = normalize_invite_email(email).map_err(|e| {
            warn!(user_id = %user.id(), error = %e, "Rejected invite email");
            DomainError::validation(e.to_string())
        })?;

        let profile = self
            .profile_service
            .get_or_create(user)
            .await
            .map_err(|e| Self::failed("Failed to create invite", user, e))?;

        if !profile.is_manager_of(team_id) {
            warn!(user_id = %user.id(), team_id = %team_id, "Invite issuer is not a team manager");
            return Err(DomainError::forbidden(
                "Only team managers can invite members",
            ));
        }

        let generated = self.generator.generate();
        let invite = Invite::new(
            *team_id,
            email,
            generated.hash,
            user.id().clone(),
            now,
            self.config.expiration,
        )
        .map_err(|e| {
            error!(user_id = %user.id(), error = %e, "Failed to create invite");
            DomainError::internal("Failed to create invite")
        })?;

        let invite = self
            .invites
            .insert(invite)
            .await
            .map_err(|e| Self::failed("Failed to create invite", user, e))?;

        info!(
            invite_id = %invite.id(),
            team_id = %team_id,
            created_by = %user.id(),
            expires_at = %invite.expires_at(),
            "Invite created"
        );

        let link = self.invite_link(&generated.token);

        Ok(CreatedInvite {
            invite,
            token: generated.token,
            link,
        })
    }

    /// Redeem an invite token for the caller
    ///
    /// The token is looked up before the caller is required to be signed in,
    /// so unknown tokens are reported as invalid even to anonymous callers.
    pub async fn accept_invite(
        &self,
        user: Option<&AuthenticatedUser>,
        token: &str,
    ) -> Result<AcceptedInvite, DomainError> {
        self.accept_invite_at(user, token, Utc::now()).await
    }

    /// Redeem an invite token as of `now`
    pub async fn accept_invite_at(
        &self,
        user: Option<&AuthenticatedUser>,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AcceptedInvite, DomainError> {
        let token_hash = InviteTokenGenerator::hash_token(token);

        let invite = self
            .invites
            .find_redeemable_by_token_hash(&token_hash, now)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up invite");
                DomainError::internal("Failed to accept invite")
            })?
            .ok_or_else(|| {
                warn!("Invite token is unknown, used or expired");
                DomainError::InvalidInvite
            })?;

        let user = user.ok_or_else(|| {
            warn!(invite_id = %invite.id(), "Anonymous caller tried to accept invite");
            DomainError::unauthenticated("Must be logged in to accept invite")
        })?;

        let mut profile = self
            .profile_service
            .get_or_create(user)
            .await
            .map_err(|e| Self::failed("Failed to accept invite", user, e))?;

        if let Some(previous) = profile.team_id() {
            warn!(
                user_id = %user.id(),
                previous_team_id = %previous,
                team_id = %invite.team_id(),
                "Replacing existing team membership"
            );
        }

        profile.join_team(*invite.team_id(), TeamRole::Member);

        let (invite, profile) = self
            .membership
            .redeem_invite(invite.id(), profile, now)
            .await
            .map_err(|e| Self::failed("Failed to accept invite", user, e))?
            .ok_or_else(|| {
                warn!(invite_id = %invite.id(), "Invite was redeemed concurrently");
                DomainError::InvalidInvite
            })?;

        info!(
            invite_id = %invite.id(),
            team_id = %invite.team_id(),
            user_id = %user.id(),
            "Invite accepted"
        );

        Ok(AcceptedInvite { invite, profile })
    }

    fn failed(message: &str, user: &AuthenticatedUser, e: DomainError) -> DomainError {
        if e.is_storage() {
            error!(user_id = %user.id(), error = %e, "{}", message);
        } else {
            warn!(user_id = %user.id(), error = %e, "{}", message);
        }

        DomainError::internal(message)
    }
}

impl std::fmt::Debug for InviteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
