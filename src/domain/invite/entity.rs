//! Invite entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::InviteValidationError;
use crate::domain::team::TeamId;
use crate::domain::user::UserId;

/// Invite identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteId(Uuid);

impl InviteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for InviteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InviteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single-use, time-limited grant of team membership
///
/// Only the hash of the token is kept; the token itself is handed out once,
/// embedded in the invite link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invite {
    id: InviteId,
    team_id: TeamId,
    /// Normalized target email
    email: String,
    #[serde(skip_serializing)]
    token_hash: String,
    expires_at: DateTime<Utc>,
    /// Set once on redemption, never cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    used_at: Option<DateTime<Utc>>,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

impl Invite {
    /// Create a new invite issued at `issued_at` and valid for `ttl`
    pub fn new(
        team_id: TeamId,
        email: impl Into<String>,
        token_hash: impl Into<String>,
        created_by: UserId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, InviteValidationError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(InviteValidationError::ExpiryOutOfRange)?;

        Ok(Self {
            id: InviteId::generate(),
            team_id,
            email: email.into(),
            token_hash: token_hash.into(),
            expires_at,
            used_at: None,
            created_by,
            created_at: issued_at,
        })
    }

    /// Rebuild an invite from persisted state
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: InviteId,
        team_id: TeamId,
        email: String,
        token_hash: String,
        expires_at: DateTime<Utc>,
        used_at: Option<DateTime<Utc>>,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            team_id,
            email,
            token_hash,
            expires_at,
            used_at,
            created_by,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> &InviteId {
        &self.id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn token_hash(&self) -> &str {
        &self.token_hash
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn used_at(&self) -> Option<DateTime<Utc>> {
        self.used_at
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Status checks

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Unused and strictly before expiration
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used() && !self.is_expired_at(now)
    }

    // Mutators

    /// Mark the invite used if it is still redeemable at `now`
    ///
    /// Returns false and leaves the invite untouched otherwise.
    pub fn redeem(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_redeemable_at(now) {
            return false;
        }

        self.used_at = Some(now);
        true
    }
}
