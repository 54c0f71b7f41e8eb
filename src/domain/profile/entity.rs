//! Profile entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::team::{TeamId, TeamRole};
use crate::domain::user::{AuthenticatedUser, UserId};

/// Per-user record holding team membership and role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Same as the user's auth identifier
    id: UserId,
    /// Team the user belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    team_id: Option<TeamId>,
    /// Role within `team_id`
    role: TeamRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create the initial profile for a user: no team, plain member
    pub fn new(user: &AuthenticatedUser) -> Self {
        let now = Utc::now();

        Self {
            id: user.id().clone(),
            team_id: None,
            role: TeamRole::Member,
            email: user.email().map(String::from),
            name: user.name().map(String::from),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a profile from persisted state
    pub fn restore(
        id: UserId,
        team_id: Option<TeamId>,
        role: TeamRole,
        email: Option<String>,
        name: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            team_id,
            role,
            email,
            name,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn team_id(&self) -> Option<&TeamId> {
        self.team_id.as_ref()
    }

    pub fn role(&self) -> TeamRole {
        self.role
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the user manages `team_id`
    pub fn is_manager_of(&self, team_id: &TeamId) -> bool {
        self.team_id.as_ref() == Some(team_id) && self.role.can_manage_invites()
    }

    // Mutators

    /// Point the profile at a team with the given role
    ///
    /// Any previous membership is replaced.
    pub fn join_team(&mut self, team_id: TeamId, role: TeamRole) {
        self.team_id = Some(team_id);
        self.role = role;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
