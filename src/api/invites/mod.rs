//! Invite endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{MaybeUser, RequireUser};
use crate::api::profile::ProfileResponse;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::invite::Invite;
use crate::domain::team::TeamId;
use crate::domain::DomainError;

pub fn create_invites_router() -> Router<AppState> {
    Router::new()
        .route("/teams/{team_id}/invites", post(create_invite))
        .route("/invites/{token}/accept", post(accept_invite))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInviteApiRequest {
    pub email: String,
}

/// Invite metadata; the token hash is never exposed
#[derive(Debug, Clone, Serialize)]
pub struct InviteResponse {
    pub id: String,
    pub team_id: String,
    pub email: String,
    pub expires_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<String>,
    pub created_by: String,
    pub created_at: String,
}

impl From<&Invite> for InviteResponse {
    fn from(invite: &Invite) -> Self {
        Self {
            id: invite.id().to_string(),
            team_id: invite.team_id().to_string(),
            email: invite.email().to_string(),
            expires_at: invite.expires_at().to_rfc3339(),
            used_at: invite.used_at().map(|t| t.to_rfc3339()),
            created_by: invite.created_by().to_string(),
            created_at: invite.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateInviteResponse {
    pub message: String,
    pub link: String,
    pub invite: InviteResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcceptInviteResponse {
    pub message: String,
    pub team_id: String,
    pub profile: ProfileResponse,
}

/// POST /teams/{team_id}/invites
async fn create_invite(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(team_id): Path<String>,
    Json(request): Json<CreateInviteApiRequest>,
) -> Result<(StatusCode, Json<CreateInviteResponse>), ApiError> {
    let team_id =
        TeamId::parse(&team_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

    debug!(user_id = %user.id(), team_id = %team_id, "Creating invite");

    let created = state
        .invite_service
        .create_invite(&user, &team_id, &request.email)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateInviteResponse {
            message: format!("Invite created! Link: {}", created.link),
            link: created.link,
            invite: InviteResponse::from(&created.invite),
        }),
    ))
}

/// POST /invites/{token}/accept
async fn accept_invite(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(token): Path<String>,
) -> Result<Json<AcceptInviteResponse>, ApiError> {
    let accepted = state
        .invite_service
        .accept_invite(user.as_ref(), &token)
        .await?;

    Ok(Json(AcceptInviteResponse {
        message: "Successfully joined the team!".to_string(),
        team_id: accepted.invite.team_id().to_string(),
        profile: ProfileResponse::from(&accepted.profile),
    }))
}
