//! Team endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::profile::ProfileResponse;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::team::Team;

pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/team", get(get_team_overview))
        .route("/teams", post(create_team))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamApiRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id().to_string(),
            name: team.name().to_string(),
            owner_id: team.owner_id().to_string(),
            created_at: team.created_at().to_rfc3339(),
            updated_at: team.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTeamResponse {
    pub message: String,
    pub team: TeamResponse,
    pub profile: ProfileResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamOverviewResponse {
    pub profile: ProfileResponse,
    pub team: Option<TeamResponse>,
    pub member_count: usize,
}

/// GET /team
async fn get_team_overview(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<TeamOverviewResponse>, ApiError> {
    let overview = state.team_service.overview(&user).await?;

    Ok(Json(TeamOverviewResponse {
        profile: ProfileResponse::from(&overview.profile),
        team: overview.team.as_ref().map(TeamResponse::from),
        member_count: overview.member_count,
    }))
}

/// POST /teams
async fn create_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateTeamApiRequest>,
) -> Result<(StatusCode, Json<CreateTeamResponse>), ApiError> {
    debug!(user_id = %user.id(), "Creating team");

    let created = state.team_service.create_team(&user, &request.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTeamResponse {
            message: "Team created successfully!".to_string(),
            team: TeamResponse::from(&created.team),
            profile: ProfileResponse::from(&created.profile),
        }),
    ))
}
