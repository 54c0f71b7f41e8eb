//! Profile endpoints

use axum::{extract::State, routing::get, Router};
use serde::Serialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::profile::Profile;

pub fn create_profile_router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

/// Profile as exposed to its owner
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub team_id: Option<String>,
    pub role: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id().to_string(),
            team_id: profile.team_id().map(ToString::to_string),
            role: profile.role().to_string(),
            email: profile.email().map(String::from),
            name: profile.name().map(String::from),
            created_at: profile.created_at().to_rfc3339(),
            updated_at: profile.updated_at().to_rfc3339(),
        }
    }
}

/// GET /profile
async fn get_profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profile_service.get_or_create(&user).await?;

    Ok(Json(ProfileResponse::from(&profile)))
}
