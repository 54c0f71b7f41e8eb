use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use super::health;
use super::invites;
use super::profile;
use super::state::AppState;
use super::teams;

/// CORS policy admitting the front-end that serves invite links
pub fn cors_layer(base_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match HeaderValue::from_str(base_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(base_url = %base_url, "Invite base URL is not a valid origin, CORS disabled");
            layer
        }
    }
}

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.invite_service.config().base_url);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(profile::create_profile_router())
        .merge(teams::create_teams_router())
        .merge(invites::create_invites_router())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::{AuthenticatedUser, UserId};
    use crate::infrastructure::auth::{IdentityTokenService, JwtConfig, JwtService};
    use crate::infrastructure::invite::InviteConfig;
    use crate::infrastructure::storage::Repositories;

    struct TestApp {
        router: Router,
        jwt: JwtService,
    }

    impl TestApp {
        fn new() -> Self {
            let jwt = JwtService::new(JwtConfig::new("test-secret", 1));
            let state = AppState::new(
                Repositories::in_memory(),
                Arc::new(jwt.clone()),
                InviteConfig::default(),
            );

            Self {
                router: create_router(state),
                jwt,
            }
        }

        fn token(&self, user_id: &str) -> String {
            let user = AuthenticatedUser::new(UserId::new(user_id).unwrap())
                .with_email(format!("{user_id}@example.com"));
            self.jwt.issue(&user).unwrap()
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);

            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }

            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };

            (status, value)
        }

        async fn create_team(&self, token: &str, name: &str) -> String {
            let (status, body) = self
                .send("POST", "/teams", Some(token), Some(json!({ "name": name })))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body["team"]["id"].as_str().unwrap().to_string()
        }

        async fn create_invite(&self, token: &str, team_id: &str) -> String {
            let (status, body) = self
                .send(
                    "POST",
                    &format!("/teams/{team_id}/invites"),
                    Some(token),
                    Some(json!({ "email": "invitee@example.com" })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);

            let link = body["link"].as_str().unwrap();
            link.rsplit('/').next().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = TestApp::new();

        let (status, body) = app.send("GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = app.send("GET", "/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "storage:memory");

        let (status, _) = app.send("GET", "/live", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_profile_requires_authentication() {
        let app = TestApp::new();

        let (status, body) = app.send("GET", "/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "authentication_error");

        let (status, _) = app.send("GET", "/profile", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_created_on_first_access() {
        let app = TestApp::new();
        let token = app.token("alice");

        let (status, body) = app.send("GET", "/profile", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "alice");
        assert_eq!(body["role"], "member");
        assert_eq!(body["email"], "alice@example.com");
        assert!(body["team_id"].is_null());
    }

    #[tokio::test]
    async fn test_create_team_and_overview() {
        let app = TestApp::new();
        let token = app.token("alice");

        let (status, body) = app
            .send("POST", "/teams", Some(&token), Some(json!({ "name": " Marketing " })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Team created successfully!");
        assert_eq!(body["team"]["name"], "Marketing");
        assert_eq!(body["profile"]["role"], "manager");

        let (status, body) = app.send("GET", "/team", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["team"]["name"], "Marketing");
        assert_eq!(body["member_count"], 1);
    }

    #[tokio::test]
    async fn test_create_team_rejects_blank_name() {
        let app = TestApp::new();
        let token = app.token("alice");

        let (status, body) = app
            .send("POST", "/teams", Some(&token), Some(json!({ "name": "  " })))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = TestApp::new();
        let token = app.token("alice");

        let (status, body) = app
            .send("POST", "/teams", Some(&token), Some(json!({ "title": "x" })))
            .await;

        assert!(status.is_client_error());
        assert_eq!(body["error"]["code"], "invalid_body");
    }

    #[tokio::test]
    async fn test_invite_flow() {
        let app = TestApp::new();
        let manager = app.token("manager");
        let invitee = app.token("invitee");
        let team_id = app.create_team(&manager, "Marketing").await;

        let (status, body) = app
            .send(
                "POST",
                &format!("/teams/{team_id}/invites"),
                Some(&manager),
                Some(json!({ "email": "Invitee@Example.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let link = body["link"].as_str().unwrap().to_string();
        assert!(link.starts_with("http://localhost:3000/invite/inv_"));
        assert_eq!(body["message"], format!("Invite created! Link: {link}"));
        assert_eq!(body["invite"]["email"], "invitee@example.com");
        assert!(body["invite"].get("token_hash").is_none());

        let token = link.rsplit('/').next().unwrap();
        let accept = format!("/invites/{token}/accept");

        let (status, body) = app.send("POST", &accept, Some(&invitee), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully joined the team!");
        assert_eq!(body["team_id"], team_id.as_str());
        assert_eq!(body["profile"]["role"], "member");

        let (status, body) = app.send("POST", &accept, Some(&invitee), None).await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["error"]["code"], "invalid_invite");
        assert_eq!(body["error"]["message"], "Invalid or expired invite");

        let (_, body) = app.send("GET", "/team", Some(&manager), None).await;
        assert_eq!(body["member_count"], 2);
    }

    #[tokio::test]
    async fn test_accept_without_login() {
        let app = TestApp::new();
        let manager = app.token("manager");
        let team_id = app.create_team(&manager, "Marketing").await;
        let token = app.create_invite(&manager, &team_id).await;
        let accept = format!("/invites/{token}/accept");

        let (status, body) = app.send("POST", &accept, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Must be logged in to accept invite");

        let invitee = app.token("invitee");
        let (status, _) = app.send("POST", &accept, Some(&invitee), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_accept_with_undecodable_header_is_anonymous() {
        let app = TestApp::new();
        let manager = app.token("manager");
        let team_id = app.create_team(&manager, "Marketing").await;
        let token = app.create_invite(&manager, &team_id).await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/invites/{token}/accept"))
            .header(
                header::AUTHORIZATION,
                HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
            )
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "Must be logged in to accept invite");
    }

    #[tokio::test]
    async fn test_unknown_invite_without_login_is_gone() {
        let app = TestApp::new();

        let (status, body) = app
            .send("POST", "/invites/inv_unknown/accept", None, None)
            .await;

        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["error"]["code"], "invalid_invite");
    }

    #[tokio::test]
    async fn test_member_cannot_invite() {
        let app = TestApp::new();
        let manager = app.token("manager");
        let member = app.token("member");
        let team_id = app.create_team(&manager, "Marketing").await;
        let token = app.create_invite(&manager, &team_id).await;

        let (status, _) = app
            .send("POST", &format!("/invites/{token}/accept"), Some(&member), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .send(
                "POST",
                &format!("/teams/{team_id}/invites"),
                Some(&member),
                Some(json!({ "email": "other@example.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["type"], "permission_error");
    }

    #[tokio::test]
    async fn test_invite_with_invalid_team_id() {
        let app = TestApp::new();
        let manager = app.token("manager");

        let (status, body) = app
            .send(
                "POST",
                "/teams/not-a-uuid/invites",
                Some(&manager),
                Some(json!({ "email": "invitee@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "id");
    }

    #[test]
    fn test_cors_layer_accepts_base_url() {
        // Construction must not panic for the default or a bad origin
        let _ = cors_layer("http://localhost:3000/");
        let _ = cors_layer("http://bad\norigin");
    }
}
