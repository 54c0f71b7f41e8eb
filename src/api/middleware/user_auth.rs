//! Caller authentication from identity provider bearer tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::AuthenticatedUser;

/// Extractor that requires a valid bearer token
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?.ok_or_else(|| {
            ApiError::unauthorized(
                "Authentication required. Provide a token via 'Authorization: Bearer <token>' header",
            )
        })?;

        let user = state.identity.validate(&token)?;

        Ok(RequireUser(user))
    }
}

/// Extractor for routes that also serve anonymous callers
///
/// Any header that does not yield a valid token maps to `None`; the handler
/// decides whether that is acceptable.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match extract_bearer_token(&parts.headers) {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(MaybeUser(None)),
            Err(_) => {
                debug!("Ignoring undecodable Authorization header");
                return Ok(MaybeUser(None));
            }
        };

        match state.identity.validate(&token) {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(e) => {
                debug!(error = %e, "Ignoring invalid bearer token");
                Ok(MaybeUser(None))
            }
        }
    }
}

/// Extract the bearer token from the Authorization header
///
/// Returns `None` when no bearer token is present.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

    Ok(auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer eyJhbGciOiJIUzI1NiJ9.test".parse().unwrap(),
        );

        assert_eq!(
            extract_bearer_token(&headers).unwrap().as_deref(),
            Some("eyJhbGciOiJIUzI1NiJ9.test")
        );
    }

    #[test]
    fn test_missing_token() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers).unwrap(), None);
    }

    #[test]
    fn test_other_scheme_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert_eq!(extract_bearer_token(&headers).unwrap(), None);
    }

    #[test]
    fn test_empty_bearer_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer    ".parse().unwrap());

        assert_eq!(extract_bearer_token(&headers).unwrap(), None);
    }
}
