//! Bearer token validation for identity provider JWTs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::user::{AuthenticatedUser, UserId};
use crate::domain::DomainError;

/// Profile data the identity provider attaches to a token
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (user ID)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl IdentityClaims {
    /// Create new claims for a user
    pub fn new(user: &AuthenticatedUser, expiration_hours: u64, audience: Option<&str>) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: user.id().as_str().to_string(),
            email: user.email().map(String::from),
            user_metadata: UserMetadata {
                name: user.name().map(String::from),
            },
            iat: now.timestamp(),
            exp: exp.timestamp(),
            aud: audience.map(String::from),
        }
    }

    /// Build the caller identity from the claims
    pub fn into_user(self) -> Result<AuthenticatedUser, DomainError> {
        let id = UserId::new(self.sub)
            .map_err(|e| DomainError::unauthenticated(format!("Invalid subject: {}", e)))?;

        let mut user = AuthenticatedUser::new(id);

        if let Some(email) = self.email {
            user = user.with_email(email);
        }

        if let Some(name) = self.user_metadata.name {
            user = user.with_name(name);
        }

        Ok(user)
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret with the identity provider
    pub secret: String,
    /// Lifetime of tokens issued locally
    pub expiration_hours: u64,
    /// Expected `aud` claim, unchecked when absent
    pub audience: Option<String>,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
            audience: None,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::new("change-me-in-production", 24)
    }
}

/// Issues and validates identity tokens
pub trait IdentityTokenService: Send + Sync + Debug {
    /// Sign a token for a user (development and tests)
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, DomainError>;

    /// Validate a bearer token and return the caller
    fn validate(&self, token: &str) -> Result<AuthenticatedUser, DomainError>;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("audience", &self.config.audience)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);

        match &self.config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        validation
    }
}

impl IdentityTokenService for JwtService {
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, DomainError> {
        let claims = IdentityClaims::new(
            user,
            self.config.expiration_hours,
            self.config.audience.as_deref(),
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        let token_data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| DomainError::unauthenticated(format!("Invalid token: {}", e)))?;

        token_data.claims.into_user()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-1").unwrap())
            .with_email("user@example.com")
            .with_name("User One")
    }

    #[test]
    fn test_issue_and_validate() {
        let service = JwtService::new(JwtConfig::new("secret", 1));

        let token = service.issue(&user()).unwrap();
        let validated = service.validate(&token).unwrap();

        assert_eq!(validated, user());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = JwtService::new(JwtConfig::new("secret-a", 1));
        let validator = JwtService::new(JwtConfig::new("secret-b", 1));

        let token = issuer.issue(&user()).unwrap();
        let result = validator.validate(&token);

        assert!(matches!(result, Err(DomainError::Unauthenticated { .. })));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new(JwtConfig::new("secret", 1));
        let mut claims = IdentityClaims::new(&user(), 1, None);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(DomainError::Unauthenticated { .. })
        ));
    }

    #[test]
    fn test_audience_is_checked_when_configured() {
        let service =
            JwtService::new(JwtConfig::new("secret", 1).with_audience("authenticated"));
        let token = service.issue(&user()).unwrap();
        assert!(service.validate(&token).is_ok());

        let other = JwtService::new(JwtConfig::new("secret", 1).with_audience("other"));
        assert!(other.validate(&token).is_err());
    }

    #[test]
    fn test_claims_without_optional_fields() {
        let claims: IdentityClaims = serde_json::from_value(serde_json::json!({
            "sub": "user-2",
            "iat": 0,
            "exp": 1
        }))
        .unwrap();

        let user = claims.into_user().unwrap();
        assert_eq!(user.id().as_str(), "user-2");
        assert!(user.email().is_none());
        assert!(user.name().is_none());
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = JwtService::new(JwtConfig::new("super-secret", 1));
        assert!(!format!("{:?}", service).contains("super-secret"));
    }
}
