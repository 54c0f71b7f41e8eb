//! Authentication infrastructure module
//!
//! Validates the identity provider's bearer tokens.

mod jwt;

pub use jwt::{IdentityClaims, IdentityTokenService, JwtConfig, JwtService, UserMetadata};
