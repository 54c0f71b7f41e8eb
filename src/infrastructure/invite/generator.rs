//! Invite token generation
//!
//! Tokens come from the OS-seeded CSPRNG; only their SHA-256 hash is stored.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes per token
const TOKEN_BYTES: usize = 32;

/// Result of generating a new invite token
#[derive(Debug, Clone)]
pub struct GeneratedInviteToken {
    /// The token embedded in the invite link (only shown once at creation)
    pub token: String,
    /// The hashed token for storage and lookup
    pub hash: String,
}

/// Generator for unguessable invite tokens
#[derive(Debug, Clone)]
pub struct InviteTokenGenerator {
    prefix: String,
}

impl Default for InviteTokenGenerator {
    fn default() -> Self {
        Self::new("inv_")
    }
}

impl InviteTokenGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Generate a new invite token
    pub fn generate(&self) -> GeneratedInviteToken {
        let mut random_bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let token = format!("{}{}", self.prefix, URL_SAFE_NO_PAD.encode(&random_bytes));
        let hash = Self::hash_token(&token);

        GeneratedInviteToken { token, hash }
    }

    /// Hash a token for storage and lookup
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("sha256${}", URL_SAFE_NO_PAD.encode(hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_token_format() {
        let generated = InviteTokenGenerator::default().generate();

        assert!(generated.token.starts_with("inv_"));
        // 32 bytes -> 43 base64 characters without padding
        assert_eq!(generated.token.len(), 4 + 43);
        assert!(generated
            .token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_hash_matches_token() {
        let generated = InviteTokenGenerator::default().generate();

        assert!(generated.hash.starts_with("sha256$"));
        assert_eq!(generated.hash, InviteTokenGenerator::hash_token(&generated.token));
        assert_ne!(generated.hash, generated.token);
    }

    #[test]
    fn test_tokens_are_unique() {
        let generator = InviteTokenGenerator::default();
        let tokens: HashSet<String> = (0..100).map(|_| generator.generate().token).collect();
        assert_eq!(tokens.len(), 100);
    }
}
