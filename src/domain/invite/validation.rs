//! Invite validation

use thiserror::Error;

/// Errors that can occur during invite validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InviteValidationError {
    #[error("Email address cannot be empty")]
    EmptyEmail,

    #[error("Email address cannot exceed {0} characters")]
    EmailTooLong(usize),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invite expiry is out of range")]
    ExpiryOutOfRange,
}

const MAX_EMAIL_LENGTH: usize = 254;

/// Validate and normalize an invite's target email
///
/// Returns the trimmed, lowercased address.
pub fn normalize_invite_email(email: &str) -> Result<String, InviteValidationError> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(InviteValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(InviteValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(InviteValidationError::InvalidEmail);
    };

    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    {
        return Err(InviteValidationError::InvalidEmail);
    }

    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_email() {
        assert_eq!(
            normalize_invite_email("  Person@Example.COM ").unwrap(),
            "person@example.com"
        );
    }

    #[test]
    fn test_empty_email() {
        assert_eq!(
            normalize_invite_email("   "),
            Err(InviteValidationError::EmptyEmail)
        );
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["person", "@example.com", "person@", "a@b@c", "pe rson@example.com"] {
            assert_eq!(
                normalize_invite_email(email),
                Err(InviteValidationError::InvalidEmail),
                "{email}"
            );
        }
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            normalize_invite_email(&email),
            Err(InviteValidationError::EmailTooLong(254))
        );
    }
}
