//! User domain module
//!
//! Users live in the external identity provider. This module only models the
//! identifier and the identity the provider vouches for.

mod entity;
mod validation;

pub use entity::{AuthenticatedUser, UserId};
pub use validation::{validate_user_id, UserValidationError};
