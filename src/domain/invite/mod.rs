//! Invite domain module
//!
//! Invites are issued by a team's manager for a target email and redeemed
//! at most once, before they expire, by whoever holds the link.

mod entity;
mod repository;
mod validation;

pub use entity::{Invite, InviteId};
#[cfg(test)]
pub use repository::MockInviteRepository;
pub use repository::InviteRepository;
pub use validation::{normalize_invite_email, InviteValidationError};
