//! Invite infrastructure: token generation and the invite lifecycle

mod generator;
mod service;

pub use generator::{GeneratedInviteToken, InviteTokenGenerator};
pub use service::{AcceptedInvite, CreatedInvite, InviteConfig, InviteService};
