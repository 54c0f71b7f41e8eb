//! Domain layer - Core business logic and entities

pub mod error;
pub mod invite;
pub mod membership;
pub mod profile;
pub mod storage;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use invite::{Invite, InviteId};
pub use profile::Profile;
pub use team::{Team, TeamId, TeamRole};
pub use user::{AuthenticatedUser, UserId};
