//! Team domain module
//!
//! A team is created by its owner, who becomes the team's manager. Everyone
//! else joins by redeeming an invite.

mod entity;
mod repository;
mod validation;

pub use entity::{Team, TeamId, TeamRole};
pub use repository::TeamRepository;
pub use validation::{validate_team_name, TeamValidationError};
