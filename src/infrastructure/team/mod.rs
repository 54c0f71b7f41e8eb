//! Team infrastructure implementations

mod service;

pub use service::{TeamCreated, TeamOverview, TeamService};
