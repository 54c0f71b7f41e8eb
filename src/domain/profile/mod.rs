//! Profile domain module
//!
//! One profile per authenticated user, created lazily on first access.

mod entity;
mod repository;

pub use entity::Profile;
#[cfg(test)]
pub use repository::MockProfileRepository;
pub use repository::ProfileRepository;
