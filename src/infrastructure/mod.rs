//! Infrastructure layer - Storage, services and identity

pub mod auth;
pub mod invite;
pub mod logging;
pub mod profile;
pub mod storage;
pub mod team;
