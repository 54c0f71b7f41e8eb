//! Profile infrastructure

mod service;

pub use service::ProfileService;
