//! Membership domain module

mod repository;

#[cfg(test)]
pub use repository::MockMembershipRepository;
pub use repository::MembershipRepository;
