//! Auth module: who the current user is and what they may do.
//!
//! Token issuing lives outside this workspace; here we only resolve a user id
//! into a `CurrentUser` and answer ownership-based permission questions.

pub mod domain;
pub mod permissions;
pub mod repository;
pub mod repo;

pub use domain::{CurrentUser, EntityType, Permission};
pub use permissions::{Owned, Permissions};
