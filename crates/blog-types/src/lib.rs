//! Blog Types - Pure type definitions
//!
//! This crate contains only plain data types (entities, request bodies and
//! the tri-state [`Patch`] field) with no runtime or storage dependencies.

pub mod patch;
pub mod post;
pub mod user;

pub use patch::Patch;
pub use post::*;
pub use user::*;

/// Identifier of a post
pub type PostId = i64;

/// Identifier of a user
pub type UserId = i64;

/// Identifier of a profile
pub type ProfileId = i64;
