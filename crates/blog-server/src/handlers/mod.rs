//! HTTP handlers

pub mod health;
pub mod posts;
pub mod users;

pub use health::{health, root};
