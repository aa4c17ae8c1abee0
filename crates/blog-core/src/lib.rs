//! Blog Core Library
//!
//! Error taxonomy, request validation and the storage ports every backend
//! implements.

// Re-export pure types from blog-types
pub use blog_types::*;

pub mod error;
pub mod ports;
pub mod validate;

pub use error::{BlogError, Result};
