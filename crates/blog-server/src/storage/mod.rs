//! Storage layer
//!
//! Two interchangeable backends behind the `blog-core` ports:
//! DashMap tables in memory, or an embedded SQLite database.

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;
