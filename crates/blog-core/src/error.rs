//! Error types for the blog API

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlogError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlogError {
    /// Missing or malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// An id lookup missed, either for the target or a referenced entity
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlogError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        BlogError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Errors whose details must not reach the client
    pub fn is_internal(&self) -> bool {
        matches!(self, BlogError::Database(_) | BlogError::Internal(_))
    }
}
