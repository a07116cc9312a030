//! Item service error types

use thiserror::Error;

/// Errors reported by an item service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The list does not exist
    #[error("List not found: {0}")]
    ListNotFound(String),

    /// An item uid is not present in the list
    #[error("Item not found: {uid} in {list}")]
    ItemNotFound { list: String, uid: String },

    /// The payload violates a service constraint
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Backing database failure
    #[error("Database error: {0}")]
    Database(String),

    /// The service cannot be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    pub fn item_not_found(list: impl ToString, uid: impl Into<String>) -> Self {
        ServiceError::ItemNotFound {
            list: list.to_string(),
            uid: uid.into(),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        ServiceError::Database(err.to_string())
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
