//! List card error types

use thiserror::Error;

use crate::dnd::ReorderError;
use crate::model::Uid;
use crate::service::ServiceError;
use crate::transfer::TransferError;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("Invalid card configuration: {0}")]
    InvalidConfig(String),

    #[error("Summary must not be empty")]
    EmptySummary,

    #[error("Invalid due date: {0}")]
    InvalidDue(String),

    #[error("Item not found: {0}")]
    ItemNotFound(Uid),

    /// Sub items cannot have sub items of their own
    #[error("Item {0} is a sub item and cannot take children")]
    InvalidParent(Uid),

    #[error("Row {row} is not an item row ({len} items displayed)")]
    IndexOutOfRange { row: usize, len: usize },

    #[error("No drag in progress")]
    NotDragging,

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl From<ReorderError> for CardError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::IndexOutOfRange { row, len } => CardError::IndexOutOfRange { row, len },
            ReorderError::TargetNotFound(uid) => CardError::ItemNotFound(uid),
        }
    }
}

pub type CardResult<T> = Result<T, CardError>;
