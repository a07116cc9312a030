//! Card Event Types
//!
//! Notifications a card emits to whoever renders it.

use serde::{Deserialize, Serialize};

use crate::model::{ListId, Uid};

/// Events sent from a card to its host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardEvent {
    /// The item set was replaced
    ItemsUpdated {
        list: ListId,
        /// Number of items in the new set
        count: usize,
    },
    /// An item was reordered within its list
    ItemMoved {
        list: ListId,
        uid: Uid,
        /// New predecessor; `None` means first
        after: Option<Uid>,
    },
    /// An item moved to another list under a new uid
    ItemTransferred {
        from: ListId,
        to: ListId,
        uid: Uid,
        new_uid: Uid,
    },
    /// A service call failed
    OperationFailed {
        list: ListId,
        /// Card operation that issued the call (e.g. "add_item")
        operation: String,
        message: String,
    },
}

impl CardEvent {
    pub fn failed(list: &ListId, operation: &str, message: impl ToString) -> Self {
        CardEvent::OperationFailed {
            list: list.clone(),
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}
