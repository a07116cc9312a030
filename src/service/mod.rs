//! Item Service
//!
//! The seam between the to-do cards and wherever the items actually live.
//!
//! - **TodoService**: Async trait for reading, subscribing to and mutating lists
//! - **Subscription**: Full item sets pushed after every change
//! - **MemoryTodoService**: In-process implementation
//! - **SqliteTodoService**: rusqlite-backed implementation used by the CLI
//!
//! Ordering inside a list is predecessor based: `move_item(list, uid, after)`
//! places `uid` directly after `after`, or first when `after` is `None`.

mod error;
mod memory;
mod notifier;
mod sqlite;

pub use error::{ServiceError, ServiceResult};
pub use memory::MemoryTodoService;
pub use notifier::{ItemsUpdate, Notifier, NotifierConfig};
pub use sqlite::SqliteTodoService;

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::model::{ItemUpdate, ListId, NewTodoItem, TodoItem};

/// Common trait for item services
#[async_trait]
pub trait TodoService: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// All known lists
    async fn lists(&self) -> ServiceResult<Vec<ListId>>;

    /// Register an empty list; returns false if it already existed
    async fn create_list(&self, list: &ListId) -> ServiceResult<bool>;

    /// Remove a list with all of its items and close its subscriptions
    async fn delete_list(&self, list: &ListId) -> ServiceResult<()>;

    /// Current full item set of a list, in list order
    async fn items(&self, list: &ListId) -> ServiceResult<Vec<TodoItem>>;

    /// Subscribe to full item set pushes for a list
    async fn subscribe(&self, list: &ListId) -> ServiceResult<Subscription>;

    /// Create an item at the end of the list and return it with its new uid.
    ///
    /// A parent must be a top-level item of the same list; sub items cannot
    /// have children of their own.
    async fn create(&self, list: &ListId, item: NewTodoItem) -> ServiceResult<TodoItem>;

    /// Update fields of an existing item
    async fn update(&self, list: &ListId, update: ItemUpdate) -> ServiceResult<TodoItem>;

    /// Delete items; fails without deleting anything if a uid is unknown.
    ///
    /// A uid listed more than once is deleted once.
    async fn delete(&self, list: &ListId, uids: &[String]) -> ServiceResult<()>;

    /// Move `uid` directly after `after`, or to the front when `after` is `None`
    async fn move_item(&self, list: &ListId, uid: &str, after: Option<&str>) -> ServiceResult<()>;
}

/// Live view of a list's item set
#[derive(Debug)]
pub struct Subscription {
    list: ListId,
    snapshot: Vec<TodoItem>,
    receiver: broadcast::Receiver<ItemsUpdate>,
}

impl Subscription {
    pub fn new(
        list: ListId,
        snapshot: Vec<TodoItem>,
        receiver: broadcast::Receiver<ItemsUpdate>,
    ) -> Self {
        Self {
            list,
            snapshot,
            receiver,
        }
    }

    pub fn list(&self) -> &ListId {
        &self.list
    }

    /// Item set at the time of subscribing
    pub fn snapshot(&self) -> &[TodoItem] {
        &self.snapshot
    }

    /// Drain pending pushes without waiting and return the newest
    pub fn latest(&mut self) -> Option<Vec<TodoItem>> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(update) => latest = Some(update.items),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(list = %self.list, skipped, "Subscription lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        latest
    }

    /// Wait for the next push; skips ahead to the newest one if several are queued.
    ///
    /// Returns `None` once the service side is gone.
    pub async fn next(&mut self) -> Option<Vec<TodoItem>> {
        loop {
            match self.receiver.recv().await {
                Ok(update) => {
                    return Some(self.latest().unwrap_or(update.items));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(list = %self.list, skipped, "Subscription lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Stop receiving pushes
    pub fn unsubscribe(self) {
        tracing::debug!(list = %self.list, "Unsubscribed");
    }
}
