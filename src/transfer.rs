//! Cross-List Transfer
//!
//! An item cannot change its owning list in place, so moving it to another list
//! is a sequence of service calls:
//!
//! ```text
//! CopyParent → CopyChildren → Position → DeleteSource
//! ```
//!
//! Every uid created in the target list is recorded. If a step fails, the
//! copies are deleted again in one compensating call, and the caller receives
//! [`TransferError::PartialFailure`] telling which step broke and whether the
//! rollback succeeded.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::{ItemUpdate, ListId, NewTodoItem, TodoItem, TodoItemStatus, Uid};
use crate::service::{ServiceError, TodoService};

/// Move one item (with its children) from one list to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub uid: Uid,
    pub from: ListId,
    pub to: ListId,
    /// Predecessor in the target list; `None` puts the item first
    pub after: Option<Uid>,
}

/// Outcome of a completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    /// Uid of the copied parent in the target list
    pub new_uid: Uid,
    /// Every uid created in the target list, parent first
    pub created: Vec<Uid>,
    /// Uids removed from the source list
    pub removed: Vec<Uid>,
}

/// Saga steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStep {
    CopyParent,
    CopyChildren,
    Position,
    DeleteSource,
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferStep::CopyParent => "copy parent",
            TransferStep::CopyChildren => "copy children",
            TransferStep::Position => "position",
            TransferStep::DeleteSource => "delete source",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    /// The item is not in the source list; nothing was changed
    #[error("Item {uid} not found in {list}")]
    ItemNotFound { list: ListId, uid: Uid },

    /// The item is not in any list the board knows about
    #[error("Item {0} is not on the board")]
    UnknownItem(Uid),

    /// Reading the source list failed; nothing was changed
    #[error("Could not read source list: {0}")]
    SourceUnavailable(ServiceError),

    /// Source and target are the same list; use a reorder instead
    #[error("Source and target are the same list: {0}")]
    SameList(ListId),

    /// A step failed after earlier steps had been applied
    #[error("Transfer failed at step '{step}' (rolled back: {rolled_back}): {source}")]
    PartialFailure {
        step: TransferStep,
        source: ServiceError,
        /// True when every copy made in the target list was removed again
        rolled_back: bool,
        /// Copies still present in the target list
        leftover: Vec<Uid>,
    },
}

impl TransferError {
    pub fn is_partial(&self) -> bool {
        matches!(self, TransferError::PartialFailure { .. })
    }
}

pub type TransferResult<T> = Result<T, TransferError>;

/// Tracks what has been created in the target list
struct Saga<'a> {
    service: &'a dyn TodoService,
    target: &'a ListId,
    created: Vec<Uid>,
}

impl<'a> Saga<'a> {
    fn new(service: &'a dyn TodoService, target: &'a ListId) -> Self {
        Self {
            service,
            target,
            created: Vec::new(),
        }
    }

    /// Create a copy of `item` under `parent` and remember it
    async fn copy(&mut self, item: &TodoItem, parent: Option<&Uid>) -> Result<Uid, ServiceError> {
        let mut payload = NewTodoItem::copy_of(item);
        payload.parent = parent.cloned();

        let created = self.service.create(self.target, payload).await?;
        self.created.push(created.uid.clone());

        if item.status == TodoItemStatus::Completed {
            self.service
                .update(
                    self.target,
                    ItemUpdate::new(created.uid.clone()).status(TodoItemStatus::Completed),
                )
                .await?;
        }
        Ok(created.uid)
    }

    /// Undo every copy, then describe the failure
    async fn fail(self, step: TransferStep, source: ServiceError) -> TransferError {
        tracing::error!(
            list = %self.target,
            step = %step,
            error = %source,
            created = self.created.len(),
            "Transfer step failed; rolling back"
        );

        let (rolled_back, leftover) = if self.created.is_empty() {
            (true, Vec::new())
        } else {
            match self.service.delete(self.target, &self.created).await {
                Ok(()) => (true, Vec::new()),
                Err(e) => {
                    tracing::error!(
                        list = %self.target,
                        error = %e,
                        leftover = ?self.created,
                        "Rollback failed; copies left behind"
                    );
                    (false, self.created)
                }
            }
        };

        TransferError::PartialFailure {
            step,
            source,
            rolled_back,
            leftover,
        }
    }
}

fn find<'i>(items: &'i [TodoItem], list: &ListId, uid: &str) -> TransferResult<&'i TodoItem> {
    items
        .iter()
        .find(|item| item.uid == uid)
        .ok_or_else(|| TransferError::ItemNotFound {
            list: list.clone(),
            uid: uid.to_string(),
        })
}

fn children_of<'i>(items: &'i [TodoItem], uid: &str) -> Vec<&'i TodoItem> {
    items
        .iter()
        .filter(|item| item.parent.as_deref() == Some(uid))
        .collect()
}

/// Copy an item and its children into `target`.
///
/// Returns the created uids, parent first. Copies are removed again on failure.
pub async fn copy_item_tree(
    service: &dyn TodoService,
    source_items: &[TodoItem],
    source: &ListId,
    uid: &str,
    target: &ListId,
) -> TransferResult<Vec<Uid>> {
    let item = find(source_items, source, uid)?;
    let children = children_of(source_items, uid);

    let mut saga = Saga::new(service, target);
    let new_parent = match saga.copy(item, None).await {
        Ok(new_uid) => new_uid,
        Err(e) => return Err(saga.fail(TransferStep::CopyParent, e).await),
    };
    for child in children {
        if let Err(e) = saga.copy(child, Some(&new_parent)).await {
            return Err(saga.fail(TransferStep::CopyChildren, e).await);
        }
    }
    Ok(saga.created)
}

/// Run the full transfer saga.
///
/// `source_items` is the current item set of `request.from`.
pub async fn run_transfer(
    service: &dyn TodoService,
    source_items: &[TodoItem],
    request: &TransferRequest,
) -> TransferResult<TransferReport> {
    if request.from == request.to {
        return Err(TransferError::SameList(request.from.clone()));
    }

    let item = find(source_items, &request.from, &request.uid)?;
    let children = children_of(source_items, &request.uid);
    let originals: Vec<Uid> = std::iter::once(item.uid.clone())
        .chain(children.iter().map(|child| child.uid.clone()))
        .collect();

    tracing::info!(
        uid = %request.uid,
        from = %request.from,
        to = %request.to,
        children = children.len(),
        "Transferring item"
    );

    let mut saga = Saga::new(service, &request.to);

    let new_uid = match saga.copy(item, None).await {
        Ok(new_uid) => new_uid,
        Err(e) => return Err(saga.fail(TransferStep::CopyParent, e).await),
    };

    for child in &children {
        if let Err(e) = saga.copy(child, Some(&new_uid)).await {
            return Err(saga.fail(TransferStep::CopyChildren, e).await);
        }
    }

    if let Err(e) = service
        .move_item(&request.to, &new_uid, request.after.as_deref())
        .await
    {
        return Err(saga.fail(TransferStep::Position, e).await);
    }

    if let Err(e) = service.delete(&request.from, &originals).await {
        return Err(saga.fail(TransferStep::DeleteSource, e).await);
    }

    tracing::info!(uid = %request.uid, new_uid = %new_uid, "Transfer complete");
    Ok(TransferReport {
        new_uid,
        created: saga.created,
        removed: originals,
    })
}
