//! Board
//!
//! The shared context every card on a page is created with. It owns the item
//! service, a snapshot cache of each list's items and the single drag
//! coordinator, so cards never have to discover each other.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::dnd::{apply_optimistic, DragCoordinator, DragPhase, DragSession, DropTarget};
use crate::model::{ListId, TodoItem, Uid};
use crate::service::{ServiceError, ServiceResult, TodoService};
use crate::transfer::{
    copy_item_tree, run_transfer, TransferError, TransferReport, TransferRequest,
    TransferResult,
};

pub struct TodoBoard {
    service: Arc<dyn TodoService>,
    lists: RwLock<HashMap<ListId, Vec<TodoItem>>>,
    drag: Mutex<DragCoordinator>,
}

impl TodoBoard {
    pub fn new(service: Arc<dyn TodoService>) -> Self {
        Self {
            service,
            lists: RwLock::new(HashMap::new()),
            drag: Mutex::new(DragCoordinator::new()),
        }
    }

    pub fn service(&self) -> &dyn TodoService {
        self.service.as_ref()
    }

    /// Re-fetch one list into the cache
    pub async fn refresh(&self, list: &ListId) -> ServiceResult<Vec<TodoItem>> {
        let items = self.service.items(list).await?;
        self.lists.write().await.insert(list.clone(), items.clone());
        Ok(items)
    }

    /// Re-fetch every list the service knows; returns the number of lists
    pub async fn refresh_all(&self) -> ServiceResult<usize> {
        let lists = self.service.lists().await?;
        let mut fetched = HashMap::with_capacity(lists.len());
        for list in lists {
            let items = self.service.items(&list).await?;
            fetched.insert(list, items);
        }

        let count = fetched.len();
        *self.lists.write().await = fetched;
        tracing::debug!(lists = count, "Board refreshed");
        Ok(count)
    }

    /// Record an item set pushed to a card
    pub async fn remember(&self, list: &ListId, items: Vec<TodoItem>) {
        self.lists.write().await.insert(list.clone(), items);
    }

    /// Cached items of a list, fetching it on first use
    pub async fn items(&self, list: &ListId) -> ServiceResult<Vec<TodoItem>> {
        if let Some(items) = self.lists.read().await.get(list) {
            return Ok(items.clone());
        }
        self.refresh(list).await
    }

    /// Locate an item by uid across all cached lists
    pub async fn find_item(&self, uid: &str) -> Option<(ListId, TodoItem)> {
        let lists = self.lists.read().await;
        lists.iter().find_map(|(list, items)| {
            items
                .iter()
                .find(|item| item.uid == uid)
                .map(|item| (list.clone(), item.clone()))
        })
    }

    /// Direct children of `uid` within `list`
    pub async fn children_of(&self, list: &ListId, uid: &str) -> ServiceResult<Vec<TodoItem>> {
        let items = self.items(list).await?;
        Ok(items
            .into_iter()
            .filter(|item| item.parent.as_deref() == Some(uid))
            .collect())
    }

    /// Copy an item and its children into `target`, leaving the source alone.
    ///
    /// Returns the uid of the copied parent.
    pub async fn add_item_to_target_list(&self, uid: &str, target: &ListId) -> TransferResult<Uid> {
        let (source, _) = match self.find_item(uid).await {
            Some(found) => found,
            None => {
                // The cache may predate the item
                if let Err(e) = self.refresh_all().await {
                    tracing::warn!(error = %e, "Board refresh failed");
                }
                self.find_item(uid)
                    .await
                    .ok_or_else(|| TransferError::UnknownItem(uid.to_string()))?
            }
        };

        let source_items = self
            .items(&source)
            .await
            .map_err(TransferError::SourceUnavailable)?;
        let created = copy_item_tree(self.service(), &source_items, &source, uid, target).await?;
        self.refresh_quietly(target).await;

        created
            .into_iter()
            .next()
            .ok_or_else(|| TransferError::UnknownItem(uid.to_string()))
    }

    /// Move `uid` after `previous` (or first) inside one list
    pub async fn move_item_in_order(
        &self,
        uid: &str,
        list: &ListId,
        previous: Option<&str>,
    ) -> ServiceResult<()> {
        self.service.move_item(list, uid, previous).await?;

        if let Some(items) = self.lists.write().await.get_mut(list) {
            apply_optimistic(items, uid, previous);
        }
        Ok(())
    }

    /// Delete an item together with its children
    pub async fn delete_item_from_list(&self, uid: &str, list: &ListId) -> ServiceResult<()> {
        let items = self.refresh(list).await?;
        if !items.iter().any(|item| item.uid == uid) {
            return Err(ServiceError::item_not_found(list, uid));
        }

        let uids: Vec<Uid> = items
            .iter()
            .filter(|item| item.uid == uid || item.parent.as_deref() == Some(uid))
            .map(|item| item.uid.clone())
            .collect();
        self.service.delete(list, &uids).await?;

        tracing::info!(list = %list, uid = %uid, count = uids.len(), "Deleted item tree");
        self.refresh_quietly(list).await;
        Ok(())
    }

    /// Delete a whole list and forget its cached items
    pub async fn delete_list(&self, list: &ListId) -> ServiceResult<()> {
        self.service.delete_list(list).await?;
        self.lists.write().await.remove(list);
        tracing::info!(list = %list, "Deleted list from board");
        Ok(())
    }

    /// Move an item and its children to another list
    pub async fn transfer(&self, request: TransferRequest) -> TransferResult<TransferReport> {
        if request.from == request.to {
            return Err(TransferError::SameList(request.from));
        }

        let source_items = match self.refresh(&request.from).await {
            Ok(items) => items,
            Err(ServiceError::ListNotFound(_)) => {
                return Err(TransferError::ItemNotFound {
                    list: request.from,
                    uid: request.uid,
                })
            }
            Err(e) => return Err(TransferError::SourceUnavailable(e)),
        };

        let result = run_transfer(self.service(), &source_items, &request).await;

        // Both lists may have changed even when the saga failed
        self.refresh_quietly(&request.from).await;
        self.refresh_quietly(&request.to).await;
        result
    }

    async fn refresh_quietly(&self, list: &ListId) {
        if let Err(e) = self.refresh(list).await {
            tracing::warn!(list = %list, error = %e, "Cache refresh failed");
        }
    }

    // Drag and drop

    pub async fn drag_start(&self, from: ListId, item: TodoItem) {
        self.drag.lock().await.start(from, item);
    }

    pub async fn drag_over(&self, list: &ListId, target: DropTarget) {
        self.drag.lock().await.over(list, target);
    }

    pub async fn drag_leave(&self, list: &ListId, target: &DropTarget) {
        self.drag.lock().await.leave(list, target);
    }

    /// Finish the gesture on `target`, handing back what was dragged
    pub async fn take_drop(&self, list: &ListId, target: &DropTarget) -> Option<DragSession> {
        self.drag.lock().await.release(list, target)
    }

    pub async fn cancel_drag(&self) {
        self.drag.lock().await.cancel();
    }

    pub async fn drag_phase(&self) -> DragPhase {
        self.drag.lock().await.phase()
    }

    pub async fn dragged_item(&self) -> Option<DragSession> {
        self.drag.lock().await.session().cloned()
    }

    /// The highlighted drop target, if any
    pub async fn active_drop_target(&self) -> Option<(ListId, DropTarget)> {
        self.drag
            .lock()
            .await
            .active_target()
            .map(|(list, target)| (list.clone(), target.clone()))
    }
}
