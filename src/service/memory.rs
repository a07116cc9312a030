//! In-memory item service
//!
//! Holds every list in a `tokio::sync::RwLock<HashMap<..>>` and publishes the full
//! item set through a [`Notifier`] after each mutation. Used by tests and as the
//! reference behavior for other implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Notifier, NotifierConfig, ServiceError, ServiceResult, Subscription, TodoService};
use crate::model::{ItemUpdate, ListId, NewTodoItem, TodoItem};

pub struct MemoryTodoService {
    lists: RwLock<HashMap<ListId, Vec<TodoItem>>>,
    notifier: Notifier,
}

impl MemoryTodoService {
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            notifier: Notifier::new(config),
        }
    }

    /// Builder: start with a list and its items
    pub fn with_list(mut self, list: ListId, items: Vec<TodoItem>) -> Self {
        self.lists.get_mut().insert(list, items);
        self
    }

    fn snapshot(lists: &HashMap<ListId, Vec<TodoItem>>, list: &ListId) -> ServiceResult<Vec<TodoItem>> {
        lists
            .get(list)
            .cloned()
            .ok_or_else(|| ServiceError::ListNotFound(list.to_string()))
    }
}

impl Default for MemoryTodoService {
    fn default() -> Self {
        Self::new(NotifierConfig::default())
    }
}

#[async_trait]
impl TodoService for MemoryTodoService {
    fn name(&self) -> &str {
        "memory"
    }

    async fn lists(&self) -> ServiceResult<Vec<ListId>> {
        let mut lists: Vec<ListId> = self.lists.read().await.keys().cloned().collect();
        lists.sort();
        Ok(lists)
    }

    async fn create_list(&self, list: &ListId) -> ServiceResult<bool> {
        let mut lists = self.lists.write().await;
        if lists.contains_key(list) {
            return Ok(false);
        }
        lists.insert(list.clone(), Vec::new());
        tracing::info!(list = %list, "Created list");
        Ok(true)
    }

    async fn delete_list(&self, list: &ListId) -> ServiceResult<()> {
        let removed = self
            .lists
            .write()
            .await
            .remove(list)
            .ok_or_else(|| ServiceError::ListNotFound(list.to_string()))?;

        let subscribers = self.notifier.subscriber_count(list);
        self.notifier.remove(list);
        tracing::info!(list = %list, items = removed.len(), subscribers, "Deleted list");
        Ok(())
    }

    async fn items(&self, list: &ListId) -> ServiceResult<Vec<TodoItem>> {
        Self::snapshot(&*self.lists.read().await, list)
    }

    async fn subscribe(&self, list: &ListId) -> ServiceResult<Subscription> {
        // Hold the read lock so no push slips between snapshot and receiver
        let lists = self.lists.read().await;
        let snapshot = Self::snapshot(&lists, list)?;
        let receiver = self.notifier.subscribe(list);
        tracing::debug!(list = %list, service = self.name(), "Subscribed");
        Ok(Subscription::new(list.clone(), snapshot, receiver))
    }

    async fn create(&self, list: &ListId, item: NewTodoItem) -> ServiceResult<TodoItem> {
        if item.summary.trim().is_empty() {
            return Err(ServiceError::InvalidItem("summary must not be empty".to_string()));
        }

        let mut lists = self.lists.write().await;
        let items = lists
            .get_mut(list)
            .ok_or_else(|| ServiceError::ListNotFound(list.to_string()))?;

        if let Some(parent) = &item.parent {
            match items.iter().find(|i| &i.uid == parent) {
                None => return Err(ServiceError::item_not_found(list, parent.clone())),
                Some(found) if found.is_child() => {
                    return Err(ServiceError::InvalidItem(format!(
                        "parent {} is itself a sub item",
                        parent
                    )))
                }
                Some(_) => {}
            }
        }

        let created = item.into_item(Uuid::new_v4().to_string());
        items.push(created.clone());
        self.notifier.publish(list, items.clone());

        tracing::debug!(list = %list, uid = %created.uid, "Created item");
        Ok(created)
    }

    async fn update(&self, list: &ListId, update: ItemUpdate) -> ServiceResult<TodoItem> {
        let mut lists = self.lists.write().await;
        let items = lists
            .get_mut(list)
            .ok_or_else(|| ServiceError::ListNotFound(list.to_string()))?;

        let item = items
            .iter_mut()
            .find(|i| i.uid == update.uid)
            .ok_or_else(|| ServiceError::item_not_found(list, update.uid.clone()))?;
        update.apply_to(item);
        let updated = item.clone();

        self.notifier.publish(list, items.clone());
        Ok(updated)
    }

    async fn delete(&self, list: &ListId, uids: &[String]) -> ServiceResult<()> {
        let mut lists = self.lists.write().await;
        let items = lists
            .get_mut(list)
            .ok_or_else(|| ServiceError::ListNotFound(list.to_string()))?;

        if let Some(missing) = uids.iter().find(|uid| !items.iter().any(|i| &i.uid == *uid)) {
            return Err(ServiceError::item_not_found(list, missing.clone()));
        }

        items.retain(|i| !uids.contains(&i.uid));
        self.notifier.publish(list, items.clone());

        tracing::debug!(list = %list, count = uids.len(), "Deleted items");
        Ok(())
    }

    async fn move_item(&self, list: &ListId, uid: &str, after: Option<&str>) -> ServiceResult<()> {
        let mut lists = self.lists.write().await;
        let items = lists
            .get_mut(list)
            .ok_or_else(|| ServiceError::ListNotFound(list.to_string()))?;

        let from = items
            .iter()
            .position(|i| i.uid == uid)
            .ok_or_else(|| ServiceError::item_not_found(list, uid))?;
        if let Some(after) = after {
            if !items.iter().any(|i| i.uid == after) {
                return Err(ServiceError::item_not_found(list, after));
            }
        }
        if after == Some(uid) {
            return Ok(());
        }

        let item = items.remove(from);
        let to = match after {
            None => 0,
            Some(after) => items
                .iter()
                .position(|i| i.uid == after)
                .map(|p| p + 1)
                .unwrap_or(items.len()),
        };
        items.insert(to, item);
        self.notifier.publish(list, items.clone());

        tracing::debug!(list = %list, uid = %uid, after = ?after, "Moved item");
        Ok(())
    }
}
