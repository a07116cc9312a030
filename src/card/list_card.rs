//! To-do list card
//!
//! Holds one list's item set plus the view state (filter, sort, reorder mode)
//! and turns user actions into service calls. The item set is only ever
//! replaced wholesale, by a subscription push or an optimistic reorder.

use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::config::CardConfig;
use super::error::{CardError, CardResult};
use super::events::CardEvent;
use crate::board::TodoBoard;
use crate::dnd::{apply_optimistic, predecessor_for_drop, DropTarget, ReorderPlan};
use crate::model::{Due, ItemUpdate, ListId, NewTodoItem, TodoItem, Uid};
use crate::service::Subscription;
use crate::transfer::{TransferReport, TransferRequest};
use crate::tree::{self, SortKey, SortOrder};

/// What a drop did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped where it already was
    Unchanged,
    Reordered(ReorderPlan),
    Transferred(TransferReport),
}

pub struct TodoListCard {
    config: CardConfig,
    list: ListId,
    board: Arc<TodoBoard>,
    items: Vec<TodoItem>,
    filter: Option<String>,
    sort: SortOrder,
    reordering: bool,
    subscription: Option<Subscription>,
    events: Option<mpsc::UnboundedSender<CardEvent>>,
}

impl TodoListCard {
    pub fn new(config: CardConfig, board: Arc<TodoBoard>) -> CardResult<Self> {
        let list = config.validate()?;
        Ok(Self {
            config,
            list,
            board,
            items: Vec::new(),
            filter: None,
            sort: SortOrder::default(),
            reordering: false,
            subscription: None,
            events: None,
        })
    }

    /// Receive this card's events from now on
    pub fn event_stream(&mut self) -> mpsc::UnboundedReceiver<CardEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn list(&self) -> &ListId {
        &self.list
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn card_size(&self) -> usize {
        self.config.card_size()
    }

    /// Current item set in list order
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn is_reordering(&self) -> bool {
        self.reordering
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    // Subscription

    /// Subscribe to the list and take its current items
    pub async fn subscribe(&mut self) -> CardResult<()> {
        self.unsubscribe();

        let result = self.board.service().subscribe(&self.list).await;
        let subscription = self.report("subscribe", result)?;
        let items = subscription.snapshot().to_vec();
        self.subscription = Some(subscription);
        self.apply_push(items).await;

        tracing::debug!(list = %self.list, "Card subscribed");
        Ok(())
    }

    /// Apply the newest pending push, if any, without waiting
    pub async fn poll_updates(&mut self) -> bool {
        let latest = self.subscription.as_mut().and_then(Subscription::latest);
        match latest {
            Some(items) => {
                self.apply_push(items).await;
                true
            }
            None => false,
        }
    }

    /// Wait for the next push; false once the subscription is gone
    pub async fn wait_for_update(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next().await {
            Some(items) => {
                self.apply_push(items).await;
                true
            }
            None => {
                tracing::debug!(list = %self.list, "Subscription closed");
                self.subscription = None;
                false
            }
        }
    }

    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    async fn apply_push(&mut self, items: Vec<TodoItem>) {
        self.board.remember(&self.list, items.clone()).await;
        self.set_items(items);
    }

    // View state

    /// Replace the whole item set
    pub fn set_items(&mut self, items: Vec<TodoItem>) {
        self.items = items;
        self.emit(CardEvent::ItemsUpdated {
            list: self.list.clone(),
            count: self.items.len(),
        });
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.filter = if text.is_empty() { None } else { Some(text) };
    }

    /// Pick a sort key; picking the active one again flips the direction
    pub fn sort_by_key(&mut self, key: Option<SortKey>) {
        self.sort.select(key);
    }

    /// Enter or leave reorder mode; either way the list goes back to list order
    pub fn toggle_reorder(&mut self) -> bool {
        self.reordering = !self.reordering;
        self.sort.clear();
        self.reordering
    }

    /// Items in display order: filtered, sorted, children after their parent
    pub fn display_items(&self) -> Vec<TodoItem> {
        tree::display_order(&self.items, self.filter.as_deref(), self.sort)
    }

    pub fn unchecked_items(&self) -> Vec<TodoItem> {
        tree::unchecked_items(&self.display_items())
    }

    pub fn checked_items(&self) -> Vec<TodoItem> {
        if self.config.hide_completed {
            return Vec::new();
        }
        tree::checked_items(&self.display_items())
    }

    /// Rows of the section a drop target sits in.
    ///
    /// The completed section starts after a separator, so its first row has
    /// no predecessor.
    fn section_rows(&self, target: &DropTarget) -> Vec<TodoItem> {
        let unchecked = self.unchecked_items();
        match target {
            DropTarget::Item { uid } if !unchecked.iter().any(|item| &item.uid == uid) => {
                self.checked_items()
            }
            _ => unchecked,
        }
    }

    fn find(&self, uid: &str) -> CardResult<&TodoItem> {
        self.items
            .iter()
            .find(|item| item.uid == uid)
            .ok_or_else(|| CardError::ItemNotFound(uid.to_string()))
    }

    // Item operations

    pub async fn add_item(&mut self, summary: &str) -> CardResult<TodoItem> {
        self.create_item("add_item", NewTodoItem::new(summary)).await
    }

    pub async fn add_sub_item(&mut self, parent_uid: &str, summary: &str) -> CardResult<TodoItem> {
        self.create_item("add_sub_item", NewTodoItem::new(summary).parent(parent_uid))
            .await
    }

    /// Add an item with every field filled in at once
    pub async fn add_detailed_item(&mut self, item: NewTodoItem) -> CardResult<TodoItem> {
        self.create_item("add_item", item).await
    }

    async fn create_item(&mut self, operation: &str, mut item: NewTodoItem) -> CardResult<TodoItem> {
        let summary = item.summary.trim();
        if summary.is_empty() {
            return Err(CardError::EmptySummary);
        }
        item.summary = summary.to_string();

        if let Some(parent) = item.parent.as_deref() {
            if self.find(parent)?.is_child() {
                return Err(CardError::InvalidParent(parent.to_string()));
            }
        }
        if let Some(due) = item.due.as_deref() {
            if Due::parse(due).is_none() {
                return Err(CardError::InvalidDue(due.to_string()));
            }
        }

        let result = self.board.service().create(&self.list, item).await;
        self.report(operation, result)
    }

    /// Toggle an item between open and completed
    pub async fn complete_item(&mut self, uid: &str) -> CardResult<TodoItem> {
        let item = self.find(uid)?;
        let update = ItemUpdate::new(uid)
            .summary(item.summary.clone())
            .status(item.status.toggled());

        let result = self.board.service().update(&self.list, update).await;
        self.report("complete_item", result)
    }

    /// Change summary, description or due date of an item.
    ///
    /// Status changes go through [`complete_item`](Self::complete_item).
    pub async fn edit_item(&mut self, mut update: ItemUpdate) -> CardResult<TodoItem> {
        self.find(&update.uid)?;
        if let Some(summary) = update.summary.take() {
            let summary = summary.trim();
            if summary.is_empty() {
                return Err(CardError::EmptySummary);
            }
            update.summary = Some(summary.to_string());
        }
        if let Some(due) = update.due.as_deref() {
            if !due.is_empty() && Due::parse(due).is_none() {
                return Err(CardError::InvalidDue(due.to_string()));
            }
        }
        update.status = None;

        let result = self.board.service().update(&self.list, update).await;
        self.report("edit_item", result)
    }

    pub async fn delete_item(&mut self, uid: &str) -> CardResult<()> {
        self.find(uid)?;
        let result = self
            .board
            .service()
            .delete(&self.list, &[uid.to_string()])
            .await;
        self.report("delete_item", result)
    }

    /// Delete every completed item; returns how many there were
    pub async fn clear_completed(&mut self) -> CardResult<usize> {
        let uids: Vec<Uid> = self
            .items
            .iter()
            .filter(|item| item.is_completed())
            .map(|item| item.uid.clone())
            .collect();
        if uids.is_empty() {
            return Ok(0);
        }

        let result = self.board.service().delete(&self.list, &uids).await;
        self.report("clear_completed", result)?;
        Ok(uids.len())
    }

    /// Reorder from a sortable "item moved" event in the open section.
    ///
    /// Rows include the section header. Returns `None` when nothing moved.
    pub async fn move_item(&mut self, old_row: usize, new_row: usize) -> CardResult<Option<ReorderPlan>> {
        let unchecked = self.unchecked_items();
        let plan = ReorderPlan::from_visual(&unchecked, old_row, new_row)?;
        if plan.is_noop() {
            return Ok(None);
        }

        self.reorder(&plan).await?;
        Ok(Some(plan))
    }

    async fn reorder(&mut self, plan: &ReorderPlan) -> CardResult<()> {
        apply_optimistic(&mut self.items, &plan.uid, plan.after.as_deref());

        let result = self
            .board
            .move_item_in_order(&plan.uid, &self.list, plan.after.as_deref())
            .await;
        self.report("move_item", result)?;

        self.emit(CardEvent::ItemMoved {
            list: self.list.clone(),
            uid: plan.uid.clone(),
            after: plan.after.clone(),
        });
        Ok(())
    }

    // Drag and drop

    /// Pick up one of this card's items
    pub async fn drag_start(&mut self, uid: &str) -> CardResult<()> {
        let item = self.find(uid)?.clone();
        self.board.drag_start(self.list.clone(), item).await;
        Ok(())
    }

    pub async fn drag_over(&self, target: DropTarget) {
        self.board.drag_over(&self.list, target).await;
    }

    pub async fn drag_leave(&self, target: &DropTarget) {
        self.board.drag_leave(&self.list, target).await;
    }

    /// Release the dragged item on one of this card's targets
    pub async fn drop_on(&mut self, target: DropTarget) -> CardResult<DropOutcome> {
        let session = self
            .board
            .take_drop(&self.list, &target)
            .await
            .ok_or(CardError::NotDragging)?;

        let after = predecessor_for_drop(&self.section_rows(&target), &self.items, &target)?;

        if session.from == self.list {
            let plan = ReorderPlan {
                uid: session.item.uid,
                after,
            };
            if plan.is_noop() {
                return Ok(DropOutcome::Unchanged);
            }
            self.reorder(&plan).await?;
            return Ok(DropOutcome::Reordered(plan));
        }

        let request = TransferRequest {
            uid: session.item.uid.clone(),
            from: session.from.clone(),
            to: self.list.clone(),
            after,
        };
        let result = self.board.transfer(request).await;
        let report = self.report("transfer", result)?;

        self.emit(CardEvent::ItemTransferred {
            from: session.from,
            to: self.list.clone(),
            uid: session.item.uid,
            new_uid: report.new_uid.clone(),
        });
        Ok(DropOutcome::Transferred(report))
    }

    // Plumbing

    fn emit(&self, event: CardEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                tracing::trace!(list = %self.list, "Card event receiver dropped");
            }
        }
    }

    /// Log a failed service call and announce it, then hand the error back
    fn report<T, E>(&self, operation: &str, result: Result<T, E>) -> CardResult<T>
    where
        E: Into<CardError> + Display,
    {
        result.map_err(|e| {
            tracing::error!(list = %self.list, operation, error = %e, "Card operation failed");
            self.emit(CardEvent::failed(&self.list, operation, &e));
            e.into()
        })
    }
}

impl Drop for TodoListCard {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TodoItemStatus;
    use crate::service::{MemoryTodoService, ServiceError, TodoService};
    use crate::transfer::TransferError;
    use crate::tree::SortDirection;

    fn list(name: &str) -> ListId {
        ListId::parse(&format!("todo.{}", name)).unwrap()
    }

    fn service() -> Arc<MemoryTodoService> {
        Arc::new(
            MemoryTodoService::default()
                .with_list(
                    list("shopping"),
                    vec![
                        TodoItem::new("x", "X"),
                        TodoItem::new("y", "Y"),
                        TodoItem::new("z", "Z"),
                        TodoItem::new("done", "Milk").status(TodoItemStatus::Completed),
                    ],
                )
                .with_list(list("chores"), vec![TodoItem::new("v", "Vacuum")]),
        )
    }

    async fn card(board: &Arc<TodoBoard>, name: &str) -> TodoListCard {
        let mut card =
            TodoListCard::new(CardConfig::new(format!("todo.{}", name)), board.clone()).unwrap();
        card.subscribe().await.unwrap();
        card
    }

    fn uids(items: &[TodoItem]) -> Vec<&str> {
        items.iter().map(|i| i.uid.as_str()).collect()
    }

    #[tokio::test]
    async fn test_new_rejects_foreign_entity() {
        let board = Arc::new(TodoBoard::new(service()));
        let result = TodoListCard::new(CardConfig::new("sensor.kitchen"), board);
        assert!(matches!(result, Err(CardError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_subscribe_and_push() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut card = card(&board, "shopping").await;
        let mut events = card.event_stream();

        assert_eq!(card.items().len(), 4);
        assert!(card.is_subscribed());

        card.add_item("  Bread  ").await.unwrap();
        assert!(card.wait_for_update().await);
        assert_eq!(card.items().last().unwrap().summary, "Bread");
        assert_eq!(
            events.recv().await.unwrap(),
            CardEvent::ItemsUpdated {
                list: list("shopping"),
                count: 5
            }
        );

        // Nothing pending
        assert!(!card.poll_updates().await);

        card.unsubscribe();
        assert!(!card.is_subscribed());
        assert!(!card.wait_for_update().await);
    }

    #[tokio::test]
    async fn test_add_item_rejects_blank_summary() {
        let board = Arc::new(TodoBoard::new(service()));
        let mut card = card(&board, "shopping").await;
        assert!(matches!(
            card.add_item("   ").await,
            Err(CardError::EmptySummary)
        ));
    }

    #[tokio::test]
    async fn test_sub_items_only_under_top_level() {
        let board = Arc::new(TodoBoard::new(service()));
        let mut card = card(&board, "shopping").await;

        let child = card.add_sub_item("x", "Xylophone").await.unwrap();
        assert_eq!(child.parent.as_deref(), Some("x"));
        card.poll_updates().await;

        assert!(matches!(
            card.add_sub_item(&child.uid, "Too deep").await,
            Err(CardError::InvalidParent(_))
        ));
        assert!(matches!(
            card.add_sub_item("ghost", "Orphan").await,
            Err(CardError::ItemNotFound(_))
        ));

        // Child is displayed right after its parent
        let display = card.display_items();
        assert_eq!(display[1].uid, child.uid);
    }

    #[tokio::test]
    async fn test_add_detailed_item() {
        let board = Arc::new(TodoBoard::new(service()));
        let mut card = card(&board, "shopping").await;

        let item = card
            .add_detailed_item(
                NewTodoItem::new(" Yeast ")
                    .parent("y")
                    .due("2024-03-01T10:00:00Z")
                    .description("Dry"),
            )
            .await
            .unwrap();
        assert_eq!(item.summary, "Yeast");
        assert_eq!(item.parent.as_deref(), Some("y"));
        assert_eq!(item.description.as_deref(), Some("Dry"));

        assert!(matches!(
            card.add_detailed_item(NewTodoItem::new("Soon").due("tomorrowish"))
                .await,
            Err(CardError::InvalidDue(_))
        ));
        card.poll_updates().await;
        assert_eq!(card.items().len(), 5);
    }

    #[tokio::test]
    async fn test_complete_toggles_and_clear_completed() {
        let board = Arc::new(TodoBoard::new(service()));
        let mut card = card(&board, "shopping").await;

        let updated = card.complete_item("y").await.unwrap();
        assert!(updated.is_completed());
        card.poll_updates().await;
        assert_eq!(uids(&card.checked_items()), vec!["y", "done"]);

        let reopened = card.complete_item("done").await.unwrap();
        assert_eq!(reopened.status, TodoItemStatus::NeedsAction);
        card.poll_updates().await;

        assert_eq!(card.clear_completed().await.unwrap(), 1);
        card.poll_updates().await;
        assert!(card.checked_items().is_empty());
        assert_eq!(card.clear_completed().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_hide_completed() {
        let board = Arc::new(TodoBoard::new(service()));
        let mut card = TodoListCard::new(
            CardConfig::new("todo.shopping").hide_completed(true),
            board,
        )
        .unwrap();
        card.subscribe().await.unwrap();

        assert!(card.checked_items().is_empty());
        assert_eq!(card.unchecked_items().len(), 3);
    }

    #[tokio::test]
    async fn test_filter_and_sort() {
        let board = Arc::new(TodoBoard::new(service()));
        let mut card = card(&board, "shopping").await;

        card.set_filter("y");
        assert_eq!(uids(&card.display_items()), vec!["y"]);
        card.set_filter("");
        assert_eq!(card.display_items().len(), 4);

        card.sort_by_key(Some(SortKey::Summary));
        assert_eq!(card.sort_order().direction, SortDirection::Asc);
        card.sort_by_key(Some(SortKey::Summary));
        assert_eq!(card.sort_order().direction, SortDirection::Desc);
        assert_eq!(uids(&card.unchecked_items()), vec!["z", "y", "x"]);

        // Reorder mode drops the sort key
        assert!(card.toggle_reorder());
        assert_eq!(card.sort_order().key, None);
        assert_eq!(uids(&card.unchecked_items()), vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_move_item_is_optimistic() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut card = card(&board, "shopping").await;
        let mut events = card.event_stream();

        // Z from row 3 to row 1
        let plan = card.move_item(3, 1).await.unwrap().unwrap();
        assert_eq!(plan.after, None);
        assert_eq!(uids(&card.unchecked_items()), vec!["z", "x", "y"]);
        assert_eq!(
            events.recv().await.unwrap(),
            CardEvent::ItemMoved {
                list: list("shopping"),
                uid: "z".to_string(),
                after: None
            }
        );

        let stored = service.items(&list("shopping")).await.unwrap();
        assert_eq!(uids(&stored)[..3], ["z", "x", "y"]);

        assert!(card.move_item(2, 2).await.unwrap().is_none());
        assert!(matches!(
            card.move_item(0, 1).await,
            Err(CardError::IndexOutOfRange { row: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_call_is_reported() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut card = card(&board, "shopping").await;
        let mut events = card.event_stream();

        // Deleted elsewhere; the card has not seen the push yet
        service
            .delete(&list("shopping"), &["y".to_string()])
            .await
            .unwrap();

        let err = card.complete_item("y").await.unwrap_err();
        assert!(matches!(
            err,
            CardError::Service(ServiceError::ItemNotFound { .. })
        ));
        match events.recv().await.unwrap() {
            CardEvent::OperationFailed { operation, .. } => assert_eq!(operation, "complete_item"),
            other => panic!("Expected OperationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_drop_without_drag() {
        let board = Arc::new(TodoBoard::new(service()));
        let mut card = card(&board, "shopping").await;
        assert!(matches!(
            card.drop_on(DropTarget::EndZone).await,
            Err(CardError::NotDragging)
        ));
    }

    #[tokio::test]
    async fn test_drop_same_list_reorders() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut card = card(&board, "shopping").await;

        card.drag_start("z").await.unwrap();
        card.drag_over(DropTarget::item("y")).await;
        let outcome = card.drop_on(DropTarget::item("y")).await.unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Reordered(ReorderPlan {
                uid: "z".to_string(),
                after: Some("x".to_string())
            })
        );
        assert_eq!(uids(card.items())[..3], ["x", "z", "y"]);
        assert!(board.active_drop_target().await.is_none());

        // Dropping right before the next row puts it where it already is
        card.drag_start("x").await.unwrap();
        let outcome = card.drop_on(DropTarget::item("z")).await.unwrap();
        assert_eq!(outcome, DropOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_drop_on_first_completed_row_moves_to_front() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut card = card(&board, "shopping").await;

        card.drag_start("z").await.unwrap();
        let outcome = card.drop_on(DropTarget::item("done")).await.unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Reordered(ReorderPlan {
                uid: "z".to_string(),
                after: None
            })
        );

        let stored = service.items(&list("shopping")).await.unwrap();
        assert_eq!(uids(&stored), vec!["z", "x", "y", "done"]);
    }

    #[tokio::test]
    async fn test_drop_sub_item_tree_into_other_list() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut shopping = card(&board, "shopping").await;
        let mut chores = card(&board, "chores").await;

        let child = shopping.add_sub_item("x", "Xylophone").await.unwrap();
        shopping.poll_updates().await;
        // Sub items never take children, so nothing is left behind
        assert!(service
            .create(&list("shopping"), NewTodoItem::new("Deeper").parent(child.uid.clone()))
            .await
            .is_err());

        shopping.drag_start("x").await.unwrap();
        let outcome = chores.drop_on(DropTarget::EndZone).await.unwrap();
        let report = match outcome {
            DropOutcome::Transferred(report) => report,
            other => panic!("Expected a transfer, got {:?}", other),
        };
        assert_eq!(report.removed, vec!["x".to_string(), child.uid.clone()]);

        let left = service.items(&list("shopping")).await.unwrap();
        assert!(left
            .iter()
            .all(|i| i.parent.is_none() || left.iter().any(|p| Some(&p.uid) == i.parent.as_ref())));
        assert_eq!(uids(&left), vec!["y", "z", "done"]);
    }

    #[tokio::test]
    async fn test_edit_item() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut card = card(&board, "shopping").await;

        let edited = card
            .edit_item(
                ItemUpdate::new("x")
                    .summary("  Xerox  ")
                    .description("Two copies")
                    .due("2024-03-01"),
            )
            .await
            .unwrap();
        assert_eq!(edited.summary, "Xerox");
        assert_eq!(edited.description.as_deref(), Some("Two copies"));
        assert_eq!(edited.due.as_deref(), Some("2024-03-01"));
        assert!(!edited.is_completed());

        let cleared = card.edit_item(ItemUpdate::new("x").due("")).await.unwrap();
        assert_eq!(cleared.due, None);
        assert_eq!(cleared.summary, "Xerox");

        assert!(matches!(
            card.edit_item(ItemUpdate::new("x").summary(" ")).await,
            Err(CardError::EmptySummary)
        ));
        assert!(matches!(
            card.edit_item(ItemUpdate::new("x").due("someday")).await,
            Err(CardError::InvalidDue(_))
        ));
        assert!(matches!(
            card.edit_item(ItemUpdate::new("ghost").summary("Boo")).await,
            Err(CardError::ItemNotFound(_))
        ));

        // Status is left to complete_item
        let kept = card
            .edit_item(ItemUpdate::new("y").status(TodoItemStatus::Completed))
            .await
            .unwrap();
        assert!(!kept.is_completed());
    }

    #[tokio::test]
    async fn test_drop_other_list_transfers() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut shopping = card(&board, "shopping").await;
        let mut chores = card(&board, "chores").await;
        let mut events = chores.event_stream();

        shopping.drag_start("x").await.unwrap();
        let outcome = chores.drop_on(DropTarget::EndZone).await.unwrap();

        let report = match outcome {
            DropOutcome::Transferred(report) => report,
            other => panic!("Expected a transfer, got {:?}", other),
        };
        assert_eq!(report.removed, vec!["x"]);

        chores.poll_updates().await;
        assert_eq!(uids(chores.items()), vec!["v", report.new_uid.as_str()]);
        shopping.poll_updates().await;
        assert!(shopping.items().iter().all(|i| i.uid != "x"));

        let transferred = std::iter::from_fn(|| events.try_recv().ok())
            .find(|e| matches!(e, CardEvent::ItemTransferred { .. }));
        assert!(transferred.is_some());
    }

    #[tokio::test]
    async fn test_drop_transfer_of_vanished_item() {
        let service = service();
        let board = Arc::new(TodoBoard::new(service.clone()));
        let mut shopping = card(&board, "shopping").await;
        let mut chores = card(&board, "chores").await;

        shopping.drag_start("x").await.unwrap();
        service
            .delete(&list("shopping"), &["x".to_string()])
            .await
            .unwrap();

        let err = chores.drop_on(DropTarget::EndZone).await.unwrap_err();
        assert!(matches!(
            err,
            CardError::Transfer(TransferError::ItemNotFound { .. })
        ));
        assert_eq!(service.items(&list("chores")).await.unwrap().len(), 1);
    }
}
