//! # tasktree
//!
//! Hierarchical to-do lists: items with one level of sub items, shown through
//! list cards that filter, sort and reorder them, with drag-and-drop between
//! lists.
//!
//! ## Modules
//!
//! - [`model`]: Items, statuses, due dates and list identifiers
//! - [`tree`]: Build, filter, sort and flatten the item tree a card displays
//! - [`service`]: Async item service trait with in-memory and SQLite backends
//! - [`card`]: A list card and its operations
//! - [`dnd`]: Drag sessions and predecessor-based reordering
//! - [`transfer`]: Moving an item with its children to another list
//! - [`board`]: Shared context for the cards on one page
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tasktree::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = SqliteTodoService::open_in_memory(NotifierConfig::default())?;
//!     let shopping = ListId::parse("todo.shopping")?;
//!     service.create_list(&shopping).await?;
//!
//!     let board = Arc::new(TodoBoard::new(Arc::new(service)));
//!     let mut card = TodoListCard::new(CardConfig::new("todo.shopping"), board)?;
//!     card.subscribe().await?;
//!
//!     let milk = card.add_item("Milk").await?;
//!     card.add_sub_item(&milk.uid, "Oat, not dairy").await?;
//!     card.poll_updates().await;
//!
//!     for item in card.unchecked_items() {
//!         println!("{}", item.summary);
//!     }
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod card;
pub mod config;
pub mod dnd;
pub mod logging;
pub mod model;
pub mod service;
pub mod transfer;
pub mod tree;

// Re-export top-level types for convenience
pub use model::{Due, DueState, ItemUpdate, ListId, ListIdError, NewTodoItem, TodoItem, TodoItemStatus, Uid};

pub use tree::{build_tree, display_order, ParentItem, SortDirection, SortKey, SortOrder};

pub use service::{
    MemoryTodoService, NotifierConfig, ServiceError, ServiceResult, SqliteTodoService,
    Subscription, TodoService,
};

pub use card::{CardConfig, CardError, CardEvent, CardResult, DropOutcome, TodoListCard};

pub use dnd::{DragCoordinator, DragPhase, DropTarget, ReorderPlan};

pub use transfer::{TransferError, TransferReport, TransferRequest, TransferStep};

pub use board::TodoBoard;

pub use config::{Config, ConfigError, LogFormat, LoggingConfig};
