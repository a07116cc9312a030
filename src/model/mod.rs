//! Core data types for to-do lists
//!
//! - `ListId`: Identifier of a to-do list (`todo.<name>`)
//! - `TodoItem`: A single task as reported by the item service
//! - `NewTodoItem` / `ItemUpdate`: Mutation payloads
//! - `Due` / `DueState`: Parsed due dates and their relation to "now"

mod item;
mod list_id;

pub use item::{Due, DueState, ItemUpdate, NewTodoItem, TodoItem, TodoItemStatus, Uid};
pub use list_id::{ListId, ListIdError, TODO_DOMAIN};
