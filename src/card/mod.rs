//! List Cards
//!
//! A card shows one to-do list: open items first, completed items after,
//! sub items under their parent. Cards share a [`TodoBoard`](crate::board::TodoBoard)
//! for service access and drag-and-drop between lists.

mod config;
mod error;
mod events;
mod list_card;

pub use config::CardConfig;
pub use error::{CardError, CardResult};
pub use events::CardEvent;
pub use list_card::{DropOutcome, TodoListCard};
