//! Item View Pipeline
//!
//! Turns the flat item set of a list into the sequence a card displays:
//!
//! ```text
//! items → build_tree → filter_tree → sort_tree → flatten_tree → display order
//! ```
//!
//! Every stage is a pure function; the tree is rebuilt from scratch whenever the
//! item set, the filter or the sort order changes.

mod builder;
mod filter;
mod flatten;
mod sort;

pub use builder::{build_tree, ParentItem};
pub use filter::filter_tree;
pub use flatten::flatten_tree;
pub use sort::{compare_summary, sort_tree, SortDirection, SortKey, SortOrder};

use crate::model::TodoItem;

/// Run the full pipeline and return the display order
pub fn display_order(items: &[TodoItem], filter: Option<&str>, order: SortOrder) -> Vec<TodoItem> {
    let tree = build_tree(items);
    let tree = filter_tree(tree, filter);
    let tree = sort_tree(tree, order);
    flatten_tree(tree)
}

/// Items still to be done, in the order given
pub fn unchecked_items(items: &[TodoItem]) -> Vec<TodoItem> {
    items.iter().filter(|i| !i.is_completed()).cloned().collect()
}

/// Completed items, in the order given
pub fn checked_items(items: &[TodoItem]) -> Vec<TodoItem> {
    items.iter().filter(|i| i.is_completed()).cloned().collect()
}
