//! Predecessor-based reordering
//!
//! Positions are expressed as "after item X" (or "first"), never as numeric
//! indices, so a request stays meaningful if the list shifts before it lands.

use thiserror::Error;

use super::session::DropTarget;
use crate::model::{TodoItem, Uid};

/// Non-item rows rendered above the first item (the "unchecked items" header)
pub const HEADER_ROWS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("Row {row} is not an item row ({len} items displayed)")]
    IndexOutOfRange { row: usize, len: usize },

    #[error("Drop target {0} is not displayed")]
    TargetNotFound(Uid),
}

/// A manual reorder resolved to "move `uid` after `after`"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub uid: Uid,
    /// `None` moves the item to the front
    pub after: Option<Uid>,
}

impl ReorderPlan {
    /// Resolve a sortable "item moved" event.
    ///
    /// `old_row` and `new_row` are visual rows including the header row; `items`
    /// are the open items as displayed.
    pub fn from_visual(items: &[TodoItem], old_row: usize, new_row: usize) -> Result<Self, ReorderError> {
        let old = item_index(items, old_row)?;
        let new = item_index(items, new_row)?;

        let after = if new == 0 {
            None
        } else if new < old {
            Some(items[new - 1].uid.clone())
        } else {
            Some(items[new].uid.clone())
        };

        Ok(Self {
            uid: items[old].uid.clone(),
            after,
        })
    }

    /// Moving an item after itself changes nothing
    pub fn is_noop(&self) -> bool {
        self.after.as_deref() == Some(self.uid.as_str())
    }
}

fn item_index(items: &[TodoItem], row: usize) -> Result<usize, ReorderError> {
    row.checked_sub(HEADER_ROWS)
        .filter(|index| *index < items.len())
        .ok_or(ReorderError::IndexOutOfRange {
            row,
            len: items.len(),
        })
}

/// Predecessor for a drag-and-drop release.
///
/// `displayed` is the row order the target belongs to; `items` the list's full
/// item set. Dropping on the first row means "first".
pub fn predecessor_for_drop(
    displayed: &[TodoItem],
    items: &[TodoItem],
    target: &DropTarget,
) -> Result<Option<Uid>, ReorderError> {
    match target {
        DropTarget::EndZone => Ok(items.last().map(|item| item.uid.clone())),
        DropTarget::Item { uid } => {
            let row = displayed
                .iter()
                .position(|item| &item.uid == uid)
                .ok_or_else(|| ReorderError::TargetNotFound(uid.clone()))?;
            Ok(row.checked_sub(1).map(|prev| displayed[prev].uid.clone()))
        }
    }
}

/// Move `uid` after `after` in the local copy ahead of the service round-trip.
///
/// Returns false, leaving `items` untouched, when either uid is missing or the
/// move is onto itself.
pub fn apply_optimistic(items: &mut Vec<TodoItem>, uid: &str, after: Option<&str>) -> bool {
    if after == Some(uid) {
        return false;
    }
    let Some(from) = items.iter().position(|item| item.uid == uid) else {
        return false;
    };
    if let Some(after) = after {
        if !items.iter().any(|item| item.uid == after) {
            return false;
        }
    }

    let item = items.remove(from);
    let to = match after {
        None => 0,
        Some(after) => items
            .iter()
            .position(|item| item.uid == after)
            .map(|prev| prev + 1)
            .unwrap_or(items.len()),
    };
    items.insert(to, item);
    true
}
