//! Tree sorting by summary or due date

use super::builder::ParentItem;
use crate::model::TodoItem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Field used for sorting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Summary,
    Due,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(SortKey::Summary),
            "due" => Ok(SortKey::Due),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active sort key and direction; no key means input order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SortOrder {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Select a key from the sort menu.
    ///
    /// A different key starts ascending; the active key flips direction.
    pub fn select(&mut self, key: Option<SortKey>) {
        if self.key != key {
            self.key = key;
            self.direction = SortDirection::Asc;
        } else {
            self.direction = self.direction.reversed();
        }
    }

    /// Back to input order
    pub fn clear(&mut self) {
        self.key = None;
    }

    /// Compare two items under this order
    pub fn compare(&self, a: &TodoItem, b: &TodoItem) -> Ordering {
        match self.key {
            None => Ordering::Equal,
            Some(SortKey::Summary) => {
                let ord = compare_summary(&a.summary, &b.summary);
                match self.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            Some(SortKey::Due) => compare_due(a, b, self.direction),
        }
    }
}

/// Locale-style string comparison: case-insensitive first, then exact
pub fn compare_summary(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Undated items go last whatever the direction
fn compare_due(a: &TodoItem, b: &TodoItem, direction: SortDirection) -> Ordering {
    match (a.due_timestamp(), b.due_timestamp()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => x.cmp(&y),
            SortDirection::Desc => y.cmp(&x),
        },
    }
}

/// Sort top-level records, then each record's children, by the same order
pub fn sort_tree(mut tree: Vec<ParentItem>, order: SortOrder) -> Vec<ParentItem> {
    if order.key.is_none() {
        return tree;
    }

    tree.sort_by(|a, b| order.compare(&a.item, &b.item));
    for record in &mut tree {
        record.children.sort_by(|a, b| order.compare(a, b));
    }
    tree
}
