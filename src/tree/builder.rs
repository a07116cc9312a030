//! Tree builder
//!
//! Groups a flat item set into top-level records with their children.

use crate::model::TodoItem;
use std::collections::{HashMap, HashSet};

/// A top-level item with its direct children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentItem {
    pub item: TodoItem,
    pub children: Vec<TodoItem>,
}

impl ParentItem {
    pub fn new(item: TodoItem) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    /// Number of items in this record, parent included
    pub fn item_count(&self) -> usize {
        1 + self.children.len()
    }
}

/// Build the two-level tree.
///
/// Attachment does not depend on input order: a child listed before its parent is
/// still attached. Items whose parent is missing, or is itself a child, are promoted
/// to top level so every input item appears exactly once.
pub fn build_tree(items: &[TodoItem]) -> Vec<ParentItem> {
    let all_uids: HashSet<&str> = items.iter().map(|i| i.uid.as_str()).collect();

    // Pass 1: items that are not attached anywhere are roots
    let is_root = |item: &TodoItem| match item.parent.as_deref() {
        None => true,
        Some(parent) => !all_uids.contains(parent),
    };
    let root_uids: HashSet<&str> = items
        .iter()
        .filter(|i| is_root(i))
        .map(|i| i.uid.as_str())
        .collect();

    // Pass 2: collect children of roots, keep input order
    let mut children: HashMap<&str, Vec<TodoItem>> = HashMap::new();
    let mut top_level = Vec::new();
    for item in items {
        match item.parent.as_deref() {
            Some(parent) if root_uids.contains(parent) => {
                children.entry(parent).or_default().push(item.clone());
            }
            _ => top_level.push(item),
        }
    }

    top_level
        .into_iter()
        .map(|item| ParentItem {
            children: children.remove(item.uid.as_str()).unwrap_or_default(),
            item: item.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tree_basic() {
        let items = vec![
            TodoItem::new("1", "Root 1"),
            TodoItem::new("2", "Child of 1").parent("1"),
            TodoItem::new("3", "Root 2"),
            TodoItem::new("4", "Child of 1").parent("1"),
        ];

        let tree = build_tree(&items);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].item.uid, "1");
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].uid, "2");
        assert_eq!(tree[0].children[1].uid, "4");
        assert_eq!(tree[1].item.uid, "3");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_child_before_parent_is_attached() {
        let items = vec![
            TodoItem::new("c", "Child").parent("p"),
            TodoItem::new("p", "Parent"),
        ];

        let tree = build_tree(&items);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].item.uid, "p");
        assert_eq!(tree[0].children[0].uid, "c");
    }

    #[test]
    fn test_orphan_promoted_to_root() {
        let items = vec![TodoItem::new("o", "Orphan").parent("missing")];
        let tree = build_tree(&items);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].item.uid, "o");
    }

    #[test]
    fn test_grandchild_promoted_to_root() {
        let items = vec![
            TodoItem::new("1", "Root"),
            TodoItem::new("2", "Child").parent("1"),
            TodoItem::new("3", "Grandchild").parent("2"),
        ];

        let tree = build_tree(&items);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].item_count(), 2);
        assert_eq!(tree[1].item.uid, "3");
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(&[]).is_empty());
    }
}
