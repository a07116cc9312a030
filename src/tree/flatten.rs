//! Flatten the tree back into display order

use super::builder::ParentItem;
use crate::model::TodoItem;

/// Each parent followed immediately by its children
pub fn flatten_tree(tree: Vec<ParentItem>) -> Vec<TodoItem> {
    let mut result = Vec::with_capacity(tree.iter().map(ParentItem::item_count).sum());
    for record in tree {
        result.push(record.item);
        result.extend(record.children);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    #[test]
    fn test_flatten_tree() {
        let items = vec![
            TodoItem::new("1", "Root 1"),
            TodoItem::new("2", "Root 2"),
            TodoItem::new("3", "Child of 1").parent("1"),
            TodoItem::new("4", "Child of 2").parent("2"),
        ];

        let flat = flatten_tree(build_tree(&items));
        let uids: Vec<_> = flat.iter().map(|i| i.uid.as_str()).collect();
        assert_eq!(uids, vec!["1", "3", "2", "4"]);
    }
}
