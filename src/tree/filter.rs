//! Case-insensitive summary filter

use super::builder::ParentItem;

/// Keep records whose parent or any child summary contains `filter`.
///
/// A matching record is kept whole, non-matching siblings included.
pub fn filter_tree(tree: Vec<ParentItem>, filter: Option<&str>) -> Vec<ParentItem> {
    let needle = match filter {
        Some(f) if !f.is_empty() => f.to_lowercase(),
        _ => return tree,
    };

    let matches = |summary: &str| summary.to_lowercase().contains(&needle);

    tree.into_iter()
        .filter(|record| {
            matches(&record.item.summary)
                || record.children.iter().any(|child| matches(&child.summary))
        })
        .collect()
}
