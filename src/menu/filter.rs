//! Search filtering over a menu tree.

use super::{Column, Item, MenuTree};

/// Case-insensitive substring match over label, route and description.
///
/// An empty (or whitespace-only) query matches everything.
#[must_use]
pub fn matches_query(item: &Item, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    std::iter::once(item.label.as_str())
        .chain(item.route.as_deref())
        .chain(item.description.as_deref())
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keeps every item that matches `predicate` or has a matching descendant.
///
/// A directly matching item is kept with its whole subtree. An item kept
/// only because of a descendant keeps just the branches leading to matches,
/// and columns emptied by the filter are dropped. Stored `order` and `level`
/// values are left untouched.
#[must_use]
pub fn filter_tree(tree: &MenuTree, predicate: impl Fn(&Item) -> bool) -> MenuTree {
    MenuTree::new(filter_items(&tree.roots, &predicate))
}

fn filter_items(items: &[Item], predicate: &impl Fn(&Item) -> bool) -> Vec<Item> {
    items.iter().filter_map(|item| filter_item(item, predicate)).collect()
}

fn filter_item(item: &Item, predicate: &impl Fn(&Item) -> bool) -> Option<Item> {
    if predicate(item) {
        return Some(item.clone());
    }

    let submenu = filter_items(&item.children.submenu, predicate);
    let columns: Vec<Column> = item
        .children
        .columns
        .iter()
        .filter_map(|column| {
            let items = filter_items(&column.items, predicate);
            (!items.is_empty()).then(|| Column { items, ..column.clone() })
        })
        .collect();

    if submenu.is_empty() && columns.is_empty() {
        return None;
    }

    let mut kept = item.clone();
    kept.children.submenu = submenu;
    kept.children.columns = columns;
    Some(kept)
}
