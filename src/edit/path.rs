//! Locate-and-rewrite primitives shared by every mutation.
//!
//! Mutations clone the input tree, then use these helpers to reach the list
//! or item they rewrite in the private copy. Callers never see a half-edited
//! tree: on error the copy is simply dropped.

use crate::error::StructuralError;
use crate::menu::{find_context, Children, Column, Container, Item, MenuTree, NodeId};

/// Mutable lookup of an item anywhere below `items`.
pub(crate) fn item_mut<'a>(items: &'a mut [Item], id: &NodeId) -> Option<&'a mut Item> {
    for item in items.iter_mut() {
        if &item.id == id {
            return Some(item);
        }
        if item.contains(id) {
            let Children { submenu, columns } = &mut item.children;
            if submenu.iter().any(|child| &child.id == id || child.contains(id)) {
                return item_mut(submenu, id);
            }
            return columns.iter_mut().find_map(|column| item_mut(&mut column.items, id));
        }
    }
    None
}

/// Like [`item_mut`] but reports a missing id.
pub(crate) fn require_item<'a>(
    tree: &'a mut MenuTree,
    id: &NodeId,
) -> Result<&'a mut Item, StructuralError> {
    item_mut(&mut tree.roots, id).ok_or_else(|| StructuralError::not_found(id))
}

/// The column `column_id` of `owner`.
pub(crate) fn column_mut<'a>(
    owner: &'a mut Item,
    column_id: &NodeId,
) -> Result<&'a mut Column, StructuralError> {
    owner
        .children
        .columns
        .iter_mut()
        .find(|column| &column.id == column_id)
        .ok_or_else(|| StructuralError::not_found(column_id))
}

/// The item list addressed by `container`.
pub(crate) fn container_mut<'a>(
    tree: &'a mut MenuTree,
    container: &Container,
) -> Result<&'a mut Vec<Item>, StructuralError> {
    match container {
        Container::Root => Ok(&mut tree.roots),
        Container::Submenu(owner) => Ok(&mut require_item(tree, owner)?.children.submenu),
        Container::Column { owner, column } => {
            Ok(&mut column_mut(require_item(tree, owner)?, column)?.items)
        }
    }
}

/// Rewrites `order` to match list position.
pub(crate) fn renumber(items: &mut [Item]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.order = index;
    }
}

/// Rewrites column `order` to match list position.
pub(crate) fn renumber_columns(columns: &mut [Column]) {
    for (index, column) in columns.iter_mut().enumerate() {
        column.order = index;
    }
}

/// Sets level and parent of `item`, cascading through its whole subtree.
pub(crate) fn relevel(item: &mut Item, level: usize, parent: Option<&NodeId>) {
    item.level = level;
    item.parent_id = parent.cloned();
    let id = item.id.clone();
    for column in &mut item.children.columns {
        column.parent_id = id.clone();
    }
    for child in item.children.items_mut() {
        relevel(child, level + 1, Some(&id));
    }
}

/// Removes an item (with its subtree) and renumbers the list it left.
pub(crate) fn detach(
    tree: &mut MenuTree,
    id: &NodeId,
) -> Result<(Item, Container), StructuralError> {
    let (container, index) = {
        let ctx = find_context(tree, id).ok_or_else(|| StructuralError::not_found(id))?;
        (ctx.container(), ctx.index)
    };
    let list = container_mut(tree, &container)?;
    let item = list.remove(index);
    renumber(list);
    Ok((item, container))
}

/// Inserts `item` into `container` at `index` (clamped; `None` appends),
/// fixing level and parent for the whole subtree and renumbering the list.
pub(crate) fn attach(
    tree: &mut MenuTree,
    container: &Container,
    index: Option<usize>,
    mut item: Item,
) -> Result<(), StructuralError> {
    let (level, parent) = match container.owner() {
        None => (0, None),
        Some(owner) => {
            let owner = require_item(tree, owner)?;
            (owner.level + 1, Some(owner.id.clone()))
        }
    };
    relevel(&mut item, level, parent.as_ref());

    let list = container_mut(tree, container)?;
    let at = index.map_or(list.len(), |i| i.min(list.len()));
    list.insert(at, item);
    renumber(list);
    Ok(())
}
