//! Structural mutations of a menu tree.
//!
//! Every operation borrows the current tree and returns a new one; the input
//! is never modified, so a failed edit leaves the caller's tree exactly as it
//! was. Order, level and parent ids are renumbered as part of each edit.

pub mod moves;
pub(crate) mod path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StructuralError, ValidationError};
use crate::menu::{find_by_id, Column, Container, Item, MenuTree, NodeId, Status, TempIds};

pub use moves::{move_column, move_item, DropIntent, Placement};

/// Appends a new pending item to the root list.
pub fn insert_root_item(tree: &MenuTree, ids: &mut TempIds) -> (MenuTree, NodeId) {
    let mut next = tree.clone();
    let id = ids.next_id();
    next.roots.push(Item::pending(id.clone(), None, next.roots.len()));
    debug!(item = %id, "inserted root item");
    (next, id)
}

/// Appends a new pending item to `parent`'s submenu.
///
/// # Errors
///
/// [`StructuralError::NotFound`] if `parent` does not exist.
pub fn insert_submenu_item(
    tree: &MenuTree,
    parent: &NodeId,
    ids: &mut TempIds,
) -> Result<(MenuTree, NodeId), StructuralError> {
    let mut next = tree.clone();
    let owner = path::require_item(&mut next, parent)?;
    let id = ids.next_id();
    let child = Item::pending(id.clone(), Some(&*owner), owner.children.submenu.len());
    owner.children.submenu.push(child);
    debug!(item = %id, parent = %parent, "inserted submenu item");
    Ok((next, id))
}

/// Adds an empty column in first position under `parent`; existing columns
/// shift down by one.
///
/// # Errors
///
/// [`StructuralError::NotFound`] if `parent` does not exist.
pub fn add_column(
    tree: &MenuTree,
    parent: &NodeId,
    ids: &mut TempIds,
) -> Result<(MenuTree, NodeId), StructuralError> {
    let mut next = tree.clone();
    let owner = path::require_item(&mut next, parent)?;
    let id = ids.next_id();
    let column = Column::new(id.clone(), owner, 0);
    owner.children.columns.insert(0, column);
    path::renumber_columns(&mut owner.children.columns);
    debug!(column = %id, parent = %parent, "added column");
    Ok((next, id))
}

/// Appends a new pending item to a column of `parent`.
///
/// # Errors
///
/// [`StructuralError::NotFound`] if the parent or the column does not exist.
pub fn add_item_to_column(
    tree: &MenuTree,
    parent: &NodeId,
    column: &NodeId,
    ids: &mut TempIds,
) -> Result<(MenuTree, NodeId), StructuralError> {
    let mut next = tree.clone();
    let owner = path::require_item(&mut next, parent)?;
    path::column_mut(owner, column)?;

    let id = ids.next_id();
    let template = Item::pending(id.clone(), Some(&*owner), 0);
    let target = path::column_mut(owner, column)?;
    target.items.push(Item { order: target.items.len(), ..template });
    debug!(item = %id, column = %column, "added item to column");
    Ok((next, id))
}

/// Changes a column's title.
///
/// # Errors
///
/// [`StructuralError::NotFound`] if the parent or the column does not exist.
pub fn rename_column(
    tree: &MenuTree,
    parent: &NodeId,
    column: &NodeId,
    title: &str,
) -> Result<MenuTree, StructuralError> {
    let mut next = tree.clone();
    let owner = path::require_item(&mut next, parent)?;
    path::column_mut(owner, column)?.title = title.trim().to_string();
    Ok(next)
}

/// Removes a column, moving its items to the end of the parent's submenu.
///
/// # Errors
///
/// [`StructuralError::NotFound`] if the parent or the column does not exist.
pub fn delete_column(
    tree: &MenuTree,
    parent: &NodeId,
    column: &NodeId,
) -> Result<MenuTree, StructuralError> {
    let mut next = tree.clone();
    let owner = path::require_item(&mut next, parent)?;
    let position = owner
        .children
        .columns
        .iter()
        .position(|c| &c.id == column)
        .ok_or_else(|| StructuralError::not_found(column))?;

    let removed = owner.children.columns.remove(position);
    path::renumber_columns(&mut owner.children.columns);

    let level = owner.level + 1;
    let owner_id = owner.id.clone();
    let relocated = removed.items.len();
    for mut item in removed.items {
        path::relevel(&mut item, level, Some(&owner_id));
        owner.children.submenu.push(item);
    }
    path::renumber(&mut owner.children.submenu);
    debug!(column = %column, parent = %parent, relocated, "deleted column");
    Ok(next)
}

/// Field changes for an item. `None` leaves a field alone; an empty string
/// clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemPatch {
    /// New label. Must not be blank.
    pub label: Option<String>,
    /// New route.
    pub route: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New icon identifier.
    pub icon: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
    /// New status.
    pub status: Option<Status>,
}

impl ItemPatch {
    /// Rejects values that can never be stored.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ValidationFailed`] for a blank label.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.label.as_deref().is_some_and(|label| label.trim().is_empty()) {
            return Err(ValidationError::ValidationFailed {
                field: "label".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Writes the patch onto `item`.
    pub fn apply(&self, item: &mut Item) {
        if let Some(label) = &self.label {
            item.label = label.trim().to_string();
        }
        if let Some(route) = &self.route {
            item.route = non_blank(route);
        }
        if let Some(description) = &self.description {
            item.description = non_blank(description);
        }
        if let Some(icon) = &self.icon {
            item.icon = non_blank(icon);
        }
        if let Some(is_public) = self.is_public {
            item.is_public = is_public;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Updates an item's own fields; order, level and parent are untouched.
///
/// # Errors
///
/// [`StructuralError::NotFound`] if `item` does not exist.
pub fn update_item_fields(
    tree: &MenuTree,
    item: &NodeId,
    patch: &ItemPatch,
) -> Result<MenuTree, StructuralError> {
    let mut next = tree.clone();
    patch.apply(path::require_item(&mut next, item)?);
    Ok(next)
}

/// Detaches an item with its whole subtree, returning both the new tree and
/// the removed item.
///
/// # Errors
///
/// [`StructuralError::NotFound`] if `item` does not exist.
pub fn remove_item(tree: &MenuTree, item: &NodeId) -> Result<(MenuTree, Item), StructuralError> {
    let mut next = tree.clone();
    let (removed, from) = path::detach(&mut next, item)?;
    debug!(item = %item, from = ?from, "removed item");
    Ok((next, removed))
}

/// Inserts an existing subtree into `container` at `index` (`None` appends).
///
/// # Errors
///
/// [`StructuralError::NotFound`] if the container does not exist, or
/// [`StructuralError::InvalidTarget`] if any id of `item` is already in use.
pub fn insert_item(
    tree: &MenuTree,
    container: &Container,
    index: Option<usize>,
    item: Item,
) -> Result<MenuTree, StructuralError> {
    let mut ids = Vec::new();
    collect_ids(&item, &mut ids);
    if let Some(id) = ids.into_iter().find(|id| find_by_id(tree, id).is_some()) {
        return Err(StructuralError::invalid(&item.id, id, "id already present in the tree"));
    }

    let mut next = tree.clone();
    path::attach(&mut next, container, index, item)?;
    Ok(next)
}

fn collect_ids<'a>(item: &'a Item, into: &mut Vec<&'a NodeId>) {
    into.push(&item.id);
    into.extend(item.children.columns.iter().map(|c| &c.id));
    for child in item.children.items() {
        collect_ids(child, into);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::fixtures::{item, tree, with_column, with_submenu};
    use crate::menu::locate::find_item;

    fn x_only() -> MenuTree {
        tree(vec![item("x", "X")])
    }

    #[test]
    fn insert_root_item_appends_pending() {
        let menu = x_only();
        let mut ids = TempIds::new();
        let (next, id) = insert_root_item(&menu, &mut ids);
        assert_eq!(id, NodeId::Temporary(1));
        assert_eq!(next.roots.len(), 2);
        assert_eq!(next.roots[1].order, 1);
        assert_eq!(next.roots[1].status, Status::Pending);
        assert_eq!(menu.roots.len(), 1, "input untouched");
        assert_eq!(next.check_invariants(), Ok(()));
    }

    #[test]
    fn add_column_then_item() {
        let menu = x_only();
        let mut ids = TempIds::new();
        let (menu, col) = add_column(&menu, &"x".into(), &mut ids).unwrap();
        let (menu, new_item) = add_item_to_column(&menu, &"x".into(), &col, &mut ids).unwrap();

        let x = &menu.roots[0];
        assert_eq!(x.children.columns[0].items.len(), 1);
        let added = &x.children.columns[0].items[0];
        assert_eq!(added.id, new_item);
        assert_eq!(added.order, 0);
        assert_eq!(added.level, x.level + 1);
        assert_eq!(added.parent_id, Some(x.id.clone()));
        assert_eq!(menu.check_invariants(), Ok(()));
    }

    #[test]
    fn new_columns_are_prepended() {
        let mut ids = TempIds::new();
        let (menu, first) = add_column(&x_only(), &"x".into(), &mut ids).unwrap();
        let (menu, second) = add_column(&menu, &"x".into(), &mut ids).unwrap();
        let columns = &menu.roots[0].children.columns;
        assert_eq!(columns[0].id, second);
        assert_eq!(columns[0].order, 0);
        assert_eq!(columns[1].id, first);
        assert_eq!(columns[1].order, 1);
    }

    #[test]
    fn add_item_to_missing_column_does_not_consume_an_id() {
        let mut ids = TempIds::new();
        let err = add_item_to_column(&x_only(), &"x".into(), &"nope".into(), &mut ids);
        assert_eq!(err, Err(StructuralError::NotFound { id: "nope".into() }));
        assert_eq!(ids.next_id(), NodeId::Temporary(1));
    }

    #[test]
    fn delete_column_relocates_items_to_submenu() {
        let menu = tree(vec![with_column(
            with_submenu(item("p", "P"), vec![item("s", "S")]),
            "col1",
            "Col",
            vec![item("c", "C")],
        )]);
        let next = delete_column(&menu, &"p".into(), &"col1".into()).unwrap();
        let p = &next.roots[0];
        assert!(p.children.columns.is_empty());
        assert_eq!(p.children.submenu.len(), 2);
        let c = &p.children.submenu[1];
        assert_eq!(c.id, NodeId::from("c"));
        assert_eq!(c.order, 1);
        assert_eq!(c.level, p.level + 1);
        assert_eq!(c.parent_id, Some(p.id.clone()));
        assert_eq!(next.check_invariants(), Ok(()));
    }

    #[test]
    fn deleting_last_column_item_keeps_column() {
        let menu = tree(vec![with_column(item("p", "P"), "col1", "Col", vec![item("c", "C")])]);
        let (next, _) = remove_item(&menu, &"c".into()).unwrap();
        assert_eq!(next.roots[0].children.columns.len(), 1);
        assert!(next.roots[0].children.columns[0].items.is_empty());
    }

    #[test]
    fn rename_column_trims_title() {
        let menu = tree(vec![with_column(item("p", "P"), "col1", "Old", vec![])]);
        let next = rename_column(&menu, &"p".into(), &"col1".into(), "  Reports ").unwrap();
        assert_eq!(next.roots[0].children.columns[0].title, "Reports");
    }

    #[test]
    fn update_fields_leaves_structure_alone() {
        let menu = tree(vec![item("a", "A"), item("b", "B")]);
        let patch = ItemPatch {
            label: Some("Bee".into()),
            route: Some(String::new()),
            is_public: Some(true),
            ..ItemPatch::default()
        };
        let next = update_item_fields(&menu, &"b".into(), &patch).unwrap();
        let b = find_item(&next, &"b".into()).unwrap();
        assert_eq!(b.label, "Bee");
        assert_eq!(b.route, None);
        assert!(b.is_public);
        assert_eq!(b.order, 1);
        assert_eq!(b.level, 0);
    }

    #[test]
    fn blank_label_patch_is_rejected() {
        let patch = ItemPatch { label: Some("   ".into()), ..ItemPatch::default() };
        assert!(matches!(
            patch.validate(),
            Err(ValidationError::ValidationFailed { field, .. }) if field == "label"
        ));
    }

    #[test]
    fn insert_item_rejects_clashing_ids() {
        let menu = tree(vec![item("a", "A")]);
        let err = insert_item(&menu, &Container::Root, None, item("a", "Again"));
        assert!(matches!(err, Err(StructuralError::InvalidTarget { .. })));

        let next = insert_item(&menu, &Container::Submenu("a".into()), None, item("b", "B")).unwrap();
        assert_eq!(next.roots[0].children.submenu[0].level, 1);
    }
}
