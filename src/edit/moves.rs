//! Drag-and-drop moves of items and columns.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::path;
use crate::error::StructuralError;
use crate::menu::{find_by_id, find_context, Container, MenuTree, NodeContext, NodeId, NodeRef};

/// Side of the target a node is dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Immediately before the target.
    Before,
    /// Immediately after the target.
    After,
}

/// What dropping a node on a target means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DropIntent {
    /// Reorder within the container shared by dragged and target.
    Reorder {
        /// Side of the target.
        placement: Placement,
    },
    /// Append as the target's last child. Goes into the target's first column
    /// when it has columns, otherwise into its submenu.
    AsChild,
    /// Drop into the column named by the target id.
    IntoColumn {
        /// Position in the column; `None` appends.
        #[serde(default)]
        index: Option<usize>,
    },
    /// Become a sibling of the target, in whatever container it lives in.
    AsSibling {
        /// Side of the target.
        placement: Placement,
    },
}

enum Anchor {
    At(Option<usize>),
    Beside(NodeId, Placement),
}

/// Moves `dragged` (with its subtree) according to `intent`.
///
/// # Errors
///
/// - [`StructuralError::SameNode`] when `dragged == target`.
/// - [`StructuralError::NotFound`] for an unknown id.
/// - [`StructuralError::InvalidTarget`] when the target lies inside the
///   dragged subtree, does not fit the intent, or a reorder crosses
///   containers.
pub fn move_item(
    tree: &MenuTree,
    dragged: &NodeId,
    target: &NodeId,
    intent: DropIntent,
) -> Result<MenuTree, StructuralError> {
    if dragged == target {
        return Err(StructuralError::SameNode { id: dragged.clone() });
    }
    let source = find_context(tree, dragged).ok_or_else(|| StructuralError::not_found(dragged))?;
    let found = find_by_id(tree, target).ok_or_else(|| StructuralError::not_found(target))?;
    if source.item.contains(target) {
        return Err(StructuralError::invalid(dragged, target, "target is inside the dragged subtree"));
    }

    let (destination, anchor) = resolve(tree, &source, found, intent)?;

    let mut next = tree.clone();
    let (item, from) = path::detach(&mut next, dragged)?;
    let index = match anchor {
        Anchor::At(index) => index,
        Anchor::Beside(sibling, placement) => {
            let ctx = find_context(&next, &sibling).ok_or_else(|| StructuralError::not_found(&sibling))?;
            Some(match placement {
                Placement::Before => ctx.index,
                Placement::After => ctx.index + 1,
            })
        }
    };
    path::attach(&mut next, &destination, index, item)?;
    debug!(item = %dragged, from = ?from, to = ?destination, "moved item");
    Ok(next)
}

fn resolve(
    tree: &MenuTree,
    source: &NodeContext<'_>,
    found: NodeRef<'_>,
    intent: DropIntent,
) -> Result<(Container, Anchor), StructuralError> {
    let dragged = &source.item.id;
    let target = found.id();
    match (intent, found) {
        (DropIntent::IntoColumn { index }, NodeRef::Column { column, owner }) => Ok((
            Container::Column { owner: owner.id.clone(), column: column.id.clone() },
            Anchor::At(index),
        )),
        (DropIntent::IntoColumn { .. }, NodeRef::Item(_)) => {
            Err(StructuralError::invalid(dragged, target, "target is not a column"))
        }
        (_, NodeRef::Column { .. }) => {
            Err(StructuralError::invalid(dragged, target, "target is a column"))
        }
        (DropIntent::AsChild, NodeRef::Item(parent)) => {
            let container = match parent.children.columns.first() {
                Some(column) => Container::Column { owner: parent.id.clone(), column: column.id.clone() },
                None => Container::Submenu(parent.id.clone()),
            };
            Ok((container, Anchor::At(None)))
        }
        (DropIntent::Reorder { placement } | DropIntent::AsSibling { placement }, NodeRef::Item(_)) => {
            let container = find_context(tree, target)
                .ok_or_else(|| StructuralError::not_found(target))?
                .container();
            if matches!(intent, DropIntent::Reorder { .. }) && container != source.container() {
                return Err(StructuralError::invalid(dragged, target, "reorder across containers"));
            }
            Ok((container, Anchor::Beside(target.clone(), placement)))
        }
    }
}

/// Moves column `dragged` to the position of column `target` within
/// `parent`'s columns; the columns in between shift by one.
///
/// # Errors
///
/// [`StructuralError::SameNode`] when both ids are equal, and
/// [`StructuralError::NotFound`] when the parent or either column is missing.
pub fn move_column(
    tree: &MenuTree,
    parent: &NodeId,
    dragged: &NodeId,
    target: &NodeId,
) -> Result<MenuTree, StructuralError> {
    if dragged == target {
        return Err(StructuralError::SameNode { id: dragged.clone() });
    }
    let mut next = tree.clone();
    let columns = &mut path::require_item(&mut next, parent)?.children.columns;
    let position = |id: &NodeId| {
        columns.iter().position(|c| &c.id == id).ok_or_else(|| StructuralError::not_found(id))
    };
    let from = position(dragged)?;
    let to = position(target)?;

    let column = columns.remove(from);
    columns.insert(to, column);
    path::renumber_columns(columns);
    debug!(column = %dragged, from, to, "moved column");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::fixtures::{item, tree, with_column, with_submenu};
    use crate::menu::locate::find_item;

    fn ids(items: &[crate::menu::Item]) -> Vec<String> {
        items.iter().map(|i| i.id.to_string()).collect()
    }

    fn sample() -> MenuTree {
        tree(vec![
            with_submenu(item("a", "A"), vec![item("a1", "A1"), item("a2", "A2")]),
            item("b", "B"),
            with_column(
                item("c", "C"),
                "col1",
                "First",
                vec![with_submenu(item("k", "K"), vec![item("k1", "K1")])],
            ),
        ])
    }

    #[test]
    fn reorder_before_in_root() {
        let menu = tree(vec![item("a", "A"), item("b", "B")]);
        let next = move_item(
            &menu,
            &"b".into(),
            &"a".into(),
            DropIntent::Reorder { placement: Placement::Before },
        )
        .unwrap();
        assert_eq!(ids(&next.roots), ["b", "a"]);
        assert_eq!(next.roots[0].order, 0);
        assert_eq!(next.roots[1].order, 1);
    }

    #[test]
    fn reorder_after_moving_downwards() {
        let menu = tree(vec![item("a", "A"), item("b", "B"), item("c", "C")]);
        let next = move_item(
            &menu,
            &"a".into(),
            &"b".into(),
            DropIntent::Reorder { placement: Placement::After },
        )
        .unwrap();
        assert_eq!(ids(&next.roots), ["b", "a", "c"]);
    }

    #[test]
    fn reorder_across_containers_is_rejected() {
        let err = move_item(
            &sample(),
            &"a1".into(),
            &"b".into(),
            DropIntent::Reorder { placement: Placement::Before },
        );
        assert!(matches!(err, Err(StructuralError::InvalidTarget { .. })));
    }

    #[test]
    fn self_drop_is_same_node() {
        let err = move_item(&sample(), &"b".into(), &"b".into(), DropIntent::AsChild);
        assert_eq!(err, Err(StructuralError::SameNode { id: "b".into() }));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let err = move_item(&sample(), &"zz".into(), &"b".into(), DropIntent::AsChild);
        assert_eq!(err, Err(StructuralError::NotFound { id: "zz".into() }));
        let err = move_item(&sample(), &"b".into(), &"zz".into(), DropIntent::AsChild);
        assert_eq!(err, Err(StructuralError::NotFound { id: "zz".into() }));
    }

    #[test]
    fn dropping_into_own_subtree_is_rejected() {
        let menu = sample();
        let err = move_item(&menu, &"c".into(), &"k1".into(), DropIntent::AsChild);
        assert!(matches!(err, Err(StructuralError::InvalidTarget { .. })));
        let err = move_item(&menu, &"c".into(), &"col1".into(), DropIntent::IntoColumn { index: None });
        assert!(matches!(err, Err(StructuralError::InvalidTarget { .. })));
    }

    #[test]
    fn as_child_prefers_first_column() {
        let next = move_item(&sample(), &"b".into(), &"c".into(), DropIntent::AsChild).unwrap();
        let c = find_item(&next, &"c".into()).unwrap();
        assert_eq!(ids(&c.children.columns[0].items), ["k", "b"]);
        assert!(c.children.submenu.is_empty());
        assert_eq!(next.check_invariants(), Ok(()));
    }

    #[test]
    fn as_child_picks_first_column_over_existing_submenu() {
        let target = with_submenu(item("t", "T"), vec![item("t1", "T1")]);
        let target = with_column(target, "first", "First", vec![item("f1", "F1")]);
        let target = with_column(target, "second", "Second", vec![item("s1", "S1")]);
        let menu = tree(vec![target, item("b", "B")]);
        let next = move_item(&menu, &"b".into(), &"t".into(), DropIntent::AsChild).unwrap();

        let t = find_item(&next, &"t".into()).unwrap();
        assert_eq!(t.children.columns[0].id, NodeId::from("first"));
        assert_eq!(ids(&t.children.columns[0].items), ["f1", "b"]);
        assert_eq!(t.children.columns[0].items[1].order, 1);
        assert_eq!(ids(&t.children.columns[1].items), ["s1"]);
        assert_eq!(t.children.submenu, find_item(&menu, &"t".into()).unwrap().children.submenu);
        assert_eq!(next.check_invariants(), Ok(()));
    }

    #[test]
    fn as_child_creates_submenu() {
        let next = move_item(&sample(), &"a2".into(), &"b".into(), DropIntent::AsChild).unwrap();
        let b = find_item(&next, &"b".into()).unwrap();
        assert_eq!(ids(&b.children.submenu), ["a2"]);
        assert_eq!(b.children.submenu[0].level, 1);
        assert_eq!(b.children.submenu[0].parent_id, Some("b".into()));
        assert_eq!(next.check_invariants(), Ok(()));
    }

    #[test]
    fn into_column_at_index_recomputes_levels() {
        let next = move_item(
            &sample(),
            &"a".into(),
            &"col1".into(),
            DropIntent::IntoColumn { index: Some(0) },
        )
        .unwrap();
        let c = find_item(&next, &"c".into()).unwrap();
        let column = &c.children.columns[0];
        assert_eq!(ids(&column.items), ["a", "k"]);
        assert_eq!(column.items[0].level, 1);
        assert_eq!(column.items[0].children.submenu[0].level, 2);
        assert_eq!(ids(&next.roots), ["b", "c"]);
        assert_eq!(next.check_invariants(), Ok(()));
    }

    #[test]
    fn into_column_needs_a_column_target() {
        let err = move_item(&sample(), &"b".into(), &"a".into(), DropIntent::IntoColumn { index: None });
        assert!(matches!(err, Err(StructuralError::InvalidTarget { .. })));
    }

    #[test]
    fn as_sibling_lifts_deep_item_to_root() {
        let next = move_item(
            &sample(),
            &"k".into(),
            &"a".into(),
            DropIntent::AsSibling { placement: Placement::After },
        )
        .unwrap();
        assert_eq!(ids(&next.roots), ["a", "k", "b", "c"]);
        let k = &next.roots[1];
        assert_eq!(k.level, 0);
        assert_eq!(k.parent_id, None);
        assert_eq!(k.children.submenu[0].level, 1);
        assert!(find_item(&next, &"c".into()).unwrap().children.columns[0].items.is_empty());
        assert_eq!(next.check_invariants(), Ok(()));
    }

    #[test]
    fn failed_move_leaves_input_untouched() {
        let menu = sample();
        let before = menu.clone();
        let _ = move_item(&menu, &"a".into(), &"a1".into(), DropIntent::AsChild);
        assert_eq!(menu, before);
    }

    #[test]
    fn move_column_is_an_array_move() {
        let parent = with_column(
            with_column(with_column(item("p", "P"), "x", "X", vec![]), "y", "Y", vec![]),
            "z",
            "Z",
            vec![],
        );
        let menu = tree(vec![parent]);
        let next = move_column(&menu, &"p".into(), &"x".into(), &"z".into()).unwrap();
        let columns = &next.roots[0].children.columns;
        let order: Vec<_> = columns.iter().map(|c| (c.id.to_string(), c.order)).collect();
        assert_eq!(order, [("y".to_string(), 0), ("z".to_string(), 1), ("x".to_string(), 2)]);

        assert_eq!(
            move_column(&menu, &"p".into(), &"x".into(), &"x".into()),
            Err(StructuralError::SameNode { id: "x".into() })
        );
        assert_eq!(
            move_column(&menu, &"p".into(), &"x".into(), &"w".into()),
            Err(StructuralError::NotFound { id: "w".into() })
        );
    }
}
