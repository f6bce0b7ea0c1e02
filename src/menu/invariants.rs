//! Structural invariant checks for loaded or edited trees.

use std::collections::HashSet;

use thiserror::Error;

use super::{Item, MenuTree, NodeId};

/// A broken structural rule, reported with the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Two nodes share an id.
    #[error("duplicate id '{id}'")]
    DuplicateId {
        /// The repeated id.
        id: NodeId,
    },
    /// A container's `order` values are not `0..n-1` in list order.
    #[error("node '{id}' has order {found} but sits at position {expected}")]
    OrderGap {
        /// The misplaced node (item or column).
        id: NodeId,
        /// Position in the list.
        expected: usize,
        /// Stored order.
        found: usize,
    },
    /// An item's level does not follow from its parent.
    #[error("item '{id}' has level {found}, expected {expected}")]
    LevelMismatch {
        /// The item.
        id: NodeId,
        /// Parent level + 1, or 0 at the root.
        expected: usize,
        /// Stored level.
        found: usize,
    },
    /// An item's `parent_id` does not name its structural parent.
    #[error("item '{id}' points at parent {found:?}, expected {expected:?}")]
    ParentMismatch {
        /// The item.
        id: NodeId,
        /// The structural parent.
        expected: Option<NodeId>,
        /// Stored parent id.
        found: Option<NodeId>,
    },
    /// A column's `parent_id` does not name the item owning it.
    #[error("column '{id}' belongs to '{expected}' but points at '{found}'")]
    ColumnParentMismatch {
        /// The column.
        id: NodeId,
        /// The owning item.
        expected: NodeId,
        /// Stored parent id.
        found: NodeId,
    },
}

pub(super) fn check(tree: &MenuTree) -> Result<(), InvariantViolation> {
    let mut seen = HashSet::new();
    check_container(&tree.roots, None, &mut seen)
}

fn check_container<'a>(
    items: &'a [Item],
    parent: Option<&'a Item>,
    seen: &mut HashSet<&'a NodeId>,
) -> Result<(), InvariantViolation> {
    let expected_level = parent.map_or(0, |p| p.level + 1);
    let expected_parent = parent.map(|p| &p.id);

    for (position, item) in items.iter().enumerate() {
        if !seen.insert(&item.id) {
            return Err(InvariantViolation::DuplicateId { id: item.id.clone() });
        }
        if item.order != position {
            return Err(InvariantViolation::OrderGap {
                id: item.id.clone(),
                expected: position,
                found: item.order,
            });
        }
        if item.level != expected_level {
            return Err(InvariantViolation::LevelMismatch {
                id: item.id.clone(),
                expected: expected_level,
                found: item.level,
            });
        }
        if item.parent_id.as_ref() != expected_parent {
            return Err(InvariantViolation::ParentMismatch {
                id: item.id.clone(),
                expected: expected_parent.cloned(),
                found: item.parent_id.clone(),
            });
        }

        check_container(&item.children.submenu, Some(item), seen)?;
        for (position, column) in item.children.columns.iter().enumerate() {
            if !seen.insert(&column.id) {
                return Err(InvariantViolation::DuplicateId { id: column.id.clone() });
            }
            if column.order != position {
                return Err(InvariantViolation::OrderGap {
                    id: column.id.clone(),
                    expected: position,
                    found: column.order,
                });
            }
            if column.parent_id != item.id {
                return Err(InvariantViolation::ColumnParentMismatch {
                    id: column.id.clone(),
                    expected: item.id.clone(),
                    found: column.parent_id.clone(),
                });
            }
            check_container(&column.items, Some(item), seen)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::fixtures::{item, tree, with_column, with_submenu};

    fn sample() -> MenuTree {
        tree(vec![
            with_column(
                with_submenu(item("a", "A"), vec![item("a1", "A1")]),
                "col",
                "Col",
                vec![item("c1", "C1"), item("c2", "C2")],
            ),
            item("b", "B"),
        ])
    }

    #[test]
    fn fixture_tree_is_valid() {
        assert_eq!(sample().check_invariants(), Ok(()));
    }

    #[test]
    fn detects_duplicate_ids_across_depths() {
        let mut menu = sample();
        menu.roots[1].id = NodeId::from("c2");
        assert_eq!(
            menu.check_invariants(),
            Err(InvariantViolation::DuplicateId { id: NodeId::from("c2") })
        );
    }

    #[test]
    fn detects_column_id_clashing_with_item() {
        let mut menu = sample();
        menu.roots[0].children.columns[0].id = NodeId::from("a1");
        assert!(matches!(menu.check_invariants(), Err(InvariantViolation::DuplicateId { .. })));
    }

    #[test]
    fn detects_order_gap() {
        let mut menu = sample();
        menu.roots[0].children.columns[0].items[1].order = 5;
        assert!(matches!(
            menu.check_invariants(),
            Err(InvariantViolation::OrderGap { expected: 1, found: 5, .. })
        ));
    }

    #[test]
    fn detects_wrong_level() {
        let mut menu = sample();
        menu.roots[0].children.submenu[0].level = 3;
        assert!(matches!(
            menu.check_invariants(),
            Err(InvariantViolation::LevelMismatch { expected: 1, found: 3, .. })
        ));
    }

    #[test]
    fn column_items_must_point_at_owner_not_column() {
        let mut menu = sample();
        menu.roots[0].children.columns[0].items[0].parent_id = Some(NodeId::from("col"));
        assert!(matches!(menu.check_invariants(), Err(InvariantViolation::ParentMismatch { .. })));
    }

    #[test]
    fn detects_column_owned_by_someone_else() {
        let mut menu = sample();
        menu.roots[0].children.columns[0].parent_id = NodeId::from("b");
        assert!(matches!(
            menu.check_invariants(),
            Err(InvariantViolation::ColumnParentMismatch { .. })
        ));
    }
}
