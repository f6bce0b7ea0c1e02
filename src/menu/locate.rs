//! Read-only lookups over a [`MenuTree`].
//!
//! Searches run depth-first in visual order: root items in order, and for
//! each item its submenu before its columns.

use super::{Column, Item, MenuTree, NodeId};

/// A node found by id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    /// A navigation item.
    Item(&'a Item),
    /// A column together with the item that owns it.
    Column {
        /// The column.
        column: &'a Column,
        /// Its owning item.
        owner: &'a Item,
    },
}

impl NodeRef<'_> {
    /// Id of the referenced node.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Item(item) => &item.id,
            Self::Column { column, .. } => &column.id,
        }
    }
}

/// Which kind of list an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// The root list.
    Root,
    /// A parent's submenu.
    Submenu,
    /// A parent's column.
    Column,
}

/// Address of an item list, by ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    /// The root list.
    Root,
    /// The submenu of the given item.
    Submenu(NodeId),
    /// A column of an item.
    Column {
        /// The owning item.
        owner: NodeId,
        /// The column.
        column: NodeId,
    },
}

impl Container {
    /// The item owning this list, `None` for the root.
    #[must_use]
    pub fn owner(&self) -> Option<&NodeId> {
        match self {
            Self::Root => None,
            Self::Submenu(owner) | Self::Column { owner, .. } => Some(owner),
        }
    }

    /// Kind of the addressed list.
    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Root => ContainerKind::Root,
            Self::Submenu(_) => ContainerKind::Submenu,
            Self::Column { .. } => ContainerKind::Column,
        }
    }
}

/// Where an item sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeContext<'a> {
    /// The item itself.
    pub item: &'a Item,
    /// Structural parent, `None` at the root.
    pub parent: Option<&'a Item>,
    /// Kind of the list holding the item.
    pub kind: ContainerKind,
    /// The column holding the item, when `kind` is [`ContainerKind::Column`].
    pub column_id: Option<&'a NodeId>,
    /// Position within the list.
    pub index: usize,
    /// Depth of the item.
    pub level: usize,
}

impl NodeContext<'_> {
    /// Owned address of the list holding the item.
    #[must_use]
    pub fn container(&self) -> Container {
        match (self.parent, self.column_id) {
            (None, _) => Container::Root,
            (Some(parent), None) => Container::Submenu(parent.id.clone()),
            (Some(parent), Some(column)) => {
                Container::Column { owner: parent.id.clone(), column: column.clone() }
            }
        }
    }
}

/// Finds an item or column by id.
#[must_use]
pub fn find_by_id<'a>(tree: &'a MenuTree, id: &NodeId) -> Option<NodeRef<'a>> {
    fn search<'a>(items: &'a [Item], id: &NodeId) -> Option<NodeRef<'a>> {
        for item in items {
            if &item.id == id {
                return Some(NodeRef::Item(item));
            }
            if let Some(found) = search(&item.children.submenu, id) {
                return Some(found);
            }
            for column in &item.children.columns {
                if &column.id == id {
                    return Some(NodeRef::Column { column, owner: item });
                }
                if let Some(found) = search(&column.items, id) {
                    return Some(found);
                }
            }
        }
        None
    }
    search(&tree.roots, id)
}

/// Finds an item by id, ignoring columns.
#[must_use]
pub fn find_item<'a>(tree: &'a MenuTree, id: &NodeId) -> Option<&'a Item> {
    match find_by_id(tree, id)? {
        NodeRef::Item(item) => Some(item),
        NodeRef::Column { .. } => None,
    }
}

/// Finds an item together with its parent, container and position.
#[must_use]
pub fn find_context<'a>(tree: &'a MenuTree, id: &NodeId) -> Option<NodeContext<'a>> {
    fn search<'a>(
        items: &'a [Item],
        parent: Option<&'a Item>,
        kind: ContainerKind,
        column_id: Option<&'a NodeId>,
        id: &NodeId,
    ) -> Option<NodeContext<'a>> {
        for (index, item) in items.iter().enumerate() {
            if &item.id == id {
                return Some(NodeContext {
                    item,
                    parent,
                    kind,
                    column_id,
                    index,
                    level: parent.map_or(0, |p| p.level + 1),
                });
            }
            let nested = search(&item.children.submenu, Some(item), ContainerKind::Submenu, None, id)
                .or_else(|| {
                    item.children.columns.iter().find_map(|column| {
                        search(&column.items, Some(item), ContainerKind::Column, Some(&column.id), id)
                    })
                });
            if nested.is_some() {
                return nested;
            }
        }
        None
    }
    search(&tree.roots, None, ContainerKind::Root, None, id)
}
