//! Menu tree data model.
//!
//! A [`MenuTree`] is an ordered list of root [`Item`]s. Every item owns two
//! independent child containers: an ordered `submenu` list and an ordered
//! list of [`Column`]s, each of which groups further items. Columns are a
//! presentation grouping, so an item inside a column points at the column's
//! owning item through `parent_id`.

pub mod filter;
pub mod invariants;
pub mod locate;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use invariants::InvariantViolation;
pub use locate::{find_by_id, find_context, find_item, Container, ContainerKind, NodeContext, NodeRef};

/// Reserved prefix for locally generated ids.
pub const TEMP_PREFIX: &str = "tmp-";

/// Identifier of an item or column.
///
/// Nodes created in the editor carry a [`NodeId::Temporary`] id until the
/// backend assigns a real one. Serialized as a plain string; temporary ids
/// render as `tmp-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeId {
    /// Locally generated, not yet known to the backend.
    Temporary(u64),
    /// Assigned by the backend.
    Persisted(String),
}

impl NodeId {
    /// Returns `true` for ids generated locally.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }

    /// Returns the backend id, or `None` for temporary ids.
    #[must_use]
    pub fn as_persisted(&self) -> Option<&str> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::Temporary(_) => None,
        }
    }
}

impl From<String> for NodeId {
    fn from(raw: String) -> Self {
        if let Some(rest) = raw.strip_prefix(TEMP_PREFIX) {
            // Only canonical digits, so the id renders back unchanged.
            let canonical = rest == "0" || !rest.starts_with('0');
            if canonical && !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(n) = rest.parse() {
                    return Self::Temporary(n);
                }
            }
        }
        Self::Persisted(raw)
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temporary(n) => write!(f, "{TEMP_PREFIX}{n}"),
            Self::Persisted(id) => f.write_str(id),
        }
    }
}

/// Publication status of an item. Serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Status {
    /// Visible and in use.
    Active,
    /// Hidden but kept.
    Inactive,
    /// Created locally, not yet confirmed.
    Pending,
    /// Soft-deleted.
    Deleted,
}

/// Raised when a status code is outside the known set.
#[derive(Debug, Error)]
#[error("unknown status code {0}")]
pub struct UnknownStatus(pub i8);

impl TryFrom<i8> for Status {
    type Error = UnknownStatus;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Active),
            0 => Ok(Self::Inactive),
            2 => Ok(Self::Pending),
            -1 => Ok(Self::Deleted),
            other => Err(UnknownStatus(other)),
        }
    }
}

impl From<Status> for i8 {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => 1,
            Status::Inactive => 0,
            Status::Pending => 2,
            Status::Deleted => -1,
        }
    }
}

/// The child containers of an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Children {
    /// Ordered nested items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submenu: Vec<Item>,
    /// Ordered named groupings of nested items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
}

/// One child container of an item, as yielded by [`Children::containers`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    /// The item's submenu list.
    Submenu,
    /// One of the item's columns.
    Column(&'a Column),
}

impl Children {
    /// Every child container in visual order: the submenu first, then each
    /// column in order.
    pub fn containers(&self) -> impl Iterator<Item = (Slot<'_>, &[Item])> {
        std::iter::once((Slot::Submenu, self.submenu.as_slice()))
            .chain(self.columns.iter().map(|c| (Slot::Column(c), c.items.as_slice())))
    }

    /// All direct child items across every container, in visual order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.submenu.iter().chain(self.columns.iter().flat_map(|c| c.items.iter()))
    }

    /// Mutable counterpart of [`Children::items`].
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.submenu.iter_mut().chain(self.columns.iter_mut().flat_map(|c| c.items.iter_mut()))
    }

    /// `true` when there is no submenu entry and no column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.submenu.is_empty() && self.columns.is_empty()
    }
}

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique id across the whole tree.
    pub id: NodeId,
    /// Display label.
    pub label: String,
    /// Path-like route, if the entry navigates somewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether the entry is reachable without authentication.
    #[serde(default)]
    pub is_public: bool,
    /// Publication status.
    pub status: Status,
    /// Position within the immediate container.
    #[serde(default)]
    pub order: usize,
    /// Depth, 0 at the root.
    #[serde(default)]
    pub level: usize,
    /// Structural parent item; `None` at the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Nested containers.
    #[serde(flatten)]
    pub children: Children,
}

impl Item {
    /// Creates a blank pending item placed at `order` under `parent`
    /// (or at the root when `parent` is `None`).
    #[must_use]
    pub fn pending(id: NodeId, parent: Option<&Item>, order: usize) -> Self {
        Self {
            id,
            label: String::new(),
            route: None,
            description: None,
            icon: None,
            is_public: false,
            status: Status::Pending,
            order,
            level: parent.map_or(0, |p| p.level + 1),
            parent_id: parent.map(|p| p.id.clone()),
            children: Children::default(),
        }
    }

    /// `true` when the item has neither submenu entries nor columns.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if `id` names a strict descendant of this item
    /// (a nested item or a column at any depth).
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.children.columns.iter().any(|c| &c.id == id)
            || self.children.items().any(|child| &child.id == id || child.contains(id))
    }

    /// Number of items in this subtree, including the item itself.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.items().map(Item::subtree_len).sum::<usize>()
    }
}

/// A named grouping of items under an owning item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique id across the whole tree.
    pub id: NodeId,
    /// User-editable heading.
    #[serde(default)]
    pub title: String,
    /// Position among the owner's columns.
    #[serde(default)]
    pub order: usize,
    /// The owning item.
    pub parent_id: NodeId,
    /// Grouped items; their `parent_id` is the owner, not the column.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Column {
    /// Creates an empty, untitled column owned by `owner`.
    #[must_use]
    pub fn new(id: NodeId, owner: &Item, order: usize) -> Self {
        Self { id, title: String::new(), order, parent_id: owner.id.clone(), items: Vec::new() }
    }
}

/// A whole menu: the ordered root items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuTree {
    /// Root-level items.
    pub roots: Vec<Item>,
}

impl MenuTree {
    /// Wraps a list of root items.
    #[must_use]
    pub fn new(roots: Vec<Item>) -> Self {
        Self { roots }
    }

    /// `true` when the menu has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of items at every depth.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.roots.iter().map(Item::subtree_len).sum()
    }

    /// Visits every item depth-first in visual order.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Item)) {
        fn go<'a>(items: &'a [Item], visit: &mut impl FnMut(&'a Item)) {
            for item in items {
                visit(item);
                for (_, children) in item.children.containers() {
                    go(children, visit);
                }
            }
        }
        go(&self.roots, &mut visit);
    }

    /// Largest temporary counter used by any item or column.
    #[must_use]
    pub fn max_temporary_id(&self) -> Option<u64> {
        let mut max = None;
        let mut bump = |id: &NodeId| {
            if let NodeId::Temporary(n) = id {
                max = Some(max.map_or(*n, |m: u64| m.max(*n)));
            }
        };
        self.walk(|item| {
            bump(&item.id);
            for column in &item.children.columns {
                bump(&column.id);
            }
        });
        max
    }

    /// Verifies every structural invariant of the tree.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        invariants::check(self)
    }
}

/// Allocator for temporary ids.
#[derive(Debug, Clone, Default)]
pub struct TempIds {
    next: u64,
}

impl TempIds {
    /// Starts counting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Starts after the largest temporary id already present in `tree`.
    #[must_use]
    pub fn seeded_from(tree: &MenuTree) -> Self {
        Self { next: tree.max_temporary_id().map_or(1, |n| n + 1) }
    }

    /// Hands out the next id.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId::Temporary(self.next.max(1));
        self.next = self.next.max(1) + 1;
        id
    }
}
