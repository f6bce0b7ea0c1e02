//! Dirty tracking: which nodes of a working tree differ from the baseline.
//!
//! The comparison pairs nodes by id, container by container. A node missing
//! from its baseline container is either brand new or moved; a moved node's
//! subtree is still compared against its own baseline subtree, so descendants
//! that travelled along unchanged stay clean.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::menu::{Column, Item, MenuTree, NodeId};

/// Whether a dirty node is an item or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A navigation item.
    Item,
    /// A column.
    Column,
}

/// Why a node was marked dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirtyReason {
    /// The id does not exist in the baseline.
    Created,
    /// Order or parent differ from the baseline.
    Moved,
    /// Label, route, description, icon, visibility, status or column title
    /// differ.
    FieldsChanged,
    /// The owner's column list differs in count, ids, titles or order.
    ColumnsChanged,
    /// The node moved between the submenu and a column of the same owner, or
    /// the owner had such a node moved.
    ContainerChanged,
    /// A baseline child no longer appears in one of the owner's containers.
    ChildRemoved,
}

impl fmt::Display for DirtyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Moved => "moved",
            Self::FieldsChanged => "fields changed",
            Self::ColumnsChanged => "columns changed",
            Self::ContainerChanged => "container changed",
            Self::ChildRemoved => "child removed",
        })
    }
}

/// Dirty state of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dirty {
    /// Item or column.
    pub kind: NodeKind,
    /// Every reason found.
    pub reasons: BTreeSet<DirtyReason>,
}

/// The set of dirty nodes, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModifiedSet(BTreeMap<NodeId, Dirty>);

impl ModifiedSet {
    /// Number of dirty nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` when `id` is dirty.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.0.contains_key(id)
    }

    /// Dirty state of `id`, if any.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&Dirty> {
        self.0.get(id)
    }

    /// Dirty nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Dirty)> {
        self.0.iter()
    }

    fn mark(&mut self, id: &NodeId, kind: NodeKind, reason: DirtyReason) {
        self.0
            .entry(id.clone())
            .or_insert_with(|| Dirty { kind, reasons: BTreeSet::new() })
            .reasons
            .insert(reason);
    }
}

/// Computes the nodes of `current` that differ from `baseline`.
#[must_use]
pub fn diff(current: &MenuTree, baseline: &MenuTree) -> ModifiedSet {
    let mut everywhere = HashMap::new();
    baseline.walk(|item| {
        everywhere.insert(&item.id, item);
    });
    let mut differ = Differ { everywhere, set: ModifiedSet::default() };
    differ.list(&current.roots, &baseline.roots, None);
    differ.set
}

struct Differ<'a> {
    everywhere: HashMap<&'a NodeId, &'a Item>,
    set: ModifiedSet,
}

impl<'a> Differ<'a> {
    fn list(&mut self, current: &[Item], baseline: &'a [Item], owner: Option<&NodeId>) {
        let local: HashMap<&NodeId, &'a Item> = baseline.iter().map(|b| (&b.id, b)).collect();

        for item in current {
            if let Some(&base) = local.get(&item.id) {
                self.item(item, base);
                continue;
            }
            match self.everywhere.get(&item.id).copied() {
                Some(base) => {
                    self.set.mark(&item.id, NodeKind::Item, DirtyReason::Moved);
                    if let Some(owner) = owner.filter(|o| base.parent_id.as_ref() == Some(*o)) {
                        self.set.mark(&item.id, NodeKind::Item, DirtyReason::ContainerChanged);
                        self.set.mark(owner, NodeKind::Item, DirtyReason::ContainerChanged);
                    }
                    self.item(item, base);
                }
                None => {
                    self.set.mark(&item.id, NodeKind::Item, DirtyReason::Created);
                    self.children(item, None);
                }
            }
        }

        if let Some(owner) = owner {
            let present: HashSet<&NodeId> = current.iter().map(|i| &i.id).collect();
            if baseline.iter().any(|b| !present.contains(&b.id)) {
                self.set.mark(owner, NodeKind::Item, DirtyReason::ChildRemoved);
            }
        }
    }

    fn item(&mut self, current: &Item, base: &'a Item) {
        if current.label != base.label
            || current.route != base.route
            || current.description != base.description
            || current.icon != base.icon
            || current.is_public != base.is_public
            || current.status != base.status
        {
            self.set.mark(&current.id, NodeKind::Item, DirtyReason::FieldsChanged);
        }
        if current.order != base.order || current.parent_id != base.parent_id {
            self.set.mark(&current.id, NodeKind::Item, DirtyReason::Moved);
        }
        self.children(current, Some(base));
    }

    fn children(&mut self, current: &Item, base: Option<&'a Item>) {
        let owner = &current.id;
        let base_submenu = base.map_or(&[][..], |b| b.children.submenu.as_slice());
        self.list(&current.children.submenu, base_submenu, Some(owner));

        let base_columns = base.map_or(&[][..], |b| b.children.columns.as_slice());
        if base.is_some() && columns_differ(&current.children.columns, base_columns) {
            self.set.mark(owner, NodeKind::Item, DirtyReason::ColumnsChanged);
        }

        for column in &current.children.columns {
            match base_columns.iter().find(|b| b.id == column.id) {
                Some(base_column) => {
                    if base_column.title != column.title || base_column.order != column.order {
                        self.set.mark(&column.id, NodeKind::Column, DirtyReason::FieldsChanged);
                    }
                    self.list(&column.items, &base_column.items, Some(owner));
                }
                None => {
                    self.set.mark(&column.id, NodeKind::Column, DirtyReason::Created);
                    self.list(&column.items, &[], Some(owner));
                }
            }
        }
    }
}

fn columns_differ(current: &[Column], base: &[Column]) -> bool {
    current.len() != base.len()
        || current
            .iter()
            .zip(base)
            .any(|(c, b)| c.id != b.id || c.title != b.title || c.order != b.order)
}

/// Formats a modified set as one line per dirty node.
#[must_use]
pub fn format_modified(set: &ModifiedSet) -> String {
    if set.is_empty() {
        return "No changes.".to_string();
    }
    let mut lines = vec![format!("{} modified node(s):", set.len())];
    for (id, dirty) in set.iter() {
        let kind = match dirty.kind {
            NodeKind::Item => "ITEM",
            NodeKind::Column => "COLUMN",
        };
        let reasons: Vec<String> = dirty.reasons.iter().map(ToString::to_string).collect();
        lines.push(format!("  {kind} {id}: {}", reasons.join(", ")));
    }
    lines.join("\n")
}
