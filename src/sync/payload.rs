//! Builds the minimal forest of subtrees sent to the backend.
//!
//! A dirty item travels as a complete [`PayloadNode::Upsert`] of its whole
//! current subtree. A clean item that only leads to dirty descendants travels
//! as a [`PayloadNode::Path`] wrapper holding nothing but those branches.
//! Everything else is left out. Records without an `id` are creates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diff::ModifiedSet;
use crate::menu::{Column, Item, MenuTree, Slot, Status};

/// One node of the sync forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PayloadNode {
    /// Create or overwrite the item together with its complete subtree.
    Upsert(ItemRecord),
    /// Leave the item as is and descend into the listed children.
    Path(PathRecord),
}

/// Full state of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// Backend id; absent for items created locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display label.
    pub label: String,
    /// Route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Visibility.
    #[serde(default)]
    pub is_public: bool,
    /// Status code.
    pub status: Status,
    /// Position in its container.
    pub order: usize,
    /// Depth.
    pub level: usize,
    /// Submenu entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submenu: Vec<PayloadNode>,
    /// Columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<PayloadColumn>,
}

/// A clean item on the way to dirty descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRecord {
    /// Backend id.
    pub id: String,
    /// Position in its container.
    pub order: usize,
    /// Depth.
    pub level: usize,
    /// Submenu branches with changes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submenu: Vec<PayloadNode>,
    /// Columns with changes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<PayloadColumn>,
}

/// A column inside a payload node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadColumn {
    /// Backend id; absent for columns created locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Heading.
    #[serde(default)]
    pub title: String,
    /// Position among the owner's columns.
    pub order: usize,
    /// Items of the column.
    #[serde(default)]
    pub items: Vec<PayloadNode>,
}

/// Builds the sync forest for `tree` given its dirty set.
///
/// Items with a temporary id are always sent in full, since the backend
/// cannot address them any other way.
#[must_use]
pub fn build_payload(tree: &MenuTree, modified: &ModifiedSet) -> Vec<PayloadNode> {
    tree.roots.iter().filter_map(|item| node(item, modified)).collect()
}

fn node(item: &Item, modified: &ModifiedSet) -> Option<PayloadNode> {
    if modified.contains(&item.id) || item.id.is_temporary() {
        return Some(PayloadNode::Upsert(record(item)));
    }

    let mut submenu = Vec::new();
    let mut columns = Vec::new();
    for (slot, items) in item.children.containers() {
        let nodes: Vec<PayloadNode> = items.iter().filter_map(|child| node(child, modified)).collect();
        if nodes.is_empty() {
            continue;
        }
        match slot {
            Slot::Submenu => submenu = nodes,
            Slot::Column(column) => columns.push(payload_column(column, nodes)),
        }
    }
    if submenu.is_empty() && columns.is_empty() {
        return None;
    }
    Some(PayloadNode::Path(PathRecord {
        id: item.id.to_string(),
        order: item.order,
        level: item.level,
        submenu,
        columns,
    }))
}

fn record(item: &Item) -> ItemRecord {
    let mut submenu = Vec::new();
    let mut columns = Vec::new();
    for (slot, items) in item.children.containers() {
        let nodes = items.iter().map(|child| PayloadNode::Upsert(record(child))).collect();
        match slot {
            Slot::Submenu => submenu = nodes,
            Slot::Column(column) => columns.push(payload_column(column, nodes)),
        }
    }
    ItemRecord {
        id: item.id.as_persisted().map(str::to_string),
        label: item.label.clone(),
        route: item.route.clone(),
        description: item.description.clone(),
        icon: item.icon.clone(),
        is_public: item.is_public,
        status: item.status,
        order: item.order,
        level: item.level,
        submenu,
        columns,
    }
}

fn payload_column(column: &Column, items: Vec<PayloadNode>) -> PayloadColumn {
    PayloadColumn {
        id: column.id.as_persisted().map(str::to_string),
        title: column.title.clone(),
        order: column.order,
        items,
    }
}

/// Counts of what a payload will do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PayloadSummary {
    /// Items and columns without an id.
    pub creates: usize,
    /// Items and columns sent in full with an id.
    pub updates: usize,
    /// Path wrappers.
    pub paths: usize,
}

impl PayloadSummary {
    /// Tallies a payload forest.
    #[must_use]
    pub fn of(forest: &[PayloadNode]) -> Self {
        let mut summary = Self::default();
        summary.add_nodes(forest);
        summary
    }

    /// `true` when the payload does nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates + self.updates == 0
    }

    fn add_nodes(&mut self, nodes: &[PayloadNode]) {
        for node in nodes {
            let (submenu, columns) = match node {
                PayloadNode::Upsert(record) => {
                    self.tally(record.id.is_some());
                    (&record.submenu, &record.columns)
                }
                PayloadNode::Path(path) => {
                    self.paths += 1;
                    (&path.submenu, &path.columns)
                }
            };
            self.add_nodes(submenu);
            for column in columns {
                if matches!(node, PayloadNode::Upsert(_)) {
                    self.tally(column.id.is_some());
                }
                self.add_nodes(&column.items);
            }
        }
    }

    fn tally(&mut self, persisted: bool) {
        if persisted {
            self.updates += 1;
        } else {
            self.creates += 1;
        }
    }
}

impl fmt::Display for PayloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} create(s), {} update(s), {} path(s)", self.creates, self.updates, self.paths)
    }
}

/// Formats a payload forest as an indented listing.
#[must_use]
pub fn format_payload(forest: &[PayloadNode]) -> String {
    fn push(lines: &mut Vec<String>, nodes: &[PayloadNode], depth: usize) {
        let indent = "  ".repeat(depth + 1);
        for node in nodes {
            let (submenu, columns) = match node {
                PayloadNode::Upsert(record) => {
                    let verb = if record.id.is_some() { "UPDATE" } else { "CREATE" };
                    let id = record.id.as_deref().unwrap_or("(new)");
                    lines.push(format!("{indent}{verb} {id}: {}", record.label));
                    (&record.submenu, &record.columns)
                }
                PayloadNode::Path(path) => {
                    lines.push(format!("{indent}PATH {}", path.id));
                    (&path.submenu, &path.columns)
                }
            };
            push(lines, submenu, depth + 1);
            for column in columns {
                let id = column.id.as_deref().unwrap_or("(new)");
                lines.push(format!("{indent}  COLUMN {id}: {}", column.title));
                push(lines, &column.items, depth + 2);
            }
        }
    }

    if forest.is_empty() {
        return "No changes to sync.".to_string();
    }
    let mut lines = Vec::new();
    push(&mut lines, forest, 0);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::edit::{add_column, add_item_to_column, update_item_fields, ItemPatch};
    use crate::menu::fixtures::{item, tree, with_column, with_submenu};
    use crate::menu::TempIds;

    fn sample() -> MenuTree {
        tree(vec![
            with_submenu(item("a", "A"), vec![item("a1", "A1"), item("a2", "A2")]),
            with_column(
                item("b", "B"),
                "col",
                "Col",
                vec![with_submenu(item("k", "K"), vec![item("k1", "K1")]), item("m", "M")],
            ),
        ])
    }

    #[test]
    fn clean_tree_sends_nothing() {
        let menu = sample();
        assert!(build_payload(&menu, &diff(&menu, &menu)).is_empty());
    }

    #[test]
    fn deep_edit_is_wrapped_in_paths() {
        let base = sample();
        let patch = ItemPatch { label: Some("K one".into()), ..ItemPatch::default() };
        let working = update_item_fields(&base, &"k1".into(), &patch).unwrap();
        let forest = build_payload(&working, &diff(&working, &base));

        assert_eq!(forest.len(), 1);
        let PayloadNode::Path(b) = &forest[0] else { panic!("expected path for b") };
        assert_eq!(b.id, "b");
        assert!(b.submenu.is_empty());
        assert_eq!(b.columns.len(), 1);
        assert_eq!(b.columns[0].items.len(), 1, "clean sibling m is left out");
        let PayloadNode::Path(k) = &b.columns[0].items[0] else { panic!("expected path for k") };
        let PayloadNode::Upsert(k1) = &k.submenu[0] else { panic!("expected upsert for k1") };
        assert_eq!(k1.id.as_deref(), Some("k1"));
        assert_eq!(k1.label, "K one");
    }

    #[test]
    fn new_column_item_sends_owner_subtree_in_full() {
        let base = sample();
        let mut ids = TempIds::new();
        let (working, col) = add_column(&base, &"a".into(), &mut ids).unwrap();
        let (working, _) = add_item_to_column(&working, &"a".into(), &col, &mut ids).unwrap();
        let forest = build_payload(&working, &diff(&working, &base));

        assert_eq!(forest.len(), 1);
        let PayloadNode::Upsert(a) = &forest[0] else { panic!("expected upsert for a") };
        assert_eq!(a.id.as_deref(), Some("a"));
        assert_eq!(a.submenu.len(), 2);
        assert_eq!(a.columns.len(), 1);
        assert_eq!(a.columns[0].id, None);
        let PayloadNode::Upsert(new_item) = &a.columns[0].items[0] else { panic!("expected upsert") };
        assert_eq!(new_item.id, None);

        let summary = PayloadSummary::of(&forest);
        assert_eq!(summary, PayloadSummary { creates: 2, updates: 3, paths: 0 });
    }

    #[test]
    fn wire_shape_is_tagged() {
        let base = sample();
        let patch = ItemPatch { icon: Some("star".into()), ..ItemPatch::default() };
        let working = update_item_fields(&base, &"a2".into(), &patch).unwrap();
        let json = serde_json::to_value(build_payload(&working, &diff(&working, &base))).unwrap();
        assert_eq!(json[0]["op"], "path");
        assert_eq!(json[0]["submenu"][0]["op"], "upsert");
        assert_eq!(json[0]["submenu"][0]["icon"], "star");
        assert!(json[0].get("label").is_none());
    }

    #[test]
    fn listing_marks_creates_and_paths() {
        let base = sample();
        let mut ids = TempIds::new();
        let (working, col) = add_column(&base, &"b".into(), &mut ids).unwrap();
        let (working, _) = add_item_to_column(&working, &"b".into(), &col, &mut ids).unwrap();
        let listing = format_payload(&build_payload(&working, &diff(&working, &base)));
        assert!(listing.contains("UPDATE b: B"));
        assert!(listing.contains("COLUMN (new)"));
        assert!(listing.contains("CREATE (new)"));
        assert_eq!(format_payload(&[]), "No changes to sync.");
    }
}
