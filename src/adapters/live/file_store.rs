//! Local `MenuBackend` persisting every scope's tree in one YAML file.
//!
//! Payloads are applied the way a remote backend would: records without an
//! id are created with a fresh id, records with an id overwrite the stored
//! node, and an upserted node's child lists replace the stored ones. Nodes
//! that end up unreachable are dropped. Unknown ids are reported per node
//! and the rest of the payload still applies.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::menu::{Column, Item, MenuTree, NodeId, Status};
use crate::ports::backend::{BackendFuture, MenuBackend};
use crate::ports::{FileSystem, IdGenerator};
use crate::sync::{ItemRecord, NodeError, PathRecord, PayloadColumn, PayloadNode, SyncResult};

type Scopes = BTreeMap<String, MenuTree>;

/// Menu backend storing trees on disk through the [`FileSystem`] port.
pub struct FileMenuBackend {
    path: PathBuf,
    fs: Box<dyn FileSystem>,
    ids: Box<dyn IdGenerator>,
}

impl FileMenuBackend {
    /// Creates a store at `path`. The file is created on the first sync.
    pub fn new(path: impl Into<PathBuf>, fs: Box<dyn FileSystem>, ids: Box<dyn IdGenerator>) -> Self {
        Self { path: path.into(), fs, ids }
    }

    /// Location of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_scopes(&self) -> Result<Scopes, Box<dyn std::error::Error + Send + Sync>> {
        if !self.fs.exists(&self.path) {
            return Ok(Scopes::new());
        }
        let content = self.fs.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Scopes::new());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse store {}: {e}", self.path.display()).into())
    }

    /// Replaces the tree stored for `scope` wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn replace_tree(
        &self,
        scope: &str,
        tree: &MenuTree,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut scopes = self.read_scopes()?;
        scopes.insert(scope.to_string(), tree.clone());
        self.write_scopes(&scopes)
    }

    fn write_scopes(&self, scopes: &Scopes) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let yaml = serde_yaml::to_string(scopes)
            .map_err(|e| format!("Failed to serialize store: {e}"))?;
        self.fs.write(&self.path, &yaml)
    }
}

impl MenuBackend for FileMenuBackend {
    fn load_tree<'a>(&'a self, scope: &'a str) -> BackendFuture<'a, MenuTree> {
        Box::pin(async move {
            let tree = self.read_scopes()?.remove(scope).unwrap_or_default();
            info!(scope, items = tree.item_count(), store = %self.path.display(), "loaded menu");
            Ok(tree)
        })
    }

    fn sync_tree<'a>(
        &'a self,
        scope: &'a str,
        payload: &'a [PayloadNode],
    ) -> BackendFuture<'a, SyncResult> {
        Box::pin(async move {
            let mut scopes = self.read_scopes()?;
            let stored = scopes.remove(scope).unwrap_or_default();

            let mut apply = Apply::new(stored, self.ids.as_ref());
            apply.forest(payload);
            let (tree, result) = apply.finish();

            scopes.insert(scope.to_string(), tree);
            self.write_scopes(&scopes)?;
            info!(
                scope,
                created = result.created_count,
                updated = result.updated_count,
                reactivated = result.reactivated_count,
                rejected = result.per_node_errors.len(),
                "applied menu payload"
            );
            Ok(result)
        })
    }
}

/// The list an item is placed in, by owner and column id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Home {
    Root,
    Submenu(String),
    Column(String, String),
}

/// A stored item with its child lists held as ids.
struct Node {
    item: Item,
    submenu: Vec<String>,
    columns: Vec<ColumnNode>,
}

struct ColumnNode {
    column: Column,
    items: Vec<String>,
}

impl ColumnNode {
    fn has_id(&self, id: &str) -> bool {
        self.column.id.to_string() == id
    }
}

struct Apply<'a> {
    nodes: HashMap<String, Node>,
    roots: Vec<String>,
    homes: HashMap<String, Home>,
    ids: &'a dyn IdGenerator,
    result: SyncResult,
}

impl<'a> Apply<'a> {
    fn new(tree: MenuTree, ids: &'a dyn IdGenerator) -> Self {
        let mut apply = Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            homes: HashMap::new(),
            ids,
            result: SyncResult::default(),
        };
        apply.roots = tree.roots.into_iter().map(|item| apply.flatten(item)).collect();
        apply
    }

    fn flatten(&mut self, mut item: Item) -> String {
        let children = std::mem::take(&mut item.children);
        let submenu = children.submenu.into_iter().map(|child| self.flatten(child)).collect();
        let columns = children
            .columns
            .into_iter()
            .map(|mut column| {
                let items = std::mem::take(&mut column.items);
                let items = items.into_iter().map(|child| self.flatten(child)).collect();
                ColumnNode { column, items }
            })
            .collect();
        let id = item.id.to_string();
        self.nodes.insert(id.clone(), Node { item, submenu, columns });
        id
    }

    fn reject(&mut self, node_ref: &str, message: &str) {
        warn!(node = node_ref, message, "payload node rejected");
        self.result
            .per_node_errors
            .push(NodeError { node_ref: node_ref.to_string(), message: message.to_string() });
    }

    fn forest(&mut self, payload: &[PayloadNode]) {
        for node in payload {
            if let Some(id) = self.node(node, Home::Root) {
                if !self.roots.contains(&id) {
                    self.roots.push(id);
                }
            }
        }
    }

    fn node(&mut self, node: &PayloadNode, home: Home) -> Option<String> {
        match node {
            PayloadNode::Upsert(record) => self.upsert(record, home),
            PayloadNode::Path(record) => self.path(record, home),
        }
    }

    fn upsert(&mut self, record: &ItemRecord, home: Home) -> Option<String> {
        let id = match &record.id {
            Some(id) => {
                let Some(node) = self.nodes.get_mut(id) else {
                    self.reject(id, "unknown item id");
                    return None;
                };
                if node.item.status == Status::Deleted && record.status != Status::Deleted {
                    self.result.reactivated_count += 1;
                } else {
                    self.result.updated_count += 1;
                }
                overwrite(&mut node.item, record);
                id.clone()
            }
            None => {
                if record.label.trim().is_empty() {
                    self.reject("(new item)", "label is required");
                    return None;
                }
                let id = self.ids.generate_id();
                let mut item = Item::pending(NodeId::from(id.clone()), None, record.order);
                overwrite(&mut item, record);
                self.nodes.insert(id.clone(), Node { item, submenu: Vec::new(), columns: Vec::new() });
                self.result.created_count += 1;
                id
            }
        };
        self.homes.insert(id.clone(), home);

        let submenu = record
            .submenu
            .iter()
            .filter_map(|child| self.node(child, Home::Submenu(id.clone())))
            .collect();
        let mut columns = Vec::new();
        for payload_column in &record.columns {
            let Some(column) = self.column_for(&id, payload_column) else { continue };
            let home = Home::Column(id.clone(), column.id.to_string());
            let items = payload_column
                .items
                .iter()
                .filter_map(|child| self.node(child, home.clone()))
                .collect();
            columns.push(ColumnNode { column, items });
        }

        if let Some(node) = self.nodes.get_mut(&id) {
            node.submenu = submenu;
            node.columns = columns;
        }
        Some(id)
    }

    fn column_for(&mut self, owner: &str, payload: &PayloadColumn) -> Option<Column> {
        let column = match &payload.id {
            Some(id) => {
                let existing = self
                    .nodes
                    .get(owner)
                    .and_then(|node| node.columns.iter().find(|c| c.has_id(id)))
                    .map(|c| c.column.clone());
                let Some(column) = existing else {
                    self.reject(id, "unknown column id");
                    return None;
                };
                self.result.updated_count += 1;
                column
            }
            None => {
                self.result.created_count += 1;
                Column {
                    id: NodeId::from(self.ids.generate_id()),
                    title: String::new(),
                    order: 0,
                    parent_id: NodeId::from(owner),
                    items: Vec::new(),
                }
            }
        };
        Some(Column { title: payload.title.clone(), order: payload.order, ..column })
    }

    fn path(&mut self, record: &PathRecord, home: Home) -> Option<String> {
        let id = record.id.clone();
        let Some(node) = self.nodes.get_mut(&id) else {
            self.reject(&id, "unknown item id");
            return None;
        };
        node.item.order = record.order;
        self.homes.insert(id.clone(), home);

        for child in &record.submenu {
            if let Some(child_id) = self.node(child, Home::Submenu(id.clone())) {
                if let Some(node) = self.nodes.get_mut(&id) {
                    if !node.submenu.contains(&child_id) {
                        node.submenu.push(child_id);
                    }
                }
            }
        }

        for payload_column in &record.columns {
            let Some(column_id) = payload_column.id.clone() else {
                self.reject(&id, "new column outside an upsert");
                continue;
            };
            let known = self
                .nodes
                .get(&id)
                .is_some_and(|node| node.columns.iter().any(|c| c.has_id(&column_id)));
            if !known {
                self.reject(&column_id, "unknown column id");
                continue;
            }
            for child in &payload_column.items {
                let home = Home::Column(id.clone(), column_id.clone());
                let Some(child_id) = self.node(child, home) else { continue };
                let column = self
                    .nodes
                    .get_mut(&id)
                    .and_then(|node| node.columns.iter_mut().find(|c| c.has_id(&column_id)));
                if let Some(column) = column {
                    if !column.items.contains(&child_id) {
                        column.items.push(child_id);
                    }
                }
            }
        }
        Some(id)
    }

    fn finish(self) -> (MenuTree, SyncResult) {
        let mut visited = HashSet::new();
        let roots = self.build_list(&self.roots, &Home::Root, None, &mut visited);
        (MenuTree::new(roots), self.result)
    }

    fn build_list(
        &self,
        list: &[String],
        home: &Home,
        parent: Option<&Item>,
        visited: &mut HashSet<String>,
    ) -> Vec<Item> {
        let mut items = Vec::new();
        for id in list {
            if self.homes.get(id).is_some_and(|h| h != home) || !visited.insert(id.clone()) {
                continue;
            }
            if let Some(item) = self.build(id, parent, visited) {
                items.push(item);
            }
        }
        items.sort_by_key(|item| item.order);
        for (index, item) in items.iter_mut().enumerate() {
            item.order = index;
        }
        items
    }

    fn build(&self, id: &str, parent: Option<&Item>, visited: &mut HashSet<String>) -> Option<Item> {
        let node = self.nodes.get(id)?;
        let mut item = node.item.clone();
        item.level = parent.map_or(0, |p| p.level + 1);
        item.parent_id = parent.map(|p| p.id.clone());

        let submenu = self.build_list(&node.submenu, &Home::Submenu(id.to_string()), Some(&item), visited);
        let mut columns: Vec<Column> = node
            .columns
            .iter()
            .map(|entry| {
                let home = Home::Column(id.to_string(), entry.column.id.to_string());
                Column {
                    parent_id: item.id.clone(),
                    items: self.build_list(&entry.items, &home, Some(&item), visited),
                    ..entry.column.clone()
                }
            })
            .collect();
        columns.sort_by_key(|column| column.order);
        for (index, column) in columns.iter_mut().enumerate() {
            column.order = index;
        }

        item.children.submenu = submenu;
        item.children.columns = columns;
        Some(item)
    }
}

fn overwrite(item: &mut Item, record: &ItemRecord) {
    item.label = record.label.clone();
    item.route = record.route.clone();
    item.description = record.description.clone();
    item.icon = record.icon.clone();
    item.is_public = record.is_public;
    item.status = match record.status {
        Status::Pending => Status::Active,
        other => other,
    };
    item.order = record.order;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::edit::{add_column, add_item_to_column, move_item, update_item_fields, DropIntent, ItemPatch};
    use crate::menu::fixtures::{item, tree, with_column, with_submenu};
    use crate::menu::TempIds;
    use crate::sync::build_payload;
    use crate::testing::{MemFs, SequenceIds};

    fn store_with(menu: &MenuTree) -> FileMenuBackend {
        let backend = FileMenuBackend::new(
            "/store/menu.yaml",
            Box::new(MemFs::default()),
            Box::new(SequenceIds::default()),
        );
        backend.replace_tree("acme", menu).unwrap();
        backend
    }

    fn sample() -> MenuTree {
        tree(vec![
            with_submenu(item("a", "A"), vec![item("a1", "A1"), item("a2", "A2")]),
            with_column(item("b", "B"), "col", "Col", vec![item("k", "K")]),
        ])
    }

    async fn push(backend: &FileMenuBackend, base: &MenuTree, working: &MenuTree) -> SyncResult {
        let payload = build_payload(working, &diff(working, base));
        backend.sync_tree("acme", &payload).await.unwrap()
    }

    #[tokio::test]
    async fn missing_store_loads_empty() {
        let backend = FileMenuBackend::new(
            "/nowhere.yaml",
            Box::new(MemFs::default()),
            Box::new(SequenceIds::default()),
        );
        assert!(backend.load_tree("acme").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn created_items_get_backend_ids() {
        let base = sample();
        let backend = store_with(&base);
        let mut ids = TempIds::new();
        let (working, column) = add_column(&base, &"a".into(), &mut ids).unwrap();
        let (working, new_item) = add_item_to_column(&working, &"a".into(), &column, &mut ids).unwrap();
        let patch = ItemPatch {
            label: Some("Quarterly".into()),
            icon: Some("chart".into()),
            route: Some("/reports/q".into()),
            ..ItemPatch::default()
        };
        let working = update_item_fields(&working, &new_item, &patch).unwrap();

        let result = push(&backend, &base, &working).await;
        assert_eq!(result.created_count, 2);
        assert!(result.per_node_errors.is_empty());

        let reloaded = backend.load_tree("acme").await.unwrap();
        assert_eq!(reloaded.check_invariants(), Ok(()));
        let a = &reloaded.roots[0];
        assert_eq!(a.children.submenu.len(), 2);
        let stored = &a.children.columns[0].items[0];
        assert_eq!(stored.label, "Quarterly");
        assert_eq!(stored.status, Status::Active);
        assert!(!stored.id.is_temporary());
        assert_eq!(stored.parent_id, Some("a".into()));
    }

    #[tokio::test]
    async fn moves_are_rehomed_not_duplicated() {
        let base = sample();
        let backend = store_with(&base);
        let working = move_item(&base, &"a2".into(), &"col".into(), DropIntent::IntoColumn { index: Some(0) })
            .unwrap();

        push(&backend, &base, &working).await;
        let reloaded = backend.load_tree("acme").await.unwrap();
        assert_eq!(reloaded, working);
    }

    #[tokio::test]
    async fn unknown_ids_are_rejected_per_node() {
        let backend = store_with(&sample());
        let mut stale = sample();
        stale.roots[0].children.submenu[0].id = "gone".into();
        stale.roots[0].children.submenu[0].label = "Changed".into();
        let payload = build_payload(&stale, &diff(&stale, &MenuTree::default()));
        let result = backend.sync_tree("acme", &payload).await.unwrap();
        assert_eq!(result.per_node_errors.len(), 1);
        assert_eq!(result.per_node_errors[0].node_ref, "gone");
        assert!(result.updated_count > 0);
    }

    #[tokio::test]
    async fn reactivation_is_counted() {
        let mut base = sample();
        base.roots[1].status = Status::Deleted;
        let backend = store_with(&base);
        let patch = ItemPatch { status: Some(Status::Active), ..ItemPatch::default() };
        let working = update_item_fields(&base, &"b".into(), &patch).unwrap();
        let result = push(&backend, &base, &working).await;
        assert_eq!(result.reactivated_count, 1);
        assert_eq!(result.updated_count, 2, "the column and its item travel with b");
    }

    #[tokio::test]
    async fn scopes_are_independent() {
        let backend = store_with(&sample());
        assert!(backend.load_tree("other").await.unwrap().is_empty());
        assert_eq!(backend.load_tree("acme").await.unwrap().item_count(), 5);
    }
}
