//! The editing session for one menu.
//!
//! [`MenuEditor`] owns a baseline loaded from the backend and a working copy
//! that every edit replaces. The difference between the two is what a save
//! sends. Failed edits leave the working copy untouched.

pub mod drag;
pub mod script;

use tracing::{debug, info, warn};

use crate::diff::{diff, ModifiedSet};
use crate::edit::{self, DropIntent, ItemPatch};
use crate::error::{EditorError, LoadError, StructuralError, SyncError, ValidationError};
use crate::menu::{find_item, Item, MenuTree, NodeId, Status, TempIds};
use crate::ports::backend::MenuBackend;
use crate::sync::{build_payload, incomplete_items, PayloadNode, SyncResult};

pub use drag::{DragSession, DragSubject, HoverTarget};
pub use script::EditOp;

/// Baseline, working copy and in-flight drag of one menu scope.
#[derive(Debug, Clone)]
pub struct MenuEditor {
    scope: String,
    baseline: MenuTree,
    working: MenuTree,
    ids: TempIds,
    drag: Option<DragSession>,
    stale: bool,
}

impl MenuEditor {
    /// Loads `scope` from `backend` and starts editing it.
    ///
    /// # Errors
    ///
    /// [`LoadError::Transport`] when the backend fails, or
    /// [`LoadError::Corrupt`] when the tree breaks an invariant.
    pub async fn load(backend: &dyn MenuBackend, scope: &str) -> Result<Self, LoadError> {
        let tree = fetch(backend, scope).await?;
        Self::from_baseline(scope, tree)
    }

    /// Starts editing an already loaded tree.
    ///
    /// # Errors
    ///
    /// [`LoadError::Corrupt`] when the tree breaks an invariant.
    pub fn from_baseline(scope: &str, tree: MenuTree) -> Result<Self, LoadError> {
        tree.check_invariants()?;
        Ok(Self {
            scope: scope.to_string(),
            ids: TempIds::seeded_from(&tree),
            working: tree.clone(),
            baseline: tree,
            drag: None,
            stale: false,
        })
    }

    /// Starts from `baseline` with `working` already edited, e.g. a tree file
    /// saved from an earlier session.
    ///
    /// # Errors
    ///
    /// [`LoadError::Corrupt`] when either tree breaks an invariant.
    pub fn resume(scope: &str, baseline: MenuTree, working: MenuTree) -> Result<Self, LoadError> {
        working.check_invariants()?;
        let mut editor = Self::from_baseline(scope, baseline)?;
        editor.ids = TempIds::seeded_from(&working);
        editor.working = working;
        Ok(editor)
    }

    /// The scope being edited.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The tree as last loaded.
    #[must_use]
    pub fn baseline(&self) -> &MenuTree {
        &self.baseline
    }

    /// The tree with every edit applied.
    #[must_use]
    pub fn working(&self) -> &MenuTree {
        &self.working
    }

    /// Nodes that differ from the baseline.
    #[must_use]
    pub fn modified(&self) -> ModifiedSet {
        diff(&self.working, &self.baseline)
    }

    /// `true` after a partly rejected save, until [`MenuEditor::reload`].
    #[must_use]
    pub fn needs_reload(&self) -> bool {
        self.stale
    }

    /// Number of nodes that differ from the baseline, for an "N unsaved
    /// changes" indicator. Zero means nothing to save.
    #[must_use]
    pub fn unsaved_changes(&self) -> usize {
        self.modified().len()
    }

    /// Appends a new item to the root list.
    pub fn insert_root_item(&mut self) -> NodeId {
        let (next, id) = edit::insert_root_item(&self.working, &mut self.ids);
        self.working = next;
        id
    }

    /// Appends a new item to `parent`'s submenu.
    ///
    /// # Errors
    ///
    /// [`StructuralError::NotFound`] if `parent` does not exist.
    pub fn insert_submenu_item(&mut self, parent: &NodeId) -> Result<NodeId, EditorError> {
        let (next, id) = edit::insert_submenu_item(&self.working, parent, &mut self.ids)?;
        self.working = next;
        Ok(id)
    }

    /// Adds an empty column in first position under `parent`.
    ///
    /// # Errors
    ///
    /// [`StructuralError::NotFound`] if `parent` does not exist.
    pub fn add_column(&mut self, parent: &NodeId) -> Result<NodeId, EditorError> {
        let (next, id) = edit::add_column(&self.working, parent, &mut self.ids)?;
        self.working = next;
        Ok(id)
    }

    /// Appends a new item to a column.
    ///
    /// # Errors
    ///
    /// [`StructuralError::NotFound`] if the parent or column does not exist.
    pub fn add_item_to_column(&mut self, parent: &NodeId, column: &NodeId) -> Result<NodeId, EditorError> {
        let (next, id) = edit::add_item_to_column(&self.working, parent, column, &mut self.ids)?;
        self.working = next;
        Ok(id)
    }

    /// Retitles a column.
    ///
    /// # Errors
    ///
    /// [`StructuralError::NotFound`] if the parent or column does not exist.
    pub fn rename_column(&mut self, parent: &NodeId, column: &NodeId, title: &str) -> Result<(), EditorError> {
        self.working = edit::rename_column(&self.working, parent, column, title)?;
        Ok(())
    }

    /// Deletes a column; its items move to the end of the parent's submenu.
    ///
    /// # Errors
    ///
    /// [`StructuralError::NotFound`] if the parent or column does not exist.
    pub fn delete_column(&mut self, parent: &NodeId, column: &NodeId) -> Result<(), EditorError> {
        self.working = edit::delete_column(&self.working, parent, column)?;
        Ok(())
    }

    /// Applies a field patch to an item.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ValidationFailed`] for unstorable values, or
    /// [`StructuralError::NotFound`] if `id` does not exist.
    pub fn update_item(&mut self, id: &NodeId, patch: &ItemPatch) -> Result<(), EditorError> {
        patch.validate()?;
        self.working = edit::update_item_fields(&self.working, id, patch)?;
        Ok(())
    }

    /// Deletes an item.
    ///
    /// A locally created item is removed outright. A saved item is marked
    /// [`Status::Deleted`] and stays in place, so it can be restored.
    ///
    /// # Errors
    ///
    /// [`StructuralError::NotFound`] if `id` does not exist, or
    /// [`StructuralError::InvalidTarget`] when a new item still holds saved
    /// items.
    pub fn delete_item(&mut self, id: &NodeId) -> Result<(), EditorError> {
        let item = find_item(&self.working, id).ok_or_else(|| StructuralError::NotFound { id: id.clone() })?;
        if !id.is_temporary() {
            let patch = ItemPatch { status: Some(Status::Deleted), ..ItemPatch::default() };
            self.working = edit::update_item_fields(&self.working, id, &patch)?;
            debug!(item = %id, "soft-deleted item");
            return Ok(());
        }
        if let Some(saved) = first_persisted(item) {
            return Err(StructuralError::InvalidTarget {
                dragged: id.clone(),
                target: saved,
                reason: "new item still holds saved items; move them out first".to_string(),
            }
            .into());
        }
        let (next, _) = edit::remove_item(&self.working, id)?;
        self.working = next;
        Ok(())
    }

    /// Moves an item with its subtree.
    ///
    /// # Errors
    ///
    /// The [`StructuralError`] of [`edit::move_item`].
    pub fn move_item(&mut self, dragged: &NodeId, target: &NodeId, intent: DropIntent) -> Result<(), EditorError> {
        self.working = edit::move_item(&self.working, dragged, target, intent)?;
        Ok(())
    }

    /// Moves a column to the position of `target` among its siblings.
    ///
    /// # Errors
    ///
    /// The [`StructuralError`] of [`edit::move_column`].
    pub fn move_column(&mut self, parent: &NodeId, dragged: &NodeId, target: &NodeId) -> Result<(), EditorError> {
        self.working = edit::move_column(&self.working, parent, dragged, target)?;
        Ok(())
    }

    /// Starts a drag, replacing any unfinished one.
    pub fn begin_drag(&mut self, subject: DragSubject) {
        self.drag = Some(DragSession::begin(subject));
    }

    /// The drag in progress, if any.
    #[must_use]
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Updates the drop candidate. Ignored when no drag is in progress.
    pub fn hover(&mut self, target: NodeId, intent: DropIntent) {
        if let Some(session) = &mut self.drag {
            session.hover(&self.working, target, intent);
        }
    }

    /// Clears the drop candidate.
    pub fn leave(&mut self) {
        if let Some(session) = &mut self.drag {
            session.leave();
        }
    }

    /// Abandons the drag without moving anything.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Ends the drag, committing the move to the last hover target.
    ///
    /// Returns `false` when nothing moved.
    ///
    /// # Errors
    ///
    /// The [`StructuralError`] of the move; the drag is over either way.
    pub fn end_drag(&mut self) -> Result<bool, EditorError> {
        let Some(session) = self.drag.take() else {
            return Ok(false);
        };
        match session.end(&self.working)? {
            Some(next) => {
                self.working = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Throws away every edit since the last load.
    pub fn rollback(&mut self) {
        self.working = self.baseline.clone();
        self.ids = TempIds::seeded_from(&self.working);
        self.drag = None;
        info!(scope = %self.scope, "discarded unsaved changes");
    }

    /// Required fields still missing from new items.
    #[must_use]
    pub fn pending_issues(&self) -> Vec<ValidationError> {
        incomplete_items(&self.working)
    }

    /// The payload a save would send now.
    ///
    /// # Errors
    ///
    /// [`EditorError::Incomplete`] when a new item lacks a required field.
    pub fn payload(&self) -> Result<Vec<PayloadNode>, EditorError> {
        let issues = self.pending_issues();
        if !issues.is_empty() {
            return Err(EditorError::Incomplete(issues));
        }
        Ok(build_payload(&self.working, &self.modified()))
    }

    /// Sends the working tree's changes and, on success, reloads the
    /// baseline from the backend.
    ///
    /// Returns `None` when there was nothing to save. When the backend
    /// rejects some nodes the accepted part is already stored, so the
    /// baseline is stale: the working tree is kept for inspection, but
    /// further saves are refused until [`MenuEditor::reload`].
    ///
    /// # Errors
    ///
    /// - [`SyncError::StaleBaseline`] after a partly rejected save.
    /// - [`EditorError::Incomplete`] before anything is sent.
    /// - [`SyncError::TransportFailure`] when the request fails.
    /// - [`SyncError::PerNodeRejected`] when some nodes were refused.
    /// - [`EditorError::Load`] when the reload after a save fails.
    pub async fn save(&mut self, backend: &dyn MenuBackend) -> Result<Option<SyncResult>, EditorError> {
        if self.stale {
            return Err(SyncError::StaleBaseline.into());
        }
        let modified = self.modified();
        if modified.is_empty() {
            debug!(scope = %self.scope, "nothing to save");
            return Ok(None);
        }
        let payload = self.payload()?;

        let result = backend
            .sync_tree(&self.scope, &payload)
            .await
            .map_err(|e| SyncError::TransportFailure(e.to_string()))?;
        if !result.per_node_errors.is_empty() {
            warn!(
                scope = %self.scope,
                rejected = result.per_node_errors.len(),
                "backend rejected part of the menu"
            );
            self.stale = true;
            return Err(SyncError::PerNodeRejected(result.per_node_errors).into());
        }

        info!(
            scope = %self.scope,
            modified = modified.len(),
            created = result.created_count,
            updated = result.updated_count,
            "saved menu"
        );
        self.reload(backend).await?;
        Ok(Some(result))
    }

    /// Replaces baseline and working tree with the backend's current tree.
    ///
    /// # Errors
    ///
    /// The [`LoadError`] of the load; the editor is unchanged then.
    pub async fn reload(&mut self, backend: &dyn MenuBackend) -> Result<(), LoadError> {
        let tree = fetch(backend, &self.scope).await?;
        tree.check_invariants()?;
        self.ids = TempIds::seeded_from(&tree);
        self.working = tree.clone();
        self.baseline = tree;
        self.drag = None;
        self.stale = false;
        Ok(())
    }
}

async fn fetch(backend: &dyn MenuBackend, scope: &str) -> Result<MenuTree, LoadError> {
    backend.load_tree(scope).await.map_err(|e| LoadError::Transport(e.to_string()))
}

fn first_persisted(item: &Item) -> Option<NodeId> {
    item.children
        .columns
        .iter()
        .map(|c| &c.id)
        .find(|id| !id.is_temporary())
        .cloned()
        .or_else(|| {
            item.children.items().find_map(|child| {
                if child.id.is_temporary() {
                    first_persisted(child)
                } else {
                    Some(child.id.clone())
                }
            })
        })
}
