//! Edit scripts: a list of editor operations read from YAML or JSON.
//!
//! ```yaml
//! - op: add_column
//!   parent: reports
//! - op: add_item_to_column
//!   parent: reports
//!   column: tmp-1
//! - op: update_item
//!   id: tmp-2
//!   patch: { label: Quarterly, icon: chart, route: /reports/q }
//! - op: move_item
//!   dragged: settings
//!   target: reports
//!   intent: { mode: reorder, placement: before }
//! ```
//!
//! New nodes get `tmp-<n>` ids in creation order, numbered after the
//! largest temporary id already in the tree, so later steps can name them.

use serde::{Deserialize, Serialize};

use super::MenuEditor;
use crate::edit::{DropIntent, ItemPatch};
use crate::error::EditorError;
use crate::menu::NodeId;

/// One step of an edit script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Append a new root item.
    InsertRootItem,
    /// Append a new item to a submenu.
    InsertSubmenuItem {
        /// Owner of the submenu.
        parent: NodeId,
    },
    /// Add a column in first position.
    AddColumn {
        /// Owner of the column.
        parent: NodeId,
    },
    /// Append a new item to a column.
    AddItemToColumn {
        /// Owner of the column.
        parent: NodeId,
        /// The column.
        column: NodeId,
    },
    /// Retitle a column.
    RenameColumn {
        /// Owner of the column.
        parent: NodeId,
        /// The column.
        column: NodeId,
        /// New title.
        title: String,
    },
    /// Delete a column, keeping its items.
    DeleteColumn {
        /// Owner of the column.
        parent: NodeId,
        /// The column.
        column: NodeId,
    },
    /// Change an item's fields.
    UpdateItem {
        /// The item.
        id: NodeId,
        /// Fields to change.
        patch: ItemPatch,
    },
    /// Delete an item.
    DeleteItem {
        /// The item.
        id: NodeId,
    },
    /// Move an item with its subtree.
    MoveItem {
        /// The moved item.
        dragged: NodeId,
        /// The drop target.
        target: NodeId,
        /// How the drop is interpreted.
        intent: DropIntent,
    },
    /// Reorder a column among its siblings.
    MoveColumn {
        /// Owner of both columns.
        parent: NodeId,
        /// The moved column.
        dragged: NodeId,
        /// The column whose position it takes.
        target: NodeId,
    },
}

impl EditOp {
    /// Applies the step, returning the id of the node it created, if any.
    ///
    /// # Errors
    ///
    /// The editor's error for this operation; the editor is unchanged then.
    pub fn apply(&self, editor: &mut MenuEditor) -> Result<Option<NodeId>, EditorError> {
        match self {
            Self::InsertRootItem => Ok(Some(editor.insert_root_item())),
            Self::InsertSubmenuItem { parent } => editor.insert_submenu_item(parent).map(Some),
            Self::AddColumn { parent } => editor.add_column(parent).map(Some),
            Self::AddItemToColumn { parent, column } => editor.add_item_to_column(parent, column).map(Some),
            Self::RenameColumn { parent, column, title } => {
                editor.rename_column(parent, column, title).map(|()| None)
            }
            Self::DeleteColumn { parent, column } => editor.delete_column(parent, column).map(|()| None),
            Self::UpdateItem { id, patch } => editor.update_item(id, patch).map(|()| None),
            Self::DeleteItem { id } => editor.delete_item(id).map(|()| None),
            Self::MoveItem { dragged, target, intent } => {
                editor.move_item(dragged, target, *intent).map(|()| None)
            }
            Self::MoveColumn { parent, dragged, target } => {
                editor.move_column(parent, dragged, target).map(|()| None)
            }
        }
    }

    /// Short name used in reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertRootItem => "insert_root_item",
            Self::InsertSubmenuItem { .. } => "insert_submenu_item",
            Self::AddColumn { .. } => "add_column",
            Self::AddItemToColumn { .. } => "add_item_to_column",
            Self::RenameColumn { .. } => "rename_column",
            Self::DeleteColumn { .. } => "delete_column",
            Self::UpdateItem { .. } => "update_item",
            Self::DeleteItem { .. } => "delete_item",
            Self::MoveItem { .. } => "move_item",
            Self::MoveColumn { .. } => "move_column",
        }
    }
}
