//! Drag-and-drop sessions.
//!
//! A session remembers what is being dragged and the last valid hover
//! target. A hover over the dragged node, anything inside its subtree, or an
//! unknown id leaves no target, so ending there is a no-op. Hovering never
//! touches the tree; only [`DragSession::end`] produces a new one.

use crate::edit::{move_column, move_item, DropIntent};
use crate::error::StructuralError;
use crate::menu::{find_by_id, find_item, MenuTree, NodeId, NodeRef};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSubject {
    /// An item, with its subtree.
    Item(NodeId),
    /// A column, reordered among its owner's columns.
    Column {
        /// Owning item.
        parent: NodeId,
        /// The dragged column.
        column: NodeId,
    },
}

impl DragSubject {
    /// Id of the dragged node.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Item(id) | Self::Column { column: id, .. } => id,
        }
    }
}

/// The current drop candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    /// Node under the pointer.
    pub target: NodeId,
    /// What dropping there would mean. Ignored for column drags.
    pub intent: DropIntent,
}

/// A drag in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    subject: DragSubject,
    hover: Option<HoverTarget>,
}

impl DragSession {
    /// Starts dragging `subject`.
    #[must_use]
    pub fn begin(subject: DragSubject) -> Self {
        Self { subject, hover: None }
    }

    /// What is being dragged.
    #[must_use]
    pub fn subject(&self) -> &DragSubject {
        &self.subject
    }

    /// Last hover target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    /// Records a hover over `target` in `tree`. A target the subject can
    /// never land on clears the candidate instead.
    pub fn hover(&mut self, tree: &MenuTree, target: NodeId, intent: DropIntent) {
        self.hover = self.accepts(tree, &target).then_some(HoverTarget { target, intent });
    }

    fn accepts(&self, tree: &MenuTree, target: &NodeId) -> bool {
        if target == self.subject.id() {
            return false;
        }
        match (&self.subject, find_by_id(tree, target)) {
            (_, None) | (DragSubject::Column { .. }, Some(NodeRef::Item(_))) => false,
            (DragSubject::Item(dragged), Some(_)) => {
                find_item(tree, dragged).is_some_and(|item| !item.contains(target))
            }
            (DragSubject::Column { parent, .. }, Some(NodeRef::Column { owner, .. })) => {
                &owner.id == parent
            }
        }
    }

    /// The pointer left every drop zone.
    pub fn leave(&mut self) {
        self.hover = None;
    }

    /// Ends the drag, applying one move for the last hover target.
    ///
    /// Returns `None` when there is no target: the drop is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the move's error when the drop is invalid.
    pub fn end(self, tree: &MenuTree) -> Result<Option<MenuTree>, StructuralError> {
        let Some(HoverTarget { target, intent }) = self.hover else {
            return Ok(None);
        };
        let moved = match &self.subject {
            DragSubject::Item(dragged) => move_item(tree, dragged, &target, intent)?,
            DragSubject::Column { parent, column } => move_column(tree, parent, column, &target)?,
        };
        Ok(Some(moved))
    }
}
