//! Typed errors of the tree engine and the editor facade.

use std::fmt;

use thiserror::Error;

use crate::menu::{InvariantViolation, NodeId};
use crate::sync::NodeError;

/// A structural edit that cannot be applied. The tree is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// A node was dropped onto itself.
    #[error("cannot move '{id}' onto itself")]
    SameNode {
        /// The dragged node.
        id: NodeId,
    },
    /// An id does not exist in the tree.
    #[error("node '{id}' not found")]
    NotFound {
        /// The missing id.
        id: NodeId,
    },
    /// The drop target cannot receive the dragged node.
    #[error("cannot move '{dragged}' to '{target}': {reason}")]
    InvalidTarget {
        /// The dragged node.
        dragged: NodeId,
        /// The rejected target.
        target: NodeId,
        /// Why the target was rejected.
        reason: String,
    },
}

impl StructuralError {
    pub(crate) fn not_found(id: &NodeId) -> Self {
        Self::NotFound { id: id.clone() }
    }

    pub(crate) fn invalid(dragged: &NodeId, target: &NodeId, reason: impl Into<String>) -> Self {
        Self::InvalidTarget { dragged: dragged.clone(), target: target.clone(), reason: reason.into() }
    }
}

/// Fields a new item must fill in before it can be synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequiredField {
    /// The icon identifier.
    Icon,
    /// The display label.
    Label,
    /// The route; only required for items without children.
    Route,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Icon => "icon",
            Self::Label => "label",
            Self::Route => "route",
        })
    }
}

/// A field-level problem. Never blocks unrelated edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A pending item lacks a required field.
    #[error("item '{node}' is missing its {field}")]
    MissingRequiredField {
        /// The pending item.
        node: NodeId,
        /// The empty field.
        field: RequiredField,
    },
    /// A submitted value was rejected.
    #[error("invalid {field}: {reason}")]
    ValidationFailed {
        /// Field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Failure reported while synchronizing with the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    /// The backend accepted the request but refused some nodes. Accepted
    /// nodes are not rolled back.
    #[error("backend rejected {} node(s)", .0.len())]
    PerNodeRejected(Vec<NodeError>),
    /// The request did not complete. Nothing was changed locally.
    #[error("sync transport failed: {0}")]
    TransportFailure(String),
    /// An earlier save was partly rejected, so the baseline no longer
    /// matches the backend. Sending again would repeat accepted creates.
    #[error("menu changed on the backend since the last partial save; reload before saving again")]
    StaleBaseline,
}

/// A baseline could not be loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The backend could not be reached or returned garbage.
    #[error("failed to load menu: {0}")]
    Transport(String),
    /// The loaded tree breaks a structural invariant.
    #[error("loaded menu is corrupt: {0}")]
    Corrupt(#[from] InvariantViolation),
}

/// Any failure surfaced by [`crate::editor::MenuEditor`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// A structural edit was refused.
    #[error(transparent)]
    Structural(#[from] StructuralError),
    /// A field update was refused.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Pending items are incomplete; nothing was sent.
    #[error("{} item(s) are incomplete", .0.len())]
    Incomplete(Vec<ValidationError>),
    /// Synchronization failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
    /// Loading a baseline failed.
    #[error(transparent)]
    Load(#[from] LoadError),
}
