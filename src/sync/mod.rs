//! Synchronization with the persistence backend: what is sent, what comes
//! back, and the checks that gate a submission.

pub mod payload;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RequiredField, ValidationError};
use crate::menu::MenuTree;

pub use payload::{
    build_payload, format_payload, ItemRecord, PathRecord, PayloadColumn, PayloadNode,
    PayloadSummary,
};

/// A node the backend refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeError {
    /// Id (or label, for nodes without an id) of the refused node.
    pub node_ref: String,
    /// Backend message.
    pub message: String,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.node_ref, self.message)
    }
}

/// Backend answer to a sync request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    /// Nodes created.
    pub created_count: usize,
    /// Nodes updated.
    pub updated_count: usize,
    /// Soft-deleted nodes brought back.
    pub reactivated_count: usize,
    /// Nodes refused; the rest of the request was still applied.
    #[serde(default)]
    pub per_node_errors: Vec<NodeError>,
}

/// Lists the required fields missing from locally created items.
///
/// Items with a temporary id must carry a label and an icon, plus a route
/// when they have no children. Persisted items are never checked.
#[must_use]
pub fn incomplete_items(tree: &MenuTree) -> Vec<ValidationError> {
    let mut issues = Vec::new();
    tree.walk(|item| {
        if !item.id.is_temporary() {
            return;
        }
        let blank = |value: Option<&str>| value.map_or(true, |v| v.trim().is_empty());
        let mut missing = |field| {
            issues.push(ValidationError::MissingRequiredField { node: item.id.clone(), field });
        };
        if blank(Some(item.label.as_str())) {
            missing(RequiredField::Label);
        }
        if blank(item.icon.as_deref()) {
            missing(RequiredField::Icon);
        }
        if item.is_leaf() && blank(item.route.as_deref()) {
            missing(RequiredField::Route);
        }
    });
    issues
}

/// Formats a sync result as a human-readable report.
#[must_use]
pub fn format_result(result: &SyncResult) -> String {
    let mut lines = vec![format!(
        "Synced: {} created, {} updated, {} reactivated",
        result.created_count, result.updated_count, result.reactivated_count
    )];
    for error in &result.per_node_errors {
        lines.push(format!("  REJECTED {error}"));
    }
    lines.join("\n")
}
