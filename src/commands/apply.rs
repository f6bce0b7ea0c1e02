//! `menutree apply` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::editor::{EditOp, MenuEditor};

use super::files::{read_document, read_tree, write_tree};

/// Execute the `apply` command.
///
/// Runs every step of the script through the editor, stopping at the first
/// failing step. The edited tree goes to `out`, or to stdout when no output
/// file is given.
///
/// # Errors
///
/// Returns an error string if a file cannot be read or written, the tree is
/// corrupt, or a step fails.
pub fn run(
    ctx: &ServiceContext,
    scope: &str,
    tree: &Path,
    script: &Path,
    out: Option<&Path>,
) -> Result<(), String> {
    let menu = read_tree(ctx.fs.as_ref(), tree)?;
    let ops: Vec<EditOp> = read_document(ctx.fs.as_ref(), script)?;
    let mut editor =
        MenuEditor::from_baseline(scope, menu).map_err(|e| format!("{}: {e}", tree.display()))?;

    let report = apply_all(&mut editor, &ops)?;
    write_tree(ctx.fs.as_ref(), out, editor.working())?;

    if let Some(out) = out {
        println!("{report}");
        println!("Wrote {}", out.display());
    } else {
        eprintln!("{report}");
    }
    Ok(())
}

/// Applies `ops` in order and reports what each created.
///
/// # Errors
///
/// Returns an error string naming the first failing step.
pub fn apply_all(editor: &mut MenuEditor, ops: &[EditOp]) -> Result<String, String> {
    let mut lines = vec![format!("Applied {} step(s).", ops.len())];
    for (index, op) in ops.iter().enumerate() {
        let step = index + 1;
        let created = op.apply(editor).map_err(|e| format!("Step {step} ({}) failed: {e}", op.name()))?;
        if let Some(id) = created {
            lines.push(format!("  step {step}: created {id}"));
        }
    }
    let issues = editor.pending_issues();
    if !issues.is_empty() {
        lines.push(format!("{} required field(s) still missing:", issues.len()));
        lines.extend(issues.iter().map(|issue| format!("  {issue}")));
    }
    Ok(lines.join("\n"))
}
