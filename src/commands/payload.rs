//! `menutree payload` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::editor::MenuEditor;
use crate::sync::PayloadSummary;

use super::describe;
use super::diff::read_pair;

/// Execute the `payload` command.
///
/// Prints the payload forest as JSON on stdout and a one-line summary on
/// stderr.
///
/// # Errors
///
/// Returns an error string if a file cannot be read, a tree is corrupt, or
/// a new item lacks a required field.
pub fn run(ctx: &ServiceContext, scope: &str, baseline: &Path, working: &Path) -> Result<(), String> {
    let (baseline, working) = read_pair(ctx, baseline, working)?;
    let editor = MenuEditor::resume(scope, baseline, working).map_err(|e| e.to_string())?;
    let forest = editor.payload().map_err(|e| describe(&e))?;

    let json = serde_json::to_string_pretty(&forest)
        .map_err(|e| format!("Failed to serialize payload: {e}"))?;
    println!("{json}");
    eprintln!("{}", PayloadSummary::of(&forest));
    Ok(())
}
