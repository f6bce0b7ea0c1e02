//! `menutree sync` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::editor::MenuEditor;
use crate::sync::{format_payload, format_result, PayloadSummary};

use super::files::{read_tree, write_tree};
use super::{block_on, describe};

/// Execute the `sync` command.
///
/// Diffs the working file against the backend's current tree and submits
/// the payload. After a successful sync the file is rewritten with the
/// reloaded tree, so new items pick up their backend ids.
///
/// # Errors
///
/// Returns an error string if loading, validation or the sync fails. When
/// the backend rejects some nodes the file is left as it was.
pub fn run(ctx: &ServiceContext, scope: &str, working: &Path, dry_run: bool) -> Result<(), String> {
    let edited = read_tree(ctx.fs.as_ref(), working)?;
    let baseline = block_on(ctx.backend.load_tree(scope))?
        .map_err(|e| format!("Failed to load menu '{scope}': {e}"))?;
    let mut editor = MenuEditor::resume(scope, baseline, edited)
        .map_err(|e| format!("{}: {e}", working.display()))?;

    if dry_run {
        let forest = editor.payload().map_err(|e| describe(&e))?;
        if forest.is_empty() {
            println!("{}", format_payload(&forest));
        } else {
            println!("Dry run, would send {}:", PayloadSummary::of(&forest));
            println!("{}", format_payload(&forest));
        }
        return Ok(());
    }

    let outcome = block_on(editor.save(ctx.backend.as_ref()))?.map_err(|e| describe(&e))?;
    let Some(result) = outcome else {
        println!("No changes to sync.");
        return Ok(());
    };
    write_tree(ctx.fs.as_ref(), Some(working), editor.working())?;
    println!("{}", format_result(&result));
    Ok(())
}
