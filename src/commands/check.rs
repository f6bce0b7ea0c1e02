//! `menutree check` command.

use std::path::Path;

use crate::context::ServiceContext;

use super::files::read_tree;

/// Execute the `check` command.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or the tree breaks a
/// structural invariant.
pub fn run(ctx: &ServiceContext, file: &Path) -> Result<(), String> {
    let tree = read_tree(ctx.fs.as_ref(), file)?;
    tree.check_invariants().map_err(|e| format!("{}: {e}", file.display()))?;
    println!("{}: OK ({} items)", file.display(), tree.item_count());
    Ok(())
}
