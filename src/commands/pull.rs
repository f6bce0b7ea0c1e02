//! `menutree pull` command.

use std::path::Path;

use crate::context::ServiceContext;

use super::block_on;
use super::files::write_tree;

/// Execute the `pull` command.
///
/// # Errors
///
/// Returns an error string if the tree cannot be loaded or written.
pub fn run(ctx: &ServiceContext, scope: &str, out: Option<&Path>) -> Result<(), String> {
    let tree = block_on(ctx.backend.load_tree(scope))?
        .map_err(|e| format!("Failed to load menu '{scope}': {e}"))?;
    write_tree(ctx.fs.as_ref(), out, &tree)?;
    if let Some(out) = out {
        println!("Pulled {} items into {}", tree.item_count(), out.display());
    }
    Ok(())
}
