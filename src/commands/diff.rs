//! `menutree diff` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::diff::{diff, format_modified};
use crate::menu::MenuTree;

use super::files::read_tree;

/// Execute the `diff` command.
///
/// # Errors
///
/// Returns an error string if either file cannot be read or breaks a
/// structural invariant.
pub fn run(ctx: &ServiceContext, baseline: &Path, working: &Path) -> Result<(), String> {
    let (baseline, working) = read_pair(ctx, baseline, working)?;
    println!("{}", format_modified(&diff(&working, &baseline)));
    Ok(())
}

/// Reads a baseline and a working tree file, checking both.
pub(crate) fn read_pair(
    ctx: &ServiceContext,
    baseline: &Path,
    working: &Path,
) -> Result<(MenuTree, MenuTree), String> {
    Ok((read_checked(ctx, baseline)?, read_checked(ctx, working)?))
}

fn read_checked(ctx: &ServiceContext, path: &Path) -> Result<MenuTree, String> {
    let tree = read_tree(ctx.fs.as_ref(), path)?;
    tree.check_invariants().map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(tree)
}
