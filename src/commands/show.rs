//! `menutree show` command.

use crate::context::ServiceContext;
use crate::menu::filter::{filter_tree, matches_query};
use crate::menu::{Item, MenuTree, Status};

use super::block_on;

/// Execute the `show` command.
///
/// Prints the backend's tree as an outline. With a query, only matching
/// items and the branches leading to them are shown.
///
/// # Errors
///
/// Returns an error string if the tree cannot be loaded.
pub fn run(ctx: &ServiceContext, scope: &str, query: Option<&str>) -> Result<(), String> {
    let tree = block_on(ctx.backend.load_tree(scope))?
        .map_err(|e| format!("Failed to load menu '{scope}': {e}"))?;

    let shown = match query {
        Some(q) => filter_tree(&tree, |item| matches_query(item, q)),
        None => tree,
    };
    if shown.is_empty() {
        match query {
            Some(q) => println!("No items match '{q}'."),
            None => println!("Menu '{scope}' is empty."),
        }
        return Ok(());
    }
    println!("{}", format_tree(&shown));
    Ok(())
}

/// Formats a tree as an indented outline.
#[must_use]
pub fn format_tree(tree: &MenuTree) -> String {
    let mut lines = Vec::new();
    for item in &tree.roots {
        push_item(&mut lines, item, 0);
    }
    lines.join("\n")
}

fn push_item(lines: &mut Vec<String>, item: &Item, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut line = format!("{indent}{} ({})", item.label, item.id);
    if let Some(route) = &item.route {
        line.push_str(&format!(" {route}"));
    }
    match item.status {
        Status::Active => {}
        Status::Inactive => line.push_str(" [inactive]"),
        Status::Pending => line.push_str(" [pending]"),
        Status::Deleted => line.push_str(" [deleted]"),
    }
    lines.push(line);

    for child in &item.children.submenu {
        push_item(lines, child, depth + 1);
    }
    for column in &item.children.columns {
        lines.push(format!("{indent}  | {} ({})", column.title, column.id));
        for child in &column.items {
            push_item(lines, child, depth + 2);
        }
    }
}
