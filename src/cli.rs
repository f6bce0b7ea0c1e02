//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `menutree`.
#[derive(Debug, Parser)]
#[command(name = "menutree", version, about = "Edit hierarchical menus and sync them with a backend")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the backend's menu tree.
    Show {
        /// Only keep items whose label, route or description contains this text.
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Check the structural invariants of a tree file.
    Check {
        /// Tree file (YAML or JSON).
        file: PathBuf,
    },
    /// List the nodes that differ between two tree files.
    Diff {
        /// Tree as loaded.
        baseline: PathBuf,
        /// Tree after editing.
        working: PathBuf,
    },
    /// Print the sync payload for two tree files as JSON.
    Payload {
        /// Tree as loaded.
        baseline: PathBuf,
        /// Tree after editing.
        working: PathBuf,
    },
    /// Run an edit script against a tree file.
    Apply {
        /// Tree file to edit.
        tree: PathBuf,
        /// YAML or JSON list of edit operations.
        script: PathBuf,
        /// Where to write the edited tree; prints it when omitted.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Send the changes in a tree file to the backend.
    Sync {
        /// Edited tree file.
        working: PathBuf,
        /// Show what would be sent without sending it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Save the backend's tree to a file.
    Pull {
        /// Destination; prints the tree when omitted.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}
