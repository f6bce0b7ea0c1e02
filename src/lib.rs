//! Core library entry for the `menutree` CLI.
//!
//! The engine is split into layers: [`menu`] holds the tree model and its
//! queries, [`edit`] the pure structural mutations, [`diff`] dirty tracking,
//! and [`sync`] the payload sent to a backend. [`editor::MenuEditor`] ties
//! them together into an editing session behind the [`ports`] seams.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod diff;
pub mod edit;
pub mod editor;
pub mod error;
pub mod logging;
pub mod menu;
pub mod ports;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
