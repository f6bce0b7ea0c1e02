//! Command dispatch and handlers.

pub mod apply;
pub mod check;
pub mod diff;
pub mod payload;
pub mod pull;
pub mod show;
pub mod sync;

mod files;

use std::future::Future;
use std::sync::Arc;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::MenuConfig;
use crate::context::ServiceContext;
use crate::error::{EditorError, SyncError};

/// Dispatch a parsed command to its handler.
///
/// When `MENUTREE_RECORD` is set to a directory path, backend interactions
/// are recorded to a cassette in a timestamped directory below it.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = MenuConfig::from_env();
    let session = match &config.record_dir {
        Some(dir) => Some(RecordingSession::new(dir, &config.scope)?),
        None => None,
    };
    let ctx = match &session {
        Some(session) => ServiceContext::recording(&config, Arc::clone(&session.backend)),
        None => ServiceContext::live(&config),
    };

    let result = dispatch_with_context(command, &ctx, &config);

    // The recorder must be released before the cassette is written, even
    // when the command failed.
    if let Some(session) = session {
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &MenuConfig,
) -> Result<(), String> {
    match command {
        Command::Show { query } => show::run(ctx, &config.scope, query.as_deref()),
        Command::Check { file } => check::run(ctx, file),
        Command::Diff { baseline, working } => diff::run(ctx, baseline, working),
        Command::Payload { baseline, working } => payload::run(ctx, &config.scope, baseline, working),
        Command::Apply { tree, script, out } => apply::run(ctx, &config.scope, tree, script, out.as_deref()),
        Command::Sync { working, dry_run } => sync::run(ctx, &config.scope, working, *dry_run),
        Command::Pull { out } => pull::run(ctx, &config.scope, out.as_deref()),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

/// Drives a backend future to completion on a single-threaded runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}

/// Renders an editor error with the per-item details a bare `Display`
/// leaves out.
fn describe(err: &EditorError) -> String {
    let details: Vec<String> = match err {
        EditorError::Incomplete(issues) => issues.iter().map(ToString::to_string).collect(),
        EditorError::Sync(SyncError::PerNodeRejected(errors)) => {
            errors.iter().map(ToString::to_string).collect()
        }
        _ => Vec::new(),
    };
    std::iter::once(err.to_string())
        .chain(details.into_iter().map(|line| format!("  {line}")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RequiredField, ValidationError};
    use crate::menu::NodeId;
    use crate::sync::NodeError;

    #[test]
    fn describe_lists_incomplete_items() {
        let err = EditorError::Incomplete(vec![ValidationError::MissingRequiredField {
            node: NodeId::Temporary(3),
            field: RequiredField::Route,
        }]);
        assert_eq!(describe(&err), "1 item(s) are incomplete\n  item 'tmp-3' is missing its route");
    }

    #[test]
    fn describe_lists_rejected_nodes() {
        let err: EditorError = SyncError::PerNodeRejected(vec![NodeError {
            node_ref: "a".into(),
            message: "locked".into(),
        }])
        .into();
        assert_eq!(describe(&err), "backend rejected 1 node(s)\n  a: locked");
    }

    #[test]
    fn block_on_runs_future() {
        assert_eq!(block_on(async { 7 }), Ok(7));
    }
}
