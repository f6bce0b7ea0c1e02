//! Recording adapters that capture interactions to cassettes.

pub mod backend;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

pub use backend::RecordingMenuBackend;

/// Records a `Result` interaction using the `{"ok": v}` / `{"err": msg}`
/// convention read back by the replaying adapters.
///
/// A value that cannot be serialized is skipped with a warning; recording
/// never changes the outcome of the call.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(value) => serde_json::to_value(value).map(|v| serde_json::json!({ "ok": v })),
        Err(e) => Ok(serde_json::json!({ "err": e.to_string() })),
    };
    let (input, output) = match (serde_json::to_value(input), output) {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => {
            warn!(port, method, error = %e, "skipping unserializable interaction");
            return;
        }
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(e) => warn!(port, method, error = %e, "recorder lock poisoned"),
    }
}
