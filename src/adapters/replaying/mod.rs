//! Replaying adapters that serve recorded interactions.

pub mod backend;

use serde::de::DeserializeOwned;

pub use backend::ReplayingMenuBackend;

use crate::cassette::CassetteError;

/// Decodes a recorded `{"ok": v}` / `{"err": msg}` output.
///
/// # Errors
///
/// Returns the recorded error message, or a decode error when the value
/// does not have the expected shape.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|source| CassetteError::Value { context: context.to_string(), source }.into())
}
