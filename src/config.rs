//! Environment-driven configuration.

use std::path::PathBuf;

/// Backend URL; when set, the HTTP backend is used.
pub const BACKEND_URL_VAR: &str = "MENUTREE_BACKEND_URL";
/// Bearer token sent to the HTTP backend.
pub const API_TOKEN_VAR: &str = "MENUTREE_API_TOKEN";
/// Path of the local file store.
pub const STORE_VAR: &str = "MENUTREE_STORE";
/// Menu scope (tenant) to work on.
pub const SCOPE_VAR: &str = "MENUTREE_SCOPE";
/// Directory receiving cassettes of backend calls.
pub const RECORD_VAR: &str = "MENUTREE_RECORD";

const DEFAULT_STORE: &str = ".menutree/menu.yaml";
const DEFAULT_SCOPE: &str = "default";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Base URL of the HTTP backend.
    pub backend_url: Option<String>,
    /// Bearer token for the HTTP backend.
    pub api_token: Option<String>,
    /// Local store used when no URL is configured.
    pub store: PathBuf,
    /// Scope passed to every backend call.
    pub scope: String,
    /// Where to record backend cassettes, if anywhere.
    pub record_dir: Option<PathBuf>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            api_token: None,
            store: PathBuf::from(DEFAULT_STORE),
            scope: DEFAULT_SCOPE.to_string(),
            record_dir: None,
        }
    }
}

impl MenuConfig {
    /// Reads the process environment, after loading a `.env` file from the
    /// working directory if there is one.
    #[must_use]
    pub fn from_env() -> Self {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Blank
    /// values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            backend_url: get(BACKEND_URL_VAR),
            api_token: get(API_TOKEN_VAR),
            store: get(STORE_VAR).map_or(defaults.store, PathBuf::from),
            scope: get(SCOPE_VAR).unwrap_or(defaults.scope),
            record_dir: get(RECORD_VAR).map(PathBuf::from),
        }
    }
}
