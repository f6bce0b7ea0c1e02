//! Service context bundling the port trait objects a command needs.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::{FileMenuBackend, HttpMenuBackend, LiveFileSystem, LiveIdGenerator};
use crate::adapters::recording::RecordingMenuBackend;
use crate::adapters::replaying::ReplayingMenuBackend;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::MenuConfig;
use crate::ports::backend::MenuBackend;
use crate::ports::filesystem::FileSystem;

/// Bundles the ports used by the commands.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Persistence backend holding the menu.
    pub backend: Box<dyn MenuBackend>,
    /// Filesystem for tree files.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context: the HTTP backend when a URL is configured,
    /// otherwise the local file store.
    #[must_use]
    pub fn live(config: &MenuConfig) -> Self {
        Self { backend: live_backend(config), fs: Box::new(LiveFileSystem) }
    }

    /// Creates a live context whose backend calls are appended to
    /// `recorder`.
    #[must_use]
    pub fn recording(config: &MenuConfig, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        let backend = RecordingMenuBackend::new(live_backend(config), recorder);
        Self { backend: Box::new(backend), fs: Box::new(LiveFileSystem) }
    }

    /// Creates a context whose backend answers come from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)
            .map_err(|e| format!("Failed to load cassette {}: {e}", path.display()))?;
        Ok(Self {
            backend: Box::new(ReplayingMenuBackend::new(CassetteReplayer::new(&cassette))),
            fs: Box::new(LiveFileSystem),
        })
    }
}

fn live_backend(config: &MenuConfig) -> Box<dyn MenuBackend> {
    match &config.backend_url {
        Some(url) => Box::new(HttpMenuBackend::new(url.clone(), config.api_token.clone())),
        None => Box::new(FileMenuBackend::new(
            config.store.clone(),
            Box::new(LiveFileSystem),
            Box::new(LiveIdGenerator),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn replaying_context_serves_backend_from_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backend.cassette.yaml");
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            scope: "acme".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "backend".into(),
                method: "load_tree".into(),
                input: json!({"scope": "acme"}),
                output: json!({"ok": []}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert!(ctx.backend.load_tree("acme").await.unwrap().is_empty());
    }

    #[test]
    fn replaying_context_reports_missing_cassette() {
        let err = ServiceContext::replaying(Path::new("/missing.cassette.yaml")).err().unwrap();
        assert!(err.contains("Failed to load cassette"));
    }

    #[tokio::test]
    async fn live_context_without_url_uses_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = MenuConfig { store: dir.path().join("menu.yaml"), ..MenuConfig::default() };
        let ctx = ServiceContext::live(&config);
        assert!(ctx.backend.load_tree("default").await.unwrap().is_empty());
    }
}
