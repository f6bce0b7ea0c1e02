//! Recording session owning the cassette recorders of one CLI run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Recorders for one run, writing into a timestamped directory.
///
/// Only the backend port is recorded; it is the only boundary whose answers
/// cannot be rebuilt from local files.
pub struct RecordingSession {
    /// Recorder for backend interactions.
    pub backend: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates a session writing to `<root>/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new(root: &Path, scope: &str) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let path = output_dir.join("backend.cassette.yaml");
        let recorder = CassetteRecorder::new(path, format!("{timestamp}-backend"), scope);
        Ok(Self { backend: Arc::new(Mutex::new(recorder)), output_dir })
    }

    /// Writes the cassette files and returns their directory.
    ///
    /// Every adapter holding a recorder must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be
    /// written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.backend)
            .map_err(|_| "Recording adapter for backend still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for backend poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write backend cassette: {e}"))?;
        Ok(self.output_dir)
    }
}
