//! Id allocation port for nodes created by a backend.

/// Hands out fresh backend ids.
///
/// The file store asks for one id per created item or column; tests and
/// cassette playback substitute a predictable sequence.
pub trait IdGenerator: Send + Sync {
    /// Returns an id never handed out before.
    fn generate_id(&self) -> String;
}
