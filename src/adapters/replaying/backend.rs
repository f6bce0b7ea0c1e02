//! Replaying adapter for the `MenuBackend` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::menu::MenuTree;
use crate::ports::backend::{BackendFuture, MenuBackend};
use crate::sync::{PayloadNode, SyncResult};

/// Serves backend answers from a cassette.
pub struct ReplayingMenuBackend {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingMenuBackend {
    /// Creates a backend replaying `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next_output(
        &self,
        method: &str,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
        let mut replayer =
            self.replayer.lock().map_err(|e| format!("replayer lock poisoned: {e}"))?;
        Ok(replayer.next_interaction("backend", method)?.output.clone())
    }
}

impl MenuBackend for ReplayingMenuBackend {
    fn load_tree<'a>(&'a self, _scope: &'a str) -> BackendFuture<'a, MenuTree> {
        let output = self.next_output("load_tree");
        Box::pin(async move { replay_result(&output?, "backend::load_tree") })
    }

    fn sync_tree<'a>(
        &'a self,
        _scope: &'a str,
        _payload: &'a [PayloadNode],
    ) -> BackendFuture<'a, SyncResult> {
        let output = self.next_output("sync_tree");
        Box::pin(async move { replay_result(&output?, "backend::sync_tree") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette =
            Cassette { name: "test".into(), recorded_at: Utc::now(), scope: "acme".into(), interactions };
        CassetteReplayer::new(&cassette)
    }

    fn call(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "backend".into(), method: method.into(), input: json!({}), output }
    }

    #[tokio::test]
    async fn replays_tree_and_sync_result() {
        let backend = ReplayingMenuBackend::new(make_replayer(vec![
            call(
                0,
                "load_tree",
                json!({"ok": [{"id": "a", "label": "A", "status": 1, "order": 0, "level": 0}]}),
            ),
            call(
                1,
                "sync_tree",
                json!({"ok": {"createdCount": 1, "updatedCount": 0, "reactivatedCount": 0}}),
            ),
        ]));

        let tree = backend.load_tree("acme").await.unwrap();
        assert_eq!(tree.roots[0].label, "A");
        let result = backend.sync_tree("acme", &[]).await.unwrap();
        assert_eq!(result.created_count, 1);
        assert!(result.per_node_errors.is_empty());
    }

    #[tokio::test]
    async fn recorded_transport_failure_replays_as_error() {
        let backend = ReplayingMenuBackend::new(make_replayer(vec![call(
            0,
            "sync_tree",
            json!({"err": "Menu sync request failed: connection refused"}),
        )]));
        let err = backend.sync_tree("acme", &[]).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn exhausted_cassette_is_an_error_not_a_panic() {
        let backend = ReplayingMenuBackend::new(make_replayer(vec![]));
        let err = backend.load_tree("acme").await.unwrap_err();
        assert!(err.to_string().contains("no interactions for backend::load_tree"));
    }
}
