//! Recording adapter for the `MenuBackend` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::menu::MenuTree;
use crate::ports::backend::{BackendFuture, MenuBackend};
use crate::sync::{PayloadNode, SyncResult};

/// Records backend calls while delegating to an inner backend.
pub struct RecordingMenuBackend {
    inner: Box<dyn MenuBackend>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingMenuBackend {
    /// Wraps `inner`, appending every call to `recorder`.
    pub fn new(inner: Box<dyn MenuBackend>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct LoadInput<'a> {
    scope: &'a str,
}

#[derive(Serialize)]
struct SyncInput<'a> {
    scope: &'a str,
    payload: &'a [PayloadNode],
}

impl MenuBackend for RecordingMenuBackend {
    fn load_tree<'a>(&'a self, scope: &'a str) -> BackendFuture<'a, MenuTree> {
        Box::pin(async move {
            let result = self.inner.load_tree(scope).await;
            record_result(&self.recorder, "backend", "load_tree", &LoadInput { scope }, &result);
            result
        })
    }

    fn sync_tree<'a>(
        &'a self,
        scope: &'a str,
        payload: &'a [PayloadNode],
    ) -> BackendFuture<'a, SyncResult> {
        Box::pin(async move {
            let result = self.inner.sync_tree(scope, payload).await;
            let input = SyncInput { scope, payload };
            record_result(&self.recorder, "backend", "sync_tree", &input, &result);
            result
        })
    }
}
