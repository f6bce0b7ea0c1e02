//! Live adapter for the `MenuBackend` port over HTTP.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::menu::MenuTree;
use crate::ports::backend::{BackendFuture, MenuBackend};
use crate::sync::{PayloadNode, SyncResult};

/// Menu backend speaking JSON over HTTP.
///
/// `GET {base}/menus?scope=..` returns the tree and
/// `POST {base}/menus/sync?scope=..` accepts a payload forest.
pub struct HttpMenuBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpMenuBackend {
    /// Creates a backend rooted at `base_url`, sending `token` as a bearer
    /// token when present.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url, token }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Error body returned by the backend.
#[derive(Deserialize)]
struct BackendError {
    message: String,
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read {what} response: {e}"))?;

    if !status.is_success() {
        let msg = serde_json::from_str::<BackendError>(&text).map(|e| e.message).unwrap_or(text);
        return Err(format!("Menu backend error ({}): {msg}", status.as_u16()).into());
    }

    Ok(serde_json::from_str(&text).map_err(|e| format!("Failed to parse {what} response: {e}"))?)
}

impl MenuBackend for HttpMenuBackend {
    fn load_tree<'a>(&'a self, scope: &'a str) -> BackendFuture<'a, MenuTree> {
        Box::pin(async move {
            let url = format!("{}/menus", self.base_url);
            debug!(%url, scope, "loading menu");
            let response = self
                .authorized(self.client.get(&url).query(&[("scope", scope)]))
                .send()
                .await
                .map_err(|e| format!("Menu load request failed: {e}"))?;
            let tree: MenuTree = read_json(response, "menu load").await?;
            info!(scope, items = tree.item_count(), "loaded menu");
            Ok(tree)
        })
    }

    fn sync_tree<'a>(
        &'a self,
        scope: &'a str,
        payload: &'a [PayloadNode],
    ) -> BackendFuture<'a, SyncResult> {
        Box::pin(async move {
            let url = format!("{}/menus/sync", self.base_url);
            debug!(%url, scope, roots = payload.len(), "submitting menu payload");
            let response = self
                .authorized(self.client.post(&url).query(&[("scope", scope)]).json(payload))
                .send()
                .await
                .map_err(|e| format!("Menu sync request failed: {e}"))?;
            read_json(response, "menu sync").await
        })
    }
}
