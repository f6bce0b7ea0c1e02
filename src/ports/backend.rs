//! Persistence backend port.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::menu::MenuTree;
use crate::sync::{PayloadNode, SyncResult};

/// Boxed future returned by [`MenuBackend`] methods, keeping the trait
/// dyn-compatible.
pub type BackendFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Loads and stores menu trees.
///
/// `scope` selects the tenant whose menu is addressed.
pub trait MenuBackend: Send + Sync {
    /// Fetches the current tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or answers with
    /// something that is not a tree.
    fn load_tree<'a>(&'a self, scope: &'a str) -> BackendFuture<'a, MenuTree>;

    /// Submits a payload forest.
    ///
    /// Refusals of individual nodes are reported in
    /// [`SyncResult::per_node_errors`]; an `Err` means the request as a whole
    /// did not go through.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    fn sync_tree<'a>(
        &'a self,
        scope: &'a str,
        payload: &'a [PayloadNode],
    ) -> BackendFuture<'a, SyncResult>;
}
