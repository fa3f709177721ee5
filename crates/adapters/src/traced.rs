// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::coordination::{
    CoordinationClient, CoordinationError, DeleteOutcome, DeletionWatch, EnsureOutcome,
};
use async_trait::async_trait;
use monlock_core::{ChildNode, CreatedNode, SessionId, SessionState};
use tokio::sync::watch;
use tracing::Instrument;

/// Wrapper that adds tracing to any CoordinationClient
#[derive(Clone)]
pub struct TracedCoordination<C> {
    inner: C,
}

impl<C> TracedCoordination<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: CoordinationClient> CoordinationClient for TracedCoordination<C> {
    fn session_id(&self) -> SessionId {
        self.inner.session_id()
    }

    fn session_state(&self) -> SessionState {
        let state = self.inner.session_state();
        tracing::trace!(%state, "session state");
        state
    }

    fn session_events(&self) -> watch::Receiver<SessionState> {
        self.inner.session_events()
    }

    async fn ensure_persistent_node(&self, path: &str) -> Result<EnsureOutcome, CoordinationError> {
        let span = tracing::info_span!("coordination.ensure", path);
        async {
            // Precondition: paths are absolute
            if !path.starts_with('/') {
                tracing::error!("path is not absolute");
                return Err(CoordinationError::Other(format!(
                    "path is not absolute: {}",
                    path
                )));
            }

            let result = self.inner.ensure_persistent_node(path).await;
            match &result {
                Ok(outcome) => tracing::debug!(?outcome, "ensured"),
                Err(e) => tracing::error!(error = %e, "ensure failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn create_ephemeral_sequential(
        &self,
        parent: &str,
        prefix: &str,
        data: &[u8],
    ) -> Result<CreatedNode, CoordinationError> {
        let span = tracing::info_span!("coordination.create", parent, prefix);
        async {
            tracing::debug!(data_len = data.len(), "creating ephemeral sequential node");

            let start = std::time::Instant::now();
            let result = self
                .inner
                .create_ephemeral_sequential(parent, prefix, data)
                .await;
            let elapsed = start.elapsed();

            match &result {
                Ok(node) => tracing::info!(
                    path = %node.path,
                    sequence = node.sequence,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "node created"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "create failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn list_children(&self, path: &str) -> Result<Vec<ChildNode>, CoordinationError> {
        let result = self.inner.list_children(path).await;
        match &result {
            Ok(children) => tracing::trace!(path, count = children.len(), "listed children"),
            Err(e) => tracing::warn!(path, error = %e, "list failed"),
        }
        result
    }

    async fn watch_deletion(&self, path: &str) -> Result<DeletionWatch, CoordinationError> {
        let span = tracing::info_span!("coordination.watch", path);
        async {
            let result = self.inner.watch_deletion(path).await;
            // NoNode is expected when the node went away before the watch landed
            match &result {
                Ok(_) => tracing::debug!("watch registered"),
                Err(CoordinationError::NoNode(_)) => tracing::debug!("node already gone"),
                Err(e) => tracing::error!(error = %e, "watch failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn delete_node(&self, path: &str) -> Result<DeleteOutcome, CoordinationError> {
        let span = tracing::info_span!("coordination.delete", path);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.delete_node(path).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(DeleteOutcome::Deleted) => {
                    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "node deleted")
                }
                Ok(DeleteOutcome::NotFound) => tracing::warn!("node already absent"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "delete failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
