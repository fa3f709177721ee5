// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot deletion watches

use std::fmt;
use tokio::sync::oneshot;

/// What resolved a deletion watch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The watched node was deleted
    NodeDeleted,
    /// The session that registered the watch expired
    SessionExpired,
    /// The watch ended for another reason; the caller should re-check the node
    Interrupted,
}

/// A registered deletion watch.
///
/// Resolves at most once. Dropping an unfired watch deregisters it, so an
/// abandoned wait never leaves a callback behind in the adapter.
pub struct DeletionWatch {
    path: String,
    rx: oneshot::Receiver<WatchEvent>,
    canceller: Option<Box<dyn FnOnce() + Send>>,
}

impl DeletionWatch {
    pub fn new(
        path: impl Into<String>,
        rx: oneshot::Receiver<WatchEvent>,
        canceller: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            rx,
            canceller: Some(Box::new(canceller)),
        }
    }

    /// Path of the watched node
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Wait for the watch to fire
    pub async fn fired(&mut self) -> WatchEvent {
        let event = (&mut self.rx).await.unwrap_or(WatchEvent::Interrupted);
        self.canceller = None;
        event
    }

    /// Deregister the watch without waiting for it
    pub fn cancel(mut self) {
        self.deregister();
    }

    fn deregister(&mut self) {
        if let Some(cancel) = self.canceller.take() {
            cancel();
        }
    }
}

impl Drop for DeletionWatch {
    fn drop(&mut self) {
        self.deregister();
    }
}

impl fmt::Debug for DeletionWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeletionWatch")
            .field("path", &self.path)
            .field("armed", &self.canceller.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
