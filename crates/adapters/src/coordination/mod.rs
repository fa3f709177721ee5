// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination service adapters
//!
//! The lock engine only talks to the ensemble through [`CoordinationClient`]:
//! hierarchical node CRUD, ephemeral sequential creation, one-shot deletion
//! watches and session state.

mod watch;
mod zookeeper;

pub use self::watch::{DeletionWatch, WatchEvent};
pub use self::zookeeper::ZkCoordination;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CoordinationCall, CoordinationOp, FakeCoordination, FakeSession};

use async_trait::async_trait;
use monlock_core::{ChildNode, CreatedNode, SessionId, SessionState};
use thiserror::Error;

/// Errors from coordination operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinationError {
    #[error("node already exists: {0}")]
    NodeExists(String),
    #[error("node not found: {0}")]
    NoNode(String),
    #[error("session is not connected")]
    NotConnected,
    #[error("session expired")]
    SessionExpired,
    #[error("connection lost: {0}")]
    ConnectionLoss(String),
    #[error("coordination service error: {0}")]
    Other(String),
}

impl CoordinationError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, CoordinationError::SessionExpired)
    }
}

/// Result of making sure a persistent node exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Result of deleting a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Client for a coordination session on the ensemble.
///
/// Implementations are cheap handles onto one session; clones share it.
#[async_trait]
pub trait CoordinationClient: Clone + Send + Sync + 'static {
    /// Identifier of the underlying session
    fn session_id(&self) -> SessionId;

    /// Current session liveness
    fn session_state(&self) -> SessionState;

    /// Subscribe to session state transitions
    fn session_events(&self) -> tokio::sync::watch::Receiver<SessionState>;

    /// Create a persistent node and any missing ancestors
    async fn ensure_persistent_node(&self, path: &str) -> Result<EnsureOutcome, CoordinationError>;

    /// Create an ephemeral node named `prefix` + service-assigned sequence under `parent`
    async fn create_ephemeral_sequential(
        &self,
        parent: &str,
        prefix: &str,
        data: &[u8],
    ) -> Result<CreatedNode, CoordinationError>;

    /// List direct children of a node
    async fn list_children(&self, path: &str) -> Result<Vec<ChildNode>, CoordinationError>;

    /// Register a one-shot watch that fires when the node is deleted.
    ///
    /// Fails with [`CoordinationError::NoNode`] if the node is already gone.
    async fn watch_deletion(&self, path: &str) -> Result<DeletionWatch, CoordinationError>;

    /// Delete a node
    async fn delete_node(&self, path: &str) -> Result<DeleteOutcome, CoordinationError>;
}
