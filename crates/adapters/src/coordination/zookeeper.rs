// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ZooKeeper-backed coordination client

use super::{
    CoordinationClient, CoordinationError, DeleteOutcome, DeletionWatch, EnsureOutcome, WatchEvent,
};
use async_trait::async_trait;
use monlock_core::{ancestors, ChildNode, CreatedNode, SessionId, SessionState};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use zookeeper_client as zk;

/// Coordination client for one ZooKeeper session.
///
/// Reconnection to other ensemble members is handled inside the ZooKeeper
/// client; this adapter only reports `Reconnecting` while it happens.
#[derive(Clone)]
pub struct ZkCoordination {
    client: zk::Client,
    session_id: SessionId,
    state: watch::Receiver<SessionState>,
}

impl ZkCoordination {
    /// Connect to the ensemble and establish a session
    pub async fn connect(
        ensemble: &[String],
        session_timeout: Duration,
    ) -> Result<Self, CoordinationError> {
        let cluster = ensemble.join(",");
        let client = zk::Client::connector()
            .session_timeout(session_timeout)
            .connect(&cluster)
            .await
            .map_err(|e| map_error(&cluster, e))?;

        let session_id = SessionId::new(format!("{:?}", client.session_id()));
        let (tx, rx) = watch::channel(SessionState::Connected);
        let mut states = client.state_watcher();
        tokio::spawn(async move {
            loop {
                let state = session_state(states.changed().await);
                tx.send_replace(state);
                if state.is_expired() {
                    break;
                }
            }
        });

        Ok(Self {
            client,
            session_id,
            state: rx,
        })
    }
}

fn session_state(state: zk::SessionState) -> SessionState {
    match state {
        zk::SessionState::SyncConnected | zk::SessionState::ConnectedReadOnly => {
            SessionState::Connected
        }
        zk::SessionState::Disconnected => SessionState::Reconnecting,
        _ => SessionState::Expired,
    }
}

fn map_error(path: &str, error: zk::Error) -> CoordinationError {
    match error {
        zk::Error::NoNode => CoordinationError::NoNode(path.to_string()),
        zk::Error::NodeExists => CoordinationError::NodeExists(path.to_string()),
        zk::Error::SessionExpired => CoordinationError::SessionExpired,
        zk::Error::ConnectionLoss => CoordinationError::ConnectionLoss(path.to_string()),
        other => CoordinationError::Other(other.to_string()),
    }
}

/// Node created under `base` with the server-assigned sequence.
///
/// The server pads sequences to 10 digits while they fit an `i32`, and to 19 after.
fn created_node(base: &str, sequence: i64) -> CreatedNode {
    let path = if sequence <= i64::from(i32::MAX) {
        format!("{}{:010}", base, sequence)
    } else {
        format!("{}{:019}", base, sequence)
    };
    CreatedNode {
        path,
        sequence: sequence.unsigned_abs(),
    }
}

fn watch_event(event_type: zk::EventType, state: zk::SessionState) -> WatchEvent {
    match event_type {
        zk::EventType::NodeDeleted => WatchEvent::NodeDeleted,
        zk::EventType::Session if state == zk::SessionState::Expired => WatchEvent::SessionExpired,
        _ => WatchEvent::Interrupted,
    }
}

#[async_trait]
impl CoordinationClient for ZkCoordination {
    fn session_id(&self) -> SessionId {
        self.session_id.clone()
    }

    fn session_state(&self) -> SessionState {
        *self.state.borrow()
    }

    fn session_events(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    async fn ensure_persistent_node(&self, path: &str) -> Result<EnsureOutcome, CoordinationError> {
        let options = zk::CreateMode::Persistent.with_acls(zk::Acls::anyone_all());
        let mut outcome = EnsureOutcome::AlreadyExists;
        for ancestor in ancestors(path) {
            outcome = match self.client.create(&ancestor, b"", &options).await {
                Ok(_) => EnsureOutcome::Created,
                Err(zk::Error::NodeExists) => EnsureOutcome::AlreadyExists,
                Err(e) => return Err(map_error(&ancestor, e)),
            };
        }
        Ok(outcome)
    }

    async fn create_ephemeral_sequential(
        &self,
        parent: &str,
        prefix: &str,
        data: &[u8],
    ) -> Result<CreatedNode, CoordinationError> {
        if !self.session_state().is_connected() {
            return Err(CoordinationError::NotConnected);
        }

        let base = format!("{}/{}", parent, prefix);
        let options = zk::CreateMode::EphemeralSequential.with_acls(zk::Acls::anyone_all());
        let (_, sequence) = self
            .client
            .create(&base, data, &options)
            .await
            .map_err(|e| map_error(&base, e))?;

        Ok(created_node(&base, sequence.into_i64()))
    }

    async fn list_children(&self, path: &str) -> Result<Vec<ChildNode>, CoordinationError> {
        let names = self
            .client
            .list_children(path)
            .await
            .map_err(|e| map_error(path, e))?;
        Ok(names.into_iter().map(ChildNode::from_name).collect())
    }

    async fn watch_deletion(&self, path: &str) -> Result<DeletionWatch, CoordinationError> {
        let (stat, watcher) = self
            .client
            .check_and_watch_stat(path)
            .await
            .map_err(|e| map_error(path, e))?;
        if stat.is_none() {
            return Err(CoordinationError::NoNode(path.to_string()));
        }

        let (tx, rx) = oneshot::channel();
        let forward = tokio::spawn(async move {
            let event = watcher.changed().await;
            let _ = tx.send(watch_event(event.event_type, event.session_state));
        });

        Ok(DeletionWatch::new(path, rx, move || forward.abort()))
    }

    async fn delete_node(&self, path: &str) -> Result<DeleteOutcome, CoordinationError> {
        match self.client.delete(path, None).await {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(zk::Error::NoNode) => Ok(DeleteOutcome::NotFound),
            Err(e) => Err(map_error(path, e)),
        }
    }
}

#[cfg(test)]
#[path = "zookeeper_tests.rs"]
mod tests;
