// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory coordination ensemble for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    CoordinationClient, CoordinationError, DeleteOutcome, DeletionWatch, EnsureOutcome, WatchEvent,
};
use async_trait::async_trait;
use monlock_core::{ancestors, ChildNode, CreatedNode, SessionId, SessionState};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, watch};

/// Recorded coordination call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinationCall {
    EnsurePersistent { path: String },
    CreateEphemeralSequential { parent: String, prefix: String },
    ListChildren { path: String },
    WatchDeletion { path: String },
    DeleteNode { path: String },
}

/// Operation kinds that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinationOp {
    Ensure,
    Create,
    List,
    Watch,
    Delete,
}

#[derive(Debug)]
struct FakeNode {
    data: Vec<u8>,
    owner: Option<SessionId>,
}

struct PendingWatch {
    id: u64,
    path: String,
    session: SessionId,
    tx: oneshot::Sender<WatchEvent>,
}

#[derive(Default)]
struct Ensemble {
    nodes: BTreeMap<String, FakeNode>,
    /// Next sequence number per parent path
    counters: HashMap<String, u64>,
    watches: Vec<PendingWatch>,
    next_watch: u64,
}

impl Ensemble {
    fn remove_node(&mut self, path: &str) -> bool {
        if self.nodes.remove(path).is_none() {
            return false;
        }
        let (fired, kept): (Vec<_>, Vec<_>) =
            self.watches.drain(..).partition(|w| w.path == path);
        self.watches = kept;
        for watch in fired {
            let _ = watch.tx.send(WatchEvent::NodeDeleted);
        }
        true
    }

    fn children(&self, path: &str) -> Vec<String> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        self.nodes
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect()
    }
}

/// Shared in-memory ensemble; hand out sessions with [`FakeCoordination::session`]
#[derive(Clone, Default)]
pub struct FakeCoordination {
    ensemble: Arc<Mutex<Ensemble>>,
    next_session: Arc<AtomicU64>,
}

impl FakeCoordination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new connected session on this ensemble
    pub fn session(&self) -> FakeSession {
        let n = self.next_session.fetch_add(1, Ordering::SeqCst) + 1;
        let (state, _) = watch::channel(SessionState::Connected);
        FakeSession {
            id: SessionId::new(format!("fake-session-{}", n)),
            ensemble: self.ensemble.clone(),
            state: Arc::new(state),
            faults: Arc::default(),
            lost_creates: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// Names of the direct children of a node, sorted
    pub fn children(&self, path: &str) -> Vec<String> {
        self.lock().children(path)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.lock().nodes.contains_key(path)
    }

    pub fn data(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().nodes.get(path).map(|n| n.data.clone())
    }

    /// Number of registered, unfired watches
    pub fn watch_count(&self) -> usize {
        self.lock().watches.len()
    }

    /// Delete a node out from under its owner (operator action)
    pub fn delete(&self, path: &str) -> bool {
        self.lock().remove_node(path)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ensemble> {
        self.ensemble.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One fake session on a [`FakeCoordination`] ensemble
#[derive(Clone)]
pub struct FakeSession {
    id: SessionId,
    ensemble: Arc<Mutex<Ensemble>>,
    state: Arc<watch::Sender<SessionState>>,
    faults: Arc<Mutex<VecDeque<(CoordinationOp, CoordinationError)>>>,
    lost_creates: Arc<Mutex<VecDeque<CoordinationError>>>,
    calls: Arc<Mutex<Vec<CoordinationCall>>>,
}

impl FakeSession {
    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CoordinationCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Fail the next call of the given kind with `error`
    pub fn fail_next(&self, op: CoordinationOp, error: CoordinationError) {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back((op, error));
    }

    /// Let the next create succeed on the ensemble but report `error` to the caller
    pub fn fail_after_create(&self, error: CoordinationError) {
        self.lost_creates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(error);
    }

    /// Expire the session: its ephemeral nodes vanish and its watches fire
    pub fn expire(&self) {
        self.state.send_replace(SessionState::Expired);

        let mut ensemble = self.lock_ensemble();
        let (own, others): (Vec<_>, Vec<_>) = ensemble
            .watches
            .drain(..)
            .partition(|w| w.session == self.id);
        ensemble.watches = others;
        for watch in own {
            let _ = watch.tx.send(WatchEvent::SessionExpired);
        }

        let owned: Vec<String> = ensemble
            .nodes
            .iter()
            .filter(|(_, node)| node.owner.as_ref() == Some(&self.id))
            .map(|(path, _)| path.clone())
            .collect();
        for path in owned {
            ensemble.remove_node(&path);
        }
    }

    /// Drop the connection without losing the session
    pub fn disconnect(&self) {
        if !self.state.borrow().is_expired() {
            self.state.send_replace(SessionState::Reconnecting);
        }
    }

    /// Restore the connection after [`FakeSession::disconnect`]
    pub fn reconnect(&self) {
        if !self.state.borrow().is_expired() {
            self.state.send_replace(SessionState::Connected);
        }
    }

    fn record(&self, call: CoordinationCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    /// Check liveness and injected faults before touching the ensemble
    fn check(&self, op: CoordinationOp) -> Result<(), CoordinationError> {
        match *self.state.borrow() {
            SessionState::Expired => return Err(CoordinationError::SessionExpired),
            SessionState::Reconnecting => return Err(CoordinationError::NotConnected),
            SessionState::Connected => {}
        }

        let mut faults = self.faults.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(index) = faults.iter().position(|(o, _)| *o == op) {
            if let Some((_, error)) = faults.remove(index) {
                return Err(error);
            }
        }
        Ok(())
    }

    fn lock_ensemble(&self) -> std::sync::MutexGuard<'_, Ensemble> {
        self.ensemble.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CoordinationClient for FakeSession {
    fn session_id(&self) -> SessionId {
        self.id.clone()
    }

    fn session_state(&self) -> SessionState {
        *self.state.borrow()
    }

    fn session_events(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    async fn ensure_persistent_node(&self, path: &str) -> Result<EnsureOutcome, CoordinationError> {
        self.record(CoordinationCall::EnsurePersistent {
            path: path.to_string(),
        });
        self.check(CoordinationOp::Ensure)?;

        let mut ensemble = self.lock_ensemble();
        let mut outcome = EnsureOutcome::AlreadyExists;
        for ancestor in ancestors(path) {
            outcome = if ensemble.nodes.contains_key(&ancestor) {
                EnsureOutcome::AlreadyExists
            } else {
                ensemble.nodes.insert(
                    ancestor,
                    FakeNode {
                        data: Vec::new(),
                        owner: None,
                    },
                );
                EnsureOutcome::Created
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
        self.record(CoordinationCall::CreateEphemeralSequential {
            parent: parent.to_string(),
            prefix: prefix.to_string(),
        });
        self.check(CoordinationOp::Create)?;

        let mut ensemble = self.lock_ensemble();
        if !ensemble.nodes.contains_key(parent) {
            return Err(CoordinationError::NoNode(parent.to_string()));
        }

        let counter = ensemble.counters.entry(parent.to_string()).or_insert(0);
        *counter += 1;
        let sequence = *counter;
        let path = format!("{}/{}{:010}", parent, prefix, sequence);
        ensemble.nodes.insert(
            path.clone(),
            FakeNode {
                data: data.to_vec(),
                owner: Some(self.id.clone()),
            },
        );
        drop(ensemble);

        let lost = self
            .lost_creates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(error) = lost {
            return Err(error);
        }

        Ok(CreatedNode { path, sequence })
    }

    async fn list_children(&self, path: &str) -> Result<Vec<ChildNode>, CoordinationError> {
        self.record(CoordinationCall::ListChildren {
            path: path.to_string(),
        });
        self.check(CoordinationOp::List)?;

        let ensemble = self.lock_ensemble();
        if !ensemble.nodes.contains_key(path) {
            return Err(CoordinationError::NoNode(path.to_string()));
        }
        Ok(ensemble
            .children(path)
            .into_iter()
            .map(ChildNode::from_name)
            .collect())
    }

    async fn watch_deletion(&self, path: &str) -> Result<DeletionWatch, CoordinationError> {
        self.record(CoordinationCall::WatchDeletion {
            path: path.to_string(),
        });
        self.check(CoordinationOp::Watch)?;

        let mut ensemble = self.lock_ensemble();
        if !ensemble.nodes.contains_key(path) {
            return Err(CoordinationError::NoNode(path.to_string()));
        }

        let (tx, rx) = oneshot::channel();
        let id = ensemble.next_watch;
        ensemble.next_watch += 1;
        ensemble.watches.push(PendingWatch {
            id,
            path: path.to_string(),
            session: self.id.clone(),
            tx,
        });

        let registry = self.ensemble.clone();
        Ok(DeletionWatch::new(path, rx, move || {
            registry
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .watches
                .retain(|w| w.id != id);
        }))
    }

    async fn delete_node(&self, path: &str) -> Result<DeleteOutcome, CoordinationError> {
        self.record(CoordinationCall::DeleteNode {
            path: path.to_string(),
        });
        self.check(CoordinationOp::Delete)?;

        let mut ensemble = self.lock_ensemble();
        if !ensemble.children(path).is_empty() {
            return Err(CoordinationError::Other(format!("node not empty: {}", path)));
        }
        if ensemble.remove_node(path) {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
