// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock protocol engine
//!
//! Acquire:
//! 1. Ensure the lock path exists as a persistent node
//! 2. Create an ephemeral sequential contender node under it
//! 3. List contenders and sort by sequence
//! 4. Lowest sequence holds the lock
//! 5. Otherwise watch the immediate predecessor for deletion and wait
//! 6. On any wake-up, go back to 3
//!
//! Release deletes the contender node; a node that is already gone counts as released.

use crate::error::LockError;
use crate::handle::LockHandle;
use monlock_adapters::{CoordinationClient, CoordinationError, DeleteOutcome, WatchEvent};
use monlock_core::{contender_prefix, CreatedNode, IdGen, LockPath, SessionState, UuidIdGen};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Single-owner lock engine bound to one coordination session and lock path.
///
/// Not safe for concurrent operations on the same instance; contention between
/// instances is resolved entirely by sequence ordering on the service.
pub struct LockEngine<C> {
    client: C,
    lock_path: LockPath,
    /// Embedded in contender names so a lost create can be found again
    contender_id: String,
    data: Vec<u8>,
    handle: Option<LockHandle>,
    /// A previous attempt may have left a contender node behind
    needs_cleanup: bool,
}

impl<C: CoordinationClient> LockEngine<C> {
    pub fn new(client: C, lock_path: LockPath) -> Self {
        Self::with_id_gen(client, lock_path, &UuidIdGen)
    }

    /// Resolve the lock path for an environment and build an engine for it
    pub fn for_environment(
        client: C,
        namespace_prefix: &str,
        environment: &str,
    ) -> Result<Self, LockError> {
        let lock_path = LockPath::resolve(namespace_prefix, environment)?;
        Ok(Self::new(client, lock_path))
    }

    /// Build an engine whose contender identifier comes from `id_gen`
    pub fn with_id_gen(client: C, lock_path: LockPath, id_gen: &impl IdGen) -> Self {
        Self {
            client,
            lock_path,
            contender_id: id_gen.next(),
            data: Vec::new(),
            handle: None,
            needs_cleanup: false,
        }
    }

    /// Payload written into each contender node
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn lock_path(&self) -> &LockPath {
        &self.lock_path
    }

    pub fn handle(&self) -> Option<&LockHandle> {
        self.handle.as_ref()
    }

    pub fn is_held(&self) -> bool {
        self.handle.is_some()
    }

    /// Block until this engine holds the lock or the session expires
    pub async fn acquire(&mut self) -> Result<(), LockError> {
        self.lock(None).await
    }

    /// Like [`LockEngine::acquire`], but give up after `timeout`.
    ///
    /// On timeout the contender node is deleted and its watch deregistered.
    pub async fn acquire_timeout(&mut self, timeout: Duration) -> Result<(), LockError> {
        self.lock(Some(timeout)).await
    }

    /// Release a held lock
    pub async fn release(&mut self) -> Result<(), LockError> {
        let Some(handle) = self.handle.as_ref() else {
            return Err(LockError::NotHeld);
        };

        match self.client.delete_node(&handle.node_path).await {
            Ok(DeleteOutcome::Deleted) => {
                info!(lock = %self.lock_path, node = %handle.node_path, "lock released")
            }
            Ok(DeleteOutcome::NotFound) => {
                warn!(node = %handle.node_path, "contender node already gone, treating as released")
            }
            // Ephemeral nodes do not outlive their session
            Err(CoordinationError::SessionExpired) => {
                warn!(node = %handle.node_path, "session expired before release, treating as released")
            }
            Err(e) => return Err(LockError::CoordinationUnavailable(e)),
        }

        self.handle = None;
        Ok(())
    }

    /// Remove any contender node left by an unfinished acquire.
    ///
    /// An `acquire` future dropped while waiting keeps its node queued until the
    /// session ends; this takes it out of line so the next contender moves up.
    /// Does nothing while the lock is held or when no attempt is outstanding.
    pub async fn withdraw(&mut self) -> Result<(), LockError> {
        if self.handle.is_some() || !self.needs_cleanup {
            return Ok(());
        }
        if self.client.session_state().is_expired() {
            self.needs_cleanup = false;
            return Ok(());
        }
        self.remove_orphans().await
    }

    /// Wait while holding the lock until the session expires.
    ///
    /// Returns [`LockError::SessionExpired`] once the lock is lost and the
    /// handle has been dropped, or [`LockError::NotHeld`] immediately.
    pub async fn wait_for_loss(&mut self) -> LockError {
        if self.handle.is_none() {
            return LockError::NotHeld;
        }

        let mut session = self.client.session_events();
        session_expired(&mut session).await;

        if let Some(handle) = self.handle.take() {
            warn!(lock = %self.lock_path, node = %handle.node_path, "session expired, lock lost");
        }
        LockError::SessionExpired
    }

    async fn lock(&mut self, timeout: Option<Duration>) -> Result<(), LockError> {
        if self.handle.is_some() {
            return Err(LockError::AlreadyHeld);
        }

        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let mut session = self.client.session_events();
        if self.client.session_state().is_expired() {
            return Err(LockError::SessionExpired);
        }

        self.client
            .ensure_persistent_node(self.lock_path.as_str())
            .await?;

        if self.needs_cleanup {
            self.remove_orphans().await?;
        }

        // Stays set until the node is held or removed, so a dropped future
        // leaves the next attempt to clean up after it
        self.needs_cleanup = true;
        let prefix = contender_prefix(&self.contender_id);
        let node = match self
            .client
            .create_ephemeral_sequential(self.lock_path.as_str(), &prefix, &self.data)
            .await
        {
            Ok(node) => node,
            Err(e) => {
                // The node may exist even though the reply was lost
                self.needs_cleanup = !e.is_session_expired();
                return Err(e.into());
            }
        };
        debug!(
            lock = %self.lock_path,
            node = %node.path,
            sequence = node.sequence,
            "contender registered"
        );

        match self.wait_for_turn(&node, &mut session, deadline).await {
            Ok(()) => {
                info!(
                    lock = %self.lock_path,
                    node = %node.path,
                    sequence = node.sequence,
                    "lock acquired"
                );
                self.needs_cleanup = false;
                self.handle = Some(LockHandle {
                    node_path: node.path,
                    sequence: node.sequence,
                    session_id: self.client.session_id(),
                });
                Ok(())
            }
            Err(e) => {
                self.abandon(&node, &e).await;
                Err(e)
            }
        }
    }

    async fn wait_for_turn(
        &self,
        node: &CreatedNode,
        session: &mut watch::Receiver<SessionState>,
        deadline: Option<(Instant, Duration)>,
    ) -> Result<(), LockError> {
        let own_name = node
            .path
            .rsplit_once('/')
            .map_or(node.path.as_str(), |(_, name)| name);

        loop {
            let mut contenders: Vec<(u64, String)> = self
                .client
                .list_children(self.lock_path.as_str())
                .await?
                .into_iter()
                .filter_map(|child| child.sequence.map(|seq| (seq, child.name)))
                .collect();
            contenders.sort();

            if !contenders.iter().any(|(_, name)| name == own_name) {
                if session.borrow().is_expired() {
                    return Err(LockError::SessionExpired);
                }
                return Err(LockError::CoordinationUnavailable(CoordinationError::NoNode(
                    node.path.clone(),
                )));
            }

            let Some(predecessor) = predecessor(&contenders, node.sequence) else {
                return Ok(());
            };
            let predecessor_path = self.lock_path.child(predecessor);
            debug!(
                node = %node.path,
                predecessor = %predecessor_path,
                ahead = contenders.iter().filter(|(seq, _)| *seq < node.sequence).count(),
                "waiting for predecessor"
            );

            let mut watch = match self.client.watch_deletion(&predecessor_path).await {
                Ok(watch) => watch,
                // Gone between listing and watching: re-evaluate
                Err(CoordinationError::NoNode(_)) => continue,
                Err(e) => return Err(e.into()),
            };

            tokio::select! {
                event = watch.fired() => match event {
                    WatchEvent::NodeDeleted | WatchEvent::Interrupted => {
                        debug!(predecessor = %predecessor_path, ?event, "predecessor watch fired");
                    }
                    WatchEvent::SessionExpired => return Err(LockError::SessionExpired),
                },
                () = session_expired(session) => {
                    watch.cancel();
                    return Err(LockError::SessionExpired);
                }
                () = deadline_reached(deadline) => {
                    watch.cancel();
                    let waited = deadline.map(|(_, t)| t).unwrap_or_default();
                    return Err(LockError::Timeout(waited));
                }
            }
        }
    }

    /// Delete our contender node after a failed acquire
    async fn abandon(&mut self, node: &CreatedNode, error: &LockError) {
        if matches!(error, LockError::SessionExpired) {
            // Ephemeral nodes went with the session
            self.needs_cleanup = false;
            return;
        }
        match self.client.delete_node(&node.path).await {
            Ok(_) => {
                debug!(node = %node.path, "abandoned contender removed");
                self.needs_cleanup = false;
            }
            Err(e) => {
                warn!(node = %node.path, error = %e, "failed to remove abandoned contender");
                self.needs_cleanup = true;
            }
        }
    }

    /// Delete contender nodes left behind by earlier failed attempts of this engine
    async fn remove_orphans(&mut self) -> Result<(), LockError> {
        let prefix = contender_prefix(&self.contender_id);
        let children = self.client.list_children(self.lock_path.as_str()).await?;
        for child in children.iter().filter(|c| c.has_prefix(&prefix)) {
            let path = self.lock_path.child(&child.name);
            warn!(node = %path, "removing orphaned contender from a failed attempt");
            self.client.delete_node(&path).await?;
        }
        self.needs_cleanup = false;
        Ok(())
    }
}

/// Name of the contender with the greatest sequence below `own`
fn predecessor(contenders: &[(u64, String)], own: u64) -> Option<&str> {
    contenders
        .iter()
        .filter(|(seq, _)| *seq < own)
        .max_by_key(|(seq, _)| *seq)
        .map(|(_, name)| name.as_str())
}

/// Resolve once the session is reported expired (or its state channel closes)
async fn session_expired(session: &mut watch::Receiver<SessionState>) {
    loop {
        if session.borrow_and_update().is_expired() {
            return;
        }
        if session.changed().await.is_err() {
            return;
        }
    }
}

async fn deadline_reached(deadline: Option<(Instant, Duration)>) {
    match deadline {
        Some((at, _)) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
