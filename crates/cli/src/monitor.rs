// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitor lifecycle: connect, acquire, hold, release

use crate::error::MonitorError;
use monlock_adapters::{TracedCoordination, ZkCoordination};
use monlock_core::{ContenderData, LockPath, MonitorConfig};
use monlock_engine::LockEngine;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

/// Upper bound on leaving the queue after a shutdown signal
const WITHDRAW_TIMEOUT: Duration = Duration::from_secs(2);

/// Why the monitor stopped holding (or waiting for) the lock
enum Shutdown {
    Terminate,
    Interrupt,
}

/// Run one monitor instance to completion.
///
/// Returns once the lock has been released after a shutdown signal. Session loss
/// and release failures are errors; the caller exits non-zero on them.
pub async fn run(config: MonitorConfig, lock_path: LockPath) -> Result<(), MonitorError> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| MonitorError::new("Failed to install SIGTERM handler").with_source(e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| MonitorError::new("Failed to install SIGINT handler").with_source(e))?;

    info!(addresses = ?config.ensemble, "coordination ensemble addresses");
    info!(
        addresses = ?config.ensemble,
        session_timeout = %humantime::format_duration(config.session_timeout),
        "connecting to coordination ensemble"
    );
    let client = ZkCoordination::connect(&config.ensemble, config.session_timeout)
        .await
        .map_err(|e| MonitorError::connect_failed(&config.ensemble, config.session_timeout, e))?;
    let client = TracedCoordination::new(client);

    let data = ContenderData::for_current_process(&config.environment).to_bytes();
    let mut engine = LockEngine::new(client, lock_path.clone()).with_data(data);

    info!(lock = %lock_path, "waiting for lock");
    let shutdown = tokio::select! {
        result = engine.acquire() => {
            result.map_err(|e| MonitorError::acquire_failed(lock_path.as_str(), e))?;
            None
        }
        _ = sigterm.recv() => Some(Shutdown::Terminate),
        _ = sigint.recv() => Some(Shutdown::Interrupt),
    };
    if let Some(shutdown) = shutdown {
        info!(lock = %lock_path, signal = shutdown.name(), "shutdown requested before lock was acquired");
        // Leave the queue now so the next contender is not held up until the session times out
        match tokio::time::timeout(WITHDRAW_TIMEOUT, engine.withdraw()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(lock = %lock_path, error = %e, "failed to withdraw from lock queue"),
            Err(_) => warn!(lock = %lock_path, "timed out withdrawing from lock queue"),
        }
        return Ok(());
    }

    if let Some(handle) = engine.handle() {
        info!(
            lock = %lock_path,
            node = %handle.node_path,
            session = %handle.session_id,
            "acquired lock"
        );
    }

    let shutdown = tokio::select! {
        _ = sigterm.recv() => Shutdown::Terminate,
        _ = sigint.recv() => Shutdown::Interrupt,
        err = engine.wait_for_loss() => {
            warn!(lock = %lock_path, error = %err, "lock lost");
            return Err(MonitorError::lock_lost(lock_path.as_str(), config.session_timeout));
        }
    };
    info!(signal = shutdown.name(), "received shutdown signal, releasing lock");

    let node_path = engine
        .handle()
        .map(|h| h.node_path.clone())
        .unwrap_or_default();
    engine
        .release()
        .await
        .map_err(|e| MonitorError::release_failed(lock_path.as_str(), &node_path, e))?;

    Ok(())
}

impl Shutdown {
    fn name(&self) -> &'static str {
        match self {
            Shutdown::Terminate => "SIGTERM",
            Shutdown::Interrupt => "SIGINT",
        }
    }
}
