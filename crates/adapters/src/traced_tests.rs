// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::coordination::{FakeCoordination, WatchEvent};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[test]
fn traced_ensure_rejects_relative_path() {
    let ensemble = FakeCoordination::new();
    let session = ensemble.session();
    let traced = TracedCoordination::new(session.clone());

    let (logs, result) = with_tracing(|| async { traced.ensure_persistent_node("monitor").await });

    assert!(result.is_err());
    assert!(logs.contains("path is not absolute"));
    // The inner client was never called
    assert!(session.calls().is_empty());
}

// =============================================================================
// Pass-through and logging tests
// =============================================================================

#[test]
fn traced_create_logs_node_and_sequence() {
    let ensemble = FakeCoordination::new();
    let traced = TracedCoordination::new(ensemble.session());

    let (logs, result) = with_tracing(|| async {
        traced.ensure_persistent_node("/monitor/prod").await.unwrap();
        traced
            .create_ephemeral_sequential("/monitor/prod", "lock-", b"")
            .await
    });

    let node = result.unwrap();
    assert_eq!(node.sequence, 1);
    assert!(logs.contains("coordination.create"));
    assert!(logs.contains("node created"));
    assert!(logs.contains("sequence=1"));
}

#[test]
fn traced_delete_warns_on_absent_node() {
    let ensemble = FakeCoordination::new();
    let traced = TracedCoordination::new(ensemble.session());

    let (logs, result) = with_tracing(|| async { traced.delete_node("/monitor/prod/gone").await });

    assert_eq!(result.unwrap(), DeleteOutcome::NotFound);
    assert!(logs.contains("WARN"));
    assert!(logs.contains("node already absent"));
}

#[test]
fn traced_create_logs_failure() {
    let ensemble = FakeCoordination::new();
    let traced = TracedCoordination::new(ensemble.session());

    let (logs, result) = with_tracing(|| async {
        traced
            .create_ephemeral_sequential("/missing", "lock-", b"")
            .await
    });

    assert!(matches!(result, Err(CoordinationError::NoNode(_))));
    assert!(logs.contains("create failed"));
}

#[test]
fn traced_watch_passes_through_events() {
    let ensemble = FakeCoordination::new();
    let owner = ensemble.session();
    let traced = TracedCoordination::new(ensemble.session());

    let (logs, event) = with_tracing(|| async {
        owner.ensure_persistent_node("/monitor/prod").await.unwrap();
        let node = owner
            .create_ephemeral_sequential("/monitor/prod", "lock-", b"")
            .await
            .unwrap();
        let mut watch = traced.watch_deletion(&node.path).await.unwrap();
        owner.delete_node(&node.path).await.unwrap();
        watch.fired().await
    });

    assert_eq!(event, WatchEvent::NodeDeleted);
    assert!(logs.contains("watch registered"));
}
