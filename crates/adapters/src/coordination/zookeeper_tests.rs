// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn session_states_map_to_liveness() {
    assert_eq!(
        session_state(zk::SessionState::SyncConnected),
        SessionState::Connected
    );
    assert_eq!(
        session_state(zk::SessionState::ConnectedReadOnly),
        SessionState::Connected
    );
    assert_eq!(
        session_state(zk::SessionState::Disconnected),
        SessionState::Reconnecting
    );
    assert_eq!(
        session_state(zk::SessionState::Expired),
        SessionState::Expired
    );
    assert_eq!(session_state(zk::SessionState::Closed), SessionState::Expired);
}

#[test]
fn errors_keep_the_failing_path() {
    assert_eq!(
        map_error("/monitor/prod", zk::Error::NoNode),
        CoordinationError::NoNode("/monitor/prod".to_string())
    );
    assert_eq!(
        map_error("/monitor", zk::Error::NodeExists),
        CoordinationError::NodeExists("/monitor".to_string())
    );
    assert!(map_error("/monitor", zk::Error::SessionExpired).is_session_expired());
    assert!(matches!(
        map_error("/monitor", zk::Error::ConnectionLoss),
        CoordinationError::ConnectionLoss(_)
    ));
}

#[test]
fn created_node_pads_sequence_like_the_server() {
    let node = created_node("/monitor/prod/_c_ab-lock-", 4);
    assert_eq!(node.path, "/monitor/prod/_c_ab-lock-0000000004");
    assert_eq!(node.sequence, 4);
    assert_eq!(monlock_core::parse_sequence("_c_ab-lock-0000000004"), Some(4));
}

#[test]
fn created_node_widens_past_i32() {
    let sequence = i64::from(i32::MAX) + 1;
    let node = created_node("/m/lock-", sequence);
    assert_eq!(node.path, "/m/lock-0000000002147483648");
    assert_eq!(node.sequence, 2_147_483_648);
    assert_eq!(
        monlock_core::parse_sequence("lock-0000000002147483648"),
        Some(2_147_483_648)
    );
}

#[test]
fn watch_events_map_to_outcomes() {
    assert_eq!(
        watch_event(zk::EventType::NodeDeleted, zk::SessionState::SyncConnected),
        WatchEvent::NodeDeleted
    );
    assert_eq!(
        watch_event(zk::EventType::Session, zk::SessionState::Expired),
        WatchEvent::SessionExpired
    );
    assert_eq!(
        watch_event(zk::EventType::Session, zk::SessionState::Closed),
        WatchEvent::Interrupted
    );
    assert_eq!(
        watch_event(zk::EventType::NodeDataChanged, zk::SessionState::SyncConnected),
        WatchEvent::Interrupted
    );
}
