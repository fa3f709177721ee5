// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn prefix_embeds_id() {
    assert_eq!(contender_prefix("abc123"), "_c_abc123-lock-");
}

#[parameterized(
    protected = { "_c_abc123-lock-0000000007", Some(7) },
    id_with_dashes = { "_c_guid-1-lock-0000000012", Some(12) },
    bare_lock = { "lock-0000000003", Some(3) },
    no_sequence = { "_c_abc123-lock-", None },
    not_digits = { "_c_abc123-lock-00x1", None },
    other_node = { "config", None },
    other_sequential = { "_c_abc123-queue-0000000001", None },
    locksmith = { "locksmith-0000000001", None },
)]
fn parses_sequence(name: &str, expected: Option<u64>) {
    assert_eq!(parse_sequence(name), expected);
}

#[test]
fn child_node_from_contender_name() {
    let child = ChildNode::from_name(format!("{}0000000042", contender_prefix("x")));
    assert_eq!(child.sequence, Some(42));
    assert!(child.has_prefix(&contender_prefix("x")));
    assert!(!child.has_prefix(&contender_prefix("y")));
}

#[test]
fn contender_data_json_shape() {
    let data = ContenderData::for_current_process("staging");
    let value: serde_json::Value = serde_json::from_slice(&data.to_bytes()).unwrap();
    assert_eq!(value["environment"], "staging");
    assert_eq!(value["pid"], std::process::id());
    assert!(value["created_at"].is_string());
}

#[test]
fn contender_data_rejects_garbage() {
    assert!(ContenderData::from_bytes(b"not json").is_none());
}
