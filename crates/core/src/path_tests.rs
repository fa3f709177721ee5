// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    plain = { "/monitor", "staging", "/monitor/staging" },
    trailing_slash_prefix = { "/monitor/", "staging", "/monitor/staging" },
    slashes_around_env = { "/monitor", "/staging/", "/monitor/staging" },
    relative_prefix = { "monitor", "prod", "/monitor/prod" },
    empty_prefix = { "", "prod", "/prod" },
    nested_prefix = { "/ops//monitor", "eu-west", "/ops/monitor/eu-west" },
    nested_env = { "/monitor", "eu/west", "/monitor/eu/west" },
)]
fn resolves_lock_path(prefix: &str, env: &str, expected: &str) {
    let path = LockPath::resolve(prefix, env).unwrap();
    assert_eq!(path.as_str(), expected);
}

#[parameterized(
    empty = { "" },
    blank = { "   " },
    only_slashes = { "//" },
    parent_dir = { "../prod" },
    current_dir = { "./prod" },
)]
fn rejects_bad_environment(env: &str) {
    let err = LockPath::resolve(DEFAULT_NAMESPACE, env).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
}

#[test]
fn rejects_parent_segment_in_prefix() {
    let err = LockPath::resolve("/monitor/..", "prod").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
}

#[test]
fn defaults_resolve_to_development_lock() {
    let path = LockPath::resolve(DEFAULT_NAMESPACE, DEFAULT_ENVIRONMENT).unwrap();
    assert_eq!(path.to_string(), "/monitor/development");
}

#[test]
fn ancestors_are_root_first() {
    let path = LockPath::resolve("/ops/monitor", "staging").unwrap();
    assert_eq!(
        path.ancestors(),
        vec!["/ops", "/ops/monitor", "/ops/monitor/staging"]
    );
}

#[test]
fn child_joins_name() {
    let path = LockPath::resolve("/monitor", "staging").unwrap();
    assert_eq!(
        path.child("_c_abc-lock-0000000001"),
        "/monitor/staging/_c_abc-lock-0000000001"
    );
}
