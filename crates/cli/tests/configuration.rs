// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for configuration handling
//!
//! Every case here fails validation before a connection is attempted, so no
//! coordination service is needed.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use common::{config_file, monlock};
use predicates::prelude::*;

#[test]
fn test_help_lists_flags() {
    monlock()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--zk"))
        .stdout(predicate::str::contains("--env"))
        .stdout(predicate::str::contains("--session-timeout"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_missing_ensemble_fails() {
    monlock()
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no coordination ensemble addresses given",
        ))
        .stderr(predicate::str::contains("--zk"));
}

#[test]
fn test_empty_environment_fails_before_connecting() {
    monlock()
        .args(["--zk", "127.0.0.1:2181", "--env", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment must not be empty"))
        .stderr(predicate::str::contains("connecting to coordination ensemble").not());
}

#[test]
fn test_parent_segment_in_environment_fails() {
    monlock()
        .args(["--zk", "127.0.0.1:2181", "--env", "../prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'..' is not allowed"));
}

#[test]
fn test_bad_address_fails() {
    monlock()
        .args(["--zk", "127.0.0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'127.0.0.1' is not host:port"));
}

#[test]
fn test_unparseable_session_timeout_is_usage_error() {
    monlock()
        .args(["--zk", "127.0.0.1:2181", "--session-timeout", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--session-timeout"));
}

#[test]
fn test_zero_session_timeout_fails() {
    monlock()
        .args(["--zk", "127.0.0.1:2181", "--session-timeout", "0s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session timeout must be greater than zero"));
}

#[test]
fn test_config_file_with_empty_environment_fails() {
    let (_temp, path) = config_file("ensemble = \"127.0.0.1:2181\"\nenvironment = \"\"\n");
    monlock()
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment must not be empty"));
}

#[test]
fn test_config_file_unknown_key_fails() {
    let (_temp, path) = config_file("ensemble = \"127.0.0.1:2181\"\nretries = 3\n");
    monlock()
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    monlock()
        .arg("--config")
        .arg(temp.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"))
        .stderr(predicate::str::contains("--config"));
}
