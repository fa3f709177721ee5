// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A `monlock` command with logging pinned so stderr assertions are stable
pub fn monlock() -> Command {
    let mut cmd = Command::cargo_bin("monlock").expect("monlock binary should build");
    cmd.env("RUST_LOG", "info");
    cmd
}

/// Write `contents` to a config file inside a fresh temp directory.
/// The TempDir must outlive the command that reads the file.
pub fn config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let path = temp.path().join("monlock.toml");
    fs::write(&path, contents).expect("Failed to write config file");
    (temp, path)
}
