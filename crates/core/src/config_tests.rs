// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;
use yare::parameterized;

fn addrs(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn defaults_match_monitor_conventions() {
    let config = MonitorConfig::default();
    assert!(config.ensemble.is_empty());
    assert_eq!(config.namespace_prefix, "/monitor");
    assert_eq!(config.environment, "development");
    assert_eq!(config.session_timeout, Duration::from_secs(10));
}

#[test]
fn parse_ensemble_trims_and_drops_blanks() {
    assert_eq!(
        parse_ensemble(" zk1:2181, zk2:2181,,zk3:2181 ,"),
        addrs(&["zk1:2181", "zk2:2181", "zk3:2181"])
    );
    assert!(parse_ensemble("").is_empty());
}

#[test]
fn validate_returns_lock_path() {
    let config = MonitorConfig::new(addrs(&["localhost:2181"])).with_environment("staging");
    assert_eq!(config.validate().unwrap().as_str(), "/monitor/staging");
}

#[parameterized(
    no_ensemble = { &[], "prod", 10 },
    missing_port = { &["zk1"], "prod", 10 },
    bad_port = { &["zk1:http"], "prod", 10 },
    port_overflow = { &["zk1:70000"], "prod", 10 },
    missing_host = { &[":2181"], "prod", 10 },
    empty_environment = { &["zk1:2181"], "", 10 },
    zero_timeout = { &["zk1:2181"], "prod", 0 },
)]
fn validate_rejects(ensemble: &[&str], env: &str, timeout_secs: u64) {
    let config = MonitorConfig::new(addrs(ensemble))
        .with_environment(env)
        .with_session_timeout(Duration::from_secs(timeout_secs));
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidConfiguration(_))
    ));
}

#[test]
fn toml_accepts_joined_ensemble() {
    let config = MonitorConfig::from_toml_str(
        r#"
ensemble = "zk1:2181,zk2:2181"
environment = "staging"
session_timeout = "30s"
"#,
    )
    .unwrap();
    assert_eq!(config.ensemble, addrs(&["zk1:2181", "zk2:2181"]));
    assert_eq!(config.environment, "staging");
    assert_eq!(config.namespace_prefix, "/monitor");
    assert_eq!(config.session_timeout, Duration::from_secs(30));
}

#[test]
fn toml_accepts_ensemble_list() {
    let config =
        MonitorConfig::from_toml_str(r#"ensemble = ["zk1:2181", "zk2:2181"]"#).unwrap();
    assert_eq!(config.ensemble, addrs(&["zk1:2181", "zk2:2181"]));
}

#[test]
fn toml_rejects_unknown_keys() {
    let err = MonitorConfig::from_toml_str("zk_servers = \"zk1:2181\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    assert!(err.to_string().starts_with("failed to parse config: "));
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "ensemble = \"zk1:2181\"\nnamespace_prefix = \"/ops\"").unwrap();

    let config = MonitorConfig::load(file.path()).unwrap();
    assert_eq!(config.lock_path().unwrap().as_str(), "/ops/development");
}

#[test]
fn load_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MonitorConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn load_bad_toml_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "session_timeout = \"soon\"").unwrap();
    let err = MonitorConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { path: Some(_), .. }));
    assert!(err.to_string().starts_with("failed to parse config file "));
}
