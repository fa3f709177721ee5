// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitor configuration
//!
//! Settings come from command-line flags, optionally layered over a TOML file:
//!
//! ```toml
//! ensemble = "zk1:2181,zk2:2181"
//! namespace_prefix = "/monitor"
//! environment = "staging"
//! session_timeout = "10s"
//! ```

use crate::path::{LockPath, DEFAULT_ENVIRONMENT, DEFAULT_NAMESPACE};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Session timeout used when none is configured
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from building or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config{}: {message}", parse_origin(.path))]
    Parse {
        /// File the document came from, if any
        path: Option<PathBuf>,
        message: String,
    },
}

/// Everything needed to connect to the ensemble and locate the lock
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Coordination ensemble members as `host:port`
    #[serde(deserialize_with = "deserialize_ensemble")]
    pub ensemble: Vec<String>,
    /// Parent of all environment lock paths
    pub namespace_prefix: String,
    /// Per-deployment lock path segment
    pub environment: String,
    /// How long an unresponsive session survives before it is expired
    #[serde(with = "humantime_serde")]
    pub session_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            ensemble: Vec::new(),
            namespace_prefix: DEFAULT_NAMESPACE.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }
}

impl MonitorConfig {
    pub fn new(ensemble: Vec<String>) -> Self {
        Self {
            ensemble,
            ..Self::default()
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = prefix.into();
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Parse a TOML document; absent keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        parse_toml(contents, None)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_toml(&contents, Some(path))
    }

    /// Resolve the lock path for this environment
    pub fn lock_path(&self) -> Result<LockPath, ConfigError> {
        LockPath::resolve(&self.namespace_prefix, &self.environment)
    }

    /// Check everything that can be checked without talking to the ensemble
    pub fn validate(&self) -> Result<LockPath, ConfigError> {
        if self.ensemble.is_empty() {
            return Err(ConfigError::InvalidConfiguration(
                "no coordination ensemble addresses given".to_string(),
            ));
        }
        for address in &self.ensemble {
            validate_address(address)?;
        }
        if self.session_timeout.is_zero() {
            return Err(ConfigError::InvalidConfiguration(
                "session timeout must be greater than zero".to_string(),
            ));
        }
        self.lock_path()
    }
}

fn parse_toml(contents: &str, path: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.map(Path::to_path_buf),
        message: e.to_string(),
    })
}

fn parse_origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" file {}", p.display()))
        .unwrap_or_default()
}

/// Split a comma-separated ensemble list, dropping blank entries
pub fn parse_ensemble(addresses: &str) -> Vec<String> {
    addresses
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_address(address: &str) -> Result<(), ConfigError> {
    let invalid = || {
        ConfigError::InvalidConfiguration(format!(
            "ensemble address '{}' is not host:port",
            address
        ))
    };
    let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(invalid());
    }
    Ok(())
}

fn deserialize_ensemble<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ensemble {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Ensemble::deserialize(deserializer)? {
        Ensemble::Joined(s) => parse_ensemble(&s),
        Ensemble::List(list) => list
            .iter()
            .flat_map(|s| parse_ensemble(s))
            .collect(),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
