// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layering of command-line flags over an optional config file

use monlock_core::{parse_ensemble, ConfigError, LockPath, MonitorConfig};
use std::path::Path;
use std::time::Duration;

/// Values given on the command line; `None` leaves the file (or default) value alone
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ensemble: Option<String>,
    pub environment: Option<String>,
    pub namespace_prefix: Option<String>,
    pub session_timeout: Option<Duration>,
}

impl Overrides {
    /// Replace every config value that was given on the command line
    pub fn apply(self, mut config: MonitorConfig) -> MonitorConfig {
        if let Some(ensemble) = self.ensemble {
            config.ensemble = parse_ensemble(&ensemble);
        }
        if let Some(environment) = self.environment {
            config.environment = environment;
        }
        if let Some(prefix) = self.namespace_prefix {
            config.namespace_prefix = prefix;
        }
        if let Some(timeout) = self.session_timeout {
            config.session_timeout = timeout;
        }
        config
    }
}

/// Build the effective configuration and resolve its lock path.
///
/// Nothing here touches the network; a returned config is ready to connect with.
pub fn resolve(
    config_file: Option<&Path>,
    overrides: Overrides,
) -> Result<(MonitorConfig, LockPath), ConfigError> {
    let base = match config_file {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    let config = overrides.apply(base);
    let lock_path = config.validate()?;
    Ok((config, lock_path))
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
