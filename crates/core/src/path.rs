// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock path resolution
//!
//! Each deployment environment gets its own lock node under a shared namespace
//! prefix, e.g. `/monitor` + `staging` resolves to `/monitor/staging`.

use crate::config::ConfigError;
use std::fmt;

/// Namespace under which environment lock paths are created
pub const DEFAULT_NAMESPACE: &str = "/monitor";

/// Environment used when none is given
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Absolute, normalized path of the lock node for one environment.
///
/// Contenders register as children of this node. The path is fixed once
/// resolved; the lock engine never mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LockPath(String);

impl LockPath {
    /// Join a namespace prefix and an environment into a lock path.
    ///
    /// Duplicate and trailing slashes are collapsed and the result is always
    /// absolute. An environment with no usable segment is rejected, as is any
    /// `.` or `..` segment.
    pub fn resolve(namespace_prefix: &str, environment: &str) -> Result<Self, ConfigError> {
        if environment.split('/').all(|s| s.trim().is_empty()) {
            return Err(ConfigError::InvalidConfiguration(
                "environment must not be empty".to_string(),
            ));
        }

        let mut segments = Vec::new();
        for segment in namespace_prefix.split('/').chain(environment.split('/')) {
            match segment {
                "" => {}
                "." | ".." => {
                    return Err(ConfigError::InvalidConfiguration(format!(
                        "lock path segment '{}' is not allowed",
                        segment
                    )))
                }
                s => segments.push(s),
            }
        }

        Ok(Self(format!("/{}", segments.join("/"))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full path of a child node
    pub fn child(&self, name: &str) -> String {
        format!("{}/{}", self.0, name)
    }

    /// Every ancestor of this path followed by the path itself, root first
    pub fn ancestors(&self) -> Vec<String> {
        ancestors(&self.0)
    }
}

/// Every ancestor of `path` followed by `path` itself, root first
pub fn ancestors(path: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);
        paths.push(current.clone());
    }
    paths
}

impl fmt::Display for LockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LockPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
