// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Every failure that ends the monitor is reported as:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use monlock_adapters::CoordinationError;
use monlock_core::ConfigError;
use monlock_engine::LockError;
use std::fmt;
use std::time::Duration;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct MonitorError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl MonitorError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the ways a monitor run can end badly.
impl MonitorError {
    /// Configuration rejected before any connection attempt.
    pub fn invalid_config(err: ConfigError) -> Self {
        let err_text = err.to_string();
        let mut error = MonitorError::new(err_text.clone());
        error = match &err {
            ConfigError::Read { .. } => error
                .with_context("The config file could not be opened")
                .with_suggestion("Check the path given to --config"),
            ConfigError::Parse { .. } => error
                .with_context("The config file is not valid TOML or has unknown keys")
                .with_suggestion(
                    "Allowed keys: ensemble, namespace_prefix, environment, session_timeout",
                ),
            ConfigError::InvalidConfiguration(_) if err_text.contains("ensemble") => error
                .with_suggestion("Pass the ensemble with --zk host1:2181,host2:2181"),
            ConfigError::InvalidConfiguration(_) if err_text.contains("environment") => error
                .with_context("The environment names the lock path segment under the namespace")
                .with_suggestion("Pass a non-empty name with --env, e.g. --env staging"),
            ConfigError::InvalidConfiguration(_) => error,
        };
        error.with_source(err)
    }

    /// The ensemble could not be reached to establish a session.
    pub fn connect_failed(ensemble: &[String], session_timeout: Duration, err: CoordinationError) -> Self {
        MonitorError::new("Failed to connect to the coordination ensemble")
            .with_context(format!("Addresses: {}", ensemble.join(", ")))
            .with_context(format!(
                "Session timeout: {}",
                humantime::format_duration(session_timeout)
            ))
            .with_context(err.to_string())
            .with_suggestion("Check that the ZooKeeper servers are running and reachable")
            .with_suggestion("Verify the addresses passed with --zk")
            .with_source(err)
    }

    /// Acquisition ended without the lock.
    pub fn acquire_failed(lock_path: &str, err: LockError) -> Self {
        let mut error = MonitorError::new(format!("Failed to acquire lock '{}'", lock_path))
            .with_context(err.to_string());
        if matches!(err, LockError::SessionExpired) {
            error = error
                .with_context("The session expired while waiting in line")
                .with_suggestion("Restart the monitor to queue again with a new session");
        } else if err.is_retryable() {
            error = error.with_suggestion("Retry once the ensemble is healthy");
        }
        error.with_source(err)
    }

    /// Release failed; the lock state on the ensemble is uncertain.
    pub fn release_failed(lock_path: &str, node_path: &str, err: LockError) -> Self {
        MonitorError::new(format!("Failed to release lock '{}'", lock_path))
            .with_context(err.to_string())
            .with_context(format!(
                "Contender node '{}' may remain until the session times out",
                node_path
            ))
            .with_suggestion("Other monitors will acquire once the session expires")
            .with_suggestion(format!("Delete the node manually: deleteall {}", node_path))
            .with_source(err)
    }

    /// Session expired while the lock was held.
    pub fn lock_lost(lock_path: &str, session_timeout: Duration) -> Self {
        MonitorError::new(format!("Lost lock '{}'", lock_path))
            .with_context("The coordination session expired while the lock was held")
            .with_context("Another monitor may now hold the lock")
            .with_suggestion(format!(
                "Check connectivity to the ensemble; sessions expire after {} without contact",
                humantime::format_duration(session_timeout)
            ))
            .with_suggestion("Restart the monitor to queue for the lock again")
    }
}
