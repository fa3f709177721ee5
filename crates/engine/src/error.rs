// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lock engine

use monlock_adapters::CoordinationError;
use monlock_core::ConfigError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur acquiring or releasing the lock
#[derive(Debug, Error)]
pub enum LockError {
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),
    #[error("coordination unavailable: {0}")]
    CoordinationUnavailable(#[source] CoordinationError),
    #[error("coordination session expired, lock is lost")]
    SessionExpired,
    #[error("lock is not held")]
    NotHeld,
    #[error("lock is already held by this engine")]
    AlreadyHeld,
    #[error("timed out after {0:?} waiting for the lock")]
    Timeout(Duration),
}

impl LockError {
    /// Whether the same operation may succeed if retried after a backoff.
    ///
    /// A session expiry needs a fresh session, and the remaining variants are
    /// caller errors.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LockError::CoordinationUnavailable(_) | LockError::Timeout(_)
        )
    }
}

impl From<CoordinationError> for LockError {
    fn from(error: CoordinationError) -> Self {
        match error {
            CoordinationError::SessionExpired => LockError::SessionExpired,
            other => LockError::CoordinationUnavailable(other),
        }
    }
}
