// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use monlock_core::SessionId;
use std::fmt;

/// Record of a held lock.
///
/// Exists only between a successful acquire and a successful release. If the
/// session expires while held, the handle can outlive its node until the
/// engine observes the expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockHandle {
    /// Full path of the contender node
    pub node_path: String,
    /// Service-assigned sequence of the contender node
    pub sequence: u64,
    /// Session the node was created under
    pub session_id: SessionId,
}

impl fmt::Display for LockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (session {})", self.node_path, self.session_id)
    }
}
