// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination session identity and liveness

use std::fmt;

/// Identifier of a coordination session, as reported by the service
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Liveness of a coordination session.
///
/// `Reconnecting` is transient: nodes and watches owned by the session survive
/// it. Only `Expired` invalidates ephemeral nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Reconnecting,
    Expired,
}

impl SessionState {
    pub fn is_expired(self) -> bool {
        matches!(self, SessionState::Expired)
    }

    pub fn is_connected(self) -> bool {
        matches!(self, SessionState::Connected)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Connected => "connected",
            SessionState::Reconnecting => "reconnecting",
            SessionState::Expired => "expired",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
