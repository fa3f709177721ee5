// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Contender node naming
//!
//! Contenders are ephemeral sequential children of the lock path named
//! `_c_<id>-lock-<sequence>`. The `<id>` part is unique per lock engine, which
//! lets an engine find a node it created even when the create response was lost.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const PROTECTED_MARKER: &str = "_c_";
const LOCK_MARKER: &str = "lock";

/// Prefix handed to the service when creating a contender; the service appends the sequence
pub fn contender_prefix(id: &str) -> String {
    format!("{}{}-{}-", PROTECTED_MARKER, id, LOCK_MARKER)
}

/// Sequence number of a contender node name, or `None` if the name is not a contender
pub fn parse_sequence(name: &str) -> Option<u64> {
    let (head, digits) = name.rsplit_once('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if head != LOCK_MARKER && !head.ends_with(&format!("-{}", LOCK_MARKER)) {
        return None;
    }
    digits.parse().ok()
}

/// A child of the lock path as listed by the coordination service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildNode {
    pub name: String,
    /// Set only for names following the contender convention
    pub sequence: Option<u64>,
}

impl ChildNode {
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let sequence = parse_sequence(&name);
        Self { name, sequence }
    }

    /// Whether this node was created with the given contender prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

/// An ephemeral sequential node returned by a successful create
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedNode {
    pub path: String,
    pub sequence: u64,
}

/// Payload stored in a contender node so operators can tell who is queued
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContenderData {
    pub pid: u32,
    pub environment: String,
    pub created_at: DateTime<Utc>,
}

impl ContenderData {
    pub fn for_current_process(environment: impl Into<String>) -> Self {
        Self {
            pid: std::process::id(),
            environment: environment.into(),
            created_at: Utc::now(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
