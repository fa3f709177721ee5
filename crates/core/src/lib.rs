// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! monlock-core: Core types for the single-instance monitor lock
//!
//! This crate provides:
//! - Lock path resolution from a namespace prefix and an environment
//! - Contender node naming and sequence parsing
//! - Session state shared by coordination adapters and the lock engine
//! - Monitor configuration (flags and TOML files)
//!
//! Nothing in here performs I/O against the coordination service.

pub mod config;
pub mod id;
pub mod node;
pub mod path;
pub mod session;

pub use config::{parse_ensemble, ConfigError, MonitorConfig};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use node::{contender_prefix, parse_sequence, ChildNode, ContenderData, CreatedNode};
pub use path::{ancestors, LockPath};
pub use session::{SessionId, SessionState};
