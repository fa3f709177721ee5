// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Distributed mutual-exclusion lock over a coordination service
//!
//! Contenders register ephemeral sequential nodes under the lock path; the
//! lowest sequence holds the lock and every other contender waits on the
//! deletion of its immediate predecessor.

mod error;
mod handle;
mod lock;

pub use error::LockError;
pub use handle::LockHandle;
pub use lock::LockEngine;
