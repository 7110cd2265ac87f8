// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! port-daemon: the per-repo task scheduler process — singleton lifecycle
//! management, the 1Hz scheduling loop, and the worker-mode entry point that
//! runs inside a prepared worktree.

pub mod error;
pub mod log;
pub mod serve;
pub mod singleton;
pub mod state;
pub mod tick;
pub mod worker;

pub use error::{DaemonError, DaemonResult};
pub use serve::serve;
pub use singleton::{current_binary, ensure_daemon};
pub use state::DaemonStateFile;
pub use tick::{run_tick, TickOutcome};
pub use worker::run_worker;
