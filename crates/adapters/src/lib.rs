// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! port-adapters: the task execution adapter interface and
//! its local implementation (git worktree + subprocess worker).

pub mod error;
pub mod local;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::{AdapterError, AdapterResult};
pub use local::LocalAdapter;
pub use worker::{CheckpointHandle, PreparedTask, StartedTask, WorkerAdapter, WorkerHandle, WorkerStatus};
