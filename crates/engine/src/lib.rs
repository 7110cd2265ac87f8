// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! port-engine: the scheduling decisions the daemon loop acts on (reap and
//! pick-next) and the subscriber dispatcher.
//!
//! Everything here is deliberately thin on I/O: `reap`/`schedule` are pure
//! functions over an in-memory `&[Task]` slice so the daemon loop's
//! minute-by-minute decisions are unit-testable without a filesystem, and
//! `dispatch` does the one piece of I/O (reading events, advancing a
//! cursor) behind a narrow function the loop calls once per consumer.

pub mod dispatch;
pub mod error;
pub mod reap;
pub mod schedule;

pub use dispatch::{dispatch_one, OpencodeHandler, SubscriberHandler, DEFAULT_BATCH_LIMIT};
pub use error::{EngineError, EngineResult};
pub use reap::{decide as decide_reap, ReapDecision};
pub use schedule::pick_next;
