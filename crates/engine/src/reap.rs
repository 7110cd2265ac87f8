// SPDX-License-Identifier: MIT

//! Per-tick reap decisions for active tasks the daemon has a worker handle
//! for. Pure: the loop probes liveness and reads the
//! clock, then asks this module what to do; all the actual I/O (cancel,
//! cleanup, status writes) happens back in `port-daemon`.

use chrono::{DateTime, Utc};
use port_core::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapDecision {
    /// Worker is still alive and `timeoutAt` has not passed; nothing to do.
    StillRunning,
    /// `timeoutAt` has passed: cancel the worker, mark `timeout`, retain the
    /// worktree for debugging.
    TimedOut,
    /// Worker has exited and the task already reached `completed`: attempt
    /// `cleanup`.
    CleanupCompleted,
    /// Worker has exited and the task reached a terminal-but-not-completed
    /// status (`failed | cancelled | timeout`): retain the worktree, ensure
    /// `finishedAt` is set, emit a `retained` event.
    RetainTerminal,
    /// Worker exited without the task ever reaching a terminal status: the
    /// daemon marks it `failed` with "Worker exited unexpectedly".
    UnexpectedExit,
}

/// Decides what the daemon loop should do with one active task this tick.
///
/// The timeout check takes priority over the liveness probe: a task can be
/// cancelled for timing out even if its worker happens to report alive on
/// this exact tick.
pub fn decide(task: &Task, worker_alive: bool, now: DateTime<Utc>) -> ReapDecision {
    if let Some(timeout_at) = task.runtime.timeout_at {
        if now >= timeout_at {
            return ReapDecision::TimedOut;
        }
    }

    if worker_alive {
        return ReapDecision::StillRunning;
    }

    match task.status {
        TaskStatus::Completed => ReapDecision::CleanupCompleted,
        TaskStatus::Failed | TaskStatus::Cancelled | TaskStatus::Timeout => ReapDecision::RetainTerminal,
        _ => ReapDecision::UnexpectedExit,
    }
}

#[cfg(test)]
#[path = "reap_tests.rs"]
mod tests;
