// SPDX-License-Identifier: MIT

//! Picking the next task to start: at most one
//! `queued`, unblocked task per tick, oldest `createdAt` first.

use port_core::Task;

/// Returns the runnable task (status `queued`, `blockedByTaskId` unset)
/// with the oldest `createdAt`, tie-broken by id for determinism. `None` if
/// nothing is runnable this tick.
pub fn pick_next(tasks: &[Task]) -> Option<&Task> {
    tasks
        .iter()
        .filter(|t| t.is_runnable())
        .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.as_str().cmp(b.id.as_str())))
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
