// SPDX-License-Identifier: MIT

//! Branch-lock queue reconciliation.
//!
//! Pure and I/O-free so the storage layer can call it inline on every write,
//! before persisting, without this crate knowing anything about files or
//! locks.

use std::collections::HashMap;

use crate::task::{Task, TaskId};

/// Recomputes every task's `queue.blocked_by_task_id` in place.
///
/// Tasks that don't participate in the queue (read-mode, or write-mode with
/// no branch) always have their `blocked_by_task_id` cleared. Within each
/// `lock_key` group, at most one active task is left unblocked: the first
/// active task encountered in `(created_at, id)` order; every active task
/// after it is blocked by the one immediately before it.
pub fn reconcile(tasks: &mut [Task]) {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, task) in tasks.iter().enumerate() {
        if !task.participates_in_queue() {
            continue;
        }
        groups.entry(task.queue.lock_key.clone()).or_default().push(idx);
    }

    for indices in groups.values_mut() {
        indices.sort_by(|&a, &b| {
            tasks[a]
                .created_at
                .cmp(&tasks[b].created_at)
                .then_with(|| tasks[a].id.as_str().cmp(tasks[b].id.as_str()))
        });

        let mut previous_active: Option<TaskId> = None;
        for &idx in indices.iter() {
            if !tasks[idx].status.is_active() {
                tasks[idx].queue.blocked_by_task_id = None;
                continue;
            }
            match previous_active {
                None => {
                    tasks[idx].queue.blocked_by_task_id = None;
                    previous_active = Some(tasks[idx].id);
                }
                Some(blocker) => {
                    tasks[idx].queue.blocked_by_task_id = Some(blocker);
                    previous_active = Some(tasks[idx].id);
                }
            }
        }
    }

    for task in tasks.iter_mut() {
        if !task.participates_in_queue() {
            task.queue.blocked_by_task_id = None;
        }
    }
}

#[cfg(test)]
#[path = "branch_queue_tests.rs"]
mod tests;
