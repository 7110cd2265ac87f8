// SPDX-License-Identifier: MIT

//! TaskIndex persistence: the read/migrate/write cycle and the three
//! mutating operations.

use chrono::{DateTime, Utc};
use port_core::{branch_queue, EventType, Task, TaskEvent, TaskId, TaskMode, TaskStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::StorageResult;
use crate::events;
use crate::lock::{with_file_lock, write_file_atomic, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
use crate::migration;
use crate::paths::RepoPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskIndex {
    pub version: u64,
    pub next_display_id: u64,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Default for TaskIndex {
    fn default() -> Self {
        Self { version: migration::CURRENT_VERSION, next_display_id: 1, tasks: Vec::new() }
    }
}

pub struct TaskIndexStore {
    paths: RepoPaths,
}

impl TaskIndexStore {
    pub fn new(paths: RepoPaths) -> Self {
        Self { paths }
    }

    /// Reads `index.json`, normalizing a legacy document in memory. The
    /// normalized form is not persisted by this call; the next mutation does
    /// that as a side effect of its own write.
    fn read(&self) -> TaskIndex {
        let path = self.paths.index_file();
        match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(mut raw) => {
                    migration::normalize(&mut raw);
                    match serde_json::from_value(raw) {
                        Ok(index) => index,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "corrupt task index, treating as empty");
                            TaskIndex::default()
                        }
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt task index, treating as empty");
                    TaskIndex::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => TaskIndex::default(),
            Err(_) => TaskIndex::default(),
        }
    }

    pub fn read_index(&self) -> TaskIndex {
        self.read()
    }

    /// Holds `index.lock` for a read-modify-write, reconciling the
    /// branch-lock queue before persisting. Returns
    /// whatever `f` returns alongside the events it queued for append.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut TaskIndex) -> StorageResult<(T, Vec<TaskEvent>)>,
    ) -> StorageResult<T> {
        let (result, queued_events) = with_file_lock(
            &self.paths.index_lock(),
            DEFAULT_TIMEOUT,
            DEFAULT_RETRY_DELAY,
            || {
                let mut index = self.read();
                let (result, queued_events) = f(&mut index)?;
                branch_queue::reconcile(&mut index.tasks);
                let mut bytes = serde_json::to_vec_pretty(&index).map_err(std::io::Error::from)?;
                bytes.push(b'\n');
                write_file_atomic(&self.paths.index_file(), &bytes)?;
                Ok((result, queued_events))
            },
        )?;

        for event in &queued_events {
            let _ = events::append(&self.paths.task_events_log(event.task_id.as_str()), event);
            let _ = events::append(&self.paths.all_events_log(), event);
        }
        Ok(result)
    }

    pub fn create_task(
        &self,
        title: impl Into<String>,
        mode: TaskMode,
        branch: Option<String>,
        adapter: impl Into<String>,
        now: DateTime<Utc>,
    ) -> StorageResult<Task> {
        let title = title.into();
        let adapter = adapter.into();
        self.mutate(|index| {
            let display_id = index.next_display_id;
            index.next_display_id += 1;
            let task = Task::new(display_id, title.clone(), mode, branch.clone(), adapter.clone(), now);
            let event = TaskEvent::new(task.id, EventType::created(), now);
            index.tasks.push(task.clone());
            Ok((task, vec![event]))
        })
    }

    /// Transitions `task_id` to `status`. A no-op on an already-terminal
    /// task is treated as an error by the caller layer, not here: this
    /// function enforces only the terminal→non-terminal prohibition, which
    /// leaves terminal→terminal transitions (e.g. `completed` → `cleaned`)
    /// legal, since the lifecycle requires them.
    pub fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        message: Option<String>,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<Task>> {
        self.mutate(|index| {
            let Some(task) = index.tasks.iter_mut().find(|t| t.id == task_id) else {
                return Ok((None, Vec::new()));
            };
            if task.status.is_terminal() && !status.is_terminal() {
                return Ok((Some(task.clone()), Vec::new()));
            }
            task.status = status;
            task.updated_at = now;
            let mut event = TaskEvent::new(task_id, EventType::transition(status), now);
            if let Some(message) = message {
                event = event.with_message(message);
            }
            Ok((Some(task.clone()), vec![event]))
        })
    }

    pub fn patch_task(
        &self,
        task_id: TaskId,
        patch: impl FnOnce(&mut Task),
        now: DateTime<Utc>,
    ) -> StorageResult<Option<Task>> {
        self.mutate(|index| {
            let Some(task) = index.tasks.iter_mut().find(|t| t.id == task_id) else {
                return Ok((None, Vec::new()));
            };
            patch(task);
            task.updated_at = now;
            Ok((Some(task.clone()), Vec::new()))
        })
    }

    pub fn get_task(&self, task_id: TaskId) -> Option<Task> {
        self.read().tasks.into_iter().find(|t| t.id == task_id)
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.read().tasks
    }

    /// Forces a branch-lock queue reconcile and rewrite even when nothing
    /// else changed, so an index hand-edited (or migrated) outside this
    /// process gets its derived fields caught up. Idempotent.
    pub fn reconcile_queue(&self) -> StorageResult<()> {
        self.mutate(|_index| Ok(((), Vec::new())))
    }
}

#[cfg(test)]
#[path = "task_index_tests.rs"]
mod tests;
