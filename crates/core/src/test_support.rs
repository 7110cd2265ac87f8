// SPDX-License-Identifier: MIT

//! Builders for constructing fixtures in other crates' tests without
//! depending on `port-core`'s private field layout. Gated behind
//! `test-support` so it never ships in a release binary.

use chrono::{DateTime, Utc};

use crate::task::{Task, TaskMode, TaskStatus};

pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(display_id: u64) -> Self {
        let now: DateTime<Utc> = "2026-01-01T00:00:00Z".parse().expect("valid timestamp literal");
        Self { task: Task::new(display_id, format!("task {display_id}"), TaskMode::Write, None, "local", now) }
    }

    pub fn mode(mut self, mode: TaskMode) -> Self {
        self.task.mode = mode;
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        let branch = branch.into();
        self.task.queue.lock_key = branch.clone();
        self.task.branch = Some(branch);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.task.created_at = at;
        self.task.updated_at = at;
        self
    }

    pub fn adapter(mut self, adapter: impl Into<String>) -> Self {
        self.task.adapter = adapter.into();
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
