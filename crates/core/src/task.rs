// SPDX-License-Identifier: MIT

//! The `Task` record and its status/capability/queue/runtime substructures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::define_id;

define_id! {
    /// Short, random, collision-resistant-within-a-repo task identifier.
    pub struct TaskId("task-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    Read,
    Write,
}

/// Closed set of task statuses, partitioned into active and terminal.
/// The partition is a derived predicate on the variant, not a
/// separate field, so the two can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Preparing,
    Running,
    Resuming,
    RevivingForAttach,
    PausedForAttach,
    ResumeFailed,
    Completed,
    Failed,
    Timeout,
    Cancelled,
    Cleaned,
}

impl TaskStatus {
    pub const ACTIVE: &'static [TaskStatus] = &[
        TaskStatus::Queued,
        TaskStatus::Preparing,
        TaskStatus::Running,
        TaskStatus::Resuming,
        TaskStatus::RevivingForAttach,
        TaskStatus::PausedForAttach,
        TaskStatus::ResumeFailed,
    ];

    pub const TERMINAL: &'static [TaskStatus] = &[
        TaskStatus::Completed,
        TaskStatus::Failed,
        TaskStatus::Timeout,
        TaskStatus::Cancelled,
        TaskStatus::Cleaned,
    ];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    /// The dotted event-type suffix for a transition into this status
    /// (`task.<status>`).
    pub fn event_suffix(self) -> &'static str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Preparing => "preparing",
            TaskStatus::Running => "running",
            TaskStatus::Resuming => "resuming",
            TaskStatus::RevivingForAttach => "reviving_for_attach",
            TaskStatus::PausedForAttach => "paused_for_attach",
            TaskStatus::ResumeFailed => "resume_failed",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Timeout => "timeout",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Cleaned => "cleaned",
        }
    }
}

/// Capability flags an adapter reports; mirrored onto the stored task
/// so the CLI and engine can branch on them without re-querying the adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCapabilities {
    #[serde(default)]
    pub attach_handoff: bool,
    #[serde(default)]
    pub resume_token: bool,
    #[serde(default)]
    pub transcript: bool,
    #[serde(default)]
    pub failed_snapshot: bool,
    #[serde(default)]
    pub checkpoint_restore: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachState {
    Requested,
    Active,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttach {
    pub state: AttachState,
    pub lock_owner: String,
    pub session_handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_id: Option<String>,
    pub token_expiry: DateTime<Utc>,
}

/// Branch-lock queue fields, recomputed by [`crate::branch_queue::reconcile`]
/// on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueue {
    pub lock_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by_task_id: Option<TaskId>,
}

impl TaskQueue {
    pub fn new(lock_key: impl Into<String>) -> Self {
        Self { lock_key: lock_key.into(), blocked_by_task_id: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointRef {
    pub id: String,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAttempt {
    pub attempt: u32,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// Fields owned exclusively by the daemon that observed the worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRuntime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worktree_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub retained_for_debug: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<CheckpointRef>,
    #[serde(default)]
    pub checkpoint_history: Vec<CheckpointRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_attempt: Option<u32>,
    #[serde(default)]
    pub attempts: Vec<RunAttempt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub display_id: u64,
    pub title: String,
    pub mode: TaskMode,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub adapter: String,
    #[serde(default)]
    pub capabilities: TaskCapabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach: Option<TaskAttach>,
    pub queue: TaskQueue,
    #[serde(default)]
    pub runtime: TaskRuntime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        display_id: u64,
        title: impl Into<String>,
        mode: TaskMode,
        branch: Option<String>,
        adapter: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let lock_key = branch.clone().unwrap_or_default();
        Self {
            id: TaskId::new(),
            display_id,
            title: title.into(),
            mode,
            status: TaskStatus::Queued,
            branch,
            adapter: adapter.into(),
            capabilities: TaskCapabilities::default(),
            attach: None,
            queue: TaskQueue::new(lock_key),
            runtime: TaskRuntime::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A task is runnable iff it is queued and not blocked.
    pub fn is_runnable(&self) -> bool {
        self.status == TaskStatus::Queued && self.queue.blocked_by_task_id.is_none()
    }

    /// Read-mode tasks and tasks without a branch never participate in the
    /// branch-lock queue.
    pub fn participates_in_queue(&self) -> bool {
        self.mode == TaskMode::Write && self.branch.is_some()
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
