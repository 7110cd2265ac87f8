// SPDX-License-Identifier: MIT

//! A scriptable in-memory adapter for engine/daemon tests. Never spawns a
//! real process; "liveness" is whatever the test told it to report.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use port_core::{Task, TaskCapabilities};

use crate::error::AdapterResult;
use crate::worker::{CheckpointHandle, PreparedTask, StartedTask, WorkerAdapter, WorkerHandle, WorkerStatus};

#[derive(Clone)]
pub struct FakeAdapter {
    next_pid: Arc<AtomicU32>,
    alive: Arc<AtomicBool>,
    capabilities: TaskCapabilities,
}

impl FakeAdapter {
    pub fn new() -> Self {
        Self {
            next_pid: Arc::new(AtomicU32::new(9000)),
            alive: Arc::new(AtomicBool::new(true)),
            capabilities: TaskCapabilities::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: TaskCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Makes every subsequent `status()` report the worker has exited.
    pub fn mark_exited(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl Default for FakeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkerAdapter for FakeAdapter {
    fn name(&self) -> &str {
        "fake"
    }

    fn capabilities(&self) -> TaskCapabilities {
        self.capabilities
    }

    async fn prepare(&self, _repo_root: &Path, task: &Task) -> AdapterResult<PreparedTask> {
        Ok(PreparedTask {
            task_id: task.id.as_str().to_string(),
            run_id: uuid::Uuid::new_v4().to_string(),
            worktree_path: PathBuf::from(format!("/fake/worktrees/{}", task.id.as_str())),
            branch: format!("port-task-{}", task.id.as_str()),
        })
    }

    async fn start(&self, _repo_root: &Path, _task: &Task, _prepared: &PreparedTask) -> AdapterResult<StartedTask> {
        Ok(StartedTask { worker_pid: self.next_pid.fetch_add(1, Ordering::SeqCst) })
    }

    async fn status(&self, _handle: &WorkerHandle) -> AdapterResult<WorkerStatus> {
        Ok(if self.alive.load(Ordering::SeqCst) { WorkerStatus::Running } else { WorkerStatus::Exited })
    }

    async fn cancel(&self, _handle: &WorkerHandle) -> AdapterResult<()> {
        self.mark_exited();
        Ok(())
    }

    async fn cleanup(&self, _repo_root: &Path, _handle: &WorkerHandle) -> AdapterResult<()> {
        Ok(())
    }

    async fn checkpoint(&self, handle: &WorkerHandle) -> AdapterResult<CheckpointHandle> {
        Ok(CheckpointHandle {
            id: uuid::Uuid::new_v4().to_string(),
            worker_pid: handle.worker_pid,
            worktree_path: handle.worktree_path.clone(),
            branch: handle.branch.clone(),
            hint: None,
        })
    }

    async fn restore(&self, _repo_root: &Path, _task: &Task, checkpoint: &CheckpointHandle) -> AdapterResult<WorkerHandle> {
        Ok(WorkerHandle {
            worker_pid: checkpoint.worker_pid,
            worktree_path: checkpoint.worktree_path.clone(),
            branch: checkpoint.branch.clone(),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
