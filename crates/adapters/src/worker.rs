// SPDX-License-Identifier: MIT

//! The `WorkerAdapter` trait: the interface the daemon loop
//! consumes to run a task to completion on some execution backend. The
//! local implementation lives in [`crate::local`]; other backends (remote,
//! containerized) can implement this trait without the daemon loop changing.

use std::path::PathBuf;

use async_trait::async_trait;
use port_core::{Task, TaskCapabilities};

use crate::error::AdapterResult;

#[derive(Debug, Clone)]
pub struct PreparedTask {
    pub task_id: String,
    pub run_id: String,
    pub worktree_path: PathBuf,
    pub branch: String,
}

#[derive(Debug, Clone)]
pub struct StartedTask {
    pub worker_pid: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Running,
    Exited,
}

/// Opaque handle an adapter uses to address a running (or checkpointed)
/// worker. The local adapter's handle is just a pid + worktree path; other
/// backends carry whatever they need (container id, pod name, ...).
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    pub worker_pid: u32,
    pub worktree_path: PathBuf,
    pub branch: String,
}

#[derive(Debug, Clone)]
pub struct CheckpointHandle {
    pub id: String,
    pub worker_pid: u32,
    pub worktree_path: PathBuf,
    pub branch: String,
    pub hint: Option<String>,
}

/// The task execution adapter interface the daemon consumes.
///
/// Capabilities are authoritative metadata: whatever an adapter reports from
/// [`WorkerAdapter::capabilities`] is mirrored onto the stored task as-is.
#[async_trait]
pub trait WorkerAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> TaskCapabilities;

    async fn prepare(&self, repo_root: &std::path::Path, task: &Task) -> AdapterResult<PreparedTask>;

    async fn start(
        &self,
        repo_root: &std::path::Path,
        task: &Task,
        prepared: &PreparedTask,
    ) -> AdapterResult<StartedTask>;

    async fn status(&self, handle: &WorkerHandle) -> AdapterResult<WorkerStatus>;

    async fn cancel(&self, handle: &WorkerHandle) -> AdapterResult<()>;

    async fn cleanup(&self, repo_root: &std::path::Path, handle: &WorkerHandle) -> AdapterResult<()>;

    async fn checkpoint(&self, handle: &WorkerHandle) -> AdapterResult<CheckpointHandle>;

    async fn restore(
        &self,
        repo_root: &std::path::Path,
        task: &Task,
        checkpoint: &CheckpointHandle,
    ) -> AdapterResult<WorkerHandle>;
}
