// SPDX-License-Identifier: MIT

//! The local execution adapter: an ephemeral `git worktree` per task, with
//! the worker spawned as a detached child running the same binary in
//! `task worker` mode.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use port_core::{Task, TaskCapabilities};
use tracing::warn;

use crate::error::{AdapterError, AdapterResult};
use crate::worker::{CheckpointHandle, PreparedTask, StartedTask, WorkerAdapter, WorkerHandle, WorkerStatus};

pub struct LocalAdapter {
    /// Path to the binary to re-exec in worker mode (defaults to the
    /// current executable).
    worker_binary: PathBuf,
}

impl LocalAdapter {
    pub fn new() -> Self {
        let worker_binary = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("port"));
        Self { worker_binary }
    }

    pub fn with_binary(worker_binary: impl Into<PathBuf>) -> Self {
        Self { worker_binary: worker_binary.into() }
    }

    fn branch_name(task_id: &str) -> String {
        format!("port-task-{task_id}")
    }
}

impl Default for LocalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkerAdapter for LocalAdapter {
    fn name(&self) -> &str {
        "local"
    }

    fn capabilities(&self) -> TaskCapabilities {
        TaskCapabilities {
            attach_handoff: false,
            resume_token: false,
            transcript: true,
            failed_snapshot: true,
            checkpoint_restore: true,
        }
    }

    async fn prepare(&self, repo_root: &Path, task: &Task) -> AdapterResult<PreparedTask> {
        let branch = Self::branch_name(task.id.as_str());
        let worktree_path = repo_root.join(".port").join("trees").join(&branch);

        let output = tokio::process::Command::new("git")
            .arg("-C")
            .arg(repo_root)
            .arg("worktree")
            .arg("add")
            .arg("-b")
            .arg(&branch)
            .arg(&worktree_path)
            .output()
            .await
            .map_err(|e| AdapterError::PrepareFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(AdapterError::PrepareFailed(String::from_utf8_lossy(&output.stderr).into_owned()));
        }

        Ok(PreparedTask {
            task_id: task.id.as_str().to_string(),
            run_id: uuid::Uuid::new_v4().to_string(),
            worktree_path,
            branch,
        })
    }

    async fn start(&self, repo_root: &Path, task: &Task, prepared: &PreparedTask) -> AdapterResult<StartedTask> {
        let child = tokio::process::Command::new(&self.worker_binary)
            .arg("task")
            .arg("worker")
            .arg("--task-id")
            .arg(task.id.as_str())
            .arg("--repo")
            .arg(repo_root)
            .arg("--worktree")
            .arg(&prepared.worktree_path)
            .current_dir(&prepared.worktree_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AdapterError::StartFailed(e.to_string()))?;

        let worker_pid = child.id().ok_or_else(|| AdapterError::StartFailed("child exited immediately".into()))?;
        // Detach: the daemon probes liveness by pid, not by waiting on the child.
        std::mem::forget(child);

        Ok(StartedTask { worker_pid })
    }

    async fn status(&self, handle: &WorkerHandle) -> AdapterResult<WorkerStatus> {
        Ok(if is_alive(handle.worker_pid) { WorkerStatus::Running } else { WorkerStatus::Exited })
    }

    async fn cancel(&self, handle: &WorkerHandle) -> AdapterResult<()> {
        if is_alive(handle.worker_pid) {
            let _ = signal::kill(Pid::from_raw(handle.worker_pid as i32), Signal::SIGTERM);
        }
        Ok(())
    }

    async fn cleanup(&self, repo_root: &Path, handle: &WorkerHandle) -> AdapterResult<()> {
        let output = tokio::process::Command::new("git")
            .arg("-C")
            .arg(repo_root)
            .arg("worktree")
            .arg("remove")
            .arg("--force")
            .arg(&handle.worktree_path)
            .output()
            .await
            .map_err(|e| AdapterError::CleanupFailed(e.to_string()))?;
        if !output.status.success() {
            return Err(AdapterError::CleanupFailed(String::from_utf8_lossy(&output.stderr).into_owned()));
        }

        // Branch deletion is best-effort.
        let branch_removal = tokio::process::Command::new("git")
            .arg("-C")
            .arg(repo_root)
            .arg("branch")
            .arg("-D")
            .arg(&handle.branch)
            .output()
            .await;
        if let Ok(output) = branch_removal {
            if !output.status.success() {
                warn!(branch = %handle.branch, "failed to delete ephemeral branch, leaving it in place");
            }
        }
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

    async fn restore(&self, repo_root: &Path, task: &Task, checkpoint: &CheckpointHandle) -> AdapterResult<WorkerHandle> {
        if is_alive(checkpoint.worker_pid) && checkpoint.worktree_path.exists() {
            return Ok(WorkerHandle {
                worker_pid: checkpoint.worker_pid,
                worktree_path: checkpoint.worktree_path.clone(),
                branch: checkpoint.branch.clone(),
            });
        }

        let prepared = PreparedTask {
            task_id: task.id.as_str().to_string(),
            run_id: uuid::Uuid::new_v4().to_string(),
            worktree_path: checkpoint.worktree_path.clone(),
            branch: checkpoint.branch.clone(),
        };
        let started = self.start(repo_root, task, &prepared).await?;
        Ok(WorkerHandle {
            worker_pid: started.worker_pid,
            worktree_path: prepared.worktree_path,
            branch: prepared.branch,
        })
    }
}

fn is_alive(pid: u32) -> bool {
    signal::kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
