// SPDX-License-Identifier: MIT

//! Worker-mode entry point: runs inside a prepared worktree, drives one task
//! to a terminal status, and writes its artifacts.
//!
//! The work itself is a deterministic stand-in for a concrete worker
//! implementation: it proves out the lifecycle (artifact layout, status
//! transitions, patch capture) without depending on any particular agent.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use port_core::{EventType, Task, TaskEvent, TaskId, TaskMode, TaskStatus};
use port_storage::{events, RepoPaths, TaskIndexStore};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::error::{DaemonError, DaemonResult};

#[derive(Debug, Serialize)]
struct ArtifactMetadata {
    task_id: String,
    adapter: String,
    mode: TaskMode,
    started_at: chrono::DateTime<Utc>,
    finished_at: chrono::DateTime<Utc>,
    exit_code: i32,
}

/// Runs `task_id` to completion in `worktree`. Returns `Err` iff the worker
/// itself failed (the task has already been transitioned to `failed` and its
/// artifacts written by the time this returns `Err`); the caller's process
/// should exit non-zero in that case.
pub async fn run_worker(repo_root: &Path, task_id: &str, worktree: &Path) -> DaemonResult<()> {
    let paths = RepoPaths::new(repo_root);
    let index = TaskIndexStore::new(paths.clone());
    let task_id = TaskId::from_string(task_id);

    let Some(task) = index.get_task(task_id) else {
        return Err(DaemonError::TaskNotFound(task_id.as_str().to_string()));
    };

    let started_at = Utc::now();
    index.update_task_status(task_id, TaskStatus::Running, None, started_at)?;
    emit(&paths, task_id, "started", started_at);

    let artifacts_dir = paths.artifacts_dir(task_id.as_str());
    std::fs::create_dir_all(&artifacts_dir)?;
    append_line(&artifacts_dir.join("stdout.log"), "worker:started")?;

    match execute(&task, worktree, &artifacts_dir).await {
        Ok(()) => {
            let finished_at = Utc::now();
            append_line(&artifacts_dir.join("stdout.log"), "worker:finished")?;
            write_metadata(&artifacts_dir, &task, started_at, finished_at, 0)?;
            index.patch_task(
                task_id,
                |t| {
                    t.runtime.finished_at = Some(finished_at);
                    t.runtime.last_exit_code = Some(0);
                },
                finished_at,
            )?;
            index.update_task_status(task_id, TaskStatus::Completed, None, finished_at)?;
            emit(&paths, task_id, "finished", finished_at);
            info!(task_id = %task_id, "worker completed");
            Ok(())
        }
        Err(e) => {
            let finished_at = Utc::now();
            error!(task_id = %task_id, error = %e, "worker failed");
            let _ = append_line(&artifacts_dir.join("stderr.log"), &e.to_string());
            let _ = write_metadata(&artifacts_dir, &task, started_at, finished_at, 1);
            index.patch_task(
                task_id,
                |t| {
                    t.runtime.finished_at = Some(finished_at);
                    t.runtime.last_exit_code = Some(1);
                    t.runtime.retained_for_debug = true;
                },
                finished_at,
            )?;
            index.update_task_status(
                task_id,
                TaskStatus::Failed,
                Some(e.to_string()),
                finished_at,
            )?;
            emit(&paths, task_id, "failed", finished_at);
            Err(DaemonError::Io(std::io::Error::other(e.to_string())))
        }
    }
}

/// The deterministic stand-in for "do the task's actual work". Write-mode
/// tasks get a captured patch of whatever the worktree holds when this
/// returns, even though nothing here modifies it — a real worker type would
/// replace this function, not the capture step that follows it.
async fn execute(task: &Task, worktree: &Path, artifacts_dir: &Path) -> Result<(), WorkerExecutionError> {
    if task.mode == TaskMode::Write {
        capture_patch(worktree, artifacts_dir).await?;
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
enum WorkerExecutionError {
    #[error("git diff failed: {0}")]
    DiffFailed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

async fn capture_patch(worktree: &Path, artifacts_dir: &Path) -> Result<(), WorkerExecutionError> {
    let output = tokio::process::Command::new("git")
        .arg("-C")
        .arg(worktree)
        .arg("diff")
        .arg("--binary")
        .output()
        .await?;
    if !output.status.success() {
        return Err(WorkerExecutionError::DiffFailed(String::from_utf8_lossy(&output.stderr).into_owned()));
    }
    std::fs::write(artifacts_dir.join("changes.patch"), &output.stdout)?;
    Ok(())
}

fn write_metadata(
    artifacts_dir: &Path,
    task: &Task,
    started_at: chrono::DateTime<Utc>,
    finished_at: chrono::DateTime<Utc>,
    exit_code: i32,
) -> std::io::Result<()> {
    let metadata = ArtifactMetadata {
        task_id: task.id.as_str().to_string(),
        adapter: task.adapter.clone(),
        mode: task.mode,
        started_at,
        finished_at,
        exit_code,
    };
    let mut bytes = serde_json::to_vec_pretty(&metadata)?;
    bytes.push(b'\n');
    std::fs::write(artifacts_dir.join("metadata.json"), bytes)
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

fn emit(paths: &RepoPaths, task_id: TaskId, suffix: &str, at: chrono::DateTime<Utc>) {
    let event = TaskEvent::new(task_id, EventType::worker(suffix), at);
    let _ = events::append(&paths.task_events_log(task_id.as_str()), &event);
    let _ = events::append(&paths.all_events_log(), &event);
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
