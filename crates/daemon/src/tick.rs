// SPDX-License-Identifier: MIT

//! One iteration of the daemon loop.
//!
//! Each step is its own failure domain: queue reconcile, reap, start next
//! task, and dispatch subscribers each run independently, so an error in
//! one never stops the others from running and never kills the loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use port_adapters::{WorkerAdapter, WorkerHandle, WorkerStatus};
use port_core::{Clock, EventType, Task, TaskId, TaskStatus};
use port_engine::{dispatch_one, reap, schedule, OpencodeHandler, SubscriberHandler, DEFAULT_BATCH_LIMIT};
use port_routing::SubscribersConfig;
use port_storage::{RepoPaths, TaskIndexStore};
use tracing::{debug, warn};

pub struct TickOutcome {
    pub active_count: usize,
    pub runnable_count: usize,
    pub blocked_count: usize,
    pub started_task: Option<TaskId>,
}

/// Runs one full tick: reconcile, reap, start, dispatch. Returns counts a
/// caller can log or expose as a heartbeat span.
pub async fn run_tick(
    repo_root: &Path,
    paths: &RepoPaths,
    index: &TaskIndexStore,
    adapter: &Arc<dyn WorkerAdapter>,
    task_timeout: chrono::Duration,
    clock: &dyn Clock,
    subscribers: &SubscribersConfig,
) -> TickOutcome {
    // (a) Reconcile the branch-lock queue. Idempotent; catches externally
    // edited indices.
    if let Err(e) = index.reconcile_queue() {
        warn!(error = %e, "branch-lock queue reconcile failed this tick");
    }

    // (b) Reap every task with an outstanding worker.
    reap_active_tasks(paths, index, adapter, clock.now()).await;

    // (c) Start at most one newly runnable task.
    let started_task = start_next_runnable(repo_root, paths, index, adapter, task_timeout, clock.now()).await;

    // (d) Dispatch to configured subscribers; errors never reach the loop caller.
    dispatch_subscribers(paths, subscribers);

    let tasks = index.list_tasks();
    let active_count = tasks.iter().filter(|t| t.status.is_active()).count();
    let blocked_count = tasks.iter().filter(|t| t.queue.blocked_by_task_id.is_some()).count();
    let runnable_count = tasks.iter().filter(|t| t.is_runnable()).count();

    debug!(active_count, runnable_count, blocked_count, "daemon tick complete");

    TickOutcome { active_count, runnable_count, blocked_count, started_task }
}

async fn reap_active_tasks(
    paths: &RepoPaths,
    index: &TaskIndexStore,
    adapter: &Arc<dyn WorkerAdapter>,
    now: DateTime<Utc>,
) {
    let tasks = index.list_tasks();
    for task in tasks {
        // A task keeps its worker handle until `cleanup` succeeds, so a
        // candidate is "has an outstanding worker" rather than "is still in
        // one of the active statuses" — the worker sets `completed`/`failed`
        // on the task before its process exits, so by the time we'd observe
        // the exit the on-disk status has already moved past `running`.
        if task.status == TaskStatus::Cleaned {
            continue;
        }
        let Some(worker_pid) = task.runtime.worker_pid else { continue };
        let Some(worktree_path) = task.runtime.worktree_path.as_ref() else { continue };
        let handle = WorkerHandle {
            worker_pid,
            worktree_path: PathBuf::from(worktree_path.as_str()),
            branch: task.branch.clone().unwrap_or_default(),
        };

        // Timeout enforcement only applies while a task is actually running
        // the clock down; a task that already reached a terminal status
        // keeps its old `timeoutAt` around for bookkeeping, not as a ticking
        // deadline.
        let is_active_candidate = matches!(
            task.status,
            TaskStatus::Preparing | TaskStatus::Running | TaskStatus::Resuming | TaskStatus::RevivingForAttach
        );
        if is_active_candidate {
            if let Some(timeout_at) = task.runtime.timeout_at {
                if now >= timeout_at {
                    handle_timeout(paths, index, adapter, &task, &handle, now).await;
                    continue;
                }
            }
        }

        let worker_alive = match adapter.status(&handle).await {
            Ok(WorkerStatus::Running) => true,
            Ok(WorkerStatus::Exited) => false,
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "failed to probe worker liveness, assuming exited");
                false
            }
        };
        if worker_alive {
            continue;
        }

        // The worker has exited: re-read the task before deciding anything,
        // since its own status write (e.g. to `completed`) may have landed
        // before the process actually exited.
        let Some(current) = index.get_task(task.id) else { continue };
        if current.status == TaskStatus::Cleaned {
            continue;
        }

        match reap::decide(&current, false, now) {
            reap::ReapDecision::StillRunning => {}
            reap::ReapDecision::TimedOut => handle_timeout(paths, index, adapter, &current, &handle, now).await,
            reap::ReapDecision::CleanupCompleted => {
                handle_cleanup_completed(paths, index, adapter, &current, &handle, now).await
            }
            reap::ReapDecision::RetainTerminal => handle_retain_terminal(paths, index, &current, now),
            reap::ReapDecision::UnexpectedExit => handle_unexpected_exit(paths, index, &current, now),
        }
    }
}

async fn handle_timeout(
    paths: &RepoPaths,
    index: &TaskIndexStore,
    adapter: &Arc<dyn WorkerAdapter>,
    task: &Task,
    handle: &WorkerHandle,
    now: DateTime<Utc>,
) {
    if let Err(e) = adapter.cancel(handle).await {
        warn!(task_id = %task.id, error = %e, "failed to cancel timed-out worker");
    }
    if let Err(e) = index.patch_task(task.id, |t| t.runtime.retained_for_debug = true, now) {
        warn!(task_id = %task.id, error = %e, "failed to mark timed-out task for debug retention");
    }
    if let Err(e) = index.update_task_status(task.id, TaskStatus::Timeout, Some("task exceeded its configured timeout".into()), now) {
        warn!(task_id = %task.id, error = %e, "failed to transition timed-out task");
    }
    emit_worker_event(paths, task.id, "timeout", now);
}

async fn handle_cleanup_completed(
    paths: &RepoPaths,
    index: &TaskIndexStore,
    adapter: &Arc<dyn WorkerAdapter>,
    task: &Task,
    handle: &WorkerHandle,
    now: DateTime<Utc>,
) {
    match adapter.cleanup(paths.repo_root(), handle).await {
        Ok(()) => {
            let _ = index.patch_task(
                task.id,
                |t| {
                    t.runtime.cleaned_at = Some(now);
                    t.runtime.retained_for_debug = false;
                },
                now,
            );
            let _ = index.update_task_status(task.id, TaskStatus::Cleaned, None, now);
            emit_worker_event(paths, task.id, "cleaned", now);
        }
        Err(e) => {
            warn!(task_id = %task.id, error = %e, "worktree cleanup failed, retaining for debug");
            let _ = index.patch_task(task.id, |t| t.runtime.retained_for_debug = true, now);
            emit_worker_event(paths, task.id, "cleanup_failed", now);
        }
    }
}

fn handle_retain_terminal(paths: &RepoPaths, index: &TaskIndexStore, task: &Task, now: DateTime<Utc>) {
    if task.runtime.finished_at.is_none() {
        let _ = index.patch_task(task.id, |t| t.runtime.finished_at = Some(now), now);
    }
    emit_worker_event(paths, task.id, "retained", now);
}

fn handle_unexpected_exit(paths: &RepoPaths, index: &TaskIndexStore, task: &Task, now: DateTime<Utc>) {
    let _ = index.patch_task(
        task.id,
        |t| {
            t.runtime.finished_at = Some(now);
            t.runtime.retained_for_debug = true;
            t.runtime.last_exit_code = None;
        },
        now,
    );
    let _ = index.update_task_status(task.id, TaskStatus::Failed, Some("Worker exited unexpectedly".into()), now);
    emit_worker_event(paths, task.id, "crashed", now);
}

async fn start_next_runnable(
    repo_root: &Path,
    paths: &RepoPaths,
    index: &TaskIndexStore,
    adapter: &Arc<dyn WorkerAdapter>,
    task_timeout: chrono::Duration,
    now: DateTime<Utc>,
) -> Option<TaskId> {
    let tasks = index.list_tasks();
    let next = schedule::pick_next(&tasks)?.clone();

    if index.update_task_status(next.id, TaskStatus::Preparing, None, now).is_err() {
        return None;
    }

    let prepared = match adapter.prepare(repo_root, &next).await {
        Ok(prepared) => prepared,
        Err(e) => {
            warn!(task_id = %next.id, error = %e, "adapter prepare failed");
            let _ = index.update_task_status(next.id, TaskStatus::Failed, Some(format!("prepare failed: {e}")), now);
            return None;
        }
    };
    let _ = index.patch_task(
        next.id,
        |t| {
            t.runtime.worktree_path = Some(prepared.worktree_path.display().to_string());
            t.runtime.prepared_at = Some(now);
        },
        now,
    );
    emit_worker_event(paths, next.id, "prepared", now);

    let started = match adapter.start(repo_root, &next, &prepared).await {
        Ok(started) => started,
        Err(e) => {
            warn!(task_id = %next.id, error = %e, "adapter start failed");
            let _ = index.update_task_status(next.id, TaskStatus::Failed, Some(format!("start failed: {e}")), now);
            return None;
        }
    };

    let timeout_at = now + task_timeout;
    let _ = index.patch_task(
        next.id,
        |t| {
            t.runtime.worker_pid = Some(started.worker_pid);
            t.runtime.started_at = Some(now);
            t.runtime.timeout_at = Some(timeout_at);
        },
        now,
    );
    let _ = index.update_task_status(next.id, TaskStatus::Running, None, now);

    Some(next.id)
}

fn dispatch_subscribers(paths: &RepoPaths, subscribers: &SubscribersConfig) {
    if !subscribers.enabled {
        return;
    }
    for consumer in &subscribers.consumers {
        let handler: Box<dyn SubscriberHandler> = match consumer.as_str() {
            "opencode" => Box::new(OpencodeHandler::new(paths.notifications_log(consumer))),
            other => {
                warn!(consumer = other, "unknown subscriber consumer, skipping");
                continue;
            }
        };
        let result = dispatch_one(
            &paths.all_events_log(),
            &paths.cursor_file(consumer),
            &paths.cursor_lock(consumer),
            handler.as_ref(),
            DEFAULT_BATCH_LIMIT,
        );
        if let Err(e) = result {
            warn!(consumer, error = %e, "subscriber dispatch failed this tick");
        }
    }
}

fn emit_worker_event(paths: &RepoPaths, task_id: TaskId, suffix: &str, now: DateTime<Utc>) {
    let event = port_core::TaskEvent::new(task_id, EventType::worker(suffix), now);
    let _ = port_storage::events::append(&paths.task_events_log(task_id.as_str()), &event);
    let _ = port_storage::events::append(&paths.all_events_log(), &event);
}

#[cfg(test)]
#[path = "tick_tests.rs"]
mod tests;
