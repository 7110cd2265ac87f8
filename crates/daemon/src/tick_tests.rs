// SPDX-License-Identifier: MIT

use std::sync::Arc;

use port_adapters::{fake::FakeAdapter, WorkerAdapter};
use port_core::{FakeClock, TaskMode, TaskStatus};
use port_routing::SubscribersConfig;
use port_storage::{RepoPaths, TaskIndexStore};
use tempfile::tempdir;

use super::run_tick;

fn now() -> chrono::DateTime<chrono::Utc> {
    "2026-01-01T00:00:00Z".parse().unwrap()
}

fn default_timeout() -> chrono::Duration {
    chrono::Duration::minutes(30)
}

#[tokio::test]
async fn starts_the_only_queued_task() {
    let dir = tempdir().unwrap();
    let paths = RepoPaths::new(dir.path());
    let index = TaskIndexStore::new(paths.clone());
    let task = index.create_task("t", TaskMode::Write, Some("feature-a".into()), "fake", now()).unwrap();

    let adapter: Arc<dyn WorkerAdapter> = Arc::new(FakeAdapter::new());
    let clock = FakeClock::new(now());
    let subscribers = SubscribersConfig::default();

    let outcome = run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;

    assert_eq!(outcome.started_task, Some(task.id));
    let started = index.get_task(task.id).unwrap();
    assert_eq!(started.status, TaskStatus::Running);
    assert!(started.runtime.worker_pid.is_some());
    assert!(started.runtime.timeout_at.is_some());
}

#[tokio::test]
async fn does_not_start_a_second_task_while_one_is_active() {
    let dir = tempdir().unwrap();
    let paths = RepoPaths::new(dir.path());
    let index = TaskIndexStore::new(paths.clone());
    let t1 = index.create_task("first", TaskMode::Read, None, "fake", now()).unwrap();
    let t2 = index.create_task("second", TaskMode::Read, None, "fake", now()).unwrap();

    let adapter: Arc<dyn WorkerAdapter> = Arc::new(FakeAdapter::new());
    let clock = FakeClock::new(now());
    let subscribers = SubscribersConfig::default();

    let first_tick = run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;
    assert_eq!(first_tick.started_task, Some(t1.id));

    let second_tick = run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;
    assert_eq!(second_tick.started_task, None);
    assert_eq!(index.get_task(t2.id).unwrap().status, TaskStatus::Queued);
}

#[tokio::test]
async fn reaps_an_exited_completed_task_via_cleanup() {
    let dir = tempdir().unwrap();
    let paths = RepoPaths::new(dir.path());
    let index = TaskIndexStore::new(paths.clone());
    let task = index.create_task("t", TaskMode::Read, None, "fake", now()).unwrap();

    let fake = FakeAdapter::new();
    let adapter: Arc<dyn WorkerAdapter> = Arc::new(fake.clone());
    let clock = FakeClock::new(now());
    let subscribers = SubscribersConfig::default();

    run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;
    index.update_task_status(task.id, TaskStatus::Completed, None, now()).unwrap();
    fake.mark_exited();

    run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;

    let cleaned = index.get_task(task.id).unwrap();
    assert_eq!(cleaned.status, TaskStatus::Cleaned);
    assert!(cleaned.runtime.cleaned_at.is_some());
}

#[tokio::test]
async fn timed_out_task_is_cancelled_and_marked_timeout() {
    let dir = tempdir().unwrap();
    let paths = RepoPaths::new(dir.path());
    let index = TaskIndexStore::new(paths.clone());
    let task = index.create_task("t", TaskMode::Read, None, "fake", now()).unwrap();

    let adapter: Arc<dyn WorkerAdapter> = Arc::new(FakeAdapter::new());
    let clock = FakeClock::new(now());
    let subscribers = SubscribersConfig::default();

    run_tick(dir.path(), &paths, &index, &adapter, chrono::Duration::seconds(1), &clock, &subscribers).await;
    assert_eq!(index.get_task(task.id).unwrap().status, TaskStatus::Running);

    clock.advance(chrono::Duration::seconds(2));
    run_tick(dir.path(), &paths, &index, &adapter, chrono::Duration::seconds(1), &clock, &subscribers).await;

    let timed_out = index.get_task(task.id).unwrap();
    assert_eq!(timed_out.status, TaskStatus::Timeout);
    assert!(timed_out.runtime.retained_for_debug);
}

#[tokio::test]
async fn worker_exiting_without_a_terminal_status_is_marked_failed() {
    let dir = tempdir().unwrap();
    let paths = RepoPaths::new(dir.path());
    let index = TaskIndexStore::new(paths.clone());
    let task = index.create_task("t", TaskMode::Read, None, "fake", now()).unwrap();

    let fake = FakeAdapter::new();
    let adapter: Arc<dyn WorkerAdapter> = Arc::new(fake.clone());
    let clock = FakeClock::new(now());
    let subscribers = SubscribersConfig::default();

    run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;
    fake.mark_exited();

    run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;

    let failed = index.get_task(task.id).unwrap();
    assert_eq!(failed.status, TaskStatus::Failed);
    assert!(failed.runtime.retained_for_debug);
}

#[tokio::test]
async fn disabled_subscribers_are_never_dispatched_to() {
    let dir = tempdir().unwrap();
    let paths = RepoPaths::new(dir.path());
    let index = TaskIndexStore::new(paths.clone());
    index.create_task("t", TaskMode::Read, None, "fake", now()).unwrap();

    let adapter: Arc<dyn WorkerAdapter> = Arc::new(FakeAdapter::new());
    let clock = FakeClock::new(now());
    let subscribers = SubscribersConfig { enabled: false, consumers: vec!["opencode".into()] };

    run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;

    assert!(!paths.notifications_log("opencode").exists());
}

#[tokio::test]
async fn enabled_opencode_subscriber_receives_the_created_and_running_events() {
    let dir = tempdir().unwrap();
    let paths = RepoPaths::new(dir.path());
    let index = TaskIndexStore::new(paths.clone());
    index.create_task("t", TaskMode::Read, None, "fake", now()).unwrap();

    let adapter: Arc<dyn WorkerAdapter> = Arc::new(FakeAdapter::new());
    let clock = FakeClock::new(now());
    let subscribers = SubscribersConfig { enabled: true, consumers: vec!["opencode".into()] };

    run_tick(dir.path(), &paths, &index, &adapter, default_timeout(), &clock, &subscribers).await;

    let contents = std::fs::read_to_string(paths.notifications_log("opencode")).unwrap();
    assert!(contents.contains("task.created"));
    assert!(contents.contains("task.running"));
}
