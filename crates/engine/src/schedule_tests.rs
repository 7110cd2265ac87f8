// SPDX-License-Identifier: MIT

use super::*;
use chrono::Duration;
use port_core::test_support::TaskBuilder;
use port_core::TaskStatus;

fn base_time() -> chrono::DateTime<chrono::Utc> {
    "2026-01-01T00:00:00Z".parse().unwrap()
}

#[test]
fn picks_oldest_runnable_task() {
    let older = TaskBuilder::new(1).status(TaskStatus::Queued).created_at(base_time()).build();
    let newer =
        TaskBuilder::new(2).status(TaskStatus::Queued).created_at(base_time() + Duration::seconds(60)).build();
    let tasks = vec![newer.clone(), older.clone()];
    assert_eq!(pick_next(&tasks).unwrap().id, older.id);
}

#[test]
fn skips_blocked_tasks() {
    let mut blocked = TaskBuilder::new(1).status(TaskStatus::Queued).branch("feature-a").build();
    blocked.queue.blocked_by_task_id = Some(port_core::TaskId::new());
    let tasks = vec![blocked];
    assert!(pick_next(&tasks).is_none());
}

#[test]
fn skips_non_queued_tasks() {
    let running = TaskBuilder::new(1).status(TaskStatus::Running).build();
    let tasks = vec![running];
    assert!(pick_next(&tasks).is_none());
}

#[test]
fn empty_slice_has_nothing_runnable() {
    assert!(pick_next(&[]).is_none());
}
